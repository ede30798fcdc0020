//! Canvas 2D drawing. Game scenes are drawn in logical 400x600 space; the
//! caller sets the backing-store scale once per frame.

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::config::{GreetingConfig, LOGICAL_HEIGHT, LOGICAL_WIDTH, Portraits};
use crate::error::Result;
use crate::games::ActiveGame;
use crate::geom::Rect;
use crate::particles::{Fireworks, FloatingHearts};
use crate::router::Router;

mod games;
mod screens;

pub const ROSE: &str = "#ff3b6b";
pub const WINE: &str = "#7a0019";
pub const BLUSH: &str = "#ffb6c1";
pub const MAGENTA: &str = "#c71585";
pub const WOOD: &str = "#8b4513";

/// Portrait images. A missing or broken image draws as a plain circle.
#[derive(Default)]
pub struct Images {
    pub target: Option<HtmlImageElement>,
    pub player: Option<HtmlImageElement>,
    pub reveal: Option<HtmlImageElement>,
}

impl Images {
    pub fn load(paths: &Portraits) -> Self {
        Self {
            target: load_image(&paths.target),
            player: load_image(&paths.player),
            reveal: load_image(&paths.reveal),
        }
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    if src.is_empty() {
        return None;
    }
    match HtmlImageElement::new() {
        Ok(img) => {
            img.set_src(src);
            Some(img)
        }
        Err(e) => {
            log::warn!("render: could not create image for {src}: {e:?}");
            None
        }
    }
}

/// Loaded and decodable; a failed load completes with zero natural width.
fn ready(img: &Option<HtmlImageElement>) -> Option<&HtmlImageElement> {
    img.as_ref().filter(|i| i.complete() && i.natural_width() > 0)
}

/// Everything the game canvas shows this frame.
pub struct Frame<'a> {
    pub now: f64,
    pub router: &'a Router,
    pub game: Option<&'a ActiveGame>,
    pub config: &'a GreetingConfig,
    pub images: &'a Images,
}

pub fn draw_frame(ctx: &CanvasRenderingContext2d, scale: f64, frame: &Frame) -> Result<()> {
    ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);
    match frame.game {
        Some(game) if frame.router.screen().is_game() => games::draw_game(ctx, game, frame)?,
        _ => screens::draw_screen(ctx, frame)?,
    }
    if let Some(overlay) = frame.router.overlay() {
        screens::draw_overlay(ctx, overlay)?;
    }
    Ok(())
}

/// Full-window background canvas: drifting hearts, plus fireworks on reveal.
pub fn draw_background(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    hearts: &FloatingHearts,
    fireworks: Option<&Fireworks>,
    now: f64,
) -> Result<()> {
    ctx.clear_rect(0.0, 0.0, width, height);
    for h in hearts.hearts() {
        let alpha = FloatingHearts::alpha(h, now);
        let color = format!("hsla({:.0}, 80%, 75%, {alpha:.3})", h.hue);
        fill_heart(ctx, h.x, h.y, h.size / 12.0, &color)?;
    }
    let Some(fw) = fireworks else {
        return Ok(());
    };
    for r in fw.rockets() {
        if !r.burst {
            ctx.save();
            ctx.set_global_alpha(0.9);
            ctx.set_fill_style_str("#ff6b8a");
            ctx.begin_path();
            ctx.arc(r.x, r.y, 3.0, 0.0, std::f64::consts::TAU)?;
            ctx.fill();
            ctx.restore();
            continue;
        }
        for p in &r.hearts {
            ctx.save();
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0));
            let color = format!("hsla({:.0}, 85%, 72%, 0.95)", p.hue);
            fill_heart(ctx, p.x, p.y, p.size / 10.0, &color)?;
            ctx.restore();
        }
    }
    Ok(())
}

// --- Shapes -------------------------------------------------------------------

/// Heart centred on (x, y); `size` scales the unit shape (about 2 units wide).
pub fn fill_heart(ctx: &CanvasRenderingContext2d, x: f64, y: f64, size: f64, fill: &str) -> Result<()> {
    ctx.save();
    ctx.translate(x, y)?;
    ctx.scale(size, size)?;
    ctx.begin_path();
    ctx.move_to(0.0, -0.3);
    ctx.bezier_curve_to(0.6, -0.8, 1.2, 0.4, 0.0, 1.0);
    ctx.bezier_curve_to(-1.2, 0.4, -0.6, -0.8, 0.0, -0.3);
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.restore();
    Ok(())
}

pub fn rounded_rect_path(ctx: &CanvasRenderingContext2d, r: Rect, radius: f64) {
    let rad = radius.min(r.w / 2.0).min(r.h / 2.0);
    let (x, y, w, h) = (r.x, r.y, r.w, r.h);
    ctx.begin_path();
    ctx.move_to(x + rad, y);
    ctx.line_to(x + w - rad, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + rad);
    ctx.line_to(x + w, y + h - rad);
    ctx.quadratic_curve_to(x + w, y + h, x + w - rad, y + h);
    ctx.line_to(x + rad, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - rad);
    ctx.line_to(x, y + rad);
    ctx.quadratic_curve_to(x, y, x + rad, y);
    ctx.close_path();
}

pub fn fill_circle(ctx: &CanvasRenderingContext2d, cx: f64, cy: f64, r: f64, fill: &str) -> Result<()> {
    ctx.set_fill_style_str(fill);
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, std::f64::consts::TAU)?;
    ctx.fill();
    Ok(())
}

/// Photo clipped to a rounded square, or a blush circle when the image is
/// not available.
pub fn draw_portrait(
    ctx: &CanvasRenderingContext2d,
    img: &Option<HtmlImageElement>,
    r: Rect,
    radius: f64,
    outline: Option<&str>,
) -> Result<()> {
    if let Some(img) = ready(img) {
        ctx.save();
        rounded_rect_path(ctx, r, radius);
        ctx.clip();
        let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, r.x, r.y, r.w, r.h);
        ctx.restore();
        return drawn.map_err(Into::into);
    }
    let c = r.center();
    fill_circle(ctx, c.x, c.y, r.w.min(r.h) / 2.0, BLUSH)?;
    if let Some(color) = outline {
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(2.0);
        ctx.stroke();
    }
    Ok(())
}

pub fn card(ctx: &CanvasRenderingContext2d, r: Rect) {
    ctx.save();
    ctx.set_shadow_color("rgba(122,0,25,0.25)");
    ctx.set_shadow_blur(18.0);
    ctx.set_shadow_offset_y(4.0);
    ctx.set_fill_style_str("rgba(255,255,255,0.92)");
    rounded_rect_path(ctx, r, 20.0);
    ctx.fill();
    ctx.restore();
}

/// Pill button with a vertical rose gradient (or a flat override colour).
pub fn button(ctx: &CanvasRenderingContext2d, r: Rect, label: &str, flat: Option<&str>) -> Result<()> {
    ctx.save();
    match flat {
        Some(color) => ctx.set_fill_style_str(color),
        None => {
            let grad = ctx.create_linear_gradient(0.0, r.y, 0.0, r.y + r.h);
            grad.add_color_stop(0.0, "#ff6b8a")?;
            grad.add_color_stop(1.0, "#e63950")?;
            ctx.set_fill_style_canvas_gradient(&grad);
        }
    }
    ctx.set_shadow_color("rgba(230,57,80,0.35)");
    ctx.set_shadow_blur(12.0);
    ctx.set_shadow_offset_y(3.0);
    rounded_rect_path(ctx, r, r.h / 2.0);
    ctx.fill();
    ctx.restore();

    let c = r.center();
    text(ctx, label, c.x, c.y, "bold 17px Georgia", "#fff", "center")
}

pub fn text(
    ctx: &CanvasRenderingContext2d,
    s: &str,
    x: f64,
    y: f64,
    font: &str,
    fill: &str,
    align: &str,
) -> Result<()> {
    ctx.set_font(font);
    ctx.set_fill_style_str(fill);
    ctx.set_text_align(align);
    ctx.set_text_baseline("middle");
    ctx.fill_text(s, x, y).map_err(|e: JsValue| e.into())
}
