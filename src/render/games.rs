use web_sys::CanvasRenderingContext2d;

use crate::config::{LOGICAL_HEIGHT, LOGICAL_WIDTH, PuzzleVariant};
use crate::error::Result;
use crate::games::cupid::{ARROW_LENGTH, CupidGame};
use crate::games::kisses::KissesGame;
use crate::games::puzzle::{DragSource, PuzzleGame, TILE_H, TILE_W};
use crate::games::{ActiveGame, MiniGame};
use crate::geom::Rect;

use super::{
    BLUSH, Frame, Images, MAGENTA, ROSE, WINE, WOOD, button, card, draw_portrait, fill_circle, fill_heart,
    rounded_rect_path, text,
};

const SHAKE_MS: f64 = 300.0;

pub(super) fn draw_game(ctx: &CanvasRenderingContext2d, game: &ActiveGame, frame: &Frame) -> Result<()> {
    match game {
        ActiveGame::Cupid(g) => draw_cupid(ctx, g, frame.images, frame.now),
        ActiveGame::Kisses(g) => draw_kisses(ctx, g, frame.images, frame.now),
        ActiveGame::Puzzle(g) => draw_puzzle(ctx, g, frame.now),
    }
}

fn hud(ctx: &CanvasRenderingContext2d, lines: &[String], font: &str, fill: &str, top: f64, step: f64) -> Result<()> {
    for (i, line) in lines.iter().enumerate() {
        text(ctx, line, 12.0, top + step * i as f64, font, fill, "left")?;
    }
    Ok(())
}

fn draw_cupid(ctx: &CanvasRenderingContext2d, g: &CupidGame, images: &Images, now: f64) -> Result<()> {
    let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, LOGICAL_HEIGHT);
    sky.add_color_stop(0.0, "#ffe4ec")?;
    sky.add_color_stop(1.0, "#ffc2d4")?;
    ctx.set_fill_style_canvas_gradient(&sky);
    ctx.fill_rect(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);

    // player portrait with the bow on top
    let l = g.launcher_pos();
    let size = g.launcher_size();
    draw_portrait(ctx, &images.player, Rect::new(l.x - size / 2.0, l.y, size, size), 14.0, None)?;
    ctx.save();
    ctx.translate(l.x, l.y)?;
    ctx.rotate(g.launcher_angle().to_radians())?;
    ctx.set_fill_style_str(WOOD);
    ctx.fill_rect(-4.0, -40.0, 8.0, 40.0);
    fill_heart(ctx, 0.0, -52.0, 14.0, ROSE)?;
    ctx.restore();

    let t = g.target_pos();
    let ts = g.target_size();
    draw_portrait(ctx, &images.target, Rect::new(t.x, t.y, ts, ts), 14.0, Some(MAGENTA))?;

    for a in g.arrows() {
        ctx.save();
        ctx.translate(a.pos.x, a.pos.y)?;
        ctx.rotate(a.heading())?;
        ctx.set_fill_style_str(WOOD);
        ctx.fill_rect(0.0, -2.0, ARROW_LENGTH, 4.0);
        fill_heart(ctx, ARROW_LENGTH, 0.0, 8.0, ROSE)?;
        ctx.restore();
    }

    let s = g.state(now);
    hud(
        ctx,
        &[
            format!("Hearts: {}/{}", s.score, g.hits_to_win()),
            format!("Time: {}s", s.seconds_left),
        ],
        "bold 18px Georgia",
        "rgba(0,0,0,0.6)",
        28.0,
        24.0,
    )
}

fn draw_kisses(ctx: &CanvasRenderingContext2d, g: &KissesGame, images: &Images, now: f64) -> Result<()> {
    let (w, h) = (LOGICAL_WIDTH, LOGICAL_HEIGHT);
    let st = g.sand_top();

    let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, st);
    sky.add_color_stop(0.0, "#87ceeb")?;
    sky.add_color_stop(1.0, "#e0f4ff")?;
    ctx.set_fill_style_canvas_gradient(&sky);
    ctx.fill_rect(0.0, 0.0, w, st);

    let sand = ctx.create_linear_gradient(0.0, st, 0.0, h);
    sand.add_color_stop(0.0, "#debc87")?;
    sand.add_color_stop(0.5, "#c9a86c")?;
    sand.add_color_stop(1.0, "#b8956a")?;
    ctx.set_fill_style_canvas_gradient(&sand);
    ctx.fill_rect(0.0, st, w, h - st);

    // shells
    for i in 0..8 {
        let sx = w * (i as f64 + 0.5) / 8.0 + if i % 2 == 0 { 5.0 } else { -5.0 };
        let sy = st + 20.0 + (i % 3) as f64 * 25.0;
        fill_circle(ctx, sx, sy, 6.0, BLUSH)?;
    }

    let shooter = g.shooter_pos();
    let ss = g.shooter_size();
    draw_portrait(
        ctx,
        &images.player,
        Rect::new(shooter.x - ss / 2.0, shooter.y - ss + 6.0, ss, ss),
        12.0,
        None,
    )?;

    if let Some(p) = g.head_pos() {
        let hs = g.head_size();
        draw_portrait(ctx, &images.target, Rect::new(p.x, p.y, hs, hs), 12.0, None)?;
    }

    for k in g.kisses() {
        text(ctx, "💋", k.pos.x, k.pos.y, "32px serif", "#000", "center")?;
    }

    let ttl = g.float_text_ms();
    for f in g.floats() {
        let age = now - f.born_ms;
        ctx.save();
        ctx.set_global_alpha((1.0 - age / ttl).clamp(0.0, 1.0));
        text(ctx, "mwah!", f.pos.x, f.pos.y - age * 0.08, "bold 20px Georgia", MAGENTA, "center")?;
        ctx.restore();
    }

    let s = g.state(now);
    hud(
        ctx,
        &[
            format!("Kisses: {}/{}", s.hits, g.hits_to_win()),
            format!("Combo: x{}", s.combo),
            format!("Time: {}s", s.seconds_left),
        ],
        "bold 16px Georgia",
        "rgba(0,0,0,0.65)",
        26.0,
        22.0,
    )
}

fn letter_tile(ctx: &CanvasRenderingContext2d, r: Rect, letter: char) -> Result<()> {
    let grad = ctx.create_linear_gradient(0.0, r.y, 0.0, r.y + r.h);
    grad.add_color_stop(0.0, "#ff6b8a")?;
    grad.add_color_stop(1.0, "#e63950")?;
    ctx.set_fill_style_canvas_gradient(&grad);
    rounded_rect_path(ctx, r, 8.0);
    ctx.fill();
    let c = r.center();
    text(ctx, &letter.to_string(), c.x, c.y, "bold 20px Georgia", "#fff", "center")
}

fn draw_puzzle(ctx: &CanvasRenderingContext2d, g: &PuzzleGame, now: f64) -> Result<()> {
    let layout = g.layout();
    card(ctx, Rect::new(8.0, 60.0, LOGICAL_WIDTH - 16.0, LOGICAL_HEIGHT - 90.0));

    let prompt = match g.variant() {
        PuzzleVariant::DragDrop => "Guess the phrase: drag letters into place",
        PuzzleVariant::TapNext => "Guess the phrase: tap the next letter",
    };
    text(ctx, prompt, LOGICAL_WIDTH / 2.0, 96.0, "bold 15px Georgia", WINE, "center")?;

    let dragging = g.drag().map(|d| d.source);
    for (i, (slot, rect)) in g.slots().iter().zip(&layout.slots).enumerate() {
        let Some(r) = rect else { continue };
        if slot.is_space() {
            continue;
        }
        let shown = slot.letter.filter(|_| dragging != Some(DragSource::Slot(i)));
        ctx.set_fill_style_str(if shown.is_some() { BLUSH } else { "#fff" });
        rounded_rect_path(ctx, *r, 6.0);
        ctx.fill();
        ctx.set_stroke_style_str("#e63950");
        ctx.set_line_width(2.0);
        ctx.stroke();
        if let Some(c) = shown {
            let m = r.center();
            text(ctx, &c.to_string(), m.x, m.y, "bold 18px Georgia", WINE, "center")?;
        }
    }

    let tray = layout.tray_area;
    ctx.set_fill_style_str("rgba(255,182,193,0.3)");
    rounded_rect_path(ctx, tray, 12.0);
    ctx.fill();

    let shake = g.last_reject_ms().map_or(0.0, |t| shake_offset(now - t));
    for (idx, r) in &layout.tiles {
        if dragging == Some(DragSource::Tray(*idx)) {
            continue;
        }
        if let Some(letter) = g.tray()[*idx] {
            letter_tile(ctx, Rect::new(r.x + shake, r.y, r.w, r.h), letter)?;
        }
    }

    let hint_label = format!("Hint ({} left)", g.hints_left());
    let hint_color = if g.hints_left() == 0 { "#c9a0a8" } else { "#6b8a7a" };
    button(ctx, layout.hint_button, &hint_label, Some(hint_color))?;

    if let Some(d) = g.drag() {
        ctx.save();
        ctx.set_global_alpha(0.9);
        letter_tile(ctx, Rect::new(d.pos.x - TILE_W / 2.0, d.pos.y - TILE_H / 2.0, TILE_W, TILE_H), d.letter)?;
        ctx.restore();
    }

    if g.status().is_over() {
        text(ctx, "You did it! 💖", LOGICAL_WIDTH / 2.0, LOGICAL_HEIGHT - 70.0, "bold 22px Georgia", WINE, "center")?;
    }
    Ok(())
}

/// Horizontal tray jitter `age` ms after a rejected letter. The reject is
/// stamped at pointer time, so `age` can be slightly negative on the next
/// frame.
fn shake_offset(age: f64) -> f64 {
    if !(0.0..SHAKE_MS).contains(&age) {
        return 0.0;
    }
    (age / 30.0).sin() * 6.0 * (1.0 - age / SHAKE_MS)
}
