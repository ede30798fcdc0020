use web_sys::CanvasRenderingContext2d;

use crate::config::{LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::error::Result;
use crate::geom::Rect;
use crate::router::{Overlay, Screen};
use crate::ui::{
    ACCEPT_BUTTON, CALENDAR_BUTTON, LANDING_CARD, OVERLAY_BUTTON, OVERLAY_CARD, REVEAL_PHOTO, START_BUTTON,
    wrap_text,
};

use super::{Frame, WINE, button, card, ready, rounded_rect_path, text};

pub(super) fn draw_screen(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<()> {
    match frame.router.screen() {
        Screen::Landing => draw_landing(ctx, frame),
        Screen::Reveal => draw_reveal(ctx, frame),
        // a game screen without a game only shows between frames
        Screen::Game1 | Screen::Game2 | Screen::Game3 => Ok(()),
    }
}

fn draw_landing(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<()> {
    let cx = LOGICAL_WIDTH / 2.0;
    card(ctx, LANDING_CARD);
    text(ctx, &frame.config.greeting(), cx, LANDING_CARD.y + 50.0, "bold 30px Georgia", WINE, "center")?;

    for (i, line) in wrap_text(&frame.config.blurb, 30).iter().enumerate() {
        text(ctx, line, cx, LANDING_CARD.y + 100.0 + i as f64 * 24.0, "17px Georgia", "#4a0a14", "center")?;
    }

    for n in 1..=3u8 {
        let x = cx + (n as f64 - 2.0) * 70.0;
        let y = LANDING_CARD.y + 200.0;
        text(ctx, "🔒", x, y, "28px serif", "#000", "center")?;
        text(ctx, Screen::game_title(n), x, y + 28.0, "12px Georgia", WINE, "center")?;
    }

    button(ctx, START_BUTTON, "Start the Challenge", None)
}

fn draw_reveal(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<()> {
    let cx = LOGICAL_WIDTH / 2.0;
    card(ctx, Rect::new(16.0, 16.0, LOGICAL_WIDTH - 32.0, LOGICAL_HEIGHT - 96.0));

    let headline = frame.config.invitation.reveal_text();
    for (i, line) in wrap_text(&headline, 34).iter().enumerate().take(4) {
        text(ctx, line, cx, 48.0 + i as f64 * 22.0, "bold 17px Georgia", WINE, "center")?;
    }

    let photo = REVEAL_PHOTO;
    match ready(&frame.images.reveal) {
        Some(img) => {
            ctx.save();
            rounded_rect_path(ctx, photo, 20.0);
            ctx.clip();
            let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, photo.x, photo.y, photo.w, photo.h);
            ctx.restore();
            drawn?;
        }
        None => {
            let grad = ctx.create_linear_gradient(photo.x, photo.y, photo.x + photo.w, photo.y + photo.h);
            grad.add_color_stop(0.0, "#ffb6c1")?;
            grad.add_color_stop(1.0, "#ff69b4")?;
            ctx.set_fill_style_canvas_gradient(&grad);
            rounded_rect_path(ctx, photo, 20.0);
            ctx.fill();
            let c = photo.center();
            text(ctx, "💖", c.x, c.y, "48px serif", "#000", "center")?;
        }
    }

    let sign_y = (REVEAL_PHOTO.y + REVEAL_PHOTO.h + ACCEPT_BUTTON.y) / 2.0;
    text(ctx, &frame.config.signature(), cx, sign_y, "italic 15px Georgia", WINE, "center")?;

    button(ctx, ACCEPT_BUTTON, "I'm In 💖", None)?;
    button(ctx, CALENDAR_BUTTON, frame.router.calendar_button_text(), Some("#5b7a6a"))
}

pub(super) fn draw_overlay(ctx: &CanvasRenderingContext2d, overlay: Overlay) -> Result<()> {
    let dim = match overlay {
        Overlay::Acceptance => "rgba(0,0,0,0.7)",
        Overlay::Win(_) | Overlay::TimeUp(_) => "rgba(0,0,0,0.5)",
    };
    ctx.set_fill_style_str(dim);
    ctx.fill_rect(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);

    card(ctx, OVERLAY_CARD);
    let c = OVERLAY_CARD.center();
    text(ctx, overlay.message(), c.x, OVERLAY_CARD.y + 56.0, "bold 22px Georgia", WINE, "center")?;
    button(ctx, OVERLAY_BUTTON, overlay.button_text(), None)
}
