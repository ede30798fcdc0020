//! Canvas-space layout for the non-game screens and overlays, and the
//! mapping from window coordinates to logical canvas coordinates.
//!
//! Everything here is pure so the renderer and the pointer handlers agree on
//! where each button lives.

use crate::config::{LOGICAL_HEIGHT, LOGICAL_WIDTH, MAX_CANVAS_SCALE};
use crate::geom::{Rect, Vec2};
use crate::router::{Router, Screen};

pub const LANDING_CARD: Rect = Rect::new(30.0, 110.0, 340.0, 380.0);
pub const START_BUTTON: Rect = Rect::new(90.0, 410.0, 220.0, 52.0);

pub const OVERLAY_CARD: Rect = Rect::new(40.0, 210.0, 320.0, 180.0);
pub const OVERLAY_BUTTON: Rect = Rect::new(110.0, 316.0, 180.0, 48.0);

pub const REVEAL_PHOTO: Rect = Rect::new(40.0, 150.0, 320.0, 240.0);
pub const ACCEPT_BUTTON: Rect = Rect::new(40.0, 420.0, 150.0, 48.0);
pub const CALENDAR_BUTTON: Rect = Rect::new(210.0, 420.0, 150.0, 48.0);

/// What a pointer press on the canvas lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiTarget {
    Start,
    OverlayButton,
    /// Inside the overlay card but off its button.
    OverlayCard,
    Backdrop,
    Accept,
    Calendar,
    /// Forward to the running game.
    Game,
    Nothing,
}

pub fn hit_test(router: &Router, p: Vec2) -> UiTarget {
    if router.overlay().is_some() {
        return if OVERLAY_BUTTON.contains(p) {
            UiTarget::OverlayButton
        } else if OVERLAY_CARD.contains(p) {
            UiTarget::OverlayCard
        } else {
            UiTarget::Backdrop
        };
    }
    match router.screen() {
        Screen::Landing if START_BUTTON.contains(p) => UiTarget::Start,
        Screen::Reveal if ACCEPT_BUTTON.contains(p) => UiTarget::Accept,
        Screen::Reveal if CALENDAR_BUTTON.contains(p) => UiTarget::Calendar,
        Screen::Game1 | Screen::Game2 | Screen::Game3 => UiTarget::Game,
        _ => UiTarget::Nothing,
    }
}

/// Backing-store scale for the game canvas given the space available in CSS
/// pixels. Never upscales beyond 2x.
pub fn canvas_scale(avail_w: f64, avail_h: f64) -> f64 {
    (avail_w / LOGICAL_WIDTH)
        .min(avail_h / LOGICAL_HEIGHT)
        .min(MAX_CANVAS_SCALE)
        .max(0.1)
}

/// Client (CSS pixel) position to logical canvas position, given the
/// canvas bounding rect.
pub fn to_logical(client: Vec2, rect: Rect) -> Vec2 {
    if rect.w <= 0.0 || rect.h <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        (client.x - rect.x) * LOGICAL_WIDTH / rect.w,
        (client.y - rect.y) * LOGICAL_HEIGHT / rect.h,
    )
}

/// Greedy word wrap on character count.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() { 0 } else { 1 } + word.chars().count();
        if !line.is_empty() && line.chars().count() + needed > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
