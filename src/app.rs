//! Browser shell: owns the DOM pieces, the animation-frame loop and the
//! pointer listeners, and wires router effects to games, sound and the
//! calendar download.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, Element, HtmlAnchorElement, HtmlCanvasElement,
    PointerEvent, Url, window,
};

use crate::audio::Sfx;
use crate::calendar::{ICS_FILE_NAME, ICS_MIME, Invitation};
use crate::clock::FrameStep;
use crate::config::{GreetingConfig, LOGICAL_HEIGHT, LOGICAL_WIDTH};
use crate::error::{GameError, Result};
use crate::games::{ActiveGame, CupidGame, KissesGame, MiniGame, PuzzleGame};
use crate::geom::{Rect, Vec2};
use crate::particles::{Fireworks, FloatingHearts};
use crate::render::{self, Frame, Images};
use crate::rng::GameRng;
use crate::router::{Effect, Router, Screen};
use crate::ui::{self, UiTarget};

const CANVAS_ID: &str = "vg-canvas";
const HEARTS_ID: &str = "vg-hearts";
const PROGRESS_ID: &str = "vg-progress";
const INSTRUCTION_ID: &str = "vg-instruction";
const RESTART_ID: &str = "vg-restart";
const MUSIC_ID: &str = "vg-music";
const MUSIC_PANEL_ID: &str = "vg-music-panel";
const MUSIC_TOGGLE_ID: &str = "vg-music-toggle";

/// Room left around the game canvas for the top bar and the music button.
const CHROME_W: f64 = 32.0;
const CHROME_H: f64 = 140.0;

struct App {
    config: GreetingConfig,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    bg_canvas: HtmlCanvasElement,
    bg_ctx: CanvasRenderingContext2d,
    /// Backing-store pixels per logical pixel.
    scale: f64,
    router: Router,
    game: Option<ActiveGame>,
    hearts: FloatingHearts,
    fireworks: Option<Fireworks>,
    bg_step: FrameStep,
    images: Images,
    sfx: Sfx,
    /// Screen the DOM chrome was last synced for.
    shown_screen: Option<Screen>,
    music_open: bool,
    render_error_logged: bool,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub(crate) fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn start(config: GreetingConfig) -> Result<()> {
    if APP.with(|cell| cell.borrow().is_some()) {
        log::warn!("greeting already running; ignoring second start");
        return Ok(());
    }
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let body = doc.body().ok_or(GameError::MissingElement("body"))?;
    body.set_attribute(
        "style",
        "margin:0; min-height:100vh; overflow:hidden; font-family:Georgia, serif; background:linear-gradient(180deg,#ff9bb3 0%,#ff5c85 100%);",
    )?;

    let bg_canvas = ensure_canvas(&doc, HEARTS_ID)?;
    bg_canvas.set_attribute("style", "position:fixed; inset:0; width:100%; height:100%; pointer-events:none; z-index:0;")?;
    let bg_ctx = context_2d(&bg_canvas)?;
    let canvas = ensure_canvas(&doc, CANVAS_ID)?;
    let ctx = context_2d(&canvas)?;

    ensure_top_bar(&doc)?;
    if let Some(track) = &config.music_track {
        ensure_music_player(&doc, track, &config.music_label)?;
    }

    let now = performance_now();
    let mut rng = GameRng::from_entropy_or(now);
    let (ww, wh) = window_size();
    let hearts = FloatingHearts::new(&mut rng, ww, wh);
    let app = App {
        images: Images::load(&config.portraits),
        sfx: Sfx::new(config.sound),
        config,
        canvas: canvas.clone(),
        ctx,
        bg_canvas,
        bg_ctx,
        scale: 1.0,
        router: Router::new(),
        game: None,
        hearts,
        fireworks: None,
        bg_step: FrameStep::new(),
        shown_screen: None,
        music_open: false,
        render_error_logged: false,
    };
    APP.with(|cell| cell.replace(Some(app)));
    with_app(resize);

    install_pointer_listeners(&canvas)?;
    install_chrome_listeners(&doc)?;
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_app(resize);
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("greeting started");
    start_loop();
    Ok(())
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

// --- DOM setup ------------------------------------------------------------------

fn ensure_canvas(doc: &Document, id: &str) -> Result<HtmlCanvasElement> {
    if let Some(el) = doc.get_element_by_id(id) {
        return el.dyn_into().map_err(|_| GameError::Canvas);
    }
    let c: HtmlCanvasElement = doc
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| GameError::Canvas)?;
    c.set_id(id);
    doc.body().ok_or(GameError::MissingElement("body"))?.append_child(&c)?;
    Ok(c)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")?
        .ok_or(GameError::Canvas)?
        .dyn_into()
        .map_err(|_| GameError::Canvas)
}

/// Create (or find) an element with `id`, styled and attached to `parent`.
fn ensure_element(doc: &Document, parent: &Element, tag: &str, id: &str, style: &str) -> Result<Element> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    parent.append_child(&el)?;
    Ok(el)
}

fn ensure_top_bar(doc: &Document) -> Result<()> {
    let body: Element = doc.body().ok_or(GameError::MissingElement("body"))?.into();
    let bar = ensure_element(
        doc,
        &body,
        "div",
        "vg-topbar",
        "position:fixed; top:0; left:0; right:0; z-index:10; display:flex; justify-content:space-between; align-items:center; padding:8px 16px; box-sizing:border-box;",
    )?;
    ensure_element(
        doc,
        &bar,
        "span",
        PROGRESS_ID,
        "color:#fff; font-weight:700; font-size:16px; text-shadow:0 1px 4px rgba(0,0,0,0.3);",
    )?;
    let restart = ensure_element(
        doc,
        &bar,
        "button",
        RESTART_ID,
        "display:none; padding:6px 12px; border-radius:999px; border:2px solid rgba(255,255,255,0.8); background:rgba(255,255,255,0.2); color:#fff; font-weight:700; font-size:14px; cursor:pointer;",
    )?;
    restart.set_text_content(Some("Restart"));
    ensure_element(
        doc,
        &body,
        "p",
        INSTRUCTION_ID,
        "position:fixed; top:36px; left:0; right:0; margin:0; text-align:center; color:#fff; font-weight:700; text-shadow:0 1px 4px rgba(0,0,0,0.3); z-index:10;",
    )?;
    Ok(())
}

pub fn music_embed_url(track: &str) -> String {
    format!("https://open.spotify.com/embed/track/{track}?utm_source=generator&theme=0")
}

fn ensure_music_player(doc: &Document, track: &str, label: &str) -> Result<()> {
    let body: Element = doc.body().ok_or(GameError::MissingElement("body"))?.into();
    let root = ensure_element(
        doc,
        &body,
        "div",
        MUSIC_ID,
        "position:fixed; bottom:16px; right:16px; z-index:40; display:flex; flex-direction:column; align-items:flex-end; gap:8px;",
    )?;
    let panel = ensure_element(
        doc,
        &root,
        "div",
        MUSIC_PANEL_ID,
        "display:none; width:300px; max-width:calc(100vw - 2rem); border-radius:16px; overflow:hidden; background:#fff; box-shadow:0 8px 32px rgba(122,0,25,0.4);",
    )?;
    if panel.child_element_count() == 0 {
        let header = doc.create_element("div")?;
        header.set_attribute(
            "style",
            "padding:8px 12px; background:linear-gradient(135deg,#7a0019 0%,#ff3b6b 100%); color:#fff; font-weight:700; font-size:14px;",
        )?;
        header.set_text_content(Some(&format!("🎵 {label}")));
        panel.append_child(&header)?;

        let frame = doc.create_element("iframe")?;
        frame.set_attribute("title", label)?;
        frame.set_attribute("src", &music_embed_url(track))?;
        frame.set_attribute("width", "100%")?;
        frame.set_attribute("height", "152")?;
        frame.set_attribute("loading", "lazy")?;
        frame.set_attribute("allow", "autoplay; clipboard-write; encrypted-media; fullscreen; picture-in-picture")?;
        frame.set_attribute("style", "border:none; display:block;")?;
        panel.append_child(&frame)?;
    }
    let toggle = ensure_element(
        doc,
        &root,
        "button",
        MUSIC_TOGGLE_ID,
        "padding:10px 16px; font-weight:700; font-size:14px; border:none; border-radius:999px; background:rgba(255,255,255,0.92); color:#7a0019; cursor:pointer; box-shadow:0 4px 16px rgba(122,0,25,0.3);",
    )?;
    toggle.set_text_content(Some("🎵 Music"));
    Ok(())
}

fn set_display(doc: &Document, id: &str, display: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        if let Ok(el) = el.dyn_into::<web_sys::HtmlElement>() {
            if let Err(e) = el.style().set_property("display", display) {
                log::warn!("could not toggle #{id}: {e:?}");
            }
        }
    }
}

/// Progress label, instruction line and restart button follow the screen.
fn sync_chrome(app: &mut App) {
    let screen = app.router.screen();
    if app.shown_screen == Some(screen) {
        return;
    }
    app.shown_screen = Some(screen);
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(el) = doc.get_element_by_id(PROGRESS_ID) {
        el.set_text_content(Some(&app.router.progress_label()));
    }
    if let Some(el) = doc.get_element_by_id(INSTRUCTION_ID) {
        el.set_text_content(screen.instruction());
    }
    set_display(&doc, RESTART_ID, if app.router.can_restart() { "inline-block" } else { "none" });
}

fn window_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (LOGICAL_WIDTH, LOGICAL_HEIGHT);
    };
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(LOGICAL_WIDTH);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(LOGICAL_HEIGHT);
    (w, h)
}

fn resize(app: &mut App) {
    let (ww, wh) = window_size();
    let dpr = window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0).max(1.0);

    app.bg_canvas.set_width(ww as u32);
    app.bg_canvas.set_height(wh as u32);
    app.hearts.resize(ww, wh);

    let css = ui::canvas_scale(ww - CHROME_W, wh - CHROME_H);
    app.scale = css * dpr;
    app.canvas.set_width((LOGICAL_WIDTH * app.scale).floor() as u32);
    app.canvas.set_height((LOGICAL_HEIGHT * app.scale).floor() as u32);
    let style = format!(
        "position:fixed; left:50%; top:calc(50% + 24px); transform:translate(-50%,-50%); width:{:.0}px; height:{:.0}px; border-radius:20px; box-shadow:0 8px 32px rgba(122,0,25,0.35); touch-action:none; z-index:5;",
        LOGICAL_WIDTH * css,
        LOGICAL_HEIGHT * css,
    );
    if let Err(e) = app.canvas.set_attribute("style", &style) {
        log::warn!("resize: could not style canvas: {e:?}");
    }
    log::debug!("resize: window {ww}x{wh}, canvas scale {css:.2} (dpr {dpr})");
}

// --- Input ------------------------------------------------------------------------

fn logical_point(canvas: &HtmlCanvasElement, evt: &PointerEvent) -> Vec2 {
    let r = canvas.get_bounding_client_rect();
    ui::to_logical(
        Vec2::new(evt.client_x() as f64, evt.client_y() as f64),
        Rect::new(r.left(), r.top(), r.width(), r.height()),
    )
}

fn install_pointer_listeners(canvas: &HtmlCanvasElement) -> Result<()> {
    {
        let c = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            evt.prevent_default();
            let p = logical_point(&c, &evt);
            with_app(|app| on_pointer_down(app, p, performance_now()));
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let c = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            let p = logical_point(&c, &evt);
            with_app(|app| {
                if app.router.game_running() {
                    if let Some(game) = app.game.as_mut() {
                        game.pointer_move(p, performance_now());
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    // Released anywhere, so a drag that leaves the canvas still ends.
    {
        let c = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: PointerEvent| {
            let p = logical_point(&c, &evt);
            with_app(|app| {
                if let Some(game) = app.game.as_mut() {
                    game.pointer_up(p, performance_now());
                }
                pump_game_events(app, performance_now());
            });
        }) as Box<dyn FnMut(_)>);
        window()
            .ok_or(GameError::NoWindow)?
            .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn install_chrome_listeners(doc: &Document) -> Result<()> {
    if let Some(btn) = doc.get_element_by_id(RESTART_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_app(|app| {
                app.router.restart();
                app.game = None;
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    if let Some(btn) = doc.get_element_by_id(MUSIC_TOGGLE_ID) {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            with_app(|app| {
                app.music_open = !app.music_open;
                let Some(doc) = window().and_then(|w| w.document()) else {
                    return;
                };
                set_display(&doc, MUSIC_PANEL_ID, if app.music_open { "block" } else { "none" });
                if let Some(t) = doc.get_element_by_id(MUSIC_TOGGLE_ID) {
                    t.set_text_content(Some(if app.music_open { "🎵 Hide" } else { "🎵 Music" }));
                }
            });
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

fn on_pointer_down(app: &mut App, p: Vec2, now: f64) {
    let effects = match ui::hit_test(&app.router, p) {
        UiTarget::Start => app.router.start(),
        UiTarget::OverlayButton => app.router.overlay_button(),
        UiTarget::Backdrop => {
            app.router.backdrop_click();
            Vec::new()
        }
        UiTarget::Accept => app.router.accept(),
        UiTarget::Calendar => app.router.add_to_calendar(),
        UiTarget::Game => {
            if let Some(game) = app.game.as_mut() {
                game.pointer_down(p, now);
            }
            Vec::new()
        }
        UiTarget::OverlayCard | UiTarget::Nothing => Vec::new(),
    };
    apply_effects(app, effects, now);
    pump_game_events(app, now);
}

// --- Effects ----------------------------------------------------------------------

fn new_game(config: &GreetingConfig, n: u8, now: f64) -> ActiveGame {
    let rng = GameRng::from_entropy_or(now);
    match n {
        1 => ActiveGame::Cupid(CupidGame::new(config.cupid.clone(), LOGICAL_WIDTH, LOGICAL_HEIGHT, rng, now)),
        2 => ActiveGame::Kisses(KissesGame::new(config.kisses.clone(), LOGICAL_WIDTH, LOGICAL_HEIGHT, rng, now)),
        _ => ActiveGame::Puzzle(PuzzleGame::new(config.puzzle.clone(), LOGICAL_WIDTH, rng)),
    }
}

fn apply_effects(app: &mut App, effects: Vec<Effect>, now: f64) {
    for effect in effects {
        match effect {
            Effect::StartGame(n) => app.game = Some(new_game(&app.config, n, now)),
            Effect::PlayPop => app.sfx.pop(),
            Effect::PlaySparkle => app.sfx.sparkle(),
            Effect::StartFireworks => {
                app.game = None;
                let (w, h) = window_size();
                app.fireworks = Some(Fireworks::new(GameRng::from_entropy_or(now), w, h, now));
            }
            Effect::DownloadCalendar => {
                if let Err(e) = download_calendar(&app.config.invitation) {
                    log::warn!("calendar download failed: {e}");
                }
            }
            Effect::ShowAcceptance => log::info!("invitation accepted"),
        }
    }
}

fn pump_game_events(app: &mut App, now: f64) {
    let events = match app.game.as_mut() {
        Some(game) => game.drain_events(),
        None => return,
    };
    for ev in events {
        let effects = app.router.on_game_event(&ev);
        apply_effects(app, effects, now);
    }
}

fn download_calendar(invitation: &Invitation) -> Result<()> {
    let doc = window().and_then(|w| w.document()).ok_or(GameError::NoDocument)?;
    let parts = js_sys::Array::of1(&JsValue::from_str(&invitation.to_ics()));
    let opts = BlobPropertyBag::new();
    opts.set_type(ICS_MIME);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a: HtmlAnchorElement = doc
        .create_element("a")?
        .dyn_into()
        .map_err(|_| GameError::MissingElement("a"))?;
    a.set_href(&url);
    a.set_download(ICS_FILE_NAME);
    a.click();
    Url::revoke_object_url(&url)?;
    log::info!("calendar file offered as {ICS_FILE_NAME}");
    Ok(())
}

// --- Frame loop -------------------------------------------------------------------

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_app(|app| frame_tick(app, ts));
        if let Some(w) = window() {
            if let Some(cb) = f.borrow().as_ref() {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(w) = window() {
        if let Some(cb) = g.borrow().as_ref() {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

fn frame_tick(app: &mut App, now: f64) {
    if app.router.game_running() {
        if let Some(game) = app.game.as_mut() {
            game.tick(now);
        }
    }
    pump_game_events(app, now);

    let dt = app.bg_step.advance(now);
    app.hearts.step(dt);
    if let Some(fw) = app.fireworks.as_mut() {
        fw.step(now, dt);
    }
    if app.router.screen() != Screen::Reveal || app.fireworks.as_ref().is_some_and(|fw| !fw.active(now)) {
        app.fireworks = None;
    }
    sync_chrome(app);

    let (bw, bh) = (app.bg_canvas.width() as f64, app.bg_canvas.height() as f64);
    let drawn = render::draw_background(&app.bg_ctx, bw, bh, &app.hearts, app.fireworks.as_ref(), now).and_then(|_| {
        let frame = Frame {
            now,
            router: &app.router,
            game: app.game.as_ref(),
            config: &app.config,
            images: &app.images,
        };
        render::draw_frame(&app.ctx, app.scale, &frame)
    });
    if let Err(e) = drawn {
        if !app.render_error_logged {
            log::warn!("render failed: {e}");
            app.render_error_logged = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embed_url_carries_track_id() {
        assert_eq!(
            music_embed_url("3S0OXQeoh0w6AY8WQVckRW"),
            "https://open.spotify.com/embed/track/3S0OXQeoh0w6AY8WQVckRW?utm_source=generator&theme=0"
        );
    }
}
