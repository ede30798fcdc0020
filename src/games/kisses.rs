//! Game 2: a head pops up from the sand for a short window; tap to blow a
//! kiss toward the tap point. Consecutive hits build a combo that resets
//! after an idle window.
//!
//! Spawn and hide timing is kept as deadlines in the state and checked on
//! every tick, so there is never more than one pending spawn.

use crate::clock::{Countdown, FrameStep};
use crate::config::KissesConfig;
use crate::geom::{Vec2, circle_contains};
use crate::rng::GameRng;

use super::{GameEvent, GameStatus, MiniGame, Outcome, Projectile};

const OFFSCREEN_MARGIN: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KissesState {
    pub hits: u32,
    pub combo: u32,
    pub time_left: f64,
    /// Whole seconds for the HUD.
    pub seconds_left: u32,
    pub won: bool,
    pub time_up: bool,
}

/// "mwah!" label rising from a hit.
#[derive(Clone, Copy, Debug)]
pub struct FloatText {
    pub pos: Vec2,
    pub born_ms: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Head {
    Hidden { spawn_at: Option<f64> },
    Visible { pos: Vec2, hide_at: f64 },
}

pub struct KissesGame {
    cfg: KissesConfig,
    width: f64,
    height: f64,
    rng: GameRng,
    clock: Countdown,
    step: FrameStep,
    outcome: Outcome,
    hits: u32,
    combo: u32,
    last_hit_ms: f64,
    head: Head,
    kisses: Vec<Projectile>,
    floats: Vec<FloatText>,
    /// Timestamp the countdown stopped at once the run ended.
    frozen_at: Option<f64>,
}

impl KissesGame {
    pub fn new(cfg: KissesConfig, width: f64, height: f64, rng: GameRng, now: f64) -> Self {
        let clock = Countdown::new(cfg.duration_s, now);
        let mut game = Self {
            cfg,
            width,
            height,
            rng,
            clock,
            step: FrameStep::new(),
            outcome: Outcome::default(),
            hits: 0,
            combo: 0,
            last_hit_ms: now,
            head: Head::Hidden { spawn_at: None },
            kisses: Vec::new(),
            floats: Vec::new(),
            frozen_at: None,
        };
        game.start(now);
        game
    }

    pub fn start(&mut self, now: f64) {
        self.outcome.reset();
        self.clock = Countdown::new(self.cfg.duration_s, now);
        self.step.reset();
        self.hits = 0;
        self.combo = 0;
        self.last_hit_ms = now;
        self.kisses.clear();
        self.floats.clear();
        self.frozen_at = None;
        let delay = self.rng.range(self.cfg.first_spawn_min_ms, self.cfg.first_spawn_max_ms);
        self.head = Head::Hidden { spawn_at: Some(now + delay) };
    }

    pub fn sand_top(&self) -> f64 {
        self.height * (1.0 - self.cfg.sand_ratio)
    }

    pub fn shooter_pos(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - self.cfg.shooter_offset)
    }

    pub fn shooter_size(&self) -> f64 {
        self.cfg.shooter_size
    }

    pub fn head_size(&self) -> f64 {
        self.cfg.head_size
    }

    /// Top-left of the visible head, if any.
    pub fn head_pos(&self) -> Option<Vec2> {
        match self.head {
            Head::Visible { pos, .. } => Some(pos),
            Head::Hidden { .. } => None,
        }
    }

    pub fn kisses(&self) -> &[Projectile] {
        &self.kisses
    }

    pub fn floats(&self) -> &[FloatText] {
        &self.floats
    }

    pub fn float_text_ms(&self) -> f64 {
        self.cfg.float_text_ms
    }

    pub fn hits_to_win(&self) -> u32 {
        self.cfg.hits_to_win
    }

    pub fn state(&self, now: f64) -> KissesState {
        let t = self.frozen_at.unwrap_or(now);
        KissesState {
            hits: self.hits,
            combo: self.combo,
            time_left: self.clock.time_left(t),
            seconds_left: self.clock.display_seconds(t),
            won: self.outcome.status() == GameStatus::Won,
            time_up: self.outcome.status() == GameStatus::TimeUp,
        }
    }

    /// Blow a kiss from the shooter toward `target`.
    pub fn fire_at(&mut self, target: Vec2) {
        if !self.outcome.playing() {
            log::debug!("kisses: fire ignored after game end");
            return;
        }
        let from = self.shooter_pos();
        let dir = (target - from).normalized_or(Vec2::new(0.0, -1.0));
        self.kisses.push(Projectile { pos: from, vel: dir * self.cfg.projectile_speed });
    }

    fn schedule_spawn(&mut self, now: f64, min_ms: f64, max_ms: f64) {
        let delay = self.rng.range(min_ms, max_ms);
        self.head = Head::Hidden { spawn_at: Some(now + delay) };
    }

    fn spawn_head(&mut self, now: f64) {
        let size = self.cfg.head_size;
        let x = size / 2.0 + self.rng.range(0.0, (self.width - size * 2.0).max(0.0));
        let y = self.sand_top() - size - 10.0 + self.rng.range(0.0, 20.0);
        let visible = self.rng.range(self.cfg.visible_min_ms, self.cfg.visible_max_ms);
        self.head = Head::Visible { pos: Vec2::new(x, y), hide_at: now + visible };
    }

    fn update_head(&mut self, now: f64) {
        match self.head {
            Head::Hidden { spawn_at: Some(at) } if now >= at => self.spawn_head(now),
            Head::Visible { hide_at, .. } if now >= hide_at => {
                self.schedule_spawn(now, self.cfg.respawn_min_ms, self.cfg.respawn_max_ms);
            }
            _ => {}
        }
    }

    fn move_kisses(&mut self, now: f64, dt: f64) {
        let (w, h) = (self.width, self.height);
        let half = self.cfg.head_size / 2.0;
        let mut target = self.head_pos().map(|p| p + Vec2::new(half, half));
        let mut hit_at: Option<Vec2> = None;

        self.kisses.retain_mut(|k| {
            k.step(dt);
            let m = OFFSCREEN_MARGIN;
            if k.pos.y < -m || k.pos.x < -m || k.pos.x > w + m || k.pos.y > h + m {
                return false;
            }
            // one hit per frame: the head hides as soon as it is struck
            match target {
                Some(c) if circle_contains(c, half, k.pos) => {
                    hit_at = Some(k.pos);
                    target = None;
                    false
                }
                _ => true,
            }
        });

        if let Some(p) = hit_at {
            self.register_hit(p, now);
        }
    }

    fn register_hit(&mut self, p: Vec2, now: f64) {
        self.floats.push(FloatText { pos: p, born_ms: now });
        self.last_hit_ms = now;
        self.combo += 1;
        self.hits += 1;
        self.outcome.push(GameEvent::Hit { x: p.x, y: p.y, combo: self.combo });
        log::debug!("kisses: hit {}/{} combo x{}", self.hits, self.cfg.hits_to_win, self.combo);
        if self.hits >= self.cfg.hits_to_win {
            self.outcome.win();
            self.frozen_at = Some(now);
            self.head = Head::Hidden { spawn_at: None };
        } else {
            self.schedule_spawn(now, self.cfg.hit_respawn_min_ms, self.cfg.hit_respawn_max_ms);
        }
    }
}

impl MiniGame for KissesGame {
    fn tick(&mut self, now: f64) {
        let dt = self.step.advance(now);
        let ttl = self.cfg.float_text_ms;
        self.floats.retain(|f| now - f.born_ms <= ttl);
        if !self.outcome.playing() {
            return;
        }
        if self.clock.expired(now) {
            self.frozen_at = Some(now);
            self.head = Head::Hidden { spawn_at: None };
            self.outcome.time_up();
            return;
        }
        self.update_head(now);
        if now - self.last_hit_ms > self.cfg.combo_decay_ms {
            self.combo = 0;
        }
        self.move_kisses(now, dt);
    }

    fn pointer_down(&mut self, p: Vec2, _now: f64) {
        self.fire_at(p);
    }

    fn status(&self) -> GameStatus {
        self.outcome.status()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.outcome.drain()
    }
}
