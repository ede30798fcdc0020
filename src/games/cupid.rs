//! Game 1: aim and throw. A launcher at the bottom rotates toward the
//! pointer; each tap throws a heart arrow at a bouncing, bobbing target.

use std::f64::consts::TAU;

use crate::clock::{Countdown, FrameStep};
use crate::config::{CupidConfig, LOGICAL_HEIGHT};
use crate::geom::{Vec2, circle_contains, clamp_angle_deg};
use crate::rng::GameRng;

use super::{GameEvent, GameStatus, MiniGame, Outcome, Projectile};

/// Length of the drawn bow; arrows leave from its tip.
pub const LAUNCHER_REACH: f64 = 40.0;
/// Length of a drawn arrow; the tip is what hits.
pub const ARROW_LENGTH: f64 = 24.0;
const OFFSCREEN_MARGIN: f64 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CupidState {
    pub score: u32,
    pub time_left: f64,
    /// Whole seconds for the HUD.
    pub seconds_left: u32,
    pub won: bool,
    pub time_up: bool,
}

pub struct CupidGame {
    cfg: CupidConfig,
    width: f64,
    height: f64,
    rng: GameRng,
    clock: Countdown,
    step: FrameStep,
    outcome: Outcome,
    score: u32,
    /// Top-left of the target before the vertical bob is applied.
    target: Vec2,
    target_vel: Vec2,
    bob: f64,
    launcher_angle: f64,
    arrows: Vec<Projectile>,
    /// Timestamp the countdown stopped at once the run ended.
    frozen_at: Option<f64>,
}

impl CupidGame {
    pub fn new(cfg: CupidConfig, width: f64, height: f64, rng: GameRng, now: f64) -> Self {
        let clock = Countdown::new(cfg.duration_s, now);
        let mut game = Self {
            cfg,
            width,
            height,
            rng,
            clock,
            step: FrameStep::new(),
            outcome: Outcome::default(),
            score: 0,
            target: Vec2::ZERO,
            target_vel: Vec2::ZERO,
            bob: 0.0,
            launcher_angle: 0.0,
            arrows: Vec::new(),
            frozen_at: None,
        };
        game.start(now);
        game
    }

    /// Reset everything and begin a fresh 30 second run.
    pub fn start(&mut self, now: f64) {
        self.outcome.reset();
        self.clock = Countdown::new(self.cfg.duration_s, now);
        self.step.reset();
        self.score = 0;
        self.arrows.clear();
        self.launcher_angle = 0.0;
        self.frozen_at = None;
        self.bob = 0.0;
        self.spawn_target();
    }

    fn spawn_target(&mut self) {
        let (w, h) = (self.width, self.height);
        self.target = Vec2::new(
            w * 0.2 + self.rng.range(0.0, w * 0.6),
            h * 0.25 + self.rng.range(0.0, h * 0.35),
        );
        self.target_vel = Vec2::new(self.rng.sign() * self.cfg.target_speed_x, self.cfg.target_speed_y);
    }

    pub fn launcher_pos(&self) -> Vec2 {
        Vec2::new(
            self.width / 2.0,
            self.height - self.cfg.launcher_size - self.cfg.launcher_bottom_pad,
        )
    }

    pub fn launcher_size(&self) -> f64 {
        self.cfg.launcher_size
    }

    pub fn launcher_angle(&self) -> f64 {
        self.launcher_angle
    }

    pub fn set_launcher_angle(&mut self, deg: f64) {
        self.launcher_angle = clamp_angle_deg(deg, self.cfg.angle_limit_deg);
    }

    /// Point the launcher at a pointer position. Only the horizontal offset
    /// matters; the vertical reference is the middle of the canvas.
    pub fn aim_at(&mut self, p: Vec2) {
        let l = self.launcher_pos();
        let angle = (p.x - l.x).atan2(l.y - self.height * 0.5).to_degrees();
        self.set_launcher_angle(angle);
    }

    pub fn fire(&mut self) {
        if !self.outcome.playing() {
            log::debug!("cupid: fire ignored after game end");
            return;
        }
        let dir = Vec2::from_heading_deg(self.launcher_angle);
        self.arrows.push(Projectile {
            pos: self.launcher_pos() + dir * LAUNCHER_REACH,
            vel: dir * self.cfg.projectile_speed,
        });
    }

    /// Top-left of the target as drawn (bob applied).
    pub fn target_pos(&self) -> Vec2 {
        Vec2::new(self.target.x, self.target.y + self.bob)
    }

    pub fn target_size(&self) -> f64 {
        self.cfg.target_size
    }

    pub fn target_center(&self) -> Vec2 {
        let half = self.cfg.target_size / 2.0;
        self.target_pos() + Vec2::new(half, half)
    }

    pub fn arrows(&self) -> &[Projectile] {
        &self.arrows
    }

    pub fn hits_to_win(&self) -> u32 {
        self.cfg.hits_to_win
    }

    pub fn state(&self, now: f64) -> CupidState {
        let t = self.frozen_at.unwrap_or(now);
        CupidState {
            score: self.score,
            time_left: self.clock.time_left(t),
            seconds_left: self.clock.display_seconds(t),
            won: self.outcome.status() == GameStatus::Won,
            time_up: self.outcome.status() == GameStatus::TimeUp,
        }
    }

    fn move_target(&mut self, dt: f64, elapsed_s: f64) {
        let size = self.cfg.target_size;
        let scale = self.height / LOGICAL_HEIGHT;
        self.bob = (elapsed_s * self.cfg.bob_freq_hz * TAU).sin() * self.cfg.bob_amplitude * scale;

        self.target += self.target_vel * dt;
        let max_x = (self.width - size).max(0.0);
        let max_y = (self.height - size).max(0.0);
        if self.target.x <= 0.0 || self.target.x >= max_x {
            self.target_vel.x = -self.target_vel.x;
            self.target.x = self.target.x.clamp(0.0, max_x);
        }
        if self.target.y <= 0.0 || self.target.y >= max_y {
            self.target_vel.y = -self.target_vel.y;
            self.target.y = self.target.y.clamp(0.0, max_y);
        }
    }

    fn move_arrows(&mut self, dt: f64) {
        let center = self.target_center();
        let radius = self.cfg.target_size / 2.0;
        let (w, hits_to_win) = (self.width, self.cfg.hits_to_win);
        let mut hits: Vec<Vec2> = Vec::new();

        self.arrows.retain_mut(|a| {
            a.step(dt);
            if a.pos.y < -OFFSCREEN_MARGIN || a.pos.x < -OFFSCREEN_MARGIN || a.pos.x > w + OFFSCREEN_MARGIN {
                return false;
            }
            let tip = a.pos + a.vel.normalized_or(Vec2::ZERO) * ARROW_LENGTH;
            if circle_contains(center, radius, tip) {
                hits.push(tip);
                return false;
            }
            true
        });

        for tip in hits {
            if !self.outcome.playing() {
                break;
            }
            self.score += 1;
            self.outcome.push(GameEvent::Hit { x: tip.x, y: tip.y, combo: 1 });
            log::debug!("cupid: hit {}/{}", self.score, hits_to_win);
            if self.score >= hits_to_win {
                self.outcome.win();
            }
        }
    }
}

impl MiniGame for CupidGame {
    fn tick(&mut self, now: f64) {
        let dt = self.step.advance(now);
        if !self.outcome.playing() {
            return;
        }
        if self.clock.expired(now) {
            self.frozen_at = Some(now);
            self.outcome.time_up();
            return;
        }
        self.move_target(dt, self.clock.elapsed_s(now));
        self.move_arrows(dt);
        if !self.outcome.playing() {
            self.frozen_at = Some(now);
        }
    }

    fn pointer_down(&mut self, p: Vec2, _now: f64) {
        self.aim_at(p);
        self.fire();
    }

    fn pointer_move(&mut self, p: Vec2, _now: f64) {
        self.aim_at(p);
    }

    fn status(&self) -> GameStatus {
        self.outcome.status()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.outcome.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LOGICAL_WIDTH;

    fn game() -> CupidGame {
        CupidGame::new(CupidConfig::default(), LOGICAL_WIDTH, LOGICAL_HEIGHT, GameRng::seeded(11), 0.0)
    }

    /// Steps at 60 fps from `from` for `frames` frames, returns the last timestamp.
    fn run(g: &mut CupidGame, from: f64, frames: usize) -> f64 {
        let mut t = from;
        for _ in 0..frames {
            t += 1000.0 / 60.0;
            g.tick(t);
        }
        t
    }

    #[test]
    fn angle_is_clamped() {
        let mut g = game();
        g.set_launcher_angle(120.0);
        assert_eq!(g.launcher_angle(), 85.0);
        g.set_launcher_angle(-90.0);
        assert_eq!(g.launcher_angle(), -85.0);
    }

    #[test]
    fn aim_follows_pointer_side() {
        let mut g = game();
        g.aim_at(Vec2::new(LOGICAL_WIDTH / 2.0, 100.0));
        assert!(g.launcher_angle().abs() < 1e-9);
        g.aim_at(Vec2::new(LOGICAL_WIDTH, 100.0));
        assert!(g.launcher_angle() > 0.0);
        g.aim_at(Vec2::new(0.0, 100.0));
        assert!(g.launcher_angle() < 0.0);
    }

    #[test]
    fn target_spawns_in_central_band() {
        for seed in 0..20 {
            let g = CupidGame::new(CupidConfig::default(), 400.0, 600.0, GameRng::seeded(seed), 0.0);
            assert!((80.0..320.0).contains(&g.target.x));
            assert!((150.0..360.0).contains(&g.target.y));
        }
    }

    #[test]
    fn target_bounces_inside_walls() {
        let mut g = game();
        g.target = Vec2::new(1.0, 200.0);
        g.target_vel = Vec2::new(-120.0, 0.0);
        run(&mut g, 0.0, 5);
        assert!(g.target_vel.x > 0.0);
        assert!(g.target.x >= 0.0);
        assert!(g.target.x <= LOGICAL_WIDTH - g.target_size());
    }

    #[test]
    fn arrow_aimed_at_target_scores_and_three_hits_win() {
        let mut g = game();
        g.cfg.bob_amplitude = 0.0;
        let mut t = 0.0;
        g.tick(t);
        for _ in 0..3 {
            // Freeze the target and line the launcher up with it.
            g.target_vel = Vec2::ZERO;
            let c = g.target_center();
            let l = g.launcher_pos();
            g.set_launcher_angle((c.x - l.x).atan2(l.y - c.y).to_degrees());
            g.fire();
            t = run(&mut g, t, 60);
        }
        let events = g.drain_events();
        let hits = events.iter().filter(|e| matches!(e, GameEvent::Hit { .. })).count();
        assert_eq!(hits, 3);
        assert_eq!(events.last(), Some(&GameEvent::Win));
        assert_eq!(g.status(), GameStatus::Won);
        let s = g.state(t + 10_000.0);
        assert!(s.won && !s.time_up);
        assert_eq!(s.score, 3);
        assert!(s.time_left > 0.0, "timer frozen at win");
        assert_eq!(s.seconds_left, g.state(t + 20_000.0).seconds_left);
    }

    #[test]
    fn arrows_leaving_screen_are_dropped() {
        let mut g = game();
        g.target = Vec2::new(0.0, 0.0);
        g.target_vel = Vec2::ZERO;
        g.cfg.bob_amplitude = 0.0;
        g.set_launcher_angle(60.0);
        g.fire();
        assert_eq!(g.arrows().len(), 1);
        run(&mut g, 0.0, 120);
        assert!(g.arrows().is_empty());
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn time_up_fires_once_and_blocks_input() {
        let mut g = game();
        g.tick(0.0);
        g.tick(30_000.0);
        g.tick(30_100.0);
        assert_eq!(g.drain_events(), vec![GameEvent::TimeUp]);
        g.fire();
        assert!(g.arrows().is_empty());
        let s = g.state(40_000.0);
        assert!(s.time_up && !s.won);
        assert_eq!(s.time_left, 0.0);
        assert_eq!(s.seconds_left, 0);
    }

    #[test]
    fn hud_seconds_round_up() {
        let mut g = game();
        g.tick(0.0);
        assert_eq!(g.state(0.0).seconds_left, 30);
        assert_eq!(g.state(100.0).seconds_left, 30);
        assert_eq!(g.state(29_001.0).seconds_left, 1);
    }

    #[test]
    fn restart_resets_state() {
        let mut g = game();
        g.tick(0.0);
        g.tick(31_000.0);
        g.start(50_000.0);
        assert_eq!(g.status(), GameStatus::Playing);
        assert_eq!(g.state(50_000.0).time_left, 30.0);
        assert!(g.drain_events().is_empty());
    }
}
