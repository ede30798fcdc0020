//! Decorative hearts: the slow background drift and the reveal fireworks.
//!
//! Motion constants are per 60 fps frame; `step` scales them by `dt * 60`.

use std::f64::consts::TAU;

use crate::rng::GameRng;

pub const FLOAT_COUNT: usize = 25;
const FLOAT_SIZE: (f64, f64) = (8.0, 20.0);
const FLOAT_SPEED: f64 = 0.15;

pub const MAX_ROCKETS: usize = 7;
pub const BURST_HEARTS: usize = 42;
const ROCKET_INTERVAL_MS: f64 = 520.0;
pub const FIREWORKS_MS: f64 = 12_000.0;
const GRAVITY: f64 = 0.28;
const DRAG: f64 = 0.98;

fn frames(dt: f64) -> f64 {
    dt * 60.0
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatHeart {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub size: f64,
    pub hue: f64,
}

/// Background hearts drifting upward, wrapping around the window edges.
pub struct FloatingHearts {
    hearts: Vec<FloatHeart>,
    width: f64,
    height: f64,
}

impl FloatingHearts {
    pub fn new(rng: &mut GameRng, width: f64, height: f64) -> Self {
        let hearts = (0..FLOAT_COUNT)
            .map(|_| FloatHeart {
                x: rng.range(0.0, width),
                y: rng.range(0.0, height),
                vx: rng.range(-0.5, 0.5) * FLOAT_SPEED,
                vy: -FLOAT_SPEED - rng.range(0.0, FLOAT_SPEED),
                size: rng.range(FLOAT_SIZE.0, FLOAT_SIZE.1),
                hue: rng.range(340.0, 370.0),
            })
            .collect();
        Self { hearts, width, height }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn hearts(&self) -> &[FloatHeart] {
        &self.hearts
    }

    pub fn step(&mut self, dt: f64) {
        let f = frames(dt);
        let (w, h) = (self.width, self.height);
        for p in &mut self.hearts {
            p.x += p.vx * f;
            p.y += p.vy * f;
            if p.x < -p.size {
                p.x = w + p.size;
            } else if p.x > w + p.size {
                p.x = -p.size;
            }
            if p.y < -p.size {
                p.y = h + p.size;
            } else if p.y > h + p.size {
                p.y = -p.size;
            }
        }
    }

    /// Twinkle between 0.2 and 0.45.
    pub fn alpha(heart: &FloatHeart, now_ms: f64) -> f64 {
        0.2 + 0.25 * (now_ms * 0.002 + heart.x).sin().powi(2)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstHeart {
    pub x: f64,
    pub y: f64,
    vx: f64,
    vy: f64,
    pub size: f64,
    pub hue: f64,
    pub life: f64,
    decay: f64,
}

#[derive(Clone, Debug)]
pub struct Rocket {
    pub x: f64,
    pub y: f64,
    vy: f64,
    burst_at: f64,
    pub burst: bool,
    pub hearts: Vec<BurstHeart>,
}

/// Rockets rise from below the screen and burst into hearts.
pub struct Fireworks {
    rng: GameRng,
    width: f64,
    height: f64,
    rise_speed: f64,
    rockets: Vec<Rocket>,
    started_ms: f64,
    last_spawn_ms: f64,
}

impl Fireworks {
    pub fn new(mut rng: GameRng, width: f64, height: f64, now: f64) -> Self {
        let rise_speed = -11.0 - rng.range(0.0, 4.0);
        let mut fw = Self {
            rng,
            width,
            height,
            rise_speed,
            rockets: Vec::with_capacity(MAX_ROCKETS),
            started_ms: now,
            last_spawn_ms: now,
        };
        fw.spawn_rocket();
        fw
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn active(&self, now: f64) -> bool {
        now - self.started_ms < FIREWORKS_MS
    }

    fn spawn_rocket(&mut self) {
        let (w, h) = (self.width, self.height);
        let rocket = Rocket {
            x: w * 0.15 + self.rng.range(0.0, w * 0.7),
            y: h + 20.0,
            vy: self.rise_speed - self.rng.range(0.0, 2.0),
            burst_at: h * (0.25 + self.rng.range(0.0, 0.35)),
            burst: false,
            hearts: Vec::new(),
        };
        self.rockets.push(rocket);
    }

    fn burst(rng: &mut GameRng, r: &mut Rocket) {
        r.burst = true;
        r.hearts = (0..BURST_HEARTS)
            .map(|j| {
                let angle = TAU * j as f64 / BURST_HEARTS as f64 + rng.range(0.0, 0.8);
                let speed = 5.0 + rng.range(0.0, 10.0);
                BurstHeart {
                    x: r.x,
                    y: r.y,
                    vx: angle.cos() * speed,
                    vy: angle.sin() * speed - 2.0,
                    size: 18.0 + rng.range(0.0, 28.0),
                    hue: 340.0 + rng.range(0.0, 25.0),
                    life: 1.0,
                    decay: 0.01 + rng.range(0.0, 0.008),
                }
            })
            .collect();
    }

    pub fn step(&mut self, now: f64, dt: f64) {
        if !self.active(now) {
            self.rockets.clear();
            return;
        }
        if now - self.last_spawn_ms > ROCKET_INTERVAL_MS && self.rockets.len() < MAX_ROCKETS {
            self.spawn_rocket();
            self.last_spawn_ms = now;
        }
        let f = frames(dt);
        let drag = DRAG.powf(f);
        for r in &mut self.rockets {
            if !r.burst {
                r.y += r.vy * f;
                if r.y <= r.burst_at {
                    Self::burst(&mut self.rng, r);
                }
                continue;
            }
            for p in &mut r.hearts {
                p.x += p.vx * f;
                p.y += p.vy * f;
                p.vy += GRAVITY * f;
                p.vx *= drag;
                p.life -= p.decay * f;
            }
            r.hearts.retain(|p| p.life > 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn floating_hearts_stay_in_ranges_and_wrap() {
        let mut rng = GameRng::seeded(3);
        let mut bg = FloatingHearts::new(&mut rng, 800.0, 600.0);
        assert_eq!(bg.hearts().len(), FLOAT_COUNT);
        for h in bg.hearts() {
            assert!((8.0..20.0).contains(&h.size));
            assert!((340.0..370.0).contains(&h.hue));
            assert!(h.vy < 0.0, "drifts upward");
        }
        // ten simulated minutes: everything stays within one size of the edges
        for _ in 0..36_000 {
            bg.step(FRAME);
        }
        for h in bg.hearts() {
            assert!(h.x >= -h.size - 1.0 && h.x <= 800.0 + h.size + 1.0);
            assert!(h.y >= -h.size - 1.0 && h.y <= 600.0 + h.size + 1.0);
        }
    }

    #[test]
    fn twinkle_alpha_bounds() {
        let mut rng = GameRng::seeded(1);
        let bg = FloatingHearts::new(&mut rng, 100.0, 100.0);
        for t in [0.0, 123.0, 999.0, 5000.0] {
            let a = FloatingHearts::alpha(&bg.hearts()[0], t);
            assert!((0.2..=0.45).contains(&a));
        }
    }

    #[test]
    fn rockets_spawn_on_interval_up_to_cap() {
        let mut fw = Fireworks::new(GameRng::seeded(9), 400.0, 800.0, 0.0);
        assert_eq!(fw.rockets().len(), 1);
        let mut t = 0.0;
        while t < 10_000.0 {
            t += 1000.0 * FRAME;
            fw.step(t, FRAME);
        }
        assert_eq!(fw.rockets().len(), MAX_ROCKETS);
    }

    #[test]
    fn rocket_bursts_into_hearts_that_fade() {
        let mut fw = Fireworks::new(GameRng::seeded(5), 400.0, 800.0, 0.0);
        let mut t = 0.0;
        // rising 11-17 px/frame over at most 820 px: well under 90 frames
        for _ in 0..90 {
            t += 1000.0 * FRAME;
            fw.step(t, FRAME);
        }
        let first = &fw.rockets()[0];
        assert!(first.burst);
        assert!(!first.hearts.is_empty() && first.hearts.len() <= BURST_HEARTS);
        for h in &first.hearts {
            assert!(h.life > 0.0 && h.life <= 1.0);
            assert!((18.0..46.0).contains(&h.size));
        }
        // decay >= 0.01/frame: gone after 100 more frames
        for _ in 0..101 {
            t += 1000.0 * FRAME;
            fw.step(t, FRAME);
        }
        assert!(fw.rockets()[0].hearts.is_empty());
    }

    #[test]
    fn fireworks_stop_after_twelve_seconds() {
        let mut fw = Fireworks::new(GameRng::seeded(2), 400.0, 800.0, 1000.0);
        assert!(fw.active(12_999.0));
        fw.step(13_000.0, FRAME);
        assert!(!fw.active(13_000.0));
        assert!(fw.rockets().is_empty());
    }
}
