//! The three mini-games.
//!
//! Each game is a self-contained simulation: it owns its timer, its entities
//! and its hit-testing, is advanced by [`MiniGame::tick`] once per animation
//! frame, and queues [`GameEvent`]s that the caller drains after every frame
//! or input. None of them touch the DOM; rendering lives in `crate::render`.

use crate::geom::Vec2;

pub mod cupid;
pub mod kisses;
pub mod puzzle;

pub use cupid::CupidGame;
pub use kisses::KissesGame;
pub use puzzle::PuzzleGame;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// A projectile struck the target. `combo` is 1 for games without combos.
    Hit { x: f64, y: f64, combo: u32 },
    Win,
    TimeUp,
    /// A letter landed in a slot.
    Placed { slot: usize },
    /// Wrong letter in tap mode, or a drop that was refused.
    Rejected,
    Hint { slot: usize },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    TimeUp,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Playing
    }
}

/// Frame/pointer driven game loop. Pointer positions are in logical canvas
/// pixels, timestamps in `performance.now()` milliseconds.
pub trait MiniGame {
    fn tick(&mut self, now: f64);
    fn pointer_down(&mut self, _p: Vec2, _now: f64) {}
    fn pointer_move(&mut self, _p: Vec2, _now: f64) {}
    fn pointer_up(&mut self, _p: Vec2, _now: f64) {}
    fn status(&self) -> GameStatus;
    fn drain_events(&mut self) -> Vec<GameEvent>;
}

/// The game currently on screen.
pub enum ActiveGame {
    Cupid(CupidGame),
    Kisses(KissesGame),
    Puzzle(PuzzleGame),
}

impl ActiveGame {
    fn inner(&mut self) -> &mut dyn MiniGame {
        match self {
            ActiveGame::Cupid(g) => g,
            ActiveGame::Kisses(g) => g,
            ActiveGame::Puzzle(g) => g,
        }
    }
}

impl MiniGame for ActiveGame {
    fn tick(&mut self, now: f64) {
        self.inner().tick(now);
    }

    fn pointer_down(&mut self, p: Vec2, now: f64) {
        self.inner().pointer_down(p, now);
    }

    fn pointer_move(&mut self, p: Vec2, now: f64) {
        self.inner().pointer_move(p, now);
    }

    fn pointer_up(&mut self, p: Vec2, now: f64) {
        self.inner().pointer_up(p, now);
    }

    fn status(&self) -> GameStatus {
        match self {
            ActiveGame::Cupid(g) => g.status(),
            ActiveGame::Kisses(g) => g.status(),
            ActiveGame::Puzzle(g) => g.status(),
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.inner().drain_events()
    }
}

/// Shared bookkeeping for a timed run: status transitions and the event queue.
/// Guarantees `Win`/`TimeUp` are queued at most once and never both.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    status: GameStatus,
    events: Vec<GameEvent>,
}

impl Outcome {
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn push(&mut self, ev: GameEvent) {
        self.events.push(ev);
    }

    pub fn win(&mut self) {
        if self.playing() {
            self.status = GameStatus::Won;
            self.events.push(GameEvent::Win);
            log::info!("game won");
        }
    }

    pub fn time_up(&mut self) {
        if self.playing() {
            self.status = GameStatus::TimeUp;
            self.events.push(GameEvent::TimeUp);
            log::info!("time up");
        }
    }

    pub fn reset(&mut self) {
        self.status = GameStatus::Playing;
        self.events.clear();
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Straight-line projectile shared by the two shooting games.
#[derive(Clone, Copy, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    /// px/s
    pub vel: Vec2,
}

impl Projectile {
    pub fn step(&mut self, dt: f64) {
        self.pos += self.vel * dt;
    }

    pub fn heading(&self) -> f64 {
        self.vel.y.atan2(self.vel.x)
    }
}
