//! Screen flow: landing, the three games in order, then the reveal.
//!
//! The router never touches the DOM or the games directly. It consumes game
//! events and button presses and hands back [`Effect`]s for the shell to
//! carry out.

use crate::games::GameEvent;

pub const GAME_COUNT: u8 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Landing,
    Game1,
    Game2,
    Game3,
    Reveal,
}

impl Screen {
    pub fn game_number(self) -> Option<u8> {
        match self {
            Screen::Game1 => Some(1),
            Screen::Game2 => Some(2),
            Screen::Game3 => Some(3),
            Screen::Landing | Screen::Reveal => None,
        }
    }

    fn for_game(n: u8) -> Screen {
        match n {
            1 => Screen::Game1,
            2 => Screen::Game2,
            _ => Screen::Game3,
        }
    }

    pub fn is_game(self) -> bool {
        self.game_number().is_some()
    }

    /// Line shown above the canvas while a game runs.
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Screen::Game1 => Some("Throw a heart arrow into my flying face"),
            Screen::Game2 => Some("Shoot kisses to my head popping up from the sand"),
            Screen::Game3 => Some("Guess the phrase by putting characters in play"),
            Screen::Landing | Screen::Reveal => None,
        }
    }

    /// Name under the padlock on the landing card.
    pub fn game_title(n: u8) -> &'static str {
        match n {
            1 => "Cupids",
            2 => "Kisses",
            _ => "Letters",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    /// Game `n` was won; pressing the button moves on.
    Win(u8),
    /// Game `n` ran out of time; pressing the button retries it.
    TimeUp(u8),
    /// "Text me" card on the reveal screen.
    Acceptance,
}

impl Overlay {
    pub fn message(self) -> &'static str {
        match self {
            Overlay::Win(1) => "You got me 💘",
            Overlay::Win(_) => "Kiss mastery unlocked 😘",
            Overlay::TimeUp(_) => "Time's up! Try again.",
            Overlay::Acceptance => "Text me “I'm in 💖”",
        }
    }

    pub fn button_text(self) -> &'static str {
        match self {
            Overlay::Win(1) => "Next Game",
            Overlay::Win(_) => "Final Game",
            Overlay::TimeUp(_) => "Try Again",
            Overlay::Acceptance => "OK",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// (Re)create game `n` and start its timer.
    StartGame(u8),
    PlayPop,
    PlaySparkle,
    /// Entered the reveal screen.
    StartFireworks,
    DownloadCalendar,
    ShowAcceptance,
}

#[derive(Debug, Default)]
pub struct Router {
    screen: Screen,
    progress: u8,
    overlay: Option<Overlay>,
    calendar_added: bool,
}

impl Router {
    pub fn new() -> Self {
        Self { progress: 1, ..Self::default() }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn progress_label(&self) -> String {
        format!("Game {}/{}", self.progress, GAME_COUNT)
    }

    pub fn calendar_added(&self) -> bool {
        self.calendar_added
    }

    pub fn calendar_button_text(&self) -> &'static str {
        if self.calendar_added { "Added!" } else { "Add to Calendar" }
    }

    /// Restart is offered only while a game is on screen.
    pub fn can_restart(&self) -> bool {
        self.screen.is_game()
    }

    /// The active game should be ticked (no overlay freezing it).
    pub fn game_running(&self) -> bool {
        self.screen.is_game() && self.overlay.is_none()
    }

    /// "Start the Challenge".
    pub fn start(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Landing {
            log::debug!("router: start ignored on {:?}", self.screen);
            return Vec::new();
        }
        self.enter_game(1)
    }

    fn enter_game(&mut self, n: u8) -> Vec<Effect> {
        self.screen = Screen::for_game(n);
        self.progress = n;
        self.overlay = None;
        log::info!("router: entering game {n}");
        vec![Effect::StartGame(n)]
    }

    pub fn on_game_event(&mut self, ev: &GameEvent) -> Vec<Effect> {
        let Some(n) = self.screen.game_number() else {
            return Vec::new();
        };
        match ev {
            GameEvent::Hit { .. } => vec![Effect::PlayPop],
            GameEvent::Win if n < GAME_COUNT => {
                self.overlay = Some(Overlay::Win(n));
                vec![Effect::PlaySparkle]
            }
            GameEvent::Win => {
                self.screen = Screen::Reveal;
                self.overlay = None;
                log::info!("router: all games won, revealing");
                vec![Effect::PlaySparkle, Effect::StartFireworks]
            }
            GameEvent::TimeUp => {
                self.overlay = Some(Overlay::TimeUp(n));
                Vec::new()
            }
            GameEvent::Placed { .. } | GameEvent::Rejected | GameEvent::Hint { .. } => Vec::new(),
        }
    }

    /// The overlay's single button.
    pub fn overlay_button(&mut self) -> Vec<Effect> {
        match self.overlay {
            Some(Overlay::Win(n)) => self.enter_game(n + 1),
            Some(Overlay::TimeUp(n)) => self.enter_game(n),
            Some(Overlay::Acceptance) => {
                self.overlay = None;
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Clicking the dimmed backdrop only dismisses the acceptance card.
    pub fn backdrop_click(&mut self) {
        if self.overlay == Some(Overlay::Acceptance) {
            self.overlay = None;
        }
    }

    pub fn restart(&mut self) -> Vec<Effect> {
        if !self.can_restart() {
            return Vec::new();
        }
        self.screen = Screen::Landing;
        self.progress = 1;
        self.overlay = None;
        log::info!("router: restart");
        Vec::new()
    }

    /// "I'm In 💖" on the reveal screen.
    pub fn accept(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Reveal {
            return Vec::new();
        }
        self.overlay = Some(Overlay::Acceptance);
        vec![Effect::ShowAcceptance]
    }

    pub fn add_to_calendar(&mut self) -> Vec<Effect> {
        if self.screen != Screen::Reveal {
            return Vec::new();
        }
        self.calendar_added = true;
        vec![Effect::DownloadCalendar]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn win_through(r: &mut Router, n: u8) {
        assert_eq!(r.screen().game_number(), Some(n));
        r.on_game_event(&GameEvent::Win);
    }

    #[test]
    fn starts_on_landing_with_progress_one() {
        let r = Router::new();
        assert_eq!(r.screen(), Screen::Landing);
        assert_eq!(r.progress_label(), "Game 1/3");
        assert!(!r.can_restart());
    }

    #[test]
    fn sequential_wins_reach_reveal() {
        let mut r = Router::new();
        assert_eq!(r.start(), vec![Effect::StartGame(1)]);

        win_through(&mut r, 1);
        assert_eq!(r.overlay(), Some(Overlay::Win(1)));
        assert_eq!(r.overlay().map(Overlay::message), Some("You got me 💘"));
        assert!(!r.game_running());
        assert_eq!(r.overlay_button(), vec![Effect::StartGame(2)]);
        assert_eq!(r.progress_label(), "Game 2/3");

        win_through(&mut r, 2);
        assert_eq!(r.overlay().map(Overlay::button_text), Some("Final Game"));
        assert_eq!(r.overlay_button(), vec![Effect::StartGame(3)]);

        let fx = r.on_game_event(&GameEvent::Win);
        assert_eq!(r.screen(), Screen::Reveal);
        assert!(fx.contains(&Effect::StartFireworks));
        assert_eq!(r.overlay(), None);
    }

    #[test]
    fn hits_play_pop_and_puzzle_moves_are_silent() {
        let mut r = Router::new();
        r.start();
        assert_eq!(r.on_game_event(&GameEvent::Hit { x: 0.0, y: 0.0, combo: 2 }), vec![Effect::PlayPop]);
        assert!(r.on_game_event(&GameEvent::Placed { slot: 0 }).is_empty());
    }

    #[test]
    fn events_on_landing_are_ignored() {
        let mut r = Router::new();
        assert!(r.on_game_event(&GameEvent::Win).is_empty());
        assert_eq!(r.screen(), Screen::Landing);
    }

    #[test]
    fn time_up_offers_retry_of_same_game() {
        let mut r = Router::new();
        r.start();
        r.on_game_event(&GameEvent::Win);
        r.overlay_button();
        r.on_game_event(&GameEvent::TimeUp);
        assert_eq!(r.overlay(), Some(Overlay::TimeUp(2)));
        assert_eq!(r.overlay().map(Overlay::message), Some("Time's up! Try again."));
        assert_eq!(r.overlay_button(), vec![Effect::StartGame(2)]);
        assert!(r.game_running());
    }

    #[test]
    fn restart_returns_to_landing() {
        let mut r = Router::new();
        r.start();
        r.on_game_event(&GameEvent::Win);
        r.overlay_button();
        assert!(r.can_restart());
        r.restart();
        assert_eq!(r.screen(), Screen::Landing);
        assert_eq!(r.progress(), 1);
        assert_eq!(r.overlay(), None);
        assert_eq!(r.start(), vec![Effect::StartGame(1)]);
    }

    #[test]
    fn reveal_buttons() {
        let mut r = Router::new();
        assert!(r.add_to_calendar().is_empty(), "not on reveal yet");
        r.start();
        for n in 1..=3 {
            win_through(&mut r, n);
            r.overlay_button();
        }
        assert_eq!(r.screen(), Screen::Reveal);
        assert!(!r.can_restart());
        assert_eq!(r.calendar_button_text(), "Add to Calendar");
        assert_eq!(r.add_to_calendar(), vec![Effect::DownloadCalendar]);
        assert_eq!(r.calendar_button_text(), "Added!");
        assert_eq!(r.accept(), vec![Effect::ShowAcceptance]);
        r.backdrop_click();
        assert_eq!(r.overlay(), None);
        r.accept();
        assert!(r.overlay_button().is_empty());
        assert_eq!(r.overlay(), None);
    }
}
