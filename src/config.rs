//! Tunables for the three games and the content of the greeting.
//!
//! Defaults reproduce the shipped experience; a JSON document (feature
//! `serde_json`) may override any subset of fields.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::calendar::Invitation;
use crate::error::{GameError, Result};

/// Logical canvas size; the backing store scales this to the container.
pub const LOGICAL_WIDTH: f64 = 400.0;
pub const LOGICAL_HEIGHT: f64 = 600.0;
pub const MAX_CANVAS_SCALE: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct CupidConfig {
    pub hits_to_win: u32,
    pub duration_s: f64,
    pub target_size: f64,
    /// px/s
    pub target_speed_x: f64,
    pub target_speed_y: f64,
    /// Vertical bob, at a 600px tall canvas.
    pub bob_amplitude: f64,
    pub bob_freq_hz: f64,
    pub projectile_speed: f64,
    pub launcher_size: f64,
    pub launcher_bottom_pad: f64,
    pub angle_limit_deg: f64,
}

impl Default for CupidConfig {
    fn default() -> Self {
        Self {
            hits_to_win: 3,
            duration_s: 30.0,
            target_size: 72.0,
            target_speed_x: 120.0,
            target_speed_y: 0.0,
            bob_amplitude: 80.0,
            bob_freq_hz: 0.8,
            projectile_speed: 780.0,
            launcher_size: 56.0,
            launcher_bottom_pad: 14.0,
            angle_limit_deg: 85.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct KissesConfig {
    pub hits_to_win: u32,
    pub duration_s: f64,
    pub visible_min_ms: f64,
    pub visible_max_ms: f64,
    pub head_size: f64,
    /// Fraction of the canvas height covered by sand.
    pub sand_ratio: f64,
    pub projectile_speed: f64,
    pub combo_decay_ms: f64,
    pub first_spawn_min_ms: f64,
    pub first_spawn_max_ms: f64,
    pub respawn_min_ms: f64,
    pub respawn_max_ms: f64,
    pub hit_respawn_min_ms: f64,
    pub hit_respawn_max_ms: f64,
    pub float_text_ms: f64,
    /// Distance of the shooter above the bottom edge.
    pub shooter_offset: f64,
    pub shooter_size: f64,
}

impl Default for KissesConfig {
    fn default() -> Self {
        Self {
            hits_to_win: 8,
            duration_s: 20.0,
            visible_min_ms: 950.0,
            visible_max_ms: 1350.0,
            head_size: 64.0,
            sand_ratio: 1.0 / 3.0,
            projectile_speed: 450.0,
            combo_decay_ms: 1500.0,
            first_spawn_min_ms: 400.0,
            first_spawn_max_ms: 700.0,
            respawn_min_ms: 200.0,
            respawn_max_ms: 600.0,
            hit_respawn_min_ms: 250.0,
            hit_respawn_max_ms: 600.0,
            float_text_ms: 900.0,
            shooter_offset: 60.0,
            shooter_size: 52.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(rename_all = "snake_case"))]
pub enum PuzzleVariant {
    /// Drag letters from the tray into any slot.
    #[default]
    DragDrop,
    /// Tap the letter that belongs in the next empty slot.
    TapNext,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct PuzzleConfig {
    pub phrase: String,
    pub max_hints: u32,
    pub variant: PuzzleVariant,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            phrase: "WOULD YOU BE MY VALENTINE?".to_string(),
            max_hints: 3,
            variant: PuzzleVariant::DragDrop,
        }
    }
}

impl PuzzleConfig {
    /// Number of letters that have to be placed (everything but spaces).
    pub fn letter_count(&self) -> usize {
        self.phrase.chars().filter(|c| *c != ' ').count()
    }
}

/// Image paths; every image is optional at runtime and falls back to a
/// coloured circle when it fails to load.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct Portraits {
    pub target: String,
    pub player: String,
    pub reveal: String,
}

impl Default for Portraits {
    fn default() -> Self {
        Self {
            target: "/images/omar.jpg".to_string(),
            player: "/images/alex.jpeg".to_string(),
            reveal: "/images/omarandalex.jpeg".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GreetingConfig {
    pub recipient: String,
    /// Signs the reveal card.
    pub sender: String,
    /// Landing card text under the greeting.
    pub blurb: String,
    pub cupid: CupidConfig,
    pub kisses: KissesConfig,
    pub puzzle: PuzzleConfig,
    pub invitation: Invitation,
    pub portraits: Portraits,
    /// Spotify track id for the music player; `None` hides the player.
    pub music_track: Option<String>,
    pub music_label: String,
    pub sound: bool,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            recipient: "Alex".to_string(),
            sender: "Omar".to_string(),
            blurb: "I made you something… win all 3 games to reveal the surprise.".to_string(),
            cupid: CupidConfig::default(),
            kisses: KissesConfig::default(),
            puzzle: PuzzleConfig::default(),
            invitation: Invitation::default(),
            portraits: Portraits::default(),
            music_track: Some("3S0OXQeoh0w6AY8WQVckRW".to_string()),
            music_label: "I'm Yours — Jason Mraz".to_string(),
            sound: true,
        }
    }
}

impl GreetingConfig {
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: GreetingConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn greeting(&self) -> String {
        format!("Hi {} 💘", self.recipient)
    }

    pub fn signature(&self) -> String {
        format!("Love, {}", self.sender)
    }

    pub fn validate(&self) -> Result<()> {
        let c = &self.cupid;
        ensure(c.hits_to_win > 0, "cupid.hits_to_win must be > 0")?;
        ensure(c.duration_s > 0.0, "cupid.duration_s must be > 0")?;
        ensure(c.target_size > 0.0, "cupid.target_size must be > 0")?;
        ensure(c.projectile_speed > 0.0, "cupid.projectile_speed must be > 0")?;
        ensure(
            c.angle_limit_deg > 0.0 && c.angle_limit_deg < 90.0,
            "cupid.angle_limit_deg must be in (0, 90)",
        )?;

        let k = &self.kisses;
        ensure(k.hits_to_win > 0, "kisses.hits_to_win must be > 0")?;
        ensure(k.duration_s > 0.0, "kisses.duration_s must be > 0")?;
        ensure(k.head_size > 0.0, "kisses.head_size must be > 0")?;
        ensure(k.projectile_speed > 0.0, "kisses.projectile_speed must be > 0")?;
        ensure(
            k.sand_ratio > 0.0 && k.sand_ratio < 1.0,
            "kisses.sand_ratio must be in (0, 1)",
        )?;
        for (lo, hi, name) in [
            (k.visible_min_ms, k.visible_max_ms, "visible"),
            (k.first_spawn_min_ms, k.first_spawn_max_ms, "first_spawn"),
            (k.respawn_min_ms, k.respawn_max_ms, "respawn"),
            (k.hit_respawn_min_ms, k.hit_respawn_max_ms, "hit_respawn"),
        ] {
            if lo < 0.0 || lo > hi {
                return Err(GameError::Config(format!(
                    "kisses.{name}_min_ms must be >= 0 and <= {name}_max_ms"
                )));
            }
        }

        let p = &self.puzzle;
        ensure(p.letter_count() > 0, "puzzle.phrase must contain letters")?;
        ensure(
            p.max_hints as usize <= p.letter_count(),
            "puzzle.max_hints exceeds the number of letters",
        )?;
        Ok(())
    }
}

fn ensure(cond: bool, msg: &str) -> Result<()> {
    if cond { Ok(()) } else { Err(GameError::Config(msg.to_string())) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GreetingConfig::default().validate().expect("default config");
    }

    #[test]
    fn rejects_zero_hits_and_inverted_windows() {
        let mut cfg = GreetingConfig::default();
        cfg.cupid.hits_to_win = 0;
        assert!(matches!(cfg.validate(), Err(GameError::Config(_))));

        let mut cfg = GreetingConfig::default();
        cfg.kisses.visible_min_ms = 2000.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("visible_min_ms"));
    }

    #[test]
    fn rejects_phrase_without_letters() {
        let mut cfg = GreetingConfig::default();
        cfg.puzzle.phrase = "   ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn card_texts_use_the_names() {
        let cfg = GreetingConfig { recipient: "Sam".into(), sender: "Kai".into(), ..GreetingConfig::default() };
        assert_eq!(cfg.greeting(), "Hi Sam 💘");
        assert_eq!(cfg.signature(), "Love, Kai");
        assert!(cfg.blurb.contains("3 games"));
    }

    #[test]
    fn letter_count_skips_spaces() {
        assert_eq!(PuzzleConfig::default().letter_count(), 22);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_only_given_fields() {
        let cfg = GreetingConfig::from_json(
            r#"{ "recipient": "Sam", "kisses": { "hits_to_win": 5 }, "puzzle": { "variant": "tap_next" } }"#,
        )
        .expect("parse");
        assert_eq!(cfg.recipient, "Sam");
        assert_eq!(cfg.kisses.hits_to_win, 5);
        assert_eq!(cfg.kisses.duration_s, 20.0);
        assert_eq!(cfg.puzzle.variant, PuzzleVariant::TapNext);
        assert_eq!(cfg.cupid, CupidConfig::default());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_errors_map_to_config_error() {
        assert!(matches!(GreetingConfig::from_json("{ nope"), Err(GameError::Config(_))));
        assert!(matches!(
            GreetingConfig::from_json(r#"{ "cupid": { "duration_s": 0 } }"#),
            Err(GameError::Config(_))
        ));
    }
}
