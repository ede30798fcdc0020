// Content sanity checks on the built-in greeting configuration.

use std::collections::HashMap;

use valentine_games::GreetingConfig;
use valentine_games::calendar::{ICS_FILE_NAME, Invitation};
use valentine_games::config::PuzzleVariant;

#[test]
fn default_config_validates() {
    GreetingConfig::default().validate().expect("defaults are playable");
}

#[test]
fn puzzle_phrase_has_a_tile_per_letter() {
    let cfg = GreetingConfig::default();
    assert_eq!(cfg.puzzle.phrase, "WOULD YOU BE MY VALENTINE?");
    assert_eq!(cfg.puzzle.variant, PuzzleVariant::DragDrop);
    assert_eq!(cfg.puzzle.letter_count(), 22);
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in cfg.puzzle.phrase.chars().filter(|c| *c != ' ') {
        *counts.entry(c).or_default() += 1;
    }
    assert_eq!(counts[&'E'], 3);
    assert_eq!(counts[&'O'], 2);
}

#[test]
fn calendar_event_matches_reveal_text() {
    let inv = Invitation::default();
    let ics = inv.to_ics();
    assert!(inv.reveal_text().contains(&inv.location));
    assert!(ics.lines().any(|l| l.trim_end() == "SUMMARY:Valentine Date with Omar"));
    assert!(ics.contains("BEGIN:VEVENT") && ics.contains("END:VEVENT"));
    assert!(ICS_FILE_NAME.ends_with(".ics"));
}

#[cfg(feature = "serde_json")]
#[test]
fn json_config_overrides_selected_fields() {
    let cfg = GreetingConfig::from_json(
        r#"{ "recipient": "Sam", "sound": false, "puzzle": { "phrase": "be mine", "variant": "tap_next" } }"#,
    )
    .expect("valid json");
    assert_eq!(cfg.recipient, "Sam");
    assert!(!cfg.sound);
    assert_eq!(cfg.puzzle.variant, PuzzleVariant::TapNext);
    assert_eq!(cfg.puzzle.max_hints, 3);
    assert_eq!(cfg.cupid.hits_to_win, 3);
}
