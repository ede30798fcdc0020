//! Game 3: assemble the phrase from a shuffled tray of letters.
//!
//! Two variants share the same board: drag-and-drop (any letter into any
//! slot, letters can be moved between slots or back to the tray) and
//! tap-next (tap the letter that belongs in the first empty slot).

use crate::config::{PuzzleConfig, PuzzleVariant};
use crate::geom::{Rect, Vec2};
use crate::rng::GameRng;

use super::{GameEvent, GameStatus, MiniGame, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub expected: char,
    pub letter: Option<char>,
}

impl Slot {
    pub fn is_space(&self) -> bool {
        self.expected == ' '
    }

    pub fn is_correct(&self) -> bool {
        self.is_space() || self.letter == Some(self.expected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragSource {
    Tray(usize),
    Slot(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Drag {
    pub source: DragSource,
    pub letter: char,
    pub pos: Vec2,
}

pub struct PuzzleGame {
    cfg: PuzzleConfig,
    width: f64,
    rng: GameRng,
    slots: Vec<Slot>,
    tray: Vec<Option<char>>,
    hints_used: u32,
    outcome: Outcome,
    drag: Option<Drag>,
    last_reject_ms: Option<f64>,
}

impl PuzzleGame {
    pub fn new(cfg: PuzzleConfig, width: f64, rng: GameRng) -> Self {
        let mut game = Self {
            cfg,
            width,
            rng,
            slots: Vec::new(),
            tray: Vec::new(),
            hints_used: 0,
            outcome: Outcome::default(),
            drag: None,
            last_reject_ms: None,
        };
        game.start();
        game
    }

    pub fn start(&mut self) {
        let phrase: Vec<char> = self.cfg.phrase.to_uppercase().chars().collect();
        self.slots = phrase
            .iter()
            .map(|&c| Slot { expected: c, letter: None })
            .collect();
        let mut letters: Vec<char> = phrase.into_iter().filter(|c| *c != ' ').collect();
        self.rng.shuffle(&mut letters);
        self.tray = letters.into_iter().map(Some).collect();
        self.hints_used = 0;
        self.drag = None;
        self.last_reject_ms = None;
        self.outcome.reset();
    }

    pub fn variant(&self) -> PuzzleVariant {
        self.cfg.variant
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn tray(&self) -> &[Option<char>] {
        &self.tray
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.drag.as_ref()
    }

    pub fn hints_left(&self) -> u32 {
        self.cfg.max_hints.saturating_sub(self.hints_used)
    }

    pub fn last_reject_ms(&self) -> Option<f64> {
        self.last_reject_ms
    }

    pub fn is_solved(&self) -> bool {
        self.slots.iter().all(Slot::is_correct) && self.tray.iter().all(Option::is_none)
    }

    /// Move a tray letter into a slot. A letter already sitting in that slot
    /// goes back to the tray.
    pub fn place_from_tray(&mut self, tray_idx: usize, slot_idx: usize) -> bool {
        if !self.outcome.playing() || !self.is_open_slot(slot_idx) {
            return false;
        }
        let Some(letter) = self.tray.get(tray_idx).copied().flatten() else {
            return false;
        };
        self.tray[tray_idx] = None;
        if let Some(displaced) = self.slots[slot_idx].letter.replace(letter.to_ascii_uppercase()) {
            self.push_to_tray(displaced);
        }
        self.placed(slot_idx);
        true
    }

    /// Move a placed letter to another slot, swapping if the target is taken.
    pub fn move_between_slots(&mut self, from: usize, to: usize) -> bool {
        if !self.outcome.playing() || from == to || !self.is_open_slot(from) || !self.is_open_slot(to) {
            return false;
        }
        let Some(letter) = self.slots[from].letter else {
            return false;
        };
        self.slots[from].letter = self.slots[to].letter;
        self.slots[to].letter = Some(letter);
        self.placed(to);
        true
    }

    pub fn return_to_tray(&mut self, slot_idx: usize) -> bool {
        if !self.outcome.playing() || !self.is_open_slot(slot_idx) {
            return false;
        }
        match self.slots[slot_idx].letter.take() {
            Some(letter) => {
                self.push_to_tray(letter);
                true
            }
            None => false,
        }
    }

    /// Tap-next variant: accept the tapped letter only if it belongs in the
    /// first empty slot.
    pub fn tap_tray(&mut self, tray_idx: usize, now: f64) -> bool {
        if !self.outcome.playing() {
            return false;
        }
        let Some(letter) = self.tray.get(tray_idx).copied().flatten() else {
            return false;
        };
        let next = self.slots.iter().position(|s| !s.is_space() && s.letter.is_none());
        match next {
            Some(slot_idx) if self.slots[slot_idx].expected == letter => {
                self.tray[tray_idx] = None;
                self.slots[slot_idx].letter = Some(letter);
                self.placed(slot_idx);
                true
            }
            _ => {
                self.last_reject_ms = Some(now);
                self.outcome.push(GameEvent::Rejected);
                false
            }
        }
    }

    /// Reveal one random empty slot whose letter is still in the tray.
    pub fn use_hint(&mut self) -> Option<usize> {
        if !self.outcome.playing() || self.hints_left() == 0 {
            return None;
        }
        let candidates: Vec<(usize, usize)> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_space() && s.letter.is_none())
            .filter_map(|(i, s)| self.tray.iter().position(|t| *t == Some(s.expected)).map(|t| (i, t)))
            .collect();
        let (slot_idx, tray_idx) = candidates[self.rng.index(candidates.len())?];
        self.tray[tray_idx] = None;
        self.slots[slot_idx].letter = Some(self.slots[slot_idx].expected);
        self.hints_used += 1;
        self.outcome.push(GameEvent::Hint { slot: slot_idx });
        log::debug!("puzzle: hint revealed slot {slot_idx}, {} left", self.hints_left());
        self.check_win();
        Some(slot_idx)
    }

    pub fn layout(&self) -> PuzzleLayout {
        PuzzleLayout::compute(&self.slots, &self.tray, self.width)
    }

    fn is_open_slot(&self, idx: usize) -> bool {
        self.slots.get(idx).is_some_and(|s| !s.is_space())
    }

    fn push_to_tray(&mut self, letter: char) {
        self.tray.retain(Option::is_some);
        self.tray.push(Some(letter));
    }

    fn placed(&mut self, slot: usize) {
        self.outcome.push(GameEvent::Placed { slot });
        self.check_win();
    }

    fn check_win(&mut self) {
        if self.is_solved() {
            self.outcome.win();
        }
    }
}

impl MiniGame for PuzzleGame {
    fn tick(&mut self, _now: f64) {}

    fn pointer_down(&mut self, p: Vec2, now: f64) {
        if !self.outcome.playing() {
            return;
        }
        let layout = self.layout();
        if layout.hint_button.contains(p) {
            if self.use_hint().is_none() {
                self.outcome.push(GameEvent::Rejected);
            }
            return;
        }
        if let Some(tray_idx) = layout.tray_at(p) {
            match self.cfg.variant {
                PuzzleVariant::TapNext => {
                    self.tap_tray(tray_idx, now);
                }
                PuzzleVariant::DragDrop => {
                    if let Some(letter) = self.tray[tray_idx] {
                        self.drag = Some(Drag { source: DragSource::Tray(tray_idx), letter, pos: p });
                    }
                }
            }
            return;
        }
        if self.cfg.variant == PuzzleVariant::DragDrop {
            if let Some(slot_idx) = layout.slot_at(p) {
                if let Some(letter) = self.slots[slot_idx].letter {
                    self.drag = Some(Drag { source: DragSource::Slot(slot_idx), letter, pos: p });
                }
            }
        }
    }

    fn pointer_move(&mut self, p: Vec2, _now: f64) {
        if let Some(drag) = self.drag.as_mut() {
            drag.pos = p;
        }
    }

    fn pointer_up(&mut self, p: Vec2, _now: f64) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let layout = self.layout();
        let target_slot = layout.slot_at(p);
        match (drag.source, target_slot) {
            (DragSource::Tray(t), Some(s)) => {
                self.place_from_tray(t, s);
            }
            (DragSource::Slot(from), Some(to)) => {
                self.move_between_slots(from, to);
            }
            (DragSource::Slot(from), None) if layout.tray_area.contains(p) => {
                self.return_to_tray(from);
            }
            _ => log::debug!("puzzle: drop cancelled"),
        }
    }

    fn status(&self) -> GameStatus {
        self.outcome.status()
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.outcome.drain()
    }
}

// --- Layout ------------------------------------------------------------------

pub const SLOT_W: f64 = 28.0;
pub const SPACE_W: f64 = 12.0;
pub const SLOT_H: f64 = 36.0;
pub const SLOT_GAP: f64 = 4.0;
pub const TILE_W: f64 = 32.0;
pub const TILE_H: f64 = 40.0;
pub const TILE_GAP: f64 = 8.0;
const PAD: f64 = 16.0;
const SLOTS_TOP: f64 = 130.0;
const ROW_GAP: f64 = 8.0;
const SECTION_GAP: f64 = 36.0;

/// Screen rectangles for slots, visible tray tiles and the hint button.
/// Slot rects are `None` for spaces that fall on a line break.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleLayout {
    pub slots: Vec<Option<Rect>>,
    /// (tray index, rect) for every non-empty tray entry, in tray order.
    pub tiles: Vec<(usize, Rect)>,
    pub tray_area: Rect,
    pub hint_button: Rect,
}

impl PuzzleLayout {
    pub fn compute(slots: &[Slot], tray: &[Option<char>], width: f64) -> Self {
        let max_row = width - PAD * 2.0;

        // Break the phrase into words so a word never splits across rows.
        let mut words: Vec<Vec<usize>> = vec![Vec::new()];
        for (i, s) in slots.iter().enumerate() {
            if s.is_space() {
                words.push(Vec::new());
            } else if let Some(w) = words.last_mut() {
                w.push(i);
            }
        }
        let word_width = |w: &Vec<usize>| -> f64 {
            w.len() as f64 * SLOT_W + w.len().saturating_sub(1) as f64 * SLOT_GAP
        };

        const SEP: f64 = SLOT_GAP + SPACE_W + SLOT_GAP;
        let mut rows: Vec<Vec<(usize, f64)>> = Vec::new();
        let mut row: Vec<(usize, f64)> = Vec::new();
        let mut row_w = 0.0;
        for w in words.iter().filter(|w| !w.is_empty()) {
            let ww = word_width(w);
            if !row.is_empty() && row_w + SEP + ww > max_row {
                rows.push(std::mem::take(&mut row));
                row_w = 0.0;
            }
            if !row.is_empty() {
                // the space between two words on the same row
                let first = w[0];
                if first > 0 && slots[first - 1].is_space() {
                    row.push((first - 1, SPACE_W));
                }
                row_w += SEP;
            }
            row.extend(w.iter().map(|&i| (i, SLOT_W)));
            row_w += ww;
        }
        if !row.is_empty() {
            rows.push(row);
        }

        let mut slot_rects = vec![None; slots.len()];
        let mut y = SLOTS_TOP;
        for row in &rows {
            let total: f64 = row.iter().map(|(_, w)| *w).sum::<f64>()
                + row.len().saturating_sub(1) as f64 * SLOT_GAP;
            let mut x = (width - total) / 2.0;
            for &(i, w) in row {
                slot_rects[i] = Some(Rect::new(x, y, w, SLOT_H));
                x += w + SLOT_GAP;
            }
            y += SLOT_H + ROW_GAP;
        }

        let tray_top = y + SECTION_GAP;
        let per_row = (((max_row + TILE_GAP) / (TILE_W + TILE_GAP)).floor() as usize).max(1);
        let visible: Vec<usize> = tray
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|_| i))
            .collect();
        let tray_rows = visible.len().div_ceil(per_row).max(1);
        let mut tiles = Vec::with_capacity(visible.len());
        for (n, chunk) in visible.chunks(per_row).enumerate() {
            let total = chunk.len() as f64 * TILE_W + chunk.len().saturating_sub(1) as f64 * TILE_GAP;
            let mut x = (width - total) / 2.0;
            let ty = tray_top + n as f64 * (TILE_H + TILE_GAP);
            for &i in chunk {
                tiles.push((i, Rect::new(x, ty, TILE_W, TILE_H)));
                x += TILE_W + TILE_GAP;
            }
        }
        let tray_h = tray_rows as f64 * (TILE_H + TILE_GAP) - TILE_GAP;
        let tray_area = Rect::new(PAD, tray_top - TILE_GAP, width - PAD * 2.0, tray_h + TILE_GAP * 2.0);
        let hint_button = Rect::new(width / 2.0 - 80.0, tray_area.y + tray_area.h + 24.0, 160.0, 40.0);

        Self { slots: slot_rects, tiles, tray_area, hint_button }
    }

    pub fn slot_at(&self, p: Vec2) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .find(|(_, r)| r.is_some_and(|r| r.contains(p)))
            .map(|(i, _)| i)
    }

    pub fn tray_at(&self, p: Vec2) -> Option<usize> {
        self.tiles.iter().find(|(_, r)| r.contains(p)).map(|(i, _)| *i)
    }

    pub fn tile_rect(&self, tray_idx: usize) -> Option<Rect> {
        self.tiles.iter().find(|(i, _)| *i == tray_idx).map(|(_, r)| *r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LOGICAL_WIDTH;

    fn puzzle(phrase: &str, variant: PuzzleVariant) -> PuzzleGame {
        let cfg = PuzzleConfig { phrase: phrase.into(), max_hints: 3, variant };
        PuzzleGame::new(cfg, LOGICAL_WIDTH, GameRng::seeded(42))
    }

    fn tray_index_of(g: &PuzzleGame, c: char) -> usize {
        g.tray().iter().position(|t| *t == Some(c)).expect("letter in tray")
    }

    /// Solve by placing the right letter in each slot.
    fn solve(g: &mut PuzzleGame) {
        for i in 0..g.slots().len() {
            let s = g.slots()[i];
            if s.is_space() || s.letter.is_some() {
                continue;
            }
            let t = tray_index_of(g, s.expected);
            assert!(g.place_from_tray(t, i));
        }
    }

    #[test]
    fn tray_holds_every_letter_once() {
        let g = puzzle("WOULD YOU BE MY VALENTINE?", PuzzleVariant::DragDrop);
        let mut tray: Vec<char> = g.tray().iter().flatten().copied().collect();
        let mut expected: Vec<char> = "WOULDYOUBEMYVALENTINE?".chars().collect();
        tray.sort_unstable();
        expected.sort_unstable();
        assert_eq!(tray, expected);
        assert_eq!(g.slots().iter().filter(|s| s.is_space()).count(), 4);
    }

    #[test]
    fn solving_emits_single_win() {
        let mut g = puzzle("BE MINE", PuzzleVariant::DragDrop);
        solve(&mut g);
        assert!(g.is_solved());
        let events = g.drain_events();
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Win).count(), 1);
        assert_eq!(g.status(), GameStatus::Won);
        assert!(!g.return_to_tray(0), "board frozen after win");
    }

    #[test]
    fn spaces_refuse_letters() {
        let mut g = puzzle("A B", PuzzleVariant::DragDrop);
        assert!(!g.place_from_tray(0, 1));
        assert_eq!(g.tray().iter().flatten().count(), 2);
    }

    #[test]
    fn dropping_on_occupied_slot_returns_displaced_letter() {
        let mut g = puzzle("AB", PuzzleVariant::DragDrop);
        let a = tray_index_of(&g, 'A');
        assert!(g.place_from_tray(a, 0));
        let b = tray_index_of(&g, 'B');
        assert!(g.place_from_tray(b, 0));
        assert_eq!(g.slots()[0].letter, Some('B'));
        assert_eq!(g.tray().iter().flatten().copied().collect::<Vec<_>>(), vec!['A']);
    }

    #[test]
    fn wrong_arrangement_is_not_a_win() {
        let mut g = puzzle("AB", PuzzleVariant::DragDrop);
        let a = tray_index_of(&g, 'A');
        g.place_from_tray(a, 1);
        let b = tray_index_of(&g, 'B');
        g.place_from_tray(b, 0);
        assert!(!g.is_solved());
        assert_eq!(g.status(), GameStatus::Playing);
        assert!(g.move_between_slots(0, 1), "swap");
        assert!(g.is_solved());
        assert_eq!(g.status(), GameStatus::Won);
    }

    #[test]
    fn moving_into_an_empty_slot_leaves_the_source_empty() {
        let mut g = puzzle("ABC", PuzzleVariant::DragDrop);
        let b = tray_index_of(&g, 'B');
        g.place_from_tray(b, 0);
        assert!(g.move_between_slots(0, 1));
        assert_eq!(g.slots()[0].letter, None);
        assert_eq!(g.slots()[1].letter, Some('B'));
        assert_eq!(g.tray().iter().flatten().count(), 2);
        assert!(!g.move_between_slots(0, 2), "nothing to move from an empty slot");
    }

    #[test]
    fn return_to_tray_compacts_and_appends() {
        let mut g = puzzle("ABC", PuzzleVariant::DragDrop);
        let a = tray_index_of(&g, 'A');
        g.place_from_tray(a, 0);
        assert!(g.return_to_tray(0));
        assert_eq!(g.tray().len(), 3);
        assert_eq!(g.tray().last(), Some(&Some('A')));
        assert!(!g.return_to_tray(0), "slot already empty");
    }

    #[test]
    fn tap_next_accepts_only_next_letter() {
        let mut g = puzzle("AB", PuzzleVariant::TapNext);
        let b = tray_index_of(&g, 'B');
        assert!(!g.tap_tray(b, 10.0));
        assert_eq!(g.last_reject_ms(), Some(10.0));
        let a = tray_index_of(&g, 'A');
        assert!(g.tap_tray(a, 20.0));
        let b = tray_index_of(&g, 'B');
        assert!(g.tap_tray(b, 30.0));
        let events = g.drain_events();
        assert_eq!(events[0], GameEvent::Rejected);
        assert_eq!(events.last(), Some(&GameEvent::Win));
    }

    #[test]
    fn hints_are_capped_and_place_correct_letters() {
        let mut g = puzzle("LOVELY", PuzzleVariant::DragDrop);
        for _ in 0..3 {
            let slot = g.use_hint().expect("hint available");
            assert_eq!(g.slots()[slot].letter, Some(g.slots()[slot].expected));
        }
        assert_eq!(g.hints_left(), 0);
        assert_eq!(g.use_hint(), None);
        assert_eq!(g.tray().iter().flatten().count(), 3);
    }

    #[test]
    fn hint_skips_letters_not_in_tray() {
        let mut g = puzzle("AB", PuzzleVariant::DragDrop);
        // put both letters in the wrong slots, nothing left in the tray
        let b = tray_index_of(&g, 'B');
        g.place_from_tray(b, 0);
        let a = tray_index_of(&g, 'A');
        g.place_from_tray(a, 1);
        assert_eq!(g.use_hint(), None);
        assert_eq!(g.hints_left(), 3);
    }

    #[test]
    fn lowercase_phrase_is_uppercased() {
        let g = puzzle("hi", PuzzleVariant::DragDrop);
        assert_eq!(g.slots()[0].expected, 'H');
    }

    #[test]
    fn layout_fits_width_and_keeps_words_whole() {
        let g = puzzle("WOULD YOU BE MY VALENTINE?", PuzzleVariant::DragDrop);
        let layout = g.layout();
        for (i, r) in layout.slots.iter().enumerate() {
            if g.slots()[i].is_space() {
                continue;
            }
            let r = r.expect("letter slots always laid out");
            assert!(r.x >= 0.0 && r.x + r.w <= LOGICAL_WIDTH, "slot {i} off canvas");
        }
        // "VALENTINE?" letters share one row
        let ys: Vec<f64> = (16..26).map(|i| layout.slots[i].unwrap().y).collect();
        assert!(ys.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(layout.tiles.len(), 22);
        for (_, r) in &layout.tiles {
            assert!(r.x >= 0.0 && r.x + r.w <= LOGICAL_WIDTH);
            assert!(layout.tray_area.contains(r.center()));
        }
        assert!(layout.hint_button.y > layout.tray_area.y + layout.tray_area.h);
    }

    #[test]
    fn drag_from_tray_to_slot_via_pointer() {
        let mut g = puzzle("AB", PuzzleVariant::DragDrop);
        let layout = g.layout();
        let a = tray_index_of(&g, 'A');
        let from = layout.tile_rect(a).unwrap().center();
        let to = layout.slots[0].unwrap().center();
        g.pointer_down(from, 0.0);
        assert_eq!(g.drag().map(|d| d.letter), Some('A'));
        g.pointer_move(to, 1.0);
        g.pointer_up(to, 2.0);
        assert!(g.drag().is_none());
        assert_eq!(g.slots()[0].letter, Some('A'));
        assert_eq!(g.drain_events(), vec![GameEvent::Placed { slot: 0 }]);
    }

    #[test]
    fn drag_slot_back_to_tray_and_cancel_elsewhere() {
        let mut g = puzzle("AB", PuzzleVariant::DragDrop);
        let a = tray_index_of(&g, 'A');
        g.place_from_tray(a, 1);
        let layout = g.layout();
        let slot = layout.slots[1].unwrap().center();

        // dropped far away: nothing changes
        g.pointer_down(slot, 0.0);
        g.pointer_up(Vec2::new(5.0, 5.0), 1.0);
        assert_eq!(g.slots()[1].letter, Some('A'));

        g.pointer_down(slot, 2.0);
        let tray_point = layout.tray_area.center();
        g.pointer_up(tray_point, 3.0);
        assert_eq!(g.slots()[1].letter, None);
        assert_eq!(g.tray().iter().flatten().count(), 2);
    }

    #[test]
    fn hint_button_via_pointer() {
        let mut g = puzzle("LOVE", PuzzleVariant::TapNext);
        let btn = g.layout().hint_button.center();
        g.pointer_down(btn, 0.0);
        assert_eq!(g.hints_left(), 2);
        assert!(matches!(g.drain_events()[0], GameEvent::Hint { .. }));
    }
}
