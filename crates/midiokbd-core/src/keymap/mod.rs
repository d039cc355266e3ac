//! Note-to-key translation tables.
//!
//! A [`NoteKeyMap`] is a fixed 128-entry table indexed by MIDI note number.
//! Each entry is either a [`KeyCode`] or `None` ("unmapped").  The table is
//! built once at startup from a [`Layout`] and then only read, so it is
//! passed around by shared reference instead of living in a global.
//!
//! # How the built-in layouts work (for beginners)
//!
//! Both built-in layouts bind a *chromatic run*: 26 consecutive note numbers
//! starting at middle C (note 60), one letter key per semitone.  Black and
//! white piano keys are treated the same, so C4 is the first letter, C#4 the
//! second, D4 the third, and so on up to C#6 (note 85).
//!
//! ```text
//! note   60 61 62 63 64 65 66 67 … 84 85
//! alpha   A  B  C  D  E  F  G  H …  Y  Z
//! qwerty  Q  W  E  R  T  Y  U  I …  N  M
//! ```
//!
//! Everything below 60 or above 85 resolves to `None` and is ignored.  To bind
//! a different range, build a table with [`NoteKeyMap::from_run`] or
//! [`NoteKeyMap::from_entries`]; the dispatch code only ever calls
//! [`NoteKeyMap::resolve`] and does not care how the table was filled.

pub mod key;

use std::collections::BTreeSet;

pub use key::KeyCode;

/// Number of MIDI note numbers (0–127).
pub const NOTE_COUNT: usize = 128;

/// MIDI note 60, "middle C" (C4).
pub const MIDDLE_C: u8 = 60;

/// Letters in the order they appear on a QWERTY keyboard, top row first.
const QWERTY_LETTERS: [KeyCode; 26] = [
    KeyCode::KeyQ,
    KeyCode::KeyW,
    KeyCode::KeyE,
    KeyCode::KeyR,
    KeyCode::KeyT,
    KeyCode::KeyY,
    KeyCode::KeyU,
    KeyCode::KeyI,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyA,
    KeyCode::KeyS,
    KeyCode::KeyD,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyZ,
    KeyCode::KeyX,
    KeyCode::KeyC,
    KeyCode::KeyV,
    KeyCode::KeyB,
    KeyCode::KeyN,
    KeyCode::KeyM,
];

/// A compiled-in note-to-key table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Chromatic run from middle C, letters A to Z.
    #[default]
    Alphabet,
    /// Chromatic run from middle C, letters in QWERTY keyboard order.
    Qwerty,
}

impl Layout {
    /// First note bound by this layout.
    pub fn first_note(self) -> u8 {
        MIDDLE_C
    }

    /// Keys bound to consecutive notes, starting at [`Layout::first_note`].
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Layout::Alphabet => &KeyCode::LETTERS,
            Layout::Qwerty => &QWERTY_LETTERS,
        }
    }

    /// Human-readable layout name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Alphabet => "alphabet",
            Layout::Qwerty => "qwerty",
        }
    }
}

/// Immutable lookup table from MIDI note number to key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteKeyMap {
    entries: [Option<KeyCode>; NOTE_COUNT],
}

impl NoteKeyMap {
    /// Builds the table for one of the compiled-in layouts.
    pub fn for_layout(layout: Layout) -> Self {
        Self::from_run(layout.first_note(), layout.keys())
    }

    /// Binds `keys` to consecutive notes starting at `first_note`.
    ///
    /// Keys that would land past note 127 are dropped.
    pub fn from_run(first_note: u8, keys: &[KeyCode]) -> Self {
        Self::from_entries(
            (first_note as usize..NOTE_COUNT)
                .zip(keys.iter().copied())
                .map(|(note, key)| (note as u8, key)),
        )
    }

    /// Builds a table from explicit `(note, key)` bindings.
    ///
    /// A later binding for the same note replaces an earlier one.
    ///
    /// # Panics
    ///
    /// Panics if a note is outside 0–127.
    pub fn from_entries(bindings: impl IntoIterator<Item = (u8, KeyCode)>) -> Self {
        let mut entries = [None; NOTE_COUNT];
        for (note, key) in bindings {
            assert!(
                (note as usize) < NOTE_COUNT,
                "MIDI note {note} is outside 0-127"
            );
            entries[note as usize] = Some(key);
        }
        Self { entries }
    }

    /// Returns the key bound to `note`, or `None` if the note is unmapped.
    ///
    /// # Panics
    ///
    /// Panics if `note` is outside 0–127.  The MIDI protocol never produces
    /// such a value, so reaching this is a bug in the caller.
    pub fn resolve(&self, note: u8) -> Option<KeyCode> {
        assert!(
            (note as usize) < NOTE_COUNT,
            "MIDI note {note} is outside 0-127"
        );
        self.entries[note as usize]
    }

    /// The distinct keys this table can produce.
    ///
    /// The virtual keyboard declares exactly this set, never more.
    pub fn supported_keys(&self) -> BTreeSet<KeyCode> {
        self.entries.iter().flatten().copied().collect()
    }

    /// Bound `(note, key)` pairs in ascending note order.
    pub fn mapped_notes(&self) -> impl Iterator<Item = (u8, KeyCode)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(note, key)| key.map(|k| (note as u8, k)))
    }

    /// Inclusive range of bound notes, or `None` for an empty table.
    pub fn mapped_range(&self) -> Option<(u8, u8)> {
        let mut notes = self.mapped_notes().map(|(note, _)| note);
        let first = notes.next()?;
        let last = notes.last().unwrap_or(first);
        Some((first, last))
    }
}

impl Default for NoteKeyMap {
    fn default() -> Self {
        Self::for_layout(Layout::default())
    }
}
