//! Note and key event types.
//!
//! [`MidiNoteEvent`] is what the MIDI source produces; [`KeyEvent`] is what the
//! virtual keyboard consumes.  Neither is stored: each note event is classified
//! and forwarded as soon as it is read.

use crate::keymap::KeyCode;

/// Kind of an inbound MIDI note message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    NoteOn,
    NoteOff,
}

/// One inbound MIDI note message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiNoteEvent {
    pub kind: NoteKind,
    /// MIDI channel (0–15). Informational only; every channel is translated.
    pub channel: u8,
    /// Note number (0–127).
    pub note: u8,
    /// Velocity (0–127).
    pub velocity: u8,
}

impl MidiNoteEvent {
    /// A note-on on channel 0.
    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOn,
            channel: 0,
            note,
            velocity,
        }
    }

    /// A note-off on channel 0.
    pub fn note_off(note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteKind::NoteOff,
            channel: 0,
            note,
            velocity,
        }
    }

    /// Returns `true` if this message releases the note.
    ///
    /// A note-on with velocity 0 is a note-off by MIDI convention (running
    /// status senders use it to avoid switching status bytes).
    pub fn is_release(&self) -> bool {
        match self.kind {
            NoteKind::NoteOn => self.velocity == 0,
            NoteKind::NoteOff => true,
        }
    }
}

/// Direction of a key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDirection {
    Pressed,
    Released,
}

impl KeyDirection {
    /// The `value` field of a kernel `EV_KEY` event (1 = down, 0 = up).
    pub fn event_value(self) -> i32 {
        match self {
            KeyDirection::Pressed => 1,
            KeyDirection::Released => 0,
        }
    }
}

/// One key transition to be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub direction: KeyDirection,
}

impl KeyEvent {
    pub fn pressed(key: KeyCode) -> Self {
        Self {
            key,
            direction: KeyDirection::Pressed,
        }
    }

    pub fn released(key: KeyCode) -> Self {
        Self {
            key,
            direction: KeyDirection::Released,
        }
    }

    /// The low-level frames that realise this transition: the key frame,
    /// then exactly one synchronisation frame.
    ///
    /// The kernel input layer queues events until it sees `SYN_REPORT`;
    /// a key frame without the trailing sync is never delivered to readers.
    pub fn frames(self) -> [InputFrame; 2] {
        [InputFrame::Key(self), InputFrame::Sync]
    }
}

/// A single low-level event written to the virtual device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFrame {
    /// `EV_KEY` with the key code and 1/0 value.
    Key(KeyEvent),
    /// `EV_SYN` / `SYN_REPORT`.
    Sync,
}
