//! # midiokbd-core
//!
//! Shared library for midiokbd containing the note-to-key tables, the note
//! and key event model, and the sequencer port-address grammar.
//!
//! It has zero dependencies on OS APIs: no ALSA, no uinput, no file
//! descriptors.  Everything here builds and tests on any platform.
//!
//! # Architecture overview (for beginners)
//!
//! midiokbd turns a MIDI keyboard into a computer keyboard.  Every time a
//! piano key goes down, the program receives a *note-on* message and presses
//! a letter key on a virtual keyboard; when the piano key comes up, it
//! receives a *note-off* and releases the letter.
//!
//! This crate (`midiokbd-core`) is the pure foundation.  It defines:
//!
//! - **`keymap`** – Which MIDI note presses which key.  A [`NoteKeyMap`] is a
//!   128-entry table built once from a [`Layout`] and then only read.
//!
//! - **`domain`** – The event types ([`MidiNoteEvent`], [`KeyEvent`]), the
//!   rule that turns one into the other ([`translate`]), and how a sequencer
//!   port address such as `20:0` or `"Midi Through"` is parsed.

pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `midiokbd_core::NoteKeyMap` instead of `midiokbd_core::keymap::NoteKeyMap`.
pub use domain::address::{AddressError, AddressSpec, ClientSpec, PortAddress};
pub use domain::events::{InputFrame, KeyDirection, KeyEvent, MidiNoteEvent, NoteKind};
pub use domain::translate::translate;
pub use keymap::{KeyCode, Layout, NoteKeyMap};
