//! midiokbd library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does midiokbd do? (for beginners)
//!
//! midiokbd lets a MIDI keyboard type letters.  It:
//!
//! 1. Creates a virtual computer keyboard through `/dev/uinput`, declaring
//!    only the keys the selected layout can press.
//! 2. Joins the ALSA sequencer and subscribes to the MIDI port named on the
//!    command line.
//! 3. Waits for note messages and, for every mapped note, presses (note-on)
//!    or releases (note-off, or note-on with velocity 0) the bound key.
//! 4. When waiting for MIDI fails, destroys the virtual keyboard and exits.

/// Application layer: the keyboard and note-source traits and the use cases
/// built on them.
pub mod application;

/// Domain layer: runtime configuration.
pub mod domain;

/// Infrastructure layer: uinput and ALSA adapters, plus test mocks.
pub mod infrastructure;
