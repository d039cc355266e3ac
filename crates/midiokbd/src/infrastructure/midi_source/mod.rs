//! MIDI note sources.
//!
//! | Module     | OS    | Backend                    |
//! |------------|-------|----------------------------|
//! | `alsa_seq` | Linux | ALSA sequencer via `alsa`  |
//! | `mock`     | any   | scripted batches for tests |

#[cfg(target_os = "linux")]
pub mod alsa_seq;
pub mod mock;

#[cfg(target_os = "linux")]
pub use alsa_seq::AlsaSeqSource;
pub use mock::{Scripted, ScriptedSource};
