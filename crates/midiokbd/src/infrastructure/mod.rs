//! Infrastructure layer: OS adapters behind the application traits.
//!
//! Real devices are only compiled on Linux; the mocks are compiled everywhere
//! so the application layer can be tested on any platform.

pub mod midi_source;
pub mod virtual_keyboard;
