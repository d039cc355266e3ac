//! Virtual keyboard devices.
//!
//! | Module   | OS    | Backend                         |
//! |----------|-------|---------------------------------|
//! | `uinput` | Linux | `/dev/uinput` via `input-linux` |
//! | `mock`   | any   | in-memory frame recorder        |
//!
//! `mock` is always compiled (not guarded by `#[cfg]`) so tests on any
//! platform can use it.

pub mod mock;
#[cfg(target_os = "linux")]
pub mod uinput;

pub use mock::MockKeyboard;
#[cfg(target_os = "linux")]
pub use uinput::UinputKeyboard;
