//! Domain types local to the midiokbd binary.

pub mod config;

pub use config::{AppConfig, ClientIdentity, DeviceIdentity};
