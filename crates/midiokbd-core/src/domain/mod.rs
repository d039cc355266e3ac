//! Domain entities for midiokbd.
//!
//! This module contains pure translation logic with no infrastructure
//! dependencies: no ALSA, no uinput, no file descriptors.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, device drivers, or sound servers.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! For midiokbd the rules are small but exact: which MIDI messages count as a
//! key going down, which count as a key going up, how each key transition is
//! framed for the kernel, and how a sequencer address is written.  The Linux
//! adapters in the `midiokbd` crate depend on these types; these types never
//! depend on the adapters.

/// Sequencer port address grammar (`CLIENT[:PORT]`).
pub mod address;

/// Inbound note events and outbound key events.
pub mod events;

/// Note event to key event classification.
pub mod translate;
