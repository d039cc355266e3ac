//! NoteDispatcher: turns note events into key presses on a virtual keyboard.
//!
//! This use case sits at the application layer.  It looks each note up in a
//! [`NoteKeyMap`] and hands the resulting key event to a [`VirtualKeyboard`]
//! trait object.  The device behind the trait (uinput on Linux, an in-memory
//! recorder in tests) lives in the infrastructure layer.

use std::fmt;
use std::io;

use midiokbd_core::{translate, KeyCode, KeyDirection, KeyEvent, MidiNoteEvent, NoteKeyMap};
use thiserror::Error;
use tracing::debug;

/// One step of bringing a virtual keyboard device up or down.
///
/// Used to label [`KeyboardError::Device`] so the operator sees which system
/// call failed, e.g. `"create device: Permission denied"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStep {
    /// Opening `/dev/uinput` for writing.
    Open,
    /// Declaring that the device emits key events at all.
    DeclareKeyEvents,
    /// Declaring one individual key the device may emit.
    DeclareKey(KeyCode),
    /// Registering the device with the kernel.
    Create,
    /// Unregistering the device.
    Destroy,
}

impl fmt::Display for DeviceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open /dev/uinput"),
            Self::DeclareKeyEvents => f.write_str("declare key events"),
            Self::DeclareKey(key) => write!(f, "declare key {key:?} ({})", key.as_u16()),
            Self::Create => f.write_str("create device"),
            Self::Destroy => f.write_str("destroy device"),
        }
    }
}

/// Error type for virtual keyboard operations.
#[derive(Debug, Error)]
pub enum KeyboardError {
    /// A setup or teardown step failed.
    #[error("{step}: {source}")]
    Device { step: DeviceStep, source: io::Error },

    /// Writing an event frame to the device failed.
    #[error("write key event: {0}")]
    Write(#[source] io::Error),
}

/// A keyboard that can be told to press and release keys.
///
/// Implementations must deliver every key frame followed by its sync frame
/// (see [`KeyEvent::frames`]) so the event is observable immediately.
pub trait VirtualKeyboard {
    /// Emits one key event and its trailing sync frame.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Write`] if the device rejects the frames.
    fn emit(&self, event: KeyEvent) -> Result<(), KeyboardError>;

    /// Presses `key` (key frame with value 1, then sync).
    fn press(&self, key: KeyCode) -> Result<(), KeyboardError> {
        self.emit(KeyEvent::pressed(key))
    }

    /// Releases `key` (key frame with value 0, then sync).
    fn release(&self, key: KeyCode) -> Result<(), KeyboardError> {
        self.emit(KeyEvent::released(key))
    }

    /// Removes the device from the system.
    ///
    /// The default does nothing, for keyboards with nothing to release.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Device`] with [`DeviceStep::Destroy`] if the
    /// device could not be removed.
    fn teardown(self) -> Result<(), KeyboardError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// The note dispatch use case.
///
/// Borrows the key map and the keyboard for the lifetime of the dispatch loop;
/// neither changes after setup.
pub struct NoteDispatcher<'a> {
    keymap: &'a NoteKeyMap,
    keyboard: &'a dyn VirtualKeyboard,
}

impl<'a> NoteDispatcher<'a> {
    /// Creates a dispatcher over an already set-up keyboard.
    pub fn new(keymap: &'a NoteKeyMap, keyboard: &'a dyn VirtualKeyboard) -> Self {
        Self { keymap, keyboard }
    }

    /// Handles one note event.
    ///
    /// Returns the key event that was emitted, or `None` for an unmapped note.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError`] if the keyboard write fails.  The caller
    /// decides whether that is fatal; the dispatch loop treats it as
    /// transient.
    pub fn handle(&self, event: &MidiNoteEvent) -> Result<Option<KeyEvent>, KeyboardError> {
        let Some(key_event) = translate(event, self.keymap) else {
            return Ok(None);
        };
        match key_event.direction {
            KeyDirection::Pressed => self.keyboard.press(key_event.key)?,
            KeyDirection::Released => self.keyboard.release(key_event.key)?,
        }
        debug!(
            note = event.note,
            velocity = event.velocity,
            key = ?key_event.key,
            direction = ?key_event.direction,
            "emitted key event"
        );
        Ok(Some(key_event))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
