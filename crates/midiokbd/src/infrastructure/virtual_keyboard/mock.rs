//! Mock virtual keyboard for unit testing.
//!
//! The real [`UinputKeyboard`](super::uinput::UinputKeyboard) needs
//! `/dev/uinput` and write access to it, and every key it presses lands in
//! whatever window has focus on the test machine.  `MockKeyboard` records the
//! frames it would have written into a `Mutex<Vec<...>>` instead, so tests can
//! assert exactly what was emitted and in what order.
//!
//! # `should_fail` flag
//!
//! Set `should_fail = true` (or build with [`MockKeyboard::failing`]) to make
//! every write return [`KeyboardError::Write`].

use std::io;
use std::sync::Mutex;

use midiokbd_core::{InputFrame, KeyEvent};

use crate::application::translate_notes::{KeyboardError, VirtualKeyboard};

/// A keyboard that records frames instead of writing to a device.
#[derive(Debug, Default)]
pub struct MockKeyboard {
    /// Every frame emitted so far, key frames and sync frames interleaved.
    pub frames: Mutex<Vec<InputFrame>>,
    /// When `true`, every emit fails and nothing is recorded.
    pub should_fail: bool,
}

impl MockKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A keyboard whose writes always fail.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the recorded frames.
    pub fn frames(&self) -> Vec<InputFrame> {
        self.frames.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// The recorded key events, with sync frames stripped.
    pub fn key_events(&self) -> Vec<KeyEvent> {
        self.frames()
            .into_iter()
            .filter_map(|frame| match frame {
                InputFrame::Key(event) => Some(event),
                InputFrame::Sync => None,
            })
            .collect()
    }
}

impl VirtualKeyboard for MockKeyboard {
    fn emit(&self, event: KeyEvent) -> Result<(), KeyboardError> {
        if self.should_fail {
            return Err(KeyboardError::Write(io::Error::new(
                io::ErrorKind::Other,
                "mock write failure",
            )));
        }
        if let Ok(mut frames) = self.frames.lock() {
            frames.extend(event.frames());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midiokbd_core::KeyCode;

    #[test]
    fn test_press_records_key_then_sync() {
        let keyboard = MockKeyboard::new();

        keyboard.press(KeyCode::KeyQ).unwrap();

        assert_eq!(
            keyboard.frames(),
            vec![InputFrame::Key(KeyEvent::pressed(KeyCode::KeyQ)), InputFrame::Sync]
        );
    }

    #[test]
    fn test_failing_keyboard_records_nothing() {
        let keyboard = MockKeyboard::failing();

        let result = keyboard.release(KeyCode::KeyQ);

        assert!(matches!(result, Err(KeyboardError::Write(_))));
        assert!(keyboard.frames().is_empty());
    }
}
