//! Linux input event key codes (`KEY_*` from `linux/input-event-codes.h`).
//!
//! [`KeyCode`] is the key identifier used everywhere in midiokbd: the
//! note-to-key tables produce it, the dispatcher forwards it, and the uinput
//! keyboard declares and emits it.  The numeric value of each variant is the
//! kernel's event code, so the uinput adapter can write it straight into an
//! `input_event` without a second translation table.
//!
//! # Why kernel codes and not characters? (for beginners)
//!
//! The kernel input layer describes *physical key positions*, not the
//! characters they produce.  `KEY_Q` is "the key to the right of Tab"; whether
//! that types `q`, `a` (AZERTY) or `'` (Dvorak) is decided later by the
//! desktop's keyboard layout.  A virtual keyboard therefore speaks in
//! positions too, and the letters in this enum are named after the US QWERTY
//! legend printed on each key.
//!
//! Notice that the letter codes are *not* contiguous (`KEY_A` = 30,
//! `KEY_B` = 48): they follow the scan-code order of the IBM PC keyboard
//! rows.  Never compute a letter by adding an offset to `KeyA`.

/// A keyboard key, valued as its Linux input event code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum KeyCode {
    // Top letter row
    KeyQ = 16,
    KeyW = 17,
    KeyE = 18,
    KeyR = 19,
    KeyT = 20,
    KeyY = 21,
    KeyU = 22,
    KeyI = 23,
    KeyO = 24,
    KeyP = 25,

    // Home row
    KeyA = 30,
    KeyS = 31,
    KeyD = 32,
    KeyF = 33,
    KeyG = 34,
    KeyH = 35,
    KeyJ = 36,
    KeyK = 37,
    KeyL = 38,

    // Bottom row
    KeyZ = 44,
    KeyX = 45,
    KeyC = 46,
    KeyV = 47,
    KeyB = 48,
    KeyN = 49,
    KeyM = 50,
}

impl KeyCode {
    /// The 26 letter keys in alphabetical order.
    pub const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];

    /// Returns the raw Linux key event code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}
