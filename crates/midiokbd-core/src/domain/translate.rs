//! Classifies a note event into the key event it should produce.

use tracing::trace;

use super::events::{KeyEvent, MidiNoteEvent};
use crate::keymap::NoteKeyMap;

/// Translates one note event through `map`.
///
/// | Message                 | Result                 |
/// |-------------------------|------------------------|
/// | note-on, velocity > 0   | `Pressed(key)`         |
/// | note-on, velocity 0     | `Released(key)`        |
/// | note-off, any velocity  | `Released(key)`        |
/// | unmapped note           | `None`                 |
///
/// Velocity never changes *which* key is produced, only the direction of a
/// note-on.
pub fn translate(event: &MidiNoteEvent, map: &NoteKeyMap) -> Option<KeyEvent> {
    let Some(key) = map.resolve(event.note) else {
        trace!(note = event.note, "note is unmapped, dropping");
        return None;
    };
    if event.is_release() {
        Some(KeyEvent::released(key))
    } else {
        Some(KeyEvent::pressed(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::KeyDirection;
    use crate::keymap::KeyCode;

    #[test]
    fn test_note_on_presses_mapped_key() {
        // Arrange
        let map = NoteKeyMap::default();

        // Act
        let result = translate(&MidiNoteEvent::note_on(60, 100), &map);

        // Assert
        assert_eq!(result, Some(KeyEvent::pressed(KeyCode::KeyA)));
    }

    #[test]
    fn test_note_on_with_zero_velocity_releases_key() {
        let map = NoteKeyMap::default();
        let result = translate(&MidiNoteEvent::note_on(61, 0), &map);
        assert_eq!(result, Some(KeyEvent::released(KeyCode::KeyB)));
    }

    #[test]
    fn test_note_off_releases_key_regardless_of_velocity() {
        let map = NoteKeyMap::default();
        for velocity in [0, 1, 64, 127] {
            let result = translate(&MidiNoteEvent::note_off(85, velocity), &map);
            assert_eq!(result, Some(KeyEvent::released(KeyCode::KeyZ)), "velocity {velocity}");
        }
    }

    #[test]
    fn test_unmapped_notes_translate_to_nothing() {
        let map = NoteKeyMap::default();
        for note in [0, 59, 86, 127] {
            assert_eq!(translate(&MidiNoteEvent::note_on(note, 100), &map), None);
            assert_eq!(translate(&MidiNoteEvent::note_off(note, 0), &map), None);
        }
    }

    #[test]
    fn test_channel_does_not_affect_translation() {
        let map = NoteKeyMap::default();
        let event = MidiNoteEvent {
            channel: 9,
            ..MidiNoteEvent::note_on(62, 90)
        };
        let result = translate(&event, &map).expect("mapped");
        assert_eq!(result.key, KeyCode::KeyC);
        assert_eq!(result.direction, KeyDirection::Pressed);
    }
}
