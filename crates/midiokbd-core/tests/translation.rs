//! Integration tests for note-to-key translation.
//!
//! These tests drive whole note sequences through the public API
//! (`NoteKeyMap` + `translate` + `KeyEvent::frames`) and check the exact
//! frame stream a virtual keyboard would receive.

use midiokbd_core::{
    translate, InputFrame, KeyCode, KeyEvent, Layout, MidiNoteEvent, NoteKeyMap,
};

/// Translates a note sequence and flattens it into device frames.
fn frames_for(map: &NoteKeyMap, notes: &[MidiNoteEvent]) -> Vec<InputFrame> {
    notes
        .iter()
        .filter_map(|event| translate(event, map))
        .flat_map(KeyEvent::frames)
        .collect()
}

#[test]
fn test_letter_run_covers_notes_60_to_85() {
    let map = NoteKeyMap::default();
    for note in 0u8..=127 {
        let expected = (60..=85)
            .contains(&note)
            .then(|| KeyCode::LETTERS[(note - 60) as usize]);
        assert_eq!(map.resolve(note), expected, "note {note}");
    }
}

#[test]
fn test_press_then_release_for_note_on_then_note_off() {
    // Arrange
    let map = NoteKeyMap::default();
    for velocity in [0u8, 64, 127] {
        let notes = [MidiNoteEvent::note_on(70, 90), MidiNoteEvent::note_off(70, velocity)];

        // Act
        let keys: Vec<KeyEvent> = notes.iter().filter_map(|e| translate(e, &map)).collect();

        // Assert
        assert_eq!(
            keys,
            vec![KeyEvent::pressed(KeyCode::KeyK), KeyEvent::released(KeyCode::KeyK)]
        );
    }
}

#[test]
fn test_zero_velocity_note_on_never_presses() {
    let map = NoteKeyMap::default();
    let keys: Vec<KeyEvent> = (60u8..=85)
        .filter_map(|note| translate(&MidiNoteEvent::note_on(note, 0), &map))
        .collect();
    assert_eq!(keys.len(), 26);
    assert!(keys.iter().all(|k| *k == KeyEvent::released(k.key)));
}

#[test]
fn test_every_key_frame_is_followed_by_exactly_one_sync() {
    // Arrange: a busy, interleaved stream including unmapped notes
    let map = NoteKeyMap::default();
    let notes = [
        MidiNoteEvent::note_on(60, 100),
        MidiNoteEvent::note_on(30, 100),
        MidiNoteEvent::note_on(62, 80),
        MidiNoteEvent::note_off(60, 0),
        MidiNoteEvent::note_on(62, 0),
        MidiNoteEvent::note_off(100, 0),
    ];

    // Act
    let frames = frames_for(&map, &notes);

    // Assert
    assert_eq!(frames.len(), 8);
    for pair in frames.chunks(2) {
        assert!(matches!(pair[0], InputFrame::Key(_)), "{pair:?}");
        assert_eq!(pair[1], InputFrame::Sync);
    }
}

#[test]
fn test_unmapped_notes_emit_nothing() {
    let map = NoteKeyMap::default();
    let notes: Vec<MidiNoteEvent> = (0u8..60)
        .chain(86..=127)
        .flat_map(|n| [MidiNoteEvent::note_on(n, 100), MidiNoteEvent::note_off(n, 0)])
        .collect();
    assert!(frames_for(&map, &notes).is_empty());
}

#[test]
fn test_end_to_end_frame_stream() {
    // Arrange: 60→A, 61→B
    let map = NoteKeyMap::from_entries([(60, KeyCode::KeyA), (61, KeyCode::KeyB)]);
    let notes = [
        MidiNoteEvent::note_on(60, 100),
        MidiNoteEvent::note_off(60, 0),
        MidiNoteEvent::note_on(61, 0),
    ];

    // Act
    let frames = frames_for(&map, &notes);

    // Assert
    assert_eq!(
        frames,
        vec![
            InputFrame::Key(KeyEvent::pressed(KeyCode::KeyA)),
            InputFrame::Sync,
            InputFrame::Key(KeyEvent::released(KeyCode::KeyA)),
            InputFrame::Sync,
            InputFrame::Key(KeyEvent::released(KeyCode::KeyB)),
            InputFrame::Sync,
        ]
    );
}

#[test]
fn test_qwerty_layout_end_to_end() {
    let map = NoteKeyMap::for_layout(Layout::Qwerty);
    let frames = frames_for(&map, &[MidiNoteEvent::note_on(85, 1)]);
    assert_eq!(
        frames,
        vec![InputFrame::Key(KeyEvent::pressed(KeyCode::KeyM)), InputFrame::Sync]
    );
}
