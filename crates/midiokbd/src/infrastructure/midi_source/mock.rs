//! Scripted note source for unit testing.
//!
//! [`ScriptedSource`] replays a fixed list of batches.  Each successful
//! [`wait_readable`](NoteSource::wait_readable) makes one batch available; once
//! the script runs out, waiting fails, which ends the dispatch loop just as a
//! failed `poll(2)` would.

use std::collections::VecDeque;

use midiokbd_core::MidiNoteEvent;

use crate::application::dispatch_loop::{NoteSource, SourceError};

/// One buffered item in a scripted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    /// A note-on or note-off.
    Note(MidiNoteEvent),
    /// A message the source filters out (controller change, clock, ...).
    Other,
    /// A transient read error; ends the current drain.
    ReadError,
}

/// A [`NoteSource`] that replays scripted batches.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    batches: VecDeque<Vec<Scripted>>,
    pending: VecDeque<Scripted>,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<Scripted>>) -> Self {
        Self {
            batches: batches.into(),
            ..Self::default()
        }
    }

    /// A script made only of note events.
    pub fn from_notes(batches: Vec<Vec<MidiNoteEvent>>) -> Self {
        Self::new(
            batches
                .into_iter()
                .map(|batch| batch.into_iter().map(Scripted::Note).collect())
                .collect(),
        )
    }
}

impl NoteSource for ScriptedSource {
    fn wait_readable(&mut self) -> Result<(), SourceError> {
        if self.pending.is_empty() {
            let batch = self
                .batches
                .pop_front()
                .ok_or_else(|| SourceError::wait("script exhausted"))?;
            self.pending.extend(batch);
        }
        Ok(())
    }

    fn next_events(&mut self) -> impl Iterator<Item = MidiNoteEvent> + '_ {
        std::iter::from_fn(move || loop {
            match self.pending.pop_front()? {
                Scripted::Note(event) => return Some(event),
                Scripted::Other => continue,
                Scripted::ReadError => return None,
            }
        })
    }
}
