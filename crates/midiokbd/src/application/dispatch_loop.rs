//! The dispatch loop: wait for MIDI input, drain it, press keys, repeat.
//!
//! # How the loop works (for beginners)
//!
//! A MIDI keyboard sends a burst of messages whenever a chord is played.  The
//! sequencer queues them up and marks its file descriptor readable.  The loop
//! therefore alternates between two phases:
//!
//! 1. **Wait** – block in [`NoteSource::wait_readable`] until input arrives.
//! 2. **Drain** – pull every buffered note out of
//!    [`NoteSource::next_events`] and hand each one to the
//!    [`NoteDispatcher`], in arrival order.
//!
//! The loop only ends when waiting fails.  A failed keyboard write or a bad
//! read is logged and the loop carries on with the next event or wake-up.

use std::error::Error as StdError;
use std::fmt;

use midiokbd_core::MidiNoteEvent;
use thiserror::Error;
use tracing::{trace, warn};

use super::translate_notes::NoteDispatcher;

/// One step of connecting to the MIDI sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStep {
    /// Opening the sequencer.
    Open,
    /// Naming our sequencer client.
    SetClientName,
    /// Parsing or resolving the source port address.
    ParseAddress,
    /// Creating our input port.
    CreatePort,
    /// Subscribing our port to the source port.
    Subscribe,
}

impl fmt::Display for ConnectStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open sequencer",
            Self::SetClientName => "set client name",
            Self::ParseAddress => "invalid port address",
            Self::CreatePort => "create port",
            Self::Subscribe => "subscribe to port",
        })
    }
}

/// Error type for MIDI note sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connecting to the sequencer failed at `step`.
    #[error("{step}: {source}")]
    Connect {
        step: ConnectStep,
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Waiting for input failed.  This ends the dispatch loop.
    #[error("wait for MIDI input: {0}")]
    Wait(#[source] Box<dyn StdError + Send + Sync>),
}

impl SourceError {
    /// Wraps any error as a failed connection step.
    pub fn connect(step: ConnectStep, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Connect {
            step,
            source: source.into(),
        }
    }

    /// Wraps any error as a failed wait.
    pub fn wait(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Wait(source.into())
    }
}

/// Something that yields note events in bursts.
pub trait NoteSource {
    /// Blocks until input is available.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Wait`] if waiting itself fails.  The dispatch
    /// loop stops on the first such error.
    fn wait_readable(&mut self) -> Result<(), SourceError>;

    /// Drains every note event currently buffered, in arrival order.
    ///
    /// Non-note messages are skipped.  A read error ends the drain early; any
    /// events left behind are picked up on the next wake-up.
    fn next_events(&mut self) -> impl Iterator<Item = MidiNoteEvent> + '_;
}

/// Counters kept while the loop runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub wakeups: u64,
    pub events_seen: u64,
    pub keys_emitted: u64,
    pub write_failures: u64,
}

/// Why and after how much work the loop stopped.
#[derive(Debug)]
pub struct LoopExit {
    pub reason: SourceError,
    pub stats: LoopStats,
}

/// Runs wait/drain cycles until `source` fails to wait.
pub fn run_dispatch_loop<S: NoteSource>(source: &mut S, dispatcher: &NoteDispatcher<'_>) -> LoopExit {
    let mut stats = LoopStats::default();
    loop {
        if let Err(reason) = source.wait_readable() {
            return LoopExit { reason, stats };
        }
        stats.wakeups += 1;

        for event in source.next_events() {
            stats.events_seen += 1;
            match dispatcher.handle(&event) {
                Ok(Some(_)) => stats.keys_emitted += 1,
                Ok(None) => {}
                Err(e) => {
                    stats.write_failures += 1;
                    warn!(note = event.note, "failed to emit key event: {e}");
                }
            }
        }
        trace!(?stats, "drain complete");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
