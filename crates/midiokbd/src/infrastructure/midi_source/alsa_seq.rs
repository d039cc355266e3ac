//! Linux MIDI input via the ALSA sequencer.
//!
//! # What is the ALSA sequencer? (for beginners)
//!
//! The sequencer is the kernel's MIDI router.  Every program or device that
//! sends or receives MIDI is a *client* with one or more *ports*, addressed as
//! `client:port` (run `aconnect -l` to list them).  To receive notes we:
//!
//! 1. open the sequencer and name our client,
//! 2. create a writable port of our own,
//! 3. *subscribe* our port to the source port, so everything the source
//!    sends is routed to us.
//!
//! Incoming events are buffered by the sequencer.  Its file descriptors become
//! readable when something is waiting; [`AlsaSeqSource::wait_readable`] blocks
//! in `poll(2)` until that happens and [`AlsaSeqSource::next_events`] drains
//! the buffer.

use std::ffi::CString;
use std::fmt;

use alsa::poll::{pollfd, Descriptors};
use alsa::seq::{self, Addr, ClientIter, EvNote, EventType, PortCap, PortSubscribe, PortType, Seq};
use alsa::Direction;
use midiokbd_core::{AddressError, AddressSpec, ClientSpec, MidiNoteEvent, NoteKind, PortAddress};
use tracing::{debug, info};

use crate::application::dispatch_loop::{ConnectStep, NoteSource, SourceError};
use crate::domain::config::ClientIdentity;

/// A sequencer client subscribed to one source port.
pub struct AlsaSeqSource {
    seq: Seq,
}

impl AlsaSeqSource {
    /// Opens the sequencer and subscribes to `port_address`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Connect`] naming the first step that failed.
    /// The sequencer handle is closed on every error path.
    pub fn connect(identity: &ClientIdentity, port_address: &str) -> Result<Self, SourceError> {
        let seq = Seq::open(None, None, false)
            .map_err(|e| SourceError::connect(ConnectStep::Open, e))?;

        let client_name = CString::new(identity.client_name.as_str())
            .map_err(|e| SourceError::connect(ConnectStep::SetClientName, e))?;
        seq.set_client_name(&client_name)
            .map_err(|e| SourceError::connect(ConnectStep::SetClientName, e))?;

        let source = resolve_address(&seq, port_address)
            .map_err(|e| SourceError::connect(ConnectStep::ParseAddress, e))?;

        let port_name = CString::new(identity.port_name.as_str())
            .map_err(|e| SourceError::connect(ConnectStep::CreatePort, e))?;
        let port = seq
            .create_simple_port(
                &port_name,
                PortCap::WRITE | PortCap::SUBS_WRITE,
                PortType::MIDI_GENERIC | PortType::APPLICATION,
            )
            .map_err(|e| SourceError::connect(ConnectStep::CreatePort, e))?;

        let own_client = seq
            .client_id()
            .map_err(|e| SourceError::connect(ConnectStep::Subscribe, e))?;
        let subscription =
            PortSubscribe::empty().map_err(|e| SourceError::connect(ConnectStep::Subscribe, e))?;
        subscription.set_sender(Addr {
            client: source.client,
            port: source.port,
        });
        subscription.set_dest(Addr {
            client: own_client,
            port,
        });
        seq.subscribe_port(&subscription)
            .map_err(|e| SourceError::connect(ConnectStep::Subscribe, e))?;

        let own = PortAddress {
            client: own_client,
            port,
        };
        info!(%source, %own, "subscribed to MIDI port");
        Ok(Self { seq })
    }

    /// Poll descriptors that become readable when input is buffered.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Wait`] if the sequencer cannot report them.
    pub fn poll_fds(&self) -> Result<Vec<pollfd>, SourceError> {
        (&self.seq, Some(Direction::Capture))
            .get()
            .map_err(SourceError::wait)
    }
}

impl NoteSource for AlsaSeqSource {
    fn wait_readable(&mut self) -> Result<(), SourceError> {
        let mut fds = self.poll_fds()?;
        alsa::poll::poll(&mut fds, -1).map_err(SourceError::wait)?;
        Ok(())
    }

    fn next_events(&mut self) -> impl Iterator<Item = MidiNoteEvent> + '_ {
        SeqDrain::new(self.seq.input())
    }
}

/// The sequencer's client-side input buffer, as seen by [`SeqDrain`].
trait BufferedInput {
    type Error: fmt::Display;

    /// Number of events already buffered, without asking the sequencer.
    fn pending(&mut self) -> Result<u32, Self::Error>;

    /// Reads one event; `None` for anything that is not a note.
    fn read_note(&mut self) -> Result<Option<MidiNoteEvent>, Self::Error>;
}

impl BufferedInput for seq::Input<'_> {
    type Error = alsa::Error;

    fn pending(&mut self) -> Result<u32, alsa::Error> {
        self.event_input_pending(false)
    }

    fn read_note(&mut self) -> Result<Option<MidiNoteEvent>, alsa::Error> {
        let event = self.event_input()?;
        Ok(note_event(&event))
    }
}

/// Iterator over the note events buffered at one wake-up.
///
/// The first read is issued unconditionally (the descriptors just reported
/// readable); later reads only while the input buffer still holds events, so
/// the drain never blocks.
struct SeqDrain<I> {
    input: I,
    started: bool,
}

impl<I: BufferedInput> SeqDrain<I> {
    fn new(input: I) -> Self {
        Self {
            input,
            started: false,
        }
    }
}

impl<I: BufferedInput> Iterator for SeqDrain<I> {
    type Item = MidiNoteEvent;

    fn next(&mut self) -> Option<MidiNoteEvent> {
        loop {
            if self.started {
                match self.input.pending() {
                    Ok(0) => return None,
                    Ok(_) => {}
                    Err(e) => {
                        debug!("sequencer input check failed: {e}");
                        return None;
                    }
                }
            }
            self.started = true;

            match self.input.read_note() {
                Ok(Some(note)) => return Some(note),
                Ok(None) => {}
                Err(e) => {
                    debug!("sequencer read failed: {e}");
                    return None;
                }
            }
        }
    }
}

/// Converts a sequencer event to a note event; everything else is `None`.
///
/// Note numbers above 127 are not valid MIDI and are dropped here.
fn note_event(event: &seq::Event<'_>) -> Option<MidiNoteEvent> {
    let kind = match event.get_type() {
        EventType::Noteon => NoteKind::NoteOn,
        EventType::Noteoff => NoteKind::NoteOff,
        _ => return None,
    };
    let data: EvNote = event.get_data()?;
    if data.note > 127 {
        debug!(note = data.note, "dropping out-of-range note");
        return None;
    }
    Some(MidiNoteEvent {
        kind,
        channel: data.channel,
        note: data.note,
        velocity: data.velocity,
    })
}

/// Parses `text` and, for a named client, looks it up in the live client list.
fn resolve_address(seq: &Seq, text: &str) -> Result<PortAddress, AddressError> {
    let spec = AddressSpec::parse(text)?;
    let clients: Vec<(i32, String)> = match spec.client {
        ClientSpec::Id(_) => Vec::new(),
        ClientSpec::Name(_) => ClientIter::new(seq)
            .filter_map(|info| Some((info.get_client(), info.get_name().ok()?.to_owned())))
            .collect(),
    };
    spec.resolve(clients.iter().map(|(id, name)| (*id, name.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsa::seq::{EvCtrl, Event};
    use std::collections::VecDeque;

    fn note(channel: u8, note: u8, velocity: u8) -> EvNote {
        EvNote {
            channel,
            note,
            velocity,
            off_velocity: 0,
            duration: 0,
        }
    }

    #[test]
    fn test_note_on_event_is_converted() {
        let event = Event::new(EventType::Noteon, &note(2, 60, 100));

        assert_eq!(
            note_event(&event),
            Some(MidiNoteEvent {
                kind: NoteKind::NoteOn,
                channel: 2,
                note: 60,
                velocity: 100,
            })
        );
    }

    #[test]
    fn test_note_off_event_is_converted() {
        let event = Event::new(EventType::Noteoff, &note(0, 85, 40));
        let converted = note_event(&event).expect("note-off");
        assert_eq!(converted.kind, NoteKind::NoteOff);
        assert_eq!(converted.note, 85);
        assert_eq!(converted.velocity, 40);
    }

    #[test]
    fn test_controller_event_is_ignored() {
        let event = Event::new(
            EventType::Controller,
            &EvCtrl {
                channel: 0,
                param: 7,
                value: 100,
            },
        );
        assert_eq!(note_event(&event), None);
    }

    #[test]
    fn test_out_of_range_note_is_dropped() {
        let event = Event::new(EventType::Noteon, &note(0, 200, 100));
        assert_eq!(note_event(&event), None);
    }

    // ── Drain over a fake input buffer ────────────────────────────────────────

    #[derive(Default)]
    struct FakeInput {
        buffered: VecDeque<Result<Option<MidiNoteEvent>, &'static str>>,
        calls: Vec<&'static str>,
    }

    impl FakeInput {
        fn with(items: impl IntoIterator<Item = Result<Option<MidiNoteEvent>, &'static str>>) -> Self {
            Self {
                buffered: items.into_iter().collect(),
                calls: Vec::new(),
            }
        }
    }

    impl BufferedInput for &mut FakeInput {
        type Error = &'static str;

        fn pending(&mut self) -> Result<u32, &'static str> {
            self.calls.push("pending");
            Ok(self.buffered.len() as u32)
        }

        fn read_note(&mut self) -> Result<Option<MidiNoteEvent>, &'static str> {
            self.calls.push("read");
            self.buffered.pop_front().unwrap_or(Err("would block"))
        }
    }

    #[test]
    fn test_drain_reads_first_event_without_checking_pending() {
        // Arrange
        let mut input = FakeInput::with([Ok(Some(MidiNoteEvent::note_on(60, 100)))]);

        // Act
        let first = SeqDrain::new(&mut input).next();

        // Assert
        assert_eq!(first, Some(MidiNoteEvent::note_on(60, 100)));
        assert_eq!(input.calls, vec!["read"]);
    }

    #[test]
    fn test_drain_stops_when_nothing_is_pending() {
        let mut input = FakeInput::with([
            Ok(Some(MidiNoteEvent::note_on(60, 100))),
            Ok(None),
            Ok(Some(MidiNoteEvent::note_off(60, 0))),
        ]);

        let notes: Vec<_> = SeqDrain::new(&mut input).collect();

        assert_eq!(
            notes,
            vec![MidiNoteEvent::note_on(60, 100), MidiNoteEvent::note_off(60, 0)]
        );
        assert_eq!(
            input.calls,
            vec!["read", "pending", "read", "pending", "read", "pending"]
        );
    }

    #[test]
    fn test_drain_wakes_on_non_note_and_still_returns_nothing() {
        let mut input = FakeInput::with([Ok(None)]);

        let notes: Vec<_> = SeqDrain::new(&mut input).collect();

        assert!(notes.is_empty());
        assert_eq!(input.calls, vec!["read", "pending"]);
    }

    #[test]
    fn test_read_error_ends_drain_and_leaves_the_rest_buffered() {
        let mut input = FakeInput::with([
            Ok(Some(MidiNoteEvent::note_on(61, 100))),
            Err("no space left"),
            Ok(Some(MidiNoteEvent::note_off(61, 0))),
        ]);

        let notes: Vec<_> = SeqDrain::new(&mut input).collect();

        assert_eq!(notes, vec![MidiNoteEvent::note_on(61, 100)]);
        assert_eq!(input.buffered.len(), 1);
    }
}
