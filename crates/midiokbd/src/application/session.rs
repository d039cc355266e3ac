//! One midiokbd session: set up, run the dispatch loop, tear down.
//!
//! The order is fixed:
//!
//! ```text
//! setup keyboard ─▶ connect source ─▶ dispatch loop ─▶ close source ─▶ teardown keyboard
//! ```
//!
//! If connecting fails after the keyboard exists, the keyboard is torn down
//! before the error is returned, so no virtual device outlives a failed start.
//! The concrete keyboard and source are built by the caller's closures, which
//! lets the same sequence run against uinput/ALSA or against mocks.

use std::collections::BTreeSet;

use midiokbd_core::{KeyCode, NoteKeyMap};
use thiserror::Error;
use tracing::{info, warn};

use super::dispatch_loop::{run_dispatch_loop, LoopExit, NoteSource, SourceError};
use super::translate_notes::{KeyboardError, NoteDispatcher, VirtualKeyboard};

/// A setup step failed; the session never reached the dispatch loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Keyboard(#[from] KeyboardError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Runs a full session and returns how the dispatch loop ended.
///
/// `setup_keyboard` receives the keys `keymap` can press.  `connect_source`
/// is only called once the keyboard exists.
///
/// # Errors
///
/// Returns [`SessionError`] if either setup step fails.  A failed teardown
/// after the loop is logged at `warn` and does not count as an error.
pub fn run_session<K, S>(
    keymap: &NoteKeyMap,
    setup_keyboard: impl FnOnce(&BTreeSet<KeyCode>) -> Result<K, KeyboardError>,
    connect_source: impl FnOnce() -> Result<S, SourceError>,
) -> Result<LoopExit, SessionError>
where
    K: VirtualKeyboard,
    S: NoteSource,
{
    if let Some((first, last)) = keymap.mapped_range() {
        info!("notes {first}-{last} are mapped");
    }

    let keyboard = setup_keyboard(&keymap.supported_keys())?;
    let mut source = match connect_source() {
        Ok(source) => source,
        Err(e) => {
            if let Err(teardown) = keyboard.teardown() {
                warn!("{teardown}");
            }
            return Err(e.into());
        }
    };

    let exit = {
        let dispatcher = NoteDispatcher::new(keymap, &keyboard);
        run_dispatch_loop(&mut source, &dispatcher)
    };
    info!(
        wakeups = exit.stats.wakeups,
        events = exit.stats.events_seen,
        keys = exit.stats.keys_emitted,
        write_failures = exit.stats.write_failures,
        "{}; shutting down",
        exit.reason
    );

    drop(source);
    if let Err(e) = keyboard.teardown() {
        warn!("{e}");
    }
    Ok(exit)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
