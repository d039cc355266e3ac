//! Application layer: use cases that depend only on traits.
//!
//! - [`translate_notes`] – the [`VirtualKeyboard`](translate_notes::VirtualKeyboard)
//!   seam and the per-note dispatcher.
//! - [`dispatch_loop`] – the [`NoteSource`](dispatch_loop::NoteSource) seam and
//!   the wait/drain loop.
//! - [`session`] – setup, loop and teardown in order, with rollback when a
//!   setup step fails.

pub mod dispatch_loop;
pub mod session;
pub mod translate_notes;
