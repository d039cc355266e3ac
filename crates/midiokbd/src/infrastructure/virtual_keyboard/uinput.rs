//! Linux virtual keyboard via `/dev/uinput`.
//!
//! # What is uinput? (for beginners)
//!
//! uinput is a kernel module that lets a user-space process create an input
//! device.  The process opens `/dev/uinput`, declares which event types and
//! keys the device can produce, and asks the kernel to create it.  From then
//! on, every `input_event` struct written to the file descriptor is delivered
//! to the rest of the system exactly as if a USB keyboard had sent it.
//!
//! Each key transition is written as two events:
//!
//! ```text
//! EV_KEY  <code>  1|0     key frame: press or release
//! EV_SYN  SYN_REPORT 0    sync frame: "this report is complete"
//! ```
//!
//! Without the sync frame, readers such as X11 or libinput buffer the key
//! frame and nothing happens until the next report.
//!
//! # Permissions
//!
//! Opening `/dev/uinput` normally requires root or membership of the `input`
//! group (or a udev rule granting access).  Otherwise setup fails at
//! [`DeviceStep::Open`] with `Permission denied`.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;

use input_linux::{
    sys, EventKind, EventTime, InputEvent, InputId, Key, KeyEvent as LinuxKeyEvent, KeyState,
    SynchronizeEvent, SynchronizeKind, UInputHandle,
};
use midiokbd_core::{InputFrame, KeyCode, KeyDirection, KeyEvent};
use nix::libc::O_NONBLOCK;
use tracing::{debug, info, warn};

use crate::application::translate_notes::{DeviceStep, KeyboardError, VirtualKeyboard};
use crate::domain::config::DeviceIdentity;

const UINPUT_PATH: &str = "/dev/uinput";

/// A keyboard device created through uinput.
///
/// The device exists from a successful [`setup`](Self::setup) until
/// [`teardown`](Self::teardown) or drop, whichever comes first.
pub struct UinputKeyboard {
    handle: UInputHandle<File>,
    destroyed: bool,
}

impl UinputKeyboard {
    /// Creates a virtual keyboard that can emit exactly `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyboardError::Device`] naming the first step that failed.
    /// Anything created before the failure is released when the partially
    /// built handle is dropped.
    pub fn setup(identity: &DeviceIdentity, keys: &BTreeSet<KeyCode>) -> Result<Self, KeyboardError> {
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(O_NONBLOCK)
            .open(UINPUT_PATH)
            .map_err(|source| device_error(DeviceStep::Open, source))?;
        let handle = UInputHandle::new(file);

        handle
            .set_evbit(EventKind::Key)
            .map_err(|source| device_error(DeviceStep::DeclareKeyEvents, source))?;
        for &key in keys {
            handle
                .set_keybit(linux_key(key))
                .map_err(|source| device_error(DeviceStep::DeclareKey(key), source))?;
        }

        let id = InputId {
            bustype: identity.bus_type,
            vendor: identity.vendor,
            product: identity.product,
            version: identity.version,
        };
        handle
            .create(&id, identity.name.as_bytes(), 0, &[])
            .map_err(|source| device_error(DeviceStep::Create, source))?;

        info!(
            name = %identity.name,
            vendor = format_args!("{:#06x}", identity.vendor),
            product = format_args!("{:#06x}", identity.product),
            keys = keys.len(),
            "virtual keyboard created"
        );
        Ok(Self {
            handle,
            destroyed: false,
        })
    }

    fn destroy(&mut self) -> Result<(), KeyboardError> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        self.handle
            .dev_destroy()
            .map_err(|source| device_error(DeviceStep::Destroy, source))?;
        debug!("virtual keyboard destroyed");
        Ok(())
    }
}

impl Drop for UinputKeyboard {
    fn drop(&mut self) {
        if let Err(e) = self.destroy() {
            warn!("{e}");
        }
    }
}

impl VirtualKeyboard for UinputKeyboard {
    fn emit(&self, event: KeyEvent) -> Result<(), KeyboardError> {
        let raw = raw_frames(event);
        let written = self.handle.write(&raw).map_err(KeyboardError::Write)?;
        if written < raw.len() {
            return Err(KeyboardError::Write(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {written} of {} events", raw.len()),
            )));
        }
        Ok(())
    }

    /// Destroys the device.  The file descriptor is closed either way.
    fn teardown(mut self) -> Result<(), KeyboardError> {
        self.destroy()
    }
}

fn device_error(step: DeviceStep, source: io::Error) -> KeyboardError {
    KeyboardError::Device { step, source }
}

/// Encodes a key event as the raw key + sync pair the kernel expects.
fn raw_frames(event: KeyEvent) -> [sys::input_event; 2] {
    let time = EventTime::new(0, 0);
    event.frames().map(|frame| match frame {
        InputFrame::Key(KeyEvent { key, direction }) => *InputEvent::from(LinuxKeyEvent::new(
            time,
            linux_key(key),
            KeyState::pressed(direction == KeyDirection::Pressed),
        ))
        .as_raw(),
        InputFrame::Sync => {
            *InputEvent::from(SynchronizeEvent::new(time, SynchronizeKind::Report, 0)).as_raw()
        }
    })
}

fn linux_key(key: KeyCode) -> Key {
    match key {
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyM => Key::M,
    }
}
