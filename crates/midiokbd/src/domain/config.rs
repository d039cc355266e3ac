//! Runtime configuration for one midiokbd session.
//!
//! Everything here is fixed at startup: the command line supplies the port
//! address and layout, the rest are compiled-in identities.

use midiokbd_core::Layout;

/// Linux `BUS_USB` bus type from `<linux/input.h>`.
pub const BUS_USB: u16 = 0x03;

/// How the virtual keyboard identifies itself to the kernel.
///
/// These values show up in `/proc/bus/input/devices` and in tools such as
/// `evtest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub bus_type: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    pub name: String,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            bus_type: BUS_USB,
            vendor: 0x1234,
            product: 0x5678,
            version: 0,
            name: "MIDIOKBD".to_string(),
        }
    }
}

/// How we appear in the sequencer's client list (`aconnect -l`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub client_name: String,
    pub port_name: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            client_name: "midiokbd".to_string(),
            port_name: "midiokbd".to_string(),
        }
    }
}

/// Complete configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Source port, as typed on the command line (`20:0`, `"Midi Through"`).
    pub port_address: String,
    pub layout: Layout,
    pub device: DeviceIdentity,
    pub client: ClientIdentity,
}

impl AppConfig {
    /// Creates a config for `port_address` with the default layout and identities.
    pub fn new(port_address: impl Into<String>) -> Self {
        Self {
            port_address: port_address.into(),
            layout: Layout::default(),
            device: DeviceIdentity::default(),
            client: ClientIdentity::default(),
        }
    }

    /// Replaces the note layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}
