//! midiokbd entry point.
//!
//! Parses the command line, sets up the virtual keyboard and the sequencer
//! subscription, then runs the dispatch loop until waiting for MIDI fails.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::try_parse()            -- port address + layout
//!  └─ run(AppConfig)
//!       ├─ NoteKeyMap::for_layout     -- which note presses which key
//!       └─ run_session
//!            ├─ UinputKeyboard::setup  -- declares exactly the mapped keys
//!            ├─ AlsaSeqSource::connect -- subscribes to PORT-ADDRESS
//!            ├─ run_dispatch_loop      -- wait / drain / press, until wait fails
//!            └─ teardown               -- also on a failed connect
//! ```
//!
//! # Exit codes
//!
//! - `0` – the loop ended because waiting failed, or `--help`/`--version`.
//! - `1` – bad arguments, or a setup step failed.  The failing step is printed
//!   to stderr as `<step>: <description>`.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use midiokbd::domain::AppConfig;
use midiokbd_core::Layout;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Note layouts selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Notes 60-85 press A to Z in alphabetical order.
    Alphabet,
    /// Notes 60-85 press the letters in QWERTY keyboard order.
    Qwerty,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Alphabet => Layout::Alphabet,
            LayoutArg::Qwerty => Layout::Qwerty,
        }
    }
}

/// Turns a MIDI keyboard into a computer keyboard.
///
/// Subscribes to an ALSA sequencer port and presses a key on a virtual uinput
/// keyboard for every mapped note.
#[derive(Debug, Parser)]
#[command(
    name = "midiokbd",
    about = "Type letters on a MIDI keyboard via a virtual uinput keyboard",
    version
)]
struct Cli {
    /// Sequencer port to read notes from, e.g. `20:0`, `20` or `"Midi Through"`.
    ///
    /// Run `aconnect -l` to list the available ports.
    #[arg(value_name = "PORT-ADDRESS")]
    port_address: String,

    /// Which letters the notes from middle C upwards press.
    #[arg(long, value_enum, default_value_t = LayoutArg::Alphabet)]
    layout: LayoutArg,
}

impl Cli {
    /// Converts the parsed arguments into an [`AppConfig`].
    fn into_config(self) -> AppConfig {
        AppConfig::new(self.port_address).with_layout(self.layout.into())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // `RUST_LOG` overrides the default `info` level.  Logs go to stderr so
    // stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli.into_config()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one session against uinput and the ALSA sequencer.
#[cfg(target_os = "linux")]
fn run(config: AppConfig) -> anyhow::Result<()> {
    use midiokbd::application::session::run_session;
    use midiokbd::infrastructure::midi_source::AlsaSeqSource;
    use midiokbd::infrastructure::virtual_keyboard::UinputKeyboard;
    use midiokbd_core::NoteKeyMap;

    tracing::info!(layout = config.layout.name(), port = %config.port_address, "midiokbd starting");

    let keymap = NoteKeyMap::for_layout(config.layout);
    run_session(
        &keymap,
        |keys| UinputKeyboard::setup(&config.device, keys),
        || AlsaSeqSource::connect(&config.client, &config.port_address),
    )?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(_config: AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("midiokbd needs Linux: it uses the ALSA sequencer and /dev/uinput")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
