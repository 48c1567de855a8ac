//! Command handlers for the CLI application.
//!
//! - `device`: list, info, describe
//! - `report`: send, monitor

pub mod device;
pub mod report;

use std::io;

use hid_explorer::TerminalSink;
use hid_explorer_core::{DeviceFilter, HidApiHost, Session};
use tracing::debug;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Session over the system's HID devices, rendering to the terminal
pub type TerminalSession = Session<HidApiHost, TerminalSink<io::Stdout>>;

/// Output options shared by all commands
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub color: bool,
    pub live_input: bool,
}

/// Create a session and connect: authorized devices, then a grant request
pub async fn open_session(
    filters: &[DeviceFilter],
    options: OutputOptions,
) -> anyhow::Result<TerminalSession> {
    let sink = TerminalSink::stdout()
        .with_color(options.color)
        .with_live_input(options.live_input);
    let mut session = Session::new(HidApiHost::new(), sink);
    session.connect(filters).await?;
    debug!("Connected, {} devices registered", session.registry().len());
    Ok(session)
}

/// Select menu entry `device` if given; report whether a device is active.
/// Prints a message and returns false if nothing could be selected.
pub async fn choose_device(
    session: &mut TerminalSession,
    device: Option<usize>,
) -> anyhow::Result<bool> {
    if let Some(index) = device {
        session.select_menu_index(index).await?;
    }
    if session.selected_device().is_none() {
        eprintln!("No device found");
        return Ok(false);
    }
    Ok(true)
}
