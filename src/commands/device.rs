//! Device command handlers.

use std::path::Path;

use anyhow::Context;
use hid_explorer_core::{format_device, DeviceDescription, DeviceFilter, VirtualDevice};

use super::{choose_device, open_session, CommandResult, OutputOptions};

/// List granted devices
pub async fn list(filters: &[DeviceFilter], options: OutputOptions) -> CommandResult {
    let mut session = open_session(filters, options).await?;
    session.sink_mut().print_menu()?;
    Ok(())
}

/// Show the report descriptor of the selected device
pub async fn info(
    filters: &[DeviceFilter],
    device: Option<usize>,
    options: OutputOptions,
) -> CommandResult {
    let mut session = open_session(filters, options).await?;
    if !choose_device(&mut session, device).await? {
        return Ok(());
    }
    session.sink_mut().print_device_info()?;
    Ok(())
}

/// Format a JSON device description without touching hardware
pub fn describe(file: &Path) -> CommandResult {
    let content =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let description = DeviceDescription::from_json(&content)
        .with_context(|| format!("parsing {}", file.display()))?;
    println!("{}", format_device(&VirtualDevice::new(description)));
    Ok(())
}
