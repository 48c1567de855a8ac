//! Report command handlers.

use hid_explorer_core::DeviceFilter;
use tracing::{info, warn};

use super::{choose_device, open_session, CommandResult, OutputOptions, TerminalSession};

/// Send one output report given as hex words
pub async fn send(
    filters: &[DeviceFilter],
    device: Option<usize>,
    hex: &[String],
    options: OutputOptions,
) -> CommandResult {
    let mut session = open_session(filters, options).await?;
    if !choose_device(&mut session, device).await? {
        return Ok(());
    }

    session.send_output_report(&hex.join(" ")).await?;
    session.sink_mut().print_output_report()?;
    close_selected(&session).await;
    Ok(())
}

/// Print inbound reports until Ctrl-C, the subscription ends, or `limit` is hit
pub async fn monitor(
    filters: &[DeviceFilter],
    device: Option<usize>,
    limit: Option<usize>,
    options: OutputOptions,
) -> CommandResult {
    let live = OutputOptions {
        live_input: true,
        ..options
    };
    let mut session = open_session(filters, live).await?;
    if !choose_device(&mut session, device).await? {
        return Ok(());
    }

    if let Some(device) = session.selected_device() {
        eprintln!("Monitoring {} (Ctrl-C to stop)", device.product_name());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut seen = 0usize;

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted after {} reports", seen);
                break;
            }
            more = session.pump_input_report() => {
                if !more {
                    break;
                }
                seen += 1;
                if limit.is_some_and(|l| seen >= l) {
                    break;
                }
            }
        }
    }

    close_selected(&session).await;
    Ok(())
}

async fn close_selected(session: &TerminalSession) {
    if let Some(device) = session.selected_device() {
        if let Err(e) = device.close().await {
            warn!("Failed to close {}: {}", device.product_name(), e);
        }
    }
}
