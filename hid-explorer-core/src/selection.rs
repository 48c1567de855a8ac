//! Selection state machine - which device is active
//!
//! `Unselected --select(Some(d))--> Selected(d)`, `Selected --select(None)--> Unselected`.
//! Only the selected device has an inbound-report subscriber attached; every
//! transition detaches the previous device's hook before anything else, and
//! each selection gets a fresh channel so reports queued for the previous
//! device are discarded with its receiver.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::descriptor::format_device;
use crate::error::ExplorerError;
use crate::host::{Device, HostPlatform, InputReportReceiver};
use crate::session::Session;
use crate::sink::RenderSink;

/// Selection state
#[derive(Debug, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected {
        device: Device,
        /// Inbound reports from `device`'s hook
        reports: InputReportReceiver,
    },
}

impl Selection {
    pub fn device(&self) -> Option<&Device> {
        match self {
            Selection::Unselected => None,
            Selection::Selected { device, .. } => Some(device),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected { .. })
    }
}

impl<H: HostPlatform, S: RenderSink> Session<H, S> {
    /// Make `device` the active device, or clear the selection with `None`
    ///
    /// Re-selecting the active device re-runs the detach/attach sequence.
    /// A device that fails to open stays selected; the failure is logged.
    pub async fn select(&mut self, device: Option<Device>) {
        if let Some(current) = self.selection.device() {
            debug!("Detaching input reports from {}", current.product_name());
            current.set_input_report_hook(None);
        }

        let Some(device) = device else {
            self.selection = Selection::Unselected;
            info!("Selection cleared");
            self.refresh_device_menu();
            self.refresh_device_info();
            return;
        };

        if self.registry.insert(device.clone()) {
            debug!("Selected device was not registered, adding it");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        device.set_input_report_hook(Some(tx));

        if !device.opened() {
            if let Err(e) = device.open().await {
                warn!("Failed to open {}: {}", device.product_name(), e);
            }
        }

        info!(
            "Selected {} ({:04X}:{:04X})",
            device.product_name(),
            device.vendor_id(),
            device.product_id()
        );
        self.selection = Selection::Selected {
            device,
            reports: rx,
        };
        self.refresh_device_menu();
        self.refresh_device_info();
    }

    /// Select whatever sits behind menu entry `index`
    ///
    /// The empty-registry placeholder clears the selection.
    pub async fn select_menu_index(&mut self, index: usize) -> Result<(), ExplorerError> {
        let entry = self
            .registry
            .menu_entries()
            .into_iter()
            .nth(index)
            .ok_or_else(|| {
                warn!("No menu entry at index {}", index);
                ExplorerError::UnknownMenuIndex(index)
            })?;
        self.select(entry.device).await;
        Ok(())
    }

    /// Re-render the device-info panel for the active device
    ///
    /// With nothing selected the panel is cleared.
    pub fn refresh_device_info(&mut self) {
        let text = match self.selection.device() {
            Some(device) => format_device(&**device),
            None => String::new(),
        };
        self.sink.device_info(&text);
    }
}
