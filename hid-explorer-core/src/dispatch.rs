//! Report dispatch - inbound reports to the sink, operator text to the device

use tracing::{debug, warn};

use crate::error::ExplorerError;
use crate::hex::{self, hex8};
use crate::host::HostPlatform;
use crate::selection::Selection;
use crate::session::Session;
use crate::sink::RenderSink;
use crate::types::InputReport;

/// Render an inbound report as one hex stream: report ID, then payload bytes
pub fn render_input_report(report: &InputReport) -> String {
    let mut text = hex8(report.report_id);
    if !report.data.is_empty() {
        text.push(' ');
        text.push_str(&hex::encode(&report.data));
    }
    text
}

impl<H: HostPlatform, S: RenderSink> Session<H, S> {
    /// Show an inbound report, replacing the previous one
    pub fn handle_input_report(&mut self, report: &InputReport) {
        debug!(
            "Input report 0x{:02X}: {} bytes",
            report.report_id,
            report.data.len()
        );
        self.sink.input_report(&render_input_report(report));
    }

    /// Wait for the next inbound report from the selected device
    ///
    /// Returns `None` immediately when nothing is selected.
    pub async fn next_input_report(&mut self) -> Option<InputReport> {
        match &mut self.selection {
            Selection::Selected { reports, .. } => reports.recv().await,
            Selection::Unselected => None,
        }
    }

    /// Wait for one inbound report and render it
    ///
    /// Returns false when there is no active subscription.
    pub async fn pump_input_report(&mut self) -> bool {
        match self.next_input_report().await {
            Some(report) => {
                self.handle_input_report(&report);
                true
            }
            None => false,
        }
    }

    /// Parse operator hex text and send it to the selected device
    ///
    /// The first byte is the report ID, the rest is the payload. Once the
    /// text decodes, the sink's output panel gets its canonical form. Nothing
    /// is sent when no device is selected or the text does not decode to at
    /// least one byte.
    pub async fn send_output_report(&mut self, text: &str) -> Result<(), ExplorerError> {
        let Some(device) = self.selection.device().cloned() else {
            debug!("Output report ignored, no device selected");
            return Err(ExplorerError::NoSelection);
        };

        let bytes = hex::decode(text).map_err(|e| {
            warn!("Output report not sent: {}", e);
            e
        })?;
        let Some((&report_id, payload)) = bytes.split_first() else {
            debug!("Output report ignored, no bytes entered");
            return Err(ExplorerError::EmptyReport);
        };

        self.sink.output_report(&hex::encode(&bytes));

        debug!(
            "Sending output report 0x{:02X} to {}: {:02X?}",
            report_id,
            device.product_name(),
            payload
        );
        device.send_report(report_id, payload).await.map_err(|e| {
            warn!("Failed to send output report 0x{:02X}: {}", report_id, e);
            ExplorerError::from(e)
        })
    }
}
