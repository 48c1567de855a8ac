//! Rendering sink - where the session's output goes

use crate::registry::MenuEntry;

/// Consumer of everything the session displays
///
/// Each call replaces the previous content of that panel.
pub trait RenderSink {
    /// Device selection menu and the index of the selected entry
    fn device_menu(&mut self, entries: &[MenuEntry], selected: Option<usize>);

    /// Device-info panel (formatted descriptor, or empty when nothing is selected)
    fn device_info(&mut self, text: &str);

    /// Latest inbound report
    fn input_report(&mut self, text: &str);

    /// Canonical rendering of the outbound report that was just sent
    fn output_report(&mut self, text: &str);
}

/// Sink that keeps the latest content of every panel in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub menu: Vec<String>,
    pub menu_selected: Option<usize>,
    pub menu_updates: usize,
    pub device_info: String,
    pub input_report: String,
    pub input_reports_seen: usize,
    pub output_report: String,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingSink {
    fn device_menu(&mut self, entries: &[MenuEntry], selected: Option<usize>) {
        self.menu = entries.iter().map(|e| e.label.clone()).collect();
        self.menu_selected = selected;
        self.menu_updates += 1;
    }

    fn device_info(&mut self, text: &str) {
        self.device_info = text.to_string();
    }

    fn input_report(&mut self, text: &str) {
        self.input_report = text.to_string();
        self.input_reports_seen += 1;
    }

    fn output_report(&mut self, text: &str) {
        self.output_report = text.to_string();
    }
}
