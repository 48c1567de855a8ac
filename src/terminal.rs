//! Terminal rendering sink
//!
//! Keeps the latest content of every panel and prints a panel when a command
//! asks for it. Inbound reports can also be printed as they arrive, one line
//! per report, for `monitor`.

use std::io::{self, Write};

use crossterm::style::Stylize;
use hid_explorer_core::{MenuEntry, RenderSink};
use tracing::warn;

pub struct TerminalSink<W: Write> {
    out: W,
    color: bool,
    live_input: bool,
    menu: Vec<String>,
    selected: Option<usize>,
    device_info: String,
    input_report: String,
    output_report: String,
}

impl TerminalSink<io::Stdout> {
    /// Sink on stdout, colored
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_color(true)
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: false,
            live_input: false,
            menu: Vec::new(),
            selected: None,
            device_info: String::new(),
            input_report: String::new(),
            output_report: String::new(),
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Print inbound reports as they arrive
    pub fn with_live_input(mut self, live: bool) -> Self {
        self.live_input = live;
        self
    }

    /// Print the device menu, marking the selected entry
    pub fn print_menu(&mut self) -> io::Result<()> {
        for (i, label) in self.menu.iter().enumerate() {
            if self.selected == Some(i) {
                let line = format!("* [{i}] {label}");
                if self.color {
                    writeln!(self.out, "{}", line.as_str().bold().green())?;
                } else {
                    writeln!(self.out, "{line}")?;
                }
            } else {
                writeln!(self.out, "  [{i}] {label}")?;
            }
        }
        Ok(())
    }

    pub fn print_device_info(&mut self) -> io::Result<()> {
        if self.device_info.is_empty() {
            writeln!(self.out, "No device selected")
        } else {
            writeln!(self.out, "{}", self.device_info)
        }
    }

    /// Print the latest inbound report
    pub fn print_input_report(&mut self) -> io::Result<()> {
        let label = if self.color {
            "<<<".green().to_string()
        } else {
            "<<<".to_string()
        };
        writeln!(self.out, "{} {}", label, self.input_report)
    }

    /// Print the canonical form of the last sent report
    pub fn print_output_report(&mut self) -> io::Result<()> {
        let label = if self.color {
            ">>>".cyan().to_string()
        } else {
            ">>>".to_string()
        };
        writeln!(self.out, "{} {}", label, self.output_report)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn device_menu(&mut self, entries: &[MenuEntry], selected: Option<usize>) {
        self.menu = entries.iter().map(|e| e.label.clone()).collect();
        self.selected = selected;
    }

    fn device_info(&mut self, text: &str) {
        self.device_info = text.to_string();
    }

    fn input_report(&mut self, text: &str) {
        self.input_report = text.to_string();
        if !self.live_input {
            return;
        }
        if let Err(e) = self.print_input_report().and_then(|_| self.out.flush()) {
            warn!("Failed to print input report: {}", e);
        }
    }

    fn output_report(&mut self, text: &str) {
        self.output_report = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hid_explorer_core::{virtual_handle, VirtualDevice};

    fn output(sink: TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_menu_marks_selection() {
        let (_, a) = virtual_handle(VirtualDevice::named("Keyboard", 1, 1));
        let (_, b) = virtual_handle(VirtualDevice::named("Mouse", 1, 2));
        let entries = vec![
            MenuEntry {
                label: "Keyboard".into(),
                device: Some(a),
            },
            MenuEntry {
                label: "Mouse".into(),
                device: Some(b),
            },
        ];

        let mut sink = TerminalSink::new(Vec::new());
        sink.device_menu(&entries, Some(1));
        sink.print_menu().unwrap();
        assert_eq!(output(sink), "  [0] Keyboard\n* [1] Mouse\n");
    }

    #[test]
    fn test_input_reports_only_printed_when_live() {
        let mut quiet = TerminalSink::new(Vec::new());
        quiet.input_report("01 02");
        assert_eq!(output(quiet), "");

        let mut live = TerminalSink::new(Vec::new()).with_live_input(true);
        live.input_report("01 02");
        live.input_report("01 03");
        assert_eq!(output(live), "<<< 01 02\n<<< 01 03\n");
    }

    #[test]
    fn test_quiet_input_report_keeps_latest() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.input_report("01 02");
        sink.input_report("01 03");
        sink.print_input_report().unwrap();
        assert_eq!(output(sink), "<<< 01 03\n");
    }

    #[test]
    fn test_empty_device_info() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.device_info("");
        sink.print_device_info().unwrap();
        assert_eq!(output(sink), "No device selected\n");
    }

    #[test]
    fn test_output_report() {
        let mut sink = TerminalSink::new(Vec::new());
        sink.output_report("02 FF");
        sink.print_output_report().unwrap();
        assert_eq!(output(sink), ">>> 02 FF\n");
    }
}
