// HID Explorer - shared library
// Configuration and terminal rendering used by the CLI

pub mod config;
pub mod terminal;

pub use config::{ExplorerConfig, MonitorSettings};
pub use terminal::TerminalSink;
