// CLI definitions using clap

use clap::{Parser, Subcommand};
use hid_explorer_core::DeviceFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hid-explorer")]
#[command(author, version, about = "Inspect HID report descriptors and exchange raw reports")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ~/.config/hid-explorer/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. info, hid_explorer_core=debug)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Only grant devices with this vendor ID (hex)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub vid: Option<u16>,

    /// Only grant devices with this product ID (hex)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub pid: Option<u16>,

    /// Only grant interfaces with this usage page (hex)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub usage_page: Option<u16>,

    /// Only grant interfaces with this usage (hex)
    #[arg(long, global = true, value_parser = parse_hex_u16)]
    pub usage: Option<u16>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Grant filter built from the command-line flags
    pub fn filter(&self) -> DeviceFilter {
        DeviceFilter {
            vendor_id: self.vid,
            product_id: self.pid,
            usage_page: self.usage_page,
            usage: self.usage,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List granted devices, marking the selected one
    #[command(visible_alias = "ls")]
    List,

    /// Show the report descriptor of a device
    #[command(visible_alias = "i")]
    Info {
        /// Menu index of the device (default: first device)
        #[arg(short, long)]
        device: Option<usize>,
    },

    /// Format a device description from a JSON file
    Describe {
        /// JSON device description
        file: PathBuf,
    },

    /// Send an output report: first byte is the report ID
    #[command(visible_alias = "s")]
    Send {
        /// Menu index of the device (default: first device)
        #[arg(short, long)]
        device: Option<usize>,
        /// Report bytes as hex, e.g. `01 ff 00` or `0x01,0xFF`
        #[arg(required = true, num_args = 1..)]
        hex: Vec<String>,
    },

    /// Print inbound reports until Ctrl-C
    #[command(visible_alias = "m")]
    Monitor {
        /// Menu index of the device (default: first device)
        #[arg(short, long)]
        device: Option<usize>,
        /// Stop after this many reports
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

/// Parse a 16-bit hex value, with or without `0x`
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex value '{s}': {e}"))
}
