//! Core of HID Explorer
//!
//! Tracks the HID devices an operator has been granted, keeps one of them
//! selected, renders its report descriptor as text and moves raw reports
//! in both directions as hex text:
//!
//! - `registry`: known devices, in display order
//! - `selection`: the active device and its inbound-report subscription
//! - `descriptor`: descriptor text formatter
//! - `hex`: hex text codec
//! - `dispatch`: inbound rendering and outbound sending
//!
//! Devices come from a [`HostPlatform`]: [`HidApiHost`] for real hardware,
//! [`VirtualHost`] for in-memory devices.

pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod hex;
pub mod host;
pub mod registry;
pub mod selection;
pub mod session;
pub mod sink;
pub mod types;
pub mod virtual_device;

mod hid_host;

pub use descriptor::{bit_layout, format_device};
pub use dispatch::render_input_report;
pub use error::{ExplorerError, HostError};
pub use hid_host::{HidApiDevice, HidApiHost};
pub use host::{Device, HostDevice, HostPlatform, InputReportReceiver, InputReportSender};
pub use registry::{MenuEntry, Registry, NO_DEVICES_LABEL};
pub use selection::Selection;
pub use session::Session;
pub use sink::{RecordingSink, RenderSink};
pub use types::{
    Collection, DeviceDescription, DeviceFilter, InputReport, Report, ReportCategory, ReportItem,
};
pub use virtual_device::{virtual_handle, VirtualDevice, VirtualHost};
