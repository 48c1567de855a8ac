//! Host platform abstraction
//!
//! The host platform owns the actual HID devices: it enumerates them, grants
//! access, opens them and moves reports. Everything in this crate talks to
//! devices only through these traits.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::HostError;
use crate::types::{Collection, DeviceFilter, InputReport};

/// Sending half of a device's inbound-report subscription
pub type InputReportSender = mpsc::UnboundedSender<InputReport>;

/// Receiving half of a device's inbound-report subscription
pub type InputReportReceiver = mpsc::UnboundedReceiver<InputReport>;

/// A HID device as exposed by the host platform
#[async_trait]
pub trait HostDevice: Send + Sync {
    fn product_name(&self) -> String;

    fn vendor_id(&self) -> u16;

    fn product_id(&self) -> u16;

    /// Whether the device is currently open
    fn opened(&self) -> bool;

    /// Parsed collections, in descriptor order
    fn collections(&self) -> &[Collection];

    async fn open(&self) -> Result<(), HostError>;

    async fn close(&self) -> Result<(), HostError>;

    /// Send an output report. `payload` excludes the report ID.
    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), HostError>;

    /// Replace the single inbound-report subscriber slot
    ///
    /// `None` detaches. Reports arriving while detached are dropped by the host.
    fn set_input_report_hook(&self, hook: Option<InputReportSender>);
}

/// Access to the host's device list and grant flow
#[async_trait]
pub trait HostPlatform: Send + Sync {
    /// Devices the operator has already granted access to
    async fn get_authorized_devices(&self) -> Result<Vec<Device>, HostError>;

    /// Ask for access to devices matching any of `filters`
    ///
    /// An empty result means the operator declined.
    async fn request_device(&self, filters: &[DeviceFilter]) -> Result<Vec<Device>, HostError>;
}

/// Shared handle to a host device
///
/// Two handles are equal only when they refer to the same host object.
#[derive(Clone)]
pub struct Device(Arc<dyn HostDevice>);

impl Device {
    pub fn new(inner: Arc<dyn HostDevice>) -> Self {
        Self(inner)
    }

    /// Check the device against a grant filter
    pub fn matches(&self, filter: &DeviceFilter) -> bool {
        filter.matches(self.vendor_id(), self.product_id(), self.collections())
    }

    /// Check the device against a filter list (empty list matches everything)
    pub fn matches_any(&self, filters: &[DeviceFilter]) -> bool {
        filters.is_empty() || filters.iter().any(|f| self.matches(f))
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl<T: HostDevice + 'static> From<Arc<T>> for Device {
    fn from(inner: Arc<T>) -> Self {
        Self(inner)
    }
}

impl Deref for Device {
    type Target = dyn HostDevice;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for Device {}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("product_name", &self.product_name())
            .field("vendor_id", &format_args!("{:04X}", self.vendor_id()))
            .field("product_id", &format_args!("{:04X}", self.product_id()))
            .field("opened", &self.opened())
            .field("handle", &self.addr())
            .finish()
    }
}
