//! In-memory host platform
//!
//! `VirtualDevice` behaves like a granted HID device without any hardware:
//! it remembers the reports sent to it and can inject inbound reports into
//! whatever subscriber is attached. `VirtualHost` hands such devices out
//! through the same grant flow a real host uses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::HostError;
use crate::host::{Device, HostDevice, HostPlatform, InputReportSender};
use crate::types::{Collection, DeviceDescription, DeviceFilter, InputReport};

/// Device backed by a [`DeviceDescription`]
pub struct VirtualDevice {
    description: DeviceDescription,
    opened: AtomicBool,
    fail_open: AtomicBool,
    open_calls: AtomicUsize,
    hook: Mutex<Option<InputReportSender>>,
    sent: Mutex<Vec<(u8, Vec<u8>)>>,
}

impl VirtualDevice {
    pub fn new(description: DeviceDescription) -> Self {
        Self {
            description,
            opened: AtomicBool::new(false),
            fail_open: AtomicBool::new(false),
            open_calls: AtomicUsize::new(0),
            hook: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a device without collections
    pub fn named(product_name: &str, vendor_id: u16, product_id: u16) -> Self {
        Self::new(DeviceDescription {
            product_name: product_name.to_string(),
            vendor_id,
            product_id,
            collections: Vec::new(),
        })
    }

    /// Make subsequent `open` calls fail
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    /// Number of `open` calls seen so far
    pub fn open_calls(&self) -> usize {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Reports sent to this device, as `(report_id, payload)`
    pub fn sent_reports(&self) -> Vec<(u8, Vec<u8>)> {
        self.sent.lock().clone()
    }

    /// Whether an inbound-report subscriber is attached
    pub fn has_input_hook(&self) -> bool {
        self.hook.lock().is_some()
    }

    /// Deliver an inbound report to the attached subscriber
    ///
    /// Returns false when nobody is subscribed and the report was dropped.
    pub fn emit_input_report(&self, report_id: u8, data: &[u8]) -> bool {
        let hook = self.hook.lock();
        match hook.as_ref() {
            Some(tx) => tx
                .send(InputReport {
                    report_id,
                    data: data.to_vec(),
                })
                .is_ok(),
            None => {
                debug!(
                    "{}: dropping input report 0x{:02X}, no subscriber",
                    self.description.product_name, report_id
                );
                false
            }
        }
    }
}

#[async_trait]
impl HostDevice for VirtualDevice {
    fn product_name(&self) -> String {
        self.description.product_name.clone()
    }

    fn vendor_id(&self) -> u16 {
        self.description.vendor_id
    }

    fn product_id(&self) -> u16 {
        self.description.product_id
    }

    fn opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    fn collections(&self) -> &[Collection] {
        &self.description.collections
    }

    async fn open(&self) -> Result<(), HostError> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(HostError::Hid(format!(
                "failed to open {}",
                self.description.product_name
            )));
        }
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) -> Result<(), HostError> {
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), HostError> {
        if !self.opened() {
            return Err(HostError::NotOpen);
        }
        self.sent.lock().push((report_id, payload.to_vec()));
        Ok(())
    }

    fn set_input_report_hook(&self, hook: Option<InputReportSender>) {
        *self.hook.lock() = hook;
    }
}

/// Host platform serving virtual devices
///
/// Grant requests are answered from a queue of prepared responses; when the
/// queue is empty the request behaves as if the operator declined.
#[derive(Default)]
pub struct VirtualHost {
    authorized: Mutex<Vec<Device>>,
    grants: Mutex<VecDeque<Vec<Device>>>,
}

impl VirtualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a device as already granted
    pub fn authorize(&self, device: Device) {
        let mut authorized = self.authorized.lock();
        if !authorized.contains(&device) {
            authorized.push(device);
        }
    }

    /// Queue the answer for the next grant request
    pub fn queue_grant(&self, devices: Vec<Device>) {
        self.grants.lock().push_back(devices);
    }
}

#[async_trait]
impl HostPlatform for VirtualHost {
    async fn get_authorized_devices(&self) -> Result<Vec<Device>, HostError> {
        Ok(self.authorized.lock().clone())
    }

    async fn request_device(&self, filters: &[DeviceFilter]) -> Result<Vec<Device>, HostError> {
        let offered = self.grants.lock().pop_front().unwrap_or_default();
        let granted: Vec<Device> = offered
            .into_iter()
            .filter(|d| d.matches_any(filters))
            .collect();
        for device in &granted {
            self.authorize(device.clone());
        }
        Ok(granted)
    }
}

/// Wrap a virtual device into a shared handle, keeping typed access
pub fn virtual_handle(device: VirtualDevice) -> (Arc<VirtualDevice>, Device) {
    let inner = Arc::new(device);
    let handle = Device::from(Arc::clone(&inner));
    (inner, handle)
}
