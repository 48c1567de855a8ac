//! hidapi-backed host platform
//!
//! Desktop hosts have no permission dialog, so a "grant" here means the
//! operator's filters matched a HID interface. Every interface hidapi
//! enumerates becomes one device; handles are cached by path so the same
//! interface keeps the same identity across enumerations.
//!
//! hidapi exposes only the interface's top-level usage pair, not the parsed
//! report layout, so each device has a single collection with no reports.

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hidapi::{HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::HostError;
use crate::host::{Device, HostDevice, HostPlatform, InputReportSender};
use crate::types::{Collection, DeviceFilter, InputReport};

/// Largest input report read in one go
const MAX_REPORT_SIZE: usize = 4096;

/// Reader poll timeout; bounds how long shutdown takes to be noticed
const READ_TIMEOUT_MS: i32 = 5;

/// Back-off after a failed read
const ERROR_SLEEP_MS: u64 = 100;

type HookSlot = Arc<Mutex<Option<InputReportSender>>>;

/// Host platform over the system's HID devices
#[derive(Default)]
pub struct HidApiHost {
    /// Every interface seen so far, by path
    known: Mutex<HashMap<CString, Device>>,
    /// Interfaces granted in this session, in grant order
    granted: Mutex<Vec<Device>>,
}

impl HidApiHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate all HID interfaces, reusing cached handles
    fn enumerate(&self) -> Result<Vec<Device>, HostError> {
        let api = HidApi::new()?;
        let mut known = self.known.lock();
        let mut devices = Vec::new();

        for info in api.device_list() {
            let device = known
                .entry(info.path().to_owned())
                .or_insert_with(|| Device::from(Arc::new(HidApiDevice::from_info(info))))
                .clone();
            devices.push(device);
        }

        debug!("Enumerated {} HID interfaces", devices.len());
        Ok(devices)
    }
}

#[async_trait]
impl HostPlatform for HidApiHost {
    async fn get_authorized_devices(&self) -> Result<Vec<Device>, HostError> {
        Ok(self.granted.lock().clone())
    }

    async fn request_device(&self, filters: &[DeviceFilter]) -> Result<Vec<Device>, HostError> {
        let matching: Vec<Device> = self
            .enumerate()?
            .into_iter()
            .filter(|d| d.matches_any(filters))
            .collect();

        let mut granted = self.granted.lock();
        for device in &matching {
            if !granted.contains(device) {
                granted.push(device.clone());
            }
        }

        info!("Granted {} HID interfaces", matching.len());
        Ok(matching)
    }
}

/// Handle of an open interface plus its reader's stop flag
struct OpenState {
    device: Arc<Mutex<HidDevice>>,
    shutdown: Arc<AtomicBool>,
}

/// One HID interface
pub struct HidApiDevice {
    path: CString,
    product_name: String,
    vendor_id: u16,
    product_id: u16,
    collections: Vec<Collection>,
    hook: HookSlot,
    state: Mutex<Option<OpenState>>,
}

impl HidApiDevice {
    fn from_info(info: &hidapi::DeviceInfo) -> Self {
        let vendor_id = info.vendor_id();
        let product_id = info.product_id();
        let product_name = info
            .product_string()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HID {vendor_id:04X}:{product_id:04X}"));

        Self {
            path: info.path().to_owned(),
            product_name,
            vendor_id,
            product_id,
            collections: vec![Collection::new(info.usage_page(), info.usage())],
            hook: Arc::new(Mutex::new(None)),
            state: Mutex::new(None),
        }
    }

    /// Platform path of the interface
    pub fn path(&self) -> &CStr {
        &self.path
    }
}

#[async_trait]
impl HostDevice for HidApiDevice {
    fn product_name(&self) -> String {
        self.product_name.clone()
    }

    fn vendor_id(&self) -> u16 {
        self.vendor_id
    }

    fn product_id(&self) -> u16 {
        self.product_id
    }

    fn opened(&self) -> bool {
        self.state.lock().is_some()
    }

    fn collections(&self) -> &[Collection] {
        &self.collections
    }

    async fn open(&self) -> Result<(), HostError> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Ok(());
        }

        debug!("Opening {} at {:?}", self.product_name, self.path());
        let api = HidApi::new()?;
        let handle = api.open_path(self.path()).map_err(|e| {
            warn!("Failed to open {:?}: {}", self.path(), e);
            HostError::from(e)
        })?;
        let device = Arc::new(Mutex::new(handle));
        let shutdown = Arc::new(AtomicBool::new(false));

        let reader_device = Arc::clone(&device);
        let reader_hook = Arc::clone(&self.hook);
        let reader_shutdown = Arc::clone(&shutdown);
        let name = self.product_name.clone();
        std::thread::Builder::new()
            .name("hid-input-reader".into())
            .spawn(move || {
                run_input_reader_loop(reader_device, reader_hook, reader_shutdown, &name)
            })
            .map_err(|e| HostError::Internal(format!("failed to spawn reader thread: {e}")))?;

        *state = Some(OpenState { device, shutdown });
        info!(
            "Opened {} ({:04X}:{:04X})",
            self.product_name, self.vendor_id, self.product_id
        );
        Ok(())
    }

    async fn close(&self) -> Result<(), HostError> {
        if let Some(open) = self.state.lock().take() {
            open.shutdown.store(true, Ordering::SeqCst);
            info!("Closed {}", self.product_name);
        }
        Ok(())
    }

    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), HostError> {
        let device = self
            .state
            .lock()
            .as_ref()
            .map(|s| Arc::clone(&s.device))
            .ok_or(HostError::NotOpen)?;

        let mut buf = Vec::with_capacity(payload.len() + 1);
        buf.push(report_id);
        buf.extend_from_slice(payload);

        let written = device.lock().write(&buf)?;
        debug!(
            "{}: wrote {} bytes for report 0x{:02X}",
            self.product_name, written, report_id
        );
        Ok(())
    }

    fn set_input_report_hook(&self, hook: Option<InputReportSender>) {
        *self.hook.lock() = hook;
    }
}

impl Drop for HidApiDevice {
    fn drop(&mut self) {
        if let Some(open) = self.state.get_mut().take() {
            open.shutdown.store(true, Ordering::SeqCst);
        }
    }
}

/// Read input reports until `shutdown` is set
///
/// The first byte of each read is taken as the report ID. Reports are
/// forwarded only while a subscriber is attached.
fn run_input_reader_loop(
    device: Arc<Mutex<HidDevice>>,
    hook: HookSlot,
    shutdown: Arc<AtomicBool>,
    name: &str,
) {
    debug!("{} input reader started", name);
    let mut buf = vec![0u8; MAX_REPORT_SIZE];

    while !shutdown.load(Ordering::Relaxed) {
        let result = device.lock().read_timeout(&mut buf, READ_TIMEOUT_MS);
        match result {
            Ok(len) if len > 0 => {
                let report = InputReport {
                    report_id: buf[0],
                    data: buf[1..len].to_vec(),
                };
                if let Some(tx) = hook.lock().as_ref() {
                    // Receiver gone means the selection moved on
                    let _ = tx.send(report);
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("{} input read failed: {}", name, e);
                std::thread::sleep(Duration::from_millis(ERROR_SLEEP_MS));
            }
        }
    }

    debug!("{} input reader stopped", name);
}
