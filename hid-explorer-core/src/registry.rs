//! Device registry - the devices this session knows about
//!
//! Insertion order is display order. Devices are keyed by handle identity,
//! so inserting the same handle twice is a no-op.

use tracing::{debug, info, warn};

use crate::error::ExplorerError;
use crate::host::{Device, HostPlatform};
use crate::session::Session;
use crate::sink::RenderSink;
use crate::types::DeviceFilter;

/// Menu label shown when the registry is empty
pub const NO_DEVICES_LABEL: &str = "No connected devices";

/// One entry of the device selection menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    /// `None` for the empty-registry placeholder
    pub device: Option<Device>,
}

/// Ordered set of known devices
#[derive(Debug, Default)]
pub struct Registry {
    devices: Vec<Device>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless already present; returns true if inserted
    pub(crate) fn insert(&mut self, device: Device) -> bool {
        if self.contains(&device) {
            return false;
        }
        self.devices.push(device);
        true
    }

    /// Remove a device; returns true if it was present
    pub(crate) fn remove(&mut self, device: &Device) -> bool {
        match self.position(device) {
            Some(index) => {
                self.devices.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, device: &Device) -> bool {
        self.devices.contains(device)
    }

    /// Display index of a device
    pub fn position(&self, device: &Device) -> Option<usize> {
        self.devices.iter().position(|d| d == device)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Entries for the selection menu, one per device
    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        if self.devices.is_empty() {
            return vec![MenuEntry {
                label: NO_DEVICES_LABEL.to_string(),
                device: None,
            }];
        }
        self.devices
            .iter()
            .map(|d| MenuEntry {
                label: d.product_name(),
                device: Some(d.clone()),
            })
            .collect()
    }
}

impl<H: HostPlatform, S: RenderSink> Session<H, S> {
    /// Register every device the host has already granted
    pub async fn list_authorized_devices(&mut self) -> Result<Vec<Device>, ExplorerError> {
        let devices = self.host.get_authorized_devices().await.map_err(|e| {
            warn!("Failed to list authorized devices: {}", e);
            ExplorerError::from(e)
        })?;
        debug!("Host reports {} authorized devices", devices.len());
        for device in &devices {
            self.add_device(device.clone()).await;
        }
        Ok(devices)
    }

    /// Ask the host for more devices and register what it grants
    ///
    /// An empty grant means the operator declined and is not an error. If
    /// nothing ends up selected, the first granted device is selected.
    pub async fn request_device_grant(
        &mut self,
        filters: &[DeviceFilter],
    ) -> Result<Vec<Device>, ExplorerError> {
        let granted = self.host.request_device(filters).await.map_err(|e| {
            warn!("Device request failed: {}", e);
            ExplorerError::from(e)
        })?;

        if granted.is_empty() {
            info!("Device grant declined");
            return Ok(granted);
        }

        let had_selection = self.selection.is_selected();
        for device in &granted {
            self.register(device);
        }
        if had_selection {
            self.refresh_device_menu();
        } else {
            self.select(Some(granted[0].clone())).await;
        }
        Ok(granted)
    }

    /// Both steps of connecting: authorized devices, then a grant request
    pub async fn connect(&mut self, filters: &[DeviceFilter]) -> Result<(), ExplorerError> {
        self.list_authorized_devices().await?;
        self.request_device_grant(filters).await?;
        Ok(())
    }

    /// Add a device to the registry
    ///
    /// Idempotent. A newly added device is selected when nothing else is.
    /// Returns true if the device was not registered before.
    pub async fn add_device(&mut self, device: Device) -> bool {
        if !self.register(&device) {
            return false;
        }
        if !self.selection.is_selected() {
            self.select(Some(device)).await;
        }
        self.refresh_device_menu();
        true
    }

    /// Insert without selecting or touching the sink
    fn register(&mut self, device: &Device) -> bool {
        if !self.registry.insert(device.clone()) {
            debug!("Device already registered: {}", device.product_name());
            return false;
        }
        info!(
            "Device added: {} ({:04X}:{:04X})",
            device.product_name(),
            device.vendor_id(),
            device.product_id()
        );
        true
    }

    /// Forget a device, deselecting it first if it is active
    pub async fn remove_device(&mut self, device: &Device) -> bool {
        if self.selection.device() == Some(device) {
            self.select(None).await;
        }
        if !self.registry.remove(device) {
            return false;
        }
        info!("Device removed: {}", device.product_name());
        self.refresh_device_menu();
        true
    }

    /// Push the current menu and selection index to the sink
    pub fn refresh_device_menu(&mut self) {
        let entries = self.registry.menu_entries();
        let selected = self
            .selection
            .device()
            .and_then(|d| self.registry.position(d));
        self.sink.device_menu(&entries, selected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::virtual_device::{virtual_handle, VirtualDevice};

    #[test]
    fn test_insert_is_idempotent() {
        let (_, a) = virtual_handle(VirtualDevice::named("A", 1, 1));
        let mut registry = Registry::new();
        assert!(registry.insert(a.clone()));
        assert!(!registry.insert(a.clone()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_identity_not_equality_of_fields() {
        let (_, a) = virtual_handle(VirtualDevice::named("Same", 1, 1));
        let (_, b) = virtual_handle(VirtualDevice::named("Same", 1, 1));
        let mut registry = Registry::new();
        registry.insert(a.clone());
        registry.insert(b.clone());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position(&b), Some(1));
    }

    #[test]
    fn test_menu_entries() {
        let mut registry = Registry::new();
        let placeholder = registry.menu_entries();
        assert_eq!(placeholder.len(), 1);
        assert_eq!(placeholder[0].label, NO_DEVICES_LABEL);
        assert!(placeholder[0].device.is_none());

        let (_, a) = virtual_handle(VirtualDevice::named("Keyboard", 1, 1));
        let (_, b) = virtual_handle(VirtualDevice::named("Mouse", 1, 2));
        registry.insert(a.clone());
        registry.insert(b);
        let labels: Vec<String> = registry.menu_entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Keyboard", "Mouse"]);

        assert!(registry.remove(&a));
        assert!(!registry.remove(&a));
        assert_eq!(registry.len(), 1);
    }
}
