//! Explorer session - the single owner of registry and selection state
//!
//! All mutation goes through the registry, selection and dispatch operations
//! implemented on [`Session`] in their own modules. The session is driven
//! from one task; host calls are awaited in place, so no other operation
//! can observe a half-finished transition.

use crate::host::{Device, HostPlatform};
use crate::registry::Registry;
use crate::selection::Selection;
use crate::sink::RenderSink;

pub struct Session<H: HostPlatform, S: RenderSink> {
    pub(crate) host: H,
    pub(crate) sink: S,
    pub(crate) registry: Registry,
    pub(crate) selection: Selection,
}

impl<H: HostPlatform, S: RenderSink> Session<H, S> {
    pub fn new(host: H, sink: S) -> Self {
        Self {
            host,
            sink,
            registry: Registry::new(),
            selection: Selection::Unselected,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable sink access, for front ends that print panels on demand
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Currently selected device, if any
    pub fn selected_device(&self) -> Option<&Device> {
        self.selection.device()
    }

    /// Tear down the session, returning the host and sink
    ///
    /// The active subscription, if any, is detached first.
    pub fn into_parts(mut self) -> (H, S) {
        if let Some(device) = self.selection.device() {
            device.set_input_report_hook(None);
        }
        self.selection = Selection::Unselected;
        (self.host, self.sink)
    }
}
