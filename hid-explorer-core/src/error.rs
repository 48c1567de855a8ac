//! Error types for host calls and explorer operations

use thiserror::Error;

/// Errors raised by a host platform or one of its devices
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("HID error: {0}")]
    Hid(String),

    #[error("HID permission denied: {0}")]
    PermissionDenied(String),

    #[error("Device is not open")]
    NotOpen,

    #[error("Device disconnected")]
    Disconnected,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<hidapi::HidError> for HostError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") || msg.contains("EACCES") {
            HostError::PermissionDenied(msg)
        } else {
            HostError::Hid(msg)
        }
    }
}

/// Errors from registry, selection and dispatch operations
///
/// None of these escape as a fault: operations log them and leave the
/// session in a consistent state. They are returned so callers can tell
/// why nothing happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    /// Odd number of hex digits after stripping non-hex characters
    #[error("Malformed hex input: {digits} hex digits (expected an even count)")]
    MalformedHexInput { digits: usize },

    /// Hex input decoded to zero bytes, so there is no report ID
    #[error("Report is empty")]
    EmptyReport,

    #[error("No device selected")]
    NoSelection,

    #[error("No device menu entry at index {0}")]
    UnknownMenuIndex(usize),

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}
