//! Receiver discovery: find the HID++ endpoint of a multi-host receiver.

use std::time::Duration;

use tracing::{debug, info};

use crate::channel::RawHid;
use crate::error::TransportError;
use crate::{pids, LOGITECH_VID, VENDOR_USAGE, VENDOR_USAGE_PAGE};

/// Supported multi-host receiver models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverModel {
    Bolt,
    Unifying,
}

impl ReceiverModel {
    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::BOLT_RECEIVER => Some(Self::Bolt),
            pids::UNIFYING_RECEIVER => Some(Self::Unifying),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bolt => "Logitech Bolt receiver",
            Self::Unifying => "Logitech Unifying receiver",
        }
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::Bolt => pids::BOLT_RECEIVER,
            Self::Unifying => pids::UNIFYING_RECEIVER,
        }
    }
}

/// Information about a discovered receiver interface.
#[derive(Debug, Clone)]
pub struct ReceiverInfo {
    pub model: ReceiverModel,
    pub vid: u16,
    pub pid: u16,
    pub path: String,
    pub serial: Option<String>,
}

/// Discover connected multi-host receivers.
///
/// A receiver exposes several HID interfaces; only the vendor-page one
/// (usage page 0xFF00, usage 0x01) carries HID++ long reports, so the
/// others are filtered out here.
pub fn discover_receivers() -> Result<Vec<ReceiverInfo>, TransportError> {
    debug!("Starting HID device enumeration");
    let api =
        hidapi::HidApi::new().map_err(|e| TransportError::Closed(format!("hidapi init: {e}")))?;

    let mut receivers = Vec::new();
    for info in api.device_list() {
        if info.vendor_id() != LOGITECH_VID {
            continue;
        }
        if info.usage_page() != VENDOR_USAGE_PAGE || info.usage() != VENDOR_USAGE {
            continue;
        }

        if let Some(model) = ReceiverModel::from_pid(info.product_id()) {
            info!(
                model = model.name(),
                vid = format_args!("0x{:04X}", info.vendor_id()),
                pid = format_args!("0x{:04X}", info.product_id()),
                path = %info.path().to_string_lossy(),
                "Found multi-host receiver"
            );
            receivers.push(ReceiverInfo {
                model,
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_string_lossy().into_owned(),
                serial: info.serial_number().map(|s| s.to_string()),
            });
        }
    }

    debug!(count = receivers.len(), "Receiver enumeration complete");
    Ok(receivers)
}

/// Open the HID handle of a discovered receiver.
pub fn open_receiver(info: &ReceiverInfo) -> Result<hidapi::HidDevice, TransportError> {
    let api =
        hidapi::HidApi::new().map_err(|e| TransportError::Closed(format!("hidapi init: {e}")))?;
    let path = std::ffi::CString::new(info.path.as_bytes())
        .map_err(|_| TransportError::Closed(format!("path contains NUL: {}", info.path)))?;
    api.open_path(&path)
        .map_err(|e| TransportError::Closed(format!("open {}: {e}", info.path)))
}

impl RawHid for hidapi::HidDevice {
    fn write(&self, data: &[u8]) -> Result<(), TransportError> {
        hidapi::HidDevice::write(self, data)
            .map(|_| ())
            .map_err(|e| TransportError::Closed(format!("write: {e}")))
    }

    fn read_timeout(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError> {
        // hidapi returns 0 when nothing arrived within the timeout.
        hidapi::HidDevice::read_timeout(self, buf, timeout.as_millis() as i32)
            .map_err(|e| TransportError::Closed(format!("read: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_model_from_known_pid() {
        assert_eq!(ReceiverModel::from_pid(0xC548), Some(ReceiverModel::Bolt));
        assert_eq!(
            ReceiverModel::from_pid(0xC52B),
            Some(ReceiverModel::Unifying)
        );
    }

    #[test]
    fn receiver_model_from_unknown_pid() {
        assert_eq!(ReceiverModel::from_pid(0x1234), None);
        assert_eq!(ReceiverModel::from_pid(0xC08D), None); // a mouse, not a receiver
    }

    #[test]
    fn model_pid_roundtrip() {
        for model in [ReceiverModel::Bolt, ReceiverModel::Unifying] {
            assert_eq!(ReceiverModel::from_pid(model.pid()), Some(model));
            assert!(!model.name().is_empty());
        }
    }
}
