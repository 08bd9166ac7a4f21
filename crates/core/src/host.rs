//! Host switching via the HID++ 2.0 Change Host feature (0x1814).
//!
//! Change Host functions:
//!   - Function 0: getHostInfo → params[0] = host count, params[1] = current host
//!   - Function 1: setCurrentHost(hostIndex) → moves the channel to another paired host

use tracing::debug;

use crate::channel::DeviceChannel;
use crate::error::ProtocolError;
use crate::lookup::resolve_feature_index;
use crate::report::{features, Report};

/// Change Host function 1: setCurrentHost.
pub const FN_SET_CURRENT_HOST: u8 = 0x01;

/// Highest host index a receiver supports (three-host hardware, 0..=2).
pub const MAX_HOST: u8 = 2;

/// Build a ready-to-send "change active host" report for one receiver channel.
///
/// The feature index is resolved fresh on every call; indexes must not be
/// cached across commands. No retries happen here; callers own the retry
/// policy.
pub fn build_change_host(
    channel: &DeviceChannel,
    device_index: u8,
    host: u8,
) -> Result<Report, ProtocolError> {
    if host > MAX_HOST {
        return Err(ProtocolError::InvalidParameters {
            field: "host",
            value: host as u32,
            max: MAX_HOST as u32,
        });
    }

    let feature_index = resolve_feature_index(channel, device_index, features::CHANGE_HOST)?;
    Ok(Report::request(
        device_index,
        feature_index,
        FN_SET_CURRENT_HOST,
        vec![host],
    )?)
}

/// Build and send a host switch for one receiver channel.
pub fn change_host(channel: &DeviceChannel, device_index: u8, host: u8) -> Result<(), ProtocolError> {
    let report = build_change_host(channel, device_index, host)?;
    channel.send(&report)?;
    debug!(device_index, host, "host switch command sent");
    Ok(())
}
