//! Feature index resolution via the HID++ root feature.
//!
//! Root feature (index 0x00) function 0 = getFeatureIndex:
//!   params[0..1] = feature ID (big-endian)
//!   response params[0] = feature index (0 when the device lacks the feature)

use std::time::Duration;

use tracing::{debug, trace};

use crate::channel::DeviceChannel;
use crate::error::ProtocolError;
use crate::report::{Report, ROOT_FEATURE_INDEX};

/// Root feature function 0: getFeatureIndex.
pub const FN_GET_FEATURE_INDEX: u8 = 0x00;

/// Bounded wait for each receive while draining for the matching response.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(3);

/// Resolve the per-device index of `feature_id` by asking the root feature.
///
/// Feature indexes are not stable across devices or sessions, so every call
/// performs a fresh lookup and nothing is cached. The channel also carries
/// unsolicited receiver notifications; well-formed reports whose header does
/// not match the request are discarded until the real response arrives. A
/// failed receive aborts the lookup immediately; the request is not sent
/// again.
pub fn resolve_feature_index(
    channel: &DeviceChannel,
    device_index: u8,
    feature_id: u16,
) -> Result<u8, ProtocolError> {
    let lookup = Report::request(
        device_index,
        ROOT_FEATURE_INDEX,
        FN_GET_FEATURE_INDEX,
        vec![(feature_id >> 8) as u8, (feature_id & 0xFF) as u8],
    )?;

    channel
        .send(&lookup)
        .map_err(|source| ProtocolError::LookupFailed {
            device_index,
            feature_id,
            source,
        })?;

    loop {
        let response =
            channel
                .receive(RECEIVE_TIMEOUT)
                .map_err(|source| ProtocolError::LookupFailed {
                    device_index,
                    feature_id,
                    source,
                })?;

        if !lookup.matches(&response) {
            trace!(
                header = format_args!("{:02X?}", response.header()),
                "discarding unsolicited report"
            );
            continue;
        }

        return match response.params().first() {
            Some(&index) if index != 0 => {
                debug!(
                    feature_id = format_args!("0x{:04X}", feature_id),
                    index, "feature lookup success"
                );
                Ok(index)
            }
            // Index 0 is the root itself: the device lacks this feature.
            _ => Err(ProtocolError::UnexpectedResponse {
                device_index,
                feature_id,
            }),
        };
    }
}
