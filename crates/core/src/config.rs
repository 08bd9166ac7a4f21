//! Startup configuration: the per-edge switch command lists.
//!
//! Channel-to-host mappings come from the command line as `DEVICE:HOST`
//! pairs; nothing is persisted and nothing is auto-discovered. Invalid
//! configuration fails the process before any device is touched.

use crate::engine::{EdgeActions, HostTarget};
use crate::error::ConfigError;
use crate::host::MAX_HOST;

/// Lowest receiver channel number. Channel 0 addresses the receiver itself.
pub const MIN_DEVICE_INDEX: u8 = 1;
/// Highest receiver channel number (six-slot receivers).
pub const MAX_DEVICE_INDEX: u8 = 6;

/// Parse one `DEVICE:HOST` pair, e.g. `1:0`.
pub fn parse_target(s: &str) -> Result<HostTarget, ConfigError> {
    let (device, host) = s
        .split_once(':')
        .ok_or_else(|| ConfigError::InvalidPair(s.to_string()))?;
    let device_index: u8 = device
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPair(s.to_string()))?;
    let host: u8 = host
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPair(s.to_string()))?;

    if !(MIN_DEVICE_INDEX..=MAX_DEVICE_INDEX).contains(&device_index) {
        return Err(ConfigError::DeviceIndex(device_index));
    }
    if host > MAX_HOST {
        return Err(ConfigError::Host(host));
    }

    Ok(HostTarget { device_index, host })
}

/// Assemble the per-edge sequences, failing fast when both are empty.
pub fn edge_actions(
    left: Vec<HostTarget>,
    right: Vec<HostTarget>,
) -> Result<EdgeActions, ConfigError> {
    if left.is_empty() && right.is_empty() {
        return Err(ConfigError::NoEdgeCommands);
    }
    Ok(EdgeActions { left, right })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_pairs() {
        assert_eq!(
            parse_target("1:0").unwrap(),
            HostTarget {
                device_index: 1,
                host: 0,
            }
        );
        assert_eq!(
            parse_target("6:2").unwrap(),
            HostTarget {
                device_index: 6,
                host: 2,
            }
        );
        assert_eq!(
            parse_target(" 2 : 1 ").unwrap(),
            HostTarget {
                device_index: 2,
                host: 1,
            }
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        for bad in ["", "1", "1:", ":0", "a:b", "1:0:2", "1;0"] {
            assert!(
                matches!(parse_target(bad), Err(ConfigError::InvalidPair(_))),
                "expected InvalidPair for {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_device_index_out_of_range() {
        assert_eq!(parse_target("0:0").unwrap_err(), ConfigError::DeviceIndex(0));
        assert_eq!(parse_target("7:0").unwrap_err(), ConfigError::DeviceIndex(7));
    }

    #[test]
    fn rejects_host_out_of_range() {
        assert_eq!(parse_target("1:3").unwrap_err(), ConfigError::Host(3));
    }

    #[test]
    fn one_sided_config_is_valid() {
        let target = HostTarget {
            device_index: 1,
            host: 1,
        };
        assert!(edge_actions(vec![target], vec![]).is_ok());
        assert!(edge_actions(vec![], vec![target]).is_ok());
    }

    #[test]
    fn both_edges_empty_is_fatal() {
        assert_eq!(
            edge_actions(vec![], vec![]).unwrap_err(),
            ConfigError::NoEdgeCommands
        );
    }

    #[test]
    fn order_is_preserved() {
        let left: Vec<_> = ["1:1", "2:1", "3:2"]
            .iter()
            .map(|s| parse_target(s).unwrap())
            .collect();
        let actions = edge_actions(left.clone(), vec![]).unwrap();
        assert_eq!(actions.left, left);
    }
}
