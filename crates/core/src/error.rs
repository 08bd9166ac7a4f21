//! Error types for edge-flow-core.

use std::time::Duration;

use thiserror::Error;

/// Report encode/decode failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    /// Parameters do not fit the fixed report size.
    #[error("invalid parameters: {len} bytes (report holds at most 16)")]
    InvalidParameters { len: usize },

    /// Raw data is shorter than the report header.
    #[error("report truncated: {len} bytes (minimum 4)")]
    Truncated { len: usize },
}

/// Device channel failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No report arrived within the bounded receive window.
    #[error("receive timed out after {0:?}")]
    Timeout(Duration),

    /// The handle produced fewer bytes than a report header.
    #[error("short read: {0} bytes (minimum 4)")]
    ShortRead(usize),

    /// The underlying HID handle failed or went away.
    #[error("device closed: {0}")]
    Closed(String),
}

/// Vendor protocol failure above the transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Feature index lookup did not complete.
    #[error("feature 0x{feature_id:04X} lookup failed on device {device_index}")]
    LookupFailed {
        device_index: u8,
        feature_id: u16,
        #[source]
        source: TransportError,
    },

    /// The correlated response did not carry a usable feature index.
    #[error("unexpected response for feature 0x{feature_id:04X} on device {device_index}")]
    UnexpectedResponse { device_index: u8, feature_id: u16 },

    /// A command input failed validation.
    #[error("invalid parameter: {field} = {value} (allowed 0..={max})")]
    InvalidParameters {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Startup configuration failure. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A `DEVICE:HOST` pair did not parse.
    #[error("invalid device:host pair '{0}' (expected e.g. 1:0)")]
    InvalidPair(String),

    /// Receiver channels are numbered 1..=6.
    #[error("device index {0} out of range 1..=6")]
    DeviceIndex(u8),

    /// Receivers pair with at most three hosts.
    #[error("host {0} out of range 0..=2")]
    Host(u8),

    /// Neither edge has any command to run.
    #[error("no edge commands configured: at least one left or right pair is required")]
    NoEdgeCommands,
}
