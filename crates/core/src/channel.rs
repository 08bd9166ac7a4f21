//! Device channel: synchronous report transport over a raw HID handle.
//!
//! Provides a trait-based handle abstraction so that real HID devices and
//! scripted test devices share the same interface.

use std::time::Duration;

use tracing::trace;

use crate::error::TransportError;
use crate::report::{Report, HEADER_LEN, REPORT_LEN};

/// Abstraction over the raw HID handle.
///
/// Mirrors the surface the channel needs from hidapi. Implementations map
/// their native failures to [`TransportError::Closed`]; a read that sees no
/// data within the timeout returns `Ok(0)`.
pub trait RawHid: Send {
    /// Write one raw report.
    fn write(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Read one raw report, waiting at most `timeout`.
    fn read_timeout(&self, buf: &mut [u8], timeout: Duration) -> Result<usize, TransportError>;
}

/// Synchronous request/response primitive over one HID handle.
///
/// The channel is the only component that touches the handle, and it checks
/// nothing but lengths; interpretation of report contents belongs to the
/// codec and its callers. Concurrent use would interleave writes and reads
/// and corrupt response correlation, so a channel is always exclusively
/// owned by one caller at a time.
pub struct DeviceChannel {
    dev: Box<dyn RawHid>,
}

impl DeviceChannel {
    pub fn new(dev: Box<dyn RawHid>) -> Self {
        Self { dev }
    }

    /// Write one report.
    pub fn send(&self, report: &Report) -> Result<(), TransportError> {
        let data = report.to_bytes();
        trace!(report_hex = format_args!("{:02X?}", data), "TX");
        self.dev.write(&data)
    }

    /// Read one report, waiting at most `timeout`.
    pub fn receive(&self, timeout: Duration) -> Result<Report, TransportError> {
        let mut buf = [0u8; REPORT_LEN];
        let n = self.dev.read_timeout(&mut buf, timeout)?;
        if n == 0 {
            return Err(TransportError::Timeout(timeout));
        }
        if n < HEADER_LEN {
            return Err(TransportError::ShortRead(n));
        }
        trace!(report_hex = format_args!("{:02X?}", &buf[..n]), "RX");
        Report::decode(&buf[..n]).map_err(|_| TransportError::ShortRead(n))
    }
}

/// A scripted HID handle for testing.
///
/// Reads pop from a queued script, which lets tests interleave matching
/// responses, unsolicited traffic, and timeouts in a fixed order.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One scripted outcome for a read call.
    pub enum ReadStep {
        /// Deliver these raw bytes.
        Data(Vec<u8>),
        /// No data within the timeout.
        Silence,
        /// Fail the read as a dead handle.
        Closed,
    }

    /// Scripted device handle. Clones share the same script and write log,
    /// so a test can keep a handle for inspection after the channel takes
    /// ownership of the other.
    #[derive(Clone, Default)]
    pub struct ScriptedHid {
        inner: Arc<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        reads: Mutex<VecDeque<ReadStep>>,
        writes: Mutex<Vec<Vec<u8>>>,
    }

    impl ScriptedHid {
        pub fn new() -> Self {
            Self::default()
        }

        /// Append a step to the read script.
        pub fn queue_read(&self, step: ReadStep) {
            self.inner.reads.lock().unwrap().push_back(step);
        }

        /// Append a whole report to the read script.
        pub fn queue_report(&self, report: &Report) {
            self.queue_read(ReadStep::Data(report.to_bytes().to_vec()));
        }

        /// Everything written so far, in order.
        pub fn writes(&self) -> Vec<Vec<u8>> {
            self.inner.writes.lock().unwrap().clone()
        }
    }

    impl RawHid for ScriptedHid {
        fn write(&self, data: &[u8]) -> Result<(), TransportError> {
            self.inner.writes.lock().unwrap().push(data.to_vec());
            Ok(())
        }

        fn read_timeout(&self, buf: &mut [u8], _timeout: Duration) -> Result<usize, TransportError> {
            match self.inner.reads.lock().unwrap().pop_front() {
                Some(ReadStep::Data(bytes)) => {
                    let n = bytes.len().min(buf.len());
                    buf[..n].copy_from_slice(&bytes[..n]);
                    Ok(n)
                }
                // An exhausted script behaves like a quiet device.
                Some(ReadStep::Silence) | None => Ok(0),
                Some(ReadStep::Closed) => Err(TransportError::Closed("scripted".into())),
            }
        }
    }
}
