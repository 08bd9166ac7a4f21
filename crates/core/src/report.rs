//! HID++ 2.0 report encoding and decoding.
//!
//! Host-switch traffic uses long reports: 20 bytes, report ID 0x11.
//! Bytes 0..4 form the header (report ID, device index, feature index,
//! function/software ID); bytes 4..20 are zero-padded parameters. The
//! header is also the correlation key for matching responses to requests.
//!
//! Protocol reference: libratbag (MIT) and Solaar (GPLv2, protocol knowledge only).

use crate::error::ReportError;

/// HID++ report ID for long messages (20 bytes total).
pub const LONG_REPORT_ID: u8 = 0x11;
/// Long report length (including report ID).
pub const REPORT_LEN: usize = 20;
/// Header bytes used for response correlation.
pub const HEADER_LEN: usize = 4;
/// Maximum parameter bytes in a report.
pub const MAX_PARAMS: usize = REPORT_LEN - HEADER_LEN;
/// Software ID stamped into the low nibble of byte 3 of every request.
pub const SOFTWARE_ID: u8 = 0x01;

/// Feature index of the root feature, fixed by the protocol.
pub const ROOT_FEATURE_INDEX: u8 = 0x00;

/// HID++ 2.0 well-known feature IDs.
pub mod features {
    /// Root feature — feature index lookup.
    pub const ROOT: u16 = 0x0000;
    /// Change Host — move a receiver channel to another paired host.
    pub const CHANGE_HOST: u16 = 0x1814;
}

/// A fixed-length HID++ message, request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    report_id: u8,
    device_index: u8,
    feature_index: u8,
    /// Function ID in bits 7:4, software ID in bits 3:0.
    function_sw: u8,
    params: Vec<u8>,
}

impl Report {
    /// Build a request for a given feature index and function.
    ///
    /// Fails with [`ReportError::InvalidParameters`] when the parameters do
    /// not fit the fixed report size.
    pub fn request(
        device_index: u8,
        feature_index: u8,
        function: u8,
        params: Vec<u8>,
    ) -> Result<Self, ReportError> {
        if params.len() > MAX_PARAMS {
            return Err(ReportError::InvalidParameters { len: params.len() });
        }
        Ok(Self {
            report_id: LONG_REPORT_ID,
            device_index,
            feature_index,
            // Function in upper nibble, software ID in lower nibble
            function_sw: (function << 4) | SOFTWARE_ID,
            params,
        })
    }

    /// Decode a raw HID report.
    ///
    /// Only the header length is validated. Unsolicited traffic with
    /// unfamiliar report IDs must still decode, so the receive loop can
    /// discard it by header comparison.
    pub fn decode(data: &[u8]) -> Result<Self, ReportError> {
        if data.len() < HEADER_LEN {
            return Err(ReportError::Truncated { len: data.len() });
        }
        let end = data.len().min(REPORT_LEN);
        Ok(Self {
            report_id: data[0],
            device_index: data[1],
            feature_index: data[2],
            function_sw: data[3],
            params: data[HEADER_LEN..end].to_vec(),
        })
    }

    /// Serialize into a fixed-length report buffer, zero-padded.
    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut buf = [0u8; REPORT_LEN];
        buf[0] = self.report_id;
        buf[1] = self.device_index;
        buf[2] = self.feature_index;
        buf[3] = self.function_sw;
        buf[HEADER_LEN..HEADER_LEN + self.params.len()].copy_from_slice(&self.params);
        buf
    }

    /// The four header bytes used to correlate responses with requests.
    pub fn header(&self) -> [u8; HEADER_LEN] {
        [
            self.report_id,
            self.device_index,
            self.feature_index,
            self.function_sw,
        ]
    }

    /// Whether `other` answers this request (exact header equality).
    pub fn matches(&self, other: &Report) -> bool {
        self.header() == other.header()
    }

    pub fn device_index(&self) -> u8 {
        self.device_index
    }

    pub fn feature_index(&self) -> u8 {
        self.feature_index
    }

    /// Extract the function ID from the function/software byte.
    pub fn function(&self) -> u8 {
        self.function_sw >> 4
    }

    /// Parameter bytes as received or built, without trailing padding added
    /// by serialization.
    pub fn params(&self) -> &[u8] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_encodes_header_and_params() {
        let report = Report::request(0x01, 0x05, 0x00, vec![0xAA, 0xBB]).unwrap();
        let encoded = report.to_bytes();
        assert_eq!(encoded.len(), REPORT_LEN);
        assert_eq!(encoded[0], LONG_REPORT_ID);
        assert_eq!(encoded[1], 0x01); // device index
        assert_eq!(encoded[2], 0x05); // feature index
        assert_eq!(encoded[3], 0x01); // function=0 << 4 | sw_id=1
        assert_eq!(encoded[4], 0xAA);
        assert_eq!(encoded[5], 0xBB);
        assert!(encoded[6..].iter().all(|&b| b == 0)); // padding
    }

    #[test]
    fn request_packs_function_nibble() {
        let report = Report::request(0x01, 0x03, 0x02, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(report.to_bytes()[3], (0x02 << 4) | SOFTWARE_ID);
        assert_eq!(report.function(), 0x02);
    }

    #[test]
    fn request_rejects_oversized_params() {
        let result = Report::request(0x01, 0x00, 0x00, vec![0u8; MAX_PARAMS + 1]);
        assert_eq!(
            result.unwrap_err(),
            ReportError::InvalidParameters { len: 17 }
        );
    }

    #[test]
    fn request_accepts_full_parameter_area() {
        let report = Report::request(0x01, 0x00, 0x00, vec![0xEE; MAX_PARAMS]).unwrap();
        assert_eq!(&report.to_bytes()[4..], &[0xEE; MAX_PARAMS]);
    }

    #[test]
    fn header_roundtrip() {
        let report = Report::request(0x02, 0x0A, 0x01, vec![0x01]).unwrap();
        let decoded = Report::decode(&report.to_bytes()).unwrap();
        assert_eq!(decoded.header(), report.header());
        assert_eq!(decoded.device_index(), 0x02);
        assert_eq!(decoded.feature_index(), 0x0A);
        assert_eq!(decoded.function(), 0x01);
    }

    #[test]
    fn decode_rejects_truncated_data() {
        let result = Report::decode(&[0x11, 0x01, 0x02]);
        assert_eq!(result.unwrap_err(), ReportError::Truncated { len: 3 });
    }

    #[test]
    fn decode_accepts_bare_header() {
        let decoded = Report::decode(&[0x11, 0x01, 0x02, 0x31]).unwrap();
        assert_eq!(decoded.params(), &[] as &[u8]);
        assert_eq!(decoded.function(), 0x03);
    }

    #[test]
    fn decode_accepts_unfamiliar_report_id() {
        // Unsolicited receiver notifications (e.g. DJ reports) share the
        // channel; they decode and get discarded by header comparison.
        let mut data = [0u8; REPORT_LEN];
        data[0] = 0x20;
        data[1] = 0x01;
        let decoded = Report::decode(&data).unwrap();
        assert_eq!(decoded.header()[0], 0x20);
    }

    #[test]
    fn matches_compares_header_only() {
        let request = Report::request(0x01, 0x00, 0x00, vec![0x18, 0x14]).unwrap();
        let mut reply = request.to_bytes();
        reply[4] = 0x0A; // different params, same header
        assert!(request.matches(&Report::decode(&reply).unwrap()));

        let mut other = request.to_bytes();
        other[2] = 0x05; // different feature index
        assert!(!request.matches(&Report::decode(&other).unwrap()));
    }
}
