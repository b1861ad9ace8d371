use std::fmt;

use crate::error::EncodingError;

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrectionLevel {
    /// Recovers ~7% of codewords, densest symbol
    Low,
    /// Recovers ~15% of codewords
    Medium,
}

impl CorrectionLevel {
    /// Option value understood by the barcode library
    pub fn as_option(self) -> &'static str {
        match self {
            CorrectionLevel::Low => "L",
            CorrectionLevel::Medium => "M",
        }
    }

    /// Byte-mode capacity of a version 40 QR symbol at this level
    pub fn max_payload(self) -> usize {
        match self {
            CorrectionLevel::Low => 2953,
            CorrectionLevel::Medium => 2331,
        }
    }
}

impl fmt::Display for CorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_option())
    }
}

/// Encoding parameters shared by both barcodes of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingSpec {
    pub correction_level: CorrectionLevel,
    /// Payload length in bytes the level was chosen for
    pub density_hint: usize,
}

impl EncodingSpec {
    /// Fails when `payload` cannot fit in any QR symbol at this level
    pub fn check_capacity(&self, which: &'static str, payload: &[u8]) -> Result<(), EncodingError> {
        let capacity = self.correction_level.max_payload();
        if payload.len() > capacity {
            return Err(EncodingError::PayloadTooLarge {
                which,
                len: payload.len(),
                capacity,
                level: self.correction_level,
            });
        }
        Ok(())
    }
}
