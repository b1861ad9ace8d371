use crate::model::{CorrectionLevel, EncodingSpec};

/// Largest payload, in bytes, still encoded at `Medium`
///
/// Ed25519 and ECDSA private keys stay under this; RSA keys only fit the
/// printable area at `Low`.
pub const MEDIUM_PAYLOAD_LIMIT: usize = 1000;

pub fn select_encoding(payload: &[u8]) -> EncodingSpec {
    let correction_level = if payload.len() > MEDIUM_PAYLOAD_LIMIT {
        CorrectionLevel::Low
    } else {
        CorrectionLevel::Medium
    };
    EncodingSpec {
        correction_level,
        density_hint: payload.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_medium() {
        assert_eq!(
            select_encoding(&[b'a'; 1000]).correction_level,
            CorrectionLevel::Medium
        );
        assert_eq!(
            select_encoding(&[b'a'; 1001]).correction_level,
            CorrectionLevel::Low
        );
    }

    #[test]
    fn test_typical_key_sizes() {
        assert_eq!(
            select_encoding(&[b'a'; 800]).correction_level,
            CorrectionLevel::Medium
        );
        assert_eq!(
            select_encoding(&[b'a'; 1200]).correction_level,
            CorrectionLevel::Low
        );
    }

    #[test]
    fn test_monotonic() {
        let mut seen_low = false;
        for len in (0..3000).step_by(7) {
            let level = select_encoding(&vec![0u8; len]).correction_level;
            if seen_low {
                assert_eq!(level, CorrectionLevel::Low, "len {len}");
            }
            seen_low |= level == CorrectionLevel::Low;
        }
        assert!(seen_low);
    }

    #[test]
    fn test_density_hint_is_payload_length() {
        assert_eq!(select_encoding(b"abc").density_hint, 3);
        assert_eq!(select_encoding(b"").correction_level, CorrectionLevel::Medium);
    }
}
