/// DSK container dialects and signature detection

/// Container magic bytes, header offsets and profile constants
pub mod constants;

pub use constants::{EXTENDED_DSK_SIGNATURE, STANDARD_DSK_SIGNATURE, TRACK_INFO_MARKER};

/// DSK container dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DskFormat {
    /// Standard dialect: one uniform track size, every track present
    Standard,
    /// Extended dialect: per-track size table, zero-size tracks absent
    Extended,
}

impl DskFormat {
    /// Get the magic bytes for this dialect
    pub fn magic_bytes(&self) -> &'static [u8] {
        match self {
            DskFormat::Standard => STANDARD_DSK_SIGNATURE,
            DskFormat::Extended => EXTENDED_DSK_SIGNATURE,
        }
    }

    /// Get a human-readable name for this dialect
    pub fn name(&self) -> &'static str {
        match self {
            DskFormat::Standard => "Standard DSK",
            DskFormat::Extended => "Extended DSK",
        }
    }
}

/// Detect the container dialect from a disk header.
///
/// The full signature must match; a shared prefix is not enough.
pub fn detect_format(header: &[u8]) -> Option<DskFormat> {
    if header.starts_with(EXTENDED_DSK_SIGNATURE) {
        Some(DskFormat::Extended)
    } else if header.starts_with(STANDARD_DSK_SIGNATURE) {
        Some(DskFormat::Standard)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_standard() {
        assert_eq!(
            detect_format(STANDARD_DSK_SIGNATURE),
            Some(DskFormat::Standard)
        );
    }

    #[test]
    fn test_detect_extended() {
        assert_eq!(
            detect_format(EXTENDED_DSK_SIGNATURE),
            Some(DskFormat::Extended)
        );
    }

    #[test]
    fn test_detect_rejects_partial_magic() {
        // Same leading words, wrong tail
        assert_eq!(detect_format(b"EXTENDED CPC DSK File\r\nTrack-Info\r\n"), None);
        assert_eq!(detect_format(b"MV - CPCEMU"), None);
        assert_eq!(detect_format(b"random bytes"), None);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(DskFormat::Standard.name(), "Standard DSK");
        assert_eq!(DskFormat::Extended.name(), "Extended DSK");
        assert_eq!(DskFormat::Extended.magic_bytes(), EXTENDED_DSK_SIGNATURE);
    }
}
