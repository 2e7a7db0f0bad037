//! The native fixed-point timestamp.

/// `NISysCfgTimestampUTC`: four opaque 32-bit words.
///
/// Only the library knows how to interpret the words; values are
/// converted with `NISysCfgTimestampFromValues` and
/// `NISysCfgValuesFromTimestamp`. All-zero words mean "blank".
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    pub words: [u32; 4],
}

impl Timestamp {
    /// The blank timestamp sentinel.
    pub const BLANK: Self = Timestamp { words: [0; 4] };

    /// Returns true if every word is zero.
    pub fn is_blank(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank() {
        assert!(Timestamp::BLANK.is_blank());
        assert!(Timestamp::default().is_blank());
        assert!(!Timestamp { words: [0, 0, 0, 1] }.is_blank());
    }

    #[test]
    fn test_layout() {
        assert_eq!(std::mem::size_of::<Timestamp>(), 16);
        assert_eq!(std::mem::align_of::<Timestamp>(), 4);
    }
}
