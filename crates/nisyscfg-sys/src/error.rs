//! Errors raised before a call crosses the FFI boundary.

use thiserror::Error;

/// Error type for loading and calling into the native library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FfiError {
    /// No build of the library exists for this OS/architecture.
    #[error("NI System Configuration is not supported on {os}/{arch}")]
    PlatformUnsupported { os: String, arch: String },

    /// The shared library could not be located or loaded.
    #[error("unable to load {library}: {message}")]
    LibraryUnavailable { library: String, message: String },

    /// The library was loaded but does not export an entry point.
    #[error("entry point {symbol} not found in {library}: {message}")]
    SymbolUnavailable {
        library: String,
        symbol: String,
        message: String,
    },

    /// A string cannot be represented in the platform codec.
    #[error("cannot encode {text:?} as {codec}: {reason}")]
    Encoding {
        text: String,
        codec: &'static str,
        reason: String,
    },

    /// A caller-provided string buffer is smaller than the library writes.
    #[error("string buffer of {actual} bytes is smaller than the required {required}")]
    BufferTooSmall { required: usize, actual: usize },
}

impl FfiError {
    /// Creates an encoding error.
    pub fn encoding(text: &str, codec: &'static str, reason: impl Into<String>) -> Self {
        FfiError::Encoding {
            text: text.to_string(),
            codec,
            reason: reason.into(),
        }
    }

    /// Returns true if the library itself is missing on this host.
    pub fn is_library_unavailable(&self) -> bool {
        matches!(
            self,
            FfiError::PlatformUnsupported { .. } | FfiError::LibraryUnavailable { .. }
        )
    }
}

/// Result type for FFI operations.
pub type FfiResult<T> = Result<T, FfiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_unavailable_predicate() {
        let err = FfiError::PlatformUnsupported {
            os: "macos".to_string(),
            arch: "aarch64".to_string(),
        };
        assert!(err.is_library_unavailable());
        assert!(!FfiError::encoding("x", "latin-1", "bad").is_library_unavailable());
    }

    #[test]
    fn test_encoding_message() {
        let err = FfiError::encoding("Ω", "ISO-8859-1", "U+03A9 is not representable");
        assert!(err.to_string().contains("ISO-8859-1"));
        assert!(err.to_string().contains("U+03A9"));
    }
}
