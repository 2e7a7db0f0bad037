//! String encoding at the FFI boundary.
//!
//! On Windows the library speaks the active ANSI code page; everywhere
//! else it speaks ISO-8859-1. Characters the codec cannot represent are
//! rejected instead of being replaced.

use std::ffi::CString;

use crate::error::{FfiError, FfiResult};

/// The codec used to marshal strings to and from the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringCodec {
    /// ISO-8859-1: every code point up to U+00FF maps to one byte.
    Latin1,
    /// The process's active ANSI code page (`CP_ACP`).
    #[cfg(windows)]
    ActiveCodePage,
}

impl StringCodec {
    /// Returns the codec the library uses on this platform.
    pub fn platform() -> Self {
        #[cfg(windows)]
        {
            StringCodec::ActiveCodePage
        }
        #[cfg(not(windows))]
        {
            StringCodec::Latin1
        }
    }

    /// Returns a human-readable codec name.
    pub fn name(&self) -> &'static str {
        match self {
            StringCodec::Latin1 => "ISO-8859-1",
            #[cfg(windows)]
            StringCodec::ActiveCodePage => "active code page",
        }
    }

    /// Encodes a string into a NUL-terminated native string.
    pub fn encode(&self, text: &str) -> FfiResult<CString> {
        let bytes = match self {
            StringCodec::Latin1 => encode_latin1(text)?,
            #[cfg(windows)]
            StringCodec::ActiveCodePage => ansi::encode(text)?,
        };
        CString::new(bytes)
            .map_err(|_| FfiError::encoding(text, self.name(), "interior NUL character"))
    }

    /// Decodes native bytes (without terminator).
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            StringCodec::Latin1 => bytes.iter().map(|b| char::from(*b)).collect(),
            #[cfg(windows)]
            StringCodec::ActiveCodePage => ansi::decode(bytes),
        }
    }

    /// Decodes a caller-allocated buffer up to its first NUL byte.
    pub fn decode_buffer(&self, buffer: &[u8]) -> String {
        let end = buffer.iter().position(|b| *b == 0).unwrap_or(buffer.len());
        self.decode(&buffer[..end])
    }
}

fn encode_latin1(text: &str) -> FfiResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                FfiError::encoding(
                    text,
                    "ISO-8859-1",
                    format!("U+{:04X} is not representable", u32::from(c)),
                )
            })
        })
        .collect()
}

#[cfg(windows)]
mod ansi {
    use std::ptr;

    use windows_sys::Win32::Globalization::{
        MultiByteToWideChar, WideCharToMultiByte, CP_ACP, WC_NO_BEST_FIT_CHARS,
    };

    use crate::error::{FfiError, FfiResult};

    pub(super) fn encode(text: &str) -> FfiResult<Vec<u8>> {
        let wide: Vec<u16> = text.encode_utf16().collect();
        if wide.is_empty() {
            return Ok(Vec::new());
        }
        let wide_len = i32::try_from(wide.len())
            .map_err(|_| FfiError::encoding(text, "active code page", "string too long"))?;

        // Safety: the wide buffer is valid for `wide_len` elements and a
        // null output pointer with size 0 only queries the required size.
        let required = unsafe {
            WideCharToMultiByte(
                CP_ACP,
                WC_NO_BEST_FIT_CHARS,
                wide.as_ptr(),
                wide_len,
                ptr::null_mut(),
                0,
                ptr::null(),
                ptr::null_mut(),
            )
        };
        if required <= 0 {
            return Err(FfiError::encoding(text, "active code page", "conversion failed"));
        }

        let mut out = vec![0u8; required as usize];
        let mut used_default = 0;
        // Safety: `out` holds exactly `required` bytes.
        let written = unsafe {
            WideCharToMultiByte(
                CP_ACP,
                WC_NO_BEST_FIT_CHARS,
                wide.as_ptr(),
                wide_len,
                out.as_mut_ptr(),
                required,
                ptr::null(),
                &mut used_default,
            )
        };
        if written <= 0 {
            return Err(FfiError::encoding(text, "active code page", "conversion failed"));
        }
        if used_default != 0 {
            return Err(FfiError::encoding(
                text,
                "active code page",
                "contains characters outside the code page",
            ));
        }
        out.truncate(written as usize);
        Ok(out)
    }

    pub(super) fn decode(bytes: &[u8]) -> String {
        let Ok(len) = i32::try_from(bytes.len()) else {
            return String::from_utf8_lossy(bytes).into_owned();
        };
        if len == 0 {
            return String::new();
        }
        // Safety: `bytes` is valid for `len` bytes; a null output queries
        // the required size.
        let required =
            unsafe { MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, ptr::null_mut(), 0) };
        if required <= 0 {
            return String::from_utf8_lossy(bytes).into_owned();
        }
        let mut wide = vec![0u16; required as usize];
        // Safety: `wide` holds exactly `required` elements.
        let written = unsafe {
            MultiByteToWideChar(CP_ACP, 0, bytes.as_ptr(), len, wide.as_mut_ptr(), required)
        };
        wide.truncate(written.max(0) as usize);
        String::from_utf16_lossy(&wide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latin1_round_trip() {
        let codec = StringCodec::Latin1;
        let encoded = codec.encode("Gerät ÿ").unwrap();
        assert_eq!(encoded.as_bytes(), b"Ger\xe4t \xff");
        assert_eq!(codec.decode(encoded.as_bytes()), "Gerät ÿ");
    }

    #[test]
    fn test_latin1_rejects_unrepresentable() {
        let err = StringCodec::Latin1.encode("Ω").unwrap_err();
        assert!(matches!(err, FfiError::Encoding { codec: "ISO-8859-1", .. }));
        assert!(err.to_string().contains("U+03A9"));
    }

    #[test]
    fn test_interior_nul_rejected() {
        assert!(StringCodec::Latin1.encode("a\0b").is_err());
    }

    #[test]
    fn test_decode_buffer_stops_at_nul() {
        let mut buffer = [0u8; 16];
        buffer[..5].copy_from_slice(b"PXI1\xe9");
        buffer[6] = b'x';
        assert_eq!(StringCodec::Latin1.decode_buffer(&buffer), "PXI1é");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_platform_codec_is_latin1() {
        assert_eq!(StringCodec::platform(), StringCodec::Latin1);
    }

    #[cfg(windows)]
    #[test]
    fn test_active_code_page_round_trip() {
        let codec = StringCodec::ActiveCodePage;
        let encoded = codec.encode("Chassis 1").unwrap();
        assert_eq!(codec.decode(encoded.as_bytes()), "Chassis 1");
    }

    #[cfg(windows)]
    #[test]
    fn test_active_code_page_omega() {
        // Greek and most East Asian code pages carry Ω; Windows-1252 does not.
        let codec = StringCodec::ActiveCodePage;
        match codec.encode("Ω") {
            Ok(encoded) => {
                assert!(!encoded.as_bytes().is_empty());
                assert_eq!(codec.decode(encoded.as_bytes()), "Ω");
            }
            Err(err) => assert!(matches!(err, FfiError::Encoding { .. })),
        }
    }
}
