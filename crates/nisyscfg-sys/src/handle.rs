//! Opaque values handed out by the native library.

use std::ffi::{c_char, c_void, CStr};
use std::fmt;
use std::ptr;

/// A native handle (session, filter, resource or enumerator).
///
/// Layout-compatible with the `void*` handles of the C API, so a
/// `*mut RawHandle` can be passed wherever the library expects a
/// `NISysCfg*Handle*` out-parameter.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawHandle(usize);

impl RawHandle {
    /// The null handle ("no object").
    pub const NULL: Self = RawHandle(0);

    /// Creates a handle from its integer representation.
    pub const fn from_raw(raw: usize) -> Self {
        RawHandle(raw)
    }

    /// Creates a handle from a native pointer.
    pub fn from_ptr(ptr: *mut c_void) -> Self {
        RawHandle(ptr as usize)
    }

    /// Returns the integer representation.
    pub const fn as_raw(&self) -> usize {
        self.0
    }

    /// Returns the native pointer representation.
    pub fn as_ptr(&self) -> *mut c_void {
        self.0 as *mut c_void
    }

    /// Returns true for the null handle.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawHandle(0x{:x})", self.0)
    }
}

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// A library-allocated string returned through a `char**` out-parameter.
///
/// The pointer stays owned by the library; it must be handed back through
/// `NativeApi::free_detailed_string` exactly once.
#[derive(Debug)]
pub struct DetailedString {
    ptr: *mut c_char,
}

impl DetailedString {
    /// An empty out-parameter.
    pub fn null() -> Self {
        Self {
            ptr: ptr::null_mut(),
        }
    }

    /// Wraps a pointer produced by the native library.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a NUL-terminated string that stays
    /// valid until it is freed by the allocator that produced it.
    pub unsafe fn from_raw(ptr: *mut c_char) -> Self {
        Self { ptr }
    }

    /// Returns true if the library did not produce a string.
    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Returns the `char**` to pass to the library.
    pub fn as_out_ptr(&mut self) -> *mut *mut c_char {
        &mut self.ptr
    }

    /// Releases ownership of the pointer.
    pub fn into_raw(self) -> *mut c_char {
        self.ptr
    }

    /// Copies the string bytes (without the terminator).
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if self.ptr.is_null() {
            return None;
        }
        // Safety: non-null pointers only come from the library (or from
        // `from_raw`, whose contract requires a valid C string).
        let bytes = unsafe { CStr::from_ptr(self.ptr) }.to_bytes();
        Some(bytes.to_vec())
    }
}

impl Default for DetailedString {
    fn default() -> Self {
        Self::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_null_handle() {
        assert!(RawHandle::NULL.is_null());
        assert!(RawHandle::default().is_null());
        assert!(!RawHandle::from_raw(0x10).is_null());
    }

    #[test]
    fn test_handle_pointer_round_trip() {
        let handle = RawHandle::from_raw(0xdead_b000);
        assert_eq!(RawHandle::from_ptr(handle.as_ptr()), handle);
        assert_eq!(format!("{:?}", handle), "RawHandle(0xdeadb000)");
    }

    #[test]
    fn test_detailed_string_bytes() {
        assert!(DetailedString::null().to_bytes().is_none());

        let owned = CString::new("self test passed").unwrap();
        let detail = unsafe { DetailedString::from_raw(owned.into_raw()) };
        assert_eq!(detail.to_bytes().unwrap(), b"self test passed".to_vec());

        // Reclaim so the test does not leak.
        drop(unsafe { CString::from_raw(detail.into_raw()) });
    }
}
