//! Raw ABI for the NI System Configuration C API.
//!
//! This crate is the boundary between Rust and the vendor library. It
//! provides:
//!
//! - [`RawHandle`], [`Timestamp`] and [`DetailedString`]: C type
//!   representations shared by every entry point
//! - [`status`]: raw status codes returned by the library
//! - [`StringCodec`]: the platform string encoding used at every string
//!   marshaling boundary
//! - [`NativeApi`]: one method per native entry point
//! - [`DynamicLibrary`]: the `NativeApi` implementation backed by the
//!   installed shared library, loaded once per process
//!
//! With the `mock` feature enabled, [`mock::MockNative`] provides an
//! in-memory implementation for tests.
//!
//! # Safety
//!
//! All entry points use the C ABI and follow these rules:
//!
//! 1. Handles are pointer-sized opaque values; null means "no object"
//! 2. Strings are NUL-terminated byte strings in the platform codec
//! 3. String out-parameters are caller-allocated buffers of
//!    [`SIMPLE_STRING_LENGTH`] bytes
//! 4. Detailed-result strings are allocated by the library and must be
//!    released with `NISysCfgFreeDetailedString`

mod api;
mod codec;
mod error;
mod handle;
mod library;
pub mod status;
mod timestamp;

#[cfg(feature = "mock")]
pub mod mock;

pub use api::{NativeApi, PropertyIn, PropertyOut};
pub use codec::StringCodec;
pub use error::{FfiError, FfiResult};
pub use handle::{DetailedString, RawHandle};
pub use library::{library_name, DynamicLibrary};
pub use timestamp::Timestamp;

/// Size of every caller-allocated string buffer passed to the library.
pub const SIMPLE_STRING_LENGTH: usize = 1024;

/// Returns a zeroed buffer suitable for a native string out-parameter.
pub fn string_buffer() -> [u8; SIMPLE_STRING_LENGTH] {
    [0; SIMPLE_STRING_LENGTH]
}
