//! Status classification and error handling.
//!
//! Every native call returns a raw status code. This module classifies
//! those codes, turns failures into [`SysCfgError`] and attaches the
//! library's own description of the failure.

use std::fmt;

use log::{debug, error, warn};
use nisyscfg_sys::{status, DetailedString, FfiError, FfiResult, NativeApi, RawHandle, StringCodec};
use thiserror::Error;

/// A raw status code returned by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(i32);

/// How a status code is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Success,
    /// Positive codes other than end-of-enumeration.
    Warning,
    /// The enumerator has no more items. Not a warning.
    EndOfEnum,
    /// Negative codes.
    Error,
}

impl Status {
    pub const OK: Self = Status(status::OK);
    pub const END_OF_ENUM: Self = Status(status::END_OF_ENUM);

    /// Wraps a raw status code.
    pub const fn from_raw(code: i32) -> Self {
        Status(code)
    }

    /// Returns the raw status code.
    pub const fn code(&self) -> i32 {
        self.0
    }

    /// Classifies the code.
    pub fn class(&self) -> StatusClass {
        match self.0 {
            status::OK => StatusClass::Success,
            status::END_OF_ENUM => StatusClass::EndOfEnum,
            code if code > 0 => StatusClass::Warning,
            _ => StatusClass::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.class() == StatusClass::Success
    }

    pub fn is_warning(&self) -> bool {
        self.class() == StatusClass::Warning
    }

    pub fn is_error(&self) -> bool {
        self.class() == StatusClass::Error
    }

    /// Returns the symbolic name of the code, if known.
    pub fn name(&self) -> Option<&'static str> {
        status::name(self.0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08X})", name, self.0),
            None => write!(f, "0x{:08X}", self.0),
        }
    }
}

fn with_description(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(": {}", description)
    }
}

/// Error type for the safe bindings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SysCfgError {
    /// The library returned an error status.
    #[error("{status}{}", with_description(.description))]
    Native { status: Status, description: String },

    /// The connected expert does not implement the property (or has no
    /// value at the requested index).
    #[error("property not implemented, {status}{}", with_description(.description))]
    PropertyNotImplemented { status: Status, description: String },

    /// The library returned a warning and strict warnings are enabled.
    #[error("warning {status}{}", with_description(.description))]
    Warning { status: Status, description: String },

    /// An indexed property has no value at this index.
    #[error("indexed property {property} has no value at index {index}")]
    IndexExhausted { property: &'static str, index: u32 },

    /// The index is beyond the supported range of indexed properties.
    #[error("index {index} of {property} is out of range (limit {limit})")]
    IndexOutOfRange {
        property: &'static str,
        index: u32,
        limit: u32,
    },

    #[error("property {property} is read-only")]
    ReadOnly { property: &'static str },

    #[error("property {property} is write-only")]
    WriteOnly { property: &'static str },

    /// Dynamic lookup by name failed.
    #[error("{bag} has no property named {name:?}")]
    UnknownProperty { bag: &'static str, name: String },

    /// A value has no symbol in an enum table.
    #[error("{value} is not a valid {type_name}")]
    UnknownSymbol {
        type_name: &'static str,
        value: String,
    },

    /// A dynamic value does not match the property's declared type.
    #[error("property {property} holds {expected}, not {actual}")]
    TypeMismatch {
        property: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// A timestamp cannot be represented natively.
    #[error("timestamp {value} cannot be represented")]
    InvalidTimestamp { value: String },

    /// The object (or its session) was already closed.
    #[error("{object} handle is closed")]
    Closed { object: &'static str },

    /// The library reported success but returned a null handle.
    #[error("{operation} returned a null handle")]
    NullHandle { operation: &'static str },

    /// The call never reached the library.
    #[error(transparent)]
    Ffi(#[from] FfiError),
}

impl SysCfgError {
    /// Maps an error status to its error kind.
    pub fn from_status(status: Status, description: String) -> Self {
        match status.code() {
            status::PROP_DOES_NOT_EXIST => SysCfgError::PropertyNotImplemented {
                status,
                description,
            },
            _ => SysCfgError::Native {
                status,
                description,
            },
        }
    }

    /// Returns the status code, for errors raised by the library.
    pub fn status(&self) -> Option<Status> {
        match self {
            SysCfgError::Native { status, .. }
            | SysCfgError::PropertyNotImplemented { status, .. }
            | SysCfgError::Warning { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the library's description of the failure, if any.
    pub fn description(&self) -> Option<&str> {
        match self {
            SysCfgError::Native { description, .. }
            | SysCfgError::PropertyNotImplemented { description, .. }
            | SysCfgError::Warning { description, .. } => Some(description),
            _ => None,
        }
    }

    pub fn is_property_not_implemented(&self) -> bool {
        matches!(self, SysCfgError::PropertyNotImplemented { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SysCfgError::Closed { .. })
    }
}

/// Result type for the safe bindings.
pub type SysCfgResult<T> = Result<T, SysCfgError>;

/// Whether a failing status is described through the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CheckMode {
    Describe,
    /// Used while checking the description call itself.
    Quiet,
}

/// Checks raw status codes in the scope of one session.
pub(crate) struct Checker<'a> {
    pub(crate) api: &'a dyn NativeApi,
    pub(crate) codec: StringCodec,
    pub(crate) session: RawHandle,
    pub(crate) strict_warnings: bool,
}

impl Checker<'_> {
    pub(crate) fn check(&self, operation: &str, result: FfiResult<i32>) -> SysCfgResult<Status> {
        self.check_with(operation, result, CheckMode::Describe)
    }

    pub(crate) fn check_with(
        &self,
        operation: &str,
        result: FfiResult<i32>,
        mode: CheckMode,
    ) -> SysCfgResult<Status> {
        let status = Status::from_raw(result?);
        match status.class() {
            StatusClass::Success | StatusClass::EndOfEnum => Ok(status),
            StatusClass::Warning => {
                let description = self.describe(status, mode);
                if self.strict_warnings {
                    return Err(SysCfgError::Warning {
                        status,
                        description,
                    });
                }
                warn!(
                    "{} returned {}{}",
                    operation,
                    status,
                    with_description(&description)
                );
                Ok(status)
            }
            StatusClass::Error => {
                let description = self.describe(status, mode);
                debug!("{} failed with {}", operation, status);
                Err(SysCfgError::from_status(status, description))
            }
        }
    }

    /// Asks the library to describe `status`. Any failure yields an empty
    /// description.
    fn describe(&self, status: Status, mode: CheckMode) -> String {
        if mode == CheckMode::Quiet || self.session.is_null() {
            return String::new();
        }
        let mut text = DetailedString::null();
        let result = self
            .api
            .get_status_description(self.session, status.code(), &mut text);
        self.with_detail("get_status_description", result, text, CheckMode::Quiet)
            .map(|(_, description)| description)
            .unwrap_or_default()
    }

    /// Decodes and frees a detailed-result string, then checks both the
    /// call that produced it and the free.
    ///
    /// A failure of the primary call wins; a free failure alongside it is
    /// logged. A free failure on its own is returned.
    pub(crate) fn with_detail(
        &self,
        operation: &str,
        result: FfiResult<i32>,
        detail: DetailedString,
        mode: CheckMode,
    ) -> SysCfgResult<(Status, String)> {
        let text = detail
            .to_bytes()
            .map(|bytes| self.codec.decode(&bytes))
            .unwrap_or_default();
        let freed = if detail.is_null() {
            Ok(status::OK)
        } else {
            self.api.free_detailed_string(detail)
        };

        let primary = self.check_with(operation, result, mode);
        let free = self.check_with("free_detailed_string", freed, mode);
        match (primary, free) {
            (Ok(status), Ok(_)) => Ok((status, text)),
            (Ok(_), Err(free_error)) => Err(free_error),
            (Err(primary_error), Ok(_)) => Err(primary_error),
            (Err(primary_error), Err(free_error)) => {
                error!(
                    "Failed to free the detailed result of {}: {}",
                    operation, free_error
                );
                Err(primary_error)
            }
        }
    }
}
