//! Raw status codes returned by every entry point.
//!
//! Zero is success, positive values are warnings, negative values are
//! errors. [`END_OF_ENUM`] is the one positive value that is neither: it
//! marks the end of an enumeration.

/// Success.
pub const OK: i32 = 0;

/// An enumerator has no more items.
pub const END_OF_ENUM: i32 = 1;

// Warnings

/// A requested system was found only in the offline cache.
pub const FOUND_CACHED_OFFLINE_SYSTEM: i32 = 0x4004_0370;
/// A restart of the local host has been initiated.
pub const RESTART_LOCALHOST_INITIATED: i32 = 0x4004_0371;
/// The changes take effect after the next restart.
pub const RESTART_REQUIRED: i32 = 0x4004_0372;
/// Some of the requested items could not be processed.
pub const PARTIAL_SUCCESS: i32 = 0x4004_0373;

// Errors

/// The operation is not implemented.
pub const NOT_IMPLEMENTED: i32 = 0x8000_4001_u32 as i32;
/// A required pointer argument was null.
pub const NULL_POINTER: i32 = 0x8000_4003_u32 as i32;
/// Unspecified failure.
pub const FAIL: i32 = 0x8000_4005_u32 as i32;
/// Unexpected internal failure.
pub const UNEXPECTED: i32 = 0x8000_FFFF_u32 as i32;
/// The library ran out of memory.
pub const OUT_OF_MEMORY: i32 = 0x8007_000E_u32 as i32;
/// An argument is invalid.
pub const INVALID_ARG: i32 = 0x8007_0057_u32 as i32;
/// The remote operation timed out.
pub const TIMED_OUT: i32 = 0x8004_0360_u32 as i32;
/// The handle is not valid for this operation.
pub const INVALID_HANDLE: i32 = 0x8004_0361_u32 as i32;
/// The System Configuration runtime is not installed on the target.
pub const API_NOT_INSTALLED: i32 = 0x8004_0362_u32 as i32;
/// The expert is not installed on the target.
pub const EXPERT_NOT_FOUND: i32 = 0x8004_0363_u32 as i32;
/// The property is not implemented by the connected expert.
pub const PROP_DOES_NOT_EXIST: i32 = 0x8004_0371_u32 as i32;
/// The property cannot be written.
pub const READ_ONLY_PROPERTY: i32 = 0x8004_0372_u32 as i32;
/// The value type does not match the property type.
pub const PROPERTY_TYPE_MISMATCH: i32 = 0x8004_0373_u32 as i32;
/// The resource is not present.
pub const RESOURCE_NOT_PRESENT: i32 = 0x8004_0374_u32 as i32;
/// The resource is in use by another process.
pub const RESOURCE_IN_USE: i32 = 0x8004_0375_u32 as i32;
/// The new name is already used by another resource.
pub const NAME_COLLISION: i32 = 0x8004_0376_u32 as i32;
/// The resource has dependents and the delete mode forbids removing them.
pub const HAS_DEPENDENCIES: i32 = 0x8004_0377_u32 as i32;
/// The firmware image is not valid for this device.
pub const INVALID_FIRMWARE_IMAGE: i32 = 0x8004_0378_u32 as i32;
/// The filter mode is not recognized.
pub const INVALID_FILTER_MODE: i32 = 0x8004_0379_u32 as i32;
/// Access to the target was denied.
pub const ACCESS_DENIED: i32 = 0x8004_037A_u32 as i32;

/// Status names, used when rendering errors.
pub const NAMES: &[(i32, &str)] = &[
    (OK, "NISysCfg_OK"),
    (END_OF_ENUM, "NISysCfg_EndOfEnum"),
    (FOUND_CACHED_OFFLINE_SYSTEM, "NISysCfg_FoundCachedOfflineSystem"),
    (RESTART_LOCALHOST_INITIATED, "NISysCfg_RestartLocalhostInitiated"),
    (RESTART_REQUIRED, "NISysCfg_RestartRequired"),
    (PARTIAL_SUCCESS, "NISysCfg_PartialSuccess"),
    (NOT_IMPLEMENTED, "NISysCfg_NotImplemented"),
    (NULL_POINTER, "NISysCfg_NullPointer"),
    (FAIL, "NISysCfg_Fail"),
    (UNEXPECTED, "NISysCfg_Unexpected"),
    (OUT_OF_MEMORY, "NISysCfg_OutOfMemory"),
    (INVALID_ARG, "NISysCfg_InvalidArg"),
    (TIMED_OUT, "NISysCfg_TimedOut"),
    (INVALID_HANDLE, "NISysCfg_InvalidHandle"),
    (API_NOT_INSTALLED, "NISysCfg_SysConfigAPINotInstalled"),
    (EXPERT_NOT_FOUND, "NISysCfg_ExpertNotFound"),
    (PROP_DOES_NOT_EXIST, "NISysCfg_PropDoesNotExist"),
    (READ_ONLY_PROPERTY, "NISysCfg_ReadOnlyProperty"),
    (PROPERTY_TYPE_MISMATCH, "NISysCfg_PropertyTypeMismatch"),
    (RESOURCE_NOT_PRESENT, "NISysCfg_ResourceIsNotPresent"),
    (RESOURCE_IN_USE, "NISysCfg_ResourceInUse"),
    (NAME_COLLISION, "NISysCfg_NameCollision"),
    (HAS_DEPENDENCIES, "NISysCfg_HasDependencies"),
    (INVALID_FIRMWARE_IMAGE, "NISysCfg_InvalidFirmwareImage"),
    (INVALID_FILTER_MODE, "NISysCfg_InvalidFilterMode"),
    (ACCESS_DENIED, "NISysCfg_AccessDenied"),
];

/// Looks up the symbolic name of a status code.
pub fn name(code: i32) -> Option<&'static str> {
    NAMES
        .iter()
        .find(|(value, _)| *value == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_negative() {
        assert!(PROP_DOES_NOT_EXIST < 0);
        assert!(NOT_IMPLEMENTED < 0);
        assert!(RESTART_REQUIRED > END_OF_ENUM);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(name(PROP_DOES_NOT_EXIST), Some("NISysCfg_PropDoesNotExist"));
        assert_eq!(name(END_OF_ENUM), Some("NISysCfg_EndOfEnum"));
        assert_eq!(name(-12345), None);
    }

    #[test]
    fn test_names_are_unique() {
        for (i, (code, _)) in NAMES.iter().enumerate() {
            assert!(NAMES[i + 1..].iter().all(|(other, _)| other != code));
        }
    }
}
