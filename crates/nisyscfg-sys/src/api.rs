//! The native entry points.
//!
//! [`NativeApi`] mirrors the C API one method per function. Arguments keep
//! their native shape (handles, 32-bit enums, byte strings, out-parameters)
//! so that the safe layer performs every conversion itself and can be
//! exercised against an in-memory implementation.

use std::ffi::CStr;

use crate::error::FfiResult;
use crate::handle::{DetailedString, RawHandle};
use crate::timestamp::Timestamp;

/// Destination of a property read (`void* value` in the C API).
#[derive(Debug)]
pub enum PropertyOut<'a> {
    /// `int` properties: booleans, signed integers, enums, bitmasks.
    Int(&'a mut i32),
    /// `unsigned int` properties.
    UInt(&'a mut u32),
    /// `double` properties.
    Double(&'a mut f64),
    /// String properties, written into a [`crate::SIMPLE_STRING_LENGTH`] buffer.
    Str(&'a mut [u8]),
    /// `NISysCfgTimestampUTC` properties.
    Timestamp(&'a mut Timestamp),
    /// Properties holding another native handle.
    Handle(&'a mut RawHandle),
}

/// Value passed to a variadic property setter.
#[derive(Debug, Clone, Copy)]
pub enum PropertyIn<'a> {
    Int(i32),
    UInt(u32),
    Double(f64),
    Str(&'a CStr),
    Timestamp(&'a Timestamp),
}

/// One method per `NISysCfg*` entry point.
///
/// Every method returns the raw status code of the call. `Err` means the
/// call never reached the library (the entry point could not be resolved
/// or an argument could not be marshaled).
pub trait NativeApi: Send + Sync {
    // Session

    /// `NISysCfgInitializeSession`
    #[allow(clippy::too_many_arguments)]
    fn initialize_session(
        &self,
        target: &CStr,
        username: Option<&CStr>,
        password: Option<&CStr>,
        locale: i32,
        force_property_refresh: bool,
        connect_timeout_ms: u32,
        expert_enum: &mut RawHandle,
        session: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgCloseHandle`
    fn close_handle(&self, handle: RawHandle) -> FfiResult<i32>;

    /// `NISysCfgGetStatusDescription`
    fn get_status_description(
        &self,
        session: RawHandle,
        status: i32,
        description: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgFreeDetailedString`
    fn free_detailed_string(&self, text: DetailedString) -> FfiResult<i32>;

    /// `NISysCfgTimestampFromValues`
    fn timestamp_from_values(
        &self,
        seconds_since_1970: u64,
        fractional_seconds: f64,
        timestamp: &mut Timestamp,
    ) -> FfiResult<i32>;

    /// `NISysCfgValuesFromTimestamp`
    fn values_from_timestamp(
        &self,
        timestamp: &Timestamp,
        seconds_since_1970: &mut u64,
        fractional_seconds: &mut f64,
    ) -> FfiResult<i32>;

    /// `NISysCfgGetSystemExperts`
    fn get_system_experts(
        &self,
        session: RawHandle,
        expert_names: &CStr,
        expert_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgSetRemoteTimeout`
    fn set_remote_timeout(&self, session: RawHandle, timeout_ms: u32) -> FfiResult<i32>;

    /// `NISysCfgFindHardware`
    fn find_hardware(
        &self,
        session: RawHandle,
        filter_mode: i32,
        filter: RawHandle,
        expert_names: Option<&CStr>,
        resource_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgFindSystems`
    #[allow(clippy::too_many_arguments)]
    fn find_systems(
        &self,
        session: RawHandle,
        device_class: Option<&CStr>,
        detect_online_systems: bool,
        cache_mode: i32,
        name_format: i32,
        timeout_ms: u32,
        only_installable_systems: bool,
        system_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgRestart`
    fn restart(
        &self,
        session: RawHandle,
        wait_for_restart: bool,
        install_mode: bool,
        flush_dns: bool,
        timeout_ms: u32,
        new_ip_address: &mut [u8],
    ) -> FfiResult<i32>;

    /// `NISysCfgGetInstalledSoftwareComponents`
    fn get_installed_software_components(
        &self,
        session: RawHandle,
        item_types: i32,
        cached: bool,
        component_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgGetFeeds`
    fn get_feeds(
        &self,
        session: RawHandle,
        platform: Option<&CStr>,
        cached: bool,
        feed_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgInstallAll`
    fn install_all(
        &self,
        session: RawHandle,
        auto_restart: bool,
        deselect_conflicts: bool,
        installed_enum: &mut RawHandle,
        broken_dependency_enum: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgGetSystemProperty`
    fn get_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32>;

    /// `NISysCfgSetSystemProperty` (variadic)
    fn set_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32>;

    // Filter

    /// `NISysCfgCreateFilter`
    fn create_filter(&self, session: RawHandle, filter: &mut RawHandle) -> FfiResult<i32>;

    /// `NISysCfgSetFilterProperty` (variadic)
    fn set_filter_property(
        &self,
        filter: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32>;

    // Resource

    /// `NISysCfgGetResourceProperty`
    fn get_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32>;

    /// `NISysCfgSetResourceProperty` (variadic)
    fn set_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32>;

    /// `NISysCfgGetResourceIndexedProperty`
    fn get_resource_indexed_property(
        &self,
        resource: RawHandle,
        property: i32,
        index: u32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32>;

    /// `NISysCfgSaveResourceChanges`
    fn save_resource_changes(
        &self,
        resource: RawHandle,
        restart_required: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgSelfTestHardware`
    fn self_test_hardware(
        &self,
        resource: RawHandle,
        mode: u32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgSelfCalibrateHardware`
    fn self_calibrate_hardware(
        &self,
        resource: RawHandle,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgResetHardware`
    fn reset_hardware(&self, resource: RawHandle, mode: u32) -> FfiResult<i32>;

    /// `NISysCfgRenameResource`
    fn rename_resource(
        &self,
        resource: RawHandle,
        new_name: &CStr,
        overwrite_conflict: bool,
        update_dependencies: bool,
        name_already_existed: &mut bool,
        overwritten_resource: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgDeleteResource`
    fn delete_resource(
        &self,
        resource: RawHandle,
        mode: i32,
        dependent_items_deleted: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgUpgradeFirmwareFromFile`
    #[allow(clippy::too_many_arguments)]
    fn upgrade_firmware_from_file(
        &self,
        resource: RawHandle,
        firmware_file: &CStr,
        auto_stop_tasks: bool,
        always_overwrite: bool,
        wait_for_operation: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgEraseFirmware`
    fn erase_firmware(
        &self,
        resource: RawHandle,
        auto_stop_tasks: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32>;

    // Enumerators

    /// `NISysCfgNextResource`
    fn next_resource(
        &self,
        session: RawHandle,
        resource_enum: RawHandle,
        resource: &mut RawHandle,
    ) -> FfiResult<i32>;

    /// `NISysCfgNextExpertInfo`
    fn next_expert_info(
        &self,
        expert_enum: RawHandle,
        name: &mut [u8],
        display_name: &mut [u8],
        version: &mut [u8],
    ) -> FfiResult<i32>;

    /// `NISysCfgNextSystemInfo`
    fn next_system_info(&self, system_enum: RawHandle, system: &mut [u8]) -> FfiResult<i32>;

    /// `NISysCfgNextComponentInfo`
    #[allow(clippy::too_many_arguments)]
    fn next_component_info(
        &self,
        component_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
        item_type: &mut i32,
        detailed_description: &mut DetailedString,
    ) -> FfiResult<i32>;

    /// `NISysCfgNextDependencyInfo`
    fn next_dependency_info(
        &self,
        dependency_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
    ) -> FfiResult<i32>;

    /// `NISysCfgNextFeed`
    fn next_feed(
        &self,
        feed_enum: RawHandle,
        name: &mut [u8],
        uri: &mut [u8],
        enabled: &mut bool,
        trusted: &mut bool,
    ) -> FfiResult<i32>;
}
