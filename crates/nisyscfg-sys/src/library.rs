//! The installed shared library.
//!
//! The library is loaded once per process ([`DynamicLibrary::shared`]).
//! Each entry point is looked up on first use and cached; the lookup runs
//! under a per-symbol lock so concurrent first calls resolve it once.

use std::ffi::{c_char, c_int, c_uint, c_void, CStr};
use std::ptr;
use std::sync::{Arc, Mutex, PoisonError};

use libloading::Library;
use log::{debug, info};
use once_cell::sync::OnceCell;

use crate::api::{NativeApi, PropertyIn, PropertyOut};
use crate::error::{FfiError, FfiResult};
use crate::handle::{DetailedString, RawHandle};
use crate::timestamp::Timestamp;
use crate::SIMPLE_STRING_LENGTH;

type Handle = *mut c_void;

/// Returns the file name of the library for this platform.
pub fn library_name() -> FfiResult<&'static str> {
    if cfg!(windows) {
        Ok("nisyscfg.dll")
    } else if cfg!(target_os = "linux") {
        Ok("libnisyscfg.so")
    } else {
        Err(FfiError::PlatformUnsupported {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        })
    }
}

/// A lazily resolved entry point.
struct Entry<F> {
    symbol: &'static str,
    slot: Mutex<Option<F>>,
}

impl<F: Copy> Entry<F> {
    const fn new(symbol: &'static str) -> Self {
        Self {
            symbol,
            slot: Mutex::new(None),
        }
    }

    fn resolve(&self, library: &Library, library_name: &str) -> FfiResult<F> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(function) = *slot {
            return Ok(function);
        }

        // Safety: `F` is the signature declared for `symbol` in nisyscfg.h.
        let function = unsafe { library.get::<F>(self.symbol.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|e| FfiError::SymbolUnavailable {
                library: library_name.to_string(),
                symbol: self.symbol.to_string(),
                message: e.to_string(),
            })?;
        debug!("Resolved {} from {}", self.symbol, library_name);
        *slot = Some(function);
        Ok(function)
    }
}

// Entry points are stdcall on 32-bit Windows ("system" is "C" elsewhere);
// the variadic setters are always cdecl.
type SetPropertyFn = unsafe extern "C" fn(Handle, c_int, ...) -> c_int;

macro_rules! entry_points {
    ($( $field:ident: $symbol:literal => fn($($arg:ty),* $(,)?); )*) => {
        struct EntryPoints {
            $( $field: Entry<unsafe extern "system" fn($($arg),*) -> c_int>, )*
            set_system_property: Entry<SetPropertyFn>,
            set_filter_property: Entry<SetPropertyFn>,
            set_resource_property: Entry<SetPropertyFn>,
        }

        impl EntryPoints {
            fn new() -> Self {
                Self {
                    $( $field: Entry::new($symbol), )*
                    set_system_property: Entry::new("NISysCfgSetSystemProperty"),
                    set_filter_property: Entry::new("NISysCfgSetFilterProperty"),
                    set_resource_property: Entry::new("NISysCfgSetResourceProperty"),
                }
            }
        }
    };
}

entry_points! {
    initialize_session: "NISysCfgInitializeSession" => fn(
        *const c_char, *const c_char, *const c_char, c_int, c_int, c_uint, *mut Handle, *mut Handle,
    );
    close_handle: "NISysCfgCloseHandle" => fn(Handle);
    get_status_description: "NISysCfgGetStatusDescription" => fn(Handle, c_int, *mut *mut c_char);
    free_detailed_string: "NISysCfgFreeDetailedString" => fn(*mut c_char);
    timestamp_from_values: "NISysCfgTimestampFromValues" => fn(u64, f64, *mut Timestamp);
    values_from_timestamp: "NISysCfgValuesFromTimestamp" => fn(*const Timestamp, *mut u64, *mut f64);
    get_system_experts: "NISysCfgGetSystemExperts" => fn(Handle, *const c_char, *mut Handle);
    set_remote_timeout: "NISysCfgSetRemoteTimeout" => fn(Handle, c_uint);
    find_hardware: "NISysCfgFindHardware" => fn(Handle, c_int, Handle, *const c_char, *mut Handle);
    find_systems: "NISysCfgFindSystems" => fn(
        Handle, *const c_char, c_int, c_int, c_int, c_uint, c_int, *mut Handle,
    );
    restart: "NISysCfgRestart" => fn(Handle, c_int, c_int, c_int, c_uint, *mut c_char);
    get_installed_software_components: "NISysCfgGetInstalledSoftwareComponents" => fn(
        Handle, c_int, c_int, *mut Handle,
    );
    get_feeds: "NISysCfgGetFeeds" => fn(Handle, *const c_char, c_int, *mut Handle);
    install_all: "NISysCfgInstallAll" => fn(Handle, c_int, c_int, *mut Handle, *mut Handle);
    get_system_property: "NISysCfgGetSystemProperty" => fn(Handle, c_int, *mut c_void);
    create_filter: "NISysCfgCreateFilter" => fn(Handle, *mut Handle);
    get_resource_property: "NISysCfgGetResourceProperty" => fn(Handle, c_int, *mut c_void);
    get_resource_indexed_property: "NISysCfgGetResourceIndexedProperty" => fn(
        Handle, c_int, c_uint, *mut c_void,
    );
    save_resource_changes: "NISysCfgSaveResourceChanges" => fn(Handle, *mut c_int, *mut *mut c_char);
    self_test_hardware: "NISysCfgSelfTestHardware" => fn(Handle, c_uint, *mut *mut c_char);
    self_calibrate_hardware: "NISysCfgSelfCalibrateHardware" => fn(Handle, *mut *mut c_char);
    reset_hardware: "NISysCfgResetHardware" => fn(Handle, c_uint);
    rename_resource: "NISysCfgRenameResource" => fn(
        Handle, *const c_char, c_int, c_int, *mut c_int, *mut Handle,
    );
    delete_resource: "NISysCfgDeleteResource" => fn(Handle, c_int, *mut c_int, *mut *mut c_char);
    upgrade_firmware_from_file: "NISysCfgUpgradeFirmwareFromFile" => fn(
        Handle, *const c_char, c_int, c_int, c_int, *mut c_int, *mut *mut c_char,
    );
    erase_firmware: "NISysCfgEraseFirmware" => fn(Handle, c_int, *mut c_int, *mut *mut c_char);
    next_resource: "NISysCfgNextResource" => fn(Handle, Handle, *mut Handle);
    next_expert_info: "NISysCfgNextExpertInfo" => fn(Handle, *mut c_char, *mut c_char, *mut c_char);
    next_system_info: "NISysCfgNextSystemInfo" => fn(Handle, *mut c_char);
    next_component_info: "NISysCfgNextComponentInfo" => fn(
        Handle, *mut c_char, *mut c_char, *mut c_char, *mut c_int, *mut *mut c_char,
    );
    next_dependency_info: "NISysCfgNextDependencyInfo" => fn(
        Handle, *mut c_char, *mut c_char, *mut c_char,
    );
    next_feed: "NISysCfgNextFeed" => fn(Handle, *mut c_char, *mut c_char, *mut c_int, *mut c_int);
}

static SHARED: OnceCell<Arc<DynamicLibrary>> = OnceCell::new();

/// [`NativeApi`] backed by the installed NI System Configuration library.
pub struct DynamicLibrary {
    name: String,
    library: Library,
    entries: EntryPoints,
}

impl DynamicLibrary {
    /// Returns the process-wide instance, loading the library on first use.
    pub fn shared() -> FfiResult<Arc<DynamicLibrary>> {
        SHARED
            .get_or_try_init(|| Self::load(library_name()?).map(Arc::new))
            .cloned()
    }

    /// Loads the library from an explicit path or file name.
    pub fn load(name: &str) -> FfiResult<Self> {
        // Safety: loading runs the library's initializers; the vendor
        // library has no initialization-order requirements.
        let library = unsafe { Library::new(name) }.map_err(|e| FfiError::LibraryUnavailable {
            library: name.to_string(),
            message: e.to_string(),
        })?;
        info!("Loaded NI System Configuration library {}", name);
        Ok(Self {
            name: name.to_string(),
            library,
            entries: EntryPoints::new(),
        })
    }

    /// Returns the name the library was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn entry<F: Copy>(&self, entry: &Entry<F>) -> FfiResult<F> {
        entry.resolve(&self.library, &self.name)
    }
}

impl std::fmt::Debug for DynamicLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLibrary")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn c_bool(value: bool) -> c_int {
    c_int::from(value)
}

fn opt_str(value: Option<&CStr>) -> *const c_char {
    value.map_or(ptr::null(), CStr::as_ptr)
}

fn out_handle(handle: &mut RawHandle) -> *mut Handle {
    handle as *mut RawHandle as *mut Handle
}

fn buffer(buffer: &mut [u8]) -> FfiResult<*mut c_char> {
    if buffer.len() < SIMPLE_STRING_LENGTH {
        return Err(FfiError::BufferTooSmall {
            required: SIMPLE_STRING_LENGTH,
            actual: buffer.len(),
        });
    }
    Ok(buffer.as_mut_ptr() as *mut c_char)
}

fn out_value(value: PropertyOut<'_>) -> FfiResult<*mut c_void> {
    Ok(match value {
        PropertyOut::Int(v) => v as *mut i32 as *mut c_void,
        PropertyOut::UInt(v) => v as *mut u32 as *mut c_void,
        PropertyOut::Double(v) => v as *mut f64 as *mut c_void,
        PropertyOut::Str(b) => buffer(b)? as *mut c_void,
        PropertyOut::Timestamp(t) => t as *mut Timestamp as *mut c_void,
        PropertyOut::Handle(h) => h as *mut RawHandle as *mut c_void,
    })
}

/// Calls a variadic setter with the argument type the property expects.
///
/// # Safety
///
/// `setter` must be one of the `NISysCfgSet*Property` entry points.
unsafe fn call_setter(
    setter: SetPropertyFn,
    handle: RawHandle,
    property: i32,
    value: PropertyIn<'_>,
) -> c_int {
    let handle = handle.as_ptr();
    match value {
        PropertyIn::Int(v) => setter(handle, property, v),
        PropertyIn::UInt(v) => setter(handle, property, v),
        PropertyIn::Double(v) => setter(handle, property, v),
        PropertyIn::Str(s) => setter(handle, property, s.as_ptr()),
        PropertyIn::Timestamp(t) => setter(handle, property, t as *const Timestamp),
    }
}

// Safety (applies to every call below): arguments are valid for the
// duration of the call, out-pointers reference live locals or
// caller-provided storage, and string buffers are length-checked.
impl NativeApi for DynamicLibrary {
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
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.initialize_session)?;
        Ok(unsafe {
            f(
                target.as_ptr(),
                opt_str(username),
                opt_str(password),
                locale,
                c_bool(force_property_refresh),
                connect_timeout_ms,
                out_handle(expert_enum),
                out_handle(session),
            )
        })
    }

    fn close_handle(&self, handle: RawHandle) -> FfiResult<i32> {
        let f = self.entry(&self.entries.close_handle)?;
        Ok(unsafe { f(handle.as_ptr()) })
    }

    fn get_status_description(
        &self,
        session: RawHandle,
        status: i32,
        description: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_status_description)?;
        Ok(unsafe { f(session.as_ptr(), status, description.as_out_ptr()) })
    }

    fn free_detailed_string(&self, text: DetailedString) -> FfiResult<i32> {
        let f = self.entry(&self.entries.free_detailed_string)?;
        Ok(unsafe { f(text.into_raw()) })
    }

    fn timestamp_from_values(
        &self,
        seconds_since_1970: u64,
        fractional_seconds: f64,
        timestamp: &mut Timestamp,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.timestamp_from_values)?;
        Ok(unsafe { f(seconds_since_1970, fractional_seconds, timestamp) })
    }

    fn values_from_timestamp(
        &self,
        timestamp: &Timestamp,
        seconds_since_1970: &mut u64,
        fractional_seconds: &mut f64,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.values_from_timestamp)?;
        Ok(unsafe { f(timestamp, seconds_since_1970, fractional_seconds) })
    }

    fn get_system_experts(
        &self,
        session: RawHandle,
        expert_names: &CStr,
        expert_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_system_experts)?;
        Ok(unsafe { f(session.as_ptr(), expert_names.as_ptr(), out_handle(expert_enum)) })
    }

    fn set_remote_timeout(&self, session: RawHandle, timeout_ms: u32) -> FfiResult<i32> {
        let f = self.entry(&self.entries.set_remote_timeout)?;
        Ok(unsafe { f(session.as_ptr(), timeout_ms) })
    }

    fn find_hardware(
        &self,
        session: RawHandle,
        filter_mode: i32,
        filter: RawHandle,
        expert_names: Option<&CStr>,
        resource_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.find_hardware)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                filter_mode,
                filter.as_ptr(),
                opt_str(expert_names),
                out_handle(resource_enum),
            )
        })
    }

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
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.find_systems)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                opt_str(device_class),
                c_bool(detect_online_systems),
                cache_mode,
                name_format,
                timeout_ms,
                c_bool(only_installable_systems),
                out_handle(system_enum),
            )
        })
    }

    fn restart(
        &self,
        session: RawHandle,
        wait_for_restart: bool,
        install_mode: bool,
        flush_dns: bool,
        timeout_ms: u32,
        new_ip_address: &mut [u8],
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.restart)?;
        let new_ip_address = buffer(new_ip_address)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                c_bool(wait_for_restart),
                c_bool(install_mode),
                c_bool(flush_dns),
                timeout_ms,
                new_ip_address,
            )
        })
    }

    fn get_installed_software_components(
        &self,
        session: RawHandle,
        item_types: i32,
        cached: bool,
        component_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_installed_software_components)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                item_types,
                c_bool(cached),
                out_handle(component_enum),
            )
        })
    }

    fn get_feeds(
        &self,
        session: RawHandle,
        platform: Option<&CStr>,
        cached: bool,
        feed_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_feeds)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                opt_str(platform),
                c_bool(cached),
                out_handle(feed_enum),
            )
        })
    }

    fn install_all(
        &self,
        session: RawHandle,
        auto_restart: bool,
        deselect_conflicts: bool,
        installed_enum: &mut RawHandle,
        broken_dependency_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.install_all)?;
        Ok(unsafe {
            f(
                session.as_ptr(),
                c_bool(auto_restart),
                c_bool(deselect_conflicts),
                out_handle(installed_enum),
                out_handle(broken_dependency_enum),
            )
        })
    }

    fn get_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_system_property)?;
        let value = out_value(value)?;
        Ok(unsafe { f(session.as_ptr(), property, value) })
    }

    fn set_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.set_system_property)?;
        Ok(unsafe { call_setter(f, session, property, value) })
    }

    fn create_filter(&self, session: RawHandle, filter: &mut RawHandle) -> FfiResult<i32> {
        let f = self.entry(&self.entries.create_filter)?;
        Ok(unsafe { f(session.as_ptr(), out_handle(filter)) })
    }

    fn set_filter_property(
        &self,
        filter: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.set_filter_property)?;
        Ok(unsafe { call_setter(f, filter, property, value) })
    }

    fn get_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_resource_property)?;
        let value = out_value(value)?;
        Ok(unsafe { f(resource.as_ptr(), property, value) })
    }

    fn set_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.set_resource_property)?;
        Ok(unsafe { call_setter(f, resource, property, value) })
    }

    fn get_resource_indexed_property(
        &self,
        resource: RawHandle,
        property: i32,
        index: u32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.get_resource_indexed_property)?;
        let value = out_value(value)?;
        Ok(unsafe { f(resource.as_ptr(), property, index, value) })
    }

    fn save_resource_changes(
        &self,
        resource: RawHandle,
        restart_required: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.save_resource_changes)?;
        let mut restart: c_int = 0;
        let status = unsafe { f(resource.as_ptr(), &mut restart, detailed_result.as_out_ptr()) };
        *restart_required = restart != 0;
        Ok(status)
    }

    fn self_test_hardware(
        &self,
        resource: RawHandle,
        mode: u32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.self_test_hardware)?;
        Ok(unsafe { f(resource.as_ptr(), mode, detailed_result.as_out_ptr()) })
    }

    fn self_calibrate_hardware(
        &self,
        resource: RawHandle,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.self_calibrate_hardware)?;
        Ok(unsafe { f(resource.as_ptr(), detailed_result.as_out_ptr()) })
    }

    fn reset_hardware(&self, resource: RawHandle, mode: u32) -> FfiResult<i32> {
        let f = self.entry(&self.entries.reset_hardware)?;
        Ok(unsafe { f(resource.as_ptr(), mode) })
    }

    fn rename_resource(
        &self,
        resource: RawHandle,
        new_name: &CStr,
        overwrite_conflict: bool,
        update_dependencies: bool,
        name_already_existed: &mut bool,
        overwritten_resource: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.rename_resource)?;
        let mut existed: c_int = 0;
        let status = unsafe {
            f(
                resource.as_ptr(),
                new_name.as_ptr(),
                c_bool(overwrite_conflict),
                c_bool(update_dependencies),
                &mut existed,
                out_handle(overwritten_resource),
            )
        };
        *name_already_existed = existed != 0;
        Ok(status)
    }

    fn delete_resource(
        &self,
        resource: RawHandle,
        mode: i32,
        dependent_items_deleted: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.delete_resource)?;
        let mut deleted: c_int = 0;
        let status = unsafe {
            f(
                resource.as_ptr(),
                mode,
                &mut deleted,
                detailed_result.as_out_ptr(),
            )
        };
        *dependent_items_deleted = deleted != 0;
        Ok(status)
    }

    fn upgrade_firmware_from_file(
        &self,
        resource: RawHandle,
        firmware_file: &CStr,
        auto_stop_tasks: bool,
        always_overwrite: bool,
        wait_for_operation: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.upgrade_firmware_from_file)?;
        Ok(unsafe {
            f(
                resource.as_ptr(),
                firmware_file.as_ptr(),
                c_bool(auto_stop_tasks),
                c_bool(always_overwrite),
                c_bool(wait_for_operation),
                firmware_status,
                detailed_result.as_out_ptr(),
            )
        })
    }

    fn erase_firmware(
        &self,
        resource: RawHandle,
        auto_stop_tasks: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.erase_firmware)?;
        Ok(unsafe {
            f(
                resource.as_ptr(),
                c_bool(auto_stop_tasks),
                firmware_status,
                detailed_result.as_out_ptr(),
            )
        })
    }

    fn next_resource(
        &self,
        session: RawHandle,
        resource_enum: RawHandle,
        resource: &mut RawHandle,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_resource)?;
        Ok(unsafe { f(session.as_ptr(), resource_enum.as_ptr(), out_handle(resource)) })
    }

    fn next_expert_info(
        &self,
        expert_enum: RawHandle,
        name: &mut [u8],
        display_name: &mut [u8],
        version: &mut [u8],
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_expert_info)?;
        let (name, display_name, version) = (buffer(name)?, buffer(display_name)?, buffer(version)?);
        Ok(unsafe { f(expert_enum.as_ptr(), name, display_name, version) })
    }

    fn next_system_info(&self, system_enum: RawHandle, system: &mut [u8]) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_system_info)?;
        let system = buffer(system)?;
        Ok(unsafe { f(system_enum.as_ptr(), system) })
    }

    fn next_component_info(
        &self,
        component_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
        item_type: &mut i32,
        detailed_description: &mut DetailedString,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_component_info)?;
        let (id, version, title) = (buffer(id)?, buffer(version)?, buffer(title)?);
        Ok(unsafe {
            f(
                component_enum.as_ptr(),
                id,
                version,
                title,
                item_type,
                detailed_description.as_out_ptr(),
            )
        })
    }

    fn next_dependency_info(
        &self,
        dependency_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_dependency_info)?;
        let (id, version, title) = (buffer(id)?, buffer(version)?, buffer(title)?);
        Ok(unsafe { f(dependency_enum.as_ptr(), id, version, title) })
    }

    fn next_feed(
        &self,
        feed_enum: RawHandle,
        name: &mut [u8],
        uri: &mut [u8],
        enabled: &mut bool,
        trusted: &mut bool,
    ) -> FfiResult<i32> {
        let f = self.entry(&self.entries.next_feed)?;
        let (name, uri) = (buffer(name)?, buffer(uri)?);
        let (mut is_enabled, mut is_trusted): (c_int, c_int) = (0, 0);
        let status = unsafe { f(feed_enum.as_ptr(), name, uri, &mut is_enabled, &mut is_trusted) };
        *enabled = is_enabled != 0;
        *trusted = is_trusted != 0;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_name_for_platform() {
        let name = library_name();
        if cfg!(windows) {
            assert_eq!(name.unwrap(), "nisyscfg.dll");
        } else if cfg!(target_os = "linux") {
            assert_eq!(name.unwrap(), "libnisyscfg.so");
        } else {
            assert!(matches!(name, Err(FfiError::PlatformUnsupported { .. })));
        }
    }

    #[test]
    fn test_missing_library_is_reported() {
        let err = DynamicLibrary::load("libnisyscfg-does-not-exist.so").unwrap_err();
        assert!(err.is_library_unavailable());
        assert!(err.to_string().contains("libnisyscfg-does-not-exist.so"));
    }

    #[test]
    fn test_short_buffer_rejected() {
        let mut short = [0u8; 8];
        let err = buffer(&mut short).unwrap_err();
        assert_eq!(
            err,
            FfiError::BufferTooSmall {
                required: SIMPLE_STRING_LENGTH,
                actual: 8
            }
        );
    }
}
