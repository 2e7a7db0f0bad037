//! Properties of the target system, read and written through the session.

use chrono::{DateTime, Utc};

use crate::catalog::enums::AdapterMode;
use crate::property::{FlagSet, PropertyId};

/// System property holding a resource handle for the system itself.
pub const SYSTEM_RESOURCE_HANDLE: PropertyId = 16941058;

property_bag! {
    pub bag SystemBag("System"), attributes SystemAttributes {
        DEVICE_CLASS: String = 16941057, ReadOnly get device_class;
        PRODUCT_ID: i32 = 16941059, ReadOnly get product_id;
        PRODUCT_NAME: String = 16941060, ReadOnly get product_name;
        SERIAL_NUMBER: String = 16941061, ReadOnly get serial_number;
        IS_LOCKED: bool = 16941062, ReadOnly get is_locked;
        IS_LOCKED_DOWN: bool = 16941063, ReadOnly get is_locked_down;
        IS_RESTART_PROTECTED: bool = 16941064, ReadOnly get is_restart_protected;
        HOSTNAME: String = 16941065, ReadWrite get hostname set set_hostname;
        IP_ADDRESS: String = 16941066, ReadWrite get ip_address set set_ip_address;
        MAC_ADDRESS: String = 16941067, ReadOnly get mac_address;
        DNS_SERVER: String = 16941068, ReadWrite get dns_server set set_dns_server;
        SYSTEM_COMMENT: String = 16941069, ReadWrite get system_comment set set_system_comment;
        OPERATING_SYSTEM: String = 16941070, ReadOnly get operating_system;
        OS_VERSION: String = 16941071, ReadOnly get os_version;
        FIRMWARE_REVISION: String = 16941072, ReadOnly get firmware_revision;
        CURRENT_TIME: DateTime<Utc> = 16941073, ReadWrite get current_time set set_current_time;
        TIME_ZONE: String = 16941074, ReadWrite get time_zone set set_time_zone;
        IS_DST: bool = 16941075, ReadOnly get is_dst;
        PHYSICAL_MEMORY: f64 = 16941076, ReadOnly get physical_memory;
        FREE_PHYSICAL_MEMORY: f64 = 16941077, ReadOnly get free_physical_memory;
        PRIMARY_DISK_TOTAL: f64 = 16941078, ReadOnly get primary_disk_total;
        PRIMARY_DISK_FREE: f64 = 16941079, ReadOnly get primary_disk_free;
        SYSTEM_STATE: String = 16941080, ReadOnly get system_state;
        SUPPORTED_ADAPTER_MODES: FlagSet<AdapterMode> = 16941081, ReadOnly
            get supported_adapter_modes;
        HALT_ON_ERROR: bool = 16941082, ReadWrite get halt_on_error set set_halt_on_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Access, PropertyBag, ValueKind};

    #[test]
    fn test_current_time_is_writable_timestamp() {
        let d = SystemBag::find("CurrentTime").unwrap();
        assert!(matches!(d.kind, ValueKind::Timestamp));
        assert_eq!(d.access, Access::ReadWrite);
    }

    #[test]
    fn test_handle_property_is_not_in_catalog() {
        assert!(SystemBag::catalog()
            .iter()
            .all(|d| d.id != SYSTEM_RESOURCE_HANDLE));
    }
}
