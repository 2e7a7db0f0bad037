//! Core properties of hardware resources.

use chrono::{DateTime, Utc};

use crate::catalog::enums::{AdapterMode, BusType, HasDriverType, IsPresentType, ServiceType};
use crate::property::FlagSet;

property_bag! {
    /// Properties every hardware resource may implement.
    pub bag ResourceBag("Resource"), attributes ResourceAttributes {
        IS_DEVICE: bool = 16781312, ReadOnly get is_device;
        IS_CHASSIS: bool = 16941056, ReadOnly get is_chassis;
        CONNECTS_TO_BUS_TYPE: BusType = 16785408, ReadOnly get connects_to_bus_type;
        CONNECTS_TO_LINK_NAME: String = 16789504, ReadOnly get connects_to_link_name;
        SERVICE_TYPE: ServiceType = 17014784, ReadOnly get service_type;
        VENDOR_ID: u32 = 16805888, ReadOnly get vendor_id;
        VENDOR_NAME: String = 16797696, ReadOnly get vendor_name;
        PRODUCT_ID: u32 = 16809984, ReadOnly get product_id;
        PRODUCT_NAME: String = 16801792, ReadOnly get product_name;
        SERIAL_NUMBER: String = 16814080, ReadOnly get serial_number;
        FIRMWARE_REVISION: String = 16908288, ReadOnly get firmware_revision;
        IS_NI_PRODUCT: bool = 16818176, ReadOnly get is_ni_product;
        IS_SIMULATED: bool = 16822272, ReadOnly get is_simulated;
        HAS_DRIVER: HasDriverType = 16842752, ReadOnly get has_driver;
        IS_PRESENT: IsPresentType = 16846848, ReadOnly get is_present;
        SLOT_NUMBER: i32 = 16850944, ReadOnly get slot_number;
        SUPPORTS_INTERNAL_CALIBRATION: bool = 16867328, ReadOnly get supports_internal_calibration;
        INTERNAL_CALIBRATION_LAST_TIME: DateTime<Utc> = 16871424, ReadOnly
            get internal_calibration_last_time;
        INTERNAL_CALIBRATION_LAST_TEMP: f64 = 16875520, ReadOnly get internal_calibration_last_temp;
        EXTERNAL_CALIBRATION_LAST_TIME: DateTime<Utc> = 16883712, ReadOnly
            get external_calibration_last_time;
        RECOMMENDED_NEXT_CALIBRATION_TIME: DateTime<Utc> = 16887808, ReadOnly
            get recommended_next_calibration_time;
        CALIBRATION_COMMENTS: String = 16928768, ReadWrite
            get calibration_comments set set_calibration_comments;
        SUPPORTS_FIRMWARE_UPDATE: bool = 16912384, ReadOnly get supports_firmware_update;
        CURRENT_TEMP: f64 = 16965632, ReadOnly get current_temp;
        NUMBER_OF_EXPERTS: i32 = 16920576, ReadOnly get number_of_experts;
        PRIMARY_MAC_ADDRESS: String = 219299840, ReadOnly get primary_mac_address;
        ADAPTER_MODE: AdapterMode = 219222016, ReadWrite get adapter_mode set set_adapter_mode;
        SUPPORTED_ADAPTER_MODES: FlagSet<AdapterMode> = 219226112, ReadOnly
            get supported_adapter_modes;
        TCP_HOSTNAME: String = 219230208, ReadWrite get tcp_hostname set set_tcp_hostname;
        TCP_IP_ADDRESS: String = 219242496, ReadWrite get tcp_ip_address set set_tcp_ip_address;
        TCP_SUBNET_MASK: String = 219246592, ReadWrite get tcp_subnet_mask set set_tcp_subnet_mask;
        TCP_GATEWAY: String = 219250688, ReadWrite get tcp_gateway set set_tcp_gateway;
    }
}
