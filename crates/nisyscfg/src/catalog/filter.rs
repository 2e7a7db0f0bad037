//! Search criteria for `find_hardware`.
//!
//! Filter properties share their IDs with the resource properties they
//! match and can only be written.

use crate::catalog::enums::{BusType, HasDriverType, IsPresentType, ServiceType};

property_bag! {
    pub bag FilterBag("Filter"), attributes FilterAttributes {
        IS_DEVICE: bool = 16781312, WriteOnly set set_is_device;
        IS_CHASSIS: bool = 16941056, WriteOnly set set_is_chassis;
        SERVICE_TYPE: ServiceType = 17014784, WriteOnly set set_service_type;
        CONNECTS_TO_BUS_TYPE: BusType = 16785408, WriteOnly set set_connects_to_bus_type;
        CONNECTS_TO_LINK_NAME: String = 16789504, WriteOnly set set_connects_to_link_name;
        VENDOR_ID: u32 = 16805888, WriteOnly set set_vendor_id;
        PRODUCT_ID: u32 = 16809984, WriteOnly set set_product_id;
        SERIAL_NUMBER: String = 16814080, WriteOnly set set_serial_number;
        IS_NI_PRODUCT: bool = 16818176, WriteOnly set set_is_ni_product;
        IS_SIMULATED: bool = 16822272, WriteOnly set set_is_simulated;
        HAS_DRIVER: HasDriverType = 16842752, WriteOnly set set_has_driver;
        IS_PRESENT: IsPresentType = 16846848, WriteOnly set set_is_present;
        SLOT_NUMBER: i32 = 16850944, WriteOnly set set_slot_number;
        SUPPORTS_CALIBRATION: bool = 16863232, WriteOnly set set_supports_calibration;
        SUPPORTS_FIRMWARE_UPDATE: bool = 16912384, WriteOnly set set_supports_firmware_update;
        EXPERT_NAME: String = 16900096, WriteOnly set set_expert_name;
        RESOURCE_NAME: String = 16904192, WriteOnly set set_resource_name;
        USER_ALIAS: String = 16916480, WriteOnly set set_user_alias;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceBag;
    use crate::property::{Access, PropertyBag};

    #[test]
    fn test_every_filter_property_is_write_only() {
        assert!(FilterBag::catalog()
            .iter()
            .all(|d| d.access == Access::WriteOnly));
    }

    #[test]
    fn test_filter_ids_match_resource_ids() {
        assert_eq!(FilterBag::IS_NI_PRODUCT.id, ResourceBag::IS_NI_PRODUCT.id);
        assert_eq!(FilterBag::VENDOR_ID.id, ResourceBag::VENDOR_ID.id);
        assert_eq!(FilterBag::SERIAL_NUMBER.id, ResourceBag::SERIAL_NUMBER.id);
    }
}
