//! PXI chassis expert properties.

use crate::catalog::enums::PxiFanMode;
use crate::property::FlagSet;

property_bag! {
    pub bag PxiResourceBag("PXI"), attributes PxiAttributes {
        CHASSIS_NUMBER: u32 = 268476416, ReadOnly get chassis_number;
        CHASSIS_ID: String = 268480512, ReadOnly get chassis_id;
        CONTROLLER_NAME: String = 268484608, ReadOnly get controller_name;
        CLOCK_10_SOURCE: String = 268488704, ReadOnly get clock_10_source;
        FAN_AVAILABLE_MODES: FlagSet<PxiFanMode> = 268492800, ReadOnly get fan_available_modes;
        FAN_MODE: PxiFanMode = 268496896, ReadWrite get fan_mode set set_fan_mode;
        FAN_USER_REQUESTED_SPEED: i32 = 268500992, ReadWrite
            get fan_user_requested_speed set set_fan_user_requested_speed;
        POWER_SUPPLY_BAY_COUNT: i32 = 268505088, ReadOnly get power_supply_bay_count;
        SLOT_COUNT: i32 = 268509184, ReadOnly get slot_count;
    }
}
