//! Indexed properties of hardware resources.
//!
//! Properties with a count property are read up to that count; the rest
//! are probed index by index until the first missing value.

indexed_property_bag! {
    pub bag IndexedResourceBag("IndexedResource"), attributes IndexedResourceAttributes {
        /// Expert programmatic names, one per expert that owns the resource.
        EXPERT_NAME: String = 16900096,
            counted by NUMBER_OF_EXPERTS = 16920576,
            get expert_name, all expert_names;
        EXPERT_RESOURCE_NAME: String = 16904192,
            counted by NUMBER_OF_EXPERTS = 16920576,
            get expert_resource_name, all expert_resource_names;
        EXPERT_USER_ALIAS: String = 16916480,
            counted by NUMBER_OF_EXPERTS = 16920576,
            get expert_user_alias, all expert_user_aliases;
        SERVICE_TYPE_NAMES: String = 17018880,
            get service_type_name, all service_type_names;
        /// SSIDs seen by a wireless adapter.
        WLAN_AVAILABLE_SSID: String = 219365376,
            counted by WLAN_AVAILABLE_COUNT = 219361280,
            get wlan_available_ssid, all wlan_available_ssids;
        WLAN_AVAILABLE_BSSID: String = 219369472,
            counted by WLAN_AVAILABLE_COUNT = 219361280,
            get wlan_available_bssid, all wlan_available_bssids;
        WLAN_AVAILABLE_SIGNAL_STRENGTH: i32 = 219377664,
            counted by WLAN_AVAILABLE_COUNT = 219361280,
            get wlan_available_signal_strength, all wlan_available_signal_strengths;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ResourceBag;
    use crate::property::{PropertyBag, Shape};

    #[test]
    fn test_expert_count_is_the_resource_count_property() {
        let Shape::Indexed { count: Some(count) } = IndexedResourceBag::EXPERT_NAME.into_descriptor().shape
        else {
            panic!("EXPERT_NAME must be counted");
        };
        assert_eq!(count.id, ResourceBag::NUMBER_OF_EXPERTS.id);
        assert_eq!(count.name, "NUMBER_OF_EXPERTS");
    }

    #[test]
    fn test_uncounted_property() {
        let d = IndexedResourceBag::find("service_type_names").unwrap();
        assert_eq!(d.shape, Shape::Indexed { count: None });
        assert!(d.is_indexed());
    }
}
