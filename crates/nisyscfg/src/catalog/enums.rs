//! Symbolic enums of the native API.

symbolic_enum! {
    /// Language used for descriptions returned by the library.
    pub enum Locale {
        Default = 0,
        ChineseSimplified = 2052,
        English = 1033,
        French = 1036,
        German = 1031,
        Japanese = 1041,
        Korean = 1042,
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Default
    }
}

symbolic_enum! {
    /// How a filter's properties are matched against resources.
    pub enum FilterMode {
        MatchValuesAll = 1,
        MatchValuesAny = 2,
        MatchValuesNone = 3,
        AllPropertiesExist = 4,
    }
}

impl Default for FilterMode {
    fn default() -> Self {
        FilterMode::MatchValuesAll
    }
}

symbolic_enum! {
    pub enum BusType {
        BuiltIn = 0,
        PciPxi = 1,
        Usb = 2,
        Gpib = 3,
        Vxi = 4,
        Serial = 5,
        Tcpip = 6,
        CompactRio = 7,
        Scxi = 8,
        CompactDaq = 9,
        SwitchExecutive = 10,
        Can = 11,
        Simulated = 12,
    }
}

symbolic_enum! {
    pub enum HasDriverType {
        Unknown = -1,
        NotInstalled = 0,
        Installed = 1,
    }
}

symbolic_enum! {
    pub enum IsPresentType {
        Initializing = -2,
        Removed = -1,
        NotPresent = 0,
        Present = 1,
    }
}

symbolic_enum! {
    /// How a networked resource was discovered.
    pub enum ServiceType {
        MdnsNiRpc = 0,
        MdnsLxi = 1,
        MdnsVxi11 = 2,
        MdnsHislip = 3,
        NiServiceLocator = 4,
    }
}

symbolic_enum! {
    /// Whether `find_systems` reports systems from the offline cache.
    pub enum IncludeCachedResults {
        None = 0,
        OnlyIfOnline = 1,
        All = 2,
    }
}

impl Default for IncludeCachedResults {
    fn default() -> Self {
        IncludeCachedResults::None
    }
}

symbolic_enum! {
    pub enum SystemNameFormat {
        Hostname = 0,
        HostnameIp = 1,
        HostnameMac = 2,
        Ip = 3,
        IpHostname = 4,
        IpMac = 5,
        Mac = 6,
        MacHostname = 7,
        MacIp = 8,
    }
}

impl Default for SystemNameFormat {
    fn default() -> Self {
        SystemNameFormat::Hostname
    }
}

symbolic_enum! {
    pub enum DeleteValidationMode {
        ValidateButDoNotDelete = -1,
        DeleteIfNoDependenciesExist = 0,
        DeleteItemAndAnyDependencies = 1,
        DeleteItemButKeepDependencies = 2,
    }
}

symbolic_enum! {
    /// Kind of an installed software component.
    pub enum ComponentType {
        Standard = 0,
        Hidden = 1,
        System = 2,
        Unknown = 3,
        Startup = 4,
    }
}

symbolic_enum! {
    /// Which component kinds `installed_components` reports.
    pub enum IncludeComponentTypes {
        All = 0,
        AllVisible = 1,
        AllVisibleAndHidden = 2,
        OnlyStandard = 3,
        OnlyStartup = 4,
    }
}

impl Default for IncludeComponentTypes {
    fn default() -> Self {
        IncludeComponentTypes::AllVisible
    }
}

symbolic_enum! {
    pub enum FirmwareStatus {
        Invalid = -1,
        Ready = 0,
        NotApplicable = 1,
        Updating = 2,
        ReadyPendingUserRestart = 3,
        ReadyPendingAutoRestart = 4,
        Failed = 5,
    }
}

symbolic_enum! {
    pub enum PxiFanMode {
        Auto = 1,
        Safe = 2,
        High = 4,
    }
}

symbolic_enum! {
    pub enum XnetProtocol {
        Unknown = 0,
        Can = 1,
        Flexray = 2,
        Lin = 3,
        Ethernet = 4,
    }
}

symbolic_enum! {
    /// Network adapter modes. Also used as flags for the set of modes an
    /// adapter supports.
    pub enum AdapterMode {
        Disabled = 1,
        TcpIpEthernet = 2,
        Deterministic = 4,
        EtherCat = 8,
        TcpIpWireless = 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{FlagSet, PropertyValue, RawValue, Symbolic};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_enum_round_trips() {
        fn check<E: Symbolic + PartialEq + std::fmt::Debug>() {
            for variant in E::ALL {
                assert_eq!(E::decode(variant.raw()).unwrap(), *variant);
                assert_eq!(E::table().value_of(variant.name()), Some(variant.raw()));
            }
        }
        check::<Locale>();
        check::<FilterMode>();
        check::<BusType>();
        check::<HasDriverType>();
        check::<IsPresentType>();
        check::<ServiceType>();
        check::<IncludeCachedResults>();
        check::<SystemNameFormat>();
        check::<DeleteValidationMode>();
        check::<ComponentType>();
        check::<IncludeComponentTypes>();
        check::<FirmwareStatus>();
        check::<PxiFanMode>();
        check::<XnetProtocol>();
        check::<AdapterMode>();
    }

    #[test]
    fn test_enum_property_value() {
        assert_eq!(BusType::Usb.into_raw(), RawValue::Int(2));
        assert_eq!(
            BusType::from_raw(RawValue::Int(6), "CONNECTS_TO_BUS_TYPE").unwrap(),
            BusType::Tcpip
        );
        assert!(BusType::from_raw(RawValue::Int(77), "CONNECTS_TO_BUS_TYPE").is_err());
    }

    #[test]
    fn test_adapter_modes_as_flags() {
        let modes = FlagSet::<AdapterMode>::from_bits(2 | 8 | 32);
        assert_eq!(
            modes.names(),
            vec!["TcpIpEthernet", "EtherCat", "TcpIpWireless"]
        );
        assert!(!modes.contains(AdapterMode::Disabled));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(FilterMode::MatchValuesNone.to_string(), "MatchValuesNone");
        let json = serde_json::to_string(&Locale::German).unwrap();
        assert_eq!(json, "\"German\"");
        let locale: Locale = serde_json::from_str("\"Korean\"").unwrap();
        assert_eq!(locale, Locale::Korean);
    }
}
