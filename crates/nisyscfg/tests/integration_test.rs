//! Integration tests for sessions, resources and enumerators.
//!
//! These tests drive the safe layer end to end against the in-memory
//! implementation of the native API.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use nisyscfg::catalog::system::SYSTEM_RESOURCE_HANDLE;
use nisyscfg::prelude::*;
use nisyscfg::property::Symbolic;
use nisyscfg::{ExpertInfo, NativeApi};
use nisyscfg_sys::mock::{MockComponent, MockDependency, MockFeed, MockNative, MockResource, MockValue};
use nisyscfg_sys::status;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn connect(mock: &Arc<MockNative>) -> Session {
    init_logging();
    Session::with_api(Arc::clone(mock) as Arc<dyn NativeApi>, &SessionConfig::default()).unwrap()
}

fn ni_device(name: &str, serial: &str) -> MockResource {
    MockResource::new(name)
        .with(ResourceBag::VENDOR_ID.id, MockValue::UInt(0x1093))
        .with(ResourceBag::IS_NI_PRODUCT.id, MockValue::Int(1))
        .with(ResourceBag::PRODUCT_NAME.id, MockValue::text("PXIe-6363"))
        .with(ResourceBag::SERIAL_NUMBER.id, MockValue::text(serial))
}

fn other_device(name: &str) -> MockResource {
    MockResource::new(name)
        .with(ResourceBag::VENDOR_ID.id, MockValue::UInt(0x2020))
        .with(ResourceBag::IS_NI_PRODUCT.id, MockValue::Int(0))
}

// ===== Session =====

#[test]
fn test_connect_reports_experts_and_closes_their_enumeration() {
    let mock = Arc::new(MockNative::new());
    mock.add_expert("pxi", "PXI Platform Services", "24.0");
    mock.add_expert("xnet", "NI-XNET", "23.5");

    let config = SessionConfig::new("pxi-rack-1")
        .with_credentials("admin", "")
        .with_locale(Locale::English)
        .with_connect_timeout_ms(5_000);
    let session = Session::with_api(Arc::clone(&mock) as Arc<dyn NativeApi>, &config).unwrap();

    let names: Vec<&str> = session.experts().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["pxi", "xnet"]);
    assert_eq!(session.target(), "pxi-rack-1");
    // Session plus nothing else: the expert enumeration is already closed.
    assert_eq!(session.open_handles(), 1);
    assert_eq!(mock.open_handles(), 1);

    let record = mock.last_session().unwrap();
    assert_eq!(record.target, "pxi-rack-1");
    assert_eq!(record.username.as_deref(), Some("admin"));
    assert_eq!(record.locale, 1033);
    assert_eq!(record.connect_timeout_ms, 5_000);
}

#[test]
fn test_connect_failure_carries_description() {
    let mock = Arc::new(MockNative::new());
    mock.fail("initialize_session", status::TIMED_OUT);

    let err = Session::with_api(Arc::clone(&mock) as Arc<dyn NativeApi>, &SessionConfig::default())
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(status::TIMED_OUT));
    // No session handle, so the description is not looked up.
    assert_eq!(mock.count("get_status_description"), 0);
    assert_eq!(mock.open_handles(), 0);
}

#[test]
fn test_close_order_is_reverse_creation() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.add_resource(ni_device("PXI1Slot3", "02"));
    let session = connect(&mock);

    let filter = session.create_filter().unwrap();
    let mut resources = session
        .find_hardware(Some(&filter), FilterMode::MatchValuesAll, &[])
        .unwrap();
    let r1 = resources.next().unwrap().unwrap();
    let r2 = resources.next().unwrap().unwrap();

    let f = filter.handle().unwrap().as_raw();
    let e = mock
        .calls()
        .iter()
        .rev()
        .find(|(name, _)| *name == "next_resource")
        .map(|(_, handle)| *handle)
        .unwrap();
    let (h1, h2) = (r1.handle().unwrap().as_raw(), r2.handle().unwrap().as_raw());
    let s = session.handle().unwrap().as_raw();

    mock.clear_calls();
    session.close().unwrap();
    assert_eq!(mock.closed(), vec![h2, h1, e, f, s]);
    assert_eq!(mock.open_handles(), 0);

    assert!(r1.is_closed());
    assert!(matches!(r1.handle(), Err(SysCfgError::Closed { .. })));
    assert!(matches!(
        r2.vendor_id(),
        Err(SysCfgError::Closed { .. })
    ));
    assert!(matches!(
        session.create_filter(),
        Err(SysCfgError::Closed { .. })
    ));
}

#[test]
fn test_close_is_idempotent() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    resource.close().unwrap();
    resource.close().unwrap();
    session.close().unwrap();
    let closes = mock.count("close_handle");
    session.close().unwrap();
    drop(resource);
    drop(session);
    assert_eq!(mock.count("close_handle"), closes);
}

#[test]
fn test_failed_close_still_releases_everything() {
    let mock = Arc::new(MockNative::new());
    let session = connect(&mock);
    let _filter = session.create_filter().unwrap();
    let _second = session.create_filter().unwrap();

    mock.clear_calls();
    mock.fail_once("close_handle", status::FAIL);
    let err = session.close().unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(status::FAIL));
    assert_eq!(mock.count("close_handle"), 3);
    assert_eq!(session.open_handles(), 0);

    session.close().unwrap();
    assert_eq!(mock.count("close_handle"), 3);
}

#[test]
fn test_dropping_session_closes_handles() {
    let mock = Arc::new(MockNative::new());
    {
        let session = connect(&mock);
        let _filter = session.create_filter().unwrap();
        assert_eq!(mock.open_handles(), 2);
    }
    assert_eq!(mock.open_handles(), 0);
}

#[test]
fn test_remote_timeout_and_restart() {
    let mock = Arc::new(MockNative::new());
    mock.set_restart_ip("10.0.0.7");
    let session = connect(&mock);

    session.set_remote_timeout(2_500).unwrap();
    assert_eq!(mock.remote_timeout_ms(), Some(2_500));
    let ip = session.restart(&RestartOptions::default()).unwrap();
    assert_eq!(ip, "10.0.0.7");
}

#[test]
fn test_status_description() {
    let mock = Arc::new(MockNative::new());
    mock.describe(status::RESOURCE_IN_USE, "The resource is in use.");
    let session = connect(&mock);

    let text = session
        .status_description(Status::from_raw(status::RESOURCE_IN_USE))
        .unwrap();
    assert_eq!(text, "The resource is in use.");
    assert_eq!(mock.outstanding_strings(), 0);
}

#[test]
fn test_error_description_comes_from_library() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.describe(status::RESOURCE_NOT_PRESENT, "The device was removed.");
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    mock.fail_once("reset_hardware", status::RESOURCE_NOT_PRESENT);
    let err = resource.reset(0).unwrap_err();
    assert_eq!(err.description(), Some("The device was removed."));
    assert_eq!(mock.outstanding_strings(), 0);
}

// ===== Find hardware =====

#[test]
fn test_filter_by_ni_product() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01ABCDEF"));
    mock.add_resource(other_device("COM1"));
    let session = connect(&mock);

    let filter = session.create_filter().unwrap();
    filter.set_is_ni_product(true).unwrap();
    let found: Vec<HardwareResource> = session
        .find_hardware(Some(&filter), FilterMode::MatchValuesAll, &[])
        .unwrap()
        .collect::<SysCfgResult<_>>()
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vendor_id().unwrap(), 0x1093);
    assert_eq!(found[0].product_name().unwrap(), "PXIe-6363");
    assert_eq!(found[0].serial_number().unwrap(), "01ABCDEF");
    assert!(found[0].is_ni_product().unwrap());
}

#[test]
fn test_filter_mode_and_experts_are_passed() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.add_resource(other_device("COM1"));
    let session = connect(&mock);

    let filter = session.create_filter().unwrap();
    filter.set(FilterBag::VENDOR_ID, 0x1093).unwrap();
    let found = session
        .find_hardware(Some(&filter), FilterMode::MatchValuesNone, &["pxi", "xnet"])
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].vendor_id().unwrap(), 0x2020);
    assert_eq!(mock.last_find(), Some((3, Some("pxi,xnet".to_string()))));
}

#[test]
fn test_filter_properties_are_write_only() {
    let mock = Arc::new(MockNative::new());
    let session = connect(&mock);
    let filter = session.create_filter().unwrap();

    assert!(matches!(
        filter.get(FilterBag::IS_NI_PRODUCT),
        Err(SysCfgError::WriteOnly { .. })
    ));
    assert_eq!(mock.count("set_filter_property"), 0);
    filter
        .set_value("IsNiProduct", Value::Bool(true))
        .unwrap();
    filter.xnet().set_protocol(XnetProtocol::Can).unwrap();
    assert_eq!(mock.count("set_filter_property"), 2);
}

// ===== Enumerators =====

#[test]
fn test_enumerator_stops_calling_after_end() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.add_resource(ni_device("PXI1Slot3", "02"));
    let session = connect(&mock);

    let mut resources = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap();
    assert!(resources.next().is_some());
    assert!(resources.next().is_some());
    assert!(resources.next().is_none());
    assert_eq!(mock.count("next_resource"), 3);

    assert!(resources.next().is_none());
    assert!(resources.try_next().unwrap().is_none());
    assert_eq!(mock.count("next_resource"), 3);
}

#[test]
fn test_exhausted_enumerator_reports_session_close() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);

    let mut exhausted = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap();
    assert_eq!(exhausted.to_vec().unwrap().len(), 1);
    assert!(exhausted.is_exhausted());
    let mut open = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap();

    session.close().unwrap();
    assert!(matches!(open.next(), Some(Err(SysCfgError::Closed { .. }))));
    assert!(matches!(
        exhausted.next(),
        Some(Err(SysCfgError::Closed { .. }))
    ));
    assert!(matches!(
        exhausted.try_next(),
        Err(SysCfgError::Closed { .. })
    ));
    assert!(!exhausted.is_exhausted());
}

#[test]
fn test_failed_next_keeps_enumerator_open() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);
    let mut resources = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap();

    mock.fail_once("next_resource", status::FAIL);
    let err = resources.try_next().unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(status::FAIL));
    assert!(!resources.is_exhausted());

    let resource = resources.try_next().unwrap().unwrap();
    assert_eq!(resource.serial_number().unwrap(), "01");
    assert!(resources.try_next().unwrap().is_none());
    assert!(resources.is_exhausted());
    assert_eq!(mock.count("next_resource"), 3);
}

#[test]
fn test_resources_outlive_their_enumerator() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);

    let mut resources = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap();
    let resource = resources.next().unwrap().unwrap();
    resources.close().unwrap();
    assert!(matches!(
        resources.next(),
        Some(Err(SysCfgError::Closed { .. }))
    ));
    assert_eq!(resource.vendor_id().unwrap(), 0x1093);
}

#[test]
fn test_system_listings() {
    let mock = Arc::new(MockNative::new());
    mock.add_system("crio-9045");
    mock.add_system("pxi-8880");
    mock.add_expert("pxi", "PXI Platform Services", "24.0");
    mock.add_expert("xnet", "NI-XNET", "23.5");
    mock.add_feed(MockFeed {
        name: "ni-main".to_string(),
        uri: "https://download.ni.com/feeds/main".to_string(),
        enabled: true,
        trusted: true,
    });
    let session = connect(&mock);

    let systems = session
        .find_systems(&SystemQuery::default())
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(systems, vec!["crio-9045", "pxi-8880"]);

    let experts = session.get_system_experts(&["xnet"]).unwrap().to_vec().unwrap();
    assert_eq!(
        experts,
        vec![ExpertInfo {
            name: "xnet".to_string(),
            display_name: "NI-XNET".to_string(),
            version: "23.5".to_string(),
        }]
    );

    let feeds = session.feeds(None, false).unwrap().to_vec().unwrap();
    assert_eq!(feeds.len(), 1);
    assert_eq!(feeds[0].name, "ni-main");
    assert!(feeds[0].trusted);
}

#[test]
fn test_install_all_reports_components_and_broken_dependencies() {
    let mock = Arc::new(MockNative::new());
    mock.add_component(MockComponent {
        id: "ni-daqmx".to_string(),
        version: "24.0".to_string(),
        title: "NI-DAQmx".to_string(),
        item_type: 0,
        detail: "Data acquisition driver".to_string(),
    });
    mock.add_broken_dependency(MockDependency {
        id: "ni-visa".to_string(),
        version: "24.0".to_string(),
        title: "NI-VISA".to_string(),
    });
    let session = connect(&mock);

    let mut outcome = session.install_all(false, true).unwrap();
    let installed = outcome.installed.to_vec().unwrap();
    let broken = outcome.broken_dependencies.to_vec().unwrap();
    assert_eq!(installed.len(), 1);
    assert_eq!(installed[0].title, "NI-DAQmx");
    assert_eq!(installed[0].item_type, ComponentType::Standard);
    assert_eq!(broken[0].id, "ni-visa");
    assert_eq!(mock.outstanding_strings(), 0);

    let components = session
        .installed_components(ComponentQuery::default())
        .unwrap()
        .to_vec()
        .unwrap();
    assert_eq!(components[0].description, "Data acquisition driver");
}

// ===== Properties =====

#[test]
fn test_count_falls_back_to_probing() {
    let mock = Arc::new(MockNative::new());
    let names = ["PXI1Slot2", "Dev1", "Alias"]
        .iter()
        .map(|n| MockValue::text(n))
        .collect();
    mock.add_resource(ni_device("PXI1Slot2", "01").with_indexed(
        IndexedResourceBag::EXPERT_RESOURCE_NAME.id,
        names,
    ));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    // NUMBER_OF_EXPERTS is not implemented by this resource.
    assert_eq!(resource.count(IndexedResourceBag::EXPERT_RESOURCE_NAME).unwrap(), 3);
    assert_eq!(mock.count("get_resource_indexed_property"), 4);
    assert_eq!(resource.count(IndexedResourceBag::EXPERT_RESOURCE_NAME).unwrap(), 3);
    assert_eq!(mock.count("get_resource_indexed_property"), 4);

    assert_eq!(
        resource.expert_resource_names().unwrap(),
        vec!["PXI1Slot2", "Dev1", "Alias"]
    );
    assert!(matches!(
        resource.expert_resource_name(3),
        Err(SysCfgError::IndexExhausted { index: 3, .. })
    ));
}

#[test]
fn test_count_prefers_count_property() {
    let mock = Arc::new(MockNative::new());
    let names = ["pxi", "daqmx", "xnet"].iter().map(|n| MockValue::text(n)).collect();
    mock.add_resource(
        ni_device("PXI1Slot2", "01")
            .with(ResourceBag::NUMBER_OF_EXPERTS.id, MockValue::Int(2))
            .with_indexed(IndexedResourceBag::EXPERT_NAME.id, names),
    );
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(resource.count(IndexedResourceBag::EXPERT_NAME).unwrap(), 2);
    assert_eq!(mock.count("get_resource_indexed_property"), 0);
    assert_eq!(resource.expert_names().unwrap(), vec!["pxi", "daqmx"]);
}

#[test]
fn test_index_beyond_limit_is_rejected_locally() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert!(matches!(
        resource.expert_name(4096),
        Err(SysCfgError::IndexOutOfRange { limit: 4096, .. })
    ));
    assert_eq!(mock.count("get_resource_indexed_property"), 0);
}

#[test]
fn test_get_or_defaults_only_when_not_implemented() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(resource.get_or(ResourceBag::SLOT_NUMBER, -1).unwrap(), -1);
    assert_eq!(resource.get_or(ResourceBag::VENDOR_ID, 0).unwrap(), 0x1093);

    mock.fail_once("get_resource_property", status::RESOURCE_NOT_PRESENT);
    let err = resource.get_or(ResourceBag::SLOT_NUMBER, -1).unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(status::RESOURCE_NOT_PRESENT));
}

#[test]
fn test_read_only_property_is_rejected_locally() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert!(matches!(
        resource.set_value("VendorId", Value::UnsignedInt(1)),
        Err(SysCfgError::ReadOnly { .. })
    ));
    assert!(matches!(
        resource.get_value("NoSuchThing"),
        Err(SysCfgError::UnknownProperty { .. })
    ));
    assert_eq!(mock.count("set_resource_property"), 0);
}

#[test]
fn test_enum_and_flag_properties() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(
        ni_device("eth0", "01")
            .with(ResourceBag::ADAPTER_MODE.id, MockValue::Int(2))
            .with(ResourceBag::SUPPORTED_ADAPTER_MODES.id, MockValue::Int(2 | 4 | 32)),
    );
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(resource.adapter_mode().unwrap(), AdapterMode::TcpIpEthernet);
    let modes = resource.supported_adapter_modes().unwrap();
    assert_eq!(
        modes.flags(),
        vec![
            AdapterMode::TcpIpEthernet,
            AdapterMode::Deterministic,
            AdapterMode::TcpIpWireless
        ]
    );

    resource.set_adapter_mode(AdapterMode::EtherCat).unwrap();
    resource
        .set_value("ADAPTER_MODE", Value::String("Disabled".to_string()))
        .unwrap();
    assert_eq!(
        resource.get_value("AdapterMode").unwrap(),
        Value::Enum {
            raw: 1,
            symbol: Some("Disabled"),
        }
    );
    assert_eq!(
        resource.get_value("SupportedAdapterModes").unwrap(),
        Value::Flags {
            raw: 38,
            symbols: vec!["TcpIpEthernet", "Deterministic", "TcpIpWireless"],
        }
    );
}

#[test]
fn test_expert_views() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(
        MockResource::new("PXIChassis1")
            .with(PxiResourceBag::CHASSIS_NUMBER.id, MockValue::UInt(1))
            .with(PxiResourceBag::FAN_MODE.id, MockValue::Int(1)),
    );
    let session = connect(&mock);
    let chassis = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(chassis.pxi().chassis_number().unwrap(), 1);
    assert_eq!(chassis.pxi().fan_mode().unwrap(), PxiFanMode::Auto);
    chassis.pxi().set_fan_mode(PxiFanMode::High).unwrap();
    assert_eq!(
        chassis.get_expert_value("PXI", "fan_mode").unwrap(),
        Value::Enum {
            raw: 4,
            symbol: Some("High"),
        }
    );
    assert!(chassis.xnet().protocol().unwrap_err().is_property_not_implemented());
    assert!(matches!(
        chassis.get_expert_value("daqmx", "anything"),
        Err(SysCfgError::UnknownProperty { .. })
    ));
}

#[test]
fn test_string_property_round_trip() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("eth0", "01"));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    resource.set_tcp_ip_address("192.168.1.20".to_string()).unwrap();
    assert_eq!(resource.tcp_ip_address().unwrap(), "192.168.1.20");

    // Latin-1 cannot carry this character.
    let err = resource.set_calibration_comments("Ω".to_string()).unwrap_err();
    assert!(matches!(err, SysCfgError::Ffi(_)));
}

#[test]
fn test_system_properties_and_resource() {
    let mock = Arc::new(MockNative::new());
    let system = mock.add_resource(MockResource::new("system").with(
        ResourceBag::PRODUCT_NAME.id,
        MockValue::text("cRIO-9045"),
    ));
    mock.put_system_property(SYSTEM_RESOURCE_HANDLE, MockValue::Resource(system));
    mock.put_system_property(SystemBag::HOSTNAME.id, MockValue::text("crio-lab"));
    let session = connect(&mock);

    assert_eq!(session.hostname().unwrap(), "crio-lab");
    session.set_hostname("crio-bench".to_string()).unwrap();
    assert_eq!(session.hostname().unwrap(), "crio-bench");

    let time = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    session.set_current_time(time).unwrap();
    assert_eq!(session.current_time().unwrap(), time);

    let first = session.system_resource().unwrap();
    assert_eq!(first.product_name().unwrap(), "cRIO-9045");
    let second = session.system_resource().unwrap();
    assert_eq!(first.handle().unwrap(), second.handle().unwrap());
    assert_eq!(mock.count("get_system_property"), 4);

    // A closed system resource is fetched again.
    first.close().unwrap();
    let third = session.system_resource().unwrap();
    assert!(second.is_closed());
    assert_eq!(third.product_name().unwrap(), "cRIO-9045");
    assert_eq!(mock.count("get_system_property"), 5);
}

#[test]
fn test_blank_timestamp_is_epoch() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01").with(
        ResourceBag::INTERNAL_CALIBRATION_LAST_TIME.id,
        MockValue::Timestamp(nisyscfg_sys::Timestamp::BLANK),
    ));
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(
        resource.internal_calibration_last_time().unwrap(),
        DateTime::<Utc>::UNIX_EPOCH
    );
    assert_eq!(mock.count("values_from_timestamp"), 0);
}

// ===== Resource operations =====

#[test]
fn test_save_changes_reports_restart() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.set_restart_required(true);
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    let outcome = resource.save_changes().unwrap();
    assert!(outcome.restart_required);
    assert_eq!(outcome.details, "changes saved");
    assert_eq!(mock.outstanding_strings(), 0);
}

#[test]
fn test_save_changes_fails_in_strict_mode() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.set_restart_required(true);
    init_logging();
    let config = SessionConfig::default().with_strict_warnings(true);
    let session = Session::with_api(Arc::clone(&mock) as Arc<dyn NativeApi>, &config).unwrap();
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    let err = resource.save_changes().unwrap_err();
    assert!(matches!(err, SysCfgError::Warning { .. }));
    assert_eq!(mock.outstanding_strings(), 0);
}

#[test]
fn test_self_test_calibrate_and_firmware() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("PXI1Slot2", "01"));
    mock.set_firmware_status(FirmwareStatus::ReadyPendingUserRestart.raw());
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!(resource.self_test(0).unwrap(), "self test passed");
    assert_eq!(resource.self_calibrate().unwrap(), "self calibration complete");

    let outcome = resource
        .upgrade_firmware(&FirmwareUpdate::new("/tmp/fw.cfg"))
        .unwrap();
    assert_eq!(outcome.status, FirmwareStatus::ReadyPendingUserRestart);
    assert_eq!(outcome.details, "firmware /tmp/fw.cfg applied");

    let outcome = resource.erase_firmware(true).unwrap();
    assert_eq!(outcome.details, "firmware erased");
    assert_eq!(mock.outstanding_strings(), 0);
}

#[test]
fn test_rename_with_overwrite_owns_displaced_resource() {
    let mock = Arc::new(MockNative::new());
    mock.add_resource(ni_device("Dev1", "01"));
    let other = mock.add_resource(ni_device("Dev2", "02"));
    let session = connect(&mock);
    let dev1 = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    let outcome = dev1.rename("Dev2", true, true).unwrap();
    assert!(outcome.name_already_existed);
    let displaced = outcome.overwritten.unwrap();
    assert_eq!(displaced.serial_number().unwrap(), "02");
    assert_eq!(mock.resource(other).unwrap().name, "");

    let displaced_handle = displaced.handle().unwrap().as_raw();
    let dev1_handle = dev1.handle().unwrap().as_raw();
    mock.clear_calls();
    dev1.close().unwrap();
    assert_eq!(mock.closed(), vec![displaced_handle, dev1_handle]);
    assert!(displaced.is_closed());
}

#[test]
fn test_delete_modes() {
    let mock = Arc::new(MockNative::new());
    let index = mock.add_resource(ni_device("Dev1", "01").with_dependents());
    let session = connect(&mock);
    let resource = session
        .find_hardware(None, FilterMode::MatchValuesAll, &[])
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    let err = resource
        .delete(DeleteValidationMode::DeleteIfNoDependenciesExist)
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(status::HAS_DEPENDENCIES));
    assert!(!mock.resource(index).unwrap().deleted);

    let outcome = resource
        .delete(DeleteValidationMode::DeleteItemAndAnyDependencies)
        .unwrap();
    assert!(outcome.dependent_items_deleted);
    assert!(mock.resource(index).unwrap().deleted);
    assert_eq!(mock.outstanding_strings(), 0);
}
