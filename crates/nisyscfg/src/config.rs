//! Options for sessions and long-running operations.

use serde::{Deserialize, Serialize};

use crate::catalog::{IncludeCachedResults, IncludeComponentTypes, Locale, SystemNameFormat};

/// Connection options for [`Session::connect`](crate::Session::connect).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hostname, IP address or MAC address of the target system
    pub target: String,
    /// User name; `None` uses the current credentials
    pub username: Option<String>,
    /// Password for `username`
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Language of status descriptions
    pub locale: Locale,
    /// Re-read every property from the target instead of the cache
    pub force_property_refresh: bool,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u32,
    /// Turn warning statuses into errors
    pub strict_warnings: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target: "localhost".to_string(),
            username: None,
            password: None,
            locale: Locale::Default,
            force_property_refresh: false,
            connect_timeout_ms: 60_000,
            strict_warnings: false,
        }
    }
}

impl SessionConfig {
    /// Options for connecting to `target` with defaults otherwise.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_force_property_refresh(mut self, force: bool) -> Self {
        self.force_property_refresh = force;
        self
    }

    pub fn with_connect_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.connect_timeout_ms = timeout_ms;
        self
    }

    pub fn with_strict_warnings(mut self, strict: bool) -> Self {
        self.strict_warnings = strict;
        self
    }
}

/// Options for [`Session::find_systems`](crate::Session::find_systems).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemQuery {
    /// Restrict the search to one device class
    pub device_class: Option<String>,
    /// Probe the network for systems that are online
    pub detect_online_systems: bool,
    /// Whether systems from the offline cache are reported
    pub cache_mode: IncludeCachedResults,
    /// How each system is named in the results
    pub name_format: SystemNameFormat,
    /// Search timeout in milliseconds
    pub timeout_ms: u32,
    /// Report only systems that software can be installed on
    pub only_installable_systems: bool,
}

impl Default for SystemQuery {
    fn default() -> Self {
        Self {
            device_class: None,
            detect_online_systems: true,
            cache_mode: IncludeCachedResults::None,
            name_format: SystemNameFormat::Hostname,
            timeout_ms: 4_000,
            only_installable_systems: false,
        }
    }
}

impl SystemQuery {
    pub fn with_device_class(mut self, device_class: impl Into<String>) -> Self {
        self.device_class = Some(device_class.into());
        self
    }

    pub fn with_cache_mode(mut self, cache_mode: IncludeCachedResults) -> Self {
        self.cache_mode = cache_mode;
        self
    }

    pub fn with_name_format(mut self, name_format: SystemNameFormat) -> Self {
        self.name_format = name_format;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Options for [`Session::restart`](crate::Session::restart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartOptions {
    /// Block until the target is back online
    pub wait_for_restart: bool,
    /// Restart into install (safe) mode
    pub install_mode: bool,
    /// Flush the local DNS cache after the restart
    pub flush_dns: bool,
    /// Restart timeout in milliseconds
    pub timeout_ms: u32,
}

impl Default for RestartOptions {
    fn default() -> Self {
        Self {
            wait_for_restart: true,
            install_mode: false,
            flush_dns: false,
            timeout_ms: 90_000,
        }
    }
}

impl RestartOptions {
    pub fn with_wait_for_restart(mut self, wait: bool) -> Self {
        self.wait_for_restart = wait;
        self
    }

    pub fn with_install_mode(mut self, install_mode: bool) -> Self {
        self.install_mode = install_mode;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Options for [`HardwareResource::upgrade_firmware`](crate::HardwareResource::upgrade_firmware).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareUpdate {
    /// Path of the firmware image on the target
    pub firmware_file: String,
    /// Stop running tasks that use the device
    pub auto_stop_tasks: bool,
    /// Install even if the same version is already present
    pub always_overwrite: bool,
    /// Block until the update completes
    pub wait_for_operation: bool,
}

impl Default for FirmwareUpdate {
    fn default() -> Self {
        Self {
            firmware_file: String::new(),
            auto_stop_tasks: false,
            always_overwrite: false,
            wait_for_operation: true,
        }
    }
}

impl FirmwareUpdate {
    pub fn new(firmware_file: impl Into<String>) -> Self {
        Self {
            firmware_file: firmware_file.into(),
            ..Default::default()
        }
    }

    pub fn with_auto_stop_tasks(mut self, auto_stop: bool) -> Self {
        self.auto_stop_tasks = auto_stop;
        self
    }

    pub fn with_always_overwrite(mut self, overwrite: bool) -> Self {
        self.always_overwrite = overwrite;
        self
    }
}

/// Options for [`Session::installed_components`](crate::Session::installed_components).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentQuery {
    pub item_types: IncludeComponentTypes,
    /// Use the cached list instead of querying the target
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.target, "localhost");
        assert_eq!(config.connect_timeout_ms, 60_000);
        assert!(!config.strict_warnings);
    }

    #[test]
    fn test_session_from_partial_json() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"target": "10.0.0.2", "locale": "German"}"#).unwrap();
        assert_eq!(
            config,
            SessionConfig::new("10.0.0.2").with_locale(Locale::German)
        );
    }

    #[test]
    fn test_password_is_not_serialized() {
        let config = SessionConfig::new("pxi-1").with_credentials("admin", "secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("admin"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_builders() {
        let query = SystemQuery::default()
            .with_device_class("cRIO")
            .with_name_format(SystemNameFormat::IpHostname);
        assert_eq!(query.device_class.as_deref(), Some("cRIO"));
        assert_eq!(query.name_format, SystemNameFormat::IpHostname);

        let update = FirmwareUpdate::new("/tmp/fw.cfg").with_always_overwrite(true);
        assert!(update.always_overwrite);
        assert!(update.wait_for_operation);
    }
}
