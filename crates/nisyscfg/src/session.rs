//! Sessions to a target system.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use log::{debug, info, warn};
use nisyscfg_sys::{
    string_buffer, DetailedString, DynamicLibrary, NativeApi, RawHandle, StringCodec,
};

use crate::catalog::system::SYSTEM_RESOURCE_HANDLE;
use crate::catalog::{FilterMode, SystemBag};
use crate::config::{ComponentQuery, RestartOptions, SessionConfig, SystemQuery};
use crate::context::Context;
use crate::enumerator::{
    ComponentSource, Components, Dependencies, DependencySource, Enumerator, ExpertInfo,
    ExpertSource, Experts, FeedSource, Feeds, ResourceSource, Resources, SystemSource, Systems,
};
use crate::error::{Status, SysCfgError, SysCfgResult};
use crate::filter::Filter;
use crate::ownership::Owned;
use crate::property::accessor::SystemTarget;
use crate::property::{PropertyAccessor, PropertyHost, Symbolic};
use crate::resource::HardwareResource;
use crate::types::{
    ComponentEnumHandle, DependencyEnumHandle, ExpertEnumHandle, FeedEnumHandle, FilterHandle,
    ResourceEnumHandle, ResourceHandle, SessionHandle, SessionKind, SystemEnumHandle,
};

/// Result of [`Session::install_all`].
#[derive(Debug)]
pub struct InstallOutcome {
    pub installed: Components,
    pub broken_dependencies: Dependencies,
}

/// A connection to one target system.
///
/// The session owns every handle opened through it. Closing or dropping
/// the session closes them all, most recently opened first, and objects
/// that outlive it report `Closed` from then on.
pub struct Session {
    system_resource: RefCell<Option<Rc<HardwareResource>>>,
    accessor: PropertyAccessor,
    owned: Owned<SessionKind>,
    target: String,
    experts: Vec<ExpertInfo>,
}

impl Session {
    /// Connects through the installed library.
    pub fn connect(config: &SessionConfig) -> SysCfgResult<Self> {
        let library = DynamicLibrary::shared()?;
        Self::with_api(library, config)
    }

    /// Connects through the given implementation of the native API.
    pub fn with_api(api: Arc<dyn NativeApi>, config: &SessionConfig) -> SysCfgResult<Self> {
        let codec = StringCodec::platform();
        let target = codec.encode(&config.target)?;
        let username = config
            .username
            .as_deref()
            .map(|u| codec.encode(u))
            .transpose()?;
        let password = config
            .password
            .as_deref()
            .map(|p| codec.encode(p))
            .transpose()?;

        let mut expert_enum = RawHandle::NULL;
        let mut session = RawHandle::NULL;
        let result = api.initialize_session(
            &target,
            username.as_deref(),
            password.as_deref(),
            config.locale.raw(),
            config.force_property_refresh,
            config.connect_timeout_ms,
            &mut expert_enum,
            &mut session,
        );

        let ctx = Rc::new(Context::new(api, codec, config.strict_warnings, session));
        if session.is_null() {
            // Without a session nothing can own the expert enumeration.
            if !expert_enum.is_null() {
                let closed = ctx.api().close_handle(expert_enum);
                if let Err(e) = ctx.check("close_handle", closed) {
                    warn!("Closing expert enumeration {} failed: {}", expert_enum, e);
                }
            }
            ctx.check("initialize_session", result)?;
            return Err(SysCfgError::NullHandle {
                operation: "initialize_session",
            });
        }
        let owned = Owned::<SessionKind>::from_node(&ctx, ctx.root());
        let experts = Enumerator::adopt(
            &ctx,
            ctx.root(),
            ExpertEnumHandle::from_raw_unchecked(expert_enum),
            ExpertSource,
        );
        // On failure `owned` and `experts` close whatever was opened.
        ctx.check("initialize_session", result)?;
        let mut experts = experts?;
        let expert_list = experts.to_vec()?;
        experts.close()?;

        info!(
            "Connected to {} with {} experts",
            config.target,
            expert_list.len()
        );
        let accessor = PropertyAccessor::new(&ctx, ctx.root(), "Session", &SystemTarget);
        Ok(Self {
            system_resource: RefCell::new(None),
            accessor,
            owned,
            target: config.target.clone(),
            experts: expert_list,
        })
    }

    fn ctx(&self) -> &Rc<Context> {
        self.owned.context()
    }

    fn raw(&self) -> SysCfgResult<RawHandle> {
        Ok(self.owned.handle()?.as_raw())
    }

    pub fn handle(&self) -> SysCfgResult<SessionHandle> {
        self.owned.handle()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Experts reported when the session was opened.
    pub fn experts(&self) -> &[ExpertInfo] {
        &self.experts
    }

    /// Number of native handles still open in this session, including the
    /// session itself.
    pub fn open_handles(&self) -> usize {
        self.ctx().open_handles()
    }

    pub fn is_closed(&self) -> bool {
        self.owned.is_closed()
    }

    /// Closes every handle of the session, then the session.
    ///
    /// All handles are released even if some closes fail; the first
    /// failure is returned. Closing twice is a no-op.
    pub fn close(&self) -> SysCfgResult<()> {
        debug!("Closing session to {}", self.target);
        self.owned.close()
    }

    /// Lists the experts named in `names`, or all experts when empty.
    pub fn get_system_experts(&self, names: &[&str]) -> SysCfgResult<Experts> {
        let session = self.raw()?;
        let names = self.ctx().encode(&names.join(","))?;
        let mut handle = RawHandle::NULL;
        let result = self
            .ctx()
            .api()
            .get_system_experts(session, &names, &mut handle);
        self.ctx().check("get_system_experts", result)?;
        Enumerator::adopt(
            self.ctx(),
            self.ctx().root(),
            ExpertEnumHandle::from_raw_unchecked(handle),
            ExpertSource,
        )
    }

    pub fn set_remote_timeout(&self, timeout_ms: u32) -> SysCfgResult<()> {
        let session = self.raw()?;
        let result = self.ctx().api().set_remote_timeout(session, timeout_ms);
        self.ctx().check("set_remote_timeout", result)?;
        Ok(())
    }

    pub fn create_filter(&self) -> SysCfgResult<Filter> {
        let session = self.raw()?;
        let mut handle = RawHandle::NULL;
        let result = self.ctx().api().create_filter(session, &mut handle);
        self.ctx().check("create_filter", result)?;
        let handle = FilterHandle::from_raw(handle).ok_or(SysCfgError::NullHandle {
            operation: "create_filter",
        })?;
        Filter::adopt(self.ctx(), self.ctx().root(), handle)
    }

    /// Searches for hardware resources.
    ///
    /// Without a filter every resource matches. `experts` restricts the
    /// search to the named experts; empty means all experts.
    pub fn find_hardware(
        &self,
        filter: Option<&Filter>,
        mode: FilterMode,
        experts: &[&str],
    ) -> SysCfgResult<Resources> {
        let session = self.raw()?;
        let filter = match filter {
            Some(filter) => filter.handle()?.as_raw(),
            None => RawHandle::NULL,
        };
        let experts = if experts.is_empty() {
            None
        } else {
            Some(self.ctx().encode(&experts.join(","))?)
        };
        let mut handle = RawHandle::NULL;
        let result = self.ctx().api().find_hardware(
            session,
            mode.raw(),
            filter,
            experts.as_deref(),
            &mut handle,
        );
        self.ctx().check("find_hardware", result)?;
        Enumerator::adopt(
            self.ctx(),
            self.ctx().root(),
            ResourceEnumHandle::from_raw_unchecked(handle),
            ResourceSource,
        )
    }

    /// Searches the network for systems.
    pub fn find_systems(&self, query: &SystemQuery) -> SysCfgResult<Systems> {
        let session = self.raw()?;
        let device_class = query
            .device_class
            .as_deref()
            .map(|c| self.ctx().encode(c))
            .transpose()?;
        let mut handle = RawHandle::NULL;
        let result = self.ctx().api().find_systems(
            session,
            device_class.as_deref(),
            query.detect_online_systems,
            query.cache_mode.raw(),
            query.name_format.raw(),
            query.timeout_ms,
            query.only_installable_systems,
            &mut handle,
        );
        self.ctx().check("find_systems", result)?;
        Enumerator::adopt(
            self.ctx(),
            self.ctx().root(),
            SystemEnumHandle::from_raw_unchecked(handle),
            SystemSource,
        )
    }

    /// Restarts the target and returns its IP address after the restart.
    pub fn restart(&self, options: &RestartOptions) -> SysCfgResult<String> {
        let session = self.raw()?;
        let mut new_ip_address = string_buffer();
        let result = self.ctx().api().restart(
            session,
            options.wait_for_restart,
            options.install_mode,
            options.flush_dns,
            options.timeout_ms,
            &mut new_ip_address,
        );
        self.ctx().check("restart", result)?;
        let ip = self.ctx().decode_buffer(&new_ip_address);
        info!("Restarted {} ({})", self.target, ip);
        Ok(ip)
    }

    pub fn installed_components(&self, query: ComponentQuery) -> SysCfgResult<Components> {
        let session = self.raw()?;
        let mut handle = RawHandle::NULL;
        let result = self.ctx().api().get_installed_software_components(
            session,
            query.item_types.raw(),
            query.cached,
            &mut handle,
        );
        self.ctx().check("get_installed_software_components", result)?;
        Enumerator::adopt(
            self.ctx(),
            self.ctx().root(),
            ComponentEnumHandle::from_raw_unchecked(handle),
            ComponentSource,
        )
    }

    /// Lists software feeds, optionally for one platform.
    pub fn feeds(&self, platform: Option<&str>, cached: bool) -> SysCfgResult<Feeds> {
        let session = self.raw()?;
        let platform = platform.map(|p| self.ctx().encode(p)).transpose()?;
        let mut handle = RawHandle::NULL;
        let result = self
            .ctx()
            .api()
            .get_feeds(session, platform.as_deref(), cached, &mut handle);
        self.ctx().check("get_feeds", result)?;
        Enumerator::adopt(
            self.ctx(),
            self.ctx().root(),
            FeedEnumHandle::from_raw_unchecked(handle),
            FeedSource,
        )
    }

    /// Installs every available component.
    pub fn install_all(
        &self,
        auto_restart: bool,
        deselect_conflicts: bool,
    ) -> SysCfgResult<InstallOutcome> {
        let session = self.raw()?;
        let (mut installed, mut broken) = (RawHandle::NULL, RawHandle::NULL);
        let result = self.ctx().api().install_all(
            session,
            auto_restart,
            deselect_conflicts,
            &mut installed,
            &mut broken,
        );
        let ctx = self.ctx();
        let installed = Enumerator::adopt(
            ctx,
            ctx.root(),
            ComponentEnumHandle::from_raw_unchecked(installed),
            ComponentSource,
        )?;
        let broken_dependencies = Enumerator::adopt(
            ctx,
            ctx.root(),
            DependencyEnumHandle::from_raw_unchecked(broken),
            DependencySource,
        )?;
        ctx.check("install_all", result)?;
        Ok(InstallOutcome {
            installed,
            broken_dependencies,
        })
    }

    /// Asks the library to describe a status code.
    pub fn status_description(&self, status: Status) -> SysCfgResult<String> {
        let session = self.raw()?;
        let mut text = DetailedString::null();
        let result = self
            .ctx()
            .api()
            .get_status_description(session, status.code(), &mut text);
        let (_, description) = self
            .ctx()
            .with_detail("get_status_description", result, text)?;
        Ok(description)
    }

    /// The resource representing the target system itself.
    ///
    /// Fetched on first use and cached. A cached resource that was closed
    /// is fetched again.
    pub fn system_resource(&self) -> SysCfgResult<Rc<HardwareResource>> {
        if let Some(resource) = self.system_resource.borrow().as_ref() {
            if !resource.is_closed() {
                return Ok(Rc::clone(resource));
            }
        }
        let raw = self
            .accessor
            .get_handle("SYSTEM_RESOURCE_HANDLE", SYSTEM_RESOURCE_HANDLE)?;
        let handle = ResourceHandle::from_raw(raw).ok_or(SysCfgError::NullHandle {
            operation: "SYSTEM_RESOURCE_HANDLE",
        })?;
        let resource = Rc::new(HardwareResource::adopt(self.ctx(), self.ctx().root(), handle)?);
        *self.system_resource.borrow_mut() = Some(Rc::clone(&resource));
        Ok(resource)
    }
}

impl PropertyHost<SystemBag> for Session {
    fn accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("open_handles", &self.open_handles())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.owned.is_closed() {
            return;
        }
        if let Err(e) = self.close() {
            warn!("Closing session to {} failed: {}", self.target, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nisyscfg_sys::mock::MockNative;
    use nisyscfg_sys::status;
    use pretty_assertions::assert_eq;

    fn connect(mock: &Arc<MockNative>) -> SysCfgResult<Session> {
        Session::with_api(Arc::clone(mock) as Arc<dyn NativeApi>, &SessionConfig::default())
    }

    #[test]
    fn test_missing_session_handle_closes_expert_enum() {
        let mock = Arc::new(MockNative::new());
        mock.add_expert("pxi", "PXI Platform Services", "24.0");
        mock.set_null_session(true);

        let err = connect(&mock).unwrap_err();
        assert!(matches!(
            err,
            SysCfgError::NullHandle {
                operation: "initialize_session"
            }
        ));
        assert_eq!(mock.closed().len(), 1);
        assert_eq!(mock.open_handles(), 0);
    }

    #[test]
    fn test_failed_expert_enum_close_keeps_null_handle_error() {
        let mock = Arc::new(MockNative::new());
        mock.set_null_session(true);
        mock.fail("close_handle", status::FAIL);

        let err = connect(&mock).unwrap_err();
        assert!(matches!(err, SysCfgError::NullHandle { .. }));
        assert_eq!(mock.count("close_handle"), 1);
    }
}
