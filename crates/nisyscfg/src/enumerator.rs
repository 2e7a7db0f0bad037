//! Iterators over native enumeration handles.
//!
//! The library returns results of searches and listings as enumeration
//! handles that are advanced one item at a time. [`Enumerator`] wraps such
//! a handle: the end of the enumeration is `Ok(None)` rather than an
//! error, and once reached no further native call is made.

use std::rc::Rc;

use log::debug;
use nisyscfg_sys::{string_buffer, DetailedString, NativeApi, RawHandle};
use serde::{Deserialize, Serialize};

use crate::catalog::ComponentType;
use crate::context::Context;
use crate::error::{Status, SysCfgError, SysCfgResult};
use crate::ownership::{NodeId, Owned};
use crate::property::Symbolic;
use crate::resource::HardwareResource;
use crate::types::{
    ComponentEnumKind, DependencyEnumKind, ExpertEnumKind, FeedEnumKind, Handle, HandleKind,
    ResourceEnumKind, ResourceHandle, SystemEnumKind,
};

/// What an enumerator step needs from its owner.
pub struct Cursor<'a> {
    ctx: &'a Rc<Context>,
    handle: RawHandle,
}

impl Cursor<'_> {
    pub(crate) fn api(&self) -> &dyn NativeApi {
        self.ctx.api()
    }

    pub(crate) fn handle(&self) -> RawHandle {
        self.handle
    }

    pub(crate) fn context(&self) -> &Rc<Context> {
        self.ctx
    }
}

/// Produces the items of one kind of enumeration.
pub trait EnumSource {
    type Kind: HandleKind;
    type Item;

    /// Fetches the next item, or `None` at the end of the enumeration.
    #[doc(hidden)]
    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<Self::Item>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Exhausted,
    Closed,
}

/// An iterator over a native enumeration.
///
/// Yields `SysCfgResult<Item>`. A null enumeration handle is an empty
/// sequence. After [`close`](Enumerator::close), iteration yields a
/// `Closed` error.
pub struct Enumerator<S: EnumSource> {
    ctx: Rc<Context>,
    owned: Option<Owned<S::Kind>>,
    source: S,
    state: State,
}

impl<S: EnumSource> Enumerator<S> {
    /// Takes ownership of `handle` as a child of `parent`.
    pub(crate) fn adopt(
        ctx: &Rc<Context>,
        parent: NodeId,
        handle: Handle<S::Kind>,
        source: S,
    ) -> SysCfgResult<Self> {
        let (owned, state) = if handle.is_null() {
            (None, State::Exhausted)
        } else {
            (Some(Owned::adopt(ctx, parent, handle)?), State::Open)
        };
        Ok(Self {
            ctx: Rc::clone(ctx),
            owned,
            source,
            state,
        })
    }

    /// Advances the enumeration.
    pub fn try_next(&mut self) -> SysCfgResult<Option<S::Item>> {
        // The handle may have been closed through the session.
        if self.owned.as_ref().is_some_and(|owned| owned.is_closed()) {
            self.state = State::Closed;
        }
        match self.state {
            State::Exhausted => return Ok(None),
            State::Closed => {
                return Err(SysCfgError::Closed {
                    object: S::Kind::NAME,
                })
            }
            State::Open => {}
        }
        let handle = match &self.owned {
            Some(owned) => owned.handle()?.as_raw(),
            None => RawHandle::NULL,
        };
        let cursor = Cursor {
            ctx: &self.ctx,
            handle,
        };
        let item = self.source.next_item(&cursor)?;
        if item.is_none() {
            debug!("{} {} exhausted", S::Kind::NAME, handle);
            self.state = State::Exhausted;
        }
        Ok(item)
    }

    /// Collects the remaining items.
    pub fn to_vec(&mut self) -> SysCfgResult<Vec<S::Item>> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next()? {
            items.push(item);
        }
        Ok(items)
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Closes the enumeration handle. Closing twice is a no-op.
    pub fn close(&mut self) -> SysCfgResult<()> {
        self.state = State::Closed;
        match &self.owned {
            Some(owned) if !owned.is_closed() => owned.close(),
            _ => Ok(()),
        }
    }
}

impl<S: EnumSource> std::fmt::Debug for Enumerator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("kind", &S::Kind::NAME)
            .field("state", &self.state)
            .finish()
    }
}

impl<S: EnumSource> Iterator for Enumerator<S> {
    type Item = SysCfgResult<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

/// Hardware resources found by `find_hardware`.
///
/// Every resource is owned by the session, not the enumerator, so it
/// stays usable after the enumerator is closed.
#[derive(Debug, Default)]
pub struct ResourceSource;

impl EnumSource for ResourceSource {
    type Kind = ResourceEnumKind;
    type Item = HardwareResource;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<HardwareResource>> {
        let ctx = cursor.context();
        let mut resource = RawHandle::NULL;
        let result = cursor
            .api()
            .next_resource(ctx.session_handle(), cursor.handle(), &mut resource);
        if !ctx.check_next("next_resource", result)? {
            return Ok(None);
        }
        let handle = ResourceHandle::from_raw(resource).ok_or(SysCfgError::NullHandle {
            operation: "next_resource",
        })?;
        HardwareResource::adopt(ctx, ctx.root(), handle).map(Some)
    }
}

/// An expert (driver) installed on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertInfo {
    pub name: String,
    pub display_name: String,
    pub version: String,
}

#[derive(Debug, Default)]
pub struct ExpertSource;

impl EnumSource for ExpertSource {
    type Kind = ExpertEnumKind;
    type Item = ExpertInfo;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<ExpertInfo>> {
        let (mut name, mut display_name, mut version) =
            (string_buffer(), string_buffer(), string_buffer());
        let result =
            cursor
                .api()
                .next_expert_info(cursor.handle(), &mut name, &mut display_name, &mut version);
        let ctx = cursor.context();
        if !ctx.check_next("next_expert_info", result)? {
            return Ok(None);
        }
        Ok(Some(ExpertInfo {
            name: ctx.decode_buffer(&name),
            display_name: ctx.decode_buffer(&display_name),
            version: ctx.decode_buffer(&version),
        }))
    }
}

/// System names found by `find_systems`.
#[derive(Debug, Default)]
pub struct SystemSource;

impl EnumSource for SystemSource {
    type Kind = SystemEnumKind;
    type Item = String;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<String>> {
        let mut system = string_buffer();
        let result = cursor.api().next_system_info(cursor.handle(), &mut system);
        let ctx = cursor.context();
        if !ctx.check_next("next_system_info", result)? {
            return Ok(None);
        }
        Ok(Some(ctx.decode_buffer(&system)))
    }
}

/// An installed software component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub id: String,
    pub version: String,
    pub title: String,
    pub item_type: ComponentType,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct ComponentSource;

impl EnumSource for ComponentSource {
    type Kind = ComponentEnumKind;
    type Item = ComponentInfo;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<ComponentInfo>> {
        let (mut id, mut version, mut title) = (string_buffer(), string_buffer(), string_buffer());
        let mut item_type = 0;
        let mut detail = DetailedString::null();
        let result = cursor.api().next_component_info(
            cursor.handle(),
            &mut id,
            &mut version,
            &mut title,
            &mut item_type,
            &mut detail,
        );
        let ctx = cursor.context();
        let (status, description) = ctx.with_detail("next_component_info", result, detail)?;
        if status == Status::END_OF_ENUM {
            return Ok(None);
        }
        Ok(Some(ComponentInfo {
            id: ctx.decode_buffer(&id),
            version: ctx.decode_buffer(&version),
            title: ctx.decode_buffer(&title),
            item_type: ComponentType::from_raw_value(item_type).unwrap_or(ComponentType::Unknown),
            description,
        }))
    }
}

/// A dependency that `install_all` could not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    pub id: String,
    pub version: String,
    pub title: String,
}

#[derive(Debug, Default)]
pub struct DependencySource;

impl EnumSource for DependencySource {
    type Kind = DependencyEnumKind;
    type Item = DependencyInfo;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<DependencyInfo>> {
        let (mut id, mut version, mut title) = (string_buffer(), string_buffer(), string_buffer());
        let result =
            cursor
                .api()
                .next_dependency_info(cursor.handle(), &mut id, &mut version, &mut title);
        let ctx = cursor.context();
        if !ctx.check_next("next_dependency_info", result)? {
            return Ok(None);
        }
        Ok(Some(DependencyInfo {
            id: ctx.decode_buffer(&id),
            version: ctx.decode_buffer(&version),
            title: ctx.decode_buffer(&title),
        }))
    }
}

/// A software feed configured on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedInfo {
    pub name: String,
    pub uri: String,
    pub enabled: bool,
    pub trusted: bool,
}

#[derive(Debug, Default)]
pub struct FeedSource;

impl EnumSource for FeedSource {
    type Kind = FeedEnumKind;
    type Item = FeedInfo;

    fn next_item(&mut self, cursor: &Cursor<'_>) -> SysCfgResult<Option<FeedInfo>> {
        let (mut name, mut uri) = (string_buffer(), string_buffer());
        let (mut enabled, mut trusted) = (false, false);
        let result = cursor.api().next_feed(
            cursor.handle(),
            &mut name,
            &mut uri,
            &mut enabled,
            &mut trusted,
        );
        let ctx = cursor.context();
        if !ctx.check_next("next_feed", result)? {
            return Ok(None);
        }
        Ok(Some(FeedInfo {
            name: ctx.decode_buffer(&name),
            uri: ctx.decode_buffer(&uri),
            enabled,
            trusted,
        }))
    }
}

pub type Resources = Enumerator<ResourceSource>;
pub type Experts = Enumerator<ExpertSource>;
pub type Systems = Enumerator<SystemSource>;
pub type Components = Enumerator<ComponentSource>;
pub type Dependencies = Enumerator<DependencySource>;
pub type Feeds = Enumerator<FeedSource>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SystemEnumHandle;
    use nisyscfg_sys::mock::{MockComponent, MockNative};
    use nisyscfg_sys::StringCodec;
    use pretty_assertions::assert_eq;
    use std::ffi::CString;
    use std::sync::Arc;

    fn context(mock: &Arc<MockNative>) -> Rc<Context> {
        let mut expert_enum = RawHandle::NULL;
        let mut session = RawHandle::NULL;
        let target = CString::new("localhost").unwrap();
        let result = mock.initialize_session(
            &target,
            None,
            None,
            0,
            false,
            60_000,
            &mut expert_enum,
            &mut session,
        );
        assert_eq!(result.unwrap(), 0);
        mock.close_handle(expert_enum).unwrap();
        Rc::new(Context::new(
            Arc::clone(mock) as Arc<dyn NativeApi>,
            StringCodec::Latin1,
            false,
            session,
        ))
    }

    fn systems(ctx: &Rc<Context>, mock: &MockNative) -> Systems {
        let mut handle = RawHandle::NULL;
        let result = mock.find_systems(
            ctx.session_handle(),
            None,
            true,
            0,
            0,
            1000,
            false,
            &mut handle,
        );
        assert_eq!(result.unwrap(), 0);
        Enumerator::adopt(
            ctx,
            ctx.root(),
            SystemEnumHandle::from_raw_unchecked(handle),
            SystemSource,
        )
        .unwrap()
    }

    #[test]
    fn test_no_native_call_after_end() {
        let mock = Arc::new(MockNative::new());
        mock.add_system("alpha");
        mock.add_system("beta");
        let ctx = context(&mock);
        let mut systems = systems(&ctx, &mock);

        assert_eq!(systems.try_next().unwrap(), Some("alpha".to_string()));
        assert_eq!(systems.try_next().unwrap(), Some("beta".to_string()));
        assert_eq!(systems.try_next().unwrap(), None);
        assert!(systems.is_exhausted());
        assert_eq!(mock.count("next_system_info"), 3);

        assert_eq!(systems.try_next().unwrap(), None);
        assert!(systems.next().is_none());
        assert_eq!(mock.count("next_system_info"), 3);
    }

    #[test]
    fn test_null_handle_is_empty() {
        let mock = Arc::new(MockNative::new());
        let ctx = context(&mock);
        let mut systems =
            Enumerator::adopt(&ctx, ctx.root(), SystemEnumHandle::NULL, SystemSource).unwrap();
        assert!(systems.next().is_none());
        assert_eq!(mock.count("next_system_info"), 0);
        systems.close().unwrap();
    }

    #[test]
    fn test_closed_enumerator_yields_error() {
        let mock = Arc::new(MockNative::new());
        mock.add_system("alpha");
        let ctx = context(&mock);
        let mut systems = systems(&ctx, &mock);
        systems.close().unwrap();
        systems.close().unwrap();
        assert!(matches!(
            systems.next(),
            Some(Err(SysCfgError::Closed { .. }))
        ));
        assert_eq!(mock.count("next_system_info"), 0);
    }

    #[test]
    fn test_component_description_is_freed() {
        let mock = Arc::new(MockNative::new());
        mock.add_component(MockComponent {
            id: "ni-daqmx".to_string(),
            version: "24.0".to_string(),
            title: "NI-DAQmx".to_string(),
            item_type: 0,
            detail: "Data acquisition driver".to_string(),
        });
        let ctx = context(&mock);
        let mut handle = RawHandle::NULL;
        let result =
            mock.get_installed_software_components(ctx.session_handle(), 1, false, &mut handle);
        assert_eq!(result.unwrap(), 0);
        let mut components = Enumerator::adopt(
            &ctx,
            ctx.root(),
            Handle::<ComponentEnumKind>::from_raw_unchecked(handle),
            ComponentSource,
        )
        .unwrap();

        let all = components.to_vec().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].item_type, ComponentType::Standard);
        assert_eq!(all[0].description, "Data acquisition driver");
        assert_eq!(mock.outstanding_strings(), 0);
    }
}
