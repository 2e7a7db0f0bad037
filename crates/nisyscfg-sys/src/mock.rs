//! In-memory [`NativeApi`] for tests.
//!
//! `MockNative` keeps a small model of a target: a list of resources with
//! property maps, system properties, experts, software components and
//! feeds. Every entry point records `(function, handle)` so tests can
//! assert call order, and any entry point can be made to fail with a
//! chosen status.

use std::collections::{HashMap, HashSet, VecDeque};
use std::ffi::{CStr, CString};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{NativeApi, PropertyIn, PropertyOut};
use crate::error::{FfiError, FfiResult};
use crate::handle::{DetailedString, RawHandle};
use crate::status;
use crate::timestamp::Timestamp;
use crate::SIMPLE_STRING_LENGTH;

/// A property value held by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockValue {
    Int(i32),
    UInt(u32),
    Double(f64),
    /// Latin-1 bytes without terminator.
    Str(Vec<u8>),
    Timestamp(Timestamp),
    /// Read as a fresh handle to the resource at this index.
    Resource(usize),
}

impl MockValue {
    /// Creates a string value; characters above U+00FF are dropped.
    pub fn text(text: &str) -> Self {
        MockValue::Str(
            text.chars()
                .filter_map(|c| u8::try_from(u32::from(c)).ok())
                .collect(),
        )
    }

    fn from_in(value: PropertyIn<'_>) -> Self {
        match value {
            PropertyIn::Int(v) => MockValue::Int(v),
            PropertyIn::UInt(v) => MockValue::UInt(v),
            PropertyIn::Double(v) => MockValue::Double(v),
            PropertyIn::Str(s) => MockValue::Str(s.to_bytes().to_vec()),
            PropertyIn::Timestamp(t) => MockValue::Timestamp(*t),
        }
    }
}

/// A hardware resource known to the mock.
#[derive(Debug, Clone, Default)]
pub struct MockResource {
    pub name: String,
    pub properties: HashMap<i32, MockValue>,
    pub indexed: HashMap<i32, Vec<MockValue>>,
    pub read_only: HashSet<i32>,
    pub has_dependents: bool,
    pub deleted: bool,
}

impl MockResource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with(mut self, property: i32, value: MockValue) -> Self {
        self.properties.insert(property, value);
        self
    }

    pub fn with_indexed(mut self, property: i32, values: Vec<MockValue>) -> Self {
        self.indexed.insert(property, values);
        self
    }

    pub fn read_only(mut self, property: i32) -> Self {
        self.read_only.insert(property);
        self
    }

    pub fn with_dependents(mut self) -> Self {
        self.has_dependents = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockExpert {
    pub name: String,
    pub display_name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockComponent {
    pub id: String,
    pub version: String,
    pub title: String,
    pub item_type: i32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDependency {
    pub id: String,
    pub version: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFeed {
    pub name: String,
    pub uri: String,
    pub enabled: bool,
    pub trusted: bool,
}

/// Arguments of the last `initialize_session` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub target: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub locale: i32,
    pub force_property_refresh: bool,
    pub connect_timeout_ms: u32,
}

#[derive(Debug, Clone)]
enum Item {
    Resource(usize),
    Expert(MockExpert),
    System(String),
    Component(MockComponent),
    Dependency(MockDependency),
    Feed(MockFeed),
}

#[derive(Debug)]
enum Object {
    Session,
    Filter(HashMap<i32, MockValue>),
    Resource(usize),
    Cursor(VecDeque<Item>),
}

#[derive(Debug)]
struct Failure {
    status: i32,
    once: bool,
}

#[derive(Debug, Default)]
struct State {
    next_handle: usize,
    objects: HashMap<RawHandle, Object>,
    resources: Vec<MockResource>,
    system_properties: HashMap<i32, MockValue>,
    experts: Vec<MockExpert>,
    systems: Vec<String>,
    components: Vec<MockComponent>,
    broken_dependencies: Vec<MockDependency>,
    feeds: Vec<MockFeed>,
    descriptions: HashMap<i32, String>,
    failures: HashMap<&'static str, Failure>,
    calls: Vec<(&'static str, RawHandle)>,
    closed: Vec<RawHandle>,
    outstanding_strings: usize,
    restart_ip: String,
    restart_required: bool,
    null_session: bool,
    firmware_status: i32,
    remote_timeout_ms: Option<u32>,
    last_session: Option<SessionRecord>,
    last_find: Option<(i32, Option<String>)>,
}

impl State {
    /// Records the call and returns an injected failure, if any.
    fn enter(&mut self, function: &'static str, handle: RawHandle) -> Option<i32> {
        self.calls.push((function, handle));
        let failure = self.failures.get(function)?;
        let status = failure.status;
        if failure.once {
            self.failures.remove(function);
        }
        Some(status)
    }

    fn allocate(&mut self, object: Object) -> RawHandle {
        self.next_handle += 0x10;
        let handle = RawHandle::from_raw(0x1000 + self.next_handle);
        self.objects.insert(handle, object);
        handle
    }

    fn cursor(&mut self, items: impl IntoIterator<Item = Item>) -> RawHandle {
        self.allocate(Object::Cursor(items.into_iter().collect()))
    }

    fn resource_index(&self, handle: RawHandle) -> Option<usize> {
        match self.objects.get(&handle) {
            Some(Object::Resource(index)) => Some(*index),
            _ => None,
        }
    }

    fn pop(&mut self, handle: RawHandle) -> Result<Option<Item>, i32> {
        match self.objects.get_mut(&handle) {
            Some(Object::Cursor(items)) => Ok(items.pop_front()),
            _ => Err(status::INVALID_HANDLE),
        }
    }

    fn detail(&mut self, out: &mut DetailedString, text: &str) {
        let text = CString::new(text).unwrap_or_default();
        self.outstanding_strings += 1;
        // Safety: the pointer comes from `CString::into_raw` and is
        // reclaimed in `free_detailed_string`.
        *out = unsafe { DetailedString::from_raw(text.into_raw()) };
    }

    fn read(&mut self, value: Option<MockValue>, out: PropertyOut<'_>) -> FfiResult<i32> {
        let Some(value) = value else {
            return Ok(status::PROP_DOES_NOT_EXIST);
        };
        match (value, out) {
            (MockValue::Int(v), PropertyOut::Int(out)) => *out = v,
            (MockValue::UInt(v), PropertyOut::UInt(out)) => *out = v,
            (MockValue::Double(v), PropertyOut::Double(out)) => *out = v,
            (MockValue::Str(v), PropertyOut::Str(out)) => write_str(out, &v)?,
            (MockValue::Timestamp(v), PropertyOut::Timestamp(out)) => *out = v,
            (MockValue::Resource(index), PropertyOut::Handle(out)) => {
                *out = self.allocate(Object::Resource(index));
            }
            _ => return Ok(status::PROPERTY_TYPE_MISMATCH),
        }
        Ok(status::OK)
    }
}

fn write_str(buffer: &mut [u8], bytes: &[u8]) -> FfiResult<()> {
    if buffer.len() < SIMPLE_STRING_LENGTH {
        return Err(FfiError::BufferTooSmall {
            required: SIMPLE_STRING_LENGTH,
            actual: buffer.len(),
        });
    }
    let len = bytes.len().min(buffer.len() - 1);
    buffer[..len].copy_from_slice(&bytes[..len]);
    buffer[len] = 0;
    Ok(())
}

fn owned(text: Option<&CStr>) -> Option<String> {
    text.map(|t| String::from_utf8_lossy(t.to_bytes()).into_owned())
}

fn matches(mode: i32, filter: &HashMap<i32, MockValue>, resource: &MockResource) -> bool {
    let mut equal = filter
        .iter()
        .map(|(id, value)| resource.properties.get(id) == Some(value));
    match mode {
        1 => equal.all(|eq| eq),
        2 => filter.is_empty() || equal.any(|eq| eq),
        3 => equal.all(|eq| !eq),
        _ => filter
            .keys()
            .all(|id| resource.properties.contains_key(id)),
    }
}

/// In-memory implementation of [`NativeApi`].
#[derive(Debug, Default)]
pub struct MockNative {
    state: Mutex<State>,
}

impl MockNative {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a resource and returns its index.
    pub fn add_resource(&self, resource: MockResource) -> usize {
        let mut state = self.state();
        state.resources.push(resource);
        state.resources.len() - 1
    }

    /// Returns a copy of the resource at `index`.
    pub fn resource(&self, index: usize) -> Option<MockResource> {
        self.state().resources.get(index).cloned()
    }

    pub fn put_system_property(&self, property: i32, value: MockValue) {
        self.state().system_properties.insert(property, value);
    }

    pub fn system_property(&self, property: i32) -> Option<MockValue> {
        self.state().system_properties.get(&property).cloned()
    }

    pub fn add_expert(&self, name: &str, display_name: &str, version: &str) {
        self.state().experts.push(MockExpert {
            name: name.to_string(),
            display_name: display_name.to_string(),
            version: version.to_string(),
        });
    }

    pub fn add_system(&self, name: &str) {
        self.state().systems.push(name.to_string());
    }

    pub fn add_component(&self, component: MockComponent) {
        self.state().components.push(component);
    }

    pub fn add_broken_dependency(&self, dependency: MockDependency) {
        self.state().broken_dependencies.push(dependency);
    }

    pub fn add_feed(&self, feed: MockFeed) {
        self.state().feeds.push(feed);
    }

    /// Registers the text `get_status_description` returns for `status`.
    pub fn describe(&self, status: i32, text: &str) {
        self.state().descriptions.insert(status, text.to_string());
    }

    /// Makes every call to `function` return `status`.
    pub fn fail(&self, function: &'static str, status: i32) {
        self.state()
            .failures
            .insert(function, Failure { status, once: false });
    }

    /// Makes the next call to `function` return `status`.
    pub fn fail_once(&self, function: &'static str, status: i32) {
        self.state()
            .failures
            .insert(function, Failure { status, once: true });
    }

    pub fn clear_failure(&self, function: &'static str) {
        self.state().failures.remove(function);
    }

    pub fn set_restart_ip(&self, ip: &str) {
        self.state().restart_ip = ip.to_string();
    }

    pub fn set_restart_required(&self, required: bool) {
        self.state().restart_required = required;
    }

    /// Makes `initialize_session` succeed without producing a session
    /// handle. The expert enumeration is still opened.
    pub fn set_null_session(&self, null_session: bool) {
        self.state().null_session = null_session;
    }

    pub fn set_firmware_status(&self, firmware_status: i32) {
        self.state().firmware_status = firmware_status;
    }

    /// Every recorded `(function, handle)` pair, oldest first.
    pub fn calls(&self) -> Vec<(&'static str, RawHandle)> {
        self.state().calls.clone()
    }

    /// Number of recorded calls to `function`.
    pub fn count(&self, function: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|(name, _)| *name == function)
            .count()
    }

    /// Handles passed to `close_handle`, in call order.
    pub fn closed(&self) -> Vec<RawHandle> {
        self.state().closed.clone()
    }

    pub fn clear_calls(&self) {
        let mut state = self.state();
        state.calls.clear();
        state.closed.clear();
    }

    /// Number of handles not yet closed.
    pub fn open_handles(&self) -> usize {
        self.state().objects.len()
    }

    /// Number of detailed strings handed out and not yet freed.
    pub fn outstanding_strings(&self) -> usize {
        self.state().outstanding_strings
    }

    pub fn remote_timeout_ms(&self) -> Option<u32> {
        self.state().remote_timeout_ms
    }

    pub fn last_session(&self) -> Option<SessionRecord> {
        self.state().last_session.clone()
    }

    /// Mode and expert names of the last `find_hardware` call.
    pub fn last_find(&self) -> Option<(i32, Option<String>)> {
        self.state().last_find.clone()
    }
}

impl NativeApi for MockNative {
    fn initialize_session(
        &self,
        target: &CStr,
        username: Option<&CStr>,
        password: Option<&CStr>,
        locale: i32,
        force_property_refresh: bool,
        connect_timeout_ms: u32,
        expert_enum: &mut RawHandle,
        session: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        state.last_session = Some(SessionRecord {
            target: String::from_utf8_lossy(target.to_bytes()).into_owned(),
            username: owned(username),
            password: owned(password),
            locale,
            force_property_refresh,
            connect_timeout_ms,
        });
        if let Some(code) = state.enter("initialize_session", RawHandle::NULL) {
            return Ok(code);
        }
        if !state.null_session {
            *session = state.allocate(Object::Session);
        }
        let experts: Vec<Item> = state.experts.iter().cloned().map(Item::Expert).collect();
        *expert_enum = state.cursor(experts);
        Ok(status::OK)
    }

    fn close_handle(&self, handle: RawHandle) -> FfiResult<i32> {
        let mut state = self.state();
        state.closed.push(handle);
        if let Some(code) = state.enter("close_handle", handle) {
            return Ok(code);
        }
        Ok(match state.objects.remove(&handle) {
            Some(_) => status::OK,
            None => status::INVALID_HANDLE,
        })
    }

    fn get_status_description(
        &self,
        session: RawHandle,
        status: i32,
        description: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_status_description", session) {
            return Ok(code);
        }
        match state.descriptions.get(&status).cloned() {
            Some(text) => {
                state.detail(description, &text);
                Ok(status::OK)
            }
            None => Ok(status::INVALID_ARG),
        }
    }

    fn free_detailed_string(&self, text: DetailedString) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("free_detailed_string", RawHandle::NULL) {
            return Ok(code);
        }
        let raw = text.into_raw();
        if !raw.is_null() {
            // Safety: every non-null detailed string was produced by
            // `CString::into_raw` in `State::detail`.
            drop(unsafe { CString::from_raw(raw) });
            state.outstanding_strings = state.outstanding_strings.saturating_sub(1);
        }
        Ok(status::OK)
    }

    fn timestamp_from_values(
        &self,
        seconds_since_1970: u64,
        fractional_seconds: f64,
        timestamp: &mut Timestamp,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("timestamp_from_values", RawHandle::NULL) {
            return Ok(code);
        }
        let fraction = fractional_seconds.to_bits();
        timestamp.words = [
            seconds_since_1970 as u32,
            (seconds_since_1970 >> 32) as u32,
            fraction as u32,
            (fraction >> 32) as u32,
        ];
        Ok(status::OK)
    }

    fn values_from_timestamp(
        &self,
        timestamp: &Timestamp,
        seconds_since_1970: &mut u64,
        fractional_seconds: &mut f64,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("values_from_timestamp", RawHandle::NULL) {
            return Ok(code);
        }
        let [s0, s1, f0, f1] = timestamp.words;
        *seconds_since_1970 = u64::from(s0) | (u64::from(s1) << 32);
        *fractional_seconds = f64::from_bits(u64::from(f0) | (u64::from(f1) << 32));
        Ok(status::OK)
    }

    fn get_system_experts(
        &self,
        session: RawHandle,
        expert_names: &CStr,
        expert_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_system_experts", session) {
            return Ok(code);
        }
        let wanted = String::from_utf8_lossy(expert_names.to_bytes()).into_owned();
        let wanted: Vec<&str> = wanted
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        let experts: Vec<Item> = state
            .experts
            .iter()
            .filter(|e| wanted.is_empty() || wanted.contains(&e.name.as_str()))
            .cloned()
            .map(Item::Expert)
            .collect();
        *expert_enum = state.cursor(experts);
        Ok(status::OK)
    }

    fn set_remote_timeout(&self, session: RawHandle, timeout_ms: u32) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("set_remote_timeout", session) {
            return Ok(code);
        }
        state.remote_timeout_ms = Some(timeout_ms);
        Ok(status::OK)
    }

    fn find_hardware(
        &self,
        session: RawHandle,
        filter_mode: i32,
        filter: RawHandle,
        expert_names: Option<&CStr>,
        resource_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        state.last_find = Some((filter_mode, owned(expert_names)));
        if let Some(code) = state.enter("find_hardware", session) {
            return Ok(code);
        }
        if !(1..=4).contains(&filter_mode) {
            return Ok(status::INVALID_FILTER_MODE);
        }
        let criteria = match state.objects.get(&filter) {
            Some(Object::Filter(props)) => props.clone(),
            _ if filter.is_null() => HashMap::new(),
            _ => return Ok(status::INVALID_HANDLE),
        };
        let found: Vec<Item> = state
            .resources
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.deleted && matches(filter_mode, &criteria, r))
            .map(|(index, _)| Item::Resource(index))
            .collect();
        *resource_enum = state.cursor(found);
        Ok(status::OK)
    }

    fn find_systems(
        &self,
        session: RawHandle,
        _device_class: Option<&CStr>,
        _detect_online_systems: bool,
        _cache_mode: i32,
        _name_format: i32,
        _timeout_ms: u32,
        _only_installable_systems: bool,
        system_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("find_systems", session) {
            return Ok(code);
        }
        let systems: Vec<Item> = state.systems.iter().cloned().map(Item::System).collect();
        *system_enum = state.cursor(systems);
        Ok(status::OK)
    }

    fn restart(
        &self,
        session: RawHandle,
        _wait_for_restart: bool,
        _install_mode: bool,
        _flush_dns: bool,
        _timeout_ms: u32,
        new_ip_address: &mut [u8],
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("restart", session) {
            return Ok(code);
        }
        write_str(new_ip_address, state.restart_ip.as_bytes())?;
        Ok(status::OK)
    }

    fn get_installed_software_components(
        &self,
        session: RawHandle,
        _item_types: i32,
        _cached: bool,
        component_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_installed_software_components", session) {
            return Ok(code);
        }
        let components: Vec<Item> = state
            .components
            .iter()
            .cloned()
            .map(Item::Component)
            .collect();
        *component_enum = state.cursor(components);
        Ok(status::OK)
    }

    fn get_feeds(
        &self,
        session: RawHandle,
        _platform: Option<&CStr>,
        _cached: bool,
        feed_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_feeds", session) {
            return Ok(code);
        }
        let feeds: Vec<Item> = state.feeds.iter().cloned().map(Item::Feed).collect();
        *feed_enum = state.cursor(feeds);
        Ok(status::OK)
    }

    fn install_all(
        &self,
        session: RawHandle,
        _auto_restart: bool,
        _deselect_conflicts: bool,
        installed_enum: &mut RawHandle,
        broken_dependency_enum: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("install_all", session) {
            return Ok(code);
        }
        let installed: Vec<Item> = state
            .components
            .iter()
            .cloned()
            .map(Item::Component)
            .collect();
        let broken: Vec<Item> = state
            .broken_dependencies
            .iter()
            .cloned()
            .map(Item::Dependency)
            .collect();
        *installed_enum = state.cursor(installed);
        *broken_dependency_enum = state.cursor(broken);
        Ok(status::OK)
    }

    fn get_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_system_property", session) {
            return Ok(code);
        }
        let stored = state.system_properties.get(&property).cloned();
        state.read(stored, value)
    }

    fn set_system_property(
        &self,
        session: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("set_system_property", session) {
            return Ok(code);
        }
        state
            .system_properties
            .insert(property, MockValue::from_in(value));
        Ok(status::OK)
    }

    fn create_filter(&self, session: RawHandle, filter: &mut RawHandle) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("create_filter", session) {
            return Ok(code);
        }
        *filter = state.allocate(Object::Filter(HashMap::new()));
        Ok(status::OK)
    }

    fn set_filter_property(
        &self,
        filter: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("set_filter_property", filter) {
            return Ok(code);
        }
        match state.objects.get_mut(&filter) {
            Some(Object::Filter(props)) => {
                props.insert(property, MockValue::from_in(value));
                Ok(status::OK)
            }
            _ => Ok(status::INVALID_HANDLE),
        }
    }

    fn get_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_resource_property", resource) {
            return Ok(code);
        }
        let Some(index) = state.resource_index(resource) else {
            return Ok(status::INVALID_HANDLE);
        };
        let stored = state.resources[index].properties.get(&property).cloned();
        state.read(stored, value)
    }

    fn set_resource_property(
        &self,
        resource: RawHandle,
        property: i32,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("set_resource_property", resource) {
            return Ok(code);
        }
        let Some(index) = state.resource_index(resource) else {
            return Ok(status::INVALID_HANDLE);
        };
        let target = &mut state.resources[index];
        if target.read_only.contains(&property) {
            return Ok(status::READ_ONLY_PROPERTY);
        }
        target
            .properties
            .insert(property, MockValue::from_in(value));
        Ok(status::OK)
    }

    fn get_resource_indexed_property(
        &self,
        resource: RawHandle,
        property: i32,
        index: u32,
        value: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("get_resource_indexed_property", resource) {
            return Ok(code);
        }
        let Some(resource) = state.resource_index(resource) else {
            return Ok(status::INVALID_HANDLE);
        };
        let stored = state.resources[resource]
            .indexed
            .get(&property)
            .and_then(|values| values.get(index as usize))
            .cloned();
        state.read(stored, value)
    }

    fn save_resource_changes(
        &self,
        resource: RawHandle,
        restart_required: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("save_resource_changes", resource) {
            return Ok(code);
        }
        *restart_required = state.restart_required;
        state.detail(detailed_result, "changes saved");
        Ok(if state.restart_required {
            status::RESTART_REQUIRED
        } else {
            status::OK
        })
    }

    fn self_test_hardware(
        &self,
        resource: RawHandle,
        _mode: u32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("self_test_hardware", resource) {
            return Ok(code);
        }
        state.detail(detailed_result, "self test passed");
        Ok(status::OK)
    }

    fn self_calibrate_hardware(
        &self,
        resource: RawHandle,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("self_calibrate_hardware", resource) {
            return Ok(code);
        }
        state.detail(detailed_result, "self calibration complete");
        Ok(status::OK)
    }

    fn reset_hardware(&self, resource: RawHandle, _mode: u32) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("reset_hardware", resource) {
            return Ok(code);
        }
        Ok(status::OK)
    }

    fn rename_resource(
        &self,
        resource: RawHandle,
        new_name: &CStr,
        overwrite_conflict: bool,
        _update_dependencies: bool,
        name_already_existed: &mut bool,
        overwritten_resource: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("rename_resource", resource) {
            return Ok(code);
        }
        let Some(index) = state.resource_index(resource) else {
            return Ok(status::INVALID_HANDLE);
        };
        let new_name = String::from_utf8_lossy(new_name.to_bytes()).into_owned();
        let conflict = state
            .resources
            .iter()
            .position(|r| !r.deleted && r.name == new_name);
        *name_already_existed = conflict.is_some_and(|other| other != index);
        match conflict {
            Some(other) if other != index => {
                if !overwrite_conflict {
                    return Ok(status::OK);
                }
                *overwritten_resource = state.allocate(Object::Resource(other));
                state.resources[other].name.clear();
            }
            _ => *overwritten_resource = RawHandle::NULL,
        }
        state.resources[index].name = new_name;
        Ok(status::OK)
    }

    fn delete_resource(
        &self,
        resource: RawHandle,
        mode: i32,
        dependent_items_deleted: &mut bool,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("delete_resource", resource) {
            return Ok(code);
        }
        let Some(index) = state.resource_index(resource) else {
            return Ok(status::INVALID_HANDLE);
        };
        let has_dependents = state.resources[index].has_dependents;
        // -1 validates only, 0 refuses when dependents exist, 1 deletes
        // dependents too, 2 keeps them.
        if mode == 0 && has_dependents {
            state.detail(detailed_result, "resource has dependents");
            return Ok(status::HAS_DEPENDENCIES);
        }
        if mode != -1 {
            state.resources[index].deleted = true;
        }
        *dependent_items_deleted = mode == 1 && has_dependents;
        state.detail(detailed_result, "resource deleted");
        Ok(status::OK)
    }

    fn upgrade_firmware_from_file(
        &self,
        resource: RawHandle,
        firmware_file: &CStr,
        _auto_stop_tasks: bool,
        _always_overwrite: bool,
        _wait_for_operation: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("upgrade_firmware_from_file", resource) {
            return Ok(code);
        }
        *firmware_status = state.firmware_status;
        let text = format!(
            "firmware {} applied",
            String::from_utf8_lossy(firmware_file.to_bytes())
        );
        state.detail(detailed_result, &text);
        Ok(status::OK)
    }

    fn erase_firmware(
        &self,
        resource: RawHandle,
        _auto_stop_tasks: bool,
        firmware_status: &mut i32,
        detailed_result: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("erase_firmware", resource) {
            return Ok(code);
        }
        *firmware_status = state.firmware_status;
        state.detail(detailed_result, "firmware erased");
        Ok(status::OK)
    }

    fn next_resource(
        &self,
        _session: RawHandle,
        resource_enum: RawHandle,
        resource: &mut RawHandle,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_resource", resource_enum) {
            return Ok(code);
        }
        match state.pop(resource_enum) {
            Ok(Some(Item::Resource(index))) => {
                *resource = state.allocate(Object::Resource(index));
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }

    fn next_expert_info(
        &self,
        expert_enum: RawHandle,
        name: &mut [u8],
        display_name: &mut [u8],
        version: &mut [u8],
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_expert_info", expert_enum) {
            return Ok(code);
        }
        match state.pop(expert_enum) {
            Ok(Some(Item::Expert(expert))) => {
                write_str(name, expert.name.as_bytes())?;
                write_str(display_name, expert.display_name.as_bytes())?;
                write_str(version, expert.version.as_bytes())?;
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }

    fn next_system_info(&self, system_enum: RawHandle, system: &mut [u8]) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_system_info", system_enum) {
            return Ok(code);
        }
        match state.pop(system_enum) {
            Ok(Some(Item::System(name))) => {
                write_str(system, name.as_bytes())?;
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }

    fn next_component_info(
        &self,
        component_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
        item_type: &mut i32,
        detailed_description: &mut DetailedString,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_component_info", component_enum) {
            return Ok(code);
        }
        match state.pop(component_enum) {
            Ok(Some(Item::Component(component))) => {
                write_str(id, component.id.as_bytes())?;
                write_str(version, component.version.as_bytes())?;
                write_str(title, component.title.as_bytes())?;
                *item_type = component.item_type;
                state.detail(detailed_description, &component.detail);
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }

    fn next_dependency_info(
        &self,
        dependency_enum: RawHandle,
        id: &mut [u8],
        version: &mut [u8],
        title: &mut [u8],
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_dependency_info", dependency_enum) {
            return Ok(code);
        }
        match state.pop(dependency_enum) {
            Ok(Some(Item::Dependency(dependency))) => {
                write_str(id, dependency.id.as_bytes())?;
                write_str(version, dependency.version.as_bytes())?;
                write_str(title, dependency.title.as_bytes())?;
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }

    fn next_feed(
        &self,
        feed_enum: RawHandle,
        name: &mut [u8],
        uri: &mut [u8],
        enabled: &mut bool,
        trusted: &mut bool,
    ) -> FfiResult<i32> {
        let mut state = self.state();
        if let Some(code) = state.enter("next_feed", feed_enum) {
            return Ok(code);
        }
        match state.pop(feed_enum) {
            Ok(Some(Item::Feed(feed))) => {
                write_str(name, feed.name.as_bytes())?;
                write_str(uri, feed.uri.as_bytes())?;
                *enabled = feed.enabled;
                *trusted = feed.trusted;
                Ok(status::OK)
            }
            Ok(None) => Ok(status::END_OF_ENUM),
            Ok(Some(_)) => Ok(status::INVALID_HANDLE),
            Err(code) => Ok(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string_buffer;
    use pretty_assertions::assert_eq;

    fn session(mock: &MockNative) -> RawHandle {
        let target = CString::new("localhost").unwrap();
        let (mut experts, mut session) = (RawHandle::NULL, RawHandle::NULL);
        let code = mock
            .initialize_session(&target, None, None, 0, false, 1000, &mut experts, &mut session)
            .unwrap();
        assert_eq!(code, status::OK);
        session
    }

    #[test]
    fn test_filter_all_matches_equal_values() {
        let mock = MockNative::new();
        mock.add_resource(MockResource::new("a").with(7, MockValue::Int(1)));
        mock.add_resource(MockResource::new("b").with(7, MockValue::Int(0)));
        let session = session(&mock);

        let mut filter = RawHandle::NULL;
        mock.create_filter(session, &mut filter).unwrap();
        mock.set_filter_property(filter, 7, PropertyIn::Int(1)).unwrap();

        let mut found = RawHandle::NULL;
        mock.find_hardware(session, 1, filter, None, &mut found).unwrap();
        let mut resource = RawHandle::NULL;
        assert_eq!(
            mock.next_resource(session, found, &mut resource).unwrap(),
            status::OK
        );
        assert_eq!(
            mock.next_resource(session, found, &mut resource).unwrap(),
            status::END_OF_ENUM
        );
    }

    #[test]
    fn test_missing_property_is_not_implemented() {
        let mock = MockNative::new();
        let index = mock.add_resource(MockResource::new("a"));
        let session = session(&mock);
        let mut found = RawHandle::NULL;
        mock.find_hardware(session, 1, RawHandle::NULL, None, &mut found)
            .unwrap();
        let mut resource = RawHandle::NULL;
        mock.next_resource(session, found, &mut resource).unwrap();

        let mut value = 0;
        let code = mock
            .get_resource_property(resource, 99, PropertyOut::Int(&mut value))
            .unwrap();
        assert_eq!(code, status::PROP_DOES_NOT_EXIST);
        assert_eq!(mock.resource(index).unwrap().name, "a");
    }

    #[test]
    fn test_failure_injection_and_call_log() {
        let mock = MockNative::new();
        let session = session(&mock);
        mock.fail_once("set_remote_timeout", status::TIMED_OUT);
        assert_eq!(
            mock.set_remote_timeout(session, 5).unwrap(),
            status::TIMED_OUT
        );
        assert_eq!(mock.set_remote_timeout(session, 5).unwrap(), status::OK);
        assert_eq!(mock.count("set_remote_timeout"), 2);
        assert_eq!(mock.remote_timeout_ms(), Some(5));
    }

    #[test]
    fn test_detailed_strings_are_tracked() {
        let mock = MockNative::new();
        mock.describe(status::FAIL, "it broke");
        let session = session(&mock);
        let mut text = DetailedString::null();
        mock.get_status_description(session, status::FAIL, &mut text)
            .unwrap();
        assert_eq!(text.to_bytes().unwrap(), b"it broke".to_vec());
        assert_eq!(mock.outstanding_strings(), 1);
        mock.free_detailed_string(text).unwrap();
        assert_eq!(mock.outstanding_strings(), 0);
    }

    #[test]
    fn test_restart_writes_ip() {
        let mock = MockNative::new();
        mock.set_restart_ip("10.0.0.7");
        let session = session(&mock);
        let mut buffer = string_buffer();
        mock.restart(session, true, false, false, 0, &mut buffer).unwrap();
        assert_eq!(&buffer[..9], b"10.0.0.7\0");
    }
}
