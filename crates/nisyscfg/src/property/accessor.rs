//! Reads and writes properties through the native getters and setters.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;
use nisyscfg_sys::{
    status, string_buffer, FfiResult, NativeApi, PropertyIn, PropertyOut, RawHandle, Timestamp,
};

use crate::context::Context;
use crate::error::{SysCfgError, SysCfgResult};
use crate::ownership::NodeId;
use crate::property::descriptor::{
    Access, IndexedProperty, Property, PropertyBag, PropertyDescriptor, PropertyId, Shape,
    ValueKind, Wire,
};
use crate::property::value::{PropertyValue, RawValue, Value};

/// Indices at or above this limit are rejected without a native call.
pub const MAX_INDEX: u32 = 4096;

/// The native getter/setter family of one kind of object.
pub(crate) trait PropertyTarget: Sync {
    fn get(
        &self,
        _api: &dyn NativeApi,
        _handle: RawHandle,
        _id: PropertyId,
        _out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        Ok(status::NOT_IMPLEMENTED)
    }

    fn set(
        &self,
        _api: &dyn NativeApi,
        _handle: RawHandle,
        _id: PropertyId,
        _value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        Ok(status::NOT_IMPLEMENTED)
    }

    fn get_indexed(
        &self,
        _api: &dyn NativeApi,
        _handle: RawHandle,
        _id: PropertyId,
        _index: u32,
        _out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        Ok(status::NOT_IMPLEMENTED)
    }
}

pub(crate) struct ResourceTarget;

impl PropertyTarget for ResourceTarget {
    fn get(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        api.get_resource_property(handle, id, out)
    }

    fn set(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        api.set_resource_property(handle, id, value)
    }

    fn get_indexed(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        index: u32,
        out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        api.get_resource_indexed_property(handle, id, index, out)
    }
}

/// Filters are write-only.
pub(crate) struct FilterTarget;

impl PropertyTarget for FilterTarget {
    fn set(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        api.set_filter_property(handle, id, value)
    }
}

pub(crate) struct SystemTarget;

impl PropertyTarget for SystemTarget {
    fn get(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        api.get_system_property(handle, id, out)
    }

    fn set(
        &self,
        api: &dyn NativeApi,
        handle: RawHandle,
        id: PropertyId,
        value: PropertyIn<'_>,
    ) -> FfiResult<i32> {
        api.set_system_property(handle, id, value)
    }
}

/// Property access for one native object.
///
/// Counts of indexed properties found by probing are memoized per
/// accessor; counts read from a count property are not.
pub struct PropertyAccessor {
    ctx: Rc<Context>,
    node: NodeId,
    object: &'static str,
    target: &'static dyn PropertyTarget,
    counts: RefCell<HashMap<PropertyId, u32>>,
}

impl PropertyAccessor {
    pub(crate) fn new(
        ctx: &Rc<Context>,
        node: NodeId,
        object: &'static str,
        target: &'static dyn PropertyTarget,
    ) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            node,
            object,
            target,
            counts: RefCell::new(HashMap::new()),
        }
    }

    fn handle(&self) -> SysCfgResult<RawHandle> {
        self.ctx
            .handle(self.node)
            .ok_or(SysCfgError::Closed {
                object: self.object,
            })
    }

    fn fetch(
        &self,
        handle: RawHandle,
        id: PropertyId,
        index: Option<u32>,
        out: PropertyOut<'_>,
    ) -> FfiResult<i32> {
        let api = self.ctx.api();
        match index {
            None => self.target.get(api, handle, id, out),
            Some(index) => self.target.get_indexed(api, handle, id, index, out),
        }
    }

    fn read_raw(&self, d: &PropertyDescriptor, index: Option<u32>) -> SysCfgResult<RawValue> {
        let handle = self.handle()?;
        let operation = d.name;
        match d.kind.wire() {
            Wire::Int => {
                let mut value = 0i32;
                let result = self.fetch(handle, d.id, index, PropertyOut::Int(&mut value));
                self.ctx.check(operation, result)?;
                Ok(RawValue::Int(value))
            }
            Wire::UInt => {
                let mut value = 0u32;
                let result = self.fetch(handle, d.id, index, PropertyOut::UInt(&mut value));
                self.ctx.check(operation, result)?;
                Ok(RawValue::UInt(value))
            }
            Wire::Double => {
                let mut value = 0f64;
                let result = self.fetch(handle, d.id, index, PropertyOut::Double(&mut value));
                self.ctx.check(operation, result)?;
                Ok(RawValue::Double(value))
            }
            Wire::Str => {
                let mut buffer = string_buffer();
                let result = self.fetch(handle, d.id, index, PropertyOut::Str(&mut buffer));
                self.ctx.check(operation, result)?;
                Ok(RawValue::Text(self.ctx.decode_buffer(&buffer)))
            }
            Wire::Timestamp => {
                let mut value = Timestamp::BLANK;
                let result = self.fetch(handle, d.id, index, PropertyOut::Timestamp(&mut value));
                self.ctx.check(operation, result)?;
                Ok(RawValue::Time(self.ctx.from_native_timestamp(&value)?))
            }
        }
    }

    fn write_raw(&self, d: &PropertyDescriptor, value: RawValue) -> SysCfgResult<()> {
        let handle = self.handle()?;
        let api = self.ctx.api();
        let send = |value: PropertyIn<'_>| self.target.set(api, handle, d.id, value);
        let result = match value {
            RawValue::Int(v) => send(PropertyIn::Int(v)),
            RawValue::UInt(v) => send(PropertyIn::UInt(v)),
            RawValue::Double(v) => send(PropertyIn::Double(v)),
            RawValue::Text(text) => {
                let text = self.ctx.encode(&text)?;
                send(PropertyIn::Str(&text))
            }
            RawValue::Time(time) => {
                let timestamp = self.ctx.to_native_timestamp(time)?;
                send(PropertyIn::Timestamp(&timestamp))
            }
        };
        self.ctx.check(d.name, result)?;
        Ok(())
    }

    fn ensure_readable(&self, d: &PropertyDescriptor) -> SysCfgResult<()> {
        if d.access.is_readable() {
            Ok(())
        } else {
            Err(SysCfgError::WriteOnly { property: d.name })
        }
    }

    fn ensure_writable(&self, d: &PropertyDescriptor) -> SysCfgResult<()> {
        if d.access.is_writable() {
            Ok(())
        } else {
            Err(SysCfgError::ReadOnly { property: d.name })
        }
    }

    pub fn get<B: PropertyBag, T: PropertyValue>(&self, property: Property<B, T>) -> SysCfgResult<T> {
        let d = property.into_descriptor();
        self.ensure_readable(&d)?;
        T::from_raw(self.read_raw(&d, None)?, d.name)
    }

    pub fn set<B: PropertyBag, T: PropertyValue>(
        &self,
        property: Property<B, T>,
        value: T,
    ) -> SysCfgResult<()> {
        let d = property.into_descriptor();
        self.ensure_writable(&d)?;
        self.write_raw(&d, value.into_raw())
    }

    /// Reads a property, returning `default` only when the property is not
    /// implemented for this object.
    pub fn get_or<B: PropertyBag, T: PropertyValue>(
        &self,
        property: Property<B, T>,
        default: T,
    ) -> SysCfgResult<T> {
        match self.get(property) {
            Err(e) if e.is_property_not_implemented() => Ok(default),
            other => other,
        }
    }

    pub fn get_value(&self, d: &PropertyDescriptor) -> SysCfgResult<Value> {
        self.ensure_readable(d)?;
        if d.is_indexed() {
            return Err(SysCfgError::TypeMismatch {
                property: d.name,
                expected: "indexed access",
                actual: "scalar access",
            });
        }
        Value::from_raw(d, self.read_raw(d, None)?)
    }

    pub fn set_value(&self, d: &PropertyDescriptor, value: Value) -> SysCfgResult<()> {
        self.ensure_writable(d)?;
        let raw = value.into_raw(d)?;
        self.write_raw(d, raw)
    }

    fn read_indexed(&self, d: &PropertyDescriptor, index: u32) -> SysCfgResult<RawValue> {
        if index >= MAX_INDEX {
            return Err(SysCfgError::IndexOutOfRange {
                property: d.name,
                index,
                limit: MAX_INDEX,
            });
        }
        self.read_raw(d, Some(index)).map_err(|e| {
            if e.is_property_not_implemented() {
                SysCfgError::IndexExhausted {
                    property: d.name,
                    index,
                }
            } else {
                e
            }
        })
    }

    pub fn get_indexed<B: PropertyBag, T: PropertyValue>(
        &self,
        property: IndexedProperty<B, T>,
        index: u32,
    ) -> SysCfgResult<T> {
        let d = property.into_descriptor();
        T::from_raw(self.read_indexed(&d, index)?, d.name)
    }

    pub fn get_indexed_value(&self, d: &PropertyDescriptor, index: u32) -> SysCfgResult<Value> {
        Value::from_raw(d, self.read_indexed(d, index)?)
    }

    /// Number of values of an indexed property.
    ///
    /// Reads the count property when there is one. Otherwise, or when the
    /// count property is not implemented, probes indices from 0 up to the
    /// first one that is not implemented.
    pub fn count_of(&self, d: &PropertyDescriptor) -> SysCfgResult<u32> {
        let Shape::Indexed { count } = d.shape else {
            return Ok(1);
        };
        if let Some(count) = count {
            let counter = PropertyDescriptor {
                name: count.name,
                id: count.id,
                kind: ValueKind::Int,
                access: Access::ReadOnly,
                shape: Shape::Scalar,
            };
            match self.read_raw(&counter, None) {
                Ok(RawValue::Int(n)) => return Ok(u32::try_from(n).unwrap_or(0).min(MAX_INDEX)),
                Ok(_) => {}
                Err(e) if e.is_property_not_implemented() => {
                    debug!("{} not implemented, probing {}", count.name, d.name);
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(n) = self.counts.borrow().get(&d.id) {
            return Ok(*n);
        }
        let mut n = 0;
        while n < MAX_INDEX {
            match self.read_raw(d, Some(n)) {
                Ok(_) => n += 1,
                Err(e) if e.is_property_not_implemented() => break,
                Err(e) => return Err(e),
            }
        }
        self.counts.borrow_mut().insert(d.id, n);
        Ok(n)
    }

    pub fn count<B: PropertyBag, T: PropertyValue>(
        &self,
        property: IndexedProperty<B, T>,
    ) -> SysCfgResult<u32> {
        self.count_of(&property.into_descriptor())
    }

    pub fn get_all_indexed<B: PropertyBag, T: PropertyValue>(
        &self,
        property: IndexedProperty<B, T>,
    ) -> SysCfgResult<Vec<T>> {
        let n = self.count(property)?;
        (0..n).map(|i| self.get_indexed(property, i)).collect()
    }

    /// Reads a property that holds another native handle.
    pub(crate) fn get_handle(&self, name: &'static str, id: PropertyId) -> SysCfgResult<RawHandle> {
        let handle = self.handle()?;
        let mut value = RawHandle::NULL;
        let result = self
            .target
            .get(self.ctx.api(), handle, id, PropertyOut::Handle(&mut value));
        self.ctx.check(name, result)?;
        Ok(value)
    }
}
