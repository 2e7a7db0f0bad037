//! Property hosts.
//!
//! A host is any object that exposes a bag of properties. The generic
//! methods take typed property constants; the per-bag attribute traits
//! generated by `property_bag!` add named accessors and are implemented
//! for every host of that bag.

use std::marker::PhantomData;

use crate::error::{SysCfgError, SysCfgResult};
use crate::property::accessor::PropertyAccessor;
use crate::property::descriptor::{IndexedProperty, Property, PropertyBag};
use crate::property::value::{PropertyValue, Value};

pub trait PropertyHost<B: PropertyBag> {
    #[doc(hidden)]
    fn accessor(&self) -> &PropertyAccessor;

    fn get<T: PropertyValue>(&self, property: Property<B, T>) -> SysCfgResult<T> {
        self.accessor().get(property)
    }

    fn set<T: PropertyValue>(&self, property: Property<B, T>, value: T) -> SysCfgResult<()> {
        self.accessor().set(property, value)
    }

    /// Reads `property`, or returns `default` if it is not implemented.
    fn get_or<T: PropertyValue>(&self, property: Property<B, T>, default: T) -> SysCfgResult<T> {
        self.accessor().get_or(property, default)
    }

    /// Reads a property by name.
    fn get_value(&self, name: &str) -> SysCfgResult<Value> {
        let d = B::find(name).ok_or_else(|| SysCfgError::UnknownProperty {
            bag: B::NAME,
            name: name.to_string(),
        })?;
        self.accessor().get_value(d)
    }

    /// Writes a property by name.
    fn set_value(&self, name: &str, value: Value) -> SysCfgResult<()> {
        let d = B::find(name).ok_or_else(|| SysCfgError::UnknownProperty {
            bag: B::NAME,
            name: name.to_string(),
        })?;
        self.accessor().set_value(d, value)
    }
}

pub trait IndexedPropertyHost<B: PropertyBag> {
    #[doc(hidden)]
    fn indexed_accessor(&self) -> &PropertyAccessor;

    fn get_indexed<T: PropertyValue>(
        &self,
        property: IndexedProperty<B, T>,
        index: u32,
    ) -> SysCfgResult<T> {
        self.indexed_accessor().get_indexed(property, index)
    }

    fn count<T: PropertyValue>(&self, property: IndexedProperty<B, T>) -> SysCfgResult<u32> {
        self.indexed_accessor().count(property)
    }

    fn get_all<T: PropertyValue>(&self, property: IndexedProperty<B, T>) -> SysCfgResult<Vec<T>> {
        self.indexed_accessor().get_all_indexed(property)
    }

    fn get_indexed_value(&self, name: &str, index: u32) -> SysCfgResult<Value> {
        let d = B::find(name).ok_or_else(|| SysCfgError::UnknownProperty {
            bag: B::NAME,
            name: name.to_string(),
        })?;
        self.indexed_accessor().get_indexed_value(d, index)
    }
}

/// An expert's properties on an object, sharing the object's accessor.
pub struct ExpertView<'a, B> {
    accessor: &'a PropertyAccessor,
    _bag: PhantomData<fn() -> B>,
}

impl<'a, B: PropertyBag> ExpertView<'a, B> {
    pub(crate) fn new(accessor: &'a PropertyAccessor) -> Self {
        Self {
            accessor,
            _bag: PhantomData,
        }
    }
}

impl<B: PropertyBag> PropertyHost<B> for ExpertView<'_, B> {
    fn accessor(&self) -> &PropertyAccessor {
        self.accessor
    }
}
