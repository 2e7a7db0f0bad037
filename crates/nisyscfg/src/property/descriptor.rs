//! Declarative property descriptors.
//!
//! A descriptor records everything needed to marshal one property: its
//! native ID, value type, access mode and whether it is indexed. Bags are
//! static tables of descriptors; typed [`Property`] constants carry the bag
//! and the Rust value type at compile time.

use std::fmt;
use std::marker::PhantomData;

use crate::property::value::PropertyValue;

/// Native property identifier.
pub type PropertyId = i32;

/// The value type of a property.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind {
    Bool,
    Int,
    UnsignedInt,
    Double,
    String,
    Timestamp,
    /// A symbolic enum carried as `int`.
    Enum(fn() -> &'static SymbolTable),
    /// A set of flags carried as `int`.
    Bitmask(fn() -> &'static SymbolTable),
}

/// How a value crosses the native boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wire {
    Int,
    UInt,
    Double,
    Str,
    Timestamp,
}

impl ValueKind {
    pub(crate) fn wire(&self) -> Wire {
        match self {
            ValueKind::Bool | ValueKind::Int | ValueKind::Enum(_) | ValueKind::Bitmask(_) => {
                Wire::Int
            }
            ValueKind::UnsignedInt => Wire::UInt,
            ValueKind::Double => Wire::Double,
            ValueKind::String => Wire::Str,
            ValueKind::Timestamp => Wire::Timestamp,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::UnsignedInt => "unsigned int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Enum(table) | ValueKind::Bitmask(table) => table().type_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn is_readable(&self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

/// The scalar property holding the number of values of an indexed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRef {
    pub name: &'static str,
    pub id: PropertyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Indexed { count: Option<CountRef> },
}

/// One entry of a property bag.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub id: PropertyId,
    pub kind: ValueKind,
    pub access: Access,
    pub shape: Shape,
}

impl PropertyDescriptor {
    pub fn is_indexed(&self) -> bool {
        matches!(self.shape, Shape::Indexed { .. })
    }
}

/// A static table of property descriptors.
pub trait PropertyBag: 'static {
    /// Bag name, used in errors.
    const NAME: &'static str;

    fn catalog() -> &'static [PropertyDescriptor];

    /// Finds a descriptor by name. Matching ignores case and underscores,
    /// so `"VENDOR_ID"` and `"VendorId"` both resolve.
    fn find(name: &str) -> Option<&'static PropertyDescriptor> {
        Self::catalog().iter().find(|d| same_name(d.name, name))
    }
}

fn same_name(declared: &str, requested: &str) -> bool {
    let mut a = declared.chars().filter(|c| *c != '_');
    let mut b = requested.chars().filter(|c| *c != '_');
    loop {
        match (a.next(), b.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x.eq_ignore_ascii_case(&y) => continue,
            _ => return false,
        }
    }
}

/// A scalar property of bag `B` holding values of type `T`.
pub struct Property<B, T> {
    pub name: &'static str,
    pub id: PropertyId,
    pub access: Access,
    _marker: PhantomData<fn() -> (B, T)>,
}

impl<B: PropertyBag, T: PropertyValue> Property<B, T> {
    pub const fn new(name: &'static str, id: PropertyId, access: Access) -> Self {
        Self {
            name,
            id,
            access,
            _marker: PhantomData,
        }
    }

    pub const fn into_descriptor(self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name,
            id: self.id,
            kind: T::KIND,
            access: self.access,
            shape: Shape::Scalar,
        }
    }
}

impl<B, T> Clone for Property<B, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B, T> Copy for Property<B, T> {}

impl<B, T> fmt::Debug for Property<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property({}, {})", self.name, self.id)
    }
}

/// An indexed property of bag `B` holding values of type `T`.
pub struct IndexedProperty<B, T> {
    pub name: &'static str,
    pub id: PropertyId,
    pub count: Option<CountRef>,
    _marker: PhantomData<fn() -> (B, T)>,
}

impl<B: PropertyBag, T: PropertyValue> IndexedProperty<B, T> {
    pub const fn new(name: &'static str, id: PropertyId, count: Option<CountRef>) -> Self {
        Self {
            name,
            id,
            count,
            _marker: PhantomData,
        }
    }

    pub const fn into_descriptor(self) -> PropertyDescriptor {
        PropertyDescriptor {
            name: self.name,
            id: self.id,
            kind: T::KIND,
            access: Access::ReadOnly,
            shape: Shape::Indexed { count: self.count },
        }
    }
}

impl<B, T> Clone for IndexedProperty<B, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B, T> Copy for IndexedProperty<B, T> {}

impl<B, T> fmt::Debug for IndexedProperty<B, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IndexedProperty({}, {})", self.name, self.id)
    }
}

/// Names and values of a symbolic enum or flag set.
#[derive(Debug)]
pub struct SymbolTable {
    pub type_name: &'static str,
    pub entries: &'static [(&'static str, i32)],
}

impl SymbolTable {
    /// Returns the symbol of an enum value.
    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    /// Returns the value of a symbol (case-insensitive).
    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|(n, _)| same_name(n, name))
            .map(|(_, v)| *v)
    }

    /// Returns every declared flag whose bits are all set in `bits`, in
    /// declaration order. Zero-valued entries never match.
    pub fn flags(&self, bits: i32) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|(_, v)| *v != 0 && bits & *v == *v)
            .map(|(name, _)| *name)
            .collect()
    }
}
