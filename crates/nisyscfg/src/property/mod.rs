//! Typed property access.
//!
//! - [`descriptor`]: declarative descriptors, bags and symbol tables
//! - [`value`]: conversions between Rust values and native values
//! - [`accessor`]: reads and writes through the native getters/setters
//! - [`host`]: the traits objects implement to expose bags

pub mod accessor;
pub mod descriptor;
pub mod host;
pub mod value;

pub use accessor::{PropertyAccessor, MAX_INDEX};
pub use descriptor::{
    Access, CountRef, IndexedProperty, Property, PropertyBag, PropertyDescriptor, PropertyId,
    Shape, SymbolTable, ValueKind,
};
pub use host::{ExpertView, IndexedPropertyHost, PropertyHost};
pub use value::{FlagSet, PropertyValue, RawValue, Symbolic, Value};
