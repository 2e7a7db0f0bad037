//! Conversions between Rust values and native property values.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{SysCfgError, SysCfgResult};
use crate::property::descriptor::{PropertyDescriptor, SymbolTable, ValueKind, Wire};

/// A value as it crosses the native boundary, before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Int(i32),
    UInt(u32),
    Double(f64),
    Text(String),
    Time(DateTime<Utc>),
}

impl RawValue {
    fn type_name(&self) -> &'static str {
        match self {
            RawValue::Int(_) => "int",
            RawValue::UInt(_) => "unsigned int",
            RawValue::Double(_) => "double",
            RawValue::Text(_) => "string",
            RawValue::Time(_) => "timestamp",
        }
    }

    pub(crate) fn wire(&self) -> Wire {
        match self {
            RawValue::Int(_) => Wire::Int,
            RawValue::UInt(_) => Wire::UInt,
            RawValue::Double(_) => Wire::Double,
            RawValue::Text(_) => Wire::Str,
            RawValue::Time(_) => Wire::Timestamp,
        }
    }
}

fn mismatch(property: &'static str, expected: &'static str, actual: &RawValue) -> SysCfgError {
    SysCfgError::TypeMismatch {
        property,
        expected,
        actual: actual.type_name(),
    }
}

/// A Rust type that can be stored in a property.
pub trait PropertyValue: Sized {
    const KIND: ValueKind;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self>;

    fn into_raw(self) -> RawValue;
}

impl PropertyValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Int(v) => Ok(v != 0),
            other => Err(mismatch(property, "bool", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Int(i32::from(self))
    }
}

impl PropertyValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Int(v) => Ok(v),
            other => Err(mismatch(property, "int", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Int(self)
    }
}

impl PropertyValue for u32 {
    const KIND: ValueKind = ValueKind::UnsignedInt;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::UInt(v) => Ok(v),
            other => Err(mismatch(property, "unsigned int", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::UInt(self)
    }
}

impl PropertyValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Double(v) => Ok(v),
            other => Err(mismatch(property, "double", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Double(self)
    }
}

impl PropertyValue for String {
    const KIND: ValueKind = ValueKind::String;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Text(v) => Ok(v),
            other => Err(mismatch(property, "string", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Text(self)
    }
}

impl PropertyValue for DateTime<Utc> {
    const KIND: ValueKind = ValueKind::Timestamp;

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Time(v) => Ok(v),
            other => Err(mismatch(property, "timestamp", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Time(self)
    }
}

/// A Rust enum mirroring a native symbolic enum.
pub trait Symbolic: Copy + Sized + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    fn table() -> &'static SymbolTable;

    fn raw(self) -> i32;

    fn from_raw_value(raw: i32) -> Option<Self>;

    fn name(self) -> &'static str {
        Self::table().name_of(self.raw()).unwrap_or("?")
    }

    /// Decodes a raw value, failing on values without a symbol.
    fn decode(raw: i32) -> SysCfgResult<Self> {
        Self::from_raw_value(raw).ok_or_else(|| SysCfgError::UnknownSymbol {
            type_name: Self::table().type_name,
            value: raw.to_string(),
        })
    }
}

/// A set of flags of the symbolic type `F`.
pub struct FlagSet<F> {
    bits: i32,
    _flag: PhantomData<fn() -> F>,
}

impl<F: Symbolic> FlagSet<F> {
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Wraps raw bits, keeping bits that have no declared flag.
    pub const fn from_bits(bits: i32) -> Self {
        Self {
            bits,
            _flag: PhantomData,
        }
    }

    pub const fn bits(&self) -> i32 {
        self.bits
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn insert(&mut self, flag: F) {
        self.bits |= flag.raw();
    }

    pub fn contains(&self, flag: F) -> bool {
        let raw = flag.raw();
        raw != 0 && self.bits & raw == raw
    }

    /// The set flags, in declaration order.
    pub fn flags(&self) -> Vec<F> {
        F::ALL.iter().copied().filter(|f| self.contains(*f)).collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        F::table().flags(self.bits)
    }
}

impl<F: Symbolic> FromIterator<F> for FlagSet<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::empty();
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

impl<F> Clone for FlagSet<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for FlagSet<F> {}

impl<F> PartialEq for FlagSet<F> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<F> Eq for FlagSet<F> {}

impl<F: Symbolic> fmt::Debug for FlagSet<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl<F: Symbolic> PropertyValue for FlagSet<F> {
    const KIND: ValueKind = ValueKind::Bitmask(F::table);

    fn from_raw(raw: RawValue, property: &'static str) -> SysCfgResult<Self> {
        match raw {
            RawValue::Int(bits) => Ok(Self::from_bits(bits)),
            other => Err(mismatch(property, "bitmask", &other)),
        }
    }

    fn into_raw(self) -> RawValue {
        RawValue::Int(self.bits)
    }
}

/// A property value of any type, for access by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Bool(bool),
    Int(i32),
    UnsignedInt(u32),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    /// `symbol` is `None` for values the table does not declare.
    Enum {
        raw: i32,
        symbol: Option<&'static str>,
    },
    Flags {
        raw: i32,
        symbols: Vec<&'static str>,
    },
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UnsignedInt(_) => "unsigned int",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Enum { .. } => "enum",
            Value::Flags { .. } => "bitmask",
        }
    }

    /// Types a raw value according to `descriptor`.
    pub(crate) fn from_raw(descriptor: &PropertyDescriptor, raw: RawValue) -> SysCfgResult<Self> {
        let name = descriptor.name;
        Ok(match descriptor.kind {
            ValueKind::Bool => Value::Bool(bool::from_raw(raw, name)?),
            ValueKind::Int => Value::Int(i32::from_raw(raw, name)?),
            ValueKind::UnsignedInt => Value::UnsignedInt(u32::from_raw(raw, name)?),
            ValueKind::Double => Value::Double(f64::from_raw(raw, name)?),
            ValueKind::String => Value::String(String::from_raw(raw, name)?),
            ValueKind::Timestamp => Value::Timestamp(DateTime::<Utc>::from_raw(raw, name)?),
            ValueKind::Enum(table) => {
                let raw = i32::from_raw(raw, name)?;
                Value::Enum {
                    raw,
                    symbol: table().name_of(raw),
                }
            }
            ValueKind::Bitmask(table) => {
                let raw = i32::from_raw(raw, name)?;
                Value::Flags {
                    raw,
                    symbols: table().flags(raw),
                }
            }
        })
    }

    /// Converts to the raw value `descriptor` expects.
    ///
    /// Enums also accept a symbol name (`Value::String`) or a plain
    /// `Value::Int`; bitmasks accept a plain `Value::Int`.
    pub(crate) fn into_raw(self, descriptor: &PropertyDescriptor) -> SysCfgResult<RawValue> {
        let mismatch = |actual: &Value| SysCfgError::TypeMismatch {
            property: descriptor.name,
            expected: descriptor.kind.type_name(),
            actual: actual.type_name(),
        };
        let raw = match (descriptor.kind, self) {
            (ValueKind::Bool, Value::Bool(v)) => v.into_raw(),
            (ValueKind::Int, Value::Int(v)) => RawValue::Int(v),
            (ValueKind::UnsignedInt, Value::UnsignedInt(v)) => RawValue::UInt(v),
            (ValueKind::Double, Value::Double(v)) => RawValue::Double(v),
            (ValueKind::String, Value::String(v)) => RawValue::Text(v),
            (ValueKind::Timestamp, Value::Timestamp(v)) => RawValue::Time(v),
            (ValueKind::Enum(_), Value::Enum { raw, .. } | Value::Int(raw)) => RawValue::Int(raw),
            (ValueKind::Enum(table), Value::String(symbol)) => {
                let table = table();
                let raw = table
                    .value_of(&symbol)
                    .ok_or(SysCfgError::UnknownSymbol {
                        type_name: table.type_name,
                        value: symbol,
                    })?;
                RawValue::Int(raw)
            }
            (ValueKind::Bitmask(_), Value::Flags { raw, .. } | Value::Int(raw)) => {
                RawValue::Int(raw)
            }
            (_, other) => return Err(mismatch(&other)),
        };
        debug_assert_eq!(raw.wire(), descriptor.kind.wire());
        Ok(raw)
    }
}
