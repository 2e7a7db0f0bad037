//! Declarative tables for enums and property bags.

/// Declares a Rust enum mirroring a native symbolic enum.
macro_rules! symbolic_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )*
        }

        impl $crate::property::Symbolic for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),*];

            fn table() -> &'static $crate::property::SymbolTable {
                static TABLE: $crate::property::SymbolTable = $crate::property::SymbolTable {
                    type_name: stringify!($name),
                    entries: &[$((stringify!($variant), $value)),*],
                };
                &TABLE
            }

            fn raw(self) -> i32 {
                match self {
                    $(Self::$variant => $value,)*
                }
            }

            #[allow(unreachable_patterns)]
            fn from_raw_value(raw: i32) -> Option<Self> {
                match raw {
                    $(v if v == $value => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::property::PropertyValue for $name {
            const KIND: $crate::property::ValueKind = $crate::property::ValueKind::Enum(
                <$name as $crate::property::Symbolic>::table,
            );

            fn from_raw(
                raw: $crate::property::RawValue,
                property: &'static str,
            ) -> $crate::SysCfgResult<Self> {
                let raw = <i32 as $crate::property::PropertyValue>::from_raw(raw, property)?;
                <Self as $crate::property::Symbolic>::decode(raw)
            }

            fn into_raw(self) -> $crate::property::RawValue {
                $crate::property::RawValue::Int($crate::property::Symbolic::raw(self))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::property::Symbolic::name(*self))
            }
        }
    };
}

/// Declares a property bag: a marker type with one typed constant per
/// property, its static catalog, and an attribute trait with named
/// accessors implemented for every host of the bag.
///
/// ```text
/// NAME: Type = id, Access [get getter] [set setter];
/// ```
macro_rules! property_bag {
    (
        $(#[$meta:meta])*
        $vis:vis bag $bag:ident($label:literal), attributes $attrs:ident {
            $(
                $(#[$pmeta:meta])*
                $prop:ident: $ty:ty = $id:expr, $access:ident
                    $(get $getter:ident)? $(set $setter:ident)?;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $bag;

        impl $bag {
            $(
                $(#[$pmeta])*
                pub const $prop: $crate::property::Property<$bag, $ty> =
                    $crate::property::Property::new(
                        stringify!($prop),
                        $id,
                        $crate::property::Access::$access,
                    );
            )*
        }

        impl $crate::property::PropertyBag for $bag {
            const NAME: &'static str = $label;

            fn catalog() -> &'static [$crate::property::PropertyDescriptor] {
                static CATALOG: &[$crate::property::PropertyDescriptor] =
                    &[$($bag::$prop.into_descriptor(),)*];
                CATALOG
            }
        }

        #[doc = concat!("Named accessors for [`", stringify!($bag), "`].")]
        $vis trait $attrs: $crate::property::PropertyHost<$bag> {
            $(
                $(
                    fn $getter(&self) -> $crate::SysCfgResult<$ty> {
                        self.get($bag::$prop)
                    }
                )?
                $(
                    fn $setter(&self, value: $ty) -> $crate::SysCfgResult<()> {
                        self.set($bag::$prop, value)
                    }
                )?
            )*
        }

        impl<H: $crate::property::PropertyHost<$bag> + ?Sized> $attrs for H {}
    };
}

/// Declares a bag of indexed properties.
///
/// ```text
/// NAME: Type = id, [counted by COUNT = count_id,] get getter, all getter_all;
/// ```
macro_rules! indexed_property_bag {
    (
        $(#[$meta:meta])*
        $vis:vis bag $bag:ident($label:literal), attributes $attrs:ident {
            $(
                $(#[$pmeta:meta])*
                $prop:ident: $ty:ty = $id:expr,
                    $(counted by $count:ident = $count_id:expr,)?
                    get $getter:ident, all $all:ident;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $bag;

        impl $bag {
            $(
                $(#[$pmeta])*
                pub const $prop: $crate::property::IndexedProperty<$bag, $ty> =
                    $crate::property::IndexedProperty::new(
                        stringify!($prop),
                        $id,
                        indexed_property_bag!(@count $($count = $count_id)?),
                    );
            )*
        }

        impl $crate::property::PropertyBag for $bag {
            const NAME: &'static str = $label;

            fn catalog() -> &'static [$crate::property::PropertyDescriptor] {
                static CATALOG: &[$crate::property::PropertyDescriptor] =
                    &[$($bag::$prop.into_descriptor(),)*];
                CATALOG
            }
        }

        #[doc = concat!("Named accessors for [`", stringify!($bag), "`].")]
        $vis trait $attrs: $crate::property::IndexedPropertyHost<$bag> {
            $(
                fn $getter(&self, index: u32) -> $crate::SysCfgResult<$ty> {
                    self.get_indexed($bag::$prop, index)
                }

                fn $all(&self) -> $crate::SysCfgResult<Vec<$ty>> {
                    self.get_all($bag::$prop)
                }
            )*
        }

        impl<H: $crate::property::IndexedPropertyHost<$bag> + ?Sized> $attrs for H {}
    };
    (@count $count:ident = $count_id:expr) => {
        Some($crate::property::CountRef {
            name: stringify!($count),
            id: $count_id,
        })
    };
    (@count) => {
        None
    };
}
