//! Type-safe native handle wrappers.
//!
//! The library hands out untyped `void*` handles for sessions, filters,
//! resources and every kind of enumerator. The phantom kind parameter keeps
//! them apart at compile time, so a filter handle cannot be passed where a
//! resource handle is expected.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use nisyscfg_sys::RawHandle;

/// Marker trait for handle kinds.
pub trait HandleKind: 'static {
    /// Human-readable kind name, used in logs and errors.
    const NAME: &'static str;
}

/// A typed native handle.
///
/// `Handle` does not own the native object; ownership lives in the
/// session's handle tree.
pub struct Handle<K: HandleKind> {
    raw: RawHandle,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> Handle<K> {
    /// The null handle.
    pub const NULL: Self = Self::from_raw_unchecked(RawHandle::NULL);

    /// Wraps a raw handle, returning `None` for null.
    pub fn from_raw(raw: RawHandle) -> Option<Self> {
        if raw.is_null() {
            None
        } else {
            Some(Self::from_raw_unchecked(raw))
        }
    }

    /// Wraps a raw handle, including null.
    pub const fn from_raw_unchecked(raw: RawHandle) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    pub const fn as_raw(&self) -> RawHandle {
        self.raw
    }

    pub const fn is_null(&self) -> bool {
        self.raw.is_null()
    }
}

impl<K: HandleKind> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", K::NAME, self.raw)
    }
}

impl<K: HandleKind> fmt::Display for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<K: HandleKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: HandleKind> Copy for Handle<K> {}

impl<K: HandleKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K: HandleKind> Eq for Handle<K> {}

impl<K: HandleKind> Hash for Handle<K> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K: HandleKind> Default for Handle<K> {
    fn default() -> Self {
        Self::NULL
    }
}

macro_rules! define_handle_kind {
    ($kind:ident, $name:literal, $alias:ident) => {
        #[doc = concat!("Marker for ", $name, " handles.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $kind;

        impl HandleKind for $kind {
            const NAME: &'static str = $name;
        }

        #[doc = concat!("A typed ", $name, " handle.")]
        pub type $alias = Handle<$kind>;
    };
}

define_handle_kind!(SessionKind, "Session", SessionHandle);
define_handle_kind!(FilterKind, "Filter", FilterHandle);
define_handle_kind!(ResourceKind, "Resource", ResourceHandle);
define_handle_kind!(ResourceEnumKind, "ResourceEnum", ResourceEnumHandle);
define_handle_kind!(ExpertEnumKind, "ExpertEnum", ExpertEnumHandle);
define_handle_kind!(SystemEnumKind, "SystemEnum", SystemEnumHandle);
define_handle_kind!(ComponentEnumKind, "ComponentEnum", ComponentEnumHandle);
define_handle_kind!(DependencyEnumKind, "DependencyEnum", DependencyEnumHandle);
define_handle_kind!(FeedEnumKind, "FeedEnum", FeedEnumHandle);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_null_is_rejected() {
        assert!(ResourceHandle::from_raw(RawHandle::NULL).is_none());
        assert!(ResourceHandle::NULL.is_null());
        assert_eq!(ResourceHandle::default(), ResourceHandle::NULL);
    }

    #[test]
    fn test_handle_debug_names_kind() {
        let filter = FilterHandle::from_raw(RawHandle::from_raw(0x1230)).unwrap();
        assert_eq!(format!("{:?}", filter), "Filter(0x1230)");
        assert_eq!(filter.to_string(), "0x1230");
    }

    #[test]
    fn test_handles_hash_by_value() {
        let a = SessionHandle::from_raw(RawHandle::from_raw(1)).unwrap();
        let b = SessionHandle::from_raw(RawHandle::from_raw(2)).unwrap();
        let set: HashSet<_> = [a, b, a].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
