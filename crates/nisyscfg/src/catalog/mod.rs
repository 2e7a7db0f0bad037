//! Property catalogs and symbolic enums.
//!
//! Property IDs and enum values are fixed by the native library.

pub mod enums;
pub mod filter;
pub mod indexed;
pub mod pxi;
pub mod resource;
pub mod system;
pub mod xnet;

pub use enums::*;
pub use filter::{FilterAttributes, FilterBag};
pub use indexed::{IndexedResourceAttributes, IndexedResourceBag};
pub use pxi::{PxiAttributes, PxiResourceBag};
pub use resource::{ResourceAttributes, ResourceBag};
pub use system::{SystemAttributes, SystemBag};
pub use xnet::{XnetAttributes, XnetFilterAttributes, XnetFilterBag, XnetResourceBag};

use crate::property::{PropertyBag, PropertyDescriptor};

/// An expert's property bag, looked up by expert name at run time.
#[derive(Debug, Clone, Copy)]
pub struct ExpertBag {
    /// Expert programmatic name as reported by the library.
    pub expert: &'static str,
    pub bag: &'static str,
    pub find: fn(&str) -> Option<&'static PropertyDescriptor>,
    pub catalog: fn() -> &'static [PropertyDescriptor],
}

static RESOURCE_EXPERTS: &[ExpertBag] = &[
    ExpertBag {
        expert: "pxi",
        bag: PxiResourceBag::NAME,
        find: PxiResourceBag::find,
        catalog: PxiResourceBag::catalog,
    },
    ExpertBag {
        expert: "xnet",
        bag: XnetResourceBag::NAME,
        find: XnetResourceBag::find,
        catalog: XnetResourceBag::catalog,
    },
];

/// Expert bags available on hardware resources.
pub fn resource_experts() -> &'static [ExpertBag] {
    RESOURCE_EXPERTS
}

/// Finds a resource expert bag by expert name (case-insensitive).
pub fn resource_expert(expert: &str) -> Option<&'static ExpertBag> {
    RESOURCE_EXPERTS
        .iter()
        .find(|e| e.expert.eq_ignore_ascii_case(expert))
}
