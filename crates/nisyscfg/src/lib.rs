//! Safe Rust bindings for the NI System Configuration API.
//!
//! This crate provides type-safe wrappers around the nisyscfg C API:
//! typed handles that cannot be mixed up, typed property constants that
//! carry their value type, and a session that owns every handle opened
//! through it.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`error`]: status codes and the error type
//! - [`types`]: typed native handles
//! - [`property`]: property descriptors, value conversions and hosts
//! - [`catalog`]: property bags and symbolic enums of the library
//! - [`enumerator`]: iterators over native enumerations
//! - [`Session`], [`Filter`] and [`HardwareResource`]: the objects
//!
//! # Example
//!
//! ```ignore
//! use nisyscfg::prelude::*;
//!
//! fn list_ni_devices() -> SysCfgResult<()> {
//!     let session = Session::connect(&SessionConfig::default())?;
//!     let filter = session.create_filter()?;
//!     filter.set_is_ni_product(true)?;
//!     for resource in session.find_hardware(Some(&filter), FilterMode::MatchValuesAll, &[])? {
//!         let resource = resource?;
//!         println!("{} {}", resource.product_name()?, resource.serial_number()?);
//!     }
//!     session.close()
//! }
//! ```

#[macro_use]
mod macros;

pub mod catalog;
pub mod config;
mod context;
pub mod enumerator;
pub mod error;
mod filter;
mod ownership;
pub mod property;
mod resource;
mod session;
pub mod types;

pub use config::{ComponentQuery, FirmwareUpdate, RestartOptions, SessionConfig, SystemQuery};
pub use enumerator::{
    ComponentInfo, Components, Dependencies, DependencyInfo, Enumerator, ExpertInfo, Experts,
    FeedInfo, Feeds, Resources, Systems,
};
pub use error::{Status, StatusClass, SysCfgError, SysCfgResult};
pub use filter::Filter;
pub use ownership::{HandleTree, NodeId};
pub use resource::{DeleteOutcome, FirmwareOutcome, HardwareResource, RenameOutcome, SaveOutcome};
pub use session::{InstallOutcome, Session};

pub use nisyscfg_sys::{FfiError, NativeApi};

/// Commonly used types and the attribute traits of every property bag.
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::config::*;
    pub use crate::error::{Status, SysCfgError, SysCfgResult};
    pub use crate::property::{IndexedPropertyHost, PropertyHost, Value};
    pub use crate::{Filter, HardwareResource, Session};
}
