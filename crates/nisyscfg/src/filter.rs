//! Hardware search filters.

use std::rc::Rc;

use crate::catalog::{FilterBag, XnetFilterBag};
use crate::context::Context;
use crate::error::SysCfgResult;
use crate::ownership::{NodeId, Owned};
use crate::property::accessor::FilterTarget;
use crate::property::{ExpertView, PropertyAccessor, PropertyHost};
use crate::types::{FilterHandle, FilterKind};

/// Search criteria passed to [`Session::find_hardware`](crate::Session::find_hardware).
///
/// Filter properties can only be written. How they are combined is chosen
/// per search with [`FilterMode`](crate::catalog::FilterMode).
pub struct Filter {
    owned: Owned<FilterKind>,
    accessor: PropertyAccessor,
}

impl Filter {
    pub(crate) fn adopt(ctx: &Rc<Context>, parent: NodeId, handle: FilterHandle) -> SysCfgResult<Self> {
        let owned = Owned::adopt(ctx, parent, handle)?;
        let accessor = PropertyAccessor::new(ctx, owned.node(), "Filter", &FilterTarget);
        Ok(Self { owned, accessor })
    }

    pub fn handle(&self) -> SysCfgResult<FilterHandle> {
        self.owned.handle()
    }

    pub fn is_closed(&self) -> bool {
        self.owned.is_closed()
    }

    pub fn close(&self) -> SysCfgResult<()> {
        self.owned.close()
    }

    /// NI-XNET search criteria.
    pub fn xnet(&self) -> ExpertView<'_, XnetFilterBag> {
        ExpertView::new(&self.accessor)
    }
}

impl PropertyHost<FilterBag> for Filter {
    fn accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owned.handle() {
            Ok(handle) => write!(f, "Filter({})", handle),
            Err(_) => f.write_str("Filter(closed)"),
        }
    }
}
