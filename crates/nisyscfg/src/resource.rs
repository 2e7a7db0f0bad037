//! Hardware resources.

use std::rc::Rc;

use log::{debug, info};
use nisyscfg_sys::{DetailedString, RawHandle};
use serde::Serialize;

use crate::catalog::{
    resource_expert, DeleteValidationMode, FirmwareStatus, IndexedResourceBag, PxiResourceBag,
    ResourceBag, XnetResourceBag,
};
use crate::config::FirmwareUpdate;
use crate::context::Context;
use crate::error::{SysCfgError, SysCfgResult};
use crate::ownership::{NodeId, Owned};
use crate::property::accessor::ResourceTarget;
use crate::property::{
    ExpertView, IndexedPropertyHost, PropertyAccessor, PropertyDescriptor, PropertyHost, Symbolic,
    Value,
};
use crate::types::{ResourceHandle, ResourceKind};

/// Result of [`HardwareResource::save_changes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub restart_required: bool,
    pub details: String,
}

/// Result of [`HardwareResource::rename`].
#[derive(Debug)]
pub struct RenameOutcome {
    /// Another resource already had the new name.
    pub name_already_existed: bool,
    /// The resource that lost its name, when the conflict was overwritten.
    pub overwritten: Option<HardwareResource>,
}

/// Result of [`HardwareResource::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub dependent_items_deleted: bool,
    pub details: String,
}

/// Result of a firmware operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirmwareOutcome {
    pub status: FirmwareStatus,
    pub details: String,
}

/// A device, chassis, interface or other item found on the target.
///
/// The native handle belongs to the session; it is closed when this value
/// is dropped, when [`close`](HardwareResource::close) is called, or when
/// the session closes, whichever comes first.
pub struct HardwareResource {
    owned: Owned<ResourceKind>,
    accessor: PropertyAccessor,
}

impl HardwareResource {
    pub(crate) fn adopt(
        ctx: &Rc<Context>,
        parent: NodeId,
        handle: ResourceHandle,
    ) -> SysCfgResult<Self> {
        let owned = Owned::adopt(ctx, parent, handle)?;
        let accessor = PropertyAccessor::new(ctx, owned.node(), "Resource", &ResourceTarget);
        Ok(Self { owned, accessor })
    }

    pub fn handle(&self) -> SysCfgResult<ResourceHandle> {
        self.owned.handle()
    }

    pub fn is_closed(&self) -> bool {
        self.owned.is_closed()
    }

    /// Closes the resource handle and any resource it displaced by a
    /// rename. Closing twice is a no-op.
    pub fn close(&self) -> SysCfgResult<()> {
        self.owned.close()
    }

    fn raw(&self) -> SysCfgResult<RawHandle> {
        Ok(self.owned.handle()?.as_raw())
    }

    fn ctx(&self) -> &Rc<Context> {
        self.owned.context()
    }

    /// PXI chassis properties.
    pub fn pxi(&self) -> ExpertView<'_, PxiResourceBag> {
        ExpertView::new(&self.accessor)
    }

    /// NI-XNET interface properties.
    pub fn xnet(&self) -> ExpertView<'_, XnetResourceBag> {
        ExpertView::new(&self.accessor)
    }

    /// Reads an expert property by expert and property name.
    pub fn get_expert_value(&self, expert: &str, name: &str) -> SysCfgResult<Value> {
        let d = expert_property(expert, name)?;
        self.accessor.get_value(d)
    }

    /// Writes an expert property by expert and property name.
    pub fn set_expert_value(&self, expert: &str, name: &str, value: Value) -> SysCfgResult<()> {
        let d = expert_property(expert, name)?;
        self.accessor.set_value(d, value)
    }

    /// Commits property changes to the target.
    pub fn save_changes(&self) -> SysCfgResult<SaveOutcome> {
        let handle = self.raw()?;
        let mut restart_required = false;
        let mut detail = DetailedString::null();
        let result =
            self.ctx()
                .api()
                .save_resource_changes(handle, &mut restart_required, &mut detail);
        let (_, details) = self.ctx().with_detail("save_resource_changes", result, detail)?;
        if restart_required {
            info!("Saving resource {} requires a restart", handle);
        }
        Ok(SaveOutcome {
            restart_required,
            details,
        })
    }

    /// Runs the device self test and returns its report.
    pub fn self_test(&self, mode: u32) -> SysCfgResult<String> {
        let handle = self.raw()?;
        let mut detail = DetailedString::null();
        let result = self.ctx().api().self_test_hardware(handle, mode, &mut detail);
        let (_, details) = self.ctx().with_detail("self_test_hardware", result, detail)?;
        Ok(details)
    }

    /// Runs internal calibration and returns its report.
    pub fn self_calibrate(&self) -> SysCfgResult<String> {
        let handle = self.raw()?;
        let mut detail = DetailedString::null();
        let result = self.ctx().api().self_calibrate_hardware(handle, &mut detail);
        let (_, details) = self
            .ctx()
            .with_detail("self_calibrate_hardware", result, detail)?;
        Ok(details)
    }

    pub fn reset(&self, mode: u32) -> SysCfgResult<()> {
        let handle = self.raw()?;
        let result = self.ctx().api().reset_hardware(handle, mode);
        self.ctx().check("reset_hardware", result)?;
        Ok(())
    }

    /// Renames the resource.
    ///
    /// If another resource had `new_name` and `overwrite_conflict` is set,
    /// the displaced resource is returned. Its handle is owned by this
    /// resource and closes with it.
    pub fn rename(
        &self,
        new_name: &str,
        overwrite_conflict: bool,
        update_dependencies: bool,
    ) -> SysCfgResult<RenameOutcome> {
        let handle = self.raw()?;
        let name = self.ctx().encode(new_name)?;
        let mut name_already_existed = false;
        let mut overwritten = RawHandle::NULL;
        let result = self.ctx().api().rename_resource(
            handle,
            &name,
            overwrite_conflict,
            update_dependencies,
            &mut name_already_existed,
            &mut overwritten,
        );
        self.ctx().check("rename_resource", result)?;

        let overwritten = match ResourceHandle::from_raw(overwritten) {
            Some(displaced) => {
                debug!("Rename to {:?} displaced {:?}", new_name, displaced);
                Some(HardwareResource::adopt(
                    self.ctx(),
                    self.owned.node(),
                    displaced,
                )?)
            }
            None => None,
        };
        Ok(RenameOutcome {
            name_already_existed,
            overwritten,
        })
    }

    /// Deletes the resource from the target's configuration.
    pub fn delete(&self, mode: DeleteValidationMode) -> SysCfgResult<DeleteOutcome> {
        let handle = self.raw()?;
        let mut dependent_items_deleted = false;
        let mut detail = DetailedString::null();
        let result = self.ctx().api().delete_resource(
            handle,
            mode.raw(),
            &mut dependent_items_deleted,
            &mut detail,
        );
        let (_, details) = self.ctx().with_detail("delete_resource", result, detail)?;
        Ok(DeleteOutcome {
            dependent_items_deleted,
            details,
        })
    }

    pub fn upgrade_firmware(&self, update: &FirmwareUpdate) -> SysCfgResult<FirmwareOutcome> {
        let handle = self.raw()?;
        let file = self.ctx().encode(&update.firmware_file)?;
        let mut status = FirmwareStatus::Invalid.raw();
        let mut detail = DetailedString::null();
        let result = self.ctx().api().upgrade_firmware_from_file(
            handle,
            &file,
            update.auto_stop_tasks,
            update.always_overwrite,
            update.wait_for_operation,
            &mut status,
            &mut detail,
        );
        let (_, details) = self
            .ctx()
            .with_detail("upgrade_firmware_from_file", result, detail)?;
        Ok(FirmwareOutcome {
            status: FirmwareStatus::decode(status)?,
            details,
        })
    }

    pub fn erase_firmware(&self, auto_stop_tasks: bool) -> SysCfgResult<FirmwareOutcome> {
        let handle = self.raw()?;
        let mut status = FirmwareStatus::Invalid.raw();
        let mut detail = DetailedString::null();
        let result =
            self.ctx()
                .api()
                .erase_firmware(handle, auto_stop_tasks, &mut status, &mut detail);
        let (_, details) = self.ctx().with_detail("erase_firmware", result, detail)?;
        Ok(FirmwareOutcome {
            status: FirmwareStatus::decode(status)?,
            details,
        })
    }
}

fn expert_property(
    expert: &str,
    name: &str,
) -> SysCfgResult<&'static PropertyDescriptor> {
    let bag = resource_expert(expert).ok_or_else(|| SysCfgError::UnknownProperty {
        bag: "Resource experts",
        name: expert.to_string(),
    })?;
    (bag.find)(name).ok_or_else(|| SysCfgError::UnknownProperty {
        bag: bag.bag,
        name: name.to_string(),
    })
}

impl PropertyHost<ResourceBag> for HardwareResource {
    fn accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }
}

impl IndexedPropertyHost<IndexedResourceBag> for HardwareResource {
    fn indexed_accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }
}

impl std::fmt::Debug for HardwareResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owned.handle() {
            Ok(handle) => write!(f, "HardwareResource({})", handle),
            Err(_) => f.write_str("HardwareResource(closed)"),
        }
    }
}
