//! Per-session state shared by every object opened through a session.

use std::cell::RefCell;
use std::ffi::CString;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use nisyscfg_sys::{DetailedString, FfiResult, NativeApi, RawHandle, StringCodec, Timestamp};

use crate::error::{CheckMode, Checker, Status, SysCfgError, SysCfgResult};
use crate::ownership::{HandleTree, NodeId};

pub(crate) struct Context {
    api: Arc<dyn NativeApi>,
    codec: StringCodec,
    strict_warnings: bool,
    tree: RefCell<HandleTree>,
    root: NodeId,
}

impl Context {
    pub(crate) fn new(
        api: Arc<dyn NativeApi>,
        codec: StringCodec,
        strict_warnings: bool,
        session: RawHandle,
    ) -> Self {
        let mut tree = HandleTree::new();
        let root = tree.insert_root(session, "Session");
        Self {
            api,
            codec,
            strict_warnings,
            tree: RefCell::new(tree),
            root,
        }
    }

    pub(crate) fn api(&self) -> &dyn NativeApi {
        self.api.as_ref()
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    /// The session handle, or null once the session is closed.
    pub(crate) fn session_handle(&self) -> RawHandle {
        self.handle(self.root).unwrap_or(RawHandle::NULL)
    }

    pub(crate) fn handle(&self, node: NodeId) -> Option<RawHandle> {
        self.tree.borrow().handle(node)
    }

    pub(crate) fn open_handles(&self) -> usize {
        self.tree.borrow().open_count()
    }

    fn checker(&self) -> Checker<'_> {
        Checker {
            api: self.api.as_ref(),
            codec: self.codec,
            session: self.session_handle(),
            strict_warnings: self.strict_warnings,
        }
    }

    pub(crate) fn check(&self, operation: &str, result: FfiResult<i32>) -> SysCfgResult<Status> {
        self.checker().check(operation, result)
    }

    /// Checks an enumerator step: `true` if an item was produced, `false`
    /// at the end of the enumeration.
    pub(crate) fn check_next(&self, operation: &str, result: FfiResult<i32>) -> SysCfgResult<bool> {
        let status = self.check(operation, result)?;
        Ok(status != Status::END_OF_ENUM)
    }

    /// Checks a call that produced a detailed-result string and returns the
    /// decoded text.
    pub(crate) fn with_detail(
        &self,
        operation: &str,
        result: FfiResult<i32>,
        detail: DetailedString,
    ) -> SysCfgResult<(Status, String)> {
        self.checker()
            .with_detail(operation, result, detail, CheckMode::Describe)
    }

    /// Registers a handle as a child of `parent`.
    pub(crate) fn register(
        &self,
        parent: NodeId,
        handle: RawHandle,
        kind: &'static str,
    ) -> SysCfgResult<NodeId> {
        let mut tree = self.tree.borrow_mut();
        let object = tree.kind(parent);
        tree.insert(parent, handle, kind)
            .ok_or(SysCfgError::Closed { object })
    }

    /// Closes `node` and its open descendants.
    ///
    /// Every node is marked released before its native close runs, so a
    /// failing close is never retried. All closes are attempted; the first
    /// failure is returned.
    pub(crate) fn close(&self, node: NodeId) -> SysCfgResult<()> {
        let order = self.tree.borrow().release_order(node);
        let mut first_error = None;
        for id in order {
            let (handle, kind) = {
                let mut tree = self.tree.borrow_mut();
                (tree.release(id), tree.kind(id))
            };
            let Some(handle) = handle else {
                continue;
            };
            debug!("Closing {} handle {}", kind, handle);
            let result = self.api.close_handle(handle);
            if let Err(e) = self.check("close_handle", result) {
                warn!("Closing {} handle {} failed: {}", kind, handle, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub(crate) fn encode(&self, text: &str) -> SysCfgResult<CString> {
        Ok(self.codec.encode(text)?)
    }

    pub(crate) fn decode_buffer(&self, buffer: &[u8]) -> String {
        self.codec.decode_buffer(buffer)
    }

    /// Converts to the native timestamp; the Unix epoch maps to blank.
    pub(crate) fn to_native_timestamp(&self, time: DateTime<Utc>) -> SysCfgResult<Timestamp> {
        if time == DateTime::UNIX_EPOCH {
            return Ok(Timestamp::BLANK);
        }
        let seconds = u64::try_from(time.timestamp()).map_err(|_| SysCfgError::InvalidTimestamp {
            value: time.to_rfc3339(),
        })?;
        let fraction = f64::from(time.timestamp_subsec_nanos()) / 1e9;
        let mut timestamp = Timestamp::BLANK;
        let result = self
            .api
            .timestamp_from_values(seconds, fraction, &mut timestamp);
        self.check("timestamp_from_values", result)?;
        Ok(timestamp)
    }

    /// Converts from the native timestamp; blank maps to the Unix epoch.
    pub(crate) fn from_native_timestamp(&self, timestamp: &Timestamp) -> SysCfgResult<DateTime<Utc>> {
        if timestamp.is_blank() {
            return Ok(DateTime::UNIX_EPOCH);
        }
        let (mut seconds, mut fraction) = (0u64, 0f64);
        let result = self
            .api
            .values_from_timestamp(timestamp, &mut seconds, &mut fraction);
        self.check("values_from_timestamp", result)?;

        let invalid = || SysCfgError::InvalidTimestamp {
            value: format!("{}+{}", seconds, fraction),
        };
        let secs = i64::try_from(seconds).map_err(|_| invalid())?;
        let nanos = (fraction * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
        DateTime::from_timestamp(secs, nanos).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nisyscfg_sys::mock::MockNative;
    use pretty_assertions::assert_eq;

    fn context(mock: &Arc<MockNative>) -> Context {
        Context::new(
            Arc::clone(mock) as Arc<dyn NativeApi>,
            StringCodec::Latin1,
            false,
            RawHandle::from_raw(0x10),
        )
    }

    #[test]
    fn test_epoch_is_blank() {
        let mock = Arc::new(MockNative::new());
        let ctx = context(&mock);
        assert_eq!(
            ctx.to_native_timestamp(DateTime::UNIX_EPOCH).unwrap(),
            Timestamp::BLANK
        );
        assert_eq!(
            ctx.from_native_timestamp(&Timestamp::BLANK).unwrap(),
            DateTime::UNIX_EPOCH
        );
        assert_eq!(mock.count("timestamp_from_values"), 0);
    }

    #[test]
    fn test_timestamp_round_trip() {
        let mock = Arc::new(MockNative::new());
        let ctx = context(&mock);
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        let native = ctx.to_native_timestamp(time).unwrap();
        assert!(!native.is_blank());
        assert_eq!(ctx.from_native_timestamp(&native).unwrap(), time);
    }

    #[test]
    fn test_pre_epoch_rejected() {
        let mock = Arc::new(MockNative::new());
        let ctx = context(&mock);
        let time = Utc.with_ymd_and_hms(1969, 12, 31, 0, 0, 0).unwrap();
        assert!(matches!(
            ctx.to_native_timestamp(time),
            Err(SysCfgError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_register_under_closed_parent() {
        let mock = Arc::new(MockNative::new());
        let ctx = context(&mock);
        let child = ctx
            .register(ctx.root(), RawHandle::from_raw(0x20), "Filter")
            .unwrap();
        // The mock does not know these handles; closes fail but every node
        // is still released.
        assert!(ctx.close(ctx.root()).is_err());
        assert_eq!(
            mock.closed(),
            vec![RawHandle::from_raw(0x20), RawHandle::from_raw(0x10)]
        );
        assert!(ctx.handle(child).is_none());
        assert!(ctx.register(ctx.root(), RawHandle::from_raw(0x30), "Filter").is_err());
    }
}
