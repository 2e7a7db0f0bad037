//! Handle ownership tree.
//!
//! Every native handle opened through a session is a node in one arena
//! rooted at the session. Closing a node closes its open descendants
//! first, children in reverse creation order, depth-first. A released node
//! keeps its slot with a null handle, so closing it again is a no-op.

use std::marker::PhantomData;
use std::rc::Rc;

use log::error;
use nisyscfg_sys::RawHandle;

use crate::context::Context;
use crate::error::{SysCfgError, SysCfgResult};
use crate::types::{Handle, HandleKind};

/// Index of a node in a [`HandleTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    handle: RawHandle,
    kind: &'static str,
    children: Vec<NodeId>,
}

/// Arena of native handles owned by one session.
#[derive(Debug, Default)]
pub struct HandleTree {
    nodes: Vec<Node>,
}

impl HandleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without a parent.
    pub fn insert_root(&mut self, handle: RawHandle, kind: &'static str) -> NodeId {
        self.nodes.push(Node {
            handle,
            kind,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a child of `parent`. Returns `None` if the parent was released.
    pub fn insert(
        &mut self,
        parent: NodeId,
        handle: RawHandle,
        kind: &'static str,
    ) -> Option<NodeId> {
        if !self.is_open(parent) {
            return None;
        }
        let id = self.insert_root(handle, kind);
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    /// Returns the handle of an open node.
    pub fn handle(&self, id: NodeId) -> Option<RawHandle> {
        self.nodes
            .get(id.0)
            .map(|node| node.handle)
            .filter(|handle| !handle.is_null())
    }

    pub fn kind(&self, id: NodeId) -> &'static str {
        self.nodes.get(id.0).map_or("Unknown", |node| node.kind)
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.handle(id).is_some()
    }

    /// Open nodes of the subtree at `id` in the order they must be closed.
    pub fn release_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        self.collect(id, &mut order);
        order
    }

    fn collect(&self, id: NodeId, order: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id.0) else {
            return;
        };
        for child in node.children.iter().rev() {
            self.collect(*child, order);
        }
        if !node.handle.is_null() {
            order.push(id);
        }
    }

    /// Marks a node released, returning its handle if it was open.
    pub fn release(&mut self, id: NodeId) -> Option<RawHandle> {
        let node = self.nodes.get_mut(id.0)?;
        let handle = std::mem::replace(&mut node.handle, RawHandle::NULL);
        (!handle.is_null()).then_some(handle)
    }

    /// Number of open nodes.
    pub fn open_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.handle.is_null()).count()
    }
}

/// An owning reference to one node of a session's tree.
///
/// Dropping it closes the node (and its subtree) if still open.
pub(crate) struct Owned<K: HandleKind> {
    ctx: Rc<Context>,
    node: NodeId,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> Owned<K> {
    /// Registers `handle` as a child of `parent`.
    pub(crate) fn adopt(ctx: &Rc<Context>, parent: NodeId, handle: Handle<K>) -> SysCfgResult<Self> {
        let node = ctx.register(parent, handle.as_raw(), K::NAME)?;
        Ok(Self::from_node(ctx, node))
    }

    /// Wraps a node that is already registered.
    pub(crate) fn from_node(ctx: &Rc<Context>, node: NodeId) -> Self {
        Self {
            ctx: Rc::clone(ctx),
            node,
            _kind: PhantomData,
        }
    }

    pub(crate) fn context(&self) -> &Rc<Context> {
        &self.ctx
    }

    pub(crate) fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn handle(&self) -> SysCfgResult<Handle<K>> {
        self.ctx
            .handle(self.node)
            .map(Handle::from_raw_unchecked)
            .ok_or(SysCfgError::Closed { object: K::NAME })
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.ctx.handle(self.node).is_none()
    }

    pub(crate) fn close(&self) -> SysCfgResult<()> {
        self.ctx.close(self.node)
    }
}

impl<K: HandleKind> Drop for Owned<K> {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.close() {
            error!("Failed to close {} handle: {}", K::NAME, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(value: usize) -> RawHandle {
        RawHandle::from_raw(value)
    }

    #[test]
    fn test_release_order_is_reverse_depth_first() {
        let mut tree = HandleTree::new();
        let session = tree.insert_root(raw(1), "Session");
        let filter = tree.insert(session, raw(2), "Filter").unwrap();
        let resources = tree.insert(session, raw(3), "ResourceEnum").unwrap();
        let r1 = tree.insert(session, raw(4), "Resource").unwrap();
        let r2 = tree.insert(session, raw(5), "Resource").unwrap();

        assert_eq!(
            tree.release_order(session),
            vec![r2, r1, resources, filter, session]
        );
    }

    #[test]
    fn test_grandchildren_close_before_children() {
        let mut tree = HandleTree::new();
        let session = tree.insert_root(raw(1), "Session");
        let resource = tree.insert(session, raw(2), "Resource").unwrap();
        let displaced = tree.insert(resource, raw(3), "Resource").unwrap();
        let filter = tree.insert(session, raw(4), "Filter").unwrap();

        assert_eq!(
            tree.release_order(session),
            vec![filter, displaced, resource, session]
        );
    }

    #[test]
    fn test_released_nodes_are_skipped() {
        let mut tree = HandleTree::new();
        let session = tree.insert_root(raw(1), "Session");
        let filter = tree.insert(session, raw(2), "Filter").unwrap();

        assert_eq!(tree.release(filter), Some(raw(2)));
        assert_eq!(tree.release(filter), None);
        assert_eq!(tree.release_order(session), vec![session]);
        assert_eq!(tree.open_count(), 1);
    }

    #[test]
    fn test_insert_under_released_parent_fails() {
        let mut tree = HandleTree::new();
        let session = tree.insert_root(raw(1), "Session");
        tree.release(session);
        assert!(tree.insert(session, raw(2), "Filter").is_none());
        assert!(!tree.is_open(session));
    }
}
