//! Thread-safe wrapper around [`Ring`].
//!
//! Registry, ring, and memo are guarded as one unit behind a single mutex,
//! so no caller can observe a node whose replicas are only partially placed
//! or a memo entry stale relative to a completed membership change. One
//! lock is fine here: every critical section is bounded in-memory work with
//! no I/O. Lookups take the exclusive lock too, because a memo miss writes.

use std::sync::Mutex;

use crate::hash::{Blake3Hasher, PositionHasher};
use crate::node::Node;
use crate::ring::Ring;
use crate::RingError;

/// Shared consistent-hashing distributor.
///
/// All methods take `&self`; clone an `Arc<Distributor>` into each thread
/// that needs it.
pub struct Distributor<H = Blake3Hasher> {
    inner: Mutex<Ring<H>>,
}

impl Distributor<Blake3Hasher> {
    /// Distributor with the default hasher and replica count.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Ring::new()),
        }
    }

    /// Distributor with the default hasher and an explicit replica count.
    pub fn with_virtual_nodes(virtual_nodes: usize) -> Result<Self, RingError> {
        Ok(Self {
            inner: Mutex::new(Ring::with_virtual_nodes(virtual_nodes)?),
        })
    }
}

impl Default for Distributor<Blake3Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: PositionHasher> Distributor<H> {
    /// Distributor with a custom hasher.
    pub fn with_hasher(hasher: H, virtual_nodes: usize) -> Result<Self, RingError> {
        Ok(Self {
            inner: Mutex::new(Ring::with_hasher(hasher, virtual_nodes)?),
        })
    }

    /// Register a node. Idempotent.
    pub fn add_node(&self, node: Node) {
        self.inner.lock().expect("ring lock poisoned").add_node(node);
    }

    /// Unregister a node and re-home its keys. No-op if unknown.
    pub fn remove_node(&self, node: &Node) {
        self.inner
            .lock()
            .expect("ring lock poisoned")
            .remove_node(node);
    }

    /// Resolve the node responsible for `key`, or `None` on an empty ring.
    pub fn get_node(&self, key: &str) -> Option<Node> {
        self.inner.lock().expect("ring lock poisoned").get_node(key)
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.inner.lock().expect("ring lock poisoned").node_count()
    }

    /// Number of virtual-replica positions on the ring.
    pub fn vnode_count(&self) -> usize {
        self.inner.lock().expect("ring lock poisoned").vnode_count()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("ring lock poisoned").is_empty()
    }

    /// Whether the given node is registered.
    pub fn contains(&self, node: &Node) -> bool {
        self.inner.lock().expect("ring lock poisoned").contains(node)
    }

    /// All registered nodes, sorted by name.
    pub fn nodes(&self) -> Vec<Node> {
        self.inner.lock().expect("ring lock poisoned").nodes()
    }
}
