//! The consistent hashing ring and its memoized key assignments.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::hash::{Blake3Hasher, PositionHasher};
use crate::node::Node;
use crate::RingError;

/// Default number of virtual replicas per node.
pub const DEFAULT_VIRTUAL_NODES: usize = 2;

/// Consistent hashing ring mapping string keys to nodes.
///
/// Three pieces of state move in lockstep: the registry of known nodes, the
/// ring of virtual-replica positions, and a memo of resolved key positions.
/// The memo is a cache, not a source of truth — after any mutation it stays
/// equal to what a fresh walk of the ring would produce, which is what makes
/// repeat lookups O(1) and membership changes cheap.
///
/// Mutating operations take `&mut self`; wrap the ring in a [`Distributor`]
/// to share it across threads.
///
/// [`Distributor`]: crate::Distributor
#[derive(Debug, Clone)]
pub struct Ring<H = Blake3Hasher> {
    /// Registered node identities; guards against duplicate registration.
    nodes: HashSet<Node>,
    /// Virtual-replica positions: ring position -> owning node.
    vnodes: BTreeMap<u64, Node>,
    /// Memoized key assignments: key position -> current owner.
    assignments: HashMap<u64, Node>,
    /// Virtual replicas per node, fixed at construction.
    virtual_nodes: usize,
    hasher: H,
}

impl Ring<Blake3Hasher> {
    /// Create a ring with the default hasher and
    /// [`DEFAULT_VIRTUAL_NODES`] replicas per node.
    pub fn new() -> Self {
        Self::with_virtual_nodes(DEFAULT_VIRTUAL_NODES).expect("default replica count is valid")
    }

    /// Create a ring with the default hasher and an explicit replica count.
    pub fn with_virtual_nodes(virtual_nodes: usize) -> Result<Self, RingError> {
        Self::with_hasher(Blake3Hasher, virtual_nodes)
    }
}

impl Default for Ring<Blake3Hasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: PositionHasher> Ring<H> {
    /// Create a ring with a custom hasher.
    ///
    /// Fails fast if `virtual_nodes` is zero — a ring that places no
    /// replicas can never own a key, so this is a configuration error,
    /// not a runtime condition.
    pub fn with_hasher(hasher: H, virtual_nodes: usize) -> Result<Self, RingError> {
        if virtual_nodes == 0 {
            return Err(RingError::InvalidVirtualNodes(virtual_nodes));
        }
        Ok(Self {
            nodes: HashSet::new(),
            vnodes: BTreeMap::new(),
            assignments: HashMap::new(),
            virtual_nodes,
            hasher,
        })
    }

    /// Register a node and place its virtual replicas on the ring.
    ///
    /// A no-op if the node is already registered. After each replica is
    /// placed, memoized keys in the arc it claims are reassigned to the
    /// new node; all other memoized keys keep their owner.
    ///
    /// If two replicas hash to the same position, the later write wins and
    /// the earlier owner loses that position (the ring holds one node per
    /// position). With a uniformly distributing hasher this is vanishingly
    /// rare; it is resolved deterministically rather than reported.
    pub fn add_node(&mut self, node: Node) {
        if !self.nodes.insert(node.clone()) {
            return;
        }

        for i in 0..self.virtual_nodes {
            let pos = self.replica_position(&node, i);
            self.vnodes.insert(pos, node.clone());
            self.rebalance_insertion(&node, pos);
        }

        debug!(%node, replicas = self.virtual_nodes, "added node to ring");
    }

    /// Unregister a node, drop its replicas, and re-home its keys.
    ///
    /// A no-op if the node is not registered. Replica positions are
    /// recomputed from the same `"{name}-{index}"` input used at insertion,
    /// so exactly the inserted entries are removed. A position that was
    /// lost to another node's colliding replica is left untouched.
    ///
    /// Every memoized key owned by the node is re-resolved against the
    /// reduced ring. If no nodes remain, those memo entries are dropped so
    /// a later lookup resolves fresh against whatever nodes exist by then.
    pub fn remove_node(&mut self, node: &Node) {
        if !self.nodes.remove(node) {
            return;
        }

        let orphaned: Vec<u64> = self
            .assignments
            .iter()
            .filter(|(_, owner)| *owner == node)
            .map(|(&pos, _)| pos)
            .collect();

        for i in 0..self.virtual_nodes {
            let pos = self.replica_position(node, i);
            if self.vnodes.get(&pos) == Some(node) {
                self.vnodes.remove(&pos);
            }
        }

        for key_pos in orphaned {
            match self.successor(key_pos) {
                Some(owner) => {
                    let owner = owner.clone();
                    self.assignments.insert(key_pos, owner);
                }
                None => {
                    self.assignments.remove(&key_pos);
                }
            }
        }

        debug!(%node, "removed node from ring");
    }

    /// Resolve the node responsible for `key`.
    ///
    /// Returns `None` when no nodes are registered. A repeat lookup of the
    /// same key is a memo hit and does not walk the ring; a miss walks the
    /// ring and memoizes the result, so this conceptually-read operation
    /// does mutate the memo.
    pub fn get_node(&mut self, key: &str) -> Option<Node> {
        if self.vnodes.is_empty() {
            return None;
        }

        let pos = self.hasher.position(key);
        if let Some(owner) = self.assignments.get(&pos) {
            return Some(owner.clone());
        }

        let owner = self.successor(pos)?.clone();
        self.assignments.insert(pos, owner.clone());
        Some(owner)
    }

    /// Number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of virtual-replica positions on the ring.
    ///
    /// Normally `node_count() * virtual_nodes`; less if replicas collided.
    pub fn vnode_count(&self) -> usize {
        self.vnodes.len()
    }

    /// Number of memoized key assignments.
    pub fn memo_len(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the given node is registered.
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains(node)
    }

    /// All registered nodes, sorted by name.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    /// Configured virtual replicas per node.
    pub fn virtual_nodes(&self) -> usize {
        self.virtual_nodes
    }

    /// Ring position of a node's `i`-th virtual replica.
    ///
    /// Hashes the node's stable name, never any other textual form —
    /// insertion and removal must agree on this input byte for byte or
    /// removal would leave stale replicas behind.
    fn replica_position(&self, node: &Node, i: usize) -> u64 {
        self.hasher.position(&format!("{}-{}", node.name(), i))
    }

    /// Clockwise successor: the node at the smallest ring position `>= pos`,
    /// wrapping to the first entry when `pos` is past every replica.
    fn successor(&self, pos: u64) -> Option<&Node> {
        self.vnodes
            .range(pos..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(_, node)| node)
    }

    /// Reassign memoized keys claimed by a freshly inserted replica.
    ///
    /// Only keys in the arc between the replica's predecessor (exclusive)
    /// and the replica itself (inclusive) change owner. When the replica
    /// lands before every other position the arc wraps past the maximum:
    /// `pos <= p || pos > prev`. Keys not yet memoized need nothing — their
    /// first lookup already sees the updated ring.
    fn rebalance_insertion(&mut self, node: &Node, p: u64) {
        let prev = match self.vnodes.range(..p).next_back() {
            Some((&prev, _)) => prev,
            // No position below p: the predecessor wraps to the largest
            // position overall (p itself when it is the only entry, in
            // which case the arc covers the whole ring).
            None => match self.vnodes.last_key_value() {
                Some((&last, _)) => last,
                None => return,
            },
        };
        let wraps = prev >= p;

        for (key_pos, owner) in self.assignments.iter_mut() {
            let claimed = if wraps {
                *key_pos <= p || *key_pos > prev
            } else {
                *key_pos > prev && *key_pos <= p
            };
            if claimed && owner != node {
                debug!(key_pos, from = %owner, to = %node, "rebalanced memoized key");
                *owner = node.clone();
            }
        }
    }
}
