//! Consistent hashing ring for stable key-to-node distribution.
//!
//! This crate maps arbitrary string keys onto a dynamic set of named nodes.
//! Each key always resolves to the same node for a given membership, and
//! adding or removing a node only remaps the keys in the arc of the hash
//! space that actually changed hands — not the whole key space.
//!
//! Every node is placed on a `u64` ring at multiple positions (virtual
//! replicas), determined by hashing `"{name}-{index}"`. A key belongs to
//! the node at the nearest ring position clockwise from the key's own
//! position, wrapping past the maximum back to the start.
//!
//! [`Ring`] is the single-threaded core; [`Distributor`] wraps it in a
//! mutex for shared use across threads.

mod distributor;
mod error;
mod hash;
mod node;
mod ring;

pub use distributor::Distributor;
pub use error::RingError;
pub use hash::{Blake3Hasher, FnHasher, PositionHasher};
pub use node::Node;
pub use ring::{Ring, DEFAULT_VIRTUAL_NODES};
