//! Node identity.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A logical node on the ring, identified by an immutable name.
///
/// Equality and hashing are by name. The name is reference-counted, so
/// cloning a `Node` is cheap — the ring stores one clone per virtual
/// replica plus one per memoized key assignment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    name: Arc<str>,
}

impl Node {
    /// Create a node with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// The node's stable name, used for hashing and identity.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.name)
    }
}

impl From<&str> for Node {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Node {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_name() {
        assert_eq!(Node::new("cache-1"), Node::new("cache-1"));
        assert_ne!(Node::new("cache-1"), Node::new("cache-2"));
    }

    #[test]
    fn test_clone_preserves_identity() {
        let node = Node::new("cache-1");
        let clone = node.clone();
        assert_eq!(node, clone);
        assert_eq!(clone.name(), "cache-1");
    }

    #[test]
    fn test_display_is_the_name() {
        assert_eq!(Node::new("cache-1").to_string(), "cache-1");
    }
}
