//! Error types for ring construction.

/// Errors that can occur when building a ring.
///
/// Normal ring operation has no recoverable errors: looking up a key on an
/// empty ring yields `None`, and re-adding or removing an unknown node is a
/// silent no-op. Only construction-time contract violations are reported.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The configured virtual-replica count was zero.
    #[error("virtual_nodes must be at least 1, got {0}")]
    InvalidVirtualNodes(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_the_value() {
        let err = RingError::InvalidVirtualNodes(0);
        assert_eq!(err.to_string(), "virtual_nodes must be at least 1, got 0");
    }
}
