//! Position hashing: mapping strings onto the `u64` ring.

/// Maps an input string to a position on the 64-bit ring.
///
/// The same hasher is used for node virtual-replica placement and for key
/// lookup, so both live in one shared position space. Implementations must
/// be deterministic; good uniform distribution matters, cryptographic
/// strength does not.
pub trait PositionHasher {
    /// Compute the ring position for `input`.
    fn position(&self, input: &str) -> u64;
}

/// Default position hasher: blake3 digest truncated to its first 8 bytes,
/// interpreted little-endian.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl PositionHasher for Blake3Hasher {
    fn position(&self, input: &str) -> u64 {
        let hash = blake3::hash(input.as_bytes());
        let bytes: [u8; 8] = hash.as_bytes()[..8].try_into().expect("8 bytes");
        u64::from_le_bytes(bytes)
    }
}

/// Adapter turning any `Fn(&str) -> u64` into a [`PositionHasher`].
///
/// Useful for custom digests and for tests that pin keys to exact ring
/// positions.
#[derive(Debug, Clone, Copy)]
pub struct FnHasher<F>(pub F);

impl<F> PositionHasher for FnHasher<F>
where
    F: Fn(&str) -> u64,
{
    fn position(&self, input: &str) -> u64 {
        (self.0)(input)
    }
}
