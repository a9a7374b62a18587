//! Key hashing.
//!
//! Keys are hashed with DJB2 (Dan Bernstein's `hash * 33 + byte`), computed
//! over the key's UTF-8 bytes with wrapping 32-bit arithmetic.

/// The initial DJB2 state.
pub const SEED: u32 = 5381;

/// Computes the DJB2 hash of `bytes`.
///
/// # Examples
///
/// ```
/// use strtab::djb2;
///
/// assert_eq!(djb2(b""), 5381);
/// assert_eq!(djb2(b"a"), 5381 * 33 + 97);
/// ```
#[inline]
pub fn djb2(bytes: &[u8]) -> u32 {
  bytes.iter().fold(SEED, |hash, &byte| {
    // hash * 33 + byte
    (hash << 5).wrapping_add(hash).wrapping_add(u32::from(byte))
  })
}
