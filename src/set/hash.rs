//! Blob hash function

/// Multiplier applied to the blob length to seed the digest
const SEED: u64 = 5381;

/// Hash an arbitrary byte span to a 64-bit digest
///
/// Starts from `5381 * len`, then folds each byte in with
/// `hash = hash * 33 + byte`. All arithmetic wraps.
pub fn hash_blob(bytes: &[u8]) -> u64 {
    let seed = SEED.wrapping_mul(bytes.len() as u64);
    bytes.iter().fold(seed, |hash, &byte| {
        (hash << 5).wrapping_add(hash).wrapping_add(u64::from(byte))
    })
}
