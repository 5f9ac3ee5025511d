use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Derives the seed of one level from the run seed and the depth.
///
/// `SHA-256(run_seed_le ‖ depth_le)`, first eight bytes as a little-endian
/// `u64`. Every depth is reproducible without generating the ones above it.
pub fn level_seed(run_seed: u64, depth: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(run_seed.to_le_bytes());
    hasher.update(depth.to_le_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Generator stream for one level.
pub(super) fn level_rng(level_seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(level_seed)
}
