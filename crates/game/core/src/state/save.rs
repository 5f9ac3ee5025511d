//! Save blob encoding.
//!
//! Layout: `b"MXDC"` ‖ version (`u32` LE) ‖ SHA-256 of the payload ‖ bincode
//! payload of the [`RunState`]. The checksum is verified before decoding, so
//! a damaged blob never yields a partially restored run.

use sha2::{Digest, Sha256};

use crate::state::{RunState, SaveError};

pub const SAVE_MAGIC: [u8; 4] = *b"MXDC";
pub const SAVE_VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 32;

/// Encodes a run into a self-checking blob.
///
/// # Errors
///
/// [`SaveError::Encode`] if bincode rejects the state.
pub fn serialize_run_state(state: &RunState) -> Result<Vec<u8>, SaveError> {
    let payload = bincode::serialize(state).map_err(|e| SaveError::Encode(e.to_string()))?;
    let checksum: [u8; 32] = Sha256::digest(&payload).into();

    let mut blob = Vec::with_capacity(HEADER_LEN + payload.len());
    blob.extend_from_slice(&SAVE_MAGIC);
    blob.extend_from_slice(&SAVE_VERSION.to_le_bytes());
    blob.extend_from_slice(&checksum);
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Decodes a blob written by [`serialize_run_state`].
///
/// # Errors
///
/// [`SaveError::VersionMismatch`] for a blob of another version, and
/// [`SaveError::CorruptState`] for anything else that is off.
pub fn deserialize_run_state(blob: &[u8]) -> Result<RunState, SaveError> {
    if blob.len() < HEADER_LEN {
        return Err(SaveError::CorruptState(format!(
            "blob is {} bytes, header needs {HEADER_LEN}",
            blob.len()
        )));
    }
    let (magic, rest) = blob.split_at(4);
    let (version, rest) = rest.split_at(4);
    let (checksum, payload) = rest.split_at(32);

    if magic != SAVE_MAGIC {
        return Err(SaveError::CorruptState("bad magic".into()));
    }
    let found = u32::from_le_bytes([version[0], version[1], version[2], version[3]]);
    if found != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            found,
            expected: SAVE_VERSION,
        });
    }
    if Sha256::digest(payload).as_slice() != checksum {
        return Err(SaveError::CorruptState("checksum mismatch".into()));
    }

    bincode::deserialize(payload).map_err(|e| SaveError::CorruptState(e.to_string()))
}
