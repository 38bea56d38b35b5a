//! SHA-256 content hashing for duplicate elimination
//!
//! Duplicate elimination deletes files, so the digest has to make
//! accidental collisions a non-concern. Hashing streams the full byte
//! content; filenames, extensions and metadata never enter the digest.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::trace;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Compute the hex SHA-256 digest of a file's full content
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::HashComputation {
        path: path.to_path_buf(),
        message: format!("Failed to open file: {e}"),
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::HashComputation {
            path: path.to_path_buf(),
            message: format!("Failed to read file: {e}"),
        })?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hex::encode(hasher.finalize());
    trace!(?path, hash, "Computed file hash");
    Ok(hash)
}
