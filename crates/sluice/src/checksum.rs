//! Content checksum and size computation.
//!
//! Files are hashed in fixed-size chunks so arbitrarily large inputs stay in
//! bounded memory. Results are content-addressed, so the hash must be
//! collision-resistant; SHA-256 is used throughout.

use crate::result::IngestResult;
use crate::Result;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CHUNK_SIZE: usize = 8192;

/// Compute and record the content hash and byte size for `result`.
///
/// No-op when `path` is not a regular file, or when the checksum is already
/// set. When a caller supplied a precomputed checksum without a size, the
/// size alone is backfilled from filesystem metadata.
pub fn checksum_file(result: &mut IngestResult, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }

    if result.checksum.is_none() {
        let mut hasher = Sha256::new();
        let mut size: u64 = 0;
        let mut file = File::open(path)?;
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let read = file.read(&mut buf)?;
            if read == 0 {
                break;
            }
            size += read as u64;
            hasher.update(&buf[..read]);
        }

        result.checksum = Some(format!("{:x}", hasher.finalize()));
        result.size = Some(size);
    }

    if result.size.is_none() {
        result.size = Some(path.metadata()?.len());
    }

    Ok(())
}
