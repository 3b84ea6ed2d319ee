//! Block storage
//!
//! Writes framed blocks into a band directory and reads them back.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::SyncStrategy;
use crate::error::{DuraError, Result};
use crate::io::{is_tmp_name, write_atomic_new};

use super::{BlockHeader, BlockNumber, HEADER_SIZE, VERSION};

/// Persist one framed block as `dir/<number>`.
///
/// The frame goes to a temp file which is synced and then linked into place,
/// so the block name only appears once its content is durable. Fails with
/// `AlreadyExists` if the block is already stored, including when another
/// thread stores the same number concurrently.
pub(crate) fn store_block_file(
    dir: &Path,
    number: BlockNumber,
    payload: &[u8],
    sync: SyncStrategy,
) -> Result<()> {
    let header = BlockHeader::for_payload(payload).encode()?;
    write_atomic_new(dir, &number.file_name(), &[header.as_slice(), payload], sync)?;
    debug!(block = %number, bytes = payload.len(), dir = %dir.display(), "stored block");
    Ok(())
}

/// Read and validate a block file, returning its payload
pub(crate) fn read_block_file(path: &Path, verify_checksum: bool) -> Result<Vec<u8>> {
    let mut bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DuraError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let header = BlockHeader::decode(&bytes)?;
    if !header.has_valid_magic() {
        return Err(DuraError::Corruption(format!(
            "invalid block magic {:?} in {}",
            header.magic,
            path.display()
        )));
    }
    if header.version != VERSION {
        return Err(DuraError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: header.version.to_string(),
        });
    }

    let payload_len = (bytes.len() - HEADER_SIZE) as u64;
    if payload_len != header.payload_len {
        return Err(DuraError::Corruption(format!(
            "{} has {} payload bytes, header says {}",
            path.display(),
            payload_len,
            header.payload_len
        )));
    }

    let payload = bytes.split_off(HEADER_SIZE);
    if verify_checksum {
        let actual = crc32fast::hash(&payload);
        if actual != header.crc {
            warn!(path = %path.display(), "block checksum mismatch");
            return Err(DuraError::Corruption(format!(
                "CRC mismatch in {}: stored {:#010x}, computed {:#010x}",
                path.display(),
                header.crc,
                actual
            )));
        }
    }
    Ok(payload)
}

/// Committed block numbers in `dir`, ascending.
///
/// Temp files and other non-numeric entries are skipped.
pub(crate) fn list_block_numbers(dir: &Path) -> Result<Vec<BlockNumber>> {
    let mut numbers = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_tmp_name(name) || !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(number) = BlockNumber::from_file_name(name) {
            numbers.push(number);
        }
    }
    numbers.sort();
    Ok(numbers)
}
