//! Block frame header
//!
//! Encoded with bincode's default (fixint, little-endian) options, which
//! gives a fixed 18-byte header for this struct.

use serde::{Deserialize, Serialize};

use crate::error::{DuraError, Result};

/// Magic bytes identifying a Dura block file
pub const MAGIC: [u8; 4] = *b"DBLK";

/// Current block frame version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + PayloadLen (8) + CRC (4) = 18 bytes
pub const HEADER_SIZE: usize = 18;

/// Header written in front of every block payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub magic: [u8; 4],
    pub version: u16,
    pub payload_len: u64,
    pub crc: u32,
}

impl BlockHeader {
    /// Header describing `payload`
    pub fn for_payload(payload: &[u8]) -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            payload_len: payload.len() as u64,
            crc: crc32fast::hash(payload),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = bincode::serialize(self)?;
        debug_assert_eq!(bytes.len(), HEADER_SIZE);
        Ok(bytes)
    }

    /// Decode the header at the start of `bytes`.
    ///
    /// Only checks that enough bytes are present; magic and version are left
    /// to the caller so the dumper can show malformed headers.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(DuraError::Corruption(format!(
                "block is {} bytes, shorter than the {} byte header",
                bytes.len(),
                HEADER_SIZE
            )));
        }
        Ok(bincode::deserialize(&bytes[..HEADER_SIZE])?)
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == MAGIC
    }
}
