//! Block Module
//!
//! Blocks are the atomic stored units inside a band. Each block is one file
//! in the band directory, named by its zero-padded sequence number.
//!
//! ## Responsibilities
//! - Block numbering (`000000`, `000001`, ...) unique within a band
//! - Framing payloads with a checksummed header
//! - Write-once storage: content is durable before the name is visible
//! - Listing committed blocks in numeric order
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (18 bytes, bincode fixint little-endian)         │
//! │   Magic: "DBLK" (4) | Version: u16 (2)                  │
//! │   PayloadLen: u64 (8) | PayloadCRC32: u32 (4)           │
//! ├─────────────────────────────────────────────────────────┤
//! │ Payload (PayloadLen bytes)                              │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod frame;
mod store;

use std::fmt;
use std::str::FromStr;

use crate::error::{DuraError, Result};

pub use frame::{BlockHeader, HEADER_SIZE, MAGIC, VERSION};
pub(crate) use store::{list_block_numbers, read_block_file, store_block_file};

/// Minimum number of digits in a block file name
pub const BLOCK_NUMBER_WIDTH: usize = 6;

/// Sequence number of a block within its band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const ZERO: BlockNumber = BlockNumber(0);

    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// Parse a block file name.
    ///
    /// Only the canonical spelling is accepted: `000042` is block 42, while
    /// `42` or `0000042` are foreign files, not a second copy of it.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number = Self(name.parse().ok()?);
        (number.file_name() == name).then_some(number)
    }

    /// File name within the band directory, e.g. `"000042"`
    pub fn file_name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$}", self.0, width = BLOCK_NUMBER_WIDTH)
    }
}

impl FromStr for BlockNumber {
    type Err = DuraError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_file_name(s).ok_or_else(|| DuraError::InvalidFormat(s.to_string()))
    }
}

impl PartialEq<&str> for BlockNumber {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}
