//! Debug dumper for stored block files
//!
//! Parses a block file on its own, without an archive handle, and renders
//! what it finds. Malformed headers and bad checksums are reported in the
//! dump rather than treated as errors, since those are what one usually
//! wants to look at.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::block::{BlockHeader, HEADER_SIZE, MAGIC, VERSION};
use crate::error::Result;

/// Bytes of payload shown in the preview
const PREVIEW_BYTES: usize = 64;

const BYTES_PER_LINE: usize = 16;

/// Parsed contents of one block file
#[derive(Debug, Clone)]
pub struct BlockDump {
    pub path: PathBuf,
    pub file_size: u64,
    pub header: BlockHeader,

    /// Payload bytes actually present after the header
    pub payload_len: u64,

    /// CRC32 of the payload bytes present
    pub computed_crc: u32,
    pub preview: Vec<u8>,
}

impl BlockDump {
    /// Read and parse the block file at `path`.
    ///
    /// Fails only if the file can't be read or is shorter than a header.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let header = BlockHeader::decode(&bytes)?;
        let payload = &bytes[HEADER_SIZE..];
        Ok(Self {
            path: path.to_path_buf(),
            file_size: bytes.len() as u64,
            header,
            payload_len: payload.len() as u64,
            computed_crc: crc32fast::hash(payload),
            preview: payload[..payload.len().min(PREVIEW_BYTES)].to_vec(),
        })
    }

    pub fn magic_ok(&self) -> bool {
        self.header.magic == MAGIC
    }

    pub fn version_ok(&self) -> bool {
        self.header.version == VERSION
    }

    pub fn length_ok(&self) -> bool {
        self.header.payload_len == self.payload_len
    }

    pub fn crc_ok(&self) -> bool {
        self.header.crc == self.computed_crc
    }

    /// True if nothing about the block looks wrong
    pub fn is_valid(&self) -> bool {
        self.magic_ok() && self.version_ok() && self.length_ok() && self.crc_ok()
    }
}

fn flag(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "BAD"
    }
}

impl fmt::Display for BlockDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.path.display())?;
        writeln!(f, "  file size:   {} bytes", self.file_size)?;
        writeln!(
            f,
            "  magic:       {:?} [{}]",
            String::from_utf8_lossy(&self.header.magic),
            flag(self.magic_ok())
        )?;
        writeln!(
            f,
            "  version:     {} [{}]",
            self.header.version,
            flag(self.version_ok())
        )?;
        writeln!(
            f,
            "  payload:     {} bytes (header says {}) [{}]",
            self.payload_len,
            self.header.payload_len,
            flag(self.length_ok())
        )?;
        writeln!(
            f,
            "  crc32:       stored {:#010x}, computed {:#010x} [{}]",
            self.header.crc,
            self.computed_crc,
            flag(self.crc_ok())
        )?;
        for (i, line) in self.preview.chunks(BYTES_PER_LINE).enumerate() {
            let hex: Vec<String> = line.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = line
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            writeln!(
                f,
                "  {:08x}  {:<48} |{}|",
                i * BYTES_PER_LINE,
                hex.join(" "),
                ascii
            )?;
        }
        if self.payload_len > self.preview.len() as u64 {
            writeln!(
                f,
                "  ... {} more bytes",
                self.payload_len - self.preview.len() as u64
            )?;
        }
        Ok(())
    }
}
