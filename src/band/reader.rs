//! Band Reader
//!
//! Read-only view of an existing band. Every call looks at the directory as
//! it is at that moment; a reader alongside an active writer simply sees the
//! block list grow between calls.

use std::path::Path;

use tracing::debug;

use crate::block::BlockNumber;
use crate::config::Config;
use crate::error::{DuraError, Result};

use super::{find_band_dir, BandDir, BandInfo, BandNumber, BandProblem};

/// Reader for one band
#[derive(Debug, Clone)]
pub struct BandReader {
    dir: BandDir,
}

impl BandReader {
    /// Open band `number` under `archive_dir`.
    ///
    /// Fails with `NotFound` if there is no such band directory, and with
    /// `UnsupportedVersion` if its head names an unknown band format. A band
    /// with no head at all (writer died right after creating it) opens fine.
    pub(crate) fn open(archive_dir: &Path, number: BandNumber, config: &Config) -> Result<Self> {
        let path = find_band_dir(archive_dir, &number)?
            .ok_or_else(|| DuraError::NotFound(archive_dir.join(number.dir_name())))?;
        let dir = BandDir::new(number, path, config.clone());
        dir.check_version()?;
        debug!(band = %dir.number(), "opened band reader");
        Ok(Self { dir })
    }

    pub fn band_number(&self) -> &BandNumber {
        self.dir.number()
    }

    /// The band's directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Whether the band's tail marker is on disk
    pub fn is_finished(&self) -> Result<bool> {
        self.dir.has_tail()
    }

    /// Blocks committed so far, ascending
    pub fn list_blocks(&self) -> Result<Vec<BlockNumber>> {
        self.dir.list_blocks()
    }

    /// Read and verify one block's payload
    pub fn read_block(&self, number: BlockNumber) -> Result<Vec<u8>> {
        self.dir.read_block(number)
    }

    /// Problems with the layout of the band directory, empty if none.
    ///
    /// See `BandProblem` for what is checked. Each problem is also logged.
    pub fn validate(&self) -> Result<Vec<BandProblem>> {
        self.dir.validate()
    }

    pub fn info(&self) -> Result<BandInfo> {
        self.dir.info()
    }
}
