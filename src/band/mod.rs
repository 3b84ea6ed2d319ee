//! Band Module
//!
//! A band is one backup run: a directory under the archive root holding an
//! ordered sequence of blocks.
//!
//! ## Responsibilities
//! - Band numbering and ordering (`number`)
//! - Single writer per band: allocates block numbers, stores blocks, and
//!   finishes the band exactly once (`writer`)
//! - Any number of read-only readers, also while the writer is active
//!   (`reader`)
//!
//! ## Layout
//! ```text
//! b0042/
//!   ├── BANDHEAD     {"start_time":..,"band_format_version":"0.1"}
//!   ├── BANDTAIL     {"end_time":..}   (present iff finished)
//!   ├── 000000       framed block
//!   └── 000001 ...
//! ```
//!
//! ## Lifecycle
//! `Open` → `Finished`, one way. The presence of `BANDTAIL` on disk is the
//! only persisted form of the state.

pub mod number;
mod reader;
mod writer;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::block::{self, BlockNumber};
use crate::config::Config;
use crate::error::{DuraError, Result};
use crate::io::{is_tmp_name, read_json};

pub use number::BandNumber;
pub use reader::BandReader;
pub use writer::BandWriter;

/// Metadata file written when a band is created
pub(crate) const HEAD_FILENAME: &str = "BANDHEAD";

/// Marker file written when a band is finished
pub(crate) const TAIL_FILENAME: &str = "BANDTAIL";

/// Band format written by this version; readers accept only this
pub const BAND_FORMAT_VERSION: &str = "0.1";

/// In-memory form of the band lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandState {
    /// Blocks may still be appended
    Open,

    /// Permanently closed; the tail marker is on disk
    Finished,
}

impl BandState {
    pub fn is_finished(self) -> bool {
        matches!(self, BandState::Finished)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BandHead {
    /// Seconds since the Unix epoch when writing of this band began
    pub start_time: u64,

    /// Format of the band, for compatibility checks by readers
    pub band_format_version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BandTail {
    /// Seconds since the Unix epoch when the band was finished
    pub end_time: u64,
}

/// Read-only summary of a band, from `info()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandInfo {
    pub number: BandNumber,
    pub is_finished: bool,

    /// Unix seconds when the band was created, if its head is readable
    pub start_time: Option<u64>,

    /// Unix seconds when the band was finished
    pub end_time: Option<u64>,

    pub block_count: usize,
}

/// Something wrong with the layout of a band directory, from `validate()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BandProblem {
    /// No `BANDHEAD` file
    MissingHead,

    /// A file that is not the head, the tail, a temp file or a block
    UnexpectedFile(String),

    /// Bands hold no subdirectories
    UnexpectedDirectory(String),
}

impl fmt::Display for BandProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandProblem::MissingHead => write!(f, "no band head file"),
            BandProblem::UnexpectedFile(name) => write!(f, "unexpected file {:?}", name),
            BandProblem::UnexpectedDirectory(name) => {
                write!(f, "unexpected directory {:?}", name)
            }
        }
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A band's directory and the archive settings it was opened with.
///
/// Shared by writer and reader; every query goes to disk.
#[derive(Debug, Clone)]
pub(crate) struct BandDir {
    number: BandNumber,
    path: PathBuf,
    config: Config,
}

impl BandDir {
    pub fn new(number: BandNumber, path: PathBuf, config: Config) -> Self {
        Self {
            number,
            path,
            config,
        }
    }

    pub fn number(&self) -> &BandNumber {
        &self.number
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tail_path(&self) -> PathBuf {
        self.path.join(TAIL_FILENAME)
    }

    pub fn has_tail(&self) -> Result<bool> {
        Ok(self.tail_path().try_exists()?)
    }

    pub fn list_blocks(&self) -> Result<Vec<BlockNumber>> {
        block::list_block_numbers(&self.path)
    }

    pub fn read_block(&self, number: BlockNumber) -> Result<Vec<u8>> {
        block::read_block_file(
            &self.path.join(number.file_name()),
            self.config.verify_checksums,
        )
    }

    /// Head of the band, or `None` if the writer never got to write it
    pub fn read_head(&self) -> Result<Option<BandHead>> {
        let path = self.path.join(HEAD_FILENAME);
        if !path.try_exists()? {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Fail if the head names a band format this version can't read
    pub fn check_version(&self) -> Result<()> {
        if let Some(head) = self.read_head()? {
            if head.band_format_version != BAND_FORMAT_VERSION {
                return Err(DuraError::UnsupportedVersion {
                    path: self.path.join(HEAD_FILENAME),
                    version: head.band_format_version,
                });
            }
        }
        Ok(())
    }

    /// Check the directory holds only what a band should.
    ///
    /// Problems are returned (and logged), not raised: a damaged band is
    /// still readable as far as it goes.
    pub fn validate(&self) -> Result<Vec<BandProblem>> {
        let mut problems = Vec::new();
        let mut has_head = false;
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            entries.push((entry.file_name(), entry.file_type()?.is_dir()));
        }
        entries.sort();

        for (name, is_dir) in entries {
            let name = name.to_string_lossy().into_owned();
            if is_dir {
                problems.push(BandProblem::UnexpectedDirectory(name));
            } else if name == HEAD_FILENAME {
                has_head = true;
            } else if name != TAIL_FILENAME
                && !is_tmp_name(&name)
                && BlockNumber::from_file_name(&name).is_none()
            {
                problems.push(BandProblem::UnexpectedFile(name));
            }
        }
        if !has_head {
            problems.insert(0, BandProblem::MissingHead);
        }

        for problem in &problems {
            warn!(band = %self.number, path = %self.path.display(), "{}", problem);
        }
        Ok(problems)
    }

    pub fn info(&self) -> Result<BandInfo> {
        let start_time = self.read_head()?.map(|h| h.start_time);
        let is_finished = self.has_tail()?;
        let end_time = if is_finished {
            // The marker's presence is what counts; a torn tail just loses
            // its timestamp.
            match read_json::<BandTail>(&self.tail_path()) {
                Ok(tail) => Some(tail.end_time),
                Err(e) => {
                    warn!(band = %self.number, "unreadable band tail: {}", e);
                    None
                }
            }
        } else {
            None
        };
        Ok(BandInfo {
            number: self.number.clone(),
            is_finished,
            start_time,
            end_time,
            block_count: self.list_blocks()?.len(),
        })
    }
}

/// Find the directory holding band `number` under `archive_dir`.
///
/// Tries the canonical name first, then any `b<digits>` entry with the same
/// value (e.g. `b00042` for `0042`).
pub(crate) fn find_band_dir(archive_dir: &Path, number: &BandNumber) -> Result<Option<PathBuf>> {
    let canonical = archive_dir.join(number.dir_name());
    if canonical.is_dir() {
        return Ok(Some(canonical));
    }
    for entry in fs::read_dir(archive_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(found) = name.to_str().and_then(BandNumber::from_dir_name) else {
            continue;
        };
        if found == *number && entry.file_type()?.is_dir() {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}
