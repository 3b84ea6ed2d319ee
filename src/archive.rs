//! Archive Module
//!
//! The top-level container: one directory holding a marker file and one
//! directory per band.
//!
//! ## Responsibilities
//! - Create a new archive (refusing any existing path)
//! - Open an existing archive and check its marker
//! - Create bands (returns a writer) and open them (returns a reader)
//! - List bands in numeric order

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::allocator::{scan_band_numbers, BandAllocator, ScanAllocator};
use crate::band::{BandNumber, BandReader, BandWriter};
use crate::config::Config;
use crate::error::{DuraError, Result};
use crate::io::{read_json, sync_dir, write_json};

/// Archive format-compatibility version
pub const ARCHIVE_VERSION: &str = "0.1";

/// Name of the marker file in the archive root
pub const HEADER_FILENAME: &str = "DURA";

#[derive(Debug, Serialize, Deserialize)]
struct ArchiveHeader {
    dura_archive_version: String,
}

/// Handle on an archive directory
///
/// Holds no mutable state; every query reads the directory. Cheap to open
/// many times.
#[derive(Debug)]
pub struct Archive {
    config: Config,

    /// Picks numbers for new bands
    allocator: Box<dyn BandAllocator>,
}

impl Archive {
    /// Make a new archive directory at `path` with default config
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with_config(Config::for_dir(path.as_ref()))
    }

    /// Make a new archive at `config.archive_dir` and write its marker.
    ///
    /// Fails with `AlreadyExists` if anything is already at that path.
    /// Missing parent directories are created.
    pub fn create_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let dir = config.archive_dir.clone();
        debug!(path = %dir.display(), "creating archive directory");

        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if let Err(e) = fs::create_dir(&dir) {
            if e.kind() == ErrorKind::AlreadyExists {
                return Err(DuraError::AlreadyExists(dir));
            }
            error!(path = %dir.display(), "failed to create archive directory: {}", e);
            return Err(e.into());
        }

        let header = ArchiveHeader {
            dura_archive_version: ARCHIVE_VERSION.to_string(),
        };
        write_json(&dir, HEADER_FILENAME, &header, config.sync_strategy)?;
        if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
            sync_dir(parent, config.sync_strategy)?;
        }

        info!(path = %dir.display(), "created new archive");
        Ok(Self::with_config(config))
    }

    /// Open an existing archive at `path` with default config
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(Config::for_dir(path.as_ref()))
    }

    /// Open the archive at `config.archive_dir`.
    ///
    /// Fails with `NotFound` if the path is missing, `NotAnArchive` if it has
    /// no readable marker, and `UnsupportedVersion` for a marker from another
    /// archive format.
    pub fn open_with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let dir = &config.archive_dir;
        if !dir.try_exists()? {
            return Err(DuraError::NotFound(dir.clone()));
        }
        if !dir.is_dir() {
            return Err(DuraError::NotAnArchive(dir.clone()));
        }

        let header_path = dir.join(HEADER_FILENAME);
        let header: ArchiveHeader = match read_json(&header_path) {
            Ok(h) => h,
            Err(e) => {
                debug!(path = %header_path.display(), "no usable archive header: {}", e);
                return Err(DuraError::NotAnArchive(dir.clone()));
            }
        };
        if header.dura_archive_version != ARCHIVE_VERSION {
            error!(
                path = %header_path.display(),
                version = %header.dura_archive_version,
                "unsupported archive version"
            );
            return Err(DuraError::UnsupportedVersion {
                path: header_path,
                version: header.dura_archive_version,
            });
        }

        debug!(path = %dir.display(), "opened archive");
        Ok(Self::with_config(config))
    }

    fn with_config(config: Config) -> Self {
        Self {
            config,
            allocator: Box::new(ScanAllocator),
        }
    }

    /// Replace the band number allocator
    pub fn with_allocator(mut self, allocator: Box<dyn BandAllocator>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Start a new band after all existing ones and return its writer.
    ///
    /// The band directory is created atomically; if another process took the
    /// same number first this fails with `AlreadyExists`.
    pub fn create_band(&self) -> Result<BandWriter> {
        let number = self.allocator.allocate(self.path())?;
        BandWriter::create(self.path(), number, &self.config)
    }

    /// Open a reader on an existing band.
    ///
    /// `band_number` is canonicalized first, so `"7"`, `"0007"` and a
    /// `BandNumber` all work. Fails with `InvalidFormat` for non-digit text
    /// and `NotFound` if no such band exists.
    pub fn open_band_reader(&self, band_number: impl AsRef<str>) -> Result<BandReader> {
        let number = BandNumber::parse(band_number.as_ref())?;
        BandReader::open(self.path(), number, &self.config)
    }

    /// Band numbers present now, ascending by value.
    ///
    /// Each call rescans the directory.
    pub fn list_bands(&self) -> Result<impl Iterator<Item = BandNumber>> {
        Ok(scan_band_numbers(self.path())?.into_iter())
    }

    /// The highest band number present, if any
    pub fn last_band_number(&self) -> Result<Option<BandNumber>> {
        Ok(scan_band_numbers(self.path())?.pop())
    }

    /// Top-level directory of the archive
    pub fn path(&self) -> &Path {
        &self.config.archive_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
