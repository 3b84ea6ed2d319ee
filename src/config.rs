//! Configuration for Dura
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{DuraError, Result};

/// Default upper bound on one block's payload (1 MiB)
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 1 << 20;

/// Main configuration for an archive handle
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the archive
    /// Internal structure:
    ///   {archive_dir}/
    ///     ├── DURA             (archive marker)
    ///     ├── b0000/           (band directory)
    ///     │   ├── BANDHEAD
    ///     │   ├── BANDTAIL     (present iff finished)
    ///     │   └── 000000 ...   (block files)
    ///     └── b0001/ ...
    pub archive_dir: PathBuf,

    /// Sync strategy: whether files and directories are fsynced
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Block Configuration
    // -------------------------------------------------------------------------
    /// Largest payload accepted by a single block store (in bytes)
    pub max_block_size: usize,

    /// Verify the payload CRC when reading blocks back
    pub verify_checksums: bool,
}

/// Durability strategy for files written into the archive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync every file before it becomes visible, and its directory after
    Always,

    /// Never fsync (scratch archives and tests only)
    Never,
}

impl SyncStrategy {
    pub fn should_sync(self) -> bool {
        matches!(self, SyncStrategy::Always)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("./dura_archive"),
            sync_strategy: SyncStrategy::Always,
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
            verify_checksums: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Default config rooted at the given directory
    pub fn for_dir(path: impl Into<PathBuf>) -> Self {
        Self::builder().archive_dir(path).build()
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_block_size == 0 {
            return Err(DuraError::Config(
                "max_block_size must be greater than zero".to_string(),
            ));
        }
        if self.archive_dir.as_os_str().is_empty() {
            return Err(DuraError::Config("archive_dir is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the archive root directory
    pub fn archive_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.archive_dir = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the maximum block payload size (in bytes)
    pub fn max_block_size(mut self, size: usize) -> Self {
        self.config.max_block_size = size;
        self
    }

    /// Enable or disable CRC verification on read
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.config.verify_checksums = verify;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
