//! Band Writer
//!
//! The single writer of a band: hands out block numbers, stores blocks and
//! finishes the band.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::block::{self, BlockNumber};
use crate::config::Config;
use crate::error::{DuraError, Result};
use crate::io::{sync_dir, to_json_line, write_json, write_new};

use super::{
    unix_now, BandDir, BandHead, BandInfo, BandNumber, BandState, BandTail, BAND_FORMAT_VERSION,
    HEAD_FILENAME,
};

/// Writer for one band
///
/// ## Concurrency:
/// - `next_block`: Atomic counter (lock-free allocation)
/// - `state`: RwLock; block stores hold the read side, `finish_band` takes
///   the write side, so no block can land after the tail marker
/// - All methods use `&self`, so one writer can be shared across threads
///
/// Only one writer may exist per band. Nothing on disk enforces this; two
/// processes writing the same band directory is undefined.
#[derive(Debug)]
pub struct BandWriter {
    dir: BandDir,

    /// Next block number to hand out
    next_block: AtomicU64,

    state: RwLock<BandState>,
}

impl BandWriter {
    /// Make the directory for a new band and write its head.
    ///
    /// The directory is created with a plain `create_dir`, so a band that
    /// already exists (for example one created concurrently by another
    /// process) fails with `AlreadyExists` instead of being shared.
    pub(crate) fn create(archive_dir: &Path, number: BandNumber, config: &Config) -> Result<Self> {
        let path = archive_dir.join(number.dir_name());
        if let Err(e) = fs::create_dir(&path) {
            return Err(match e.kind() {
                ErrorKind::AlreadyExists => DuraError::AlreadyExists(path),
                _ => e.into(),
            });
        }
        sync_dir(archive_dir, config.sync_strategy)?;

        let head = BandHead {
            start_time: unix_now(),
            band_format_version: BAND_FORMAT_VERSION.to_string(),
        };
        write_json(&path, HEAD_FILENAME, &head, config.sync_strategy)?;

        info!(band = %number, path = %path.display(), "created band");
        Ok(Self {
            dir: BandDir::new(number, path, config.clone()),
            next_block: AtomicU64::new(0),
            state: RwLock::new(BandState::Open),
        })
    }

    pub fn band_number(&self) -> &BandNumber {
        self.dir.number()
    }

    /// The band's directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Allocate the next block number.
    ///
    /// Nothing is written. A number that is never stored leaves a gap; it is
    /// not handed out again.
    pub fn next_block_number(&self) -> BlockNumber {
        BlockNumber::new(self.next_block.fetch_add(1, Ordering::SeqCst))
    }

    /// Durably store `payload` as block `number`.
    ///
    /// `number` must have come from `next_block_number()` on this writer and
    /// not have been stored yet; a second store of the same number, even a
    /// concurrent one, fails with `AlreadyExists`. The block appears in
    /// `list_blocks()` only after its content has been written (and synced,
    /// per config).
    pub fn store_block(&self, number: BlockNumber, payload: &[u8]) -> Result<()> {
        let state = self.state.read();
        if state.is_finished() {
            return Err(DuraError::AlreadyFinished(self.band_number().to_string()));
        }
        if number.value() >= self.next_block.load(Ordering::SeqCst) {
            return Err(DuraError::BlockNotAllocated(number.to_string()));
        }
        let limit = self.dir.config().max_block_size;
        if payload.len() > limit {
            return Err(DuraError::BlockTooLarge {
                size: payload.len(),
                limit,
            });
        }
        block::store_block_file(
            self.dir.path(),
            number,
            payload,
            self.dir.config().sync_strategy,
        )
    }

    /// Allocate a number and store `payload` under it
    pub fn write_block(&self, payload: &[u8]) -> Result<BlockNumber> {
        if self.is_finished() {
            return Err(DuraError::AlreadyFinished(self.band_number().to_string()));
        }
        let number = self.next_block_number();
        self.store_block(number, payload)?;
        Ok(number)
    }

    /// Blocks committed so far, ascending
    pub fn list_blocks(&self) -> Result<Vec<BlockNumber>> {
        self.dir.list_blocks()
    }

    /// Read back a block stored by this writer
    pub fn read_block(&self, number: BlockNumber) -> Result<Vec<u8>> {
        self.dir.read_block(number)
    }

    pub fn is_finished(&self) -> bool {
        self.state.read().is_finished()
    }

    /// Write the tail marker. No blocks can be stored afterwards.
    ///
    /// Fails with `AlreadyFinished` on a second call, or if the marker is
    /// already on disk.
    pub fn finish_band(&self) -> Result<()> {
        let mut state = self.state.write();
        if state.is_finished() {
            return Err(DuraError::AlreadyFinished(self.band_number().to_string()));
        }

        let tail = to_json_line(&BandTail {
            end_time: unix_now(),
        })?;
        let sync = self.dir.config().sync_strategy;
        if let Err(e) = write_new(&self.dir.tail_path(), &tail, sync) {
            if e.kind() == ErrorKind::AlreadyExists {
                *state = BandState::Finished;
                return Err(DuraError::AlreadyFinished(self.band_number().to_string()));
            }
            return Err(e.into());
        }
        sync_dir(self.dir.path(), sync)?;

        *state = BandState::Finished;
        info!(band = %self.band_number(), "finished band");
        debug!(
            band = %self.band_number(),
            blocks_allocated = self.next_block.load(Ordering::SeqCst),
            "band closed"
        );
        Ok(())
    }

    pub fn info(&self) -> Result<BandInfo> {
        self.dir.info()
    }
}
