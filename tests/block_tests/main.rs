//! Tests for block storage and the block dumper

mod dump_tests;

use dura::{Archive, Config, SyncStrategy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

pub fn scratch_archive_with(max_block_size: usize) -> (TempDir, Archive) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .archive_dir(temp_dir.path().join("archive"))
        .sync_strategy(SyncStrategy::Never)
        .max_block_size(max_block_size)
        .build();
    let archive = Archive::create_with_config(config).unwrap();
    (temp_dir, archive)
}

pub fn scratch_archive() -> (TempDir, Archive) {
    scratch_archive_with(dura::config::DEFAULT_MAX_BLOCK_SIZE)
}
