//! Band number allocation
//!
//! The default allocator derives the next band number from a directory scan:
//! the filesystem is the counter. That is sound for a single writer process.
//! Deployments with several writers can plug in their own `BandAllocator`
//! (atomic counter, lease, ...) without changing the archive or band types.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::band::BandNumber;
use crate::error::Result;

/// Source of new band numbers for an archive
pub trait BandAllocator: fmt::Debug + Send + Sync {
    /// Pick the number for the next band in the archive at `archive_dir`.
    ///
    /// Must be greater than every band already present.
    fn allocate(&self, archive_dir: &Path) -> Result<BandNumber>;
}

/// Allocates max existing band + 1, or `0000` for an empty archive
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanAllocator;

impl BandAllocator for ScanAllocator {
    fn allocate(&self, archive_dir: &Path) -> Result<BandNumber> {
        // A stray file named like a band still blocks that directory name,
        // so it counts here even though it is not listed as a band.
        Ok(scan(archive_dir, true)?
            .last()
            .map_or_else(BandNumber::zero, BandNumber::next))
    }
}

/// All band directories under `archive_dir`, ascending by value.
///
/// Entries that are not `b<digits>` directories are ignored.
pub fn scan_band_numbers(archive_dir: &Path) -> Result<Vec<BandNumber>> {
    scan(archive_dir, false)
}

fn scan(archive_dir: &Path, include_files: bool) -> Result<Vec<BandNumber>> {
    let mut numbers = Vec::new();
    for entry in fs::read_dir(archive_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(number) = name.to_str().and_then(BandNumber::from_dir_name) else {
            continue;
        };
        if include_files || entry.file_type()?.is_dir() {
            numbers.push(number);
        }
    }
    numbers.sort();
    numbers.dedup();
    Ok(numbers)
}
