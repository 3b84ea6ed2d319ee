//! Filesystem helpers shared by the archive, band and block layers.
//!
//! Everything that becomes visible in the archive is written to a `tmp`
//! file first and then renamed or linked into place, so a name in a listing
//! always refers to complete content.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::SyncStrategy;
use crate::error::{DuraError, Result};

/// Temporary files in the archive have this prefix
pub(crate) const TMP_PREFIX: &str = "tmp";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub(crate) fn is_tmp_name(name: &str) -> bool {
    name.starts_with(TMP_PREFIX)
}

/// A temp file name unique within this process
fn tmp_name() -> String {
    let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", TMP_PREFIX, std::process::id(), n)
}

/// Write `bytes` to a fresh temp file in `dir`, synced per `sync`
fn write_tmp(dir: &Path, bytes: &[&[u8]], sync: SyncStrategy) -> Result<PathBuf> {
    let tmp_path = dir.join(tmp_name());
    let written = (|| -> Result<()> {
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&tmp_path)?;
        for chunk in bytes {
            file.write_all(chunk)?;
        }
        if sync.should_sync() {
            file.sync_all()?;
        }
        Ok(())
    })();
    if let Err(e) = written {
        // Best effort: a leftover tmp file is ignored by listings anyway.
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    Ok(tmp_path)
}

/// Write `bytes` to `dir/name` via a temp file and rename.
///
/// Replaces `name` if it already exists. Use `write_atomic_new` for
/// write-once files.
pub(crate) fn write_atomic(
    dir: &Path,
    name: &str,
    bytes: &[&[u8]],
    sync: SyncStrategy,
) -> Result<()> {
    let tmp_path = write_tmp(dir, bytes, sync)?;
    if let Err(e) = fs::rename(&tmp_path, dir.join(name)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    sync_dir(dir, sync)
}

/// Write `bytes` to `dir/name` via a temp file, never replacing `name`.
///
/// The temp file is hard-linked into place, which fails atomically if the
/// target exists, so of two concurrent writers of one name exactly one wins.
/// The loser gets `AlreadyExists` and the winner's content is untouched.
pub(crate) fn write_atomic_new(
    dir: &Path,
    name: &str,
    bytes: &[&[u8]],
    sync: SyncStrategy,
) -> Result<()> {
    let tmp_path = write_tmp(dir, bytes, sync)?;
    let target = dir.join(name);
    let linked = fs::hard_link(&tmp_path, &target);
    let _ = fs::remove_file(&tmp_path);
    match linked {
        Ok(()) => sync_dir(dir, sync),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(DuraError::AlreadyExists(target)),
        Err(e) => Err(e.into()),
    }
}

/// Create `path`, failing with `ErrorKind::AlreadyExists` if it is present.
pub(crate) fn write_new(path: &Path, bytes: &[u8], sync: SyncStrategy) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create_new(true).write(true).open(path)?;
    file.write_all(bytes)?;
    if sync.should_sync() {
        file.sync_all()?;
    }
    Ok(())
}

/// Make directory entry changes (creates, renames) in `dir` durable
pub(crate) fn sync_dir(dir: &Path, sync: SyncStrategy) -> Result<()> {
    if !sync.should_sync() {
        return Ok(());
    }
    #[cfg(unix)]
    File::open(dir)?.sync_all()?;
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

pub(crate) fn to_json_line<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut json = serde_json::to_vec(value)?;
    json.push(b'\n');
    Ok(json)
}

pub(crate) fn write_json<T: Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
    sync: SyncStrategy,
) -> Result<()> {
    let json = to_json_line(value)?;
    write_atomic(dir, name, &[json.as_slice()], sync)
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
