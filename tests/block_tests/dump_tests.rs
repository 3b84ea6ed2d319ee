//! Tests for BlockDump

use std::fs;

use dura::block::HEADER_SIZE;
use dura::{BlockDump, DuraError};
use tempfile::TempDir;

use super::scratch_archive;

#[test]
fn test_dump_valid_block() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();
    let number = writer.write_block(b"index block contents").unwrap();

    let dump = BlockDump::read(&writer.path().join(number.file_name())).unwrap();

    assert!(dump.is_valid());
    assert_eq!(dump.payload_len, 20);
    assert_eq!(dump.file_size, (HEADER_SIZE + 20) as u64);
    assert_eq!(dump.preview, b"index block contents");

    let rendered = dump.to_string();
    assert!(rendered.contains("payload:     20 bytes"), "{}", rendered);
    assert!(rendered.contains("|index block cont|"), "{}", rendered);
    assert!(!rendered.contains("[BAD]"), "{}", rendered);
}

#[test]
fn test_dump_reports_bad_crc() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();
    let number = writer.write_block(b"abcdef").unwrap();
    let path = writer.path().join(number.file_name());

    let mut bytes = fs::read(&path).unwrap();
    bytes[HEADER_SIZE + 2] = b'Z';
    fs::write(&path, &bytes).unwrap();

    let dump = BlockDump::read(&path).unwrap();
    assert!(dump.magic_ok());
    assert!(dump.length_ok());
    assert!(!dump.crc_ok());
    assert!(!dump.is_valid());
    assert!(dump.to_string().contains("[BAD]"));
}

#[test]
fn test_dump_long_payload_is_truncated() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();
    let number = writer.write_block(&[0x41; 200]).unwrap();

    let dump = BlockDump::read(&writer.path().join(number.file_name())).unwrap();

    assert_eq!(dump.preview.len(), 64);
    assert!(dump.to_string().contains("... 136 more bytes"));
}

#[test]
fn test_dump_short_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("000000");
    fs::write(&path, b"tiny").unwrap();

    assert!(matches!(BlockDump::read(&path), Err(DuraError::Corruption(_))));
}

#[test]
fn test_dump_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    assert!(matches!(
        BlockDump::read(&temp_dir.path().join("nope")),
        Err(DuraError::Io(_))
    ));
}
