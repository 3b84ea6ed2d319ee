//! Tests for BandWriter
//!
//! These tests verify:
//! - Fresh band state (number, not finished, no blocks)
//! - Block number allocation and gaps
//! - Finishing exactly once, persisted on disk
//! - No writes after finish

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use dura::{BlockNumber, DuraError};

use super::scratch_archive;

// =============================================================================
// Fresh Band Tests
// =============================================================================

#[test]
fn test_first_band_is_zero() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    assert_eq!(writer.band_number(), "0000");
    assert!(!writer.is_finished());
    assert!(writer.list_blocks().unwrap().is_empty());
    assert!(writer.path().is_dir());
    assert_eq!(writer.path(), archive.path().join("b0000"));
}

#[test]
fn test_new_band_has_only_head() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    let names: Vec<String> = fs::read_dir(writer.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["BANDHEAD".to_string()]);
}

#[test]
fn test_next_block_number_starts_at_zero() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    assert_eq!(writer.next_block_number(), "000000");
    assert_eq!(writer.next_block_number(), "000001");
    assert_eq!(writer.next_block_number(), BlockNumber::new(2));
}

// =============================================================================
// Block Tests
// =============================================================================

#[test]
fn test_write_blocks_are_consecutive() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    for i in 0..5u64 {
        let number = writer.write_block(format!("block {}", i).as_bytes()).unwrap();
        assert_eq!(number, BlockNumber::new(i));
    }

    let blocks = writer.list_blocks().unwrap();
    assert_eq!(blocks, (0..5).map(BlockNumber::new).collect::<Vec<_>>());
    assert_eq!(writer.read_block(BlockNumber::new(3)).unwrap(), b"block 3");
}

#[test]
fn test_allocated_but_unstored_block_leaves_gap() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    let first = writer.next_block_number();
    let abandoned = writer.next_block_number();
    writer.store_block(first, b"kept").unwrap();
    let third = writer.write_block(b"after gap").unwrap();

    assert_eq!(abandoned, "000001");
    assert_eq!(third, "000002");
    assert_eq!(writer.list_blocks().unwrap(), vec![first, third]);
}

#[test]
fn test_store_unallocated_block_fails() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    let result = writer.store_block(BlockNumber::new(0), b"data");
    assert!(matches!(result, Err(DuraError::BlockNotAllocated(_))));
    assert!(writer.list_blocks().unwrap().is_empty());
}

#[test]
fn test_store_same_block_twice_fails() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    let number = writer.next_block_number();
    writer.store_block(number, b"first").unwrap();
    let result = writer.store_block(number, b"second");

    assert!(matches!(result, Err(DuraError::AlreadyExists(_))));
    assert_eq!(writer.read_block(number).unwrap(), b"first");
}

#[test]
fn test_concurrent_block_writes() {
    let (_temp, archive) = scratch_archive();
    let writer = Arc::new(archive.create_band().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..10 {
                    writer.write_block(format!("{}-{}", t, i).as_bytes()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let blocks = writer.list_blocks().unwrap();
    assert_eq!(blocks, (0..40).map(BlockNumber::new).collect::<Vec<_>>());
}

#[test]
fn test_racing_stores_of_one_block_have_one_winner() {
    let (_temp, archive) = scratch_archive();
    let writer = Arc::new(archive.create_band().unwrap());

    for _ in 0..100 {
        let number = writer.next_block_number();
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (1..=2u8)
            .map(|fill| {
                let writer = Arc::clone(&writer);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    let payload = vec![fill; 4096];
                    writer.store_block(number, &payload).map(|_| fill)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners: Vec<u8> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
        assert_eq!(winners.len(), 1, "block {} stored twice", number);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(DuraError::AlreadyExists(_)))));
        assert_eq!(writer.read_block(number).unwrap(), vec![winners[0]; 4096]);
    }

    // Only the published blocks remain; losing temp files are cleaned up.
    assert_eq!(writer.list_blocks().unwrap().len(), 100);
    let leftovers = fs::read_dir(writer.path())
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .file_name()
                .to_string_lossy()
                .starts_with("tmp")
        })
        .count();
    assert_eq!(leftovers, 0);
}

// =============================================================================
// Finish Tests
// =============================================================================

#[test]
fn test_finish_band() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    writer.finish_band().unwrap();

    assert!(writer.is_finished());
    assert!(writer.path().join("BANDTAIL").is_file());
}

#[test]
fn test_finish_twice_fails() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();

    writer.finish_band().unwrap();
    let result = writer.finish_band();

    assert!(matches!(result, Err(DuraError::AlreadyFinished(ref n)) if n == "0000"));
    assert!(writer.is_finished());
}

#[test]
fn test_no_blocks_after_finish() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();
    writer.write_block(b"before").unwrap();
    let pending = writer.next_block_number();

    writer.finish_band().unwrap();

    assert!(matches!(
        writer.write_block(b"after"),
        Err(DuraError::AlreadyFinished(_))
    ));
    assert!(matches!(
        writer.store_block(pending, b"late"),
        Err(DuraError::AlreadyFinished(_))
    ));
    assert_eq!(writer.list_blocks().unwrap(), vec![BlockNumber::new(0)]);
}

#[test]
fn test_info_reports_times_and_blocks() {
    let (_temp, archive) = scratch_archive();
    let writer = archive.create_band().unwrap();
    writer.write_block(b"one").unwrap();
    writer.write_block(b"two").unwrap();

    let info = writer.info().unwrap();
    assert_eq!(info.number, "0000");
    assert!(!info.is_finished);
    assert!(info.start_time.is_some());
    assert_eq!(info.end_time, None);
    assert_eq!(info.block_count, 2);

    writer.finish_band().unwrap();
    let info = writer.info().unwrap();
    assert!(info.is_finished);
    let (start, end) = (info.start_time.unwrap(), info.end_time.unwrap());
    assert!(end >= start);
    assert!(end - start < 5);
}
