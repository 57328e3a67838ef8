//! Writer behavior: parent-directory creation, lock contention, and the
//! programmer-error contract on unsorted/duplicate-keyed input.

use fs2::FileExt;
use mapfile::{Options, Reader, Writer};
use std::fs::File;
use tempfile::tempdir;

#[test]
fn creates_missing_parent_directory_and_retries_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sub").join("nested").join("map.db");
    assert!(!path.parent().unwrap().exists());

    let entries = vec![(1u32, 2u32)];
    let written = Writer::write(&path, &entries, Options::NONE);
    assert_eq!(written, mapfile::encode(&entries).len());
    assert!(path.exists());
}

#[test]
fn lock_contention_returns_zero_and_leaves_existing_contents_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contended.map");

    let original = vec![(1u32, 100u32), (2, 200)];
    assert!(Writer::write(&path, &original, Options::NONE) > 0);

    // Simulate a concurrent writer already holding the exclusive lock.
    let blocker = File::open(&path).unwrap();
    blocker.lock_exclusive().unwrap();

    let contender = vec![(9u32, 900u32)];
    let written = Writer::write(&path, &contender, Options::NONE);
    assert_eq!(written, 0, "a contended write must return 0");

    blocker.unlock().unwrap();

    // The original payload must still be intact and readable.
    let reader = Reader::<u32, u32>::open(&path, Options::NONE).unwrap();
    assert_eq!(reader.value(&1).unwrap(), Some(100));
    assert_eq!(reader.value(&2).unwrap(), Some(200));
}

#[test]
fn no_lock_option_skips_coordination() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("unlocked.map");

    let blocker = {
        // Create the file first so we have something to lock.
        let entries = vec![(1u32, 1u32)];
        Writer::write(&path, &entries, Options::NONE);
        let f = File::open(&path).unwrap();
        f.lock_exclusive().unwrap();
        f
    };

    let entries = vec![(2u32, 2u32)];
    let written = Writer::write(&path, &entries, Options::NO_LOCK);
    assert!(written > 0, "NoLock must bypass the exclusive-lock check");

    blocker.unlock().unwrap();
}

#[test]
#[should_panic(expected = "strictly increasing")]
fn unsorted_input_is_a_programmer_error() {
    let entries = vec![(2u32, 20u32), (1, 10)];
    let _ = mapfile::encode(&entries);
}

#[test]
#[should_panic(expected = "strictly increasing")]
fn duplicate_keys_are_a_programmer_error() {
    let entries = vec![(1u32, 10u32), (1, 20)];
    let _ = mapfile::encode(&entries);
}
