//! Round-trip and layout-invariant coverage across fixed/variable
//! combinations, matching the scenarios enumerated in the design docs.

use mapfile::{Location, Options, Reader, Writer};
use tempfile::tempdir;

#[test]
fn empty_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.map");

    let entries: Vec<(u32, u32)> = vec![];
    let written = Writer::write(&path, &entries, Options::NONE);
    assert_eq!(written, 8);
    assert_eq!(std::fs::read(&path).unwrap(), vec![0, 0, 0, 0, 8, 0, 0, 0]);

    let reader = Reader::<u32, u32>::open(&path, Options::NONE).unwrap();
    assert_eq!(reader.count(), 0);
    assert_eq!(reader.lower_bound(&0).unwrap(), (mapfile::NOT_FOUND, false));
}

#[test]
fn fixed_fixed_three_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ff.map");

    let entries = vec![(1u32, 10u32), (2, 20), (3, 30)];
    let written = Writer::write(&path, &entries, Options::NONE);
    assert_eq!(written, 32);

    let reader = Reader::<u32, u32>::open(&path, Options::NONE).unwrap();
    assert_eq!(reader.count(), 3);
    assert_eq!(reader.lower_bound(&2).unwrap(), (1, true));
    assert_eq!(reader.value(&2).unwrap(), Some(20));
    assert_eq!(reader.lower_bound(&0).unwrap(), (0, false));
    assert_eq!(reader.lower_bound(&4).unwrap(), (mapfile::NOT_FOUND, false));
}

#[test]
fn variable_key_fixed_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vf.map");

    let entries = vec![
        ("apple".to_string(), 1u32),
        ("banana".to_string(), 2),
        ("cherry".to_string(), 3),
    ];
    Writer::write(&path, &entries, Options::NONE);

    let reader = Reader::<String, u32>::open(&path, Options::NONE).unwrap();
    let (idx, matched) = reader.lower_bound(&"banana".to_string()).unwrap();
    assert!(matched);
    assert_eq!(idx, 1);

    assert_eq!(reader.value(&"blueberry".to_string()).unwrap(), None);
    let (idx, matched) = reader.lower_bound(&"blueberry".to_string()).unwrap();
    assert!(!matched);
    assert_eq!(idx, 2);
}

#[test]
fn variable_variable_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vv.map");

    let entries = vec![
        ("k1".to_string(), "v1-longer".to_string()),
        ("k2".to_string(), "v2".to_string()),
    ];
    Writer::write(&path, &entries, Options::NONE);

    let reader = Reader::<String, String>::open(&path, Options::NONE).unwrap();
    let round_tripped: Vec<(String, String)> =
        reader.iter().collect::<mapfile::Result<Vec<_>>>().unwrap();
    assert_eq!(round_tripped, entries);
    assert_eq!(reader.value_at(0).unwrap(), "v1-longer");
}

#[test]
fn location_value_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("locs.map");

    let entries = vec![
        ("helper".to_string(), Location::new(2, 3, 1)),
        ("main".to_string(), Location::new(1, 10, 5)),
    ];
    Writer::write(&path, &entries, Options::NONE);

    let reader = Reader::<String, Location>::open(&path, Options::NONE).unwrap();
    assert_eq!(
        reader.value(&"main".to_string()).unwrap(),
        Some(Location::new(1, 10, 5))
    );
}

#[test]
fn ordered_iteration_matches_sorted_input() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("iter.map");

    let entries: Vec<(u32, u32)> = (0..50).map(|i| (i, i * 10)).collect();
    Writer::write(&path, &entries, Options::NONE);

    let reader = Reader::<u32, u32>::open(&path, Options::NONE).unwrap();
    let collected: Vec<(u32, u32)> = reader.iter().collect::<mapfile::Result<Vec<_>>>().unwrap();
    assert_eq!(collected, entries);
}
