//! Integration Tests for the Index Engine
//!
//! Drives `Index` against real temporary directories: listings, file
//! metadata, cache coherence, TTL revalidation, eviction and confinement.

use autoindex::{Entry, EntryKind, Index, IndexConfig, Response};
use proptest::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::thread::sleep;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

// == Helper Functions ==

fn mtime_of(path: &Path) -> i64 {
    fs::metadata(path)
        .unwrap()
        .modified()
        .unwrap()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

fn index(dir: &TempDir, ttl: Duration, max_size: usize) -> Index {
    Index::new(IndexConfig {
        root: dir.path().to_path_buf(),
        ttl,
        max_size,
    })
    .unwrap()
}

/// Writes `entries` under `dir` and returns them with their real mtimes.
fn populate(dir: &Path, entries: &[Entry]) -> HashMap<String, Entry> {
    entries
        .iter()
        .map(|entry| {
            let path = dir.join(&entry.name);
            match entry.kind {
                EntryKind::Dir => fs::create_dir(&path).unwrap(),
                EntryKind::File => fs::File::create(&path)
                    .unwrap()
                    .set_len(entry.size.unwrap_or(0))
                    .unwrap(),
            }
            let mut expected = entry.clone();
            expected.mtime = mtime_of(&path);
            (expected.name.clone(), expected)
        })
        .collect()
}

fn by_name(response: &Response) -> HashMap<String, Entry> {
    response
        .contents()
        .expect("directory response")
        .iter()
        .map(|e| (e.name.clone(), e.clone()))
        .collect()
}

// == Listing Tests ==

#[test]
fn test_scenario_file_metadata() {
    let dir = TempDir::new().unwrap();
    populate(dir.path(), &[Entry::file("file.dat", 1024, 0)]);
    let index = index(&dir, Duration::ZERO, 0);

    let response = index.query("/file.dat").unwrap();
    assert_eq!(response.kind(), EntryKind::File);
    assert!(matches!(*response, Response::File { size: 1024, .. }));

    // Second query revalidates with the same answer
    let again = index.query("/file.dat").unwrap();
    assert_eq!(response, again);

    assert!(index.query("/missing.dat").is_none());
}

#[test]
fn test_scenario_mixed_listing() {
    let dir = TempDir::new().unwrap();
    let expected = populate(
        dir.path(),
        &[Entry::dir("sub", 0), Entry::file("a.txt", 10, 0)],
    );
    let index = index(&dir, Duration::ZERO, 0);

    for query in ["", "/"] {
        let response = index.query(query).unwrap();
        assert_eq!(response.kind(), EntryKind::Dir);
        assert_eq!(by_name(&response), expected, "query {:?}", query);
    }
}

#[test]
fn test_listing_does_not_recurse() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("a").join("b").join("c")).unwrap();
    let index = index(&dir, Duration::ZERO, 0);

    let response = index.query("/a").unwrap();
    let names: Vec<_> = response.contents().unwrap().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["b"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // Property: listing fidelity.
    // *For any* set of files and directories, the root listing is set-equal
    // to what is on disk, and a second (cached) query agrees with it.
    #[test]
    fn prop_random_directory_listing(
        specs in prop::collection::hash_map("[a-f0-9]{16}", prop::option::of(0u64..1024), 0..64)
    ) {
        let dir = TempDir::new().unwrap();
        let entries: Vec<Entry> = specs
            .into_iter()
            .map(|(name, size)| match size {
                Some(size) => Entry::file(name, size, 0),
                None => Entry::dir(name, 0),
            })
            .collect();
        let expected = populate(dir.path(), &entries);
        let index = index(&dir, Duration::from_secs(60), 0);

        let first = index.query("").unwrap();
        prop_assert_eq!(by_name(&first), expected.clone());

        let second = index.query("").unwrap();
        prop_assert_eq!(by_name(&second), expected);
        prop_assert_eq!(index.stats().hits, 1);
    }
}

// == TTL Tests ==

#[test]
fn test_zero_ttl_revalidates_immediately() {
    let dir = TempDir::new().unwrap();
    populate(dir.path(), &[Entry::file("file.dat", 1024, 0)]);
    let index = index(&dir, Duration::ZERO, 0);

    assert!(index.query("/file.dat").is_some());
    fs::remove_file(dir.path().join("file.dat")).unwrap();

    assert!(index.query("/file.dat").is_none());
}

#[test]
fn test_ttl_staleness_window() {
    let dir = TempDir::new().unwrap();
    populate(dir.path(), &[Entry::file("file.dat", 1024, 0)]);
    let ttl = Duration::from_millis(500);
    let index = index(&dir, ttl, 0);

    assert!(index.query("/file.dat").is_some());
    fs::remove_file(dir.path().join("file.dat")).unwrap();

    // Inside the window the cached answer may still be served
    assert!(index.query("/file.dat").is_some());

    sleep(ttl + Duration::from_millis(100));

    assert!(index.query("/file.dat").is_none());
}

#[test]
fn test_ttl_picks_up_new_children() {
    let dir = TempDir::new().unwrap();
    let ttl = Duration::from_millis(300);
    let index = index(&dir, ttl, 0);

    assert!(index.query("").unwrap().contents().unwrap().is_empty());
    fs::write(dir.path().join("late.txt"), b"late").unwrap();

    sleep(ttl + Duration::from_millis(100));

    let response = index.query("").unwrap();
    assert_eq!(response.contents().unwrap().len(), 1);
}

// == Eviction Tests ==

#[test]
fn test_max_size_evicts_earlier_keys() {
    let dir = TempDir::new().unwrap();
    let names = ["a.txt", "b.txt", "c.txt", "d.txt"];
    for name in names {
        fs::write(dir.path().join(name), name).unwrap();
    }
    // Long TTL: only eviction can make a record disappear
    let index = index(&dir, Duration::from_secs(3600), 2);

    for name in names {
        assert!(index.query(name).is_some());
        assert!(index.stats().total_entries <= 2);
    }

    for name in names {
        fs::remove_file(dir.path().join(name)).unwrap();
    }

    // Anything still found is served from cache; evicted keys are gone
    let still_cached = names.iter().filter(|n| index.query(n).is_some()).count();
    assert!(still_cached <= 2);
    assert!(still_cached < names.len(), "at least one earlier key was evicted");
    assert!(index.query("a.txt").is_none(), "least recently used key evicted");
    assert_eq!(index.stats().evictions, 2);
}

#[test]
fn test_concurrent_queries_respect_bound() {
    let dir = TempDir::new().unwrap();
    for i in 0..32 {
        fs::write(dir.path().join(format!("f{}.txt", i)), b"x").unwrap();
    }
    let index = index(&dir, Duration::from_secs(3600), 8);

    std::thread::scope(|scope| {
        for worker in 0..4 {
            let index = &index;
            scope.spawn(move || {
                for round in 0..64 {
                    let name = format!("/f{}.txt", (worker * 7 + round) % 32);
                    assert!(index.query(&name).is_some());
                    assert!(index.stats().total_entries <= 8);
                }
            });
        }
    });

    assert!(index.stats().total_entries <= 8);
}

// == Confinement Tests ==

#[test]
fn test_escape_is_not_found() {
    let outer = TempDir::new().unwrap();
    let root = outer.path().join("root");
    fs::create_dir(&root).unwrap();
    fs::write(outer.path().join("secret.txt"), b"secret").unwrap();

    let index = Index::new(IndexConfig::new(&root)).unwrap();

    for query in ["..", "/../secret.txt", "sub/../../secret.txt", "/./../root"] {
        assert!(index.query(query).is_none(), "query {:?}", query);
    }
    assert_eq!(index.stats().misses, 0, "rejected queries never reach the cache");
}

#[cfg(unix)]
#[test]
fn test_symlink_escape_is_not_found() {
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("secret.txt"), b"secret").unwrap();

    let dir = TempDir::new().unwrap();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("secret.txt"),
        dir.path().join("secret-link"),
    )
    .unwrap();
    let index = index(&dir, Duration::ZERO, 0);

    assert!(index.query("/link").is_none());
    assert!(index.query("/link/secret.txt").is_none());
    assert!(index.query("/secret-link").is_none());

    // The links themselves are still listed
    let response = index.query("").unwrap();
    assert_eq!(response.contents().unwrap().len(), 2);
}

// == Serialization Tests ==

#[test]
fn test_query_bytes_matches_query() {
    let dir = TempDir::new().unwrap();
    populate(dir.path(), &[Entry::dir("sub", 0), Entry::file("a.txt", 10, 0)]);
    let index = index(&dir, Duration::from_secs(60), 0);

    let bytes = index.query_bytes("/").unwrap();
    let decoded: Response = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(by_name(&decoded), by_name(&index.query("").unwrap()));
    assert!(index.query_bytes("/missing").is_none());
}

#[test]
fn test_independent_indexes_do_not_share_cache() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), b"a").unwrap();

    let first = index(&dir, Duration::from_secs(60), 0);
    let second = index(&dir, Duration::from_secs(60), 0);

    assert!(first.query("a.txt").is_some());
    assert_eq!(first.stats().total_entries, 1);
    assert_eq!(second.stats().total_entries, 0);
}
