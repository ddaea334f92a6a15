//! Tests for persistence triggering
//!
//! These tests verify:
//! - Threshold-on-write gating against the Persistence Clock
//! - Failure isolation (engine ops never fail due to persistence)
//! - Background-timer mode and graceful scheduler shutdown
//!
//! Timing tests use short intervals with generous sleeps; they assert
//! on snapshot file contents, not on exact write counts per tick.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use snapkv::snapshot::Mapping;
use snapkv::{Config, PersistMode, Scheduler, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn read_snapshot(path: &std::path::Path) -> Mapping {
    let bytes = std::fs::read(path).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn threshold_config(dir: &TempDir, interval: Duration) -> Config {
    Config::builder()
        .save_path(dir.path().join("data.json"))
        .save_interval(interval)
        .persist_mode(PersistMode::ThresholdOnWrite)
        .build()
}

// =============================================================================
// Threshold-on-Write Mode Tests
// =============================================================================

#[test]
fn test_threshold_first_mutation_persists_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let config = threshold_config(&temp_dir, Duration::from_secs(60));
    let store = Store::open(config).unwrap();

    // The clock starts at "never", so the first write is not deferred
    store.set("a", json!("1"));

    let snapshot = read_snapshot(&temp_dir.path().join("data.json"));
    assert_eq!(snapshot.get("a"), Some(&json!("1")));
}

#[test]
fn test_threshold_gates_writes_by_interval() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = threshold_config(&temp_dir, Duration::from_millis(300));
    let store = Store::open(config).unwrap();

    // First set: clock says never, snapshot written
    store.set("a", json!("1"));
    let snapshot = read_snapshot(&path);
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get("a"), Some(&json!("1")));

    // Second set inside the interval: no new snapshot, file unchanged
    store.set("b", json!("2"));
    let snapshot = read_snapshot(&path);
    assert!(!snapshot.contains_key("b"));

    // Third set after the interval elapses: snapshot written again,
    // capturing everything accumulated in memory
    std::thread::sleep(Duration::from_millis(400));
    store.set("c", json!("3"));
    let snapshot = read_snapshot(&path);
    assert_eq!(snapshot.get("a"), Some(&json!("1")));
    assert_eq!(snapshot.get("b"), Some(&json!("2")));
    assert_eq!(snapshot.get("c"), Some(&json!("3")));
}

#[test]
fn test_threshold_delete_triggers_persistence_too() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = threshold_config(&temp_dir, Duration::from_millis(100));
    let store = Store::open(config).unwrap();

    store.set("k", json!("v"));
    std::thread::sleep(Duration::from_millis(150));
    store.delete("k");

    let snapshot = read_snapshot(&path);
    assert!(!snapshot.contains_key("k"));
}

#[test]
fn test_timer_mode_does_not_persist_inline() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = Config::builder()
        .save_path(&path)
        .save_interval(Duration::from_secs(60))
        .persist_mode(PersistMode::BackgroundTimer)
        .build();
    let store = Store::open(config).unwrap();

    // Without a scheduler running, timer mode never writes after a
    // mutation; the file keeps its startup contents
    store.set("a", json!("1"));
    assert!(read_snapshot(&path).is_empty());
}

// =============================================================================
// Failure Isolation Tests
// =============================================================================

#[test]
fn test_set_succeeds_when_snapshot_write_fails() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("store");
    std::fs::create_dir_all(&data_dir).unwrap();

    let config = Config::builder()
        .save_path(data_dir.join("data.json"))
        .save_interval(Duration::from_millis(0))
        .persist_mode(PersistMode::ThresholdOnWrite)
        .build();
    let store = Store::open(config).unwrap();

    // Break the filesystem under the snapshot path
    std::fs::remove_dir_all(&data_dir).unwrap();

    // Every mutation now fails to persist; the store must keep serving
    // from memory without surfacing an error
    store.set("a", json!("1"));
    store.set("b", json!("2"));
    assert!(store.delete("a"));

    assert_eq!(store.get("a"), None);
    assert_eq!(store.get("b"), Some(json!("2")));
}

#[test]
fn test_explicit_persist_reports_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("store");
    std::fs::create_dir_all(&data_dir).unwrap();

    let config = Config::builder()
        .save_path(data_dir.join("data.json"))
        .persist_mode(PersistMode::BackgroundTimer)
        .build();
    let store = Store::open(config).unwrap();

    std::fs::remove_dir_all(&data_dir).unwrap();

    store.set("k", json!("v"));
    assert!(matches!(store.persist(), Err(snapkv::SnapError::Io(_))));
}

// =============================================================================
// Snapshot Consistency Tests
// =============================================================================

#[test]
fn test_snapshot_is_consistent_under_concurrent_mutation() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = Config::builder()
        .save_path(&path)
        .save_interval(Duration::from_secs(60))
        .persist_mode(PersistMode::BackgroundTimer)
        .build();
    let store = Arc::new(Store::open(config).unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    // Writers continuously overwrite their key with a two-element array
    // whose halves always match. A torn snapshot would show up as a
    // mismatched pair or an undecodable document.
    let mut handles = vec![];
    for t in 0..4 {
        let store = Arc::clone(&store);
        let stop = Arc::clone(&stop);
        handles.push(std::thread::spawn(move || {
            let mut n: u64 = 0;
            while !stop.load(Ordering::Relaxed) {
                store.set(format!("key{}", t), json!([n, n]));
                n += 1;
            }
        }));
    }

    // Persist repeatedly while the writers run; every written snapshot
    // must decode and every value must be a consistent pre- or
    // post-mutation state
    for _ in 0..50 {
        store.persist().unwrap();
        let snapshot = read_snapshot(&path);
        for (key, value) in &snapshot {
            let pair = value.as_array().expect("snapshot value decodes as an array");
            assert_eq!(pair.len(), 2);
            assert_eq!(pair[0], pair[1], "half-applied value for {} in snapshot", key);
        }
    }

    stop.store(true, Ordering::Relaxed);
    for handle in handles {
        handle.join().unwrap();
    }
}

// =============================================================================
// Background-Timer Mode Tests
// =============================================================================

#[tokio::test]
async fn test_timer_mode_persists_in_background() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = Config::builder()
        .save_path(&path)
        .save_interval(Duration::from_millis(150))
        .persist_mode(PersistMode::BackgroundTimer)
        .build();
    let store = Arc::new(Store::open(config).unwrap());

    let scheduler = Scheduler::spawn(Arc::clone(&store));

    store.set("k", json!("v"));
    assert!(read_snapshot(&path).is_empty());

    // A tick lands within a couple of intervals
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(read_snapshot(&path).get("k"), Some(&json!("v")));

    scheduler.shutdown().await;
}

#[tokio::test]
async fn test_scheduler_shutdown_flushes_final_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.json");
    let config = Config::builder()
        .save_path(&path)
        .save_interval(Duration::from_secs(60))
        .persist_mode(PersistMode::BackgroundTimer)
        .build();
    let store = Arc::new(Store::open(config).unwrap());

    let scheduler = Scheduler::spawn(Arc::clone(&store));

    // No tick will land before shutdown with a 60s interval; only the
    // final flush can write this key out
    store.set("tail", json!("write"));
    scheduler.shutdown().await;

    assert_eq!(read_snapshot(&path).get("tail"), Some(&json!("write")));
}
