//! Engine Module
//!
//! The core store: the mapping, its lock, and the persistence trigger.
//!
//! ## Responsibilities
//! - Own the key-value mapping and the readers-writer lock over it
//! - Own the Persistence Clock
//! - Perform the one-time snapshot load on open
//! - Trigger threshold-on-write persistence after mutations

use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::config::{Config, PersistMode};
use crate::error::Result;
use crate::snapshot::{Mapping, SnapshotFile};

/// The in-process key-value store
///
/// ## Concurrency Model: Whole-Map Readers-Writer Lock
///
/// - **Reads** (get/snapshot copies): shared lock, arbitrarily many in
///   parallel
/// - **Writes** (set/delete): exclusive lock for the duration of the
///   mutation only
/// - One lock over the whole mapping, no per-key locking. Correctness
///   over fine-grained throughput.
///
/// The persistence hook runs after the exclusive lock is released; the
/// snapshot writer re-acquires the shared lock to encode, so a snapshot
/// is always a consistent point-in-time copy and a mutation mid-encode
/// can never produce a torn document.
///
/// Persistence problems never fail an engine operation: a snapshot write
/// error is logged and the store keeps serving from memory.
pub struct Store {
    /// Engine configuration
    config: Config,

    /// The complete mapping of all entries
    data: RwLock<Mapping>,

    /// Persistence Clock: when the last snapshot write was attempted.
    /// `None` means never, so the first mutation may persist immediately.
    /// Advanced even when a write fails, to avoid a tight retry loop
    /// against a broken filesystem.
    last_saved: Mutex<Option<Instant>>,

    /// The backing snapshot file (exclusively owned by the engine's
    /// persistence path)
    snapshot: SnapshotFile,
}

impl Store {
    /// Open a store with the given config
    ///
    /// Performs the one-time startup load before the store is observable:
    /// an absent snapshot file is created containing `{}`, a malformed one
    /// is a fatal error.
    pub fn open(config: Config) -> Result<Self> {
        let snapshot = SnapshotFile::new(&config.save_path);
        let data = snapshot.load_or_init()?;

        tracing::info!(
            path = %snapshot.path().display(),
            entries = data.len(),
            "snapshot loaded"
        );

        Ok(Self {
            config,
            data: RwLock::new(data),
            last_saved: Mutex::new(None),
            snapshot,
        })
    }

    /// Get the current value for a key
    ///
    /// Takes the shared lock for the duration of a single lookup; the
    /// value is cloned out so no reference into the mapping escapes the
    /// lock's scope.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.data.read().get(key).cloned()
    }

    /// Insert or overwrite an entry
    pub fn set(&self, key: impl Into<String>, value: Value) {
        {
            let mut data = self.data.write();
            data.insert(key.into(), value);
        }
        self.after_mutation();
    }

    /// Remove an entry, returning whether it was present
    ///
    /// Deleting an absent key is a no-op, not an error. The HTTP boundary
    /// may use the returned flag to report 404 when configured strict.
    pub fn delete(&self, key: &str) -> bool {
        let removed = {
            let mut data = self.data.write();
            data.remove(key).is_some()
        };
        self.after_mutation();
        removed
    }

    /// Persistence-check hook, run after every successful mutation with
    /// the exclusive lock already released
    fn after_mutation(&self) {
        if self.config.persist_mode == PersistMode::ThresholdOnWrite {
            self.persist_if_due();
        }
    }

    /// Write a snapshot if the save interval has elapsed since the clock
    ///
    /// Shared by both persistence modes: called inline after mutations in
    /// threshold mode, and from the background task's tick in timer mode.
    /// Holding the clock mutex across the write keeps two concurrent due
    /// checks from writing twice.
    pub fn persist_if_due(&self) {
        let mut last_saved = self.last_saved.lock();

        let due = match *last_saved {
            None => true,
            Some(at) => at.elapsed() >= self.config.save_interval,
        };
        if !due {
            return;
        }

        if let Err(e) = self.write_snapshot() {
            tracing::warn!("snapshot write failed, serving from memory: {}", e);
        }
        *last_saved = Some(Instant::now());
    }

    /// Write a snapshot unconditionally
    ///
    /// Used for the final flush on graceful shutdown. The clock advances
    /// whether or not the write succeeds.
    pub fn persist(&self) -> Result<()> {
        let mut last_saved = self.last_saved.lock();
        let result = self.write_snapshot();
        *last_saved = Some(Instant::now());
        result
    }

    /// Encode the mapping under the shared lock and write it out
    fn write_snapshot(&self) -> Result<()> {
        let data = self.data.read();
        self.snapshot.write(&data)
    }

    // =========================================================================
    // Accessors (for the boundary, the scheduler, and tests)
    // =========================================================================

    /// Number of entries currently in the store
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// A point-in-time copy of the full mapping
    pub fn snapshot_map(&self) -> Mapping {
        self.data.read().clone()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
