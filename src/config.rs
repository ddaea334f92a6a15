//! Configuration for SnapKV
//!
//! Centralized configuration with sensible defaults. The config is an
//! explicit value passed into constructors rather than ambient process
//! state, so the core stays testable in isolation.

use std::path::PathBuf;
use std::time::Duration;

/// Persistence triggering policy
///
/// Both policies are modes of the same Persistence Scheduler, not
/// separate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Check after every successful mutation; write a snapshot if the
    /// save interval has elapsed since the last one. Persistence latency
    /// is coupled to write traffic.
    ThresholdOnWrite,

    /// A single background task ticks at the save interval and writes a
    /// snapshot when one is due. Bounds data loss on crash to roughly
    /// one interval, independent of write rate.
    BackgroundTimer,
}

/// Main configuration for a SnapKV instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Persistence Configuration
    // -------------------------------------------------------------------------
    /// Path of the JSON snapshot file (both the load-on-startup source
    /// and the write target)
    pub save_path: PathBuf,

    /// Minimum time between snapshot writes
    pub save_interval: Duration,

    /// When snapshots are triggered
    pub persist_mode: PersistMode,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    // -------------------------------------------------------------------------
    // Boundary Behavior
    // -------------------------------------------------------------------------
    /// Surface DELETE of an absent key as 404 at the HTTP boundary.
    /// The engine itself always treats it as a no-op.
    pub strict_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("data.json"),
            save_interval: Duration::from_secs(10),
            persist_mode: PersistMode::ThresholdOnWrite,
            listen_addr: "127.0.0.1:8080".to_string(),
            strict_delete: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the snapshot file path
    pub fn save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.save_path = path.into();
        self
    }

    /// Set the minimum time between snapshot writes
    pub fn save_interval(mut self, interval: Duration) -> Self {
        self.config.save_interval = interval;
        self
    }

    /// Set the persistence triggering policy
    pub fn persist_mode(mut self, mode: PersistMode) -> Self {
        self.config.persist_mode = mode;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Surface DELETE of an absent key as 404
    pub fn strict_delete(mut self, strict: bool) -> Self {
        self.config.strict_delete = strict;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
