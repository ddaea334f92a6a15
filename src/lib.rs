//! # SnapKV
//!
//! An in-process key-value store exposed over HTTP, with:
//! - A whole-map readers-writer lock for safe concurrent access
//! - Durability via periodic snapshotting to a single JSON file
//! - Two persistence policies: threshold-on-write and background-timer
//! - Idempotent snapshot reload on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     HTTP Boundary (axum)                     │
//! │               GET / PUT / DELETE  /store/{key}               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Store Engine                             │
//! │        RwLock<Mapping>  +  Persistence Clock                 │
//! └─────────┬─────────────────────────────────┬─────────────────┘
//!           │ threshold-on-write              │ background-timer
//!           ▼                                 ▼
//! ┌─────────────────┐               ┌─────────────────┐
//! │ after-mutation  │               │    Scheduler    │
//! │      hook       │               │  (tokio task)   │
//! └────────┬────────┘               └────────┬────────┘
//!          │                                 │
//!          └──────────────┬──────────────────┘
//!                         ▼
//!                 ┌───────────────┐
//!                 │ Snapshot File │
//!                 │  (data.json)  │
//!                 └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod snapshot;
pub mod engine;
pub mod persist;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::{Config, PersistMode};
pub use engine::Store;
pub use error::{Result, SnapError};
pub use persist::Scheduler;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SnapKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
