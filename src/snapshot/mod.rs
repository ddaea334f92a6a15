//! Snapshot Module
//!
//! Point-in-time JSON serialization of the store's mapping.
//!
//! ## Responsibilities
//! - Encode/decode the full mapping to/from a JSON document (`codec`)
//! - Own the backing file: load-on-startup, create-if-absent, write (`file`)
//!
//! ## On-Disk Format
//! A single JSON object at a configurable path. Top-level keys are store
//! keys, values are the stored values verbatim. No versioning, no checksum.
//! An absent or empty file means an empty store; a malformed file is a
//! fatal load error.

pub mod codec;

mod file;

pub use file::SnapshotFile;

/// The in-memory mapping a snapshot captures
pub type Mapping = std::collections::HashMap<String, serde_json::Value>;
