//! HTTP Module
//!
//! The boundary layer: a thin axum router translating verbs and paths
//! into engine calls and status codes. All store access goes through the
//! engine's public contract; persistence failures never surface here.

mod routes;

pub use routes::{create_router, SharedStore};
