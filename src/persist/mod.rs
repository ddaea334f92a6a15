//! Persistence Module
//!
//! Background-timer persistence, decoupled from mutation traffic.
//!
//! ## Responsibilities
//! - Run one long-lived task that writes a snapshot when one is due
//! - Bound crash data loss to roughly one save interval, independent of
//!   write rate
//! - Stop cleanly on shutdown, flushing a final snapshot
//!
//! Threshold-on-write persistence needs no task and lives inline in the
//! engine's mutation hook; both modes share the engine's due check and
//! Persistence Clock.

mod scheduler;

pub use scheduler::Scheduler;
