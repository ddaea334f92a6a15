//! Background persistence scheduler
//!
//! A single tokio task that ticks at the save interval and asks the
//! engine to persist if a snapshot is due. The scheduler never bypasses
//! the engine's locking or touches the snapshot file itself.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::engine::Store;

/// Handle to the background persistence task
///
/// Dropping the handle without calling [`Scheduler::shutdown`] leaves
/// the task running for the life of the runtime, mirroring the original
/// design; `shutdown` is the graceful path and flushes a final snapshot.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Scheduler {
    /// Spawn the persistence task for the given store
    ///
    /// The tick period is the store's configured save interval. Whether a
    /// tick actually writes is decided by the engine's Persistence Clock,
    /// so a scheduler tick right after a threshold-mode write is a no-op.
    pub fn spawn(store: Arc<Store>) -> Self {
        let (shutdown, mut stop) = watch::channel(false);
        let period = store.config().save_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval() fires immediately; consume that tick so the
            // first due check happens one full period after spawn.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        store.persist_if_due();
                    }
                    _ = stop.changed() => {
                        break;
                    }
                }
            }

            if let Err(e) = store.persist() {
                tracing::warn!("final snapshot write failed: {}", e);
            }
            tracing::debug!("persistence scheduler stopped");
        });

        Self { shutdown, handle }
    }

    /// Stop the task and wait for its final snapshot write
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
