//! Expiry Reaper Task
//!
//! Periodic sweep of logically-expired entries so memory stays bounded even
//! for keys that are set and never read again. Sweeps run in bounded batches
//! with a yield in between, so a large backlog never monopolizes the
//! scheduler.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::KvStore;

/// Upper bound on removals per sweep batch.
pub const SWEEP_BATCH: usize = 256;

// == Expiry Reaper ==
/// Periodic expiry sweeper with an explicit timer lifecycle. Dropping a
/// running reaper stops it.
pub struct ExpiryReaper {
    store: Arc<KvStore>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl ExpiryReaper {
    pub fn new(store: Arc<KvStore>, interval_seconds: u64) -> Self {
        Self {
            store,
            interval: Duration::from_secs(interval_seconds),
            handle: None,
        }
    }

    // == Start ==
    /// Spawns the sweep loop. Calling `start` on a running reaper is a
    /// no-op.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        let store = Arc::clone(&self.store);
        let interval = self.interval;

        self.handle = Some(tokio::spawn(async move {
            info!(
                "Expiry reaper started with interval of {} seconds",
                interval.as_secs()
            );
            loop {
                tokio::time::sleep(interval).await;

                let mut removed = 0;
                loop {
                    let batch = store.sweep_expired(SWEEP_BATCH).await;
                    removed += batch;
                    if batch < SWEEP_BATCH {
                        break;
                    }
                    // large backlog: give other tasks a turn between batches
                    tokio::task::yield_now().await;
                }

                if removed > 0 {
                    info!("Expiry sweep removed {} entries", removed);
                } else {
                    debug!("Expiry sweep found nothing to remove");
                }
            }
        }));
    }

    // == Stop ==
    /// Cancels the sweep loop, including any pending timer, so no scheduled
    /// task leaks past shutdown.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for ExpiryReaper {
    fn drop(&mut self) {
        self.stop();
    }
}
