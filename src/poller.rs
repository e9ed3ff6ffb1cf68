//! Periodic task-list refresh.
//!
//! The poller owns its timer: it runs on a spawned task, tags every
//! successful batch with a monotonic sequence number, and stops when its
//! guard is dropped. A failed refresh is logged and skipped; the list it
//! would have replaced stays as it was.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::api::{ApiClient, ApiError};
use crate::api::model::{ScanReport, Task};
use crate::report::FetchTicket;

/// Everything the watch loop reacts to, funneled through one channel so
/// store and fetcher are only ever touched from a single consumer.
#[derive(Debug)]
pub enum ViewEvent {
    Tasks { seq: u64, tasks: Vec<Task> },
    Report {
        ticket: FetchTicket,
        outcome: Result<ScanReport, ApiError>,
    },
}

/// Guard for the polling task. Dropping it cancels the timer; no batch
/// is delivered afterwards.
pub struct Poller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Poller {
    /// Start polling `every` interval, sending batches to `events`. The
    /// first refresh happens immediately; each one is awaited before the
    /// next tick is armed.
    pub fn spawn(client: ApiClient, every: Duration, events: mpsc::Sender<ViewEvent>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match client.list_tasks().await {
                            Ok(tasks) => {
                                seq += 1;
                                if events.send(ViewEvent::Tasks { seq, tasks }).await.is_err() {
                                    break;
                                }
                            }
                            Err(err) => warn!(error = %err, "task list refresh failed"),
                        }
                    }
                }
            }
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop polling and wait for the task to wind down.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
