//! Fixed-interval polling of backend [`Stats`].
//!
//! Each tick awaits one fetch before the next tick is taken, so requests
//! never overlap. There is no backoff: a failing backend is retried at the
//! same interval and subscribers see the last known counts marked degraded.

use crate::{Stats, StatsSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Configuration for [`StatsPoller`].
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between fetches. The first fetch happens immediately.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Polls a [`StatsSource`] and remembers the last value it produced.
pub struct StatsPoller<S> {
    source: Arc<S>,
    last: Arc<Mutex<Stats>>,
    config: PollerConfig,
}

impl<S: StatsSource> StatsPoller<S> {
    pub fn new(source: S, config: Option<PollerConfig>) -> Self {
        Self {
            source: Arc::new(source),
            last: Arc::new(Mutex::new(Stats::connecting())),
            config: config.unwrap_or_default(),
        }
    }

    /// Last value produced, [`Stats::connecting`] before the first poll.
    pub async fn latest(&self) -> Stats {
        self.last.lock().await.clone()
    }

    /// Fetch once. On failure the previous counts are kept and the status
    /// becomes degraded.
    pub async fn poll_once(&self) -> Stats {
        poll(&*self.source, &self.last).await
    }

    /// Spawn the polling loop, sending every value to `tx`.
    ///
    /// The loop ends when the handle is stopped or `tx`'s receiver is dropped.
    /// A fetch already in flight when the handle stops still completes and
    /// updates [`latest`](Self::latest).
    pub fn start(&self, tx: mpsc::Sender<Stats>) -> PollerHandle {
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        let source = Arc::clone(&self.source);
        let last = Arc::clone(&self.last);
        let interval = self.config.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = stop_rx.recv() => break,
                    _ = ticker.tick() => {
                        let stats = poll(&*source, &last).await;
                        if tx.send(stats).await.is_err() {
                            tracing::debug!("stats receiver dropped, stopping poller");
                            break;
                        }
                    }
                }
            }
        });

        PollerHandle {
            stop_tx,
            _task: task,
        }
    }
}

async fn poll<S: StatsSource>(source: &S, last: &Mutex<Stats>) -> Stats {
    let fetched = source.fetch().await;
    let mut last = last.lock().await;
    match fetched {
        Ok(stats) => {
            tracing::trace!(total = stats.total_documents, "fetched stats");
            *last = stats;
        }
        Err(e) => {
            tracing::warn!(error = %e, "stats fetch failed");
            *last = last.degraded();
        }
    }
    last.clone()
}

/// Handle to a running poller.
pub struct PollerHandle {
    stop_tx: mpsc::Sender<()>,
    _task: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    pub async fn stop(self) {
        let _ = self.stop_tx.send(()).await;
    }
}
