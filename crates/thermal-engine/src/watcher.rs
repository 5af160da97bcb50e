//! Dedicated thread that runs evaluation passes.
//!
//! Between passes the thread blocks until the scheduler's wait elapses, a
//! sensor notification arrives, or the handle asks it to stop. All
//! notifications queued at wake-up are drained into the next pass.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{select, Receiver, Sender};
use rustc_hash::FxHashSet;
use thermal_core::errors::WatcherError;
use thermal_core::traits::{Cancellable, CancellationToken};

use crate::engine::ThermalEngine;
use crate::scheduler::EvaluationScheduler;

/// Longest single wait; an engine with no monitored sensors wakes this often.
const MAX_WAIT: Duration = Duration::from_secs(3600);

pub struct ThermalWatcher;

impl ThermalWatcher {
    /// Start the watcher thread for `engine`.
    pub fn spawn(engine: Arc<ThermalEngine>) -> Result<WatcherHandle, WatcherError> {
        let (events_tx, events_rx) = crossbeam_channel::unbounded::<String>();
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let token = CancellationToken::new();
        let thread_token = token.clone();

        let join = std::thread::Builder::new()
            .name("thermal-watcher".to_string())
            .spawn(move || run(&engine, events_rx, stop_rx, &thread_token))?;

        tracing::info!("thermal watcher started");
        Ok(WatcherHandle {
            events: events_tx,
            stop: stop_tx,
            token,
            join: Some(join),
        })
    }
}

fn run(
    engine: &ThermalEngine,
    mut events: Receiver<String>,
    stop: Receiver<()>,
    token: &CancellationToken,
) {
    let mut scheduler = EvaluationScheduler::new(engine);
    let mut pending: FxHashSet<String> = FxHashSet::default();

    while !token.is_cancelled() {
        let report = scheduler.tick(engine, &pending, Instant::now());
        pending.clear();
        if !report.is_clean() {
            tracing::debug!(errors = report.error_count(), "pass completed with errors");
        }

        let wait = report.data.wait.min(MAX_WAIT);
        let mut closed = false;
        select! {
            recv(events) -> msg => match msg {
                Ok(name) => {
                    pending.insert(name);
                    pending.extend(events.try_iter());
                }
                Err(_) => closed = true,
            },
            // The token is already cancelled; the loop condition exits.
            recv(stop) -> _ => {}
            default(wait) => {}
        }
        if closed {
            tracing::warn!("notification channel closed, polling only");
            events = crossbeam_channel::never();
        }
    }
    tracing::info!("thermal watcher stopped");
}

/// Owner of a running watcher thread. Dropping it stops the thread.
pub struct WatcherHandle {
    events: Sender<String>,
    stop: Sender<()>,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Report an asynchronous notification from `sensor`. The next pass
    /// evaluates it regardless of its interval.
    pub fn notify(&self, sensor: impl Into<String>) {
        if self.events.send(sensor.into()).is_err() {
            tracing::debug!("notification dropped, watcher gone");
        }
    }

    /// A sender for notification sources living on other threads.
    pub fn notifier(&self) -> Sender<String> {
        self.events.clone()
    }

    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|j| !j.is_finished())
    }

    /// Stop the thread after its current pass and wait for it.
    pub fn stop(mut self) -> Result<(), WatcherError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), WatcherError> {
        self.token.cancel();
        let _ = self.stop.try_send(());
        match self.join.take() {
            Some(join) => join.join().map_err(|_| WatcherError::Panicked),
            None => Ok(()),
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!(error = %e, "watcher thread panicked");
        }
    }
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
