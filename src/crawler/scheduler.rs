//! Recurring crawl scheduler
//!
//! Owns one timer task that fires the orchestrator on a [`Schedule`], plus a
//! manual trigger. At most one cycle runs at a time: a trigger that arrives
//! while a cycle is in progress is skipped, never queued.

use super::orchestrator::CrawlOrchestrator;
use super::report::CycleSummary;
use super::schedule::Schedule;
use crate::DocketError;
use chrono::Local;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Drives crawl cycles on a schedule and on demand
pub struct Scheduler {
    schedule: Schedule,
    orchestrator: Arc<CrawlOrchestrator>,
    cycle_lock: Arc<AsyncMutex<()>>,

    /// Replaced with a fresh token once `stop` completes
    cancel: Mutex<CancellationToken>,
    handle: Mutex<Option<JoinHandle<()>>>,
    run_on_start: bool,
}

impl Scheduler {
    pub fn new(schedule: Schedule, orchestrator: Arc<CrawlOrchestrator>) -> Self {
        Self {
            schedule,
            orchestrator,
            cycle_lock: Arc::new(AsyncMutex::new(())),
            cancel: Mutex::new(CancellationToken::new()),
            handle: Mutex::new(None),
            run_on_start: false,
        }
    }

    /// Run one cycle as soon as the timer task starts
    pub fn run_on_start(mut self, enabled: bool) -> Self {
        self.run_on_start = enabled;
        self
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Whether a cycle is currently running
    pub fn is_running(&self) -> bool {
        self.cycle_lock.try_lock().is_err()
    }

    /// Whether the timer task is alive
    pub fn is_started(&self) -> bool {
        self.lock_handle()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Runs a cycle immediately
    ///
    /// # Returns
    ///
    /// * `Ok(CycleSummary)` - The cycle ran to completion (or was cancelled by `stop`)
    /// * `Err(DocketError::CycleInProgress)` - Another cycle is already running
    pub async fn trigger_now(&self) -> Result<CycleSummary, DocketError> {
        let _guard = self
            .cycle_lock
            .try_lock()
            .map_err(|_| DocketError::CycleInProgress)?;

        tracing::info!("Manual crawl cycle triggered");
        let cancel = self.current_token();
        Ok(self.orchestrator.run(&cancel).await)
    }

    /// Starts the timer task; calling it again while started is a no-op
    pub fn start(&self) {
        let mut handle = self.lock_handle();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            tracing::debug!("Scheduler already started");
            return;
        }

        tracing::info!(schedule = %self.schedule, "Starting scheduler");
        *handle = Some(tokio::spawn(timer_loop(
            self.schedule.clone(),
            Arc::clone(&self.orchestrator),
            Arc::clone(&self.cycle_lock),
            self.current_token(),
            self.run_on_start,
        )));
    }

    /// Stops the timer task and waits for it to exit
    ///
    /// A cycle in progress stops before its next source or document; work
    /// already in flight finishes first. The scheduler can be started again
    /// afterwards.
    pub async fn stop(&self) {
        self.current_token().cancel();

        let handle = self.lock_handle().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Scheduler task failed");
            }
        }

        // Wait out a manually triggered cycle as well
        let _guard = self.cycle_lock.lock().await;
        *self.cancel.lock().unwrap_or_else(PoisonError::into_inner) = CancellationToken::new();
        tracing::info!("Scheduler stopped");
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_handle(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn timer_loop(
    schedule: Schedule,
    orchestrator: Arc<CrawlOrchestrator>,
    cycle_lock: Arc<AsyncMutex<()>>,
    cancel: CancellationToken,
    run_on_start: bool,
) {
    if run_on_start {
        run_scheduled_cycle(&orchestrator, &cycle_lock, &cancel).await;
    }

    loop {
        let now = Local::now();
        let Some(next) = schedule.next_after(&now) else {
            tracing::error!(schedule = %schedule, "Schedule produced no next run time");
            return;
        };

        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next = %next.format("%Y-%m-%d %H:%M %Z"), "Next crawl cycle scheduled");

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(wait) => {}
        }

        run_scheduled_cycle(&orchestrator, &cycle_lock, &cancel).await;
    }
}

async fn run_scheduled_cycle(
    orchestrator: &CrawlOrchestrator,
    cycle_lock: &AsyncMutex<()>,
    cancel: &CancellationToken,
) {
    match cycle_lock.try_lock() {
        Ok(_guard) => {
            orchestrator.run(cancel).await;
        }
        Err(_) => {
            tracing::info!("Crawl cycle still running, skipping scheduled trigger");
        }
    }
}
