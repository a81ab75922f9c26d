//! Scheduler background loop.
//!
//! Spawns a tokio task that checks for newly overdue reminders once straight
//! away and then once per poll interval, and hands each one to a
//! [`NotificationSink`].

use std::{
    sync::{Arc, Mutex, PoisonError, TryLockError},
    time::Duration,
};

use chrono::NaiveDateTime;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    domain::MalformedReminderError,
    engine::{Clock, NotificationDispatchError, NotificationSink, OverdueTracker},
    storage::{ReminderStore, StoreUnavailableError},
};

/// Periodically announces reminders as they become overdue.
///
/// The scheduler is either stopped or running. While running, a background
/// task performs one check immediately and then one per poll interval. Checks
/// never overlap: a check that comes due while another is still in progress
/// is skipped.
pub struct Scheduler {
    inner: Arc<Inner>,
    running: Mutex<Option<Running>>,
}

struct Inner {
    store: Box<dyn ReminderStore>,
    sink: Box<dyn NotificationSink>,
    clock: Box<dyn Clock>,
    /// Held for the whole of a tick.
    tracker: Mutex<OverdueTracker>,
    events: Mutex<Option<mpsc::Sender<TickEvent>>>,
}

/// Events held for a subscriber that has fallen behind. Further events are
/// dropped until it catches up.
const EVENT_BUFFER: usize = 16;

struct Running {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// The result of a check that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The clock reading the check was made against.
    pub at: NaiveDateTime,
    /// Reminders whose notification was delivered, in delivery order.
    pub notified: Vec<Uuid>,
    /// Notifications the sink failed to deliver.
    ///
    /// These reminders still count as notified and will not be retried.
    pub failed: Vec<NotificationDispatchError>,
    /// Reminders skipped because they lack a date or time.
    pub malformed: Vec<MalformedReminderError>,
}

/// What happened when a check was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The check ran.
    Completed(TickReport),
    /// Another check was already in progress, so this one did nothing.
    Skipped,
}

/// Progress reported by the background loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// A check ran.
    Completed(TickReport),
    /// A check was skipped because another was in progress.
    Skipped,
    /// A check was abandoned because the store could not be read. The loop
    /// carries on and tries again at the next interval.
    StoreUnavailable(StoreUnavailableError),
}

/// Errors that prevent the scheduler from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    /// The scheduler is already running. Nothing was changed.
    #[error("scheduler is already running")]
    AlreadyRunning,

    /// A poll interval of zero was requested.
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    /// `start` was called outside a tokio runtime.
    #[error("scheduler must be started from within a tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

impl Scheduler {
    /// Create a stopped scheduler.
    #[must_use]
    pub fn new(
        store: impl ReminderStore + 'static,
        sink: impl NotificationSink + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let inner = Inner {
            store: Box::new(store),
            sink: Box::new(sink),
            clock: Box::new(clock),
            tracker: Mutex::new(OverdueTracker::new()),
            events: Mutex::new(None),
        };
        Self {
            inner: Arc::new(inner),
            running: Mutex::new(None),
        }
    }

    /// Start checking: once now, then every `poll_interval`, until stopped.
    ///
    /// Must be called from within a tokio runtime. Each check runs on the
    /// runtime's blocking pool, so a slow store or sink holds up only the
    /// scheduler, never other tasks on the runtime.
    ///
    /// # Errors
    ///
    /// - [`StartError::AlreadyRunning`] if the scheduler is already running
    /// - [`StartError::ZeroInterval`] if `poll_interval` is zero
    /// - [`StartError::NoRuntime`] if there is no current tokio runtime
    #[instrument(level = "debug", skip(self))]
    pub fn start(&self, poll_interval: Duration) -> Result<(), StartError> {
        let mut running = self.lock_running();
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            return Err(StartError::AlreadyRunning);
        }
        if poll_interval.is_zero() {
            return Err(StartError::ZeroInterval);
        }
        let runtime = tokio::runtime::Handle::try_current()?;

        let (shutdown, shutdown_rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        let handle = runtime.spawn(run_loop(inner, poll_interval, shutdown_rx));

        info!("scheduler started, checking every {poll_interval:?}");
        *running = Some(Running { shutdown, handle });
        Ok(())
    }

    /// Stop the background loop.
    ///
    /// A check already in progress is allowed to finish; no further checks
    /// start. Returns `false` if the scheduler was not running.
    pub fn stop(&self) -> bool {
        let Some(running) = self.lock_running().take() else {
            return false;
        };
        // The loop may already have exited, in which case nobody is listening.
        let _ = running.shutdown.send(());
        info!("scheduler stopped");
        true
    }

    /// Stop the background loop and wait for it to finish.
    pub async fn shutdown(&self) {
        let running = self.lock_running().take();
        let Some(Running { shutdown, handle }) = running else {
            return;
        };
        let _ = shutdown.send(());
        if let Err(e) = handle.await {
            warn!("scheduler task ended abnormally: {e}");
        }
        info!("scheduler shut down");
    }

    /// Whether the background loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_running()
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Run a single check now, on the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`StoreUnavailableError`] if the store could not be read, in
    /// which case no notifications were sent.
    pub fn tick(&self) -> Result<TickOutcome, StoreUnavailableError> {
        self.inner.tick()
    }

    /// Receive a [`TickEvent`] for every check the background loop makes.
    ///
    /// Only the most recent subscriber receives events. Up to 16 unread events
    /// are buffered; while the buffer is full, new events are dropped.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::Receiver<TickEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        *self
            .inner
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    fn lock_running(&self) -> std::sync::MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Inner {
    /// Execute one check: read the store, work out what is newly overdue, and
    /// notify it.
    #[instrument(level = "debug", skip(self))]
    fn tick(&self) -> Result<TickOutcome, StoreUnavailableError> {
        let mut tracker = match self.tracker.try_lock() {
            Ok(tracker) => tracker,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                debug!("check already in progress, skipping");
                return Ok(TickOutcome::Skipped);
            }
        };

        let now = self.clock.now();
        let reminders = self.store.get_all()?;
        let check = tracker.compute_newly_overdue(&reminders, now);

        for error in &check.malformed {
            warn!("skipping reminder: {error}");
        }

        let mut notified = Vec::with_capacity(check.newly_overdue.len());
        let mut failed = Vec::new();
        for reminder in &check.newly_overdue {
            match self.sink.notify(reminder) {
                Ok(()) => notified.push(reminder.id()),
                Err(e) => {
                    warn!("{e}");
                    failed.push(e);
                }
            }
        }

        debug!(
            "checked {} reminders at {now}: {} notified, {} failed",
            reminders.len(),
            notified.len(),
            failed.len()
        );

        Ok(TickOutcome::Completed(TickReport {
            at: now,
            notified,
            failed,
            malformed: check.malformed,
        }))
    }

    fn publish(&self, event: TickEvent) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = events.as_ref() else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("tick event subscriber is lagging, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("tick event receiver dropped");
                *events = None;
            }
        }
    }
}

async fn run_loop(
    inner: Arc<Inner>,
    poll_interval: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    // The first tick completes immediately.
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        let ticking = Arc::clone(&inner);
        let event = match tokio::task::spawn_blocking(move || ticking.tick()).await {
            Ok(Ok(TickOutcome::Completed(report))) => TickEvent::Completed(report),
            Ok(Ok(TickOutcome::Skipped)) => TickEvent::Skipped,
            Ok(Err(e)) => {
                warn!("{e}; retrying in {poll_interval:?}");
                TickEvent::StoreUnavailable(e)
            }
            Err(e) => {
                warn!("overdue check ended abnormally: {e}");
                continue;
            }
        };
        inner.publish(event);
    }

    debug!("scheduler loop exited");
}
