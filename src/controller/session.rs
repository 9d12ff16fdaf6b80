//! Reporting sessions and the schedulers that drive them
//!
//! A session is the periodic-notification activity bound to one press. The
//! scheduler only produces [`SessionTick`]s; it never touches controller
//! state or calls the listener. Ticks are delivered back to whoever owns the
//! controller, which checks the session id before notifying. A tick that
//! was already in flight when its session was cancelled is therefore
//! swallowed by the owner.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// Monotonic identifier of a reporting session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// One periodic wake-up of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTick {
    pub session: SessionId,
}

/// Handle to a live periodic-notification task
///
/// Dropping the handle cancels the session.
pub struct ReportingSession {
    id: SessionId,
    interval: Duration,
    live: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ReportingSession {
    /// Session without a backing task; ticks are injected by the caller
    pub fn detached(id: SessionId, interval: Duration) -> Self {
        Self {
            id,
            interval,
            live: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Stop the session; safe to call more than once
    pub fn cancel(&mut self) {
        if self.live.swap(false, Ordering::AcqRel) {
            debug!(session = self.id.0, "Reporting session cancelled");
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReportingSession {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for ReportingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingSession")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Starts periodic reporting sessions
pub trait TickScheduler: Send {
    fn start(&mut self, session: SessionId, interval: Duration) -> ReportingSession;
}

/// Scheduler backed by a tokio interval task per session
///
/// Ticks are forwarded on an unbounded channel to the controller's owner.
/// Must be used from within a tokio runtime.
pub struct TokioTickScheduler {
    tick_tx: mpsc::UnboundedSender<SessionTick>,
}

impl TokioTickScheduler {
    pub fn new(tick_tx: mpsc::UnboundedSender<SessionTick>) -> Self {
        Self { tick_tx }
    }

    /// Create a scheduler together with the receiving end of its ticks
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionTick>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (Self::new(tick_tx), tick_rx)
    }
}

impl TickScheduler for TokioTickScheduler {
    fn start(&mut self, session: SessionId, period: Duration) -> ReportingSession {
        let live = Arc::new(AtomicBool::new(true));
        let task_live = Arc::clone(&live);
        let tick_tx = self.tick_tx.clone();

        let task = tokio::spawn(async move {
            // The press itself already notified, so the first tick is one period out
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if !task_live.load(Ordering::Acquire) {
                    break;
                }

                trace!(session = session.0, "Session tick");
                if tick_tx.send(SessionTick { session }).is_err() {
                    // Owner is gone
                    break;
                }
            }
        });

        let interval_ms = period.as_millis() as u64;
        debug!(session = session.0, interval_ms, "Reporting session started");

        ReportingSession {
            id: session,
            interval: period,
            live,
            task: Some(task),
        }
    }
}

/// Scheduler that records started sessions without spawning anything
///
/// Tests and hosts with their own frame clock drive ticks by hand.
#[derive(Clone, Default)]
pub struct ManualTickScheduler {
    started: Arc<Mutex<Vec<StartedSession>>>,
}

struct StartedSession {
    id: SessionId,
    interval: Duration,
    live: Arc<AtomicBool>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions started so far, oldest first
    pub fn started(&self) -> Vec<(SessionId, Duration)> {
        self.started
            .lock()
            .iter()
            .map(|s| (s.id, s.interval))
            .collect()
    }

    /// Most recently started session
    pub fn last(&self) -> Option<SessionId> {
        self.started.lock().last().map(|s| s.id)
    }

    /// Sessions that have not been cancelled yet
    pub fn live_sessions(&self) -> Vec<SessionId> {
        self.started
            .lock()
            .iter()
            .filter(|s| s.live.load(Ordering::Acquire))
            .map(|s| s.id)
            .collect()
    }
}

impl TickScheduler for ManualTickScheduler {
    fn start(&mut self, session: SessionId, interval: Duration) -> ReportingSession {
        let live = Arc::new(AtomicBool::new(true));
        self.started.lock().push(StartedSession {
            id: session,
            interval,
            live: Arc::clone(&live),
        });

        ReportingSession {
            id: session,
            interval,
            live,
            task: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokio_session_ticks_until_cancelled() {
        let (mut scheduler, mut tick_rx) = TokioTickScheduler::channel();
        let mut session = scheduler.start(SessionId(7), Duration::from_millis(10));

        let tick = tokio::time::timeout(Duration::from_secs(2), tick_rx.recv())
            .await
            .expect("tick within timeout");
        assert_eq!(tick, Some(SessionTick { session: SessionId(7) }));

        session.cancel();
        assert!(!session.is_live());

        // Drain anything sent before cancellation, then expect silence
        tokio::time::sleep(Duration::from_millis(30)).await;
        while tick_rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(tick_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_first_tick_waits_one_interval() {
        let (mut scheduler, mut tick_rx) = TokioTickScheduler::channel();
        let started = Instant::now();
        let _session = scheduler.start(SessionId(1), Duration::from_millis(40));

        tick_rx.recv().await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_dropping_session_stops_task() {
        let (mut scheduler, mut tick_rx) = TokioTickScheduler::channel();
        drop(scheduler.start(SessionId(2), Duration::from_millis(5)));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(tick_rx.try_recv().is_err());
    }

    #[test]
    fn test_manual_scheduler_records_sessions() {
        let mut scheduler = ManualTickScheduler::new();
        let session = scheduler.start(SessionId(3), Duration::from_millis(50));

        assert!(session.is_live());
        assert_eq!(scheduler.last(), Some(SessionId(3)));
        assert_eq!(scheduler.started(), vec![(SessionId(3), Duration::from_millis(50))]);
        assert_eq!(scheduler.live_sessions(), vec![SessionId(3)]);

        drop(session);
        assert!(scheduler.live_sessions().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut session = ReportingSession::detached(SessionId(4), Duration::from_millis(50));
        session.cancel();
        session.cancel();
        assert!(!session.is_live());
    }
}
