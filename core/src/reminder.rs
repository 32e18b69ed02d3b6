use std::sync::mpsc::{self, RecvTimeoutError, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Local;
use tracing::{debug, warn};

use crate::store::TaskStore;

/// Interval between reminder checks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// How many days ahead a due date may lie and still trigger a reminder.
/// There is no lower bound: overdue tasks keep getting reminded about.
pub const DEFAULT_HORIZON_DAYS: i64 = 3;

/// One reminder notification: the display line of every matching task,
/// newline-joined, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub body: String,
}

/// Periodic background check for pending tasks nearing their due date.
///
/// Runs on its own thread; each tick takes the store lock for the read scan
/// only, so foreground mutation and the scan never interleave.
pub struct ReminderScheduler {
    store: Arc<Mutex<TaskStore>>,
    interval: Duration,
    horizon_days: i64,
}

impl ReminderScheduler {
    pub fn new(store: Arc<Mutex<TaskStore>>) -> Self {
        Self {
            store,
            interval: DEFAULT_TICK_INTERVAL,
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Override the tick interval. Tests run with millisecond intervals.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.horizon_days = days;
        self
    }

    /// Starts the background loop without blocking the caller. The first
    /// check runs immediately. The loop ends when the returned handle is
    /// stopped or dropped, or when the receiving side of `tx` goes away.
    pub fn start(self, tx: Sender<Reminder>) -> ReminderHandle {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread = thread::spawn(move || {
            debug!(
                interval_secs = self.interval.as_secs(),
                horizon_days = self.horizon_days,
                "reminder loop started"
            );
            loop {
                if self.tick(&tx).is_err() {
                    debug!("reminder channel closed, stopping");
                    break;
                }
                match stop_rx.recv_timeout(self.interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        ReminderHandle {
            stop_tx,
            thread: Some(thread),
        }
    }

    /// One reminder pass. A failed pass is skipped, never propagated; `Err`
    /// only reports that the notification channel is gone.
    fn tick(&self, tx: &Sender<Reminder>) -> Result<(), SendError<Reminder>> {
        let today = Local::now().date_naive();

        let due = match self.store.lock() {
            Ok(store) => store.due_within(today, self.horizon_days),
            Err(_) => {
                warn!("task store lock poisoned, skipping reminder check");
                return Ok(());
            }
        };

        if due.is_empty() {
            return Ok(());
        }

        let body = due
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        tx.send(Reminder { body })
    }
}

/// Owner handle for a running reminder loop.
pub struct ReminderHandle {
    stop_tx: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl ReminderHandle {
    /// Stops the loop and waits for the thread to finish.
    pub fn stop(mut self) {
        let _ = self.stop_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
