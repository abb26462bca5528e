//! Observer that records every signal for later assertions.

use rx_grid::{GridError, Observer};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{timeout_at, Instant};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal<T> {
    Next(T),
    Error(GridError),
    Completed,
}

impl<T> Signal<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Signal::Next(_))
    }
}

struct Shared<T> {
    signals: Mutex<Vec<Signal<T>>>,
    notify: Notify,
}

impl<T> Shared<T> {
    fn push(&self, signal: Signal<T>) {
        self.signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(signal);
        self.notify.notify_waiters();
    }
}

/// Observer half. Appends every signal it receives.
pub struct RecordingObserver<T> {
    shared: Arc<Shared<T>>,
}

/// Inspection half of a [`RecordingObserver`].
pub struct Recording<T> {
    shared: Arc<Shared<T>>,
}

pub fn recording<T: Send + 'static>() -> (RecordingObserver<T>, Recording<T>) {
    let shared = Arc::new(Shared {
        signals: Mutex::new(Vec::new()),
        notify: Notify::new(),
    });
    (
        RecordingObserver {
            shared: shared.clone(),
        },
        Recording { shared },
    )
}

impl<T: Send + 'static> Observer<T> for RecordingObserver<T> {
    fn on_next(&mut self, value: T) {
        self.shared.push(Signal::Next(value));
    }

    fn on_error(&mut self, error: GridError) {
        self.shared.push(Signal::Error(error));
    }

    fn on_completed(&mut self) {
        self.shared.push(Signal::Completed);
    }
}

impl<T: Clone> Recording<T> {
    pub fn signals(&self) -> Vec<Signal<T>> {
        self.shared
            .signals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Waits up to `within` for a terminal signal and returns everything
    /// recorded so far.
    pub async fn terminated(&self, within: Duration) -> Vec<Signal<T>> {
        let deadline = Instant::now() + within;
        loop {
            let notified = self.shared.notify.notified();
            let signals = self.signals();
            if signals.iter().any(Signal::is_terminal) {
                return signals;
            }
            if timeout_at(deadline, notified).await.is_err() {
                return self.signals();
            }
        }
    }
}
