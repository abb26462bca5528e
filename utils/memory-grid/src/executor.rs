//! Dedicated I/O thread that executes grid operations in submission order.

use rx_grid::client::{InvocationPromise, InvocationRef};
use rx_grid::{ErrorCode, GridError};
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use tokio::runtime::Builder;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, trace};

const GRID_EXECUTOR_TAG: &str = "GridExecutor:";
const GRID_EXECUTOR_FN_SUBMIT_TAG: &str = "submit():";
const GRID_EXECUTOR_FN_RUN_LOOP_TAG: &str = "run_loop():";

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
pub(crate) struct GridStats {
    invocations: AtomicUsize,
    skipped_after_cancel: AtomicUsize,
    pending_failures: Mutex<VecDeque<GridError>>,
}

impl GridStats {
    pub(crate) fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub(crate) fn skipped_after_cancel(&self) -> usize {
        self.skipped_after_cancel.load(Ordering::SeqCst)
    }

    pub(crate) fn push_failure(&self, error: GridError) {
        self.pending_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(error);
    }

    fn take_failure(&self) -> Option<GridError> {
        self.pending_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

pub(crate) struct GridExecutor {
    sender: UnboundedSender<Job>,
    stats: Arc<GridStats>,
}

impl GridExecutor {
    pub(crate) fn start(grid_name: &str, latency: Duration) -> Result<Self, GridError> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|error| {
                GridError::fail_with_code(
                    ErrorCode::Internal,
                    format!("Unable to create grid I/O runtime: {error:?}"),
                )
            })?;

        let (sender, receiver) = mpsc::unbounded_channel();
        let thread_name = format!("{grid_name}-io");
        let loop_name = thread_name.clone();

        thread::Builder::new()
            .name(thread_name)
            .spawn(move || {
                runtime.block_on(Self::run_loop(loop_name, latency, receiver));
            })
            .map_err(|error| {
                GridError::fail_with_code(
                    ErrorCode::Internal,
                    format!("Unable to spawn grid I/O thread: {error:?}"),
                )
            })?;

        Ok(Self {
            sender,
            stats: Arc::new(GridStats::default()),
        })
    }

    pub(crate) fn stats(&self) -> &Arc<GridStats> {
        &self.stats
    }

    async fn run_loop(id: String, latency: Duration, mut receiver: UnboundedReceiver<Job>) {
        debug!("{id}:{GRID_EXECUTOR_TAG}:{GRID_EXECUTOR_FN_RUN_LOOP_TAG} started, latency: {latency:?}");
        while let Some(job) = receiver.recv().await {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            job();
        }
        info!("{id}:{GRID_EXECUTOR_TAG}:{GRID_EXECUTOR_FN_RUN_LOOP_TAG} all grid handles dropped, stopping");
    }

    /// Queues `op` and returns the invocation it will complete. Cancelled
    /// invocations are skipped without running `op` and leave any injected
    /// failure for the next executed invocation.
    pub(crate) fn submit<T, F>(&self, operation: &'static str, op: F) -> InvocationRef<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, GridError> + Send + 'static,
    {
        self.stats.invocations.fetch_add(1, Ordering::SeqCst);
        let promise = InvocationPromise::new();

        let target = promise.clone();
        let stats = self.stats.clone();
        let job: Job = Box::new(move || {
            if target.is_cancelled() {
                stats.skipped_after_cancel.fetch_add(1, Ordering::SeqCst);
                debug!("{GRID_EXECUTOR_TAG}:{GRID_EXECUTOR_FN_SUBMIT_TAG} skipping cancelled {operation}");
                return;
            }
            let result = match stats.take_failure() {
                Some(error) => Err(error),
                None => panic::catch_unwind(AssertUnwindSafe(op)).unwrap_or_else(|_| {
                    Err(GridError::fail_with_code(
                        ErrorCode::RemoteFailure,
                        format!("{operation} panicked while executing on the grid"),
                    ))
                }),
            };
            trace!(
                "{GRID_EXECUTOR_TAG}:{GRID_EXECUTOR_FN_SUBMIT_TAG} {operation} finished, ok: {}",
                result.is_ok()
            );
            target.complete(result);
        });

        if self.sender.send(job).is_err() {
            promise.complete(Err(GridError::fail_with_code(
                ErrorCode::Unavailable,
                "grid I/O thread has stopped",
            )));
        }
        promise
    }
}
