//! Future-like handle returned by every asynchronous client operation.

use crate::error::{ErrorCode, GridError};
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

const INVOCATION_PROMISE_TAG: &str = "InvocationPromise:";
const INVOCATION_PROMISE_FN_AND_THEN_TAG: &str = "and_then():";

/// Callback run exactly once with the outcome of an invocation.
pub type CompletionCallback<T> = Box<dyn FnOnce(Result<T, GridError>) + Send + 'static>;

/// Shared handle to one in-flight invocation.
pub type InvocationRef<T> = Arc<dyn GridFuture<T>>;

/// Completion-callback registration for one asynchronous client call.
///
/// Implementations may run the callback on any thread, including the
/// registering thread when the invocation has already completed.
pub trait GridFuture<T>: Send + Sync {
    fn and_then(&self, callback: CompletionCallback<T>);

    /// Attempts to cancel the invocation. Returns `true` only if the call was
    /// stopped before it completed. Clients without a cancellation primitive
    /// keep the default.
    fn cancel(&self) -> bool {
        false
    }
}

enum PromiseState<T> {
    Pending(Option<CompletionCallback<T>>),
    Ready(Result<T, GridError>),
    Delivered,
    Cancelled,
}

/// Settable [`GridFuture`] for client implementations and test doubles.
///
/// `complete` and `cancel` race with first-writer-wins semantics. Callbacks
/// always run outside the internal lock.
pub struct InvocationPromise<T> {
    state: Mutex<PromiseState<T>>,
}

impl<T: Send + 'static> InvocationPromise<T> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PromiseState::Pending(None)),
        })
    }

    pub fn completed(result: Result<T, GridError>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(PromiseState::Ready(result)),
        })
    }

    /// Settles the promise. Returns `false` if it was already completed or
    /// cancelled, in which case `result` is dropped.
    pub fn complete(&self, result: Result<T, GridError>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match mem::replace(&mut *state, PromiseState::Delivered) {
            PromiseState::Pending(Some(callback)) => {
                drop(state);
                callback(result);
                true
            }
            PromiseState::Pending(None) => {
                *state = PromiseState::Ready(result);
                true
            }
            previous => {
                *state = previous;
                false
            }
        }
    }

    pub fn is_done(&self) -> bool {
        !matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            PromiseState::Pending(_)
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            PromiseState::Cancelled
        )
    }
}

impl<T: Send + 'static> GridFuture<T> for InvocationPromise<T> {
    fn and_then(&self, callback: CompletionCallback<T>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match mem::replace(&mut *state, PromiseState::Delivered) {
            PromiseState::Pending(None) => {
                *state = PromiseState::Pending(Some(callback));
            }
            PromiseState::Ready(result) => {
                drop(state);
                callback(result);
            }
            PromiseState::Cancelled => {
                *state = PromiseState::Cancelled;
                drop(state);
                callback(Err(GridError::cancelled("invocation was cancelled")));
            }
            previous => {
                *state = previous;
                drop(state);
                warn!(
                    "{INVOCATION_PROMISE_TAG}:{INVOCATION_PROMISE_FN_AND_THEN_TAG} completion callback already registered"
                );
                callback(Err(GridError::fail_with_code(
                    ErrorCode::IllegalState,
                    "a completion callback is already registered for this invocation",
                )));
            }
        }
    }

    fn cancel(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match mem::replace(&mut *state, PromiseState::Cancelled) {
            PromiseState::Pending(callback) => {
                drop(state);
                if let Some(callback) = callback {
                    callback(Err(GridError::cancelled("invocation was cancelled")));
                }
                true
            }
            previous => {
                *state = previous;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionCallback, GridFuture, InvocationPromise};
    use crate::error::{ErrorCode, GridError};
    use std::sync::{Arc, Mutex};

    type Seen<T> = Arc<Mutex<Vec<Result<T, GridError>>>>;

    fn capture<T: Send + 'static>() -> (Seen<T>, CompletionCallback<T>) {
        let seen: Seen<T> = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, Box::new(move |result| sink.lock().unwrap().push(result)))
    }

    #[test]
    fn callback_registered_before_completion_runs_on_complete() {
        let promise = InvocationPromise::<i64>::new();
        let (seen, callback) = capture();

        promise.and_then(callback);
        assert!(seen.lock().unwrap().is_empty());

        assert!(promise.complete(Ok(8)));
        assert_eq!(*seen.lock().unwrap(), vec![Ok(8)]);
        assert!(promise.is_done());
    }

    #[test]
    fn callback_registered_after_completion_runs_immediately() {
        let promise = InvocationPromise::completed(Ok(true));
        let (seen, callback) = capture();

        promise.and_then(callback);
        assert_eq!(*seen.lock().unwrap(), vec![Ok(true)]);
    }

    #[test]
    fn second_completion_is_ignored() {
        let promise = InvocationPromise::<i64>::new();
        assert!(promise.complete(Ok(1)));
        assert!(!promise.complete(Ok(2)));

        let (seen, callback) = capture();
        promise.and_then(callback);
        assert_eq!(*seen.lock().unwrap(), vec![Ok(1)]);
    }

    #[test]
    fn cancel_fails_pending_callback_and_blocks_completion() {
        let promise = InvocationPromise::<i64>::new();
        let (seen, callback) = capture();
        promise.and_then(callback);

        assert!(promise.cancel());
        assert!(promise.is_cancelled());
        assert!(!promise.complete(Ok(3)));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].as_ref().unwrap_err().code(),
            ErrorCode::Cancelled
        );
    }

    #[test]
    fn cancel_after_completion_reports_false() {
        let promise = InvocationPromise::<()>::new();
        promise.complete(Ok(()));
        assert!(!promise.cancel());
        assert!(!promise.is_cancelled());
    }

    #[test]
    fn second_callback_registration_is_rejected() {
        let promise = InvocationPromise::<i64>::new();
        let (_first, first_callback) = capture();
        let (second, second_callback) = capture();

        promise.and_then(first_callback);
        promise.and_then(second_callback);

        let second = second.lock().unwrap();
        assert_eq!(
            second[0].as_ref().unwrap_err().code(),
            ErrorCode::IllegalState
        );
    }
}
