//! Per-subscription lifecycle: issued, then exactly one terminal state.

use crate::observability::events;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "subscription";

const ACTIVE: u8 = 0;
const TERMINATED: u8 = 1;
const CANCELLED: u8 = 2;

pub(crate) type CancelHook = Box<dyn FnOnce() -> bool + Send>;

pub(crate) struct SubscriptionState {
    id: Uuid,
    operation: &'static str,
    state: AtomicU8,
    cancel_hook: Mutex<Option<CancelHook>>,
}

impl SubscriptionState {
    pub(crate) fn id(&self) -> Uuid {
        self.id
    }

    /// Attaches the underlying cancellation. If the subscription was already
    /// cancelled the hook runs right away.
    pub(crate) fn attach_cancel_hook(&self, hook: CancelHook) {
        let mut slot = self
            .cancel_hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match self.state.load(Ordering::Acquire) {
            ACTIVE => *slot = Some(hook),
            CANCELLED => {
                drop(slot);
                hook();
            }
            _ => {}
        }
    }

    /// Claims the right to deliver the terminal signals. Only one caller ever
    /// wins, and never after unsubscription.
    pub(crate) fn try_terminate(&self) -> bool {
        let won = self
            .state
            .compare_exchange(ACTIVE, TERMINATED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.take_cancel_hook();
        }
        won
    }

    fn take_cancel_hook(&self) -> Option<CancelHook> {
        self.cancel_hook
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn unsubscribe(&self) {
        if self
            .state
            .compare_exchange(ACTIVE, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let underlying_cancelled = self.take_cancel_hook().map(|hook| hook());
        debug!(
            event = events::SUBSCRIPTION_CANCELLED,
            component = COMPONENT,
            operation = self.operation,
            subscription_id = %self.id,
            underlying_cancelled = ?underlying_cancelled,
            "unsubscribed before completion"
        );
    }
}

/// Handle returned by [`crate::Observable::subscribe`].
///
/// Dropping the handle leaves the subscription running; call
/// [`Subscription::unsubscribe`] to stop it.
#[derive(Clone)]
pub struct Subscription {
    state: Arc<SubscriptionState>,
}

impl Subscription {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            state: Arc::new(SubscriptionState {
                id: Uuid::new_v4(),
                operation,
                state: AtomicU8::new(ACTIVE),
                cancel_hook: Mutex::new(None),
            }),
        }
    }

    pub(crate) fn state(&self) -> Arc<SubscriptionState> {
        self.state.clone()
    }

    pub fn id(&self) -> Uuid {
        self.state.id
    }

    pub fn operation(&self) -> &'static str {
        self.state.operation
    }

    /// Stops signal delivery and asks the underlying invocation to cancel.
    /// No-op once the subscription has terminated.
    pub fn unsubscribe(&self) {
        self.state.unsubscribe();
    }

    pub fn is_unsubscribed(&self) -> bool {
        self.state.state.load(Ordering::Acquire) == CANCELLED
    }

    /// Whether the terminal signals were claimed for delivery.
    pub fn is_terminated(&self) -> bool {
        self.state.state.load(Ordering::Acquire) == TERMINATED
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.state.id)
            .field("operation", &self.state.operation)
            .field("unsubscribed", &self.is_unsubscribed())
            .field("terminated", &self.is_terminated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Subscription;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_hook(calls: &Arc<AtomicUsize>) -> super::CancelHook {
        let calls = calls.clone();
        Box::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            true
        })
    }

    #[test]
    fn unsubscribe_runs_cancel_hook_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new("get");
        subscription.state().attach_cancel_hook(counting_hook(&calls));

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(subscription.is_unsubscribed());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!subscription.state().try_terminate());
    }

    #[test]
    fn terminate_wins_over_later_unsubscribe() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new("get");
        subscription.state().attach_cancel_hook(counting_hook(&calls));

        assert!(subscription.state().try_terminate());
        subscription.unsubscribe();

        assert!(subscription.is_terminated());
        assert!(!subscription.is_unsubscribed());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn hook_attached_after_unsubscribe_runs_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new("set");

        subscription.unsubscribe();
        subscription.state().attach_cancel_hook(counting_hook(&calls));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
