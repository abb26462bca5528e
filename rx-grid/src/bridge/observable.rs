//! Cold single-signal observable bridged from a [`GridFuture`] callback.
//!
//! [`GridFuture`]: crate::client::GridFuture

use crate::bridge::observer::{emit, BoxedObserver, Observer, Terminal};
use crate::bridge::stream::ObservableStream;
use crate::bridge::subscription::{Subscription, SubscriptionState};
use crate::client::InvocationRef;
use crate::error::GridError;
use crate::observability::events;
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

const COMPONENT: &str = "observable";

/// Observable of a void operation: completes without emitting a value.
pub type Completable = Observable<Infallible>;

type OnSubscribe<T> = dyn Fn(Delivery<T>) + Send + Sync;

/// Everything needed to hand one terminal outcome to one observer.
pub(crate) struct Delivery<T> {
    operation: &'static str,
    observer: BoxedObserver<T>,
    state: Arc<SubscriptionState>,
    scheduler: Option<Handle>,
}

impl<T: Send + 'static> Delivery<T> {
    fn deliver(self, terminal: Terminal<T>) {
        match self.scheduler.clone() {
            Some(handle) => {
                trace!(
                    event = events::DELIVERY_SCHEDULED,
                    component = COMPONENT,
                    operation = self.operation,
                    subscription_id = %self.state.id(),
                    "handing signals to scheduler"
                );
                let mut scheduled = ScheduledDelivery {
                    pending: Some((self, terminal)),
                };
                handle.spawn(async move {
                    if let Some((delivery, terminal)) = scheduled.pending.take() {
                        delivery.deliver_now(terminal);
                    }
                });
            }
            None => self.deliver_now(terminal),
        }
    }

    fn deliver_now(mut self, terminal: Terminal<T>) {
        if !self.state.try_terminate() {
            trace!(
                event = events::SIGNAL_SUPPRESSED,
                component = COMPONENT,
                operation = self.operation,
                subscription_id = %self.state.id(),
                "subscriber already unsubscribed"
            );
            return;
        }
        emit(self.observer.as_mut(), terminal);
    }
}

/// Signals handed to a scheduler. If the scheduler drops the task without
/// running it (its runtime has shut down), the signals are delivered inline on
/// the dropping thread instead.
struct ScheduledDelivery<T: Send + 'static> {
    pending: Option<(Delivery<T>, Terminal<T>)>,
}

impl<T: Send + 'static> Drop for ScheduledDelivery<T> {
    fn drop(&mut self) {
        if let Some((delivery, terminal)) = self.pending.take() {
            warn!(
                event = events::DELIVERY_FALLBACK,
                component = COMPONENT,
                operation = delivery.operation,
                subscription_id = %delivery.state.id(),
                "scheduler dropped delivery task, delivering inline"
            );
            delivery.deliver_now(terminal);
        }
    }
}

/// A cold stream of at most one value followed by completion, or one error.
///
/// Nothing happens until [`Observable::subscribe`] is called, and every
/// subscription issues its own underlying invocation.
pub struct Observable<T> {
    operation: &'static str,
    on_subscribe: Arc<OnSubscribe<T>>,
    scheduler: Option<Handle>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            operation: self.operation,
            on_subscribe: self.on_subscribe.clone(),
            scheduler: self.scheduler.clone(),
        }
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Bridges a value-returning client call. `issue` runs once per
    /// subscription.
    pub fn from_invocation<F>(operation: &'static str, issue: F) -> Self
    where
        F: Fn() -> InvocationRef<T> + Send + Sync + 'static,
    {
        Self::bridge(operation, issue, Some)
    }

    /// Fails every subscriber with `error` without issuing any call.
    pub fn error(operation: &'static str, error: GridError) -> Self {
        Self {
            operation,
            on_subscribe: Arc::new(move |delivery: Delivery<T>| {
                delivery.deliver(Err(error.clone()));
            }),
            scheduler: None,
        }
    }

    fn bridge<S, F, P>(operation: &'static str, issue: F, project: P) -> Self
    where
        S: Send + 'static,
        F: Fn() -> InvocationRef<S> + Send + Sync + 'static,
        P: Fn(S) -> Option<T> + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let on_subscribe = move |delivery: Delivery<T>| {
            let invocation = issue();
            let subscription_id = delivery.state.id();
            debug!(
                event = events::INVOCATION_ISSUED,
                component = COMPONENT,
                operation,
                subscription_id = %subscription_id,
                "issued underlying invocation"
            );

            let cancel_target = invocation.clone();
            delivery
                .state
                .attach_cancel_hook(Box::new(move || cancel_target.cancel()));

            let project = project.clone();
            invocation.and_then(Box::new(move |result: Result<S, GridError>| {
                match &result {
                    Ok(_) => debug!(
                        event = events::INVOCATION_SUCCEEDED,
                        component = COMPONENT,
                        operation,
                        subscription_id = %subscription_id,
                        "underlying invocation completed"
                    ),
                    Err(err) if err.is_cancelled() => debug!(
                        event = events::INVOCATION_FAILED,
                        component = COMPONENT,
                        operation,
                        subscription_id = %subscription_id,
                        err = %err,
                        "underlying invocation cancelled"
                    ),
                    Err(err) => warn!(
                        event = events::INVOCATION_FAILED,
                        component = COMPONENT,
                        operation,
                        subscription_id = %subscription_id,
                        err = %err,
                        "underlying invocation failed"
                    ),
                }
                delivery.deliver(result.map(|value| (*project)(value)));
            }));
        };

        Self {
            operation,
            on_subscribe: Arc::new(on_subscribe),
            scheduler: None,
        }
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Delivers this observable's signals on a task spawned onto `handle`
    /// instead of on the thread that completed the invocation.
    ///
    /// If the runtime behind `handle` has shut down, the task never runs and
    /// the signals are delivered inline on the completing thread, with a
    /// warning.
    pub fn observe_on(&self, handle: Handle) -> Self {
        Self {
            scheduler: Some(handle),
            ..self.clone()
        }
    }

    pub fn subscribe<O: Observer<T>>(&self, observer: O) -> Subscription {
        let subscription = Subscription::new(self.operation);
        debug!(
            event = events::SUBSCRIBE,
            component = COMPONENT,
            operation = self.operation,
            subscription_id = %subscription.id(),
            scheduled = self.scheduler.is_some(),
            "new subscription"
        );

        (self.on_subscribe)(Delivery {
            operation: self.operation,
            observer: Box::new(observer),
            state: subscription.state(),
            scheduler: self.scheduler.clone(),
        });
        subscription
    }

    /// Subscribes and exposes the signals as a [`futures::Stream`]. Dropping
    /// the stream unsubscribes.
    pub fn to_stream(&self) -> ObservableStream<T> {
        ObservableStream::subscribe(self)
    }

    /// Subscribes and waits for the terminal signal. Completables and
    /// value-less completions yield `Ok(None)`.
    pub async fn first(&self) -> Result<Option<T>, GridError> {
        let mut stream = self.to_stream();
        stream.next().await.transpose()
    }
}

impl Observable<Infallible> {
    /// Bridges a void client call.
    pub fn completable<F>(operation: &'static str, issue: F) -> Self
    where
        F: Fn() -> InvocationRef<()> + Send + Sync + 'static,
    {
        Self::bridge(operation, issue, |()| None)
    }
}
