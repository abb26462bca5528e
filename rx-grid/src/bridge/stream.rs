//! Pull-based view of an observable subscription.

use crate::bridge::observable::Observable;
use crate::bridge::observer::Observer;
use crate::bridge::subscription::Subscription;
use crate::error::GridError;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use futures::StreamExt;
use std::pin::Pin;
use std::task::{Context, Poll};

struct ChannelObserver<T> {
    sender: Option<UnboundedSender<Result<T, GridError>>>,
}

impl<T: Send + 'static> Observer<T> for ChannelObserver<T> {
    fn on_next(&mut self, value: T) {
        if let Some(sender) = &self.sender {
            // A closed channel means the stream was dropped and unsubscribed.
            let _ = sender.unbounded_send(Ok(value));
        }
    }

    fn on_error(&mut self, error: GridError) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.unbounded_send(Err(error));
        }
    }

    fn on_completed(&mut self) {
        self.sender = None;
    }
}

/// [`Stream`] of `Ok(value)` items ending at completion, or a single `Err`.
///
/// Created by [`Observable::to_stream`]. Dropping it unsubscribes, which
/// cancels the underlying invocation if it is still in flight.
pub struct ObservableStream<T> {
    receiver: UnboundedReceiver<Result<T, GridError>>,
    subscription: Subscription,
}

impl<T: Send + 'static> ObservableStream<T> {
    pub(crate) fn subscribe(observable: &Observable<T>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        let subscription = observable.subscribe(ChannelObserver {
            sender: Some(sender),
        });
        Self {
            receiver,
            subscription,
        }
    }
}

impl<T> ObservableStream<T> {
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<T> Stream for ObservableStream<T> {
    type Item = Result<T, GridError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_next_unpin(cx)
    }
}

impl<T> Drop for ObservableStream<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
