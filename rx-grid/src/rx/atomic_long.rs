//! Reactive facade over a grid counter.

use crate::bridge::{Completable, Observable};
use crate::client::{AtomicLong, FunctionRef};
use crate::error::GridError;
use crate::observability::events;
use std::sync::Arc;
use tracing::warn;

const COMPONENT: &str = "rx_atomic_long";

/// Reactive view of an [`AtomicLong`].
///
/// Every method returns immediately with a cold observable; the request is
/// dispatched when the observable is subscribed.
pub struct RxAtomicLong<C> {
    delegate: Arc<C>,
}

impl<C> Clone for RxAtomicLong<C> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
        }
    }
}

impl<C: AtomicLong> RxAtomicLong<C> {
    pub fn new(delegate: Arc<C>) -> Self {
        Self { delegate }
    }

    pub fn name(&self) -> &str {
        self.delegate.name()
    }

    /// The underlying non-reactive counter.
    pub fn delegate(&self) -> &Arc<C> {
        &self.delegate
    }

    /// Emits the updated value.
    pub fn add_and_get(&self, delta: i64) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("add_and_get", move || counter.add_and_get_async(delta))
    }

    /// Emits `true` if the value equalled `expect` and was replaced with
    /// `update`, `false` otherwise.
    pub fn compare_and_set(&self, expect: i64, update: i64) -> Observable<bool> {
        let counter = self.delegate.clone();
        Observable::from_invocation("compare_and_set", move || {
            counter.compare_and_set_async(expect, update)
        })
    }

    pub fn decrement_and_get(&self) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("decrement_and_get", move || {
            counter.decrement_and_get_async()
        })
    }

    pub fn get(&self) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("get", move || counter.get_async())
    }

    /// Emits the value before the addition.
    pub fn get_and_add(&self, delta: i64) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("get_and_add", move || counter.get_and_add_async(delta))
    }

    /// Emits the old value.
    pub fn get_and_set(&self, new_value: i64) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("get_and_set", move || {
            counter.get_and_set_async(new_value)
        })
    }

    pub fn increment_and_get(&self) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("increment_and_get", move || {
            counter.increment_and_get_async()
        })
    }

    pub fn get_and_increment(&self) -> Observable<i64> {
        let counter = self.delegate.clone();
        Observable::from_invocation("get_and_increment", move || {
            counter.get_and_increment_async()
        })
    }

    pub fn set(&self, new_value: i64) -> Completable {
        let counter = self.delegate.clone();
        Observable::completable("set", move || counter.set_async(new_value))
    }

    /// Replaces the stored value with `function(value)`.
    ///
    /// A missing function fails the observable with
    /// [`crate::ErrorCode::InvalidArgument`] and never reaches the counter.
    pub fn alter(&self, function: Option<FunctionRef<i64, i64>>) -> Completable {
        let Some(function) = function else {
            return Self::missing_function("alter");
        };
        let counter = self.delegate.clone();
        Observable::completable("alter", move || counter.alter_async(function.clone()))
    }

    /// Like [`RxAtomicLong::alter`], emitting the new value.
    pub fn alter_and_get(&self, function: Option<FunctionRef<i64, i64>>) -> Observable<i64> {
        let Some(function) = function else {
            return Self::missing_function("alter_and_get");
        };
        let counter = self.delegate.clone();
        Observable::from_invocation("alter_and_get", move || {
            counter.alter_and_get_async(function.clone())
        })
    }

    /// Like [`RxAtomicLong::alter`], emitting the old value.
    pub fn get_and_alter(&self, function: Option<FunctionRef<i64, i64>>) -> Observable<i64> {
        let Some(function) = function else {
            return Self::missing_function("get_and_alter");
        };
        let counter = self.delegate.clone();
        Observable::from_invocation("get_and_alter", move || {
            counter.get_and_alter_async(function.clone())
        })
    }

    /// Emits `function(value)`; the stored value does not change.
    pub fn apply<R: Send + 'static>(&self, function: Option<FunctionRef<i64, R>>) -> Observable<R> {
        let Some(function) = function else {
            return Self::missing_function("apply");
        };
        let counter = self.delegate.clone();
        Observable::from_invocation("apply", move || counter.apply_async(function.clone()))
    }

    fn missing_function<T: Send + 'static>(operation: &'static str) -> Observable<T> {
        warn!(
            event = events::ARGUMENT_REJECTED,
            component = COMPONENT,
            operation,
            "function must not be missing"
        );
        Observable::error(
            operation,
            GridError::invalid_argument(format!("{operation}: function must not be missing")),
        )
    }
}
