//! Counter double completed by hand from tests.

use rx_grid::client::{AtomicLong, FunctionRef, InvocationPromise, InvocationRef};
use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct Call {
    operation: String,
    promise: Arc<dyn Any + Send + Sync>,
}

/// Counter double whose invocations stay pending until the test completes
/// them. Every call is recorded with its arguments.
#[derive(Default)]
pub struct ManualAtomicLong {
    calls: Mutex<Vec<Call>>,
}

impl ManualAtomicLong {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn calls(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recorded calls, e.g. `"add_and_get(3)"`.
    pub fn recorded(&self) -> Vec<String> {
        self.calls().iter().map(|call| call.operation.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Promise handed out by the `index`-th call, if it has result type `T`.
    pub fn promise<T: Send + 'static>(&self, index: usize) -> Option<Arc<InvocationPromise<T>>> {
        let promise = self.calls().get(index)?.promise.clone();
        promise.downcast::<InvocationPromise<T>>().ok()
    }

    fn record<T: Send + 'static>(&self, operation: String) -> InvocationRef<T> {
        let promise = InvocationPromise::<T>::new();
        self.calls().push(Call {
            operation,
            promise: promise.clone(),
        });
        promise
    }
}

impl AtomicLong for ManualAtomicLong {
    fn name(&self) -> &str {
        "manual"
    }

    fn add_and_get_async(&self, delta: i64) -> InvocationRef<i64> {
        self.record(format!("add_and_get({delta})"))
    }

    fn compare_and_set_async(&self, expect: i64, update: i64) -> InvocationRef<bool> {
        self.record(format!("compare_and_set({expect}, {update})"))
    }

    fn decrement_and_get_async(&self) -> InvocationRef<i64> {
        self.record("decrement_and_get()".to_string())
    }

    fn get_async(&self) -> InvocationRef<i64> {
        self.record("get()".to_string())
    }

    fn get_and_add_async(&self, delta: i64) -> InvocationRef<i64> {
        self.record(format!("get_and_add({delta})"))
    }

    fn get_and_set_async(&self, new_value: i64) -> InvocationRef<i64> {
        self.record(format!("get_and_set({new_value})"))
    }

    fn increment_and_get_async(&self) -> InvocationRef<i64> {
        self.record("increment_and_get()".to_string())
    }

    fn get_and_increment_async(&self) -> InvocationRef<i64> {
        self.record("get_and_increment()".to_string())
    }

    fn set_async(&self, new_value: i64) -> InvocationRef<()> {
        self.record(format!("set({new_value})"))
    }

    fn alter_async(&self, _function: FunctionRef<i64, i64>) -> InvocationRef<()> {
        self.record("alter(fn)".to_string())
    }

    fn alter_and_get_async(&self, _function: FunctionRef<i64, i64>) -> InvocationRef<i64> {
        self.record("alter_and_get(fn)".to_string())
    }

    fn get_and_alter_async(&self, _function: FunctionRef<i64, i64>) -> InvocationRef<i64> {
        self.record("get_and_alter(fn)".to_string())
    }

    fn apply_async<R: Send + 'static>(&self, _function: FunctionRef<i64, R>) -> InvocationRef<R> {
        self.record("apply(fn)".to_string())
    }
}
