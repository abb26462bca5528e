//! In-process counter executed on the grid I/O thread.

use crate::executor::GridExecutor;
use rx_grid::client::{AtomicLong, FunctionRef, InvocationRef};
use rx_grid::GridError;
use std::sync::{Arc, Mutex, PoisonError};

/// In-process counter. Arithmetic wraps on overflow.
pub struct MemoryAtomicLong {
    name: String,
    value: Arc<Mutex<i64>>,
    executor: Arc<GridExecutor>,
}

impl MemoryAtomicLong {
    pub(crate) fn new(name: &str, executor: Arc<GridExecutor>) -> Self {
        Self {
            name: name.to_string(),
            value: Arc::new(Mutex::new(0)),
            executor,
        }
    }

    /// Runs `update` on the I/O thread with exclusive access to the value.
    fn update<T, F>(&self, operation: &'static str, update: F) -> InvocationRef<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut i64) -> T + Send + 'static,
    {
        let value = self.value.clone();
        self.executor.submit(operation, move || {
            let mut value = value.lock().unwrap_or_else(PoisonError::into_inner);
            Ok::<T, GridError>(update(&mut *value))
        })
    }
}

impl AtomicLong for MemoryAtomicLong {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_and_get_async(&self, delta: i64) -> InvocationRef<i64> {
        self.update("add_and_get", move |value| {
            *value = value.wrapping_add(delta);
            *value
        })
    }

    fn compare_and_set_async(&self, expect: i64, update: i64) -> InvocationRef<bool> {
        self.update("compare_and_set", move |value| {
            if *value == expect {
                *value = update;
                true
            } else {
                false
            }
        })
    }

    fn decrement_and_get_async(&self) -> InvocationRef<i64> {
        self.add_and_get_async(-1)
    }

    fn get_async(&self) -> InvocationRef<i64> {
        self.update("get", |value| *value)
    }

    fn get_and_add_async(&self, delta: i64) -> InvocationRef<i64> {
        self.update("get_and_add", move |value| {
            let previous = *value;
            *value = value.wrapping_add(delta);
            previous
        })
    }

    fn get_and_set_async(&self, new_value: i64) -> InvocationRef<i64> {
        self.update("get_and_set", move |value| std::mem::replace(value, new_value))
    }

    fn increment_and_get_async(&self) -> InvocationRef<i64> {
        self.add_and_get_async(1)
    }

    fn get_and_increment_async(&self) -> InvocationRef<i64> {
        self.get_and_add_async(1)
    }

    fn set_async(&self, new_value: i64) -> InvocationRef<()> {
        self.update("set", move |value| *value = new_value)
    }

    fn alter_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<()> {
        self.update("alter", move |value| *value = function.apply(*value))
    }

    fn alter_and_get_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<i64> {
        self.update("alter_and_get", move |value| {
            *value = function.apply(*value);
            *value
        })
    }

    fn get_and_alter_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<i64> {
        self.update("get_and_alter", move |value| {
            let previous = *value;
            *value = function.apply(previous);
            previous
        })
    }

    fn apply_async<R: Send + 'static>(&self, function: FunctionRef<i64, R>) -> InvocationRef<R> {
        self.update("apply", move |value| function.apply(*value))
    }
}
