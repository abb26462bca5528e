//! Distributed 64-bit counter contract.

use crate::client::function::FunctionRef;
use crate::client::invocation::InvocationRef;

/// Handle to a named, cluster-wide 64-bit counter.
///
/// Every operation dispatches a request and returns immediately. Atomicity and
/// ordering of the updates are the responsibility of the implementation.
pub trait AtomicLong: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Returns the updated value.
    fn add_and_get_async(&self, delta: i64) -> InvocationRef<i64>;

    /// Returns `true` if the stored value equalled `expect` and was replaced.
    fn compare_and_set_async(&self, expect: i64, update: i64) -> InvocationRef<bool>;

    fn decrement_and_get_async(&self) -> InvocationRef<i64>;

    fn get_async(&self) -> InvocationRef<i64>;

    /// Returns the value before the addition.
    fn get_and_add_async(&self, delta: i64) -> InvocationRef<i64>;

    fn get_and_set_async(&self, new_value: i64) -> InvocationRef<i64>;

    fn increment_and_get_async(&self) -> InvocationRef<i64>;

    fn get_and_increment_async(&self) -> InvocationRef<i64>;

    fn set_async(&self, new_value: i64) -> InvocationRef<()>;

    fn alter_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<()>;

    fn alter_and_get_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<i64>;

    fn get_and_alter_async(&self, function: FunctionRef<i64, i64>) -> InvocationRef<i64>;

    /// Applies `function` to the stored value without changing it.
    fn apply_async<R: Send + 'static>(&self, function: FunctionRef<i64, R>) -> InvocationRef<R>;
}
