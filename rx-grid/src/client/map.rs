//! Distributed map contract.

use crate::client::function::ProcessorRef;
use crate::client::invocation::InvocationRef;
use std::hash::Hash;
use std::time::Duration;

/// Bound for keys of grid maps: cloned into every re-subscription and hashed
/// by implementations to pick an owner.
pub trait MapKey: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T> MapKey for T where T: Clone + Eq + Hash + Send + Sync + 'static {}

pub trait MapValue: Clone + Send + Sync + 'static {}

impl<T> MapValue for T where T: Clone + Send + Sync + 'static {}

/// Handle to a named distributed map.
///
/// A `None` ttl applies the map's default expiry policy; `Some(Duration::ZERO)`
/// stores the entry without expiry. Absent entries and absent previous values
/// are reported as `None`.
pub trait GridMap: Send + Sync + 'static {
    type Key: MapKey;
    type Value: MapValue;

    fn name(&self) -> &str;

    fn get_async(&self, key: Self::Key) -> InvocationRef<Option<Self::Value>>;

    /// Returns the previous value.
    fn put_async(
        &self,
        key: Self::Key,
        value: Self::Value,
        ttl: Option<Duration>,
    ) -> InvocationRef<Option<Self::Value>>;

    /// Like [`GridMap::put_async`] without returning the previous value.
    fn set_async(
        &self,
        key: Self::Key,
        value: Self::Value,
        ttl: Option<Duration>,
    ) -> InvocationRef<()>;

    /// Returns the removed value.
    fn remove_async(&self, key: Self::Key) -> InvocationRef<Option<Self::Value>>;

    /// Runs `processor` on the owner of `key` and returns its result.
    fn submit_to_key<T: Send + 'static>(
        &self,
        key: Self::Key,
        processor: ProcessorRef<Self::Key, Self::Value, T>,
    ) -> InvocationRef<T>;
}
