//! Connected grid instance contract.

use crate::client::atomic_long::AtomicLong;
use crate::client::map::{GridMap, MapKey, MapValue};
use crate::error::GridError;
use std::sync::Arc;

/// Connected grid client that hands out named data-structure proxies.
///
/// Proxies are created on first reference; asking twice for the same name
/// returns a handle to the same distributed object.
pub trait GridInstance: Send + Sync + 'static {
    type AtomicLong: AtomicLong;
    type Map<K: MapKey, V: MapValue>: GridMap<Key = K, Value = V>;

    fn name(&self) -> &str;

    fn get_atomic_long(&self, name: &str) -> Arc<Self::AtomicLong>;

    /// Fails if `name` is already bound to a map with other key/value types.
    fn get_map<K: MapKey, V: MapValue>(&self, name: &str)
        -> Result<Arc<Self::Map<K, V>>, GridError>;
}
