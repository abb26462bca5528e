//! Reactive facade over a grid map.

use crate::bridge::{Completable, Observable};
use crate::client::{GridMap, ProcessorRef};
use crate::observability::fields;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

const RX_MAP_TAG: &str = "RxMap:";

/// Reactive view of a [`GridMap`].
///
/// Absent entries are emitted as `None`, so `get`, `put` and `remove` always
/// emit exactly one value on success.
pub struct RxMap<M> {
    delegate: Arc<M>,
}

impl<M> Clone for RxMap<M> {
    fn clone(&self) -> Self {
        Self {
            delegate: self.delegate.clone(),
        }
    }
}

impl<M: GridMap> RxMap<M> {
    pub fn new(delegate: Arc<M>) -> Self {
        Self { delegate }
    }

    pub fn name(&self) -> &str {
        self.delegate.name()
    }

    /// The underlying non-reactive map.
    pub fn delegate(&self) -> &Arc<M> {
        &self.delegate
    }

    pub fn get(&self, key: M::Key) -> Observable<Option<M::Value>> {
        let map = self.delegate.clone();
        Observable::from_invocation("map_get", move || map.get_async(key.clone()))
    }

    /// Emits the previous value, using the map's default expiry.
    pub fn put(&self, key: M::Key, value: M::Value) -> Observable<Option<M::Value>> {
        self.put_inner(key, value, None)
    }

    /// Emits the previous value. A zero `ttl` stores the entry without expiry.
    pub fn put_with_ttl(
        &self,
        key: M::Key,
        value: M::Value,
        ttl: Duration,
    ) -> Observable<Option<M::Value>> {
        self.put_inner(key, value, Some(ttl))
    }

    pub fn set(&self, key: M::Key, value: M::Value) -> Completable {
        self.set_inner(key, value, None)
    }

    pub fn set_with_ttl(&self, key: M::Key, value: M::Value, ttl: Duration) -> Completable {
        self.set_inner(key, value, Some(ttl))
    }

    /// Emits the removed value.
    pub fn remove(&self, key: M::Key) -> Observable<Option<M::Value>> {
        let map = self.delegate.clone();
        Observable::from_invocation("map_remove", move || map.remove_async(key.clone()))
    }

    /// Runs `processor` against the entry for `key` on its owner and emits the
    /// processor's result.
    pub fn submit_to_key<T: Send + 'static>(
        &self,
        key: M::Key,
        processor: ProcessorRef<M::Key, M::Value, T>,
    ) -> Observable<T> {
        let map = self.delegate.clone();
        Observable::from_invocation("map_submit_to_key", move || {
            map.submit_to_key(key.clone(), processor.clone())
        })
    }

    fn put_inner(
        &self,
        key: M::Key,
        value: M::Value,
        ttl: Option<Duration>,
    ) -> Observable<Option<M::Value>> {
        trace!(
            "{RX_MAP_TAG}:put map={} ttl={}",
            self.delegate.name(),
            fields::format_ttl(ttl)
        );
        let map = self.delegate.clone();
        Observable::from_invocation("map_put", move || {
            map.put_async(key.clone(), value.clone(), ttl)
        })
    }

    fn set_inner(&self, key: M::Key, value: M::Value, ttl: Option<Duration>) -> Completable {
        trace!(
            "{RX_MAP_TAG}:set map={} ttl={}",
            self.delegate.name(),
            fields::format_ttl(ttl)
        );
        let map = self.delegate.clone();
        Observable::completable("map_set", move || {
            map.set_async(key.clone(), value.clone(), ttl)
        })
    }
}
