//! In-process map with per-entry expiry.

use crate::executor::GridExecutor;
use rx_grid::client::{GridMap, InvocationRef, MapEntry, MapKey, MapValue, ProcessorRef};
use rx_grid::GridError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct StoredValue<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> StoredValue<V> {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |deadline| deadline > now)
    }
}

type Entries<K, V> = Arc<Mutex<HashMap<K, StoredValue<V>>>>;

fn lock<K, V>(entries: &Entries<K, V>) -> MutexGuard<'_, HashMap<K, StoredValue<V>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deadline for a write: an explicit ttl wins over the map default, and a zero
/// ttl or one past the clock's range never expires.
fn expiry(default_ttl: Option<Duration>, ttl: Option<Duration>, now: Instant) -> Option<Instant> {
    match ttl.or(default_ttl) {
        Some(ttl) if ttl.is_zero() => None,
        Some(ttl) => now.checked_add(ttl),
        None => None,
    }
}

/// Evicts `key` if it has expired, then returns its live entry.
fn live_entry<'a, K: MapKey, V>(
    entries: &'a mut HashMap<K, StoredValue<V>>,
    key: &K,
    now: Instant,
) -> Option<&'a StoredValue<V>> {
    if entries.get(key).is_some_and(|stored| !stored.is_live(now)) {
        entries.remove(key);
    }
    entries.get(key)
}

/// In-process map. Expired entries behave as absent and are evicted lazily.
pub struct MemoryMap<K, V> {
    name: String,
    entries: Entries<K, V>,
    default_ttl: Option<Duration>,
    executor: Arc<GridExecutor>,
}

impl<K: MapKey, V: MapValue> MemoryMap<K, V> {
    pub(crate) fn new(
        name: &str,
        default_ttl: Option<Duration>,
        executor: Arc<GridExecutor>,
    ) -> Self {
        Self {
            name: name.to_string(),
            entries: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
            executor,
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        lock(&self.entries)
            .values()
            .filter(|stored| stored.is_live(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn store(
        &self,
        operation: &'static str,
        key: K,
        value: V,
        ttl: Option<Duration>,
    ) -> InvocationRef<Option<V>> {
        let entries = self.entries.clone();
        let default_ttl = self.default_ttl;
        self.executor.submit(operation, move || {
            let now = Instant::now();
            let stored = StoredValue {
                value,
                expires_at: expiry(default_ttl, ttl, now),
            };
            let mut entries = lock(&entries);
            let previous = live_entry(&mut *entries, &key, now).map(|stored| stored.value.clone());
            entries.insert(key, stored);
            Ok::<_, GridError>(previous)
        })
    }
}

impl<K: MapKey, V: MapValue> GridMap for MemoryMap<K, V> {
    type Key = K;
    type Value = V;

    fn name(&self) -> &str {
        &self.name
    }

    fn get_async(&self, key: K) -> InvocationRef<Option<V>> {
        let entries = self.entries.clone();
        self.executor.submit("map_get", move || {
            let mut entries = lock(&entries);
            Ok::<_, GridError>(
                live_entry(&mut *entries, &key, Instant::now()).map(|stored| stored.value.clone()),
            )
        })
    }

    fn put_async(&self, key: K, value: V, ttl: Option<Duration>) -> InvocationRef<Option<V>> {
        self.store("map_put", key, value, ttl)
    }

    fn set_async(&self, key: K, value: V, ttl: Option<Duration>) -> InvocationRef<()> {
        let entries = self.entries.clone();
        let default_ttl = self.default_ttl;
        self.executor.submit("map_set", move || {
            let stored = StoredValue {
                value,
                expires_at: expiry(default_ttl, ttl, Instant::now()),
            };
            lock(&entries).insert(key, stored);
            Ok::<_, GridError>(())
        })
    }

    fn remove_async(&self, key: K) -> InvocationRef<Option<V>> {
        let entries = self.entries.clone();
        self.executor.submit("map_remove", move || {
            let now = Instant::now();
            let removed = lock(&entries)
                .remove(&key)
                .filter(|stored| stored.is_live(now))
                .map(|stored| stored.value);
            Ok::<_, GridError>(removed)
        })
    }

    fn submit_to_key<T: Send + 'static>(
        &self,
        key: K,
        processor: ProcessorRef<K, V, T>,
    ) -> InvocationRef<T> {
        let entries = self.entries.clone();
        let default_ttl = self.default_ttl;
        self.executor.submit("map_submit_to_key", move || {
            let now = Instant::now();
            let mut entries = lock(&entries);
            let (current, expires_at) = match live_entry(&mut *entries, &key, now) {
                Some(stored) => (Some(stored.value.clone()), stored.expires_at),
                None => (None, expiry(default_ttl, None, now)),
            };

            let mut entry = MapEntry::new(key, current);
            let result = processor.process(&mut entry);
            if entry.is_modified() {
                let key = entry.key().clone();
                match entry.into_value() {
                    Some(value) => {
                        entries.insert(key, StoredValue { value, expires_at });
                    }
                    None => {
                        entries.remove(&key);
                    }
                }
            }
            Ok::<_, GridError>(result)
        })
    }
}
