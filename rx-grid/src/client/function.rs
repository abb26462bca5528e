//! Caller-supplied logic that the grid executes next to the data.

use std::sync::Arc;

/// Unary transform applied by the grid to a stored value.
///
/// Any `Fn(A) -> R + Send + Sync` closure is a `GridFunction`. Clients that
/// ship functions to remote members are free to require richer types; the
/// adapter only forwards the reference.
pub trait GridFunction<A, R>: Send + Sync {
    fn apply(&self, input: A) -> R;
}

impl<A, R, F> GridFunction<A, R> for F
where
    F: Fn(A) -> R + Send + Sync,
{
    fn apply(&self, input: A) -> R {
        self(input)
    }
}

pub type FunctionRef<A, R> = Arc<dyn GridFunction<A, R>>;

/// Key/value view handed to an [`EntryProcessor`].
///
/// Setting the value to `None` removes the entry once the processor returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapEntry<K, V> {
    key: K,
    value: Option<V>,
    modified: bool,
}

impl<K, V> MapEntry<K, V> {
    pub fn new(key: K, value: Option<V>) -> Self {
        Self {
            key,
            value,
            modified: false,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<V>) {
        self.value = value;
        self.modified = true;
    }

    /// Whether [`MapEntry::set_value`] was called.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn into_value(self) -> Option<V> {
        self.value
    }
}

/// Server-side function run against a single map entry.
pub trait EntryProcessor<K, V, T>: Send + Sync {
    fn process(&self, entry: &mut MapEntry<K, V>) -> T;
}

impl<K, V, T, F> EntryProcessor<K, V, T> for F
where
    F: Fn(&mut MapEntry<K, V>) -> T + Send + Sync,
{
    fn process(&self, entry: &mut MapEntry<K, V>) -> T {
        self(entry)
    }
}

pub type ProcessorRef<K, V, T> = Arc<dyn EntryProcessor<K, V, T>>;

#[cfg(test)]
mod tests {
    use super::{EntryProcessor, FunctionRef, GridFunction, MapEntry, ProcessorRef};
    use std::sync::Arc;

    #[test]
    fn closures_are_grid_functions() {
        let double: FunctionRef<i64, i64> = Arc::new(|value: i64| value * 2);
        assert_eq!(double.apply(21), 42);

        let describe: FunctionRef<i64, String> = Arc::new(|value: i64| format!("n={value}"));
        assert_eq!(describe.apply(3), "n=3");
    }

    #[test]
    fn processor_marks_entry_modified_when_it_writes() {
        let append: ProcessorRef<String, String, usize> =
            Arc::new(|entry: &mut MapEntry<String, String>| {
                let next = format!("{}!", entry.value().cloned().unwrap_or_default());
                let len = next.len();
                entry.set_value(Some(next));
                len
            });

        let mut entry = MapEntry::new("k".to_string(), Some("v".to_string()));
        assert!(!entry.is_modified());
        assert_eq!(append.process(&mut entry), 2);
        assert!(entry.is_modified());
        assert_eq!(entry.value().map(String::as_str), Some("v!"));
    }
}
