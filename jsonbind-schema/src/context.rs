//! Caller-supplied context threaded through a mapping call

use ahash::AHashMap;
use std::any::Any;

/// Open key-value bag handed unchanged to every converter invocation of a
/// mapping call.
///
/// The engine itself never reads or writes entries; it only threads the same
/// reference through the whole recursive traversal, so every element of a
/// batch call observes the same context. Values are heterogeneous and typed
/// at the access site.
#[derive(Default)]
pub struct Context {
    entries: AHashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous entry.
    pub fn insert<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), Box::new(value));
    }

    /// Builder-style [`insert`](Context::insert).
    pub fn with<V: Any + Send + Sync>(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Fetch the entry under `key` as type `V`. `None` when the key is
    /// absent or holds a different type.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.entries.get(key).and_then(|v| v.downcast_ref::<V>())
    }

    /// True when `key` has an entry of any type.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
