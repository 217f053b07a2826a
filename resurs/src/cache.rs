use std::collections::HashMap;
use std::hash::Hash;

use super::Handle;

/// Cache for descriptor to Handle\<T\>
///
/// Only maps keys, the items themselves live in a [`crate::Storage`]. Several keys may map to
/// the same handle.
#[derive(Debug)]
pub struct Cache<K: Hash + Eq, T> {
    cache: HashMap<K, Handle<T>>,
}

impl<K: Hash + Eq, T> Cache<K, T> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, key: &K) -> Option<Handle<T>> {
        self.cache.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains_key(key)
    }

    /// Keys are write-once, inserting an existing key is a logic error.
    pub fn insert(&mut self, key: K, h: Handle<T>) {
        let prev = self.cache.insert(key, h);
        debug_assert!(prev.is_none(), "Cache key inserted twice");
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Handle<T>)> {
        self.cache.iter()
    }
}

impl<K: Hash + Eq, T> std::default::Default for Cache<K, T> {
    fn default() -> Self {
        Cache {
            cache: HashMap::new(),
        }
    }
}
