use std::hash::Hash;

use super::cache::Cache;
use super::storage::Storage;
use super::Handle;

/// Result of a successful load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Load<V> {
    Created(V),
    /// The source was missing or unusable. The key is bound to the fallback entry for good.
    Fallback,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub hits: usize,
    pub misses: usize,
    pub fallbacks: usize,
}

/// Memoizing store: one entry per distinct key, created on first request.
///
/// Entries are never removed. There is no locking in here, callers that share a cache between
/// threads have to serialize access to it.
pub struct ResourceCache<K, V>
where
    K: Hash + Eq,
{
    cache: Cache<K, V>,
    storage: Storage<V>,
    fallback: Handle<V>,
    stats: Stats,
}

impl<K, V> ResourceCache<K, V>
where
    K: Hash + Eq,
{
    /// `fallback` is stored right away and handed out for every key that fails to load.
    pub fn new(fallback: V) -> Self {
        let mut storage = Storage::new();
        let fallback = storage.add(fallback);
        Self {
            cache: Cache::new(),
            storage,
            fallback,
            stats: Stats::default(),
        }
    }

    pub fn fallback(&self) -> Handle<V> {
        self.fallback
    }

    /// Return the entry for `key`, calling `create` only if there is none yet.
    ///
    /// An `Err` from `create` is returned as is and nothing is cached, the next request for the
    /// same key calls `create` again.
    pub fn get_or_create<Create, Error>(&mut self, key: K, create: Create) -> Result<Handle<V>, Error>
    where
        Create: FnOnce(&K) -> Result<Load<V>, Error>,
    {
        if let Some(h) = self.lookup(&key) {
            return Ok(h);
        }

        let loaded = create(&key)?;
        Ok(self.insert(key, loaded))
    }

    /// First half of [`Self::get_or_create`] for callers that need to construct the value
    /// themselves, e.g. because construction needs mutable access to other caches.
    pub fn lookup(&mut self, key: &K) -> Option<Handle<V>> {
        let h = self.cache.get(key)?;
        self.stats.hits += 1;
        Some(h)
    }

    /// Second half of [`Self::get_or_create`]. `key` must not be present.
    pub fn insert(&mut self, key: K, loaded: Load<V>) -> Handle<V> {
        assert!(
            !self.cache.contains(&key),
            "ResourceCache: key inserted twice"
        );
        self.stats.misses += 1;
        let h = match loaded {
            Load::Created(v) => self.storage.add(v),
            Load::Fallback => {
                self.stats.fallbacks += 1;
                self.fallback
            }
        };
        self.cache.insert(key, h);
        h
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    pub fn get(&self, h: &Handle<V>) -> Option<&V> {
        self.storage.get(h)
    }

    pub fn owns(&self, h: &Handle<V>) -> bool {
        self.storage.owns(h)
    }

    /// Number of keys, including the ones bound to the fallback.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of stored values, the fallback included.
    pub fn n_values(&self) -> usize {
        self.storage.len()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let storage = &self.storage;
        self.cache.iter().filter_map(move |(k, h)| storage.get(h).map(|v| (k, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    fn counting<'a>(
        calls: &'a Cell<usize>,
        v: u32,
    ) -> impl FnOnce(&String) -> Result<Load<u32>, ()> + 'a {
        move |_: &String| {
            calls.set(calls.get() + 1);
            Ok(Load::Created(v))
        }
    }

    #[test]
    fn create_once() {
        let mut c = ResourceCache::<String, u32>::new(0);
        let calls = Cell::new(0);

        let a = c.get_or_create("a".to_string(), counting(&calls, 1)).unwrap();
        let b = c.get_or_create("a".to_string(), counting(&calls, 2)).unwrap();

        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
        assert_eq!(c.get(&a).copied(), Some(1));
        assert_eq!(
            c.stats(),
            Stats {
                hits: 1,
                misses: 1,
                fallbacks: 0
            }
        );
    }

    #[test]
    fn distinct_keys_distinct_entries() {
        let mut c = ResourceCache::<String, u32>::new(0);
        let calls = Cell::new(0);

        let a = c.get_or_create("a".to_string(), counting(&calls, 1)).unwrap();
        let b = c.get_or_create("b".to_string(), counting(&calls, 1)).unwrap();

        assert_ne!(a, b);
        assert_eq!(calls.get(), 2);
        assert_eq!(c.len(), 2);
        // Two entries plus the fallback.
        assert_eq!(c.n_values(), 3);
    }

    #[test]
    fn fallback_is_sticky() {
        let mut c = ResourceCache::<String, u32>::new(99);
        let calls = Cell::new(0);

        let missing = c
            .get_or_create("missing".to_string(), |_| {
                calls.set(calls.get() + 1);
                Ok::<_, ()>(Load::Fallback)
            })
            .unwrap();
        assert_eq!(missing, c.fallback());
        assert_eq!(c.get(&missing).copied(), Some(99));

        let again = c
            .get_or_create("missing".to_string(), counting(&calls, 5))
            .unwrap();
        assert_eq!(again, c.fallback());
        assert_eq!(calls.get(), 1);
        assert_eq!(c.stats().fallbacks, 1);
        assert_eq!(c.n_values(), 1);
    }

    #[test]
    fn error_is_not_cached() {
        let mut c = ResourceCache::<String, u32>::new(0);
        let calls = Cell::new(0);

        let r = c.get_or_create("a".to_string(), |_| {
            calls.set(calls.get() + 1);
            Err("device lost")
        });
        assert_eq!(r, Err("device lost"));
        assert!(!c.contains(&"a".to_string()));

        let h = c
            .get_or_create("a".to_string(), |_| {
                calls.set(calls.get() + 1);
                Ok::<_, &str>(Load::Created(3))
            })
            .unwrap();
        assert_eq!(c.get(&h).copied(), Some(3));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn split_lookup_insert() {
        let mut c = ResourceCache::<u8, &str>::new("fallback");
        assert!(c.lookup(&1).is_none());
        let h = c.insert(1, Load::Created("one"));
        assert_eq!(c.lookup(&1), Some(h));
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(&1, &"one")]);
    }

    #[test]
    #[should_panic]
    fn double_insert_panics() {
        let mut c = ResourceCache::<u8, u8>::new(0);
        c.insert(1, Load::Created(1));
        c.insert(1, Load::Created(2));
    }
}
