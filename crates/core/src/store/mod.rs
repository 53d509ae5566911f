//! In-process entity storage.
//!
//! A thin wrapper over `DashMap` used by the CRUD services. There is no
//! persistence and no transaction support: the last write wins.

use std::hash::Hash;

use dashmap::DashMap;

/// Concurrent in-memory map of entities keyed by id.
#[derive(Debug)]
pub struct MemoryStore<K, V>
where
    K: Eq + Hash,
{
    items: DashMap<K, V>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Inserts or replaces an entity. Returns the previous value.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.items.insert(key, value)
    }

    /// Returns a copy of the entity.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        self.items.get(key).map(|entry| entry.value().clone())
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.items.contains_key(key)
    }

    /// Mutates an entity in place under its shard lock.
    ///
    /// Returns `None` if the key is absent, otherwise the closure's result.
    /// The closure must not touch the same store.
    pub fn update<R>(&self, key: &K, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        self.items.get_mut(key).map(|mut entry| f(entry.value_mut()))
    }

    /// Removes an entity, returning it.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.items.remove(key).map(|(_, value)| value)
    }

    /// Copies of all entities, in no particular order.
    #[must_use]
    pub fn values(&self) -> Vec<V> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Copies of the entities matching `predicate`.
    #[must_use]
    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Vec<V> {
        self.items
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns true if any entity matches `predicate`.
    #[must_use]
    pub fn any(&self, predicate: impl Fn(&V) -> bool) -> bool {
        self.items.iter().any(|entry| predicate(entry.value()))
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_remove() {
        let store: MemoryStore<u32, String> = MemoryStore::new();
        assert!(store.is_empty());

        assert!(store.insert(1, "a".to_string()).is_none());
        assert_eq!(store.insert(1, "b".to_string()), Some("a".to_string()));
        assert_eq!(store.get(&1), Some("b".to_string()));
        assert!(store.contains(&1));
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(&1), Some("b".to_string()));
        assert!(store.get(&1).is_none());
        assert!(store.remove(&1).is_none());
    }

    #[test]
    fn test_update_in_place() {
        let store: MemoryStore<u32, Vec<u8>> = MemoryStore::new();
        store.insert(7, vec![1]);

        let len = store.update(&7, |v| {
            v.push(2);
            v.len()
        });
        assert_eq!(len, Some(2));
        assert_eq!(store.get(&7), Some(vec![1, 2]));
        assert!(store.update(&8, |v| v.len()).is_none());
    }

    #[test]
    fn test_filter_and_any() {
        let store: MemoryStore<u32, u32> = MemoryStore::new();
        for i in 0..10 {
            store.insert(i, i * 10);
        }

        let mut big = store.filter(|v| *v >= 50);
        big.sort_unstable();
        assert_eq!(big, vec![50, 60, 70, 80, 90]);
        assert!(store.any(|v| *v == 30));
        assert!(!store.any(|v| *v == 35));
        assert_eq!(store.values().len(), 10);
    }

    #[test]
    fn test_concurrent_inserts() {
        let store: std::sync::Arc<MemoryStore<u32, u32>> = std::sync::Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        store.insert(t * 100 + i, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 400);
    }
}
