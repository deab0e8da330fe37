use std::{collections::HashMap, future::Future, hash::Hash};

use parking_lot::Mutex;

use crate::error::AppResult;

/// List cache of one entity family.
///
/// Entries are keyed by the normalized query. Any successful mutation of the
/// family calls [`QueryCache::invalidate`], which drops every entry so the next
/// read goes back to the server. A fetch that started before an invalidation
/// does not repopulate the cache with its (possibly stale) result.
pub struct QueryCache<K, V> {
    inner: Mutex<Inner<K, V>>,
}

struct Inner<K, V> {
    entries: HashMap<K, V>,
    generation: u64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                generation: 0,
            }),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.get(key).cloned()
    }

    pub fn invalidate(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.generation += 1;
    }

    pub fn is_cached(&self, key: &K) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> AppResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        let generation = {
            let inner = self.inner.lock();
            if let Some(hit) = inner.entries.get(&key) {
                return Ok(hit.clone());
            }
            inner.generation
        };

        let value = fetch().await?;

        let mut inner = self.inner.lock();
        if inner.generation == generation {
            inner.entries.insert(key, value.clone());
        }
        Ok(value)
    }
}
