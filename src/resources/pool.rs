//! Template cache for geometry and material descriptors.
//!
//! The first request for a key runs the factory and stores the result as
//! the template; every request returns a clone. Consumers own their clone
//! and may dispose it freely; the template itself is never handed out.
//!
//! The pool is bounded: past `max_entries` the least recently used template
//! is evicted. Eviction only costs a factory call on the next miss since no
//! consumer references a template.

use rustc_hash::FxHashMap;

#[derive(Debug)]
struct Slot<T> {
    template: T,
    last_used: u64,
}

/// Hit / miss / eviction counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Requests served from an existing template.
    pub hits: u64,
    /// Requests that ran the factory.
    pub misses: u64,
    /// Templates dropped to respect the capacity.
    pub evictions: u64,
}

/// Keyed template cache with LRU eviction.
#[derive(Debug)]
pub struct ResourcePool<T: Clone> {
    slots: FxHashMap<String, Slot<T>>,
    /// 0 = unbounded.
    max_entries: usize,
    clock: u64,
    stats: PoolStats,
}

impl<T: Clone> ResourcePool<T> {
    /// Create a pool holding at most `max_entries` templates (0 =
    /// unbounded).
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            slots: FxHashMap::default(),
            max_entries,
            clock: 0,
            stats: PoolStats::default(),
        }
    }

    /// Return a clone of the template for `key`, building the template with
    /// `factory` on first use.
    pub fn acquire(&mut self, key: &str, factory: impl FnOnce() -> T) -> T {
        self.clock += 1;
        if let Some(slot) = self.slots.get_mut(key) {
            slot.last_used = self.clock;
            self.stats.hits += 1;
            return slot.template.clone();
        }

        log::debug!("resource pool miss: {key}");
        self.stats.misses += 1;
        if self.max_entries > 0 && self.slots.len() >= self.max_entries {
            self.evict_lru();
        }
        let template = factory();
        let instance = template.clone();
        let _ = self.slots.insert(
            key.to_owned(),
            Slot {
                template,
                last_used: self.clock,
            },
        );
        instance
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            let _ = self.slots.remove(&key);
            self.stats.evictions += 1;
        }
    }

    /// Whether a template exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Number of templates held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pool holds no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Hit / miss / eviction counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_runs_once_per_key() {
        let mut pool = ResourcePool::new(0);
        let mut calls = 0;
        for _ in 0..3 {
            let v: Vec<u8> = pool.acquire("a", || {
                calls += 1;
                vec![1, 2, 3]
            });
            assert_eq!(v, vec![1, 2, 3]);
        }
        assert_eq!(calls, 1);
        assert_eq!(pool.stats().hits, 2);
        assert_eq!(pool.stats().misses, 1);
    }

    #[test]
    fn clones_do_not_alias_the_template() {
        let mut pool = ResourcePool::new(0);
        let mut first: Vec<u8> = pool.acquire("a", || vec![1]);
        first.push(9);
        let second = pool.acquire("a", Vec::new);
        assert_eq!(second, vec![1]);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut pool = ResourcePool::new(2);
        let _ = pool.acquire("a", || 1);
        let _ = pool.acquire("b", || 2);
        // Touch "a" so "b" becomes the oldest.
        let _ = pool.acquire("a", || 0);
        let _ = pool.acquire("c", || 3);

        assert_eq!(pool.len(), 2);
        assert!(pool.contains("a"));
        assert!(!pool.contains("b"));
        assert!(pool.contains("c"));
        assert_eq!(pool.stats().evictions, 1);
    }

    #[test]
    fn unbounded_pool_keeps_everything() {
        let mut pool = ResourcePool::new(0);
        for i in 0..100 {
            let _ = pool.acquire(&format!("k{i}"), || i);
        }
        assert_eq!(pool.len(), 100);
        assert_eq!(pool.stats().evictions, 0);
    }
}
