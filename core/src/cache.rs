//! Key-based query cache with staleness, in-flight deduplication, and
//! invalidation fan-out.
//!
//! # Design
//! Each key owns one slot: the last successful value, when it was fetched,
//! whether it has been invalidated since, and whether a fetch for it is
//! currently outstanding. Subscribers register interest in a key and are
//! called whenever an invalidation matches it; the cache never refetches on
//! its own. A consumer that is notified re-reads on its next render and the
//! stale slot makes that read go to the network.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Reads younger than this are served from the cache.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(30);

pub type Listener<K> = Box<dyn Fn(&K) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Slot<V> {
    value: Option<V>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    in_flight: bool,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            value: None,
            fetched_at: None,
            invalidated: false,
            in_flight: false,
        }
    }
}

pub struct QueryCache<K, V> {
    stale_time: Duration,
    slots: HashMap<K, Slot<V>>,
    subscribers: HashMap<SubscriptionId, (K, Listener<K>)>,
    next_subscription: u64,
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_STALE_TIME)
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            slots: HashMap::new(),
            subscribers: HashMap::new(),
            next_subscription: 0,
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// The cached value if it was fetched within the stale time and has not
    /// been invalidated since.
    pub fn fresh(&self, key: &K, now: Instant) -> Option<V> {
        let slot = self.slots.get(key)?;
        if slot.invalidated {
            return None;
        }
        let fetched_at = slot.fetched_at?;
        if now.saturating_duration_since(fetched_at) >= self.stale_time {
            return None;
        }
        slot.value.clone()
    }

    /// Marks a fetch for `key` as outstanding. Returns `false` when an
    /// identical fetch is already outstanding, in which case the caller must
    /// not issue another request.
    pub fn begin_fetch(&mut self, key: &K) -> bool {
        let slot = self.slots.entry(key.clone()).or_default();
        if slot.in_flight {
            return false;
        }
        slot.in_flight = true;
        true
    }

    pub fn complete_fetch(&mut self, key: &K, value: V, now: Instant) {
        let slot = self.slots.entry(key.clone()).or_default();
        slot.value = Some(value);
        slot.fetched_at = Some(now);
        slot.invalidated = false;
        slot.in_flight = false;
    }

    /// Clears the in-flight mark after a failed fetch. Any previous value is
    /// kept; errors are not cached.
    pub fn fail_fetch(&mut self, key: &K) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.in_flight = false;
        }
    }

    /// Marks every slot whose key satisfies `filter` as stale and notifies the
    /// subscribers of matching keys. Returns the keys of the slots that were
    /// marked.
    pub fn invalidate<F>(&mut self, filter: F) -> Vec<K>
    where
        F: Fn(&K) -> bool,
    {
        let mut marked = Vec::new();
        for (key, slot) in self.slots.iter_mut() {
            if filter(key) {
                slot.invalidated = true;
                marked.push(key.clone());
            }
        }
        for (key, listener) in self.subscribers.values() {
            if filter(key) {
                listener(key);
            }
        }
        marked
    }

    pub fn subscribe(&mut self, key: K, listener: Listener<K>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.insert(id, (key, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self, key: &K) -> usize {
        self.subscribers.values().filter(|(k, _)| k == key).count()
    }
}
