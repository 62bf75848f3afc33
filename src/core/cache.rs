use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of "now" for expiry decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key/value cache whose entries expire `ttl` after insertion.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    // Serializes loads so concurrent misses fetch once.
    loading: tokio::sync::Mutex<()>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            loading: tokio::sync::Mutex::new(()),
            ttl,
            clock,
        }
    }

    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let inserted_at = self.clock.now();
        self.lock().insert(key, Entry { value, inserted_at });
    }

    /// Cached value for `key`, or the result of `load` once it succeeds.
    /// Callers that miss at the same time wait for the first load instead of
    /// starting their own. Failed loads are not cached.
    pub async fn get_or_try_load<F, Fut>(&self, key: K, load: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }

        let _loading = self.loading.lock().await;
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = load().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned map only means another thread panicked mid-insert; the data is still usable.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, Entry<V>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
pub mod fake {
    use super::Clock;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    pub struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }
}
