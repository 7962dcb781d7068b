//! Process-lifetime memo of free-tier results.
//!
//! Entries expire lazily: a read of an entry older than the TTL is a miss and
//! the caller recomputes and overwrites it. Nothing is ever evicted in the
//! background and there is no size bound; keys are normalized brand names.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use geoscout_core::GeoLiteResult;
use thiserror::Error;

/// Source of "now" for expiry checks and result dates.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("score cache lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: GeoLiteResult,
    stored_at: DateTime<Utc>,
}

pub struct ScoreCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ScoreCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Returns the stored result for `key` if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Result<Option<GeoLiteResult>, CacheError> {
        let now = self.clock.now();
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .filter(|entry| self.is_live(entry, now))
            .map(|entry| entry.data.clone()))
    }

    /// Stores `data` under `key`, replacing whatever was there.
    pub fn insert(&self, key: String, data: GeoLiteResult) -> Result<(), CacheError> {
        let stored_at = self.clock.now();
        self.lock()?.insert(key, CacheEntry { data, stored_at });
        Ok(())
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> Result<usize, CacheError> {
        Ok(self.lock()?.len())
    }

    fn is_live(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        // A negative age means the clock stepped backwards; keep the entry.
        now.signed_duration_since(entry.stored_at)
            .to_std()
            .map_or(true, |age| age < self.ttl)
    }

    #[cfg(test)]
    pub(crate) fn poison(&self) {
        std::thread::scope(|s| {
            let _ = s
                .spawn(|| {
                    let _guard = self.entries.lock();
                    panic!("poison the score cache lock");
                })
                .join();
        });
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, CacheError> {
        self.entries.lock().map_err(|_| CacheError::Poisoned)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::time::Duration;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::Clock;

    pub(crate) const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Clock that only moves when told to.
    pub(crate) struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Mutex::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()),
            }
        }

        pub(crate) fn advance(&self, by: TimeDelta) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }
}
