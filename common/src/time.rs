// Time types and the clock abstraction used by the runtime
//
// Programs never read the system time directly: the runtime samples its
// Clock once per transaction and every instruction of that transaction sees
// the same unix timestamp. Tests inject a ManualClock to drive cooldowns.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Seconds timestamps used to determine it using its type
pub type UnixTimestamp = i64;

#[inline]
pub fn get_current_time() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

// Return timestamp in seconds
pub fn get_current_time_in_seconds() -> UnixTimestamp {
    get_current_time().as_secs() as UnixTimestamp
}

/// Source of the unix timestamp observed by programs
pub trait Clock: Send + Sync {
    fn unix_timestamp(&self) -> UnixTimestamp;
}

/// Wall-clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_timestamp(&self) -> UnixTimestamp {
        get_current_time_in_seconds()
    }
}

/// Manually driven clock, time only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: UnixTimestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn shared(start: UnixTimestamp) -> Arc<Self> {
        Arc::new(Self::new(start))
    }

    pub fn set(&self, timestamp: UnixTimestamp) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    // Returns the new timestamp
    pub fn advance(&self, seconds: i64) -> UnixTimestamp {
        self.now.fetch_add(seconds, Ordering::SeqCst) + seconds
    }
}

impl Clock for ManualClock {
    fn unix_timestamp(&self) -> UnixTimestamp {
        self.now.load(Ordering::SeqCst)
    }
}
