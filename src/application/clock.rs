//! Wall-clock access, injectable so windowing and expiry can be tested.

use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

use crate::cache::lock::mutex_lock;

const SOURCE: &str = "application::clock";

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = mutex_lock(&self.now, SOURCE, "advance");
        *now += by;
    }

    pub fn set(&self, value: OffsetDateTime) {
        *mutex_lock(&self.now, SOURCE, "set") = value;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *mutex_lock(&self.now, SOURCE, "now")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new(datetime!(2024-03-08 10:00 UTC));
        assert_eq!(clock.now(), datetime!(2024-03-08 10:00 UTC));

        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), datetime!(2024-03-08 12:00 UTC));

        clock.set(datetime!(2024-01-01 00:00 UTC));
        assert_eq!(clock.now(), datetime!(2024-01-01 00:00 UTC));
    }
}
