use chrono::{DateTime, TimeDelta, Utc};
use std::{fmt::Debug, sync::Mutex};

/// Source of wall-clock time, injectable so scheduling can be tested deterministically.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fetch bookkeeping displayed in the status header.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScheduleState {
    pub started_at: DateTime<Utc>,
    /// Time of the last fully successful fetch cycle.
    pub last_fetch: Option<DateTime<Utc>>,
    /// Earliest time the next fetch cycle may run. `None` until the first cycle finishes.
    ///
    /// Only honoured once a cycle has succeeded.
    pub next_fetch: Option<DateTime<Utc>>,
    /// Total API credits consumed since start.
    pub credits_used: u64,
}

impl ScheduleState {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            last_fetch: None,
            next_fetch: None,
            credits_used: 0,
        }
    }

    /// A fetch is due until one cycle has succeeded, then whenever `now` reaches `next_fetch`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.last_fetch.is_none() || self.next_fetch.is_none_or(|next| now >= next)
    }

    /// Time left until the next fetch, clamped at zero.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeDelta {
        self.next_fetch
            .map(|next| next - now)
            .filter(|remaining| *remaining > TimeDelta::zero())
            .unwrap_or_else(TimeDelta::zero)
    }

    /// Average credit consumption per hour and per day since start.
    ///
    /// Less than one minute of uptime is treated as one minute so the rates stay finite.
    pub fn credit_rates(&self, now: DateTime<Utc>) -> (f64, f64) {
        let elapsed = (now - self.started_at).max(TimeDelta::minutes(1));
        let per_hour = self.credits_used as f64 * 3600.0 / elapsed.num_seconds() as f64;
        (per_hour, per_hour * 24.0)
    }

    pub(crate) fn charge(&mut self, credits: u32) {
        self.credits_used += u64::from(credits);
    }
}
