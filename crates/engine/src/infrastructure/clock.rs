//! Wall-clock sources for rest cooldowns.

use chrono::{DateTime, SubsecRound, Utc};

use crate::infrastructure::ports::ClockPort;

/// Real time, truncated to whole seconds so saved rest timers stay readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Manually advanced clock for tests that walk through cooldowns.
#[cfg(test)]
pub struct FixedClock(std::sync::Mutex<DateTime<Utc>>);

#[cfg(test)]
impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(std::sync::Mutex::new(at))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.0.lock().expect("clock lock");
        *now += chrono::Duration::minutes(minutes);
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}
