//! Hit points, custom resources and rest timers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current, maximum and temporary hit points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitPoints {
    #[serde(default)]
    pub current: i32,
    /// Derived; rewritten on every recalculation
    #[serde(default)]
    pub max: i32,
    #[serde(default)]
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(current: i32, max: i32) -> Self {
        Self {
            current,
            max,
            temporary: 0,
        }
    }

    /// Clamp current into `[0, max]` and temporary to non-negative.
    pub fn clamp(&mut self) {
        self.max = self.max.max(0);
        self.current = self.current.clamp(0, self.max);
        self.temporary = self.temporary.max(0);
    }

    /// Heal up to max, returning the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.current = (self.current + amount.max(0)).min(self.max);
        self.current - before
    }
}

/// How often a custom resource refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFrequency {
    Daily,
    /// Anything else; the engine never refills these
    #[default]
    #[serde(other)]
    Other,
}

/// A named counter such as hero points or a once-per-day ability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomResource {
    pub id: String,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub max: u32,
    #[serde(default)]
    pub frequency: ResourceFrequency,
}

impl CustomResource {
    pub fn new(id: impl Into<String>, max: u32, frequency: ResourceFrequency) -> Self {
        Self {
            id: id.into(),
            current: max,
            max,
            frequency,
        }
    }

    pub fn clamp(&mut self) {
        self.current = self.current.min(self.max);
    }

    /// Spend up to `amount`, returning what was actually spent.
    pub fn spend(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.current);
        self.current -= spent;
        spent
    }
}

/// Timestamps of the last successful short-rest activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestTimers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_treat_wounds: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_refocus: Option<DateTime<Utc>>,
}
