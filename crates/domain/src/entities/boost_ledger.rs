//! BoostLedger - every ability boost the player has chosen, grouped by source.
//!
//! Targets are kept as raw ability ids so hand-edited or stale snapshots still
//! load; ids that do not name an ability are skipped when scores are resolved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::Ability;

/// Where a boost comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostSource {
    AncestryFree,
    /// One of the background's two listed options
    BackgroundChoice,
    /// Any ability except the background's two options
    BackgroundFree,
    ClassKey,
    CreationFree,
    /// Milestone level (5, 10, 15 or 20)
    Level(u8),
}

impl BoostSource {
    /// Declared slot count for this source.
    pub fn capacity(&self) -> usize {
        match self {
            BoostSource::AncestryFree => 2,
            BoostSource::BackgroundChoice | BoostSource::BackgroundFree | BoostSource::ClassKey => 1,
            BoostSource::CreationFree | BoostSource::Level(_) => 4,
        }
    }
}

/// Levels that grant four free boosts.
pub const MILESTONE_LEVELS: [u8; 4] = [5, 10, 15, 20];

/// Ordered record of boost choices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostLedger {
    #[serde(default)]
    pub ancestry_free: Vec<String>,
    #[serde(default)]
    pub background_choice: Vec<String>,
    #[serde(default)]
    pub background_free: Vec<String>,
    #[serde(default)]
    pub class_key: Vec<String>,
    #[serde(default)]
    pub creation_free: Vec<String>,
    /// Milestone level to the boosts chosen at that level
    #[serde(default)]
    pub level_ups: BTreeMap<u8, Vec<String>>,
}

impl BoostLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots_mut(&mut self, source: BoostSource) -> &mut Vec<String> {
        match source {
            BoostSource::AncestryFree => &mut self.ancestry_free,
            BoostSource::BackgroundChoice => &mut self.background_choice,
            BoostSource::BackgroundFree => &mut self.background_free,
            BoostSource::ClassKey => &mut self.class_key,
            BoostSource::CreationFree => &mut self.creation_free,
            BoostSource::Level(level) => self.level_ups.entry(level).or_default(),
        }
    }

    /// Record a boost choice.
    ///
    /// Returns `false` (and changes nothing) when the ability id is unknown,
    /// the level is not a milestone, or the source already boosts that
    /// ability. A full source evicts its oldest entry.
    pub fn record(&mut self, source: BoostSource, ability_id: &str) -> bool {
        let Ok(ability) = ability_id.parse::<Ability>() else {
            return false;
        };
        if let BoostSource::Level(level) = source {
            if !MILESTONE_LEVELS.contains(&level) {
                return false;
            }
        }

        let capacity = source.capacity();
        let slots = self.slots_mut(source);
        if slots
            .iter()
            .any(|existing| existing.parse::<Ability>().ok() == Some(ability))
        {
            return false;
        }
        if slots.len() >= capacity {
            let overflow = slots.len() + 1 - capacity;
            slots.drain(..overflow);
        }
        slots.push(ability.id().to_string());
        true
    }

    /// Builder-style variant of [`record`](Self::record) for tests and fixtures.
    pub fn with(mut self, source: BoostSource, ability_id: &str) -> Self {
        self.record(source, ability_id);
        self
    }

    /// Drop level-up entries for non-milestone levels and trim every source
    /// to its capacity, keeping the newest entries.
    pub fn normalize(&mut self) {
        self.level_ups
            .retain(|level, _| MILESTONE_LEVELS.contains(level));
        let sources = [
            BoostSource::AncestryFree,
            BoostSource::BackgroundChoice,
            BoostSource::BackgroundFree,
            BoostSource::ClassKey,
            BoostSource::CreationFree,
        ]
        .into_iter()
        .chain(MILESTONE_LEVELS.into_iter().map(BoostSource::Level));
        for source in sources {
            let capacity = source.capacity();
            let slots = self.slots_mut(source);
            if slots.len() > capacity {
                let overflow = slots.len() - capacity;
                slots.drain(..overflow);
            }
        }
        self.level_ups.retain(|_, boosts| !boosts.is_empty());
    }
}

/// Parse a source's entries, skipping unknown ids and repeats.
pub fn parse_boosts(entries: &[String]) -> Vec<Ability> {
    let mut seen = Vec::new();
    for entry in entries {
        if let Ok(ability) = entry.parse::<Ability>() {
            if !seen.contains(&ability) {
                seen.push(ability);
            }
        }
    }
    seen
}
