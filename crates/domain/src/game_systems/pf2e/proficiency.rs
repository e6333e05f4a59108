//! Proficiency bonuses and level-gated rank ceilings.

use serde::{Deserialize, Serialize};

use crate::entities::Proficiencies;
use crate::reference::{ClassEntry, TrackCeiling};
use crate::value_objects::{ProficiencyRank, ProficiencyTrack};

/// Per-rank bonuses for the proficiency-without-level variant rule.
///
/// The table is campaign configuration; the default keeps the plain rank
/// bonuses and simply drops level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProficiencyWithoutLevel {
    pub untrained: i32,
    pub trained: i32,
    pub expert: i32,
    pub master: i32,
    pub legendary: i32,
}

impl Default for ProficiencyWithoutLevel {
    fn default() -> Self {
        Self {
            untrained: 0,
            trained: 2,
            expert: 4,
            master: 6,
            legendary: 8,
        }
    }
}

impl ProficiencyWithoutLevel {
    fn baseline(&self, rank: ProficiencyRank) -> i32 {
        match rank {
            ProficiencyRank::Untrained => self.untrained,
            ProficiencyRank::Trained => self.trained,
            ProficiencyRank::Expert => self.expert,
            ProficiencyRank::Master => self.master,
            ProficiencyRank::Legendary => self.legendary,
        }
    }
}

/// Converts rank and level into a numeric bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProficiencyEngine {
    without_level: Option<ProficiencyWithoutLevel>,
}

impl ProficiencyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine using the proficiency-without-level variant.
    pub fn without_level(table: ProficiencyWithoutLevel) -> Self {
        Self {
            without_level: Some(table),
        }
    }

    pub fn is_without_level(&self) -> bool {
        self.without_level.is_some()
    }

    /// `0` if untrained, else `tier * 2 + level` (or the variant baseline).
    pub fn bonus(&self, rank: ProficiencyRank, level: u8) -> i32 {
        if let Some(table) = &self.without_level {
            return table.baseline(rank);
        }
        match rank {
            ProficiencyRank::Untrained => 0,
            _ => rank.rank_bonus() + i32::from(level),
        }
    }

    /// Highest rank the standard ceilings allow at `level`.
    pub fn max_rank(level: u8) -> ProficiencyRank {
        Self::max_rank_for(&TrackCeiling::default(), level)
    }

    /// Highest rank a specific track allows at `level`.
    pub fn max_rank_for(ceiling: &TrackCeiling, level: u8) -> ProficiencyRank {
        let unlocked = if level >= ceiling.legendary_at {
            ProficiencyRank::Legendary
        } else if level >= ceiling.master_at {
            ProficiencyRank::Master
        } else {
            ProficiencyRank::Expert
        };
        match ceiling.cap {
            Some(cap) => unlocked.min(cap),
            None => unlocked,
        }
    }

    /// Lower every rank that exceeds its track's ceiling at `level`.
    pub fn clamp_proficiencies(
        proficiencies: &mut Proficiencies,
        level: u8,
        class: Option<&ClassEntry>,
    ) {
        let ceiling = |track: ProficiencyTrack| {
            let ceiling = class
                .and_then(|c| c.track_ceilings.get(&track).copied())
                .unwrap_or_default();
            Self::max_rank_for(&ceiling, level)
        };

        let skill_max = ceiling(ProficiencyTrack::Skill);
        for rank in proficiencies.skills.values_mut() {
            *rank = (*rank).min(skill_max);
        }
        let save_max = ceiling(ProficiencyTrack::Save);
        for rank in proficiencies.saves.values_mut() {
            *rank = (*rank).min(save_max);
        }
        let armor_max = ceiling(ProficiencyTrack::Armor);
        for rank in proficiencies.armor.values_mut() {
            *rank = (*rank).min(armor_max);
        }
        let weapon_max = ceiling(ProficiencyTrack::Weapon);
        for rank in proficiencies.weapons.values_mut() {
            *rank = (*rank).min(weapon_max);
        }
        proficiencies.perception = proficiencies
            .perception
            .min(ceiling(ProficiencyTrack::Perception));
        proficiencies.spellcasting = proficiencies
            .spellcasting
            .min(ceiling(ProficiencyTrack::Spell));
        proficiencies.class_dc = proficiencies
            .class_dc
            .min(ceiling(ProficiencyTrack::ClassDc));
    }
}
