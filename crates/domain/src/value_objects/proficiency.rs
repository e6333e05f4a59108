//! Proficiency ranks and the tracks they apply to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Ability;
use crate::DomainError;

/// Proficiency ranks, ordered from untrained to legendary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyRank {
    /// Not trained
    #[default]
    Untrained,
    /// Basic training (+2 + level)
    Trained,
    /// Advanced training (+4 + level)
    Expert,
    /// Mastery (+6 + level)
    Master,
    /// Ultimate mastery (+8 + level)
    Legendary,
}

impl ProficiencyRank {
    /// Numeric tier, 0 (untrained) through 4 (legendary).
    pub fn tier(&self) -> u8 {
        match self {
            ProficiencyRank::Untrained => 0,
            ProficiencyRank::Trained => 1,
            ProficiencyRank::Expert => 2,
            ProficiencyRank::Master => 3,
            ProficiencyRank::Legendary => 4,
        }
    }

    /// The rank bonus before level is added.
    pub fn rank_bonus(&self) -> i32 {
        i32::from(self.tier()) * 2
    }

    pub fn from_tier(tier: u8) -> Self {
        match tier {
            0 => ProficiencyRank::Untrained,
            1 => ProficiencyRank::Trained,
            2 => ProficiencyRank::Expert,
            3 => ProficiencyRank::Master,
            _ => ProficiencyRank::Legendary,
        }
    }

    pub fn is_trained(&self) -> bool {
        *self != ProficiencyRank::Untrained
    }
}

impl fmt::Display for ProficiencyRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProficiencyRank::Untrained => "untrained",
            ProficiencyRank::Trained => "trained",
            ProficiencyRank::Expert => "expert",
            ProficiencyRank::Master => "master",
            ProficiencyRank::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

impl FromStr for ProficiencyRank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "untrained" => Ok(ProficiencyRank::Untrained),
            "trained" => Ok(ProficiencyRank::Trained),
            "expert" => Ok(ProficiencyRank::Expert),
            "master" => Ok(ProficiencyRank::Master),
            "legendary" => Ok(ProficiencyRank::Legendary),
            other => Err(DomainError::parse(format!(
                "Unknown proficiency rank: {}",
                other
            ))),
        }
    }
}

/// The 17 standard skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Acrobatics,
    Arcana,
    Athletics,
    Crafting,
    Deception,
    Diplomacy,
    Intimidation,
    Lore,
    Medicine,
    Nature,
    Occultism,
    Performance,
    Religion,
    Society,
    Stealth,
    Survival,
    Thievery,
}

impl Skill {
    pub fn all() -> [Skill; 17] {
        [
            Skill::Acrobatics,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Crafting,
            Skill::Deception,
            Skill::Diplomacy,
            Skill::Intimidation,
            Skill::Lore,
            Skill::Medicine,
            Skill::Nature,
            Skill::Occultism,
            Skill::Performance,
            Skill::Religion,
            Skill::Society,
            Skill::Stealth,
            Skill::Survival,
            Skill::Thievery,
        ]
    }

    /// The ability score a skill keys off.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Acrobatics | Skill::Stealth | Skill::Thievery => Ability::Dexterity,
            Skill::Arcana | Skill::Crafting | Skill::Lore | Skill::Occultism | Skill::Society => {
                Ability::Intelligence
            }
            Skill::Athletics => Ability::Strength,
            Skill::Deception | Skill::Diplomacy | Skill::Intimidation | Skill::Performance => {
                Ability::Charisma
            }
            Skill::Medicine | Skill::Nature | Skill::Religion | Skill::Survival => Ability::Wisdom,
        }
    }
}

/// The three saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveKind {
    Fortitude,
    Reflex,
    Will,
}

impl SaveKind {
    pub fn all() -> [SaveKind; 3] {
        [SaveKind::Fortitude, SaveKind::Reflex, SaveKind::Will]
    }

    pub fn id(&self) -> &'static str {
        match self {
            SaveKind::Fortitude => "fortitude",
            SaveKind::Reflex => "reflex",
            SaveKind::Will => "will",
        }
    }

    /// The ability linked to this save.
    pub fn ability(&self) -> Ability {
        match self {
            SaveKind::Fortitude => Ability::Constitution,
            SaveKind::Reflex => Ability::Dexterity,
            SaveKind::Will => Ability::Wisdom,
        }
    }
}

impl FromStr for SaveKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fortitude" | "fort" => Ok(SaveKind::Fortitude),
            "reflex" | "ref" => Ok(SaveKind::Reflex),
            "will" => Ok(SaveKind::Will),
            other => Err(DomainError::parse(format!("Unknown save: {}", other))),
        }
    }
}

/// Armor proficiency categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ArmorCategory {
    #[default]
    Unarmored,
    Light,
    Medium,
    Heavy,
}

/// Weapon proficiency categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WeaponCategory {
    Unarmed,
    #[default]
    Simple,
    Martial,
    Advanced,
}

/// Every kind of thing a character can be proficient in.
///
/// Used as the key for track ceilings supplied by class reference data, so it
/// serializes to a flat string such as `skill`, `save`, `armor` or `weapon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProficiencyTrack {
    Skill,
    Save,
    Perception,
    Armor,
    Weapon,
    Spell,
    ClassDc,
}
