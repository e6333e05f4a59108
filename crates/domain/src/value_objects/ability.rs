//! Ability scores and modifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "str")]
    Strength,
    #[serde(rename = "dex")]
    Dexterity,
    #[serde(rename = "con")]
    Constitution,
    #[serde(rename = "int")]
    Intelligence,
    #[serde(rename = "wis")]
    Wisdom,
    #[serde(rename = "cha")]
    Charisma,
}

impl Ability {
    /// Returns all abilities in sheet order.
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }

    /// Short lowercase id used in snapshots and modifier targets.
    pub fn id(&self) -> &'static str {
        match self {
            Ability::Strength => "str",
            Ability::Dexterity => "dex",
            Ability::Constitution => "con",
            Ability::Intelligence => "int",
            Ability::Wisdom => "wis",
            Ability::Charisma => "cha",
        }
    }

    /// Whether this is one of the three mental abilities.
    pub fn is_mental(&self) -> bool {
        matches!(
            self,
            Ability::Intelligence | Ability::Wisdom | Ability::Charisma
        )
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            other => Err(DomainError::parse(format!("Unknown ability: {}", other))),
        }
    }
}

/// Floor division modifier: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Six ability scores, each at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScoreSet {
    #[serde(rename = "str")]
    strength: i32,
    #[serde(rename = "dex")]
    dexterity: i32,
    #[serde(rename = "con")]
    constitution: i32,
    #[serde(rename = "int")]
    intelligence: i32,
    #[serde(rename = "wis")]
    wisdom: i32,
    #[serde(rename = "cha")]
    charisma: i32,
}

impl Default for AbilityScoreSet {
    fn default() -> Self {
        Self::baseline()
    }
}

impl AbilityScoreSet {
    /// Minimum legal score.
    pub const MIN_SCORE: i32 = 1;
    /// Every score starts here before boosts and flaws.
    pub const BASE_SCORE: i32 = 10;

    /// All six scores at 10.
    pub fn baseline() -> Self {
        Self {
            strength: Self::BASE_SCORE,
            dexterity: Self::BASE_SCORE,
            constitution: Self::BASE_SCORE,
            intelligence: Self::BASE_SCORE,
            wisdom: Self::BASE_SCORE,
            charisma: Self::BASE_SCORE,
        }
    }

    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }

    /// Set a score, clamping to the legal minimum.
    pub fn set(&mut self, ability: Ability, score: i32) {
        let score = score.max(Self::MIN_SCORE);
        match ability {
            Ability::Strength => self.strength = score,
            Ability::Dexterity => self.dexterity = score,
            Ability::Constitution => self.constitution = score,
            Ability::Intelligence => self.intelligence = score,
            Ability::Wisdom => self.wisdom = score,
            Ability::Charisma => self.charisma = score,
        }
    }

    pub fn with_score(mut self, ability: Ability, score: i32) -> Self {
        self.set(ability, score);
        self
    }
}
