//! Character aggregate - the full sheet snapshot.
//!
//! The snapshot is the unit every operation consumes and returns. Fields are
//! public because the snapshot is also the JSON boundary with the host; all
//! rule enforcement happens in the pf2e calculators, which clamp and
//! normalise whatever they are handed.
//!
//! # Example
//!
//! ```
//! use pathsheet_domain::aggregates::Character;
//! use pathsheet_domain::CharacterId;
//!
//! let character = Character::new(CharacterId::new(), "Amiri");
//! assert_eq!(character.level, 1);
//! assert!(character.abilities().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::derived::DerivedStats;
use crate::entities::{
    ActiveCondition, BoostLedger, Buff, CustomResource, EquippedItem, HitPoints, Proficiencies,
    RestTimers, ShieldState, SpellcastingState,
};
use crate::value_objects::AbilityScoreSet;
use crate::{CharacterId, DomainError};

fn default_level() -> u8 {
    1
}

/// A player character.
///
/// # Invariants (after recalculation)
///
/// - `level` is within 1..=20
/// - `abilities` is present and every score is at least 1
/// - `hit_points.current` is within `[0, derived.max_hp]`
/// - at most one active condition per id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heritage_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,

    #[serde(default)]
    pub boosts: BoostLedger,
    /// Required; rebuilt from the boost ledger on every recalculation
    #[serde(default)]
    pub abilities: Option<AbilityScoreSet>,
    #[serde(default)]
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub hit_points: HitPoints,

    #[serde(default)]
    pub conditions: Vec<ActiveCondition>,
    #[serde(default)]
    pub buffs: Vec<Buff>,

    #[serde(default)]
    pub equipment: Vec<EquippedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shield: Option<ShieldState>,

    #[serde(default)]
    pub spellcasting: SpellcastingState,
    #[serde(default)]
    pub resources: Vec<CustomResource>,
    /// Feat ids; unknown ids are ignored by derived views
    #[serde(default)]
    pub feats: Vec<String>,

    #[serde(default)]
    pub rest: RestTimers,
    #[serde(default)]
    pub derived: DerivedStats,
}

impl Character {
    /// A level 1 character with baseline scores and nothing chosen yet.
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            level: 1,
            ancestry_id: None,
            heritage_id: None,
            background_id: None,
            class_id: None,
            boosts: BoostLedger::new(),
            abilities: Some(AbilityScoreSet::baseline()),
            proficiencies: Proficiencies::new(),
            hit_points: HitPoints::default(),
            conditions: Vec::new(),
            buffs: Vec::new(),
            equipment: Vec::new(),
            shield: None,
            spellcasting: SpellcastingState::new(),
            resources: Vec::new(),
            feats: Vec::new(),
            rest: RestTimers::default(),
            derived: DerivedStats::default(),
        }
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    pub fn with_ancestry(mut self, ancestry_id: impl Into<String>) -> Self {
        self.ancestry_id = Some(ancestry_id.into());
        self
    }

    pub fn with_heritage(mut self, heritage_id: impl Into<String>) -> Self {
        self.heritage_id = Some(heritage_id.into());
        self
    }

    pub fn with_background(mut self, background_id: impl Into<String>) -> Self {
        self.background_id = Some(background_id.into());
        self
    }

    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = Some(class_id.into());
        self
    }

    pub fn with_boosts(mut self, boosts: BoostLedger) -> Self {
        self.boosts = boosts;
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: Proficiencies) -> Self {
        self.proficiencies = proficiencies;
        self
    }

    pub fn with_item(mut self, item: EquippedItem) -> Self {
        self.equipment.push(item);
        self
    }

    pub fn with_condition(mut self, condition: ActiveCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_spellcasting(mut self, spellcasting: SpellcastingState) -> Self {
        self.spellcasting = spellcasting;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The ability-score object, or the one fatal snapshot error.
    pub fn abilities(&self) -> Result<&AbilityScoreSet, DomainError> {
        self.abilities
            .as_ref()
            .ok_or(DomainError::malformed("abilities"))
    }

    pub fn has_condition(&self, id: &str) -> bool {
        self.conditions.iter().any(|c| c.id() == id)
    }

    pub fn item(&self, instance_id: &str) -> Option<&EquippedItem> {
        self.equipment.iter().find(|item| item.id == instance_id)
    }
}
