//! The character's proficiency ranks across every track.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ArmorCategory, ProficiencyRank, SaveKind, Skill, WeaponCategory};

/// Ranks per track. Anything not listed is untrained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proficiencies {
    #[serde(default)]
    pub skills: BTreeMap<Skill, ProficiencyRank>,
    #[serde(default)]
    pub saves: BTreeMap<SaveKind, ProficiencyRank>,
    #[serde(default)]
    pub perception: ProficiencyRank,
    #[serde(default)]
    pub armor: BTreeMap<ArmorCategory, ProficiencyRank>,
    #[serde(default)]
    pub weapons: BTreeMap<WeaponCategory, ProficiencyRank>,
    #[serde(default)]
    pub spellcasting: ProficiencyRank,
    #[serde(default)]
    pub class_dc: ProficiencyRank,
}

impl Proficiencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skill(&self, skill: Skill) -> ProficiencyRank {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    pub fn save(&self, kind: SaveKind) -> ProficiencyRank {
        self.saves.get(&kind).copied().unwrap_or_default()
    }

    pub fn armor(&self, category: ArmorCategory) -> ProficiencyRank {
        self.armor.get(&category).copied().unwrap_or_default()
    }

    pub fn weapon(&self, category: WeaponCategory) -> ProficiencyRank {
        self.weapons.get(&category).copied().unwrap_or_default()
    }

    pub fn with_skill(mut self, skill: Skill, rank: ProficiencyRank) -> Self {
        self.skills.insert(skill, rank);
        self
    }

    pub fn with_save(mut self, kind: SaveKind, rank: ProficiencyRank) -> Self {
        self.saves.insert(kind, rank);
        self
    }

    pub fn with_armor(mut self, category: ArmorCategory, rank: ProficiencyRank) -> Self {
        self.armor.insert(category, rank);
        self
    }

    pub fn with_weapon(mut self, category: WeaponCategory, rank: ProficiencyRank) -> Self {
        self.weapons.insert(category, rank);
        self
    }

    pub fn with_perception(mut self, rank: ProficiencyRank) -> Self {
        self.perception = rank;
        self
    }

    pub fn with_spellcasting(mut self, rank: ProficiencyRank) -> Self {
        self.spellcasting = rank;
        self
    }
}
