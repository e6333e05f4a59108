//! Read-only rule tables, keyed by stable string ids.
//!
//! Loaded once by the host and passed by reference into every calculation.
//! Lookups return `Option`; a character referencing an id that is not here
//! simply contributes nothing to the derived views.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Ability, ArmorCategory, ProficiencyTrack, WeaponCategory};

fn default_speed() -> i32 {
    25
}

fn default_free_boosts() -> u8 {
    2
}

fn default_shield_bonus() -> i32 {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestryEntry {
    pub name: String,
    pub hp: i32,
    #[serde(default = "default_speed")]
    pub speed: i32,
    /// Fixed boosts granted by the ancestry
    #[serde(default)]
    pub boosts: Vec<Ability>,
    #[serde(default)]
    pub flaws: Vec<Ability>,
    /// How many ledger free boosts this ancestry grants
    #[serde(default = "default_free_boosts")]
    pub free_boosts: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageEntry {
    pub name: String,
    #[serde(default)]
    pub ancestry_id: Option<String>,
    #[serde(default)]
    pub bonus_hp: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundEntry {
    pub name: String,
    /// The two abilities the background-choice boost picks from
    #[serde(default)]
    pub boost_options: Vec<Ability>,
}

/// Levels at which a track unlocks master and legendary, plus an optional
/// hard cap (e.g. a class that never exceeds expert in heavy armor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackCeiling {
    pub master_at: u8,
    pub legendary_at: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<crate::value_objects::ProficiencyRank>,
}

impl Default for TrackCeiling {
    fn default() -> Self {
        Self {
            master_at: 7,
            legendary_at: 15,
            cap: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub name: String,
    /// Hit points gained per level, before Constitution
    pub hp_per_level: i32,
    #[serde(default)]
    pub key_ability_options: Vec<Ability>,
    #[serde(default)]
    pub spellcasting_ability: Option<Ability>,
    #[serde(default)]
    pub track_ceilings: BTreeMap<ProficiencyTrack, TrackCeiling>,
    /// Character level to (spell rank to slot count)
    #[serde(default)]
    pub spell_slots: BTreeMap<u8, BTreeMap<u8, u32>>,
}

impl ClassEntry {
    /// Slot maxima at a given level: the highest progression row at or below it.
    pub fn slots_at(&self, level: u8) -> Option<&BTreeMap<u8, u32>> {
        self.spell_slots.range(..=level).next_back().map(|(_, row)| row)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatEntry {
    pub name: String,
    #[serde(default)]
    pub bonus_hp_per_level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellEntry {
    pub name: String,
    #[serde(default)]
    pub rank: u8,
    #[serde(default)]
    pub cantrip: bool,
    #[serde(default)]
    pub focus: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponEntry {
    pub name: String,
    #[serde(default)]
    pub category: WeaponCategory,
    pub damage_die: u8,
    #[serde(default)]
    pub finesse: bool,
    #[serde(default)]
    pub ranged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmorEntry {
    pub name: String,
    #[serde(default)]
    pub category: ArmorCategory,
    #[serde(default)]
    pub ac_bonus: i32,
    /// Absent means no cap
    #[serde(default)]
    pub dex_cap: Option<i32>,
    /// Strength score that removes the check and speed penalties
    #[serde(default)]
    pub strength: Option<i32>,
    /// Non-positive
    #[serde(default)]
    pub check_penalty: i32,
    /// Non-positive, in feet
    #[serde(default)]
    pub speed_penalty: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldEntry {
    pub name: String,
    #[serde(default = "default_shield_bonus")]
    pub ac_bonus: i32,
    #[serde(default)]
    pub hardness: u32,
    pub max_hp: u32,
}

/// All reference tables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceTables {
    #[serde(default)]
    pub ancestries: BTreeMap<String, AncestryEntry>,
    #[serde(default)]
    pub heritages: BTreeMap<String, HeritageEntry>,
    #[serde(default)]
    pub backgrounds: BTreeMap<String, BackgroundEntry>,
    #[serde(default)]
    pub classes: BTreeMap<String, ClassEntry>,
    #[serde(default)]
    pub feats: BTreeMap<String, FeatEntry>,
    #[serde(default)]
    pub spells: BTreeMap<String, SpellEntry>,
    #[serde(default)]
    pub weapons: BTreeMap<String, WeaponEntry>,
    #[serde(default)]
    pub armor: BTreeMap<String, ArmorEntry>,
    #[serde(default)]
    pub shields: BTreeMap<String, ShieldEntry>,
}

fn lookup<'a, T>(table: &'a BTreeMap<String, T>, id: Option<&str>) -> Option<&'a T> {
    id.and_then(|id| table.get(id))
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ancestry(&self, id: Option<&str>) -> Option<&AncestryEntry> {
        lookup(&self.ancestries, id)
    }

    pub fn heritage(&self, id: Option<&str>) -> Option<&HeritageEntry> {
        lookup(&self.heritages, id)
    }

    pub fn background(&self, id: Option<&str>) -> Option<&BackgroundEntry> {
        lookup(&self.backgrounds, id)
    }

    pub fn class(&self, id: Option<&str>) -> Option<&ClassEntry> {
        lookup(&self.classes, id)
    }

    pub fn feat(&self, id: &str) -> Option<&FeatEntry> {
        self.feats.get(id)
    }

    pub fn spell(&self, id: &str) -> Option<&SpellEntry> {
        self.spells.get(id)
    }

    pub fn weapon(&self, id: Option<&str>) -> Option<&WeaponEntry> {
        lookup(&self.weapons, id)
    }

    pub fn armor(&self, id: Option<&str>) -> Option<&ArmorEntry> {
        lookup(&self.armor, id)
    }

    pub fn shield(&self, id: Option<&str>) -> Option<&ShieldEntry> {
        lookup(&self.shields, id)
    }
}
