//! Derived views written by the recalculator.
//!
//! Nothing here is an input: every field is overwritten on each
//! recalculation, so hand edits to `derived` never survive.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Ability, ModifierSet, SaveKind, Skill};

/// Bulk load and thresholds, in whole bulk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceSummary {
    pub max_bulk: i32,
    pub encumbered_threshold: i32,
    pub raw_bulk: i32,
    pub container_reduction: i32,
    pub current_bulk: i32,
    pub encumbered: bool,
    pub overloaded: bool,
}

/// One attack line for a wielded weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strike {
    /// Equipment instance id
    pub item_id: String,
    pub name: String,
    pub attack_bonus: i32,
    pub damage_dice: u8,
    pub damage_die: u8,
    pub damage_bonus: i32,
}

/// The shield as the sheet displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldStatus {
    pub item_id: String,
    pub current_hp: u32,
    pub max_hp: u32,
    pub hardness: u32,
    pub broken_threshold: u32,
    pub broken: bool,
    pub destroyed: bool,
    pub raised: bool,
    /// AC currently granted (0 unless raised and intact)
    pub ac_bonus: i32,
}

/// Every number the sheet displays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DerivedStats {
    pub ability_modifiers: BTreeMap<Ability, i32>,
    pub armor_class: i32,
    pub saves: BTreeMap<SaveKind, i32>,
    pub perception: i32,
    pub skills: BTreeMap<Skill, i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_dc: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spell_attack: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_dc: Option<i32>,
    pub max_hp: i32,
    pub speed: i32,
    pub encumbrance: EncumbranceSummary,
    pub strikes: Vec<Strike>,
    pub modifiers: ModifierSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shield: Option<ShieldStatus>,
}
