//! Armor class, saving throws, perception and shield handling.

use crate::aggregates::ShieldStatus;
use crate::entities::{EquippedItem, Proficiencies, Runes, ShieldState};
use crate::events::{ShieldOutcome, ShieldRejection};
use crate::reference::{ArmorEntry, ReferenceTables, ShieldEntry};
use crate::value_objects::{
    Ability, AbilityScoreSet, ArmorCategory, ModifierSet, ModifierTarget, SaveKind,
};

use super::ProficiencyEngine;

/// Dex cap used when nothing caps Dexterity.
pub const UNCAPPED_DEX: i32 = 99;

/// How much the armor reduces speed by once its Strength is met.
const STRENGTH_SPEED_RELIEF: i32 = 5;

/// The worn armor as the calculators need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorProfile {
    pub category: ArmorCategory,
    pub ac_bonus: i32,
    pub dex_cap: i32,
    pub runes: Runes,
    /// Non-positive; 0 once the Strength requirement is met
    pub check_penalty: i32,
    /// Non-positive, in feet
    pub speed_penalty: i32,
}

impl Default for ArmorProfile {
    fn default() -> Self {
        Self::unarmored()
    }
}

impl ArmorProfile {
    pub fn unarmored() -> Self {
        Self {
            category: ArmorCategory::Unarmored,
            ac_bonus: 0,
            dex_cap: UNCAPPED_DEX,
            runes: Runes::default(),
            check_penalty: 0,
            speed_penalty: 0,
        }
    }

    /// Build from a reference entry and the wearer's Strength score.
    pub fn from_entry(entry: &ArmorEntry, runes: Runes, strength_score: i32) -> Self {
        let strength_met = entry.strength.is_some_and(|needed| strength_score >= needed);
        let (check_penalty, speed_penalty) = if strength_met {
            (0, (entry.speed_penalty + STRENGTH_SPEED_RELIEF).min(0))
        } else {
            (entry.check_penalty.min(0), entry.speed_penalty.min(0))
        };
        Self {
            category: entry.category,
            ac_bonus: entry.ac_bonus,
            dex_cap: entry.dex_cap.unwrap_or(UNCAPPED_DEX),
            runes: runes.clamped(),
            check_penalty,
            speed_penalty,
        }
    }
}

/// AC, saves and perception for one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseCalculator {
    proficiency: ProficiencyEngine,
}

impl DefenseCalculator {
    pub fn new(proficiency: ProficiencyEngine) -> Self {
        Self { proficiency }
    }

    /// The first worn item that resolves in the armor table, else unarmored.
    pub fn worn_armor(
        equipment: &[EquippedItem],
        tables: &ReferenceTables,
        abilities: &AbilityScoreSet,
    ) -> ArmorProfile {
        equipment
            .iter()
            .filter(|item| item.worn)
            .find_map(|item| {
                tables.armor(item.item_id.as_deref()).map(|entry| {
                    ArmorProfile::from_entry(
                        entry,
                        item.runes.unwrap_or_default(),
                        abilities.score(Ability::Strength),
                    )
                })
            })
            .unwrap_or_default()
    }

    /// `10 + min(dex, cap) + prof + armor + potency + modifiers[ac] + shield`.
    pub fn armor_class(
        &self,
        abilities: &AbilityScoreSet,
        proficiencies: &Proficiencies,
        level: u8,
        armor: &ArmorProfile,
        modifiers: &ModifierSet,
        shield_bonus: i32,
    ) -> i32 {
        let dex = abilities.modifier(Ability::Dexterity).min(armor.dex_cap);
        let prof = self
            .proficiency
            .bonus(proficiencies.armor(armor.category), level);
        let item = armor.ac_bonus + i32::from(armor.runes.potency);

        10 + dex + prof + item + modifiers.get(ModifierTarget::Ac) + shield_bonus
    }

    pub fn saving_throw(
        &self,
        kind: SaveKind,
        abilities: &AbilityScoreSet,
        proficiencies: &Proficiencies,
        level: u8,
        armor: &ArmorProfile,
        modifiers: &ModifierSet,
    ) -> i32 {
        abilities.modifier(kind.ability())
            + self.proficiency.bonus(proficiencies.save(kind), level)
            + i32::from(armor.runes.resilient)
            + modifiers.get(ModifierTarget::Save(kind))
    }

    pub fn perception(
        &self,
        abilities: &AbilityScoreSet,
        proficiencies: &Proficiencies,
        level: u8,
        modifiers: &ModifierSet,
    ) -> i32 {
        abilities.modifier(Ability::Wisdom)
            + self.proficiency.bonus(proficiencies.perception, level)
            + modifiers.get(ModifierTarget::Perception)
    }

    // =========================================================================
    // Shield
    // =========================================================================

    /// Display view of the shield; `None` when absent or not in the tables.
    pub fn shield_status(
        shield: Option<&ShieldState>,
        tables: &ReferenceTables,
    ) -> Option<ShieldStatus> {
        let shield = shield?;
        let entry = tables.shield(Some(&shield.item_id))?;
        let broken = shield.is_broken(entry.max_hp);
        let destroyed = shield.is_destroyed();
        let ac_bonus = if shield.raised && !broken {
            entry.ac_bonus
        } else {
            0
        };
        Some(ShieldStatus {
            item_id: shield.item_id.clone(),
            current_hp: shield.current_hp,
            max_hp: entry.max_hp,
            hardness: entry.hardness,
            broken_threshold: ShieldState::broken_threshold(entry.max_hp),
            broken,
            destroyed,
            raised: shield.raised,
            ac_bonus,
        })
    }

    pub fn raise_shield(shield: Option<&mut ShieldState>, tables: &ReferenceTables) -> ShieldOutcome {
        match usable_shield(shield, tables) {
            Ok((shield, _)) => {
                shield.raised = true;
                ShieldOutcome::Raised
            }
            Err(reason) => ShieldOutcome::Rejected { reason },
        }
    }

    pub fn lower_shield(shield: Option<&mut ShieldState>, tables: &ReferenceTables) -> ShieldOutcome {
        match usable_shield(shield, tables) {
            Ok((shield, _)) => {
                shield.raised = false;
                ShieldOutcome::Lowered
            }
            Err(reason) => ShieldOutcome::Rejected { reason },
        }
    }

    /// Hardness absorbs first; the remainder comes off shield HP (floor 0).
    pub fn damage_shield(
        shield: Option<&mut ShieldState>,
        tables: &ReferenceTables,
        amount: u32,
    ) -> ShieldOutcome {
        let (shield, entry) = match known_shield(shield, tables) {
            Ok(found) => found,
            Err(reason) => return ShieldOutcome::Rejected { reason },
        };
        let absorbed = amount.min(entry.hardness);
        let dealt = (amount - absorbed).min(shield.current_hp);
        shield.current_hp -= dealt;
        shield.clamp(entry.max_hp);
        ShieldOutcome::Damaged {
            absorbed,
            dealt,
            remaining_hp: shield.current_hp,
            broken: shield.is_broken(entry.max_hp),
            destroyed: shield.is_destroyed(),
        }
    }

    /// Restore HP up to max. Destroyed shields cannot be repaired.
    pub fn repair_shield(
        shield: Option<&mut ShieldState>,
        tables: &ReferenceTables,
        amount: u32,
    ) -> ShieldOutcome {
        let (shield, entry) = match known_shield(shield, tables) {
            Ok(found) => found,
            Err(reason) => return ShieldOutcome::Rejected { reason },
        };
        if shield.is_destroyed() {
            return ShieldOutcome::Rejected {
                reason: ShieldRejection::Destroyed,
            };
        }
        let before = shield.current_hp;
        shield.current_hp = shield.current_hp.saturating_add(amount).min(entry.max_hp);
        ShieldOutcome::Repaired {
            restored: shield.current_hp - before,
            current_hp: shield.current_hp,
        }
    }
}

fn known_shield<'a, 't>(
    shield: Option<&'a mut ShieldState>,
    tables: &'t ReferenceTables,
) -> Result<(&'a mut ShieldState, &'t ShieldEntry), ShieldRejection> {
    let shield = shield.ok_or(ShieldRejection::NoShield)?;
    let entry = tables
        .shield(Some(&shield.item_id))
        .ok_or(ShieldRejection::UnknownShield)?;
    Ok((shield, entry))
}

/// A known shield that is neither broken nor destroyed.
fn usable_shield<'a, 't>(
    shield: Option<&'a mut ShieldState>,
    tables: &'t ReferenceTables,
) -> Result<(&'a mut ShieldState, &'t ShieldEntry), ShieldRejection> {
    let (shield, entry) = known_shield(shield, tables)?;
    if shield.is_destroyed() {
        return Err(ShieldRejection::Destroyed);
    }
    if shield.is_broken(entry.max_hp) {
        return Err(ShieldRejection::Broken);
    }
    Ok((shield, entry))
}
