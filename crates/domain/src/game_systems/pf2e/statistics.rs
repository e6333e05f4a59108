//! Skills, hit points, DCs and strikes.

use std::collections::{BTreeMap, BTreeSet};

use crate::aggregates::Strike;
use crate::entities::{EquippedItem, Proficiencies};
use crate::reference::ReferenceTables;
use crate::value_objects::{
    Ability, AbilityScoreSet, ModifierSet, ModifierTarget, ProficiencyRank, Skill,
};

use super::{ArmorProfile, ProficiencyEngine};

/// Never report less than this many max HP.
pub const MIN_MAX_HP: i32 = 1;

/// Inputs shared by every check on the sheet.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    pub abilities: &'a AbilityScoreSet,
    pub proficiencies: &'a Proficiencies,
    pub level: u8,
    pub modifiers: &'a ModifierSet,
    pub proficiency: ProficiencyEngine,
}

impl CheckContext<'_> {
    fn bonus(&self, rank: ProficiencyRank) -> i32 {
        self.proficiency.bonus(rank, self.level)
    }

    /// Every skill modifier. The armor check penalty hits Strength and
    /// Dexterity skills only.
    pub fn skills(&self, armor: &ArmorProfile) -> BTreeMap<Skill, i32> {
        Skill::all()
            .into_iter()
            .map(|skill| {
                let ability = skill.ability();
                let check_penalty = match ability {
                    Ability::Strength | Ability::Dexterity => armor.check_penalty,
                    _ => 0,
                };
                let total = self.abilities.modifier(ability)
                    + self.bonus(self.proficiencies.skill(skill))
                    + check_penalty
                    + self.modifiers.get(ModifierTarget::Skill(ability));
                (skill, total)
            })
            .collect()
    }

    /// `10 + key mod + prof(class DC) + modifiers[dc]`.
    pub fn class_dc(&self, key_ability: Ability) -> i32 {
        10 + self.abilities.modifier(key_ability)
            + self.bonus(self.proficiencies.class_dc)
            + self.modifiers.get(ModifierTarget::Dc)
    }

    pub fn spell_dc(&self, casting_ability: Ability) -> i32 {
        10 + self.abilities.modifier(casting_ability)
            + self.bonus(self.proficiencies.spellcasting)
            + self.modifiers.get(ModifierTarget::Dc)
    }

    pub fn spell_attack(&self, casting_ability: Ability) -> i32 {
        self.abilities.modifier(casting_ability)
            + self.bonus(self.proficiencies.spellcasting)
            + self.modifiers.get(ModifierTarget::Attack)
    }

    /// One strike per wielded weapon that resolves in the weapon table.
    pub fn strikes(&self, equipment: &[EquippedItem], tables: &ReferenceTables) -> Vec<Strike> {
        let strength = self.abilities.modifier(Ability::Strength);
        let dexterity = self.abilities.modifier(Ability::Dexterity);

        equipment
            .iter()
            .filter(|item| item.wielded)
            .filter_map(|item| {
                let weapon = tables.weapon(item.item_id.as_deref())?;
                let attack_mod = if weapon.ranged {
                    dexterity
                } else if weapon.finesse {
                    strength.max(dexterity)
                } else {
                    strength
                };
                let runes = item.runes.unwrap_or_default().clamped();
                Some(Strike {
                    item_id: item.id.clone(),
                    name: if item.name.is_empty() {
                        weapon.name.clone()
                    } else {
                        item.name.clone()
                    },
                    attack_bonus: attack_mod
                        + self.bonus(self.proficiencies.weapon(weapon.category))
                        + i32::from(runes.potency)
                        + self.modifiers.get(ModifierTarget::Attack),
                    damage_dice: 1 + runes.striking,
                    damage_die: weapon.damage_die,
                    damage_bonus: if weapon.ranged { 0 } else { strength },
                })
            })
            .collect()
    }
}

/// Max HP from ancestry, heritage, class, Constitution and feats, less
/// drained. Unknown ids contribute nothing; repeated feat ids count once.
pub fn max_hit_points(
    tables: &ReferenceTables,
    ancestry_id: Option<&str>,
    heritage_id: Option<&str>,
    class_id: Option<&str>,
    feats: &[String],
    constitution_modifier: i32,
    level: u8,
    drained: u32,
) -> i32 {
    let level = i32::from(level);
    let ancestry = tables.ancestry(ancestry_id).map_or(0, |a| a.hp);
    let heritage = tables.heritage(heritage_id).map_or(0, |h| h.bonus_hp);
    let class = tables.class(class_id).map_or(0, |c| c.hp_per_level);
    let feat_bonus: i32 = feats
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|id| tables.feat(id))
        .map(|feat| feat.bonus_hp_per_level)
        .sum();
    let drained = i32::try_from(drained).unwrap_or(i32::MAX);

    let total = ancestry + heritage + (class + constitution_modifier) * level + feat_bonus * level
        - drained.saturating_mul(level);
    total.max(MIN_MAX_HP)
}
