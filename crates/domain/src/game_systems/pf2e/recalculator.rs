//! CharacterRecalculator - runs every calculator in dependency order.
//!
//! normalise → abilities → proficiency clamps → modifiers → defense, skills,
//! DCs, HP → encumbrance and speed → strikes. The output is a fixed point:
//! feeding it back in yields an identical snapshot.

use crate::aggregates::{Character, DerivedStats};
use crate::reference::ReferenceTables;
use crate::value_objects::{Ability, SaveKind};
use crate::DomainError;

use super::statistics::{max_hit_points, CheckContext};
use super::{
    AbilityScoreResolver, ConditionModifierAggregator, DefenseCalculator, EncumbranceCalculator,
    ProficiencyEngine, SpellcastingResourceManager,
};

/// Speed used when the ancestry is unknown.
pub const DEFAULT_SPEED: i32 = 25;

/// Highest character level.
pub const MAX_LEVEL: u8 = 20;

/// Pure `(Character, ReferenceTables) -> Character` transform.
#[derive(Debug, Clone, Copy)]
pub struct CharacterRecalculator<'a> {
    tables: &'a ReferenceTables,
    proficiency: ProficiencyEngine,
}

impl<'a> CharacterRecalculator<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            proficiency: ProficiencyEngine::new(),
        }
    }

    pub fn with_proficiency(mut self, proficiency: ProficiencyEngine) -> Self {
        self.proficiency = proficiency;
        self
    }

    pub fn tables(&self) -> &'a ReferenceTables {
        self.tables
    }

    /// Recompute every derived field.
    ///
    /// # Errors
    ///
    /// `DomainError::MalformedSnapshot` when the snapshot has no ability
    /// scores at all. Everything else is clamped or ignored.
    pub fn recalculate(&self, character: &Character) -> Result<Character, DomainError> {
        character.abilities()?;

        let mut next = character.clone();
        Self::normalize(&mut next);

        let tables = self.tables;
        let level = next.level;
        let ancestry = tables.ancestry(next.ancestry_id.as_deref());
        let background = tables.background(next.background_id.as_deref());
        let class = tables.class(next.class_id.as_deref());

        let abilities =
            AbilityScoreResolver::resolve(&next.boosts, level, ancestry, background, class);
        next.abilities = Some(abilities);

        ProficiencyEngine::clamp_proficiencies(&mut next.proficiencies, level, class);
        SpellcastingResourceManager::apply_slot_progression(&mut next.spellcasting, class, level);
        next.spellcasting.clamp();

        let modifiers = ConditionModifierAggregator::aggregate(&next.conditions, &next.buffs);

        // Defense
        if let Some(shield) = next.shield.as_mut() {
            if let Some(entry) = tables.shield(Some(&shield.item_id)) {
                shield.clamp(entry.max_hp);
            }
        }
        let shield = DefenseCalculator::shield_status(next.shield.as_ref(), tables);
        let shield_bonus = shield.as_ref().map_or(0, |s| s.ac_bonus);
        let armor = DefenseCalculator::worn_armor(&next.equipment, tables, &abilities);
        let defense = DefenseCalculator::new(self.proficiency);
        let armor_class = defense.armor_class(
            &abilities,
            &next.proficiencies,
            level,
            &armor,
            &modifiers,
            shield_bonus,
        );
        let saves = SaveKind::all()
            .into_iter()
            .map(|kind| {
                let total = defense.saving_throw(
                    kind,
                    &abilities,
                    &next.proficiencies,
                    level,
                    &armor,
                    &modifiers,
                );
                (kind, total)
            })
            .collect();
        let perception = defense.perception(&abilities, &next.proficiencies, level, &modifiers);

        // Skills, DCs, HP
        let checks = CheckContext {
            abilities: &abilities,
            proficiencies: &next.proficiencies,
            level,
            modifiers: &modifiers,
            proficiency: self.proficiency,
        };
        let skills = checks.skills(&armor);
        let casting_ability = class.and_then(|c| c.spellcasting_ability);
        let spell_dc = casting_ability.map(|a| checks.spell_dc(a));
        let spell_attack = casting_ability.map(|a| checks.spell_attack(a));
        let class_dc =
            AbilityScoreResolver::key_ability(&next.boosts, class).map(|a| checks.class_dc(a));
        let strikes = checks.strikes(&next.equipment, tables);

        let max_hp = max_hit_points(
            tables,
            next.ancestry_id.as_deref(),
            next.heritage_id.as_deref(),
            next.class_id.as_deref(),
            &next.feats,
            abilities.modifier(Ability::Constitution),
            level,
            ConditionModifierAggregator::drained_value(&next.conditions),
        );
        next.hit_points.max = max_hp;
        next.hit_points.clamp();

        // Encumbrance
        let encumbrance =
            EncumbranceCalculator::calculate(&next.equipment, abilities.modifier(Ability::Strength));
        let base_speed = ancestry.map_or(DEFAULT_SPEED, |a| a.speed);
        let speed = EncumbranceCalculator::speed(base_speed, armor.speed_penalty, &encumbrance);

        next.derived = DerivedStats {
            ability_modifiers: Ability::all()
                .into_iter()
                .map(|a| (a, abilities.modifier(a)))
                .collect(),
            armor_class,
            saves,
            perception,
            skills,
            spell_dc,
            spell_attack,
            class_dc,
            max_hp,
            speed,
            encumbrance,
            strikes,
            modifiers,
            shield,
        };
        Ok(next)
    }

    /// Centralised default resolution. Hit points are clamped later, once
    /// the new max is known.
    fn normalize(character: &mut Character) {
        character.level = character.level.clamp(1, MAX_LEVEL);
        character.boosts.normalize();
        ConditionModifierAggregator::normalize(&mut character.conditions, &mut character.buffs);
        EncumbranceCalculator::normalize_containers(&mut character.equipment);
        for item in &mut character.equipment {
            item.runes = item.runes.map(|runes| runes.clamped());
        }
        character.spellcasting.clamp();
        for resource in &mut character.resources {
            resource.clamp();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::entities::{
        ActiveCondition, BoostSource, BoostLedger, Buff, Condition, EquippedItem, HitPoints,
        Proficiencies, Runes, ShieldState, SpellcastingState,
    };
    use crate::reference::{
        AncestryEntry, ArmorEntry, BackgroundEntry, ClassEntry, ShieldEntry, WeaponEntry,
    };
    use crate::value_objects::{
        ArmorCategory, Bulk, ModifierTarget, ProficiencyRank, Skill, TargetedModifier,
        WeaponCategory,
    };
    use crate::CharacterId;

    fn tables() -> ReferenceTables {
        let mut tables = ReferenceTables::new();
        tables.ancestries.insert(
            "human".into(),
            AncestryEntry {
                name: "Human".into(),
                hp: 8,
                speed: 25,
                boosts: Vec::new(),
                flaws: Vec::new(),
                free_boosts: 2,
            },
        );
        tables.backgrounds.insert(
            "acolyte".into(),
            BackgroundEntry {
                name: "Acolyte".into(),
                boost_options: vec![Ability::Intelligence, Ability::Wisdom],
            },
        );
        tables.classes.insert(
            "cleric".into(),
            ClassEntry {
                name: "Cleric".into(),
                hp_per_level: 8,
                key_ability_options: vec![Ability::Wisdom],
                spellcasting_ability: Some(Ability::Wisdom),
                track_ceilings: BTreeMap::new(),
                spell_slots: BTreeMap::from([(1, BTreeMap::from([(0, 5), (1, 2)]))]),
            },
        );
        tables.armor.insert(
            "scale-mail".into(),
            ArmorEntry {
                name: "Scale Mail".into(),
                category: ArmorCategory::Medium,
                ac_bonus: 4,
                dex_cap: Some(2),
                strength: Some(14),
                check_penalty: -2,
                speed_penalty: -5,
            },
        );
        tables.weapons.insert(
            "mace".into(),
            WeaponEntry {
                name: "Mace".into(),
                category: WeaponCategory::Simple,
                damage_die: 6,
                finesse: false,
                ranged: false,
            },
        );
        tables.shields.insert(
            "steel-shield".into(),
            ShieldEntry {
                name: "Steel Shield".into(),
                ac_bonus: 2,
                hardness: 5,
                max_hp: 20,
            },
        );
        tables
    }

    fn cleric() -> Character {
        let boosts = BoostLedger::new()
            .with(BoostSource::AncestryFree, "wis")
            .with(BoostSource::AncestryFree, "con")
            .with(BoostSource::BackgroundChoice, "wis")
            .with(BoostSource::BackgroundFree, "str")
            .with(BoostSource::CreationFree, "wis")
            .with(BoostSource::CreationFree, "str")
            .with(BoostSource::CreationFree, "con")
            .with(BoostSource::CreationFree, "dex");
        let proficiencies = Proficiencies::new()
            .with_armor(ArmorCategory::Medium, ProficiencyRank::Trained)
            .with_weapon(WeaponCategory::Simple, ProficiencyRank::Trained)
            .with_save(SaveKind::Will, ProficiencyRank::Expert)
            .with_skill(Skill::Religion, ProficiencyRank::Trained)
            .with_skill(Skill::Athletics, ProficiencyRank::Trained)
            .with_perception(ProficiencyRank::Trained)
            .with_spellcasting(ProficiencyRank::Trained);

        let mut character = Character::new(CharacterId::new(), "Kyra")
            .with_ancestry("human")
            .with_background("acolyte")
            .with_class("cleric")
            .with_boosts(boosts)
            .with_proficiencies(proficiencies)
            .with_item(
                EquippedItem::new("armor-1", "Scale Mail", Bulk::Whole(2))
                    .with_item_id("scale-mail")
                    .worn(),
            )
            .with_item(
                EquippedItem::new("mace-1", "Mace", Bulk::Light)
                    .with_item_id("mace")
                    .wielded(),
            );
        character.hit_points = HitPoints::new(5, 0);
        character
    }

    #[test]
    fn full_pipeline() {
        let tables = tables();
        let result = CharacterRecalculator::new(&tables)
            .recalculate(&cleric())
            .expect("recalculate");

        // wis 10 → 12 → 14 → 16 (key) → 18; str 12 → 14; con 14; dex 12
        let abilities = result.abilities().expect("abilities");
        assert_eq!(abilities.score(Ability::Wisdom), 18);
        assert_eq!(abilities.score(Ability::Strength), 14);
        assert_eq!(abilities.score(Ability::Constitution), 14);
        assert_eq!(abilities.score(Ability::Dexterity), 12);

        let derived = &result.derived;
        // 10 + dex 1 + trained 3 + armor 4
        assert_eq!(derived.armor_class, 18);
        // strength met: speed penalty -5 reduced to 0, no check penalty
        assert_eq!(derived.speed, 25);
        assert_eq!(derived.skills[&Skill::Athletics], 2 + 3);
        assert_eq!(derived.saves[&SaveKind::Will], 4 + 5);
        assert_eq!(derived.perception, 4 + 3);
        assert_eq!(derived.spell_dc, Some(10 + 4 + 3));
        assert_eq!(derived.spell_attack, Some(4 + 3));
        assert_eq!(derived.class_dc, Some(10 + 4));
        // 8 + (8 + 2) * 1
        assert_eq!(derived.max_hp, 18);
        assert_eq!(result.hit_points.max, 18);
        assert_eq!(result.hit_points.current, 5);
        assert_eq!(derived.strikes.len(), 1);
        assert_eq!(derived.strikes[0].attack_bonus, 2 + 3);
        // 2.1 bulk floors to 2, right at the threshold
        assert_eq!(derived.encumbrance.current_bulk, 2);
        assert!(!derived.encumbrance.encumbered);
        assert_eq!(result.spellcasting.slots.len(), 1);
        assert_eq!(result.spellcasting.slots[&1].max, 2);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let tables = tables();
        let recalculator = CharacterRecalculator::new(&tables);
        let mut character = cleric()
            .with_condition(ActiveCondition::new(Condition::Frightened { value: 1 }).with_duration(3))
            .with_condition(ActiveCondition::new(Condition::Drained { value: 1 }));
        character.buffs.push(Buff::new(
            "bless",
            vec![TargetedModifier::new(ModifierTarget::Attack, 1)],
        ));
        character.shield = Some(ShieldState::new("steel-shield", 30));

        let once = recalculator.recalculate(&character).expect("first pass");
        let twice = recalculator.recalculate(&once).expect("second pass");

        let once_json = serde_json::to_string(&once).expect("serialize");
        let twice_json = serde_json::to_string(&twice).expect("serialize");
        assert_eq!(once_json, twice_json);
    }

    #[test]
    fn survives_a_json_round_trip_unchanged() {
        let tables = tables();
        let recalculator = CharacterRecalculator::new(&tables);
        let derived = recalculator.recalculate(&cleric()).expect("recalculate");

        let json = serde_json::to_string(&derived).expect("serialize");
        let reloaded: Character = serde_json::from_str(&json).expect("deserialize");
        let again = recalculator.recalculate(&reloaded).expect("recalculate");

        assert_eq!(serde_json::to_string(&again).expect("serialize"), json);
    }

    #[test]
    fn bad_condition_values_are_dropped_not_fatal() {
        let tables = tables();
        let recalculator = CharacterRecalculator::new(&tables);
        let mut json = serde_json::to_value(cleric()).expect("serialize");
        json["conditions"] = serde_json::json!([
            {"id": "frightened", "duration": 2},
            {"id": "sickened", "value": -1},
            {"id": "clumsy", "value": 1}
        ]);

        let loaded: Character = serde_json::from_value(json).expect("snapshot still loads");
        let result = recalculator.recalculate(&loaded).expect("recalculate");

        assert_eq!(
            result.conditions,
            vec![ActiveCondition::new(Condition::Clumsy { value: 1 })]
        );
        assert_eq!(result.derived.armor_class, 18 - 1);
    }

    #[test]
    fn conditions_and_shield_feed_defense() {
        let tables = tables();
        let recalculator = CharacterRecalculator::new(&tables);
        let mut character = cleric()
            .with_condition(ActiveCondition::new(Condition::OffGuard))
            .with_condition(ActiveCondition::new(Condition::Prone));
        character.shield = Some(ShieldState {
            raised: true,
            ..ShieldState::new("steel-shield", 20)
        });

        let result = recalculator.recalculate(&character).expect("recalculate");
        assert_eq!(result.derived.armor_class, 18 - 2 + 2);
        assert_eq!(result.derived.strikes[0].attack_bonus, 5 - 2);
        assert_eq!(result.derived.shield.as_ref().map(|s| s.ac_bonus), Some(2));
    }

    #[test]
    fn drained_reduces_max_hp_and_clamps_current() {
        let tables = tables();
        let mut character = cleric().with_condition(ActiveCondition::new(Condition::Drained { value: 2 }));
        character.hit_points = HitPoints::new(18, 18);

        let result = CharacterRecalculator::new(&tables)
            .recalculate(&character)
            .expect("recalculate");
        assert_eq!(result.derived.max_hp, 16);
        assert_eq!(result.hit_points.current, 16);
        assert_eq!(result.derived.saves[&SaveKind::Fortitude], 2 - 2);
    }

    #[test]
    fn unknown_references_are_ignored() {
        let tables = tables();
        let mut character = cleric()
            .with_class("no-such-class")
            .with_item(
                EquippedItem::new("wand-1", "Wand", Bulk::Light)
                    .with_item_id("no-such-weapon")
                    .wielded(),
            );
        character.feats = vec!["no-such-feat".into()];
        character.shield = Some(ShieldState::new("no-such-shield", 5));

        let result = CharacterRecalculator::new(&tables)
            .recalculate(&character)
            .expect("recalculate");
        assert_eq!(result.derived.spell_dc, None);
        assert_eq!(result.derived.class_dc, None);
        assert!(result.derived.shield.is_none());
        assert_eq!(result.derived.strikes.len(), 1);
        assert_eq!(result.feats, vec!["no-such-feat".to_string()]);
    }

    #[test]
    fn level_and_ranks_are_clamped() {
        let tables = tables();
        let mut character = cleric().with_level(40);
        character.proficiencies = character
            .proficiencies
            .clone()
            .with_skill(Skill::Religion, ProficiencyRank::Legendary);
        character.level = 0;

        let result = CharacterRecalculator::new(&tables)
            .recalculate(&character)
            .expect("recalculate");
        assert_eq!(result.level, 1);
        assert_eq!(result.proficiencies.skill(Skill::Religion), ProficiencyRank::Expert);
    }

    #[test]
    fn runes_and_item_ranges_are_clamped() {
        let tables = tables();
        let character = cleric().with_item(
            EquippedItem::new("mace-2", "Mace +9", Bulk::Whole(1))
                .with_item_id("mace")
                .with_runes(Runes {
                    potency: 9,
                    striking: 9,
                    resilient: 0,
                }),
        );
        let result = CharacterRecalculator::new(&tables)
            .recalculate(&character)
            .expect("recalculate");
        let runes = result.item("mace-2").and_then(|item| item.runes);
        assert_eq!(runes.map(|r| r.potency), Some(Runes::MAX_GRADE));
    }

    #[test]
    fn spellcasting_state_is_clamped() {
        let tables = tables();
        let mut character = cleric().with_spellcasting(SpellcastingState::new().with_focus(0, 3));
        character.spellcasting.focus.current = 7;
        let result = CharacterRecalculator::new(&tables)
            .recalculate(&character)
            .expect("recalculate");
        assert_eq!(result.spellcasting.focus.current, 3);
    }

    #[test]
    fn missing_abilities_is_fatal() {
        let tables = tables();
        let mut character = cleric();
        character.abilities = None;
        assert_eq!(
            CharacterRecalculator::new(&tables).recalculate(&character),
            Err(DomainError::MalformedSnapshot("abilities"))
        );
    }
}
