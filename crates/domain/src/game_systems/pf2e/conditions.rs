//! Condition and buff aggregation.
//!
//! Penalties are grouped by (target, family). Within one group only the
//! largest magnitude counts; distinct groups on the same target sum. Buffs
//! bypass grouping entirely and always sum.

use std::collections::BTreeMap;

use crate::entities::{ActiveCondition, Buff, Condition};
use crate::events::BuffOutcome;
use crate::value_objects::{Ability, ModifierSet, ModifierTarget, SaveKind};

/// Stacking family of a condition penalty.
///
/// Off-guard, prone and grabbed all impose the same off-guard AC penalty, so
/// they share a family and never stack with each other on AC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PenaltyFamily {
    Frightened,
    Sickened,
    Clumsy,
    Enfeebled,
    Stupefied,
    Drained,
    Fatigued,
    OffGuard,
    Prone,
}

/// Penalties a single condition contributes, as positive magnitudes.
pub fn condition_penalties(condition: &Condition) -> Vec<(ModifierTarget, PenaltyFamily, i32)> {
    let scaled = |family: PenaltyFamily, value: u32, targets: Vec<ModifierTarget>| {
        let magnitude = i32::try_from(value).unwrap_or(i32::MAX);
        targets
            .into_iter()
            .map(|target| (target, family, magnitude))
            .collect::<Vec<_>>()
    };

    match *condition {
        Condition::Frightened { value } => scaled(
            PenaltyFamily::Frightened,
            value,
            ModifierTarget::all_checks_and_dcs(),
        ),
        Condition::Sickened { value } => scaled(
            PenaltyFamily::Sickened,
            value,
            ModifierTarget::all_checks_and_dcs(),
        ),
        Condition::Clumsy { value } => scaled(
            PenaltyFamily::Clumsy,
            value,
            vec![
                ModifierTarget::Skill(Ability::Dexterity),
                ModifierTarget::Ac,
                ModifierTarget::Save(SaveKind::Reflex),
            ],
        ),
        Condition::Enfeebled { value } => scaled(
            PenaltyFamily::Enfeebled,
            value,
            vec![
                ModifierTarget::Skill(Ability::Strength),
                ModifierTarget::Attack,
            ],
        ),
        Condition::Stupefied { value } => scaled(
            PenaltyFamily::Stupefied,
            value,
            vec![
                ModifierTarget::Skill(Ability::Intelligence),
                ModifierTarget::Skill(Ability::Wisdom),
                ModifierTarget::Skill(Ability::Charisma),
                ModifierTarget::Perception,
                ModifierTarget::Save(SaveKind::Will),
                ModifierTarget::Dc,
            ],
        ),
        Condition::Drained { value } => scaled(
            PenaltyFamily::Drained,
            value,
            vec![
                ModifierTarget::Skill(Ability::Constitution),
                ModifierTarget::Save(SaveKind::Fortitude),
            ],
        ),
        Condition::Fatigued => {
            let mut targets = vec![ModifierTarget::Ac];
            targets.extend(SaveKind::all().into_iter().map(ModifierTarget::Save));
            scaled(PenaltyFamily::Fatigued, 1, targets)
        }
        Condition::OffGuard | Condition::Grabbed => {
            vec![(ModifierTarget::Ac, PenaltyFamily::OffGuard, 2)]
        }
        Condition::Prone => vec![
            (ModifierTarget::Ac, PenaltyFamily::OffGuard, 2),
            (ModifierTarget::Attack, PenaltyFamily::Prone, 2),
        ],
        // Tracked for rest and dying rules only
        Condition::Doomed { .. }
        | Condition::Dying { .. }
        | Condition::Wounded { .. }
        | Condition::Cursed
        | Condition::Unknown => Vec::new(),
    }
}

/// Collapses conditions and buffs into a [`ModifierSet`], and owns the
/// list-level rules (merge on re-add, round advance).
pub struct ConditionModifierAggregator;

impl ConditionModifierAggregator {
    pub fn aggregate(conditions: &[ActiveCondition], buffs: &[Buff]) -> ModifierSet {
        let mut worst: BTreeMap<(ModifierTarget, PenaltyFamily), i32> = BTreeMap::new();
        for active in conditions.iter().filter(|c| !c.is_expired()) {
            for (target, family, magnitude) in condition_penalties(&active.condition) {
                let entry = worst.entry((target, family)).or_insert(0);
                *entry = (*entry).max(magnitude);
            }
        }

        let mut set = ModifierSet::new();
        for ((target, _), magnitude) in worst {
            set.add(target, -magnitude);
        }
        for buff in buffs.iter().filter(|b| !b.is_expired()) {
            for modifier in &buff.modifiers {
                set.add(modifier.target, modifier.value);
            }
        }
        set
    }

    /// Add a condition, merging with an existing instance of the same id.
    ///
    /// Returns `false` when the incoming condition is already expired (value
    /// or duration 0, or an unknown kind) and nothing changed.
    pub fn add_condition(conditions: &mut Vec<ActiveCondition>, incoming: ActiveCondition) -> bool {
        if incoming.is_expired() {
            return false;
        }
        match conditions.iter_mut().find(|c| c.id() == incoming.id()) {
            Some(existing) => *existing = existing.merged_with(incoming),
            None => conditions.push(incoming),
        }
        true
    }

    pub fn remove_condition(conditions: &mut Vec<ActiveCondition>, id: &str) -> bool {
        let before = conditions.len();
        conditions.retain(|c| c.id() != id);
        conditions.len() != before
    }

    /// Add a buff, replacing any buff with the same id.
    pub fn add_buff(buffs: &mut Vec<Buff>, buff: Buff) -> BuffOutcome {
        if buff.is_expired() {
            return BuffOutcome::Expired;
        }
        match buffs.iter_mut().find(|b| b.id == buff.id) {
            Some(existing) => {
                *existing = buff;
                BuffOutcome::Replaced
            }
            None => {
                buffs.push(buff);
                BuffOutcome::Added
            }
        }
    }

    pub fn remove_buff(buffs: &mut Vec<Buff>, id: &str) -> bool {
        let before = buffs.len();
        buffs.retain(|b| b.id != id);
        buffs.len() != before
    }

    /// End of round.
    ///
    /// Durations tick down and expire at 0. Frightened also loses one point
    /// of value, independent of its duration, and ends at 0.
    pub fn advance_round(conditions: &mut Vec<ActiveCondition>, buffs: &mut Vec<Buff>) {
        for active in conditions.iter_mut() {
            if let Some(rounds) = active.duration.as_mut() {
                *rounds = rounds.saturating_sub(1);
            }
            if let Condition::Frightened { value } = active.condition {
                active.condition = active.condition.with_value(value.saturating_sub(1));
            }
        }
        conditions.retain(|c| !c.is_expired());

        for buff in buffs.iter_mut() {
            if let Some(rounds) = buff.duration.as_mut() {
                *rounds = rounds.saturating_sub(1);
            }
        }
        buffs.retain(|b| !b.is_expired());
    }

    /// Merge duplicate ids, clamp values and drop expired entries, keeping
    /// first-seen order.
    pub fn normalize(conditions: &mut Vec<ActiveCondition>, buffs: &mut Vec<Buff>) {
        let incoming = std::mem::take(conditions);
        for active in incoming {
            let clamped = ActiveCondition {
                condition: active
                    .condition
                    .with_value(active.condition.value().unwrap_or(0)),
                duration: active.duration,
            };
            Self::add_condition(conditions, clamped);
        }

        let incoming = std::mem::take(buffs);
        for buff in incoming {
            Self::add_buff(buffs, buff);
        }
    }

    /// Current drained value, used for the max HP reduction.
    pub fn drained_value(conditions: &[ActiveCondition]) -> u32 {
        conditions
            .iter()
            .filter_map(|c| match c.condition {
                Condition::Drained { value } => Some(value),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::TargetedModifier;

    fn frightened(value: u32) -> ActiveCondition {
        ActiveCondition::new(Condition::Frightened { value })
    }

    #[test]
    fn frightened_hits_every_check_and_dc() {
        let set = ConditionModifierAggregator::aggregate(&[frightened(2)], &[]);
        assert_eq!(set.get(ModifierTarget::Attack), -2);
        assert_eq!(set.get(ModifierTarget::Ac), -2);
        assert_eq!(set.get(ModifierTarget::Dc), -2);
        assert_eq!(set.get(ModifierTarget::Save(SaveKind::Will)), -2);
        assert_eq!(set.get(ModifierTarget::Skill(Ability::Charisma)), -2);
    }

    #[test]
    fn clumsy_only_touches_dexterity_targets() {
        let set = ConditionModifierAggregator::aggregate(
            &[ActiveCondition::new(Condition::Clumsy { value: 1 })],
            &[],
        );
        assert_eq!(set.get(ModifierTarget::Ac), -1);
        assert_eq!(set.get(ModifierTarget::Skill(Ability::Dexterity)), -1);
        assert_eq!(set.get(ModifierTarget::Save(SaveKind::Reflex)), -1);
        assert_eq!(set.get(ModifierTarget::Attack), 0);
    }

    #[test]
    fn same_family_takes_the_worst() {
        let set = ConditionModifierAggregator::aggregate(
            &[
                ActiveCondition::new(Condition::OffGuard),
                ActiveCondition::new(Condition::Prone),
                ActiveCondition::new(Condition::Grabbed),
            ],
            &[],
        );
        assert_eq!(set.get(ModifierTarget::Ac), -2);
        assert_eq!(set.get(ModifierTarget::Attack), -2);
    }

    #[test]
    fn different_families_sum() {
        let set = ConditionModifierAggregator::aggregate(
            &[
                frightened(1),
                ActiveCondition::new(Condition::Clumsy { value: 2 }),
                ActiveCondition::new(Condition::OffGuard),
            ],
            &[],
        );
        assert_eq!(set.get(ModifierTarget::Ac), -5);
    }

    #[test]
    fn re_adding_a_buff_replaces_its_modifiers() {
        let mut buffs = Vec::new();
        let first = Buff::new(
            "heroism",
            vec![
                TargetedModifier::new(ModifierTarget::Attack, 1),
                TargetedModifier::new(ModifierTarget::Perception, 1),
            ],
        );
        let second = Buff::new("heroism", vec![TargetedModifier::new(ModifierTarget::Attack, 2)]);

        assert_eq!(ConditionModifierAggregator::add_buff(&mut buffs, first), BuffOutcome::Added);
        assert_eq!(
            ConditionModifierAggregator::add_buff(&mut buffs, second),
            BuffOutcome::Replaced
        );
        assert_eq!(buffs.len(), 1);

        let set = ConditionModifierAggregator::aggregate(&[], &buffs);
        assert_eq!(set.get(ModifierTarget::Attack), 2);
        assert_eq!(set.get(ModifierTarget::Perception), 0);
    }

    #[test]
    fn expired_buff_is_not_added() {
        let mut buffs = Vec::new();
        let spent = Buff::new("bless", vec![TargetedModifier::new(ModifierTarget::Attack, 1)])
            .with_duration(0);
        assert_eq!(
            ConditionModifierAggregator::add_buff(&mut buffs, spent),
            BuffOutcome::Expired
        );
        assert!(buffs.is_empty());
    }

    #[test]
    fn buffs_sum_with_penalties() {
        let buffs = vec![
            Buff::new("bless", vec![TargetedModifier::new(ModifierTarget::Attack, 1)]),
            Buff::new(
                "inspire-courage",
                vec![TargetedModifier::new(ModifierTarget::Attack, 1)],
            ),
        ];
        let set = ConditionModifierAggregator::aggregate(&[frightened(1)], &buffs);
        assert_eq!(set.get(ModifierTarget::Attack), 1);
        assert_eq!(set.get(ModifierTarget::Ac), -1);
    }

    #[test]
    fn re_adding_takes_the_more_severe_value() {
        let mut conditions = vec![frightened(1)];
        assert!(ConditionModifierAggregator::add_condition(
            &mut conditions,
            frightened(2)
        ));
        assert!(ConditionModifierAggregator::add_condition(
            &mut conditions,
            frightened(1)
        ));
        assert_eq!(conditions, vec![frightened(2)]);
    }

    #[test]
    fn zero_value_add_is_a_no_op() {
        let mut conditions = Vec::new();
        assert!(!ConditionModifierAggregator::add_condition(
            &mut conditions,
            frightened(0)
        ));
        assert!(conditions.is_empty());
    }

    #[test]
    fn frightened_decrements_and_ends() {
        let mut conditions = vec![frightened(2)];
        let mut buffs = Vec::new();

        ConditionModifierAggregator::advance_round(&mut conditions, &mut buffs);
        assert_eq!(conditions, vec![frightened(1)]);

        ConditionModifierAggregator::advance_round(&mut conditions, &mut buffs);
        assert!(conditions.is_empty());
    }

    #[test]
    fn duration_and_value_count_down_independently() {
        let mut conditions = vec![frightened(3).with_duration(1)];
        let mut buffs = vec![
            Buff::new("heroism", Vec::new()).with_duration(2),
            Buff::new("shield-spell", Vec::new()),
        ];

        ConditionModifierAggregator::advance_round(&mut conditions, &mut buffs);

        assert!(conditions.is_empty());
        assert_eq!(buffs.len(), 2);
        assert_eq!(buffs[0].duration, Some(1));

        ConditionModifierAggregator::advance_round(&mut conditions, &mut buffs);
        assert_eq!(buffs.len(), 1);
        assert_eq!(buffs[0].id, "shield-spell");
    }

    #[test]
    fn normalize_merges_duplicates_and_drops_unknown() {
        let mut conditions = vec![
            frightened(1),
            ActiveCondition::new(Condition::Unknown),
            ActiveCondition::new(Condition::Dying { value: 9 }),
            frightened(3),
        ];
        let mut buffs = vec![Buff::new("bless", Vec::new()).with_duration(0)];

        ConditionModifierAggregator::normalize(&mut conditions, &mut buffs);

        assert_eq!(
            conditions,
            vec![
                frightened(3),
                ActiveCondition::new(Condition::Dying { value: 4 })
            ]
        );
        assert!(buffs.is_empty());
    }

    #[test]
    fn drained_value_reads_the_condition() {
        let conditions = vec![ActiveCondition::new(Condition::Drained { value: 2 })];
        assert_eq!(ConditionModifierAggregator::drained_value(&conditions), 2);
        assert_eq!(ConditionModifierAggregator::drained_value(&[]), 0);
    }
}
