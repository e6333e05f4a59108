//! Rest activities: Treat Wounds, Refocus and the long rest.
//!
//! All three start and end in the same idle state; the only memory between
//! calls is the pair of timestamps in [`RestTimers`](crate::entities::RestTimers),
//! which lives on the snapshot.

use chrono::{DateTime, Duration, Utc};

use crate::aggregates::Character;
use crate::events::{RestOutcome, RestRejection};
use crate::value_objects::DegreeOfSuccess;
use crate::DomainError;

use super::{CharacterRecalculator, SpellcastingResourceManager};

/// Cooldowns for the short-rest activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestPolicy {
    pub treat_wounds_cooldown: Duration,
    pub refocus_cooldown: Duration,
}

impl Default for RestPolicy {
    fn default() -> Self {
        Self {
            treat_wounds_cooldown: Duration::minutes(50),
            refocus_cooldown: Duration::minutes(10),
        }
    }
}

impl RestPolicy {
    pub fn with_treat_wounds_cooldown(mut self, cooldown: Duration) -> Self {
        self.treat_wounds_cooldown = cooldown;
        self
    }
}

/// Healing for a Treat Wounds DC; `None` for unsupported DCs.
pub fn treat_wounds_base_healing(dc: u32) -> Option<i32> {
    match dc {
        15 => Some(10),
        20 => Some(20),
        30 => Some(30),
        40 => Some(40),
        _ => None,
    }
}

/// Healing after the degree of success is applied (failure halves, floored).
pub fn treat_wounds_healing(base: i32, degree: DegreeOfSuccess) -> i32 {
    match degree {
        DegreeOfSuccess::CriticalFailure => 0,
        DegreeOfSuccess::Failure => base.div_euclid(2),
        DegreeOfSuccess::Success => base,
        DegreeOfSuccess::CriticalSuccess => base * 2,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RestResolver {
    policy: RestPolicy,
}

impl RestResolver {
    pub fn new(policy: RestPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RestPolicy {
        &self.policy
    }

    /// Treat Wounds at `dc` with an externally rolled `degree`.
    ///
    /// A critical failure heals nothing but still starts the cooldown.
    pub fn treat_wounds(
        &self,
        character: &mut Character,
        dc: u32,
        degree: DegreeOfSuccess,
        now: DateTime<Utc>,
    ) -> RestOutcome {
        let Some(base) = treat_wounds_base_healing(dc) else {
            return rejected(RestRejection::UnsupportedDc { dc });
        };
        if let Some(remaining) =
            cooldown_remaining(character.rest.last_treat_wounds, now, self.policy.treat_wounds_cooldown)
        {
            return rejected(RestRejection::CooldownActive {
                remaining_minutes: remaining,
            });
        }

        let healed = character.hit_points.heal(treat_wounds_healing(base, degree));
        character.rest.last_treat_wounds = Some(now);
        RestOutcome::TreatedWounds {
            healed,
            new_hp: character.hit_points.current,
        }
    }

    /// Refocus: regain one focus point.
    pub fn refocus(&self, character: &mut Character, now: DateTime<Utc>) -> RestOutcome {
        if character.spellcasting.focus.is_full() {
            return rejected(RestRejection::FocusPoolFull);
        }
        if let Some(remaining) =
            cooldown_remaining(character.rest.last_refocus, now, self.policy.refocus_cooldown)
        {
            return rejected(RestRejection::CooldownActive {
                remaining_minutes: remaining,
            });
        }

        SpellcastingResourceManager::restore_focus_point(&mut character.spellcasting.focus);
        character.rest.last_refocus = Some(now);
        RestOutcome::Refocused {
            focus_points: character.spellcasting.focus.current,
        }
    }

    /// Long rest. Recalculates first so new maxima are what gets restored.
    pub fn long_rest(
        &self,
        character: &mut Character,
        recalculator: &CharacterRecalculator<'_>,
    ) -> Result<RestOutcome, DomainError> {
        let mut rested = recalculator.recalculate(character)?;

        rested.hit_points.current = rested.hit_points.max;
        rested.hit_points.temporary = 0;
        SpellcastingResourceManager::refresh(&mut rested.spellcasting);
        SpellcastingResourceManager::refresh_daily(&mut rested.resources);

        let before = rested.conditions.len();
        rested
            .conditions
            .retain(|c| c.condition.persists_through_rest());
        let cleared_conditions = before - rested.conditions.len();

        // Cleared conditions change the modifier set
        *character = recalculator.recalculate(&rested)?;
        Ok(RestOutcome::LongRested {
            hp: character.hit_points.current,
            cleared_conditions,
        })
    }
}

fn rejected(reason: RestRejection) -> RestOutcome {
    RestOutcome::Rejected { reason }
}

/// Whole minutes left on a cooldown, rounded up; `None` once it has elapsed.
/// A `last` in the future counts as still cooling down.
fn cooldown_remaining(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Option<i64> {
    let last = last?;
    let elapsed = now.signed_duration_since(last);
    if elapsed >= cooldown {
        return None;
    }
    let remaining = cooldown - elapsed;
    let seconds = remaining.num_seconds();
    Some((seconds + 59).div_euclid(60).max(1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entities::{ActiveCondition, Condition, CustomResource, HitPoints, ResourceFrequency};
    use crate::entities::SpellcastingState;
    use crate::reference::{ClassEntry, ReferenceTables};
    use crate::CharacterId;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn wounded() -> Character {
        let mut character = Character::new(CharacterId::new(), "Kyra");
        character.hit_points = HitPoints::new(10, 60);
        character
    }

    #[test]
    fn base_healing_table() {
        assert_eq!(treat_wounds_base_healing(15), Some(10));
        assert_eq!(treat_wounds_base_healing(40), Some(40));
        assert_eq!(treat_wounds_base_healing(25), None);
        assert_eq!(treat_wounds_healing(20, DegreeOfSuccess::CriticalSuccess), 40);
        assert_eq!(treat_wounds_healing(15, DegreeOfSuccess::Failure), 7);
    }

    #[test]
    fn treat_wounds_by_degree() {
        let resolver = RestResolver::default();
        let cases = [
            (DegreeOfSuccess::Success, 20),
            (DegreeOfSuccess::Failure, 10),
            (DegreeOfSuccess::CriticalFailure, 0),
        ];
        for (degree, expected) in cases {
            let mut character = wounded();
            let outcome = resolver.treat_wounds(&mut character, 20, degree, at(9, 0));
            assert_eq!(
                outcome,
                RestOutcome::TreatedWounds {
                    healed: expected,
                    new_hp: 10 + expected
                }
            );
            assert_eq!(character.rest.last_treat_wounds, Some(at(9, 0)));
        }
    }

    #[test]
    fn treat_wounds_cooldown_blocks_second_use() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        resolver.treat_wounds(&mut character, 20, DegreeOfSuccess::CriticalFailure, at(9, 0));

        let before = character.clone();
        let outcome = resolver.treat_wounds(&mut character, 20, DegreeOfSuccess::Success, at(9, 30));
        assert_eq!(
            outcome,
            RestOutcome::Rejected {
                reason: RestRejection::CooldownActive {
                    remaining_minutes: 20
                }
            }
        );
        assert_eq!(character, before);

        let outcome = resolver.treat_wounds(&mut character, 20, DegreeOfSuccess::Success, at(9, 50));
        assert!(outcome.is_applied());
        assert_eq!(character.rest.last_treat_wounds, Some(at(9, 50)));
    }

    #[test]
    fn clock_skew_counts_as_cooling_down() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        character.rest.last_treat_wounds = Some(at(12, 0));
        let outcome = resolver.treat_wounds(&mut character, 15, DegreeOfSuccess::Success, at(11, 0));
        assert!(!outcome.is_applied());
        assert_eq!(character.hit_points.current, 10);
    }

    #[test]
    fn unsupported_dc_is_rejected() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        let outcome = resolver.treat_wounds(&mut character, 25, DegreeOfSuccess::Success, at(9, 0));
        assert_eq!(
            outcome,
            RestOutcome::Rejected {
                reason: RestRejection::UnsupportedDc { dc: 25 }
            }
        );
        assert!(character.rest.last_treat_wounds.is_none());
    }

    #[test]
    fn healing_clamps_at_max() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        character.hit_points.current = 55;
        let outcome =
            resolver.treat_wounds(&mut character, 40, DegreeOfSuccess::CriticalSuccess, at(9, 0));
        assert_eq!(
            outcome,
            RestOutcome::TreatedWounds {
                healed: 5,
                new_hp: 60
            }
        );
    }

    #[test]
    fn refocus_rules() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        character.spellcasting = SpellcastingState::new().with_focus(1, 3);

        assert_eq!(
            resolver.refocus(&mut character, at(9, 0)),
            RestOutcome::Refocused { focus_points: 2 }
        );
        assert!(!resolver.refocus(&mut character, at(9, 5)).is_applied());
        assert_eq!(
            resolver.refocus(&mut character, at(9, 10)),
            RestOutcome::Refocused { focus_points: 3 }
        );
        assert_eq!(
            resolver.refocus(&mut character, at(10, 0)),
            RestOutcome::Rejected {
                reason: RestRejection::FocusPoolFull
            }
        );
    }

    #[test]
    fn refocus_and_treat_wounds_cool_down_separately() {
        let resolver = RestResolver::default();
        let mut character = wounded();
        character.spellcasting = SpellcastingState::new().with_focus(0, 1);

        resolver.treat_wounds(&mut character, 15, DegreeOfSuccess::Success, at(9, 0));
        assert!(resolver.refocus(&mut character, at(9, 1)).is_applied());
    }

    #[test]
    fn long_rest_example() {
        let mut tables = ReferenceTables::new();
        tables.classes.insert(
            "wizard".into(),
            ClassEntry {
                name: "Wizard".into(),
                hp_per_level: 10,
                key_ability_options: Vec::new(),
                spellcasting_ability: None,
                track_ceilings: Default::default(),
                spell_slots: Default::default(),
            },
        );
        let recalculator = CharacterRecalculator::new(&tables);

        let mut character = Character::new(CharacterId::new(), "Ezren").with_class("wizard");
        character.hit_points = HitPoints::new(3, 10);
        character.spellcasting = SpellcastingState::new().with_slots(1, 2).with_focus(0, 3);
        character.spellcasting.slots.entry(1).and_modify(|pool| pool.used = 2);
        character.conditions = vec![
            ActiveCondition::new(Condition::Frightened { value: 2 }),
            ActiveCondition::new(Condition::Cursed),
        ];
        character.resources = vec![
            CustomResource {
                current: 0,
                ..CustomResource::new("spell-substitution", 1, ResourceFrequency::Daily)
            },
            CustomResource {
                current: 0,
                ..CustomResource::new("hero-points", 3, ResourceFrequency::Other)
            },
        ];

        let outcome = resolver_long_rest(&mut character, &recalculator);

        assert_eq!(
            outcome,
            RestOutcome::LongRested {
                hp: 10,
                cleared_conditions: 1
            }
        );
        assert_eq!(character.hit_points.current, character.hit_points.max);
        assert_eq!(character.hit_points.max, 10);
        assert!(character.spellcasting.slots.values().all(|pool| pool.used == 0));
        assert_eq!(character.spellcasting.focus.current, 3);
        assert_eq!(character.spellcasting.focus.max, 3);
        assert_eq!(character.conditions, vec![ActiveCondition::new(Condition::Cursed)]);
        assert_eq!(character.resources[0].current, 1);
        assert_eq!(character.resources[1].current, 0);
    }

    fn resolver_long_rest(
        character: &mut Character,
        recalculator: &CharacterRecalculator<'_>,
    ) -> RestOutcome {
        RestResolver::default()
            .long_rest(character, recalculator)
            .expect("long rest")
    }

    #[test]
    fn long_rest_on_malformed_snapshot_fails() {
        let tables = ReferenceTables::new();
        let recalculator = CharacterRecalculator::new(&tables);
        let mut character = wounded();
        character.abilities = None;
        let result = RestResolver::default().long_rest(&mut character, &recalculator);
        assert!(matches!(result, Err(DomainError::MalformedSnapshot(_))));
    }
}
