//! Conditions and buffs - timed effects that feed the modifier aggregator.

use serde::{Deserialize, Deserializer, Serialize};

use crate::value_objects::TargetedModifier;

/// A condition kind with its payload.
///
/// Valued conditions carry `value`; the rest are simple flags. Snapshots
/// written by other tools may name conditions this engine does not model;
/// those deserialize as `Unknown` and are dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "camelCase")]
pub enum Condition {
    Frightened {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Sickened {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Clumsy {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Enfeebled {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Stupefied {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Drained {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Doomed {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Dying {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    Wounded {
        #[serde(default, deserialize_with = "lenient_value")]
        value: u32,
    },
    OffGuard,
    Prone,
    Grabbed,
    Fatigued,
    Cursed,
    #[serde(other)]
    Unknown,
}

/// Missing or negative values load as 0 (and are then dropped by
/// normalization) instead of making the whole snapshot unreadable.
fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.map_or(0, |value| u32::try_from(value.max(0)).unwrap_or(u32::MAX)))
}

impl Condition {
    /// Stable id, matching the serialized tag.
    pub fn id(&self) -> &'static str {
        match self {
            Condition::Frightened { .. } => "frightened",
            Condition::Sickened { .. } => "sickened",
            Condition::Clumsy { .. } => "clumsy",
            Condition::Enfeebled { .. } => "enfeebled",
            Condition::Stupefied { .. } => "stupefied",
            Condition::Drained { .. } => "drained",
            Condition::Doomed { .. } => "doomed",
            Condition::Dying { .. } => "dying",
            Condition::Wounded { .. } => "wounded",
            Condition::OffGuard => "offGuard",
            Condition::Prone => "prone",
            Condition::Grabbed => "grabbed",
            Condition::Fatigued => "fatigued",
            Condition::Cursed => "cursed",
            Condition::Unknown => "unknown",
        }
    }

    /// The condition's value, if it is a valued condition.
    pub fn value(&self) -> Option<u32> {
        match self {
            Condition::Frightened { value }
            | Condition::Sickened { value }
            | Condition::Clumsy { value }
            | Condition::Enfeebled { value }
            | Condition::Stupefied { value }
            | Condition::Drained { value }
            | Condition::Doomed { value }
            | Condition::Dying { value }
            | Condition::Wounded { value } => Some(*value),
            _ => None,
        }
    }

    /// Highest legal value, when the rules cap it.
    pub fn max_value(&self) -> Option<u32> {
        match self {
            Condition::Dying { .. } => Some(4),
            Condition::Doomed { .. } => Some(3),
            _ => None,
        }
    }

    /// Copy with a new value, clamped to the legal range. Flags are unchanged.
    pub fn with_value(self, new_value: u32) -> Self {
        let new_value = match self.max_value() {
            Some(cap) => new_value.min(cap),
            None => new_value,
        };
        match self {
            Condition::Frightened { .. } => Condition::Frightened { value: new_value },
            Condition::Sickened { .. } => Condition::Sickened { value: new_value },
            Condition::Clumsy { .. } => Condition::Clumsy { value: new_value },
            Condition::Enfeebled { .. } => Condition::Enfeebled { value: new_value },
            Condition::Stupefied { .. } => Condition::Stupefied { value: new_value },
            Condition::Drained { .. } => Condition::Drained { value: new_value },
            Condition::Doomed { .. } => Condition::Doomed { value: new_value },
            Condition::Dying { .. } => Condition::Dying { value: new_value },
            Condition::Wounded { .. } => Condition::Wounded { value: new_value },
            flag => flag,
        }
    }

    /// Conditions that survive a long rest.
    pub fn persists_through_rest(&self) -> bool {
        matches!(
            self,
            Condition::Cursed
                | Condition::Doomed { .. }
                | Condition::Drained { .. }
                | Condition::Dying { .. }
        )
    }
}

/// A condition currently affecting the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveCondition {
    #[serde(flatten)]
    pub condition: Condition,
    /// Remaining rounds; absent means until removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl ActiveCondition {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            duration: None,
        }
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    pub fn id(&self) -> &'static str {
        self.condition.id()
    }

    /// A valued condition at 0, a duration at 0, or an unknown kind.
    pub fn is_expired(&self) -> bool {
        matches!(self.condition, Condition::Unknown)
            || self.condition.value() == Some(0)
            || self.duration == Some(0)
    }

    /// Combine with a re-application of the same condition.
    ///
    /// Takes the more severe value and the longer duration (indefinite wins).
    pub fn merged_with(self, other: ActiveCondition) -> ActiveCondition {
        let condition = match (self.condition.value(), other.condition.value()) {
            (Some(a), Some(b)) => self.condition.with_value(a.max(b)),
            _ => self.condition,
        };
        let duration = match (self.duration, other.duration) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
        ActiveCondition {
            condition,
            duration,
        }
    }
}

/// A player-declared temporary effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    pub id: String,
    /// Remaining rounds; absent means until removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub modifiers: Vec<TargetedModifier>,
}

impl Buff {
    pub fn new(id: impl Into<String>, modifiers: Vec<TargetedModifier>) -> Self {
        Self {
            id: id.into(),
            duration: None,
            modifiers,
        }
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.duration == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_tagged_object() {
        let active = ActiveCondition::new(Condition::Frightened { value: 2 }).with_duration(3);
        let json = serde_json::to_value(active).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"id": "frightened", "value": 2, "duration": 3})
        );

        let flag = ActiveCondition::new(Condition::OffGuard);
        let json = serde_json::to_value(flag).expect("serialize");
        assert_eq!(json, serde_json::json!({"id": "offGuard"}));
    }

    #[test]
    fn unknown_ids_deserialize_as_unknown() {
        let parsed: ActiveCondition =
            serde_json::from_value(serde_json::json!({"id": "petrified"})).expect("deserialize");
        assert_eq!(parsed.condition, Condition::Unknown);
        assert!(parsed.is_expired());
    }

    #[test]
    fn missing_or_negative_values_load_as_zero() {
        let missing: ActiveCondition =
            serde_json::from_value(serde_json::json!({"id": "frightened", "duration": 2}))
                .expect("deserialize");
        assert_eq!(missing.condition, Condition::Frightened { value: 0 });
        assert_eq!(missing.duration, Some(2));
        assert!(missing.is_expired());

        let negative: ActiveCondition =
            serde_json::from_value(serde_json::json!({"id": "sickened", "value": -1}))
                .expect("deserialize");
        assert_eq!(negative.condition, Condition::Sickened { value: 0 });

        let null: ActiveCondition =
            serde_json::from_value(serde_json::json!({"id": "clumsy", "value": null}))
                .expect("deserialize");
        assert_eq!(null.condition, Condition::Clumsy { value: 0 });
    }

    #[test]
    fn merge_takes_more_severe_value() {
        let existing = ActiveCondition::new(Condition::Frightened { value: 1 });
        let incoming = ActiveCondition::new(Condition::Frightened { value: 2 });
        assert_eq!(
            existing.merged_with(incoming).condition,
            Condition::Frightened { value: 2 }
        );
        assert_eq!(
            incoming.merged_with(existing).condition,
            Condition::Frightened { value: 2 }
        );
    }

    #[test]
    fn merge_keeps_indefinite_duration() {
        let timed = ActiveCondition::new(Condition::Prone).with_duration(2);
        let open = ActiveCondition::new(Condition::Prone);
        assert_eq!(timed.merged_with(open).duration, None);
        let longer = ActiveCondition::new(Condition::Prone).with_duration(5);
        assert_eq!(timed.merged_with(longer).duration, Some(5));
    }

    #[test]
    fn dying_value_is_capped() {
        assert_eq!(
            Condition::Dying { value: 1 }.with_value(7),
            Condition::Dying { value: 4 }
        );
    }

    #[test]
    fn rest_allow_list() {
        assert!(Condition::Cursed.persists_through_rest());
        assert!(Condition::Drained { value: 1 }.persists_through_rest());
        assert!(!Condition::Frightened { value: 1 }.persists_through_rest());
        assert!(!Condition::Prone.persists_through_rest());
    }
}
