//! Modifier targets and aggregated modifier sets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Ability, SaveKind};
use crate::DomainError;

/// What a penalty or bonus applies to.
///
/// Serializes as `attack`, `skill:<ability>`, `ac`, `perception`,
/// `save:<kind>` or `dc`, so it can key a JSON object directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierTarget {
    Attack,
    /// Every skill keyed off the given ability
    Skill(Ability),
    Ac,
    Perception,
    Save(SaveKind),
    /// Spell DC and class DC
    Dc,
}

impl ModifierTarget {
    /// Targets that make up "all checks and DCs".
    pub fn all_checks_and_dcs() -> Vec<ModifierTarget> {
        let mut targets = vec![ModifierTarget::Attack];
        targets.extend(Ability::all().into_iter().map(ModifierTarget::Skill));
        targets.push(ModifierTarget::Ac);
        targets.push(ModifierTarget::Perception);
        targets.extend(SaveKind::all().into_iter().map(ModifierTarget::Save));
        targets.push(ModifierTarget::Dc);
        targets
    }
}

impl fmt::Display for ModifierTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModifierTarget::Attack => f.write_str("attack"),
            ModifierTarget::Skill(ability) => write!(f, "skill:{}", ability.id()),
            ModifierTarget::Ac => f.write_str("ac"),
            ModifierTarget::Perception => f.write_str("perception"),
            ModifierTarget::Save(kind) => write!(f, "save:{}", kind.id()),
            ModifierTarget::Dc => f.write_str("dc"),
        }
    }
}

impl FromStr for ModifierTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.split_once(':') {
            Some(("skill", ability)) => Ok(ModifierTarget::Skill(ability.parse()?)),
            Some(("save", kind)) => Ok(ModifierTarget::Save(kind.parse()?)),
            Some(_) => Err(DomainError::parse(format!("Unknown modifier target: {}", s))),
            None => match s.as_str() {
                "attack" => Ok(ModifierTarget::Attack),
                "ac" => Ok(ModifierTarget::Ac),
                "perception" => Ok(ModifierTarget::Perception),
                "dc" => Ok(ModifierTarget::Dc),
                _ => Err(DomainError::parse(format!("Unknown modifier target: {}", s))),
            },
        }
    }
}

impl Serialize for ModifierTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModifierTarget {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single signed adjustment to one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetedModifier {
    pub target: ModifierTarget,
    pub value: i32,
}

impl TargetedModifier {
    pub fn new(target: ModifierTarget, value: i32) -> Self {
        Self { target, value }
    }
}

/// Net adjustment per target after stacking rules have been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(BTreeMap<ModifierTarget, i32>);

impl ModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net modifier for a target, 0 when nothing applies.
    pub fn get(&self, target: ModifierTarget) -> i32 {
        self.0.get(&target).copied().unwrap_or(0)
    }

    /// Add to a target; entries that net to zero are dropped.
    pub fn add(&mut self, target: ModifierTarget, value: i32) {
        let total = self.get(target) + value;
        if total == 0 {
            self.0.remove(&target);
        } else {
            self.0.insert(target, total);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModifierTarget, &i32)> {
        self.0.iter()
    }
}
