//! Pathfinder Second Edition rules.
//!
//! Each calculator owns one slice of the sheet. [`CharacterRecalculator`]
//! runs them in dependency order; the rest are exposed for named operations
//! that touch a single slice (casting, shields, rest).

mod abilities;
mod conditions;
mod defense;
mod encumbrance;
mod proficiency;
mod recalculator;
mod rest;
mod spellcasting;
mod statistics;

pub use abilities::{AbilityScoreResolver, BOOST_SOFT_CAP};
pub use conditions::{condition_penalties, ConditionModifierAggregator, PenaltyFamily};
pub use defense::{ArmorProfile, DefenseCalculator, UNCAPPED_DEX};
pub use encumbrance::{
    EncumbranceCalculator, BASE_CAPACITY, ENCUMBERED_SPEED_PENALTY, MIN_SPEED,
};
pub use proficiency::{ProficiencyEngine, ProficiencyWithoutLevel};
pub use recalculator::{CharacterRecalculator, DEFAULT_SPEED, MAX_LEVEL};
pub use rest::{treat_wounds_base_healing, treat_wounds_healing, RestPolicy, RestResolver};
pub use spellcasting::{SpellcastingResourceManager, CANTRIP_RANK};
pub use statistics::{max_hit_points, CheckContext, MIN_MAX_HP};
