//! Game system rules.
//!
//! Only Pathfinder Second Edition is modelled. Its calculators are
//! re-exported here so callers can write `game_systems::CharacterRecalculator`.

pub mod pf2e;

pub use pf2e::{
    AbilityScoreResolver, ArmorProfile, CharacterRecalculator, CheckContext,
    ConditionModifierAggregator, DefenseCalculator, EncumbranceCalculator, ProficiencyEngine,
    ProficiencyWithoutLevel, RestPolicy, RestResolver, SpellcastingResourceManager,
};
