//! Pathsheet domain: the character snapshot and the rules that derive its
//! numbers.
//!
//! Everything here is pure. Callers hand in a snapshot plus reference tables
//! and get a new snapshot back; clocks, storage and logging live in the
//! engine crate.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod reference;
pub mod value_objects;

pub use aggregates::{Character, DerivedStats, EncumbranceSummary, ShieldStatus, Strike};
pub use entities::{
    ActiveCondition, BoostLedger, BoostSource, Buff, Condition, CustomResource, EquippedItem,
    HitPoints, Proficiencies, ResourceFrequency, Runes, ShieldState, SpellcastingState,
};
pub use error::DomainError;
pub use events::{
    BuffOutcome, ResourceOutcome, RestOutcome, RestRejection, ShieldOutcome, ShieldRejection,
};
pub use game_systems::{
    CharacterRecalculator, ConditionModifierAggregator, DefenseCalculator, ProficiencyEngine,
    RestPolicy, RestResolver, SpellcastingResourceManager,
};
pub use ids::CharacterId;
pub use reference::ReferenceTables;
pub use value_objects::{
    Ability, AbilityScoreSet, DegreeOfSuccess, ModifierTarget, ProficiencyRank, SaveKind, Skill,
};
