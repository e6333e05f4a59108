//! Value objects - immutable, validated building blocks of the snapshot.

mod ability;
mod bulk;
mod degree;
mod modifier;
mod proficiency;

pub use ability::{ability_modifier, Ability, AbilityScoreSet};
pub use bulk::Bulk;
pub use degree::{determine_success, DegreeOfSuccess};
pub use modifier::{ModifierSet, ModifierTarget, TargetedModifier};
pub use proficiency::{
    ArmorCategory, ProficiencyRank, ProficiencyTrack, SaveKind, Skill, WeaponCategory,
};
