//! Entities that live inside the character snapshot.

mod boost_ledger;
mod condition;
mod item;
mod proficiencies;
mod spellcasting;
mod vitals;

pub use boost_ledger::{parse_boosts, BoostLedger, BoostSource, MILESTONE_LEVELS};
pub use condition::{ActiveCondition, Buff, Condition};
pub use item::{ContainerSpec, EquippedItem, Runes, ShieldState};
pub use proficiencies::Proficiencies;
pub use spellcasting::{FocusPool, InnateSpell, SlotPool, SpellcastingState};
pub use vitals::{CustomResource, HitPoints, ResourceFrequency, RestTimers};
