//! Outcomes of named sheet operations.
//!
//! Every operation that can be silently refused reports what happened, so the
//! host can log it; a `Rejected` outcome always means the snapshot is
//! unchanged.

use serde::{Deserialize, Serialize};

/// Outcome of a rest activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RestOutcome {
    /// Treat Wounds resolved (critical failure heals 0 but still counts)
    TreatedWounds { healed: i32, new_hp: i32 },
    Refocused { focus_points: u32 },
    LongRested { hp: i32, cleared_conditions: usize },
    Rejected { reason: RestRejection },
}

impl RestOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, RestOutcome::Rejected { .. })
    }
}

/// Why a rest activity was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RestRejection {
    CooldownActive { remaining_minutes: i64 },
    /// Treat Wounds only supports DC 15, 20, 30 and 40
    UnsupportedDc { dc: u32 },
    FocusPoolFull,
}

/// Outcome of a shield action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ShieldOutcome {
    Raised,
    Lowered,
    Damaged {
        absorbed: u32,
        dealt: u32,
        remaining_hp: u32,
        broken: bool,
        destroyed: bool,
    },
    Repaired { restored: u32, current_hp: u32 },
    Rejected { reason: ShieldRejection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShieldRejection {
    NoShield,
    /// The shield's id is not in the reference tables
    UnknownShield,
    Broken,
    Destroyed,
}

/// Outcome of spending a spellcasting or custom resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResourceOutcome {
    Spent { remaining: u32 },
    /// Cantrips and at-will effects are not tracked
    Exempt,
    Exhausted,
    /// Nothing by that rank or id exists on the sheet
    NotFound,
}

impl ResourceOutcome {
    pub fn is_spent(&self) -> bool {
        matches!(self, ResourceOutcome::Spent { .. })
    }
}

/// Outcome of adding a buff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuffOutcome {
    Added,
    /// A buff with the same id was overwritten
    Replaced,
    /// Duration 0; nothing changed
    Expired,
}

impl BuffOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, BuffOutcome::Expired)
    }
}
