//! Degrees of success.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Four degrees of success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DegreeOfSuccess {
    /// Miss DC by 10+ OR natural 1 that fails
    CriticalFailure,
    /// Below DC
    Failure,
    /// Meet or beat DC
    Success,
    /// Beat DC by 10+ OR natural 20 that succeeds
    CriticalSuccess,
}

impl DegreeOfSuccess {
    const LADDER: [DegreeOfSuccess; 4] = [
        DegreeOfSuccess::CriticalFailure,
        DegreeOfSuccess::Failure,
        DegreeOfSuccess::Success,
        DegreeOfSuccess::CriticalSuccess,
    ];

    /// Move `steps` rungs up (positive) or down the ladder, stopping at either end.
    pub fn shift(self, steps: i32) -> Self {
        let rung = (self as i32 + steps).clamp(0, 3);
        Self::LADDER[rung as usize]
    }
}

impl FromStr for DegreeOfSuccess {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "criticalfailure" | "critfail" => Ok(DegreeOfSuccess::CriticalFailure),
            "failure" | "fail" => Ok(DegreeOfSuccess::Failure),
            "success" => Ok(DegreeOfSuccess::Success),
            "criticalsuccess" | "crit" => Ok(DegreeOfSuccess::CriticalSuccess),
            _ => Err(DomainError::parse(format!("Unknown degree of success: {}", s))),
        }
    }
}

/// Degree of success for a d20 check.
///
/// Beating the DC by 10 is a critical success and missing it by 10 a
/// critical failure; a natural 20 then moves one rung up and a natural 1 one
/// rung down.
pub fn determine_success(
    roll: i32,
    modifier: i32,
    dc: i32,
    is_nat_20: bool,
    is_nat_1: bool,
) -> DegreeOfSuccess {
    let margin = roll + modifier - dc;
    let base = match margin {
        m if m >= 10 => DegreeOfSuccess::CriticalSuccess,
        m if m >= 0 => DegreeOfSuccess::Success,
        m if m > -10 => DegreeOfSuccess::Failure,
        _ => DegreeOfSuccess::CriticalFailure,
    };
    let natural = i32::from(is_nat_20) - i32::from(is_nat_1 && !is_nat_20);
    base.shift(natural)
}
