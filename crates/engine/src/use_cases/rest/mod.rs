//! Rest use cases: Treat Wounds, Refocus and the daily long rest.
//!
//! Cooldowns are measured against the injected clock so tests can pin time.

mod error;

pub use error::RestError;

use std::sync::Arc;

use pathsheet_domain::{CharacterId, DegreeOfSuccess, RestOutcome, RestResolver};

use crate::infrastructure::ports::ClockPort;
use crate::use_cases::character_sheet::{CharacterSheetUseCases, SheetUpdate};

/// Container for rest use cases.
pub struct RestUseCases {
    sheets: Arc<CharacterSheetUseCases>,
    clock: Arc<dyn ClockPort>,
    resolver: RestResolver,
}

impl RestUseCases {
    pub fn new(
        sheets: Arc<CharacterSheetUseCases>,
        clock: Arc<dyn ClockPort>,
        resolver: RestResolver,
    ) -> Self {
        Self {
            sheets,
            clock,
            resolver,
        }
    }

    /// Treat Wounds against `dc` with a degree of success rolled at the table.
    pub async fn treat_wounds(
        &self,
        id: CharacterId,
        dc: u32,
        degree: DegreeOfSuccess,
    ) -> Result<SheetUpdate<RestOutcome>, RestError> {
        let now = self.clock.now();
        let resolver = self.resolver;
        let update = self
            .sheets
            .apply(id, "treat_wounds", |character, _| {
                Ok(resolver.treat_wounds(character, dc, degree, now))
            })
            .await?;
        log_outcome(id, "treat_wounds", &update.outcome);
        Ok(update)
    }

    pub async fn refocus(&self, id: CharacterId) -> Result<SheetUpdate<RestOutcome>, RestError> {
        let now = self.clock.now();
        let resolver = self.resolver;
        let update = self
            .sheets
            .apply(id, "refocus", |character, _| Ok(resolver.refocus(character, now)))
            .await?;
        log_outcome(id, "refocus", &update.outcome);
        Ok(update)
    }

    /// Full night's rest: HP, slots, focus and daily resources refill and
    /// temporary conditions clear.
    pub async fn long_rest(&self, id: CharacterId) -> Result<SheetUpdate<RestOutcome>, RestError> {
        let resolver = self.resolver;
        let update = self
            .sheets
            .apply(id, "long_rest", |character, recalculator| {
                resolver.long_rest(character, recalculator)
            })
            .await?;
        log_outcome(id, "long_rest", &update.outcome);
        Ok(update)
    }
}

fn log_outcome(id: CharacterId, operation: &'static str, outcome: &RestOutcome) {
    match outcome {
        RestOutcome::Rejected { reason } => {
            tracing::warn!(character_id = %id, operation, ?reason, "Rest activity rejected");
        }
        outcome => {
            tracing::info!(character_id = %id, operation, ?outcome, "Rest activity resolved");
        }
    }
}
