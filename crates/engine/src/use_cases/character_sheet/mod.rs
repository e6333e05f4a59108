//! Character sheet use cases.
//!
//! Every operation follows the same shape: load the snapshot, bring it up to
//! date, apply one named domain operation, recalculate, save, log.

mod error;

pub use error::CharacterSheetError;

use std::sync::Arc;

use pathsheet_domain::game_systems::{AbilityScoreResolver, SpellcastingResourceManager};
use pathsheet_domain::{
    Ability, ActiveCondition, BoostSource, Buff, BuffOutcome, Character, CharacterId,
    CharacterRecalculator, ConditionModifierAggregator, DefenseCalculator, DomainError,
    ProficiencyEngine, ResourceOutcome, ShieldOutcome,
};

use crate::infrastructure::ports::{CharacterRepo, ReferenceDataPort};

// =============================================================================
// Request / Result Types
// =============================================================================

/// Choices for a brand-new character.
#[derive(Debug, Clone, Default)]
pub struct NewCharacter {
    pub name: String,
    pub level: Option<u8>,
    pub ancestry_id: Option<String>,
    pub heritage_id: Option<String>,
    pub background_id: Option<String>,
    pub class_id: Option<String>,
}

/// The saved snapshot together with what the operation reported.
#[derive(Debug, Clone)]
pub struct SheetUpdate<O> {
    pub character: Character,
    pub outcome: O,
}

// =============================================================================
// Use Cases
// =============================================================================

/// Container for character sheet use cases.
pub struct CharacterSheetUseCases {
    character_repo: Arc<dyn CharacterRepo>,
    reference: Arc<dyn ReferenceDataPort>,
    proficiency: ProficiencyEngine,
}

impl CharacterSheetUseCases {
    pub fn new(
        character_repo: Arc<dyn CharacterRepo>,
        reference: Arc<dyn ReferenceDataPort>,
        proficiency: ProficiencyEngine,
    ) -> Self {
        Self {
            character_repo,
            reference,
            proficiency,
        }
    }

    /// Create, derive and save a new character.
    pub async fn create(&self, request: NewCharacter) -> Result<Character, CharacterSheetError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("character name cannot be empty").into());
        }

        let mut character = Character::new(CharacterId::new(), name);
        if let Some(level) = request.level {
            character = character.with_level(level);
        }
        character.ancestry_id = request.ancestry_id;
        character.heritage_id = request.heritage_id;
        character.background_id = request.background_id;
        character.class_id = request.class_id;

        let character = self.store(character).await?;

        tracing::info!(
            character_id = %character.id,
            name = %character.name,
            level = character.level,
            "Created character"
        );

        Ok(character)
    }

    /// Recalculate and save a snapshot supplied from outside (an import).
    pub async fn import(&self, character: Character) -> Result<Character, CharacterSheetError> {
        let character = self.store(character).await?;
        tracing::info!(character_id = %character.id, "Imported character");
        Ok(character)
    }

    pub async fn get(&self, id: CharacterId) -> Result<Character, CharacterSheetError> {
        self.character_repo
            .get(id)
            .await?
            .ok_or(CharacterSheetError::CharacterNotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<CharacterId>, CharacterSheetError> {
        Ok(self.character_repo.list().await?)
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), CharacterSheetError> {
        self.character_repo.delete(id).await.map_err(|e| {
            if e.is_not_found() {
                CharacterSheetError::CharacterNotFound(id)
            } else {
                e.into()
            }
        })?;
        tracing::info!(character_id = %id, "Deleted character");
        Ok(())
    }

    /// Recompute every derived field and save.
    pub async fn recalculate(&self, id: CharacterId) -> Result<Character, CharacterSheetError> {
        let update = self.apply(id, "recalculate", |_, _| Ok(())).await?;
        tracing::info!(character_id = %id, "Recalculated character");
        Ok(update.character)
    }

    pub async fn set_level(
        &self,
        id: CharacterId,
        level: u8,
    ) -> Result<Character, CharacterSheetError> {
        let update = self
            .apply(id, "set_level", |character, _| {
                character.level = level;
                Ok(())
            })
            .await?;
        tracing::info!(
            character_id = %id,
            level = update.character.level,
            "Set character level"
        );
        Ok(update.character)
    }

    /// Record an ability boost choice.
    ///
    /// `false` means nothing was recorded: the ability id is unknown, the
    /// level is not a milestone, or the background or class does not allow
    /// that ability for this source.
    pub async fn record_boost(
        &self,
        id: CharacterId,
        source: BoostSource,
        ability_id: &str,
    ) -> Result<SheetUpdate<bool>, CharacterSheetError> {
        let update = self
            .apply(id, "record_boost", |character, recalculator| {
                let tables = recalculator.tables();
                let allowed = ability_id.parse::<Ability>().is_ok_and(|ability| {
                    AbilityScoreResolver::accepts(
                        source,
                        ability,
                        tables.background(character.background_id.as_deref()),
                        tables.class(character.class_id.as_deref()),
                    )
                });
                Ok(allowed && character.boosts.record(source, ability_id))
            })
            .await?;
        log_change(id, "record_boost", update.outcome);
        Ok(update)
    }

    // =========================================================================
    // Conditions and buffs
    // =========================================================================

    pub async fn add_condition(
        &self,
        id: CharacterId,
        condition: ActiveCondition,
    ) -> Result<SheetUpdate<bool>, CharacterSheetError> {
        let update = self
            .apply(id, "add_condition", |character, _| {
                Ok(ConditionModifierAggregator::add_condition(
                    &mut character.conditions,
                    condition,
                ))
            })
            .await?;
        tracing::info!(
            character_id = %id,
            condition = condition.id(),
            value = ?condition.condition.value(),
            changed = update.outcome,
            "Applied condition"
        );
        Ok(update)
    }

    pub async fn remove_condition(
        &self,
        id: CharacterId,
        condition_id: &str,
    ) -> Result<SheetUpdate<bool>, CharacterSheetError> {
        let update = self
            .apply(id, "remove_condition", |character, _| {
                Ok(ConditionModifierAggregator::remove_condition(
                    &mut character.conditions,
                    condition_id,
                ))
            })
            .await?;
        log_change(id, "remove_condition", update.outcome);
        Ok(update)
    }

    pub async fn add_buff(
        &self,
        id: CharacterId,
        buff: Buff,
    ) -> Result<SheetUpdate<BuffOutcome>, CharacterSheetError> {
        let buff_id = buff.id.clone();
        let update = self
            .apply(id, "add_buff", |character, _| {
                Ok(ConditionModifierAggregator::add_buff(&mut character.buffs, buff))
            })
            .await?;
        if update.outcome.is_applied() {
            tracing::info!(
                character_id = %id,
                buff = %buff_id,
                replaced = update.outcome == BuffOutcome::Replaced,
                "Applied buff"
            );
        } else {
            tracing::warn!(character_id = %id, buff = %buff_id, "Buff already expired");
        }
        Ok(update)
    }

    pub async fn remove_buff(
        &self,
        id: CharacterId,
        buff_id: &str,
    ) -> Result<SheetUpdate<bool>, CharacterSheetError> {
        let update = self
            .apply(id, "remove_buff", |character, _| {
                Ok(ConditionModifierAggregator::remove_buff(
                    &mut character.buffs,
                    buff_id,
                ))
            })
            .await?;
        log_change(id, "remove_buff", update.outcome);
        Ok(update)
    }

    /// End of round: tick durations and let frightened wear off.
    pub async fn advance_round(&self, id: CharacterId) -> Result<Character, CharacterSheetError> {
        let update = self
            .apply(id, "advance_round", |character, _| {
                ConditionModifierAggregator::advance_round(
                    &mut character.conditions,
                    &mut character.buffs,
                );
                Ok(())
            })
            .await?;
        tracing::info!(
            character_id = %id,
            conditions = update.character.conditions.len(),
            buffs = update.character.buffs.len(),
            "Advanced round"
        );
        Ok(update.character)
    }

    // =========================================================================
    // Shield
    // =========================================================================

    pub async fn raise_shield(
        &self,
        id: CharacterId,
    ) -> Result<SheetUpdate<ShieldOutcome>, CharacterSheetError> {
        self.shield_action(id, "raise_shield", |character, recalculator| {
            DefenseCalculator::raise_shield(character.shield.as_mut(), recalculator.tables())
        })
        .await
    }

    pub async fn lower_shield(
        &self,
        id: CharacterId,
    ) -> Result<SheetUpdate<ShieldOutcome>, CharacterSheetError> {
        self.shield_action(id, "lower_shield", |character, recalculator| {
            DefenseCalculator::lower_shield(character.shield.as_mut(), recalculator.tables())
        })
        .await
    }

    pub async fn damage_shield(
        &self,
        id: CharacterId,
        amount: u32,
    ) -> Result<SheetUpdate<ShieldOutcome>, CharacterSheetError> {
        self.shield_action(id, "damage_shield", |character, recalculator| {
            DefenseCalculator::damage_shield(
                character.shield.as_mut(),
                recalculator.tables(),
                amount,
            )
        })
        .await
    }

    pub async fn repair_shield(
        &self,
        id: CharacterId,
        amount: u32,
    ) -> Result<SheetUpdate<ShieldOutcome>, CharacterSheetError> {
        self.shield_action(id, "repair_shield", |character, recalculator| {
            DefenseCalculator::repair_shield(
                character.shield.as_mut(),
                recalculator.tables(),
                amount,
            )
        })
        .await
    }

    async fn shield_action(
        &self,
        id: CharacterId,
        operation: &'static str,
        action: impl FnOnce(&mut Character, &CharacterRecalculator<'_>) -> ShieldOutcome,
    ) -> Result<SheetUpdate<ShieldOutcome>, CharacterSheetError> {
        let update = self
            .apply(id, operation, |character, recalculator| {
                Ok(action(character, recalculator))
            })
            .await?;
        match &update.outcome {
            ShieldOutcome::Rejected { reason } => {
                tracing::warn!(character_id = %id, operation, ?reason, "Shield action rejected");
            }
            outcome => {
                tracing::info!(character_id = %id, operation, ?outcome, "Shield action applied");
            }
        }
        Ok(update)
    }

    // =========================================================================
    // Spellcasting and resources
    // =========================================================================

    pub async fn cast_spell(
        &self,
        id: CharacterId,
        rank: u8,
    ) -> Result<SheetUpdate<ResourceOutcome>, CharacterSheetError> {
        self.spend(id, "cast_spell", |character, _| {
            SpellcastingResourceManager::cast_from_slot(&mut character.spellcasting, rank)
        })
        .await
    }

    pub async fn cast_focus_spell(
        &self,
        id: CharacterId,
    ) -> Result<SheetUpdate<ResourceOutcome>, CharacterSheetError> {
        self.spend(id, "cast_focus_spell", |character, _| {
            SpellcastingResourceManager::cast_focus_spell(&mut character.spellcasting)
        })
        .await
    }

    pub async fn cast_innate(
        &self,
        id: CharacterId,
        spell_id: &str,
    ) -> Result<SheetUpdate<ResourceOutcome>, CharacterSheetError> {
        self.spend(id, "cast_innate", |character, recalculator| {
            SpellcastingResourceManager::cast_innate(
                &mut character.spellcasting,
                spell_id,
                recalculator.tables(),
            )
        })
        .await
    }

    pub async fn spend_resource(
        &self,
        id: CharacterId,
        resource_id: &str,
        amount: u32,
    ) -> Result<SheetUpdate<ResourceOutcome>, CharacterSheetError> {
        self.spend(id, "spend_resource", |character, _| {
            SpellcastingResourceManager::spend_resource(&mut character.resources, resource_id, amount)
        })
        .await
    }

    async fn spend(
        &self,
        id: CharacterId,
        operation: &'static str,
        action: impl FnOnce(&mut Character, &CharacterRecalculator<'_>) -> ResourceOutcome,
    ) -> Result<SheetUpdate<ResourceOutcome>, CharacterSheetError> {
        let update = self
            .apply(id, operation, |character, recalculator| {
                Ok(action(character, recalculator))
            })
            .await?;
        match &update.outcome {
            ResourceOutcome::Spent { remaining } => {
                tracing::info!(character_id = %id, operation, remaining, "Resource spent");
            }
            ResourceOutcome::Exempt => {
                tracing::info!(character_id = %id, operation, "Untracked cast");
            }
            outcome => {
                tracing::warn!(character_id = %id, operation, ?outcome, "Nothing to spend");
            }
        }
        Ok(update)
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    /// Load, bring up to date, apply `action`, recalculate and save.
    ///
    /// The snapshot is recalculated before `action` runs so operations such
    /// as healing see current maxima even if the stored file was edited by
    /// hand.
    pub(crate) async fn apply<O>(
        &self,
        id: CharacterId,
        operation: &'static str,
        action: impl FnOnce(&mut Character, &CharacterRecalculator<'_>) -> Result<O, DomainError>,
    ) -> Result<SheetUpdate<O>, CharacterSheetError> {
        let tables = self.reference.tables().await?;
        let recalculator = CharacterRecalculator::new(&tables).with_proficiency(self.proficiency);

        let stored = self.get(id).await?;
        let mut character = recalculator.recalculate(&stored)?;
        let outcome = action(&mut character, &recalculator)?;
        let character = recalculator.recalculate(&character)?;
        self.character_repo.save(&character).await?;

        tracing::debug!(
            character_id = %id,
            operation,
            armor_class = character.derived.armor_class,
            max_hp = character.derived.max_hp,
            speed = character.derived.speed,
            bulk = character.derived.encumbrance.current_bulk,
            "Recalculated derived stats"
        );

        Ok(SheetUpdate { character, outcome })
    }

    async fn store(&self, character: Character) -> Result<Character, CharacterSheetError> {
        let tables = self.reference.tables().await?;
        let character = CharacterRecalculator::new(&tables)
            .with_proficiency(self.proficiency)
            .recalculate(&character)?;
        self.character_repo.save(&character).await?;
        Ok(character)
    }
}

fn log_change(id: CharacterId, operation: &'static str, changed: bool) {
    if changed {
        tracing::info!(character_id = %id, operation, "Sheet updated");
    } else {
        tracing::warn!(character_id = %id, operation, "Operation made no change");
    }
}
