//! Spell slots, focus points, innate charges and custom resources.

use std::collections::BTreeMap;

use crate::entities::{CustomResource, FocusPool, ResourceFrequency, SlotPool, SpellcastingState};
use crate::events::ResourceOutcome;
use crate::reference::{ClassEntry, ReferenceTables};

/// Rank 0 holds cantrips, which never consume anything.
pub const CANTRIP_RANK: u8 = 0;

pub struct SpellcastingResourceManager;

impl SpellcastingResourceManager {
    /// Spend a slot of `rank`.
    pub fn cast_from_slot(state: &mut SpellcastingState, rank: u8) -> ResourceOutcome {
        if rank == CANTRIP_RANK {
            return ResourceOutcome::Exempt;
        }
        let Some(pool) = state.slots.get_mut(&rank) else {
            return ResourceOutcome::NotFound;
        };
        if pool.remaining() == 0 {
            return ResourceOutcome::Exhausted;
        }
        pool.used += 1;
        ResourceOutcome::Spent {
            remaining: pool.remaining(),
        }
    }

    /// Spend one focus point.
    pub fn cast_focus_spell(state: &mut SpellcastingState) -> ResourceOutcome {
        let focus = &mut state.focus;
        if focus.current == 0 {
            return ResourceOutcome::Exhausted;
        }
        focus.current -= 1;
        ResourceOutcome::Spent {
            remaining: focus.current,
        }
    }

    /// Regain one focus point. Returns `false` when the pool is already full.
    pub fn restore_focus_point(focus: &mut FocusPool) -> bool {
        if focus.is_full() {
            return false;
        }
        focus.current += 1;
        true
    }

    /// Spend a daily charge of an innate spell.
    pub fn cast_innate(
        state: &mut SpellcastingState,
        spell_id: &str,
        tables: &ReferenceTables,
    ) -> ResourceOutcome {
        let is_cantrip = tables.spell(spell_id).is_some_and(|spell| spell.cantrip);
        let Some(spell) = state.innate_mut(spell_id) else {
            return ResourceOutcome::NotFound;
        };
        let Some(per_day) = spell.uses_per_day else {
            return ResourceOutcome::Exempt;
        };
        if is_cantrip {
            return ResourceOutcome::Exempt;
        }
        if spell.used >= per_day {
            return ResourceOutcome::Exhausted;
        }
        spell.used += 1;
        ResourceOutcome::Spent {
            remaining: per_day - spell.used,
        }
    }

    /// Spend `amount` of a custom resource; all or nothing.
    pub fn spend_resource(
        resources: &mut [CustomResource],
        id: &str,
        amount: u32,
    ) -> ResourceOutcome {
        let Some(resource) = resources.iter_mut().find(|r| r.id == id) else {
            return ResourceOutcome::NotFound;
        };
        if resource.current < amount {
            return ResourceOutcome::Exhausted;
        }
        resource.spend(amount);
        ResourceOutcome::Spent {
            remaining: resource.current,
        }
    }

    /// Rebuild slot maxima from the class progression.
    ///
    /// Classes without a progression leave the sheet's slots alone so
    /// hand-tracked casters keep working. `used` is preserved and clamped.
    pub fn apply_slot_progression(state: &mut SpellcastingState, class: Option<&ClassEntry>, level: u8) {
        let Some(class) = class.filter(|c| !c.spell_slots.is_empty()) else {
            return;
        };
        let row = class.slots_at(level).cloned().unwrap_or_default();
        let previous = std::mem::take(&mut state.slots);
        state.slots = row
            .into_iter()
            .filter(|(rank, max)| *rank != CANTRIP_RANK && *max > 0)
            .map(|(rank, max)| {
                let used = previous.get(&rank).map(|pool| pool.used).unwrap_or(0);
                (rank, SlotPool { max, used: used.min(max) })
            })
            .collect::<BTreeMap<_, _>>();
    }

    /// Long-rest refresh of every spellcasting pool.
    pub fn refresh(state: &mut SpellcastingState) {
        for pool in state.slots.values_mut() {
            pool.used = 0;
        }
        for spell in &mut state.innate {
            spell.used = 0;
        }
        state.focus.clamp();
        state.focus.current = state.focus.max;
    }

    /// Long-rest refresh of daily custom resources.
    pub fn refresh_daily(resources: &mut [CustomResource]) {
        for resource in resources
            .iter_mut()
            .filter(|r| r.frequency == ResourceFrequency::Daily)
        {
            resource.current = resource.max;
        }
    }
}
