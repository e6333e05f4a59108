//! Spellcasting resources: slots, the focus pool and innate spell charges.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Slots for one spell rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlotPool {
    pub max: u32,
    #[serde(default)]
    pub used: u32,
}

impl SlotPool {
    pub fn new(max: u32) -> Self {
        Self { max, used: 0 }
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }

    pub fn clamp(&mut self) {
        self.used = self.used.min(self.max);
    }
}

/// Focus points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusPool {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub max: u32,
}

impl FocusPool {
    /// A focus pool never holds more than three points.
    pub const CAP: u32 = 3;

    pub fn new(current: u32, max: u32) -> Self {
        let mut pool = Self { current, max };
        pool.clamp();
        pool
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn clamp(&mut self) {
        self.max = self.max.min(Self::CAP);
        self.current = self.current.min(self.max);
    }
}

/// An innate spell with its daily charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InnateSpell {
    pub spell_id: String,
    /// Absent means at will
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_per_day: Option<u32>,
    #[serde(default)]
    pub used: u32,
}

impl InnateSpell {
    pub fn new(spell_id: impl Into<String>, uses_per_day: Option<u32>) -> Self {
        Self {
            spell_id: spell_id.into(),
            uses_per_day,
            used: 0,
        }
    }

    pub fn is_at_will(&self) -> bool {
        self.uses_per_day.is_none()
    }

    pub fn clamp(&mut self) {
        match self.uses_per_day {
            Some(max) => self.used = self.used.min(max),
            None => self.used = 0,
        }
    }
}

/// Everything the character spends to cast spells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellcastingState {
    /// Spell rank to slot pool
    #[serde(default)]
    pub slots: BTreeMap<u8, SlotPool>,
    #[serde(default)]
    pub focus: FocusPool,
    #[serde(default)]
    pub innate: Vec<InnateSpell>,
    /// Spell ids the character knows or has prepared
    #[serde(default)]
    pub known: Vec<String>,
}

impl SpellcastingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slots(mut self, rank: u8, max: u32) -> Self {
        self.slots.insert(rank, SlotPool::new(max));
        self
    }

    pub fn with_focus(mut self, current: u32, max: u32) -> Self {
        self.focus = FocusPool::new(current, max);
        self
    }

    pub fn with_innate(mut self, spell: InnateSpell) -> Self {
        self.innate.push(spell);
        self
    }

    pub fn innate_mut(&mut self, spell_id: &str) -> Option<&mut InnateSpell> {
        self.innate.iter_mut().find(|s| s.spell_id == spell_id)
    }

    /// Re-apply every clamp.
    pub fn clamp(&mut self) {
        for pool in self.slots.values_mut() {
            pool.clamp();
        }
        self.focus.clamp();
        for spell in &mut self.innate {
            spell.clamp();
        }
    }
}
