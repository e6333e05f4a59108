//! Equipment carried by a character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::Bulk;

/// Container capabilities of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    /// Bulk the container ignores from its contents
    #[serde(default)]
    pub bulk_reduction: u32,
}

impl ContainerSpec {
    /// Reduction at or above this is treated as an extradimensional container.
    pub const MAGICAL_REDUCTION: u32 = 10;

    pub fn with_reduction(bulk_reduction: u32) -> Self {
        Self { bulk_reduction }
    }

    /// Magical containers reduce bulk whether or not they are worn.
    pub fn is_magical(&self) -> bool {
        self.bulk_reduction >= Self::MAGICAL_REDUCTION
    }
}

/// Fundamental runes etched on armor or weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Runes {
    /// Item bonus to AC (armor) or attack (weapon)
    #[serde(default)]
    pub potency: u8,
    /// Extra weapon damage dice
    #[serde(default)]
    pub striking: u8,
    /// Item bonus to saves (armor)
    #[serde(default)]
    pub resilient: u8,
}

impl Runes {
    pub const MAX_GRADE: u8 = 3;

    /// Copy with every grade clamped to the legal range.
    pub fn clamped(self) -> Self {
        Self {
            potency: self.potency.min(Self::MAX_GRADE),
            striking: self.striking.min(Self::MAX_GRADE),
            resilient: self.resilient.min(Self::MAX_GRADE),
        }
    }
}

fn default_quantity() -> u32 {
    1
}

/// An item in the character's equipment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquippedItem {
    /// Instance id, unique within this character
    pub id: String,
    /// Reference-table id (armor, weapon or shield); absent for plain gear
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bulk: Bulk,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub worn: bool,
    #[serde(default)]
    pub wielded: bool,
    #[serde(default)]
    pub invested: bool,
    /// Instance id of the container holding this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runes: Option<Runes>,
    /// Free-form player notes (custom names, materials)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<BTreeMap<String, String>>,
}

impl EquippedItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bulk: Bulk) -> Self {
        Self {
            id: id.into(),
            item_id: None,
            name: name.into(),
            bulk,
            quantity: 1,
            worn: false,
            wielded: false,
            invested: false,
            container_id: None,
            container: None,
            runes: None,
            customization: None,
        }
    }

    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn worn(mut self) -> Self {
        self.worn = true;
        self
    }

    pub fn wielded(mut self) -> Self {
        self.wielded = true;
        self
    }

    pub fn inside(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = Some(container_id.into());
        self
    }

    pub fn as_container(mut self, bulk_reduction: u32) -> Self {
        self.container = Some(ContainerSpec::with_reduction(bulk_reduction));
        self
    }

    pub fn with_runes(mut self, runes: Runes) -> Self {
        self.runes = Some(runes);
        self
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    /// Total bulk of the stack, in tenths.
    pub fn total_tenths(&self) -> u32 {
        self.bulk.tenths().saturating_mul(self.quantity)
    }

    pub fn potency(&self) -> i32 {
        self.runes.map(|r| i32::from(r.potency)).unwrap_or(0)
    }
}

/// Hit points and raised state of the character's shield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShieldState {
    /// Reference-table id of the shield
    pub item_id: String,
    pub current_hp: u32,
    #[serde(default)]
    pub raised: bool,
}

impl ShieldState {
    pub fn new(item_id: impl Into<String>, current_hp: u32) -> Self {
        Self {
            item_id: item_id.into(),
            current_hp,
            raised: false,
        }
    }

    /// `floor(max_hp / 2)`.
    pub fn broken_threshold(max_hp: u32) -> u32 {
        max_hp / 2
    }

    pub fn is_destroyed(&self) -> bool {
        self.current_hp == 0
    }

    /// At or below the broken threshold (destroyed shields are also broken).
    pub fn is_broken(&self, max_hp: u32) -> bool {
        self.current_hp <= Self::broken_threshold(max_hp)
    }

    /// Clamp HP into `[0, max_hp]` and drop the raised state if it can no
    /// longer be held.
    pub fn clamp(&mut self, max_hp: u32) {
        self.current_hp = self.current_hp.min(max_hp);
        if self.is_broken(max_hp) {
            self.raised = false;
        }
    }
}
