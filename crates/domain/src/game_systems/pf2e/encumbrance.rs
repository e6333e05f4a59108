//! Bulk load, container reductions and speed.

use std::collections::BTreeSet;

use crate::aggregates::EncumbranceSummary;
use crate::entities::EquippedItem;
use crate::value_objects::Bulk;

/// Bulk capacity before Strength is added.
pub const BASE_CAPACITY: i32 = 5;
/// Speed lost while encumbered, in feet.
pub const ENCUMBERED_SPEED_PENALTY: i32 = 10;
pub const MIN_SPEED: i32 = 5;

const TENTHS: u32 = Bulk::LIGHT_PER_BULK;

pub struct EncumbranceCalculator;

impl EncumbranceCalculator {
    /// Drop container links that would break the one-level contains tree:
    /// self references, unknown targets, targets that are not containers, and
    /// containers placed inside anything.
    pub fn normalize_containers(equipment: &mut [EquippedItem]) {
        let containers: BTreeSet<String> = equipment
            .iter()
            .filter(|item| item.is_container())
            .map(|item| item.id.clone())
            .collect();

        for item in equipment.iter_mut() {
            let valid = match item.container_id.as_deref() {
                None => continue,
                Some(target) => {
                    target != item.id && !item.is_container() && containers.contains(target)
                }
            };
            if !valid {
                item.container_id = None;
            }
        }
    }

    /// Load summary for a Strength modifier.
    pub fn calculate(equipment: &[EquippedItem], strength_modifier: i32) -> EncumbranceSummary {
        let raw: u32 = equipment.iter().map(EquippedItem::total_tenths).sum();

        let reduction: u32 = equipment
            .iter()
            .filter_map(|container| {
                let spec = container.container?;
                if !(spec.is_magical() || container.worn) {
                    return None;
                }
                let contents: u32 = equipment
                    .iter()
                    .filter(|item| item.container_id.as_deref() == Some(container.id.as_str()))
                    .map(EquippedItem::total_tenths)
                    .sum();
                Some(spec.bulk_reduction.saturating_mul(TENTHS).min(contents))
            })
            .sum();

        let current = raw.saturating_sub(reduction);
        let max_bulk = BASE_CAPACITY + strength_modifier;
        let encumbered_threshold = max_bulk - BASE_CAPACITY;
        let current_bulk = whole(current);

        EncumbranceSummary {
            max_bulk,
            encumbered_threshold,
            raw_bulk: whole(raw),
            container_reduction: whole(reduction),
            current_bulk,
            encumbered: current_bulk > encumbered_threshold,
            overloaded: current_bulk > max_bulk,
        }
    }

    /// Land speed after armor and encumbrance.
    pub fn speed(base: i32, armor_speed_penalty: i32, summary: &EncumbranceSummary) -> i32 {
        let mut speed = base + armor_speed_penalty.min(0);
        if summary.encumbered {
            speed -= ENCUMBERED_SPEED_PENALTY;
        }
        speed.max(MIN_SPEED)
    }
}

fn whole(tenths: u32) -> i32 {
    i32::try_from(tenths / TENTHS).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backpack() -> EquippedItem {
        EquippedItem::new("pack", "Backpack", Bulk::Negligible)
            .as_container(2)
            .worn()
    }

    #[test]
    fn backpack_example() {
        // 8 bulk in total, 5 of it inside a worn backpack that ignores 2
        let equipment = vec![
            backpack(),
            EquippedItem::new("armor", "Chain Shirt", Bulk::Whole(2)).worn(),
            EquippedItem::new("sword", "Longsword", Bulk::Whole(1)).wielded(),
            EquippedItem::new("rope", "Rope", Bulk::Whole(1)).inside("pack"),
            EquippedItem::new("rations", "Rations", Bulk::Whole(1))
                .with_quantity(2)
                .inside("pack"),
            EquippedItem::new("tools", "Repair Kit", Bulk::Whole(2)).inside("pack"),
        ];

        let summary = EncumbranceCalculator::calculate(&equipment, 2);

        assert_eq!(summary.max_bulk, 7);
        assert_eq!(summary.encumbered_threshold, 2);
        assert_eq!(summary.raw_bulk, 8);
        assert_eq!(summary.container_reduction, 2);
        assert_eq!(summary.current_bulk, 6);
        assert!(summary.encumbered);
        assert!(!summary.overloaded);
    }

    #[test]
    fn reduction_capped_by_contents() {
        let equipment = vec![
            backpack(),
            EquippedItem::new("rope", "Rope", Bulk::Whole(1)).inside("pack"),
            EquippedItem::new("shield", "Shield", Bulk::Whole(1)),
        ];
        let summary = EncumbranceCalculator::calculate(&equipment, 0);
        assert_eq!(summary.container_reduction, 1);
        assert_eq!(summary.current_bulk, 1);
    }

    #[test]
    fn carried_mundane_container_does_not_reduce() {
        let mut pack = backpack();
        pack.worn = false;
        let equipment = vec![
            pack,
            EquippedItem::new("rope", "Rope", Bulk::Whole(1)).inside("pack"),
        ];
        assert_eq!(
            EncumbranceCalculator::calculate(&equipment, 0).current_bulk,
            1
        );
    }

    #[test]
    fn magical_container_always_reduces() {
        let bag = EquippedItem::new("bag", "Bag of Holding", Bulk::Whole(1)).as_container(25);
        let equipment = vec![
            bag,
            EquippedItem::new("anvil", "Anvil", Bulk::Whole(20)).inside("bag"),
        ];
        let summary = EncumbranceCalculator::calculate(&equipment, 1);
        assert_eq!(summary.current_bulk, 1);
        assert!(!summary.encumbered);
    }

    #[test]
    fn light_items_sum_in_tenths() {
        let equipment = vec![
            EquippedItem::new("arrows", "Arrows", Bulk::Light).with_quantity(19),
            EquippedItem::new("coin", "Coin", Bulk::Negligible).with_quantity(500),
        ];
        let summary = EncumbranceCalculator::calculate(&equipment, 0);
        assert_eq!(summary.raw_bulk, 1);
        assert_eq!(summary.current_bulk, 1);
    }

    #[test]
    fn overloaded_implies_encumbered() {
        let equipment = vec![EquippedItem::new("anvil", "Anvil", Bulk::Whole(20))];
        let summary = EncumbranceCalculator::calculate(&equipment, 1);
        assert!(summary.overloaded);
        assert!(summary.encumbered);
    }

    #[test]
    fn invalid_container_links_are_dropped() {
        let mut equipment = vec![
            backpack(),
            EquippedItem::new("pouch", "Belt Pouch", Bulk::Light)
                .as_container(0)
                .inside("pack"),
            EquippedItem::new("self", "Ouroboros", Bulk::Whole(1)).inside("self"),
            EquippedItem::new("rope", "Rope", Bulk::Whole(1)).inside("sword"),
            EquippedItem::new("torch", "Torch", Bulk::Light).inside("pack"),
        ];
        EncumbranceCalculator::normalize_containers(&mut equipment);

        let links: Vec<Option<&str>> = equipment
            .iter()
            .map(|item| item.container_id.as_deref())
            .collect();
        assert_eq!(links, vec![None, None, None, None, Some("pack")]);
    }

    #[test]
    fn speed_penalties_floor_at_five() {
        let encumbered = EncumbranceSummary {
            encumbered: true,
            ..Default::default()
        };
        assert_eq!(EncumbranceCalculator::speed(25, -5, &encumbered), 10);
        assert_eq!(EncumbranceCalculator::speed(10, -10, &encumbered), 5);
        assert_eq!(
            EncumbranceCalculator::speed(25, 0, &EncumbranceSummary::default()),
            25
        );
    }
}
