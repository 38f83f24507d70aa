// Property-based tests for tab position planning
//
// Every plan, once applied, must leave an owner's set numbered 1..=N.

use proptest::prelude::*;

use tabs::tabs::services::position::{
    apply, display_order, plan_insert, plan_move, plan_remove, plan_renumber, PositionChange,
    Slot,
};

/// Tab ids 1..=N with arbitrary, possibly duplicated or negative, positions
fn any_slots() -> impl Strategy<Value = Vec<Slot>> {
    prop::collection::vec(-5i32..20, 0..12).prop_map(|positions| {
        positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| (i as i32 + 1, p))
            .collect()
    })
}

fn contiguous_slots() -> impl Strategy<Value = Vec<Slot>> {
    any_slots().prop_map(|mut slots| {
        let plan = plan_renumber(&slots);
        apply(&mut slots, &plan);
        slots
    })
}

fn any_change() -> impl Strategy<Value = PositionChange> {
    prop_oneof![
        Just(PositionChange::Up),
        Just(PositionChange::Down),
        (-3i32..20).prop_map(PositionChange::Absolute),
    ]
}

fn sorted_positions(slots: &[Slot]) -> Vec<i32> {
    let mut positions: Vec<i32> = slots.iter().map(|&(_, p)| p).collect();
    positions.sort_unstable();
    positions
}

fn one_to(n: usize) -> Vec<i32> {
    (1..=n as i32).collect()
}

proptest! {
    /// Renumbering yields 1..=N and keeps the relative order
    #[test]
    fn test_renumber_is_contiguous_and_stable(slots in any_slots()) {
        let before = display_order(&slots);

        let mut renumbered = slots.clone();
        apply(&mut renumbered, &plan_renumber(&slots));

        prop_assert_eq!(sorted_positions(&renumbered), one_to(slots.len()));
        prop_assert_eq!(display_order(&renumbered), before);
    }

    /// A second renumbering writes nothing
    #[test]
    fn test_renumber_is_idempotent(slots in contiguous_slots()) {
        prop_assert!(plan_renumber(&slots).is_empty());
    }

    /// Any move keeps the set contiguous and only reorders the moved tab
    #[test]
    fn test_move_keeps_contiguity(
        slots in contiguous_slots(),
        pick in any::<prop::sample::Index>(),
        change in any_change(),
    ) {
        prop_assume!(!slots.is_empty());
        let tab_id = slots[pick.index(slots.len())].0;

        let mut moved = slots.clone();
        apply(&mut moved, &plan_move(&slots, tab_id, change));

        prop_assert_eq!(sorted_positions(&moved), one_to(slots.len()));

        let others = |order: Vec<i32>| -> Vec<i32> {
            order.into_iter().filter(|&id| id != tab_id).collect()
        };
        prop_assert_eq!(others(display_order(&moved)), others(display_order(&slots)));

        if let PositionChange::Absolute(requested) = change {
            let expected = requested.clamp(1, slots.len() as i32);
            let position = moved.iter().find(|&&(id, _)| id == tab_id).map(|&(_, p)| p);
            prop_assert_eq!(position, Some(expected));
        }
    }

    /// Moving an unknown tab writes nothing
    #[test]
    fn test_move_of_foreign_tab_is_empty(slots in contiguous_slots(), change in any_change()) {
        prop_assert!(plan_move(&slots, 1000, change).is_empty());
    }

    /// Inserting at a requested position shifts the tail by one
    #[test]
    fn test_insert_keeps_contiguity(slots in contiguous_slots(), requested in -3i32..20) {
        let (position, plan) = plan_insert(&slots, Some(requested));
        prop_assert_eq!(position, requested.clamp(1, slots.len() as i32 + 1));

        let mut inserted = slots.clone();
        apply(&mut inserted, &plan);
        inserted.push((1000, position));

        prop_assert_eq!(sorted_positions(&inserted), one_to(slots.len() + 1));
    }

    /// Without a requested position the new tab goes last and nothing moves
    #[test]
    fn test_insert_appends_after_maximum(slots in any_slots()) {
        let (position, plan) = plan_insert(&slots, None);
        let max = slots.iter().map(|&(_, p)| p).max().unwrap_or(0);

        prop_assert_eq!(position, max + 1);
        prop_assert!(plan.is_empty());
    }

    /// Removing a tab closes the gap
    #[test]
    fn test_remove_closes_gap(slots in contiguous_slots(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!slots.is_empty());
        let removed = slots[pick.index(slots.len())].0;

        let mut remaining: Vec<Slot> = slots.iter().copied().filter(|&(id, _)| id != removed).collect();
        let plan = plan_remove(&slots, removed);
        apply(&mut remaining, &plan);

        prop_assert_eq!(sorted_positions(&remaining), one_to(slots.len() - 1));
        prop_assert!(plan.iter().all(|&(id, _)| id != removed));
    }
}
