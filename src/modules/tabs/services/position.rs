//! Position management over one owner's tab set.
//!
//! Every function takes the owner's current `(id, position)` pairs and returns
//! the assignments to write. Stores apply the returned plan inside their own
//! transaction. After any plan is applied the set is numbered `1..=N`.

/// `(tab id, position)`
pub type Slot = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    /// Move to a 1-based position, clamped to the set
    Absolute(i32),
    Up,
    Down,
}

impl PositionChange {
    /// `mode` is `up`, `down` or anything else for an absolute move
    pub fn from_mode(mode: Option<&str>, value: Option<i32>) -> Option<Self> {
        match mode {
            Some("up") => Some(PositionChange::Up),
            Some("down") => Some(PositionChange::Down),
            _ => value.map(PositionChange::Absolute),
        }
    }
}

/// Current display order: position, then id
pub fn display_order(slots: &[Slot]) -> Vec<i32> {
    let mut sorted = slots.to_vec();
    sorted.sort_by_key(|&(id, position)| (position, id));
    sorted.into_iter().map(|(id, _)| id).collect()
}

/// Renumber `1..=N` keeping the current relative order
pub fn plan_renumber(slots: &[Slot]) -> Vec<Slot> {
    diff(slots, &display_order(slots))
}

/// Move `tab_id` within its set; empty when the tab is not part of `slots`
pub fn plan_move(slots: &[Slot], tab_id: i32, change: PositionChange) -> Vec<Slot> {
    let mut order = display_order(slots);
    let Some(index) = order.iter().position(|&id| id == tab_id) else {
        return Vec::new();
    };

    let target = match change {
        PositionChange::Absolute(position) => clamp_index(position, order.len()),
        PositionChange::Up => index.saturating_sub(1),
        PositionChange::Down => (index + 1).min(order.len() - 1),
    };

    let id = order.remove(index);
    order.insert(target, id);
    diff(slots, &order)
}

/// Position for a new tab and the shifts it causes on its siblings.
///
/// Without a requested position the tab goes after the current maximum and
/// nothing moves. A requested position is clamped to `1..=N+1` and the tabs
/// at or after it move down by one.
pub fn plan_insert(slots: &[Slot], requested: Option<i32>) -> (i32, Vec<Slot>) {
    let Some(requested) = requested else {
        let next = slots.iter().map(|&(_, p)| p).max().unwrap_or(0) + 1;
        return (next, Vec::new());
    };

    let order = display_order(slots);
    let index = clamp_index(requested, order.len() + 1);
    let renumbered: Vec<Slot> = order
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let position = if i < index { i + 1 } else { i + 2 };
            (id, position as i32)
        })
        .collect();

    (index as i32 + 1, changed(slots, renumbered))
}

/// Close the gap left by a removed tab
pub fn plan_remove(slots: &[Slot], removed_id: i32) -> Vec<Slot> {
    let remaining: Vec<Slot> = slots
        .iter()
        .copied()
        .filter(|&(id, _)| id != removed_id)
        .collect();
    plan_renumber(&remaining)
}

fn clamp_index(position: i32, len: usize) -> usize {
    let max = len.max(1) as i32;
    (position.clamp(1, max) - 1) as usize
}

fn diff(slots: &[Slot], order: &[i32]) -> Vec<Slot> {
    let renumbered = order
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, i as i32 + 1))
        .collect();
    changed(slots, renumbered)
}

fn changed(slots: &[Slot], renumbered: Vec<Slot>) -> Vec<Slot> {
    renumbered
        .into_iter()
        .filter(|slot| !slots.contains(slot))
        .collect()
}

/// Apply a plan to a set of slots
pub fn apply(slots: &mut [Slot], plan: &[Slot]) {
    for (id, position) in plan {
        if let Some(slot) = slots.iter_mut().find(|(slot_id, _)| slot_id == id) {
            slot.1 = *position;
        }
    }
}
