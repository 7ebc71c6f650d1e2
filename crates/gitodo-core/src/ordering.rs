use crate::types::{TodoCell, TodoItem};
use std::cmp::Ordering;

/// Display order: incomplete before complete, then oldest status change first.
///
/// `order` never participates. A freshly created or freshly toggled item has
/// the newest timestamp in its group, so it settles at the group's tail.
pub fn display_cmp(a: &TodoItem, b: &TodoItem) -> Ordering {
    a.is_complete
        .cmp(&b.is_complete)
        .then_with(|| a.status_changed_at.cmp(&b.status_changed_at))
}

/// Stable sort: items with equal keys keep the order the store returned them in.
pub fn sort_for_display(cells: &mut [TodoCell]) {
    cells.sort_by(|a, b| display_cmp(&a.item, &b.item));
}

pub fn incomplete_count(cells: &[TodoCell]) -> usize {
    cells.iter().filter(|c| !c.is_complete()).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
