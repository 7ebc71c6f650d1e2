use crate::error::StoreError;
use crate::types::{ContextId, TodoId, TodoItem};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage for todo items, scoped by repository context.
///
/// Stores own the `order` field: after any structural change every item in
/// the affected context has `order` equal to its position.
pub trait TodoStore {
    fn fetch_all(&self, context: ContextId) -> StoreResult<Vec<TodoItem>>;

    /// Add `item` at the end of `context`.
    fn append(&mut self, item: TodoItem, context: ContextId) -> StoreResult<()>;

    /// Insert `item` directly below `after`, in whatever context holds it.
    /// The new item takes `after`'s `status_changed_at`, so the stable display
    /// sort keeps it right under its reference.
    fn append_after(&mut self, item: TodoItem, after: TodoId) -> StoreResult<()>;

    /// Replace text and completion of the stored item with the same id.
    /// A completion change restamps `status_changed_at`; `order` is kept.
    fn update(&mut self, item: &TodoItem) -> StoreResult<()>;

    fn delete(&mut self, id: TodoId) -> StoreResult<()>;

    /// Flip completion and stamp `status_changed_at` with the current time.
    fn toggle_complete_status(&mut self, id: TodoId) -> StoreResult<()>;
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Wall clock that never hands out the same instant twice.
///
/// Display order breaks ties on `status_changed_at`, so two stamps taken in
/// the same tick would make ordering depend on store position.
#[derive(Debug, Default, Clone)]
pub struct StatusClock {
    last: Option<DateTime<Utc>>,
}

impl StatusClock {
    pub fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last = Some(next);
        next
    }

    /// Never stamp at or before `at`. Loaded data may carry stamps from a
    /// clock that ran ahead of this one.
    pub fn observe(&mut self, at: DateTime<Utc>) {
        match self.last {
            Some(last) if last >= at => {}
            _ => self.last = Some(at),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTodoStore
// ---------------------------------------------------------------------------

/// In-process store holding one ordered list per context.
#[derive(Debug, Default, Clone)]
pub struct MemoryTodoStore {
    lists: BTreeMap<ContextId, Vec<TodoItem>>,
    clock: StatusClock,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a context's list wholesale, keeping each item's timestamps.
    /// Later stamps from this store sort after everything seeded.
    pub fn seed(&mut self, context: ContextId, items: Vec<TodoItem>) {
        let mut items = items;
        if let Some(newest) = items.iter().map(|t| t.status_changed_at).max() {
            self.clock.observe(newest);
        }
        renumber(&mut items);
        self.lists.insert(context, items);
    }

    pub fn contexts(&self) -> impl Iterator<Item = ContextId> + '_ {
        self.lists.keys().copied()
    }

    /// Context currently holding `id`.
    pub fn context_of(&self, id: TodoId) -> Option<ContextId> {
        self.locate(id).map(|(ctx, _)| ctx)
    }

    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        let (ctx, idx) = self.locate(id)?;
        self.lists.get(&ctx).and_then(|list| list.get(idx))
    }

    pub(crate) fn list(&self, context: ContextId) -> &[TodoItem] {
        self.lists.get(&context).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn remove_context(&mut self, context: ContextId) -> Vec<TodoItem> {
        self.lists.remove(&context).unwrap_or_default()
    }

    fn locate(&self, id: TodoId) -> Option<(ContextId, usize)> {
        self.lists.iter().find_map(|(ctx, list)| {
            list.iter().position(|t| t.id == id).map(|idx| (*ctx, idx))
        })
    }

    fn slot_mut(&mut self, id: TodoId) -> StoreResult<&mut TodoItem> {
        let (ctx, idx) = self.locate(id).ok_or(StoreError::NotFound(id))?;
        self.lists
            .get_mut(&ctx)
            .and_then(|list| list.get_mut(idx))
            .ok_or(StoreError::NotFound(id))
    }
}

fn renumber(items: &mut [TodoItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.order = i;
    }
}

impl TodoStore for MemoryTodoStore {
    fn fetch_all(&self, context: ContextId) -> StoreResult<Vec<TodoItem>> {
        Ok(self.list(context).to_vec())
    }

    fn append(&mut self, item: TodoItem, context: ContextId) -> StoreResult<()> {
        let mut item = item;
        item.status_changed_at = self.clock.stamp();
        let list = self.lists.entry(context).or_default();
        item.order = list.len();
        list.push(item);
        Ok(())
    }

    fn append_after(&mut self, item: TodoItem, after: TodoId) -> StoreResult<()> {
        let (ctx, idx) = self.locate(after).ok_or(StoreError::NotFound(after))?;
        let list = self.lists.entry(ctx).or_default();
        let mut item = item;
        item.status_changed_at = list[idx].status_changed_at;
        list.insert(idx + 1, item);
        renumber(list);
        Ok(())
    }

    fn update(&mut self, item: &TodoItem) -> StoreResult<()> {
        let stamp = self.clock.stamp();
        let slot = self.slot_mut(item.id)?;
        slot.text = item.text.clone();
        if slot.is_complete != item.is_complete {
            slot.is_complete = item.is_complete;
            slot.status_changed_at = stamp;
        }
        Ok(())
    }

    fn delete(&mut self, id: TodoId) -> StoreResult<()> {
        let (ctx, idx) = self.locate(id).ok_or(StoreError::NotFound(id))?;
        if let Some(list) = self.lists.get_mut(&ctx) {
            list.remove(idx);
            renumber(list);
        }
        Ok(())
    }

    fn toggle_complete_status(&mut self, id: TodoId) -> StoreResult<()> {
        let stamp = self.clock.stamp();
        let slot = self.slot_mut(id)?;
        slot.is_complete = !slot.is_complete;
        slot.status_changed_at = stamp;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
