//! The ordered todo-list state machine behind one list view.
//!
//! [`TodoListController`] turns user intents (append, toggle, edit, delete)
//! into [`TodoStore`] calls, republishes the whole list after every successful
//! mutation, and tells the view which row should take edit focus next.
//!
//! Store failures during an intent are logged and swallowed: the previously
//! published list stays on screen and no event fires.

use crate::error::{GitodoError, Result, StoreError};
use crate::events::{EventEmitter, SubscriptionId, TodoEvent};
use crate::ordering;
use crate::store::TodoStore;
use crate::types::{RepositoryContext, TodoCell, TodoId, TodoItem};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct TodoListController<S: TodoStore> {
    store: S,
    selected: Option<RepositoryContext>,
    items: Arc<[TodoCell]>,
    focused: Option<TodoId>,
    events: EventEmitter,
}

impl<S: TodoStore> TodoListController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            selected: None,
            items: Arc::from(Vec::new()),
            focused: None,
            events: EventEmitter::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(&TodoEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Last published list, in display order.
    pub fn items(&self) -> &[TodoCell] {
        &self.items
    }

    pub fn snapshot(&self) -> Arc<[TodoCell]> {
        Arc::clone(&self.items)
    }

    /// Row at `index` of the last published list.
    ///
    /// Only meaningful right after a list emission; an out-of-range index is
    /// a caller bug.
    pub fn item_at(&self, index: usize) -> Result<&TodoCell> {
        self.items.get(index).ok_or(GitodoError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn selected_context(&self) -> Option<&RepositoryContext> {
        self.selected.as_ref()
    }

    pub fn focused_item_id(&self) -> Option<TodoId> {
        self.focused
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    pub fn select_context(&mut self, context: RepositoryContext) -> Result<()> {
        debug!(context = context.id, "select context");
        self.selected = Some(context);
        self.refresh()
    }

    /// Re-read the selected context and publish it. No-op without a context.
    pub fn refresh(&mut self) -> Result<()> {
        let Some(context) = self.selected.as_ref() else {
            return Ok(());
        };
        let tint_color = context.tint_color;
        let fetched = self
            .store
            .fetch_all(context.id)
            .map_err(GitodoError::StoreRead)?;

        let mut cells: Vec<TodoCell> = fetched
            .into_iter()
            .map(|item| TodoCell { item, tint_color })
            .collect();
        ordering::sort_for_display(&mut cells);

        self.items = Arc::from(cells);
        self.events
            .emit(&TodoEvent::ListChanged(Arc::clone(&self.items)));
        Ok(())
    }

    /// Add a placeholder at the end of the list and focus it.
    ///
    /// The new row is incomplete and carries the newest timestamp, so it is
    /// the last row of the incomplete group: focus goes to
    /// `incomplete_count - 1`.
    pub fn append_item(&mut self) {
        let Some(context) = self.selected.as_ref().map(|c| c.id) else {
            debug!("append_item: no context selected");
            return;
        };
        if let Err(e) = self.store.append(TodoItem::placeholder(), context) {
            log_failure("append_item", &e);
            return;
        }
        if !self.refresh_logged("append_item") {
            return;
        }
        let row = ordering::incomplete_count(&self.items).checked_sub(1);
        self.events.emit(&TodoEvent::FocusRequested(row));
    }

    /// Insert a placeholder directly below `reference` and focus row
    /// `reference.order + 1`. A blank reference swallows the request.
    pub fn append_item_after(&mut self, reference: &TodoItem) {
        if reference.is_blank() {
            debug!(id = %reference.id, "append_item_after: blank reference, ignored");
            return;
        }
        if self.selected.is_none() {
            debug!("append_item_after: no context selected");
            return;
        }
        if let Err(e) = self
            .store
            .append_after(TodoItem::placeholder(), reference.id)
        {
            log_failure("append_item_after", &e);
            return;
        }
        if !self.refresh_logged("append_item_after") {
            return;
        }
        self.events
            .emit(&TodoEvent::FocusRequested(Some(reference.order + 1)));
    }

    /// Return key on the row `id` while it holds `text`.
    pub fn return_pressed(&mut self, id: TodoId, text: &str) {
        let Some(mut reference) = self.find(id).map(|c| c.item.clone()) else {
            debug!(%id, "return_pressed: item not in current list");
            return;
        };
        reference.text = text.to_string();
        self.append_item_after(&reference);
    }

    pub fn toggle_complete(&mut self, id: TodoId) {
        if let Err(e) = self.store.toggle_complete_status(id) {
            log_failure("toggle_complete", &e);
            return;
        }
        self.refresh_logged("toggle_complete");
    }

    /// Remove `id`. A store that no longer has it counts as success.
    pub fn delete_item(&mut self, id: TodoId) {
        match self.store.delete(id) {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => debug!(%id, "delete_item: already gone"),
            Err(e) => {
                log_failure("delete_item", &e);
                return;
            }
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
        self.refresh_logged("delete_item");
    }

    pub fn begin_editing(&mut self, id: TodoId) {
        self.focused = Some(id);
    }

    /// Row `id` lost focus holding `new_text`. Blank rows are deleted.
    pub fn end_editing(&mut self, id: TodoId, new_text: Option<&str>) {
        if self.focused == Some(id) {
            self.focused = None;
        }

        let text = match new_text {
            Some(t) if !t.is_empty() => t,
            _ => {
                self.delete_item(id);
                return;
            }
        };

        // A row missing from the snapshot still goes to the store, which
        // reports NotFound if it is really gone.
        let mut item = match self.find(id) {
            Some(cell) => cell.item.clone(),
            None => TodoItem {
                id,
                ..TodoItem::placeholder()
            },
        };
        item.text = text.to_string();
        if let Err(e) = self.store.update(&item) {
            log_failure("end_editing", &e);
            return;
        }
        self.refresh_logged("end_editing");
    }

    /// Persist an in-progress edit without republishing the list.
    pub fn update_item(&mut self, item: &TodoItem) {
        if let Err(e) = self.store.update(item) {
            log_failure("update_item", &e);
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn find(&self, id: TodoId) -> Option<&TodoCell> {
        self.items.iter().find(|c| c.id() == id)
    }

    fn refresh_logged(&mut self, op: &'static str) -> bool {
        match self.refresh() {
            Ok(()) => true,
            Err(e) => {
                warn!(op, error = %e, "refresh after todo operation failed");
                false
            }
        }
    }
}

fn log_failure(op: &'static str, err: &StoreError) {
    warn!(op, error = %err, "todo operation failed");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
