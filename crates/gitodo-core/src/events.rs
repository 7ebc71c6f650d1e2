use crate::types::TodoCell;
use std::fmt;
use std::sync::Arc;

/// Something the presentation layer should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoEvent {
    /// Full replacement of the displayed list, already in display order.
    ListChanged(Arc<[TodoCell]>),
    /// Give edit focus to the row at this index, if any.
    FocusRequested(Option<usize>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Listener = Box<dyn FnMut(&TodoEvent)>;

/// Synchronous fan-out to listeners, in subscription order.
#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TodoEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &TodoEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
