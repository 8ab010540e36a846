//! Change notifications for the host UI.

use crate::shapes::ObjectKey;
use std::fmt;

/// Something the host may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ObjectAdded(ObjectKey),
    ObjectRemoved(ObjectKey),
    ObjectModified(ObjectKey),
    SelectionCreated(Vec<ObjectKey>),
    SelectionUpdated(Vec<ObjectKey>),
    SelectionCleared,
    HistoryChanged { can_undo: bool, can_redo: bool },
    SceneLoaded,
    ViewportChanged,
    GuidesChanged,
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Queues events during an operation and delivers them afterwards, so
/// listeners never observe a half-applied change.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    pending: Vec<EditorEvent>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.pending)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: EditorEvent) {
        self.pending.push(event);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Deliver queued events in order.
    pub fn dispatch(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for (_, listener) in &mut self.listeners {
                listener(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_events_are_queued_until_dispatch() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&seen);
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        bus.emit(EditorEvent::SceneLoaded);
        bus.emit(EditorEvent::SelectionCleared);
        assert!(seen.borrow().is_empty());

        bus.dispatch();
        assert_eq!(
            *seen.borrow(),
            vec![EditorEvent::SceneLoaded, EditorEvent::SelectionCleared]
        );
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let sink = Rc::clone(&count);
        let id = bus.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(EditorEvent::ViewportChanged);
        bus.dispatch();
        assert_eq!(*count.borrow(), 0);
    }
}
