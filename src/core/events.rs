//! Batched change notifications.
//!
//! State mutations only enqueue events. Nothing reaches subscribers until the
//! owner calls [`EventBatcher::fire_events`], so a tick or an admission that
//! raises the same event many times produces a single delivery.

use std::fmt;

use crate::core::program::ProgramName;

/// Kind of change a subscriber can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiEventKind {
    /// The process list changed (membership, order or allocation).
    ProcessesUpdated,
    /// A single process changed (threads, active flag, program).
    ProcessUpdated,
    /// A single process made progress.
    ProcessProgressUpdated,
}

/// A queued change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEvent {
    /// What changed.
    pub kind: UiEventKind,
    /// Process the event is about, for per-process kinds.
    pub program: Option<ProgramName>,
}

impl UiEvent {
    /// Process list changed.
    #[must_use]
    pub const fn processes_updated() -> Self {
        Self {
            kind: UiEventKind::ProcessesUpdated,
            program: None,
        }
    }

    /// A process changed.
    #[must_use]
    pub const fn process_updated(program: ProgramName) -> Self {
        Self {
            kind: UiEventKind::ProcessUpdated,
            program: Some(program),
        }
    }

    /// A process made progress.
    #[must_use]
    pub const fn process_progress_updated(program: ProgramName) -> Self {
        Self {
            kind: UiEventKind::ProcessProgressUpdated,
            program: Some(program),
        }
    }
}

/// Subscriber callback.
pub type UiEventHandler = Box<dyn FnMut(&UiEvent) + Send>;

/// Handle returned by [`EventBatcher::add_listener`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    kind: UiEventKind,
    handler: UiEventHandler,
}

/// Coalescing event queue with per-kind subscribers.
#[derive(Default)]
pub struct EventBatcher {
    listeners: Vec<Listener>,
    queued: Vec<UiEvent>,
    next_id: u64,
}

impl fmt::Debug for EventBatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBatcher")
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queued)
            .finish()
    }
}

impl EventBatcher {
    /// Create an empty batcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event.
    pub fn add_listener(&mut self, kind: UiEventKind, handler: UiEventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, kind, handler });
        id
    }

    /// Unsubscribe. Returns false if the id was unknown.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        before != self.listeners.len()
    }

    /// Queue an event. Duplicates of an already queued event are dropped.
    pub fn enqueue_event(&mut self, event: UiEvent) {
        if !self.queued.contains(&event) {
            self.queued.push(event);
        }
    }

    /// Events waiting to be fired.
    #[must_use]
    pub fn pending(&self) -> &[UiEvent] {
        &self.queued
    }

    /// Deliver all queued events in queue order and clear the queue.
    /// Returns the number of events flushed.
    pub fn fire_events(&mut self) -> usize {
        let events = std::mem::take(&mut self.queued);
        for event in &events {
            for listener in self
                .listeners
                .iter_mut()
                .filter(|listener| listener.kind == event.kind)
            {
                (listener.handler)(event);
            }
        }
        events.len()
    }

    /// Drop queued events without delivering them.
    pub fn discard_events(&mut self) {
        self.queued.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_duplicate_events_coalesce() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut batcher = EventBatcher::new();
        let sink = Arc::clone(&seen);
        batcher.add_listener(
            UiEventKind::ProcessesUpdated,
            Box::new(move |event| sink.lock().push(*event)),
        );

        batcher.enqueue_event(UiEvent::processes_updated());
        batcher.enqueue_event(UiEvent::processes_updated());
        batcher.enqueue_event(UiEvent::process_updated(ProgramName::CodeGenerator));

        assert_eq!(batcher.fire_events(), 2);
        assert_eq!(seen.lock().len(), 1);
        assert!(batcher.pending().is_empty());
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let count = Arc::new(Mutex::new(0_u32));
        let mut batcher = EventBatcher::new();
        let counter = Arc::clone(&count);
        let id = batcher.add_listener(
            UiEventKind::ProcessProgressUpdated,
            Box::new(move |_| *counter.lock() += 1),
        );

        batcher.enqueue_event(UiEvent::process_progress_updated(ProgramName::CodeGenerator));
        batcher.fire_events();
        assert!(batcher.remove_listener(id));
        assert!(!batcher.remove_listener(id));
        batcher.enqueue_event(UiEvent::process_progress_updated(ProgramName::CodeGenerator));
        batcher.fire_events();

        assert_eq!(*count.lock(), 1);
    }
}
