//! Listener registration with scoped release.
//!
//! Every listener added to a page is owned by a [`ListenerHandle`]. Dropping
//! the handle removes the listener, so a component that keeps its handles
//! in a field releases them on every exit path: explicit unmount, drop, or
//! unwinding.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::element::{ElementId, ElementInfo};

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// The whole page. Receives every pointer event and all frames.
    Window,
    /// A single element. Receives events whose path includes it.
    Element(ElementId),
}

/// Event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer moved. Bubbles.
    PointerMove,
    /// Pointer button pressed. Bubbles.
    PointerDown,
    /// Pointer button released. Bubbles.
    PointerUp,
    /// Pointer entered an element or one of its descendants. Does not bubble.
    PointerEnter,
    /// Pointer left an element and all of its descendants. Does not bubble.
    PointerLeave,
    /// Pointer moved onto a new innermost element. Delivered to the window
    /// with the new target, which is `None` over empty page.
    PointerOver,
    /// Animation frame.
    Frame,
}

/// An event as seen by a listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageEvent {
    /// What happened.
    pub kind: EventKind,
    /// Pointer position in page coordinates.
    pub pointer: (f32, f32),
    /// Innermost element the event happened on.
    pub target: Option<ElementInfo>,
    /// Element the listener is attached to (`None` for window listeners).
    pub current_target: Option<ElementInfo>,
    /// Seconds since the previous frame (`Frame` only, zero otherwise).
    pub dt: f32,
}

/// Listener callback.
pub type Handler = Box<dyn FnMut(&PageEvent) + Send>;

/// Identifier of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    target: ListenerTarget,
    kind: EventKind,
    handler: Arc<Mutex<Handler>>,
}

/// All listeners of a page, in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        target: ListenerTarget,
        kind: EventKind,
        handler: Handler,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.entries.push(Entry {
            id,
            target,
            kind,
            handler: Arc::new(Mutex::new(handler)),
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drops every listener attached to any of `elements`.
    pub(crate) fn remove_targets(&mut self, elements: &[ElementId]) {
        self.entries.retain(|e| match e.target {
            ListenerTarget::Element(id) => !elements.contains(&id),
            ListenerTarget::Window => true,
        });
    }

    /// Handlers matching `target` and `kind`, cloned so they can run with
    /// the registry unlocked.
    pub(crate) fn matching(
        &self,
        target: ListenerTarget,
        kind: EventKind,
    ) -> Vec<Arc<Mutex<Handler>>> {
        self.entries
            .iter()
            .filter(|e| e.target == target && e.kind == kind)
            .map(|e| Arc::clone(&e.handler))
            .collect()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner of one registered listener. Removes it when dropped.
#[must_use = "dropping the handle removes the listener immediately"]
pub struct ListenerHandle {
    registry: Weak<Mutex<ListenerRegistry>>,
    id: Option<ListenerId>,
}

impl ListenerHandle {
    pub(crate) fn new(registry: &Arc<Mutex<ListenerRegistry>>, id: ListenerId) -> Self {
        Self {
            registry: Arc::downgrade(registry),
            id: Some(id),
        }
    }

    /// Removes the listener now. Further calls do nothing.
    pub fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        // A dead registry means the page is gone and the listener with it.
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(id);
        }
    }

    /// True until the handle has been released.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Handler {
        Box::new(|_| {})
    }

    #[test]
    fn test_handle_drop_removes_listener() {
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let id = registry
            .lock()
            .insert(ListenerTarget::Window, EventKind::PointerMove, noop());
        let handle = ListenerHandle::new(&registry, id);

        assert_eq!(registry.lock().len(), 1);
        drop(handle);
        assert!(registry.lock().is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let id = registry
            .lock()
            .insert(ListenerTarget::Window, EventKind::Frame, noop());
        let mut handle = ListenerHandle::new(&registry, id);

        handle.release();
        handle.release();
        assert!(!handle.is_active());
        assert!(registry.lock().is_empty());
    }

    #[test]
    fn test_handle_outlives_registry() {
        let registry = Arc::new(Mutex::new(ListenerRegistry::new()));
        let id = registry
            .lock()
            .insert(ListenerTarget::Window, EventKind::Frame, noop());
        let handle = ListenerHandle::new(&registry, id);

        drop(registry);
        drop(handle);
    }
}
