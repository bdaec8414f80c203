//! Page model the effects run against.
//!
//! A [`Page`] owns an element tree, the viewport size, the pointer position
//! and the listener registry. It plays the role of the browser event
//! system: input is fed in through [`Page::pointer_move`],
//! [`Page::pointer_down`], [`Page::pointer_up`] and [`Page::tick`], and the
//! page delivers events to listeners.
//!
//! ## Delivery order
//!
//! ```text
//! pointer_move(x, y)
//!   ├─ hit test → new innermost element
//!   ├─ PointerLeave  elements no longer under the pointer, innermost first
//!   ├─ PointerEnter  elements newly under the pointer, outermost first
//!   ├─ PointerOver   window, with the new target
//!   └─ PointerMove   target → ancestors → window
//! ```
//!
//! Within one target, listeners run in registration order. Handlers run with
//! the registry unlocked, so a handler may add or release listeners.

mod element;
mod listener;
mod tree;

use std::sync::Arc;

use parking_lot::Mutex;

pub use element::{ElementId, ElementInfo, ElementSpec, Tag, INTERACTIVE_CLASS};
pub use listener::{
    EventKind, Handler, ListenerHandle, ListenerId, ListenerRegistry, ListenerTarget, PageEvent,
};
pub use tree::ElementTree;

use crate::error::{PageError, PageResult};
use crate::layout::Rect;

/// Visible area of the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Full-viewport rect at the origin.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// A page: elements, pointer state and listeners.
pub struct Page {
    tree: ElementTree,
    viewport: Viewport,
    pointer: (f32, f32),
    hovered: Option<ElementId>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl Page {
    /// Creates an empty page.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            tree: ElementTree::new(),
            viewport,
            pointer: (0.0, 0.0),
            hovered: None,
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
        }
    }

    /// Returns the viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the element tree.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Last known pointer position.
    #[must_use]
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// Innermost element under the pointer.
    #[must_use]
    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Adds a top-level element.
    pub fn create_element(&mut self, spec: ElementSpec) -> ElementId {
        self.tree.add_root(spec)
    }

    /// Adds an element under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if `parent` does not exist.
    pub fn append_child(&mut self, parent: ElementId, spec: ElementSpec) -> PageResult<ElementId> {
        self.tree
            .add_child(parent, spec)
            .ok_or(PageError::ElementNotFound(parent))
    }

    /// Removes an element, its subtree and every listener attached to them.
    pub fn remove(&mut self, id: ElementId) {
        let removed = self.tree.remove(id);
        if removed.is_empty() {
            return;
        }
        if self.hovered.is_some_and(|h| removed.contains(&h)) {
            self.hovered = None;
        }
        self.listeners.lock().remove_targets(&removed);
    }

    /// Sets layout bounds of an element.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] for an unknown element and
    /// [`PageError::InvalidBounds`] for negative or non-finite sizes.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> PageResult<()> {
        if !(bounds.width.is_finite() && bounds.height.is_finite())
            || bounds.width < 0.0
            || bounds.height < 0.0
        {
            return Err(PageError::InvalidBounds {
                id,
                width: bounds.width,
                height: bounds.height,
            });
        }
        let spec = self
            .tree
            .spec_mut(id)
            .ok_or(PageError::ElementNotFound(id))?;
        spec.bounds = Some(bounds);
        Ok(())
    }

    /// Snapshot of an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<ElementInfo> {
        self.tree.info(id)
    }

    /// Returns true if the element exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.tree.contains(id)
    }

    /// All elements matching `predicate`, in document order.
    pub fn query_all(&self, predicate: impl Fn(&ElementInfo) -> bool) -> Vec<ElementId> {
        self.tree
            .iter_dfs()
            .filter_map(|id| self.tree.info(id))
            .filter(|info| predicate(info))
            .map(|info| info.id)
            .collect()
    }

    /// All elements that match the interactive predicate themselves.
    #[must_use]
    pub fn interactive_elements(&self) -> Vec<ElementId> {
        self.query_all(ElementInfo::is_interactive)
    }

    /// Topmost element whose bounds contain the point.
    ///
    /// Later elements in document order paint over earlier ones, so the
    /// search runs in reverse.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<ElementId> {
        let order: Vec<ElementId> = self.tree.iter_dfs().collect();
        order.into_iter().rev().find(|&id| {
            self.tree
                .spec(id)
                .and_then(|s| s.bounds)
                .is_some_and(|b| b.contains(x, y))
        })
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    /// Registers a listener. It lives as long as the returned handle.
    pub fn add_listener(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        handler: impl FnMut(&PageEvent) + Send + 'static,
    ) -> ListenerHandle {
        let id = self.listeners.lock().insert(target, kind, Box::new(handler));
        ListenerHandle::new(&self.listeners, id)
    }

    /// Number of live listeners on the page.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Moves the pointer onto `target`, firing leave/enter/over events.
    ///
    /// Does nothing if `target` is already the hovered element.
    pub fn hover(&mut self, target: Option<ElementId>) {
        let target = target.filter(|&id| self.tree.contains(id));
        if target == self.hovered {
            return;
        }

        let old_chain = self.hovered.map(|h| self.tree.ancestry(h)).unwrap_or_default();
        let new_chain = target.map(|t| self.tree.ancestry(t)).unwrap_or_default();
        self.hovered = target;
        let target_info = target.and_then(|t| self.tree.info(t));

        for &left in old_chain.iter().filter(|e| !new_chain.contains(e)) {
            self.dispatch(
                ListenerTarget::Element(left),
                EventKind::PointerLeave,
                target_info,
                0.0,
            );
        }
        for &entered in new_chain.iter().rev().filter(|e| !old_chain.contains(e)) {
            self.dispatch(
                ListenerTarget::Element(entered),
                EventKind::PointerEnter,
                target_info,
                0.0,
            );
        }
        self.dispatch(ListenerTarget::Window, EventKind::PointerOver, target_info, 0.0);
    }

    /// Moves the pointer to `(x, y)` in page coordinates.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        let hit = self.hit_test(x, y);
        self.hover(hit);
        self.bubble(EventKind::PointerMove);
    }

    /// Presses the pointer button at the current position.
    pub fn pointer_down(&mut self) {
        self.bubble(EventKind::PointerDown);
    }

    /// Releases the pointer button at the current position.
    pub fn pointer_up(&mut self) {
        self.bubble(EventKind::PointerUp);
    }

    /// Advances animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.dispatch(ListenerTarget::Window, EventKind::Frame, None, dt);
    }

    /// Delivers `kind` to the hovered element, its ancestors, then the window.
    fn bubble(&self, kind: EventKind) {
        let target_info = self.hovered.and_then(|h| self.tree.info(h));
        if let Some(hovered) = self.hovered {
            for id in self.tree.ancestry(hovered) {
                self.dispatch(ListenerTarget::Element(id), kind, target_info, 0.0);
            }
        }
        self.dispatch(ListenerTarget::Window, kind, target_info, 0.0);
    }

    fn dispatch(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        event_target: Option<ElementInfo>,
        dt: f32,
    ) {
        let handlers = self.listeners.lock().matching(target, kind);
        if handlers.is_empty() {
            return;
        }

        let current_target = match target {
            ListenerTarget::Element(id) => self.tree.info(id),
            ListenerTarget::Window => None,
        };
        let event = PageEvent {
            kind,
            pointer: self.pointer,
            target: event_target,
            current_target,
            dt,
        };
        for handler in handlers {
            (handler.lock())(&event);
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("elements", &self.tree.len())
            .field("viewport", &self.viewport)
            .field("pointer", &self.pointer)
            .field("hovered", &self.hovered)
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(
        page: &Page,
        target: ListenerTarget,
        kind: EventKind,
        log: &Arc<Mutex<Vec<String>>>,
        label: &str,
    ) -> ListenerHandle {
        let log = Arc::clone(log);
        let label = label.to_string();
        page.add_listener(target, kind, move |e| {
            log.lock().push(format!("{label}:{:?}", e.kind));
        })
    }

    fn nested_page() -> (Page, ElementId, ElementId) {
        let mut page = Page::default();
        let card = page.create_element(
            ElementSpec::new(Tag::Div).with_bounds(Rect::new(0.0, 0.0, 200.0, 200.0)),
        );
        let button = page
            .append_child(
                card,
                ElementSpec::new(Tag::Button).with_bounds(Rect::new(50.0, 50.0, 50.0, 50.0)),
            )
            .unwrap();
        (page, card, button)
    }

    #[test]
    fn test_hit_test_prefers_innermost() {
        let (page, card, button) = nested_page();

        assert_eq!(page.hit_test(60.0, 60.0), Some(button));
        assert_eq!(page.hit_test(10.0, 10.0), Some(card));
        assert_eq!(page.hit_test(500.0, 10.0), None);
    }

    #[test]
    fn test_enter_leave_across_nesting() {
        let (mut page, card, button) = nested_page();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _handles = [
            recorder(&page, ListenerTarget::Element(card), EventKind::PointerEnter, &log, "card"),
            recorder(&page, ListenerTarget::Element(card), EventKind::PointerLeave, &log, "card"),
            recorder(
                &page,
                ListenerTarget::Element(button),
                EventKind::PointerEnter,
                &log,
                "button",
            ),
            recorder(
                &page,
                ListenerTarget::Element(button),
                EventKind::PointerLeave,
                &log,
                "button",
            ),
        ];

        page.pointer_move(60.0, 60.0);
        page.pointer_move(10.0, 10.0);
        page.pointer_move(500.0, 500.0);

        assert_eq!(
            *log.lock(),
            vec![
                "card:PointerEnter",
                "button:PointerEnter",
                "button:PointerLeave",
                "card:PointerLeave",
            ]
        );
    }

    #[test]
    fn test_move_bubbles_to_window() {
        let (mut page, card, button) = nested_page();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _handles = [
            recorder(&page, ListenerTarget::Window, EventKind::PointerMove, &log, "window"),
            recorder(&page, ListenerTarget::Element(card), EventKind::PointerMove, &log, "card"),
            recorder(
                &page,
                ListenerTarget::Element(button),
                EventKind::PointerMove,
                &log,
                "button",
            ),
        ];

        page.pointer_move(60.0, 60.0);

        assert_eq!(
            *log.lock(),
            vec!["button:PointerMove", "card:PointerMove", "window:PointerMove"]
        );
    }

    #[test]
    fn test_remove_drops_element_listeners() {
        let (mut page, card, button) = nested_page();
        let log = Arc::new(Mutex::new(Vec::new()));
        let _handle = recorder(
            &page,
            ListenerTarget::Element(button),
            EventKind::PointerDown,
            &log,
            "button",
        );
        page.pointer_move(60.0, 60.0);

        page.remove(card);

        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.hovered(), None);
        page.pointer_down();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_set_bounds_validation() {
        let (mut page, card, _) = nested_page();

        assert!(page.set_bounds(card, Rect::new(0.0, 0.0, 10.0, 10.0)).is_ok());
        assert_eq!(
            page.set_bounds(ElementId::new(404), Rect::ZERO),
            Err(PageError::ElementNotFound(ElementId::new(404)))
        );
        assert!(matches!(
            page.set_bounds(card, Rect::new(0.0, 0.0, -1.0, 10.0)),
            Err(PageError::InvalidBounds { .. })
        ));
    }
}
