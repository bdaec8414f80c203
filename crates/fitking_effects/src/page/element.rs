//! Element identity and description.

use std::fmt;

use crate::layout::Rect;

/// Unique identifier for an element on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Creates a new element ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// Generic block.
    #[default]
    Div,
    /// Generic inline.
    Span,
    /// Page section.
    Section,
    /// Button.
    Button,
    /// Link.
    Anchor,
}

/// Class that opts an arbitrary element into cursor hover feedback.
pub const INTERACTIVE_CLASS: &str = "interactive";

/// Description of an element to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSpec {
    /// Element kind.
    pub tag: Tag,
    /// Accessibility role, if any.
    pub role: Option<String>,
    /// Style classes.
    pub classes: Vec<String>,
    /// Layout bounds; `None` until measured.
    pub bounds: Option<Rect>,
}

impl ElementSpec {
    /// Creates an unmeasured element of the given kind.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Adds a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets layout bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// True for buttons, links, `role="button"` and the opt-in class.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        matches!(self.tag, Tag::Button | Tag::Anchor)
            || self.role.as_deref() == Some("button")
            || self.classes.iter().any(|c| c == INTERACTIVE_CLASS)
    }
}

/// Snapshot of an element delivered with events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementInfo {
    /// Element identifier.
    pub id: ElementId,
    /// Element kind.
    pub tag: Tag,
    /// Layout bounds, if measured.
    pub bounds: Option<Rect>,
    /// Nearest element, itself included, matching the interactive predicate.
    pub closest_interactive: Option<ElementId>,
}

impl ElementInfo {
    /// True if this element itself matches the interactive predicate.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.closest_interactive == Some(self.id)
    }

    /// True if this element or one of its ancestors is interactive.
    #[must_use]
    pub fn within_interactive(&self) -> bool {
        self.closest_interactive.is_some()
    }
}
