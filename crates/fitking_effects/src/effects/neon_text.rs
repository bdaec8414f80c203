//! Neon glow text.
//!
//! Renders a piece of text with a layered coloured shadow. When animated
//! the text fades and slides into place once, and its glow intensifies
//! while the pointer is over it.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use super::{Effect, MountedListeners};
use crate::animation::{Animation, Easing, Transition};
use crate::error::{PageError, PageResult};
use crate::page::{ElementId, EventKind, ListenerTarget, Page};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{Shadow, TextColor, SHADOW_LAYERS};

/// Entrance and hover blend timing.
const TEXT_TRANSITION: Transition = Transition::new(0.6, Easing::EaseOut);
/// Starting vertical offset of the entrance, in pixels.
const ENTRANCE_OFFSET: f32 = 20.0;

/// Caller-supplied options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeonTextProps {
    /// Text to display.
    pub content: String,
    /// Colour family.
    pub color: TextColor,
    /// Whether to play the entrance and hover animations.
    pub animate: bool,
}

impl NeonTextProps {
    /// Animated gradient text.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            color: TextColor::default(),
            animate: true,
        }
    }

    /// Sets the colour family.
    #[must_use]
    pub fn with_color(mut self, color: TextColor) -> Self {
        self.color = color;
        self
    }

    /// Enables or disables animation.
    #[must_use]
    pub fn with_animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }
}

/// Neon text state shared with its listeners.
#[derive(Debug, Clone)]
pub struct NeonTextState {
    color: TextColor,
    opacity: Animation,
    offset: Animation,
    hover_mix: Animation,
    hovered: bool,
    revision: u64,
}

impl NeonTextState {
    /// State for `color`. Animated text starts hidden and below its slot
    /// with the entrance already running; static text starts in place.
    #[must_use]
    pub fn new(color: TextColor, animate: bool) -> Self {
        let (opacity, offset) = if animate {
            let mut opacity = TEXT_TRANSITION.animate(0.0);
            opacity.set_target(1.0);
            let mut offset = TEXT_TRANSITION.animate(ENTRANCE_OFFSET);
            offset.set_target(0.0);
            (opacity, offset)
        } else {
            (TEXT_TRANSITION.animate(1.0), TEXT_TRANSITION.animate(0.0))
        };

        Self {
            color,
            opacity,
            offset,
            hover_mix: TEXT_TRANSITION.animate(0.0),
            hovered: false,
            revision: 0,
        }
    }

    /// Pointer entered the text.
    pub fn pointer_entered(&mut self) {
        self.hovered = true;
        self.hover_mix.set_target(1.0);
        self.revision += 1;
    }

    /// Pointer left the text.
    pub fn pointer_left(&mut self) {
        self.hovered = false;
        self.hover_mix.set_target(0.0);
        self.revision += 1;
    }

    /// Advances by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.opacity.update(dt);
        self.offset.update(dt);
        self.hover_mix.update(dt);
    }

    /// Current opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity.value()
    }

    /// Current vertical offset in pixels.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset.value()
    }

    /// Blend between resting (0) and hover (1) glow.
    #[must_use]
    pub fn hover_mix(&self) -> f32 {
        self.hover_mix.value()
    }

    /// True while hovered.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Colour family.
    #[must_use]
    pub fn color(&self) -> TextColor {
        self.color
    }

    /// Input revision counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Shadow layers at the current hover blend.
    #[must_use]
    pub fn shadows(&self) -> [Shadow; SHADOW_LAYERS] {
        let rest = self.color.resting_shadow();
        let hover = self.color.hover_shadow();
        let t = self.hover_mix.value();
        std::array::from_fn(|i| rest[i].lerp(hover[i], t))
    }
}

/// Neon text mounted on a page element.
pub struct NeonText {
    element: ElementId,
    content: String,
    animate: bool,
    mounted: bool,
    state: Arc<Mutex<NeonTextState>>,
    listeners: MountedListeners,
}

impl NeonText {
    /// Attaches the effect to `element`.
    ///
    /// Static text (`animate == false`) registers no listeners at all.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if the element does not exist.
    pub fn mount(page: &Page, element: ElementId, props: NeonTextProps) -> PageResult<Self> {
        if !page.contains(element) {
            return Err(PageError::ElementNotFound(element));
        }

        let NeonTextProps {
            content,
            color,
            animate,
        } = props;
        let state = Arc::new(Mutex::new(NeonTextState::new(color, animate)));
        let mut listeners = MountedListeners::new();

        if animate {
            let target = ListenerTarget::Element(element);

            let s = Arc::clone(&state);
            listeners.push(page.add_listener(target, EventKind::PointerEnter, move |_| {
                s.lock().pointer_entered();
            }));

            let s = Arc::clone(&state);
            listeners.push(page.add_listener(target, EventKind::PointerLeave, move |_| {
                s.lock().pointer_left();
            }));

            let s = Arc::clone(&state);
            listeners.push(page.add_listener(ListenerTarget::Window, EventKind::Frame, move |e| {
                s.lock().update(e.dt);
            }));
        }

        debug!(%element, ?color, animate, "neon text mounted");
        Ok(Self {
            element,
            content,
            animate,
            mounted: true,
            state,
            listeners,
        })
    }

    /// Element the text is attached to.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Displayed text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the text animates.
    #[must_use]
    pub fn animates(&self) -> bool {
        self.animate
    }

    /// Locks and returns the text state.
    pub fn state(&self) -> MutexGuard<'_, NeonTextState> {
        self.state.lock()
    }
}

impl Effect for NeonText {
    fn name(&self) -> &'static str {
        "neon_text"
    }

    fn render(&self, page: &Page, renderer: &mut UIRenderer) {
        if !self.mounted {
            return;
        }
        let (x, y) = page
            .element(self.element)
            .and_then(|e| e.bounds)
            .map_or((0.0, 0.0), |b| (b.x, b.y));

        let state = self.state.lock();
        if state.opacity() <= 0.0 {
            return;
        }
        renderer.push(RenderCommand::Text {
            text: self.content.clone(),
            x,
            y: y + state.offset(),
            shadows: state.shadows(),
            opacity: state.opacity(),
        });
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.listeners.release_all();
        debug!(element = %self.element, "neon text unmounted");
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn revision(&self) -> u64 {
        self.state.lock().revision()
    }
}

impl Drop for NeonText {
    fn drop(&mut self) {
        self.unmount();
    }
}
