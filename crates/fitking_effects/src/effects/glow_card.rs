//! Pointer-reactive glow container.
//!
//! Wraps an element and paints a soft radial light that follows the
//! pointer inside it, plus a border highlight while hovered. The whole card
//! springs slightly larger on hover and slightly smaller while pressed.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use super::{Effect, MountedListeners};
use crate::animation::{
    Animation, Easing, Spring, SpringAnimation, SpringAnimation2D, Transition,
};
use crate::error::{PageError, PageResult};
use crate::layout::Rect;
use crate::page::{ElementId, EventKind, ListenerTarget, Page};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{GlowColor, GlowParams, Intensity, Shadow};

/// Light position spring.
const LIGHT_SPRING: Spring = Spring::new(500.0, 30.0);
/// Card scale spring.
const SCALE_SPRING: Spring = Spring::new(400.0, 17.0);
const LIGHT_FADE: Transition = Transition::new(0.2, Easing::EaseOut);
const BORDER_FADE: Transition = Transition::new(0.3, Easing::EaseOut);
const HOVER_SCALE: f32 = 1.02;
const PRESS_SCALE: f32 = 0.98;
const CORNER_RADIUS: f32 = 16.0;

/// Activation callback.
pub type ActivateFn = Box<dyn FnMut() + Send>;

/// Caller-supplied options.
#[derive(Default)]
pub struct GlowCardProps {
    /// Colour family.
    pub color: GlowColor,
    /// Strength tier.
    pub intensity: Intensity,
    /// Called on click (press and release while hovered).
    pub on_activate: Option<ActivateFn>,
}

impl GlowCardProps {
    /// Sets the colour family.
    #[must_use]
    pub fn with_color(mut self, color: GlowColor) -> Self {
        self.color = color;
        self
    }

    /// Sets the intensity tier.
    #[must_use]
    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets the activation callback.
    #[must_use]
    pub fn on_activate(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_activate = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for GlowCardProps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowCardProps")
            .field("color", &self.color)
            .field("intensity", &self.intensity)
            .field("on_activate", &self.on_activate.is_some())
            .finish()
    }
}

/// Glow card state shared with its listeners.
#[derive(Debug, Clone)]
pub struct GlowCardState {
    color: GlowColor,
    params: GlowParams,
    pointer: (f32, f32),
    hovered: bool,
    pressed: bool,
    light_position: SpringAnimation2D,
    light_opacity: Animation,
    border_opacity: Animation,
    scale: SpringAnimation,
    revision: u64,
}

impl GlowCardState {
    /// Fresh state: pointer at the origin, nothing lit.
    #[must_use]
    pub fn new(color: GlowColor, intensity: Intensity) -> Self {
        let params = intensity.params();
        let half = params.size * 0.5;
        Self {
            color,
            params,
            pointer: (0.0, 0.0),
            hovered: false,
            pressed: false,
            light_position: SpringAnimation2D::new(-half, -half, LIGHT_SPRING),
            light_opacity: LIGHT_FADE.animate(0.0),
            border_opacity: BORDER_FADE.animate(0.0),
            scale: SpringAnimation::new(1.0, SCALE_SPRING),
            revision: 0,
        }
    }

    /// Records a pointer move in page coordinates.
    ///
    /// Without measurable bounds the pointer is taken to be at `(0, 0)`.
    pub fn pointer_moved(&mut self, pointer: (f32, f32), bounds: Option<Rect>) {
        self.pointer = match bounds {
            Some(b) if b.is_measurable() => b.to_local(pointer.0, pointer.1),
            _ => (0.0, 0.0),
        };
        let (x, y) = self.light_target();
        self.light_position.set_target(x, y);
        self.revision += 1;
    }

    /// Pointer entered the card.
    pub fn pointer_entered(&mut self) {
        self.hovered = true;
        self.retarget();
    }

    /// Pointer left the card. Leaving also cancels a press.
    pub fn pointer_left(&mut self) {
        self.hovered = false;
        self.pressed = false;
        self.retarget();
    }

    /// Button pressed over the card.
    pub fn pointer_pressed(&mut self) {
        self.pressed = true;
        self.retarget();
    }

    /// Button released. Returns true if this completed a click.
    pub fn pointer_released(&mut self) -> bool {
        let clicked = self.pressed && self.hovered;
        self.pressed = false;
        self.retarget();
        clicked
    }

    fn retarget(&mut self) {
        let lit = if self.hovered { 1.0 } else { 0.0 };
        self.light_opacity.set_target(lit);
        self.border_opacity.set_target(lit);

        let scale = if self.pressed {
            PRESS_SCALE
        } else if self.hovered {
            HOVER_SCALE
        } else {
            1.0
        };
        self.scale.set_target(scale);
        self.revision += 1;
    }

    /// Advances every animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.light_position.update(dt);
        self.light_opacity.update(dt);
        self.border_opacity.update(dt);
        self.scale.update(dt);
    }

    /// Where the light's top-left corner is heading: the pointer minus half
    /// the tier diameter, so the light is centred on the pointer.
    #[must_use]
    pub fn light_target(&self) -> (f32, f32) {
        let half = self.params.size * 0.5;
        (self.pointer.0 - half, self.pointer.1 - half)
    }

    /// Current top-left corner of the light, card-local.
    #[must_use]
    pub fn light_position(&self) -> (f32, f32) {
        self.light_position.value()
    }

    /// Current light opacity.
    #[must_use]
    pub fn light_opacity(&self) -> f32 {
        self.light_opacity.value()
    }

    /// Current border highlight opacity.
    #[must_use]
    pub fn border_opacity(&self) -> f32 {
        self.border_opacity.value()
    }

    /// Current card scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Pointer position relative to the card.
    #[must_use]
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// True while hovered.
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// True while pressed.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Tier parameters in use.
    #[must_use]
    pub fn params(&self) -> GlowParams {
        self.params
    }

    /// Input revision counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Emits commands for a card occupying `bounds`.
    pub fn render(&self, bounds: Option<Rect>, renderer: &mut UIRenderer) {
        let measured = bounds.filter(Rect::is_measurable);
        let origin = measured.unwrap_or(Rect::ZERO);
        let light_opacity = self.light_opacity.value();
        let border_opacity = self.border_opacity.value();

        if let Some(b) = measured {
            renderer.push_clip(b.scale_about_center(self.scale.value()));
        }

        if light_opacity > 0.0 {
            let (lx, ly) = self.light_position.value();
            let hue = self.color.hue();
            renderer.push(RenderCommand::RadialGlow {
                bounds: Rect::new(origin.x + lx, origin.y + ly, self.params.size, self.params.size),
                color: hue.with_alpha(self.params.opacity).to_rgba(),
                blur: self.params.blur,
                opacity: light_opacity,
            });
        }

        if border_opacity > 0.0 {
            let hue = self.color.hue();
            renderer.push(RenderCommand::BorderGlow {
                bounds: origin.scale_about_center(self.scale.value()),
                ring: hue.with_alpha(0.3).to_rgba(),
                glow: Shadow::spread(20.0, 0.0, hue.with_alpha(0.15)),
                corner_radius: CORNER_RADIUS,
                opacity: border_opacity,
            });
        }

        if measured.is_some() {
            renderer.pop_clip();
        }
    }
}

/// A glow card mounted on a page element.
pub struct GlowCard {
    element: ElementId,
    state: Arc<Mutex<GlowCardState>>,
    listeners: MountedListeners,
}

impl GlowCard {
    /// Attaches the effect to `element`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if the element does not exist.
    pub fn mount(page: &Page, element: ElementId, props: GlowCardProps) -> PageResult<Self> {
        if !page.contains(element) {
            return Err(PageError::ElementNotFound(element));
        }

        let GlowCardProps {
            color,
            intensity,
            on_activate,
        } = props;
        let state = Arc::new(Mutex::new(GlowCardState::new(color, intensity)));
        let target = ListenerTarget::Element(element);
        let mut listeners = MountedListeners::new();

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(target, EventKind::PointerMove, move |e| {
            let bounds = e.current_target.and_then(|t| t.bounds);
            s.lock().pointer_moved(e.pointer, bounds);
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(target, EventKind::PointerEnter, move |_| {
            s.lock().pointer_entered();
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(target, EventKind::PointerLeave, move |_| {
            s.lock().pointer_left();
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(target, EventKind::PointerDown, move |_| {
            s.lock().pointer_pressed();
        }));

        let s = Arc::clone(&state);
        let mut on_activate = on_activate;
        listeners.push(page.add_listener(target, EventKind::PointerUp, move |_| {
            // The state lock is dropped before the callback runs.
            let clicked = s.lock().pointer_released();
            if clicked {
                if let Some(callback) = on_activate.as_mut() {
                    callback();
                }
            }
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::Frame, move |e| {
            s.lock().update(e.dt);
        }));

        debug!(%element, ?color, ?intensity, "glow card mounted");
        Ok(Self {
            element,
            state,
            listeners,
        })
    }

    /// Element the card wraps.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Locks and returns the card state.
    pub fn state(&self) -> MutexGuard<'_, GlowCardState> {
        self.state.lock()
    }
}

impl Effect for GlowCard {
    fn name(&self) -> &'static str {
        "glow_card"
    }

    fn render(&self, page: &Page, renderer: &mut UIRenderer) {
        if !self.is_mounted() {
            return;
        }
        let bounds = page.element(self.element).and_then(|e| e.bounds);
        self.state.lock().render(bounds, renderer);
    }

    fn unmount(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        self.listeners.release_all();
        debug!(element = %self.element, "glow card unmounted");
    }

    fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn revision(&self) -> u64 {
        self.state.lock().revision()
    }
}

impl Drop for GlowCard {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(state: &mut GlowCardState) {
        for _ in 0..240 {
            state.update(1.0 / 60.0);
        }
    }

    #[test]
    fn test_pointer_is_card_local() {
        let mut state = GlowCardState::new(GlowColor::Primary, Intensity::Medium);
        state.pointer_moved((150.0, 90.0), Some(Rect::new(100.0, 50.0, 300.0, 200.0)));

        assert_eq!(state.pointer(), (50.0, 40.0));
        assert_eq!(state.light_target(), (50.0 - 100.0, 40.0 - 100.0));
    }

    #[test]
    fn test_unmeasured_card_uses_origin() {
        let mut state = GlowCardState::new(GlowColor::Primary, Intensity::Subtle);
        state.pointer_moved((150.0, 90.0), None);
        assert_eq!(state.pointer(), (0.0, 0.0));

        state.pointer_moved((150.0, 90.0), Some(Rect::ZERO));
        assert_eq!(state.pointer(), (0.0, 0.0));
        assert_eq!(state.light_target(), (-75.0, -75.0));
    }

    #[test]
    fn test_hover_fades_light_in_and_out() {
        let mut state = GlowCardState::new(GlowColor::Secondary, Intensity::Strong);
        assert!(state.light_opacity().abs() < f32::EPSILON);

        state.pointer_entered();
        settle(&mut state);
        assert!((state.light_opacity() - 1.0).abs() < f32::EPSILON);
        assert!((state.border_opacity() - 1.0).abs() < f32::EPSILON);
        assert!((state.scale() - HOVER_SCALE).abs() < 1e-3);

        state.pointer_left();
        settle(&mut state);
        assert!(state.light_opacity().abs() < f32::EPSILON);
        assert!((state.scale() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_click_requires_press_and_release_inside() {
        let mut state = GlowCardState::new(GlowColor::Mixed, Intensity::Medium);
        state.pointer_entered();
        state.pointer_pressed();
        assert!(state.is_pressed());
        assert!(state.pointer_released());

        state.pointer_pressed();
        state.pointer_left();
        assert!(!state.pointer_released());
    }

    #[test]
    fn test_render_skips_invisible_layers() {
        let state = GlowCardState::new(GlowColor::Primary, Intensity::Medium);
        let mut renderer = UIRenderer::new();
        renderer.begin_frame();

        state.render(Some(Rect::new(0.0, 0.0, 100.0, 100.0)), &mut renderer);

        // Clip push/pop only.
        assert_eq!(renderer.command_count(), 2);
    }
}
