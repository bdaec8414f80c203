//! Custom cursor overlay.
//!
//! Two glowing discs trail the pointer on wide screens: a primary glow that
//! grows over interactive elements and shrinks while pressed, and a smaller
//! secondary glow on a softer spring. The overlay is drawn above all page
//! content and never takes part in hit-testing.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use super::{Effect, MountedListeners};
use crate::animation::{
    Animation, Easing, Spring, SpringAnimation, SpringAnimation2D, Transition,
};
use crate::page::{EventKind, ListenerTarget, Page};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{palette, Shadow};

/// Viewports narrower than this get no cursor overlay.
pub const CURSOR_BREAKPOINT: f32 = 768.0;

const PRIMARY_SPRING: Spring = Spring::new(500.0, 28.0).with_mass(0.5);
const SECONDARY_SPRING: Spring = Spring::new(300.0, 25.0).with_mass(0.8);
/// Size and colour blend on hover.
const HOVER_BLEND: Transition = Transition::new(0.2, Easing::CubicBezier(0.25, 0.1, 0.25, 1.0));

const PRIMARY_Z: i32 = 9999;
const SECONDARY_Z: i32 = 9998;

const IDLE_DIAMETER: f32 = 40.0;
const HOVER_DIAMETER: f32 = 60.0;
const SECONDARY_DIAMETER: f32 = 20.0;

/// How the cursor learns that the pointer is over something interactive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum HoverDetection {
    /// Interactive elements are collected once at mount and each gets its
    /// own enter/leave listeners. Elements added later never trigger the
    /// hover look.
    #[default]
    Snapshot,
    /// A single window listener checks the element under the pointer at
    /// dispatch time, so late elements are covered too.
    Delegated,
}

/// Visual phase of the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorPhase {
    /// No pointer movement seen yet.
    Hidden,
    /// Visible, not over anything interactive.
    Idle,
    /// Over an interactive element.
    Hovering,
    /// Button held down.
    Pressed,
}

/// Cursor state shared with its listeners.
#[derive(Debug, Clone)]
pub struct CursorState {
    pointer: (f32, f32),
    visible: bool,
    hovering: bool,
    pressed: bool,
    primary: SpringAnimation2D,
    scale: SpringAnimation,
    hover_mix: Animation,
    secondary: SpringAnimation2D,
    secondary_opacity: SpringAnimation,
    revision: u64,
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorState {
    /// Hidden cursor at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pointer: (0.0, 0.0),
            visible: false,
            hovering: false,
            pressed: false,
            primary: SpringAnimation2D::new(0.0, 0.0, PRIMARY_SPRING),
            scale: SpringAnimation::new(1.0, PRIMARY_SPRING),
            hover_mix: HOVER_BLEND.animate(0.0),
            secondary: SpringAnimation2D::new(0.0, 0.0, SECONDARY_SPRING),
            secondary_opacity: SpringAnimation::new(0.5, SECONDARY_SPRING),
            revision: 0,
        }
    }

    /// Records a pointer move. The first one makes the cursor visible with
    /// every value already on target.
    pub fn pointer_moved(&mut self, pointer: (f32, f32)) {
        self.pointer = pointer;
        let first = !self.visible;
        self.visible = true;
        self.retarget();
        if first {
            self.snap();
        }
    }

    /// Button pressed.
    pub fn pointer_pressed(&mut self) {
        self.pressed = true;
        self.retarget();
    }

    /// Button released.
    pub fn pointer_released(&mut self) {
        self.pressed = false;
        self.retarget();
    }

    /// Sets whether the pointer is over an interactive element.
    pub fn set_hovering(&mut self, hovering: bool) {
        self.hovering = hovering;
        self.retarget();
    }

    fn retarget(&mut self) {
        let (x, y) = self.pointer;
        let offset = self.primary_offset();
        self.primary.set_target(x - offset, y - offset);
        self.scale.set_target(self.target_scale());
        self.hover_mix.set_target(if self.hovering { 1.0 } else { 0.0 });

        self.secondary.set_target(x - SECONDARY_DIAMETER * 0.5, y - SECONDARY_DIAMETER * 0.5);
        self.secondary_opacity
            .set_target(if self.hovering { 0.8 } else { 0.5 });
        self.revision += 1;
    }

    fn snap(&mut self) {
        let (px, py) = self.primary.target();
        self.primary.set_immediate(px, py);
        self.scale.set_immediate(self.scale.target());
        self.hover_mix.set_immediate(self.hover_mix.target());
        let (sx, sy) = self.secondary.target();
        self.secondary.set_immediate(sx, sy);
        self.secondary_opacity
            .set_immediate(self.secondary_opacity.target());
    }

    fn primary_offset(&self) -> f32 {
        if self.hovering {
            HOVER_DIAMETER * 0.5
        } else {
            IDLE_DIAMETER * 0.5
        }
    }

    fn target_scale(&self) -> f32 {
        if self.pressed {
            0.8
        } else if self.hovering {
            1.5
        } else {
            1.0
        }
    }

    /// Advances by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.primary.update(dt);
        self.scale.update(dt);
        self.hover_mix.update(dt);
        self.secondary.update(dt);
        self.secondary_opacity.update(dt);
    }

    /// Current phase. Pressed wins over hovering.
    #[must_use]
    pub fn phase(&self) -> CursorPhase {
        if !self.visible {
            CursorPhase::Hidden
        } else if self.pressed {
            CursorPhase::Pressed
        } else if self.hovering {
            CursorPhase::Hovering
        } else {
            CursorPhase::Idle
        }
    }

    /// Last pointer position.
    #[must_use]
    pub fn pointer(&self) -> (f32, f32) {
        self.pointer
    }

    /// True once the pointer has moved.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True over an interactive element.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// True while the button is held.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Top-left corner of the primary glow.
    #[must_use]
    pub fn primary_position(&self) -> (f32, f32) {
        self.primary.value()
    }

    /// Where the primary glow is heading.
    #[must_use]
    pub fn primary_target(&self) -> (f32, f32) {
        self.primary.target()
    }

    /// Scale of the primary glow.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Unscaled diameter of the primary glow.
    #[must_use]
    pub fn diameter(&self) -> f32 {
        let t = self.hover_mix.value();
        IDLE_DIAMETER + (HOVER_DIAMETER - IDLE_DIAMETER) * t
    }

    /// Top-left corner of the secondary glow.
    #[must_use]
    pub fn secondary_position(&self) -> (f32, f32) {
        self.secondary.value()
    }

    /// Opacity of the secondary glow.
    #[must_use]
    pub fn secondary_opacity(&self) -> f32 {
        self.secondary_opacity.value()
    }

    /// Input revision counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Emits both glows. Nothing before the first pointer move.
    pub fn render(&self, renderer: &mut UIRenderer) {
        if !self.visible {
            return;
        }
        let t = self.hover_mix.value();

        let idle_shadows = [
            Shadow::spread(20.0, 5.0, palette::PRIMARY.with_alpha(0.3)),
            Shadow::spread(40.0, 10.0, palette::SECONDARY.with_alpha(0.1)),
        ];
        let hover_shadows = [
            Shadow::spread(40.0, 10.0, palette::PRIMARY.with_alpha(0.4)),
            Shadow::spread(80.0, 20.0, palette::SECONDARY.with_alpha(0.2)),
        ];
        let fill_alpha = 0.2 + 0.1 * t;

        let radius = self.diameter() * 0.5;
        let (px, py) = self.primary.value();
        renderer.push_at(
            PRIMARY_Z,
            RenderCommand::Circle {
                cx: px + radius,
                cy: py + radius,
                radius: radius * self.scale.value(),
                fill: palette::PRIMARY.with_alpha(fill_alpha).to_rgba(),
                shadows: idle_shadows
                    .iter()
                    .zip(hover_shadows.iter())
                    .map(|(idle, hover)| idle.lerp(*hover, t))
                    .collect(),
                opacity: 1.0,
            },
        );

        let half = SECONDARY_DIAMETER * 0.5;
        let (sx, sy) = self.secondary.value();
        renderer.push_at(
            SECONDARY_Z,
            RenderCommand::Circle {
                cx: sx + half,
                cy: sy + half,
                radius: half,
                fill: palette::SECONDARY.with_alpha(0.3).to_rgba(),
                shadows: vec![Shadow::spread(15.0, 5.0, palette::SECONDARY.with_alpha(0.3))],
                opacity: self.secondary_opacity.value(),
            },
        );
    }
}

/// The cursor overlay mounted on a page.
pub struct NeonCursor {
    enabled: bool,
    mounted: bool,
    detection: HoverDetection,
    state: Arc<Mutex<CursorState>>,
    listeners: MountedListeners,
}

impl NeonCursor {
    /// Mounts the overlay.
    ///
    /// The viewport width is read once here; narrower than
    /// [`CURSOR_BREAKPOINT`] leaves the overlay disabled with no listeners.
    #[must_use]
    pub fn mount(page: &Page, detection: HoverDetection) -> Self {
        let state = Arc::new(Mutex::new(CursorState::new()));
        let mut listeners = MountedListeners::new();
        let width = page.viewport().width;
        let enabled = width >= CURSOR_BREAKPOINT;

        if !enabled {
            debug!(width, "cursor overlay disabled below breakpoint");
            return Self {
                enabled,
                mounted: true,
                detection,
                state,
                listeners,
            };
        }

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::PointerMove, move |e| {
            s.lock().pointer_moved(e.pointer);
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::PointerDown, move |_| {
            s.lock().pointer_pressed();
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::PointerUp, move |_| {
            s.lock().pointer_released();
        }));

        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::Frame, move |e| {
            s.lock().update(e.dt);
        }));

        match detection {
            HoverDetection::Snapshot => {
                for id in page.interactive_elements() {
                    let target = ListenerTarget::Element(id);

                    let s = Arc::clone(&state);
                    listeners.push(page.add_listener(target, EventKind::PointerEnter, move |_| {
                        s.lock().set_hovering(true);
                    }));

                    let s = Arc::clone(&state);
                    listeners.push(page.add_listener(target, EventKind::PointerLeave, move |_| {
                        s.lock().set_hovering(false);
                    }));
                }
            }
            HoverDetection::Delegated => {
                let s = Arc::clone(&state);
                listeners.push(page.add_listener(
                    ListenerTarget::Window,
                    EventKind::PointerOver,
                    move |e| {
                        let hovering = e.target.is_some_and(|t| t.within_interactive());
                        s.lock().set_hovering(hovering);
                    },
                ));
            }
        }

        debug!(width, ?detection, listeners = listeners.len(), "cursor overlay mounted");
        Self {
            enabled,
            mounted: true,
            detection,
            state,
            listeners,
        }
    }

    /// True if the viewport was wide enough at mount.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hover detection strategy in use.
    #[must_use]
    pub fn detection(&self) -> HoverDetection {
        self.detection
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CursorPhase {
        self.state.lock().phase()
    }

    /// Locks and returns the cursor state.
    pub fn state(&self) -> MutexGuard<'_, CursorState> {
        self.state.lock()
    }
}

impl Effect for NeonCursor {
    fn name(&self) -> &'static str {
        "neon_cursor"
    }

    fn render(&self, _page: &Page, renderer: &mut UIRenderer) {
        if self.mounted && self.enabled {
            self.state.lock().render(renderer);
        }
    }

    fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.listeners.release_all();
        debug!("cursor overlay unmounted");
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn revision(&self) -> u64 {
        self.state.lock().revision()
    }
}

impl Drop for NeonCursor {
    fn drop(&mut self) {
        self.unmount();
    }
}
