//! Animation primitives: tweens, springs and keyframes.
//!
//! Two families of motion drive every effect:
//!
//! - **Tweens** ([`Animation`]) run for a fixed duration along an [`Easing`]
//!   curve. Used for fades and entrance slides.
//! - **Springs** ([`SpringAnimation`]) have no duration. They are governed by
//!   stiffness, damping and mass and settle when both displacement and
//!   velocity fall under a rest threshold. Used for anything that follows
//!   the pointer.
//!
//! [`Spring`] and [`Transition`] hold the parameters of each family so
//! components can describe their motion as constants.

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Decelerating curve, `cubic-bezier(0, 0, 0.58, 1)`.
    #[default]
    EaseOut,
    /// Symmetric curve, `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Arbitrary cubic bézier with control points `(x1, y1, x2, y2)`.
    CubicBezier(f32, f32, f32, f32),
    /// Instant (no animation).
    Instant,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
            Self::Instant => 1.0,
        }
    }
}

/// Evaluates a CSS-style cubic bézier timing curve at `x`.
///
/// Solves the curve's x(s) = `x` with Newton iterations, falling back to
/// bisection when the slope flattens, then returns y(s).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // Polynomial coefficients for one axis of a bézier anchored at 0 and 1.
    let coeffs = |p1: f32, p2: f32| {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        let a = 1.0 - c - b;
        (a, b, c)
    };
    let (ax, bx, cx) = coeffs(x1, x2);
    let (ay, by, cy) = coeffs(y1, y2);

    let sample_x = |s: f32| ((ax * s + bx) * s + cx) * s;
    let sample_dx = |s: f32| (3.0 * ax * s + 2.0 * bx) * s + cx;
    let sample_y = |s: f32| ((ay * s + by) * s + cy) * s;

    let mut s = x;
    for _ in 0..8 {
        let err = sample_x(s) - x;
        if err.abs() < 1e-5 {
            return sample_y(s);
        }
        let slope = sample_dx(s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = sample_x(s);
        if (value - x).abs() < 1e-5 {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    sample_y(s)
}

/// A single tweened value.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Current value.
    current: f32,
    /// Target value.
    target: f32,
    /// Animation progress (0-1).
    progress: f32,
    /// Animation duration (seconds).
    duration: f32,
    /// Easing function.
    easing: Easing,
    /// Start value (for interpolation).
    start: f32,
}

impl Animation {
    /// Default animation duration.
    pub const DEFAULT_DURATION: f32 = 0.2;

    /// Creates a new animation at rest at the given value.
    #[must_use]
    pub fn new(value: f32, easing: Easing) -> Self {
        Self {
            current: value,
            target: value,
            progress: 1.0,
            duration: Self::DEFAULT_DURATION,
            easing,
            start: value,
        }
    }

    /// Creates an animation with custom duration.
    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Returns the value the animation is heading to.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Returns true if the animation is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Sets a new target value, starting animation from current value.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() > 0.0001 {
            self.start = self.current;
            self.target = target;
            self.progress = 0.0;
        }
    }

    /// Immediately sets the value without animation.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.start = value;
        self.progress = 1.0;
    }

    /// Updates the animation.
    ///
    /// `dt` is delta time in seconds.
    pub fn update(&mut self, dt: f32) {
        if self.progress >= 1.0 {
            return;
        }

        if self.duration > 0.0 {
            self.progress += dt / self.duration;
        } else {
            self.progress = 1.0;
        }
        self.progress = self.progress.min(1.0);

        let eased = self.easing.apply(self.progress);
        self.current = self.start + (self.target - self.start) * eased;

        if self.progress >= 1.0 {
            self.current = self.target;
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(0.0, Easing::EaseOut)
    }
}

/// Physical parameters of a spring.
///
/// These are tuning values: stiffness around 100-500 and damping around
/// 15-30 give the snappy-but-soft feel of the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Restoring force per unit of displacement.
    pub stiffness: f32,
    /// Opposing force per unit of velocity.
    pub damping: f32,
    /// Mass of the moving body.
    pub mass: f32,
}

impl Spring {
    /// Displacement under which the spring may settle.
    pub const REST_DELTA: f32 = 0.01;
    /// Speed under which the spring may settle.
    pub const REST_SPEED: f32 = 0.01;
    /// Largest integration step; longer frames are subdivided.
    const MAX_STEP: f32 = 1.0 / 240.0;
    /// Frames longer than this land on the target instead of integrating.
    pub const MAX_FRAME: f32 = 1.0;

    /// Creates spring parameters with unit mass.
    #[must_use]
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass: 1.0,
        }
    }

    /// Sets the mass.
    #[must_use]
    pub const fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(100.0, 10.0)
    }
}

/// A single spring-driven value.
#[derive(Debug, Clone)]
pub struct SpringAnimation {
    current: f32,
    velocity: f32,
    target: f32,
    spring: Spring,
}

impl SpringAnimation {
    /// Creates a spring at rest at `value`.
    #[must_use]
    pub fn new(value: f32, spring: Spring) -> Self {
        Self {
            current: value,
            velocity: 0.0,
            target: value,
            spring,
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Returns the value the spring is pulled towards.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Returns true once the spring has settled on its target.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current == self.target && self.velocity == 0.0
    }

    /// Moves the anchor. Velocity is kept so retargeting stays continuous.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jumps to `value` and stops.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Integrates the spring forward by `dt` seconds.
    ///
    /// Non-finite or non-positive `dt` does nothing. A frame longer than
    /// [`Spring::MAX_FRAME`] (a resumed tab, a debugger pause) settles the
    /// spring on its target.
    pub fn update(&mut self, dt: f32) {
        if self.is_complete() || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if dt > Spring::MAX_FRAME {
            self.set_immediate(self.target);
            return;
        }

        let mass = self.spring.mass.max(f32::EPSILON);
        let mut remaining = dt;
        while remaining > 0.0 {
            let step = remaining.min(Spring::MAX_STEP);
            remaining -= step;

            // Semi-implicit Euler: velocity first, then position.
            let displacement = self.current - self.target;
            let force = -self.spring.stiffness * displacement - self.spring.damping * self.velocity;
            self.velocity += force / mass * step;
            self.current += self.velocity * step;
        }

        if (self.current - self.target).abs() < Spring::REST_DELTA
            && self.velocity.abs() < Spring::REST_SPEED
        {
            self.set_immediate(self.target);
        }
    }
}

/// Spring-driven 2D point.
#[derive(Debug, Clone)]
pub struct SpringAnimation2D {
    /// X component.
    pub x: SpringAnimation,
    /// Y component.
    pub y: SpringAnimation,
}

impl SpringAnimation2D {
    /// Creates a 2D spring at rest at `(x, y)`.
    #[must_use]
    pub fn new(x: f32, y: f32, spring: Spring) -> Self {
        Self {
            x: SpringAnimation::new(x, spring),
            y: SpringAnimation::new(y, spring),
        }
    }

    /// Returns the current point.
    #[must_use]
    pub fn value(&self) -> (f32, f32) {
        (self.x.value(), self.y.value())
    }

    /// Returns the anchor point.
    #[must_use]
    pub fn target(&self) -> (f32, f32) {
        (self.x.target(), self.y.target())
    }

    /// Sets a new anchor point.
    pub fn set_target(&mut self, x: f32, y: f32) {
        self.x.set_target(x);
        self.y.set_target(y);
    }

    /// Jumps to `(x, y)` and stops.
    pub fn set_immediate(&mut self, x: f32, y: f32) {
        self.x.set_immediate(x);
        self.y.set_immediate(y);
    }

    /// Updates both axes.
    pub fn update(&mut self, dt: f32) {
        self.x.update(dt);
        self.y.update(dt);
    }

    /// Returns true if both axes have settled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.x.is_complete() && self.y.is_complete()
    }
}

/// Tween parameters: how long a change takes and along which curve.
///
/// Springs are described by [`Spring`]; everything with a fixed duration
/// is described by a `Transition`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Duration in seconds.
    pub duration: f32,
    /// Easing curve.
    pub easing: Easing,
}

impl Transition {
    /// Creates tween parameters.
    #[must_use]
    pub const fn new(duration: f32, easing: Easing) -> Self {
        Self { duration, easing }
    }

    /// Builds a tween at rest at `value` that moves with these parameters.
    #[must_use]
    pub fn animate(self, value: f32) -> Animation {
        Animation::new(value, self.easing).with_duration(self.duration)
    }
}

/// Samples evenly spaced keyframes at cycle progress `t` (0-1).
///
/// `easing` applies to each segment between neighbouring keyframes.
#[must_use]
pub fn sample_keyframes(frames: &[f32], t: f32, easing: Easing) -> f32 {
    match frames {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = (frames.len() - 1) as f32;
            let scaled = t.clamp(0.0, 1.0) * segments;
            // Truncation picks the segment; the last frame closes the final one.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (scaled.floor() as usize).min(frames.len() - 2);
            let local = easing.apply(scaled - index as f32);
            frames[index] + (frames[index + 1] - frames[index]) * local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_decelerates() {
        let easing = Easing::EaseOut;

        assert!(easing.apply(0.5) > 0.5, "ease-out should be past halfway at t=0.5");
        assert!((easing.apply(0.0)).abs() < 1e-6);
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let easing = Easing::EaseInOut;

        assert!((easing.apply(0.5) - 0.5).abs() < 0.01);
        let a = easing.apply(0.25);
        let b = easing.apply(0.75);
        assert!((a + b - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_animation_reaches_target() {
        let mut anim = Animation::new(0.0, Easing::EaseOut).with_duration(0.2);
        anim.set_target(100.0);

        for _ in 0..20 {
            anim.update(0.016);
        }

        assert!((anim.value() - 100.0).abs() < 0.01);
        assert!(anim.is_complete());
    }

    #[test]
    fn test_spring_settles_on_target() {
        let mut spring = SpringAnimation::new(0.0, Spring::new(500.0, 30.0));
        spring.set_target(100.0);

        spring.update(0.016);
        assert!(spring.value() > 0.0 && spring.value() < 100.0);

        for _ in 0..300 {
            spring.update(0.016);
        }

        assert!(spring.is_complete());
        assert!((spring.value() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_underdamped_spring_overshoots() {
        let mut spring = SpringAnimation::new(0.0, Spring::new(400.0, 5.0));
        spring.set_target(1.0);

        let mut peak = 0.0_f32;
        for _ in 0..120 {
            spring.update(0.016);
            peak = peak.max(spring.value());
        }

        assert!(peak > 1.0, "light damping should overshoot, peak {peak}");
    }

    #[test]
    fn test_keyframes_peak_mid_cycle() {
        let frames = [0.0, -30.0, 0.0];

        assert!((sample_keyframes(&frames, 0.0, Easing::EaseInOut)).abs() < 1e-4);
        assert!((sample_keyframes(&frames, 0.5, Easing::EaseInOut) + 30.0).abs() < 1e-4);
        assert!((sample_keyframes(&frames, 1.0, Easing::EaseInOut)).abs() < 1e-4);
    }

    #[test]
    fn test_transition_builds_tween() {
        let mut fade = Transition::new(0.3, Easing::Linear).animate(0.0);
        assert!(fade.is_complete());

        fade.set_target(1.0);
        fade.update(0.15);
        assert!((fade.value() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_long_frame_settles_spring() {
        let mut spring = SpringAnimation::new(0.0, Spring::new(500.0, 30.0));
        spring.set_target(100.0);

        spring.update(200_000.0);
        assert!(spring.is_complete());
        assert!((spring.value() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut spring = SpringAnimation::new(0.0, Spring::new(500.0, 30.0));
        spring.set_target(100.0);

        spring.update(f32::INFINITY);
        spring.update(f32::NAN);
        assert!(spring.value().abs() < f32::EPSILON);
        assert!(!spring.is_complete());

        spring.update(Spring::MAX_FRAME);
        assert!(spring.value() > 0.0 && spring.value().is_finite());
    }
}
