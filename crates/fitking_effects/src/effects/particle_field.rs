//! Floating particle field.
//!
//! A decorative layer of small glowing dots that bob and pulse forever
//! behind section content. Particles are drawn once per mount from thread
//! entropy and never change afterwards. The field is not an element and
//! registers no pointer listeners, so it can never intercept input.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use tracing::debug;

use super::{Effect, MountedListeners};
use crate::animation::{sample_keyframes, Easing};
use crate::error::{PageError, PageResult};
use crate::layout::Rect;
use crate::page::{ElementId, EventKind, ListenerTarget, Page};
use crate::render::{RenderCommand, UIRenderer};
use crate::style::{palette, Hsla, Shadow};

const BOB_FRAMES: [f32; 3] = [0.0, -30.0, 0.0];
const OPACITY_FRAMES: [f32; 3] = [0.2, 0.8, 0.2];
const SCALE_FRAMES: [f32; 3] = [1.0, 1.2, 1.0];
const PARTICLE_EASING: Easing = Easing::EaseInOut;

/// Which brand colour a particle uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleColor {
    /// Neon green.
    Primary,
    /// Electric blue.
    Secondary,
}

impl ParticleColor {
    fn hue(self) -> Hsla {
        match self {
            Self::Primary => palette::PRIMARY,
            Self::Secondary => palette::SECONDARY,
        }
    }
}

/// One floating dot. Immutable after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Sequence index within the field.
    pub id: usize,
    /// Horizontal position, percent of container width, in `[0, 100)`.
    pub x: f32,
    /// Vertical position, percent of container height, in `[0, 100)`.
    pub y: f32,
    /// Diameter in pixels, in `[1, 5)`.
    pub size: f32,
    /// Seconds per animation cycle, in `[15, 25)`.
    pub duration: f32,
    /// Seconds before the first cycle starts, in `[0, 5)`.
    pub delay: f32,
    /// Peak horizontal wiggle in pixels, in `[-10, 10)`.
    pub drift_x: f32,
    /// Colour category.
    pub color: ParticleColor,
}

/// Animated offsets of a particle at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleFrame {
    /// Horizontal offset in pixels.
    pub offset_x: f32,
    /// Vertical offset in pixels.
    pub offset_y: f32,
    /// Opacity.
    pub opacity: f32,
    /// Scale factor.
    pub scale: f32,
}

impl Particle {
    /// Samples the particle `elapsed` seconds after mount.
    ///
    /// Before `delay` has passed the particle rests on its first keyframe;
    /// afterwards it loops with period `duration`. Time is `f64` so the
    /// phase stays exact after weeks of uptime.
    #[must_use]
    pub fn sample(&self, elapsed: f64) -> ParticleFrame {
        let active = elapsed - f64::from(self.delay);
        let duration = f64::from(self.duration);
        // The phase is in [0, 1); narrowing loses nothing that matters.
        #[allow(clippy::cast_possible_truncation)]
        let t = if active <= 0.0 || duration <= 0.0 {
            0.0
        } else {
            (active.rem_euclid(duration) / duration) as f32
        };

        ParticleFrame {
            offset_x: sample_keyframes(&[0.0, self.drift_x, 0.0], t, PARTICLE_EASING),
            offset_y: sample_keyframes(&BOB_FRAMES, t, PARTICLE_EASING),
            opacity: sample_keyframes(&OPACITY_FRAMES, t, PARTICLE_EASING),
            scale: sample_keyframes(&SCALE_FRAMES, t, PARTICLE_EASING),
        }
    }
}

/// Draws `count` particles from `rng`.
pub fn generate_particles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Particle> {
    (0..count)
        .map(|id| Particle {
            id,
            x: rng.gen_range(0.0..100.0),
            y: rng.gen_range(0.0..100.0),
            size: rng.gen_range(1.0..5.0),
            duration: rng.gen_range(15.0..25.0),
            delay: rng.gen_range(0.0..5.0),
            drift_x: rng.gen_range(-10.0..10.0),
            color: if rng.gen_bool(0.5) {
                ParticleColor::Primary
            } else {
                ParticleColor::Secondary
            },
        })
        .collect()
}

/// Caller-supplied options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticleFieldProps {
    /// Number of particles.
    pub count: usize,
    /// Extra styling class for the field layer.
    pub class_name: Option<String>,
}

impl ParticleFieldProps {
    /// Default particle count.
    pub const DEFAULT_COUNT: usize = 30;

    /// Props with a specific count.
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self {
            count,
            class_name: None,
        }
    }
}

impl Default for ParticleFieldProps {
    fn default() -> Self {
        Self::with_count(Self::DEFAULT_COUNT)
    }
}

#[derive(Debug)]
struct FieldState {
    particles: Vec<Particle>,
    elapsed: f64,
    revision: u64,
}

/// A particle field filling a container element.
pub struct ParticleField {
    container: ElementId,
    class_name: Option<String>,
    state: Arc<Mutex<FieldState>>,
    listeners: MountedListeners,
}

impl ParticleField {
    /// Generates the particles and starts the animation loop.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if the container does not exist.
    pub fn mount(page: &Page, container: ElementId, props: ParticleFieldProps) -> PageResult<Self> {
        Self::mount_with(page, container, props, &mut rand::thread_rng())
    }

    /// Like [`ParticleField::mount`] with a caller-supplied generator.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::ElementNotFound`] if the container does not exist.
    pub fn mount_with<R: Rng + ?Sized>(
        page: &Page,
        container: ElementId,
        props: ParticleFieldProps,
        rng: &mut R,
    ) -> PageResult<Self> {
        if !page.contains(container) {
            return Err(PageError::ElementNotFound(container));
        }

        let state = Arc::new(Mutex::new(FieldState {
            particles: generate_particles(props.count, rng),
            elapsed: 0.0,
            revision: 0,
        }));

        let mut listeners = MountedListeners::new();
        let s = Arc::clone(&state);
        listeners.push(page.add_listener(ListenerTarget::Window, EventKind::Frame, move |e| {
            s.lock().elapsed += f64::from(e.dt);
        }));

        debug!(%container, count = props.count, "particle field mounted");
        Ok(Self {
            container,
            class_name: props.class_name,
            state,
            listeners,
        })
    }

    /// Changes the particle count. Regenerates only if it differs.
    pub fn set_count(&mut self, count: usize) {
        let mut state = self.state.lock();
        if state.particles.len() == count {
            return;
        }
        state.particles = generate_particles(count, &mut rand::thread_rng());
        state.revision += 1;
        debug!(container = %self.container, count, "particle field regenerated");
    }

    /// Copy of the current particles.
    #[must_use]
    pub fn particles(&self) -> Vec<Particle> {
        self.state.lock().particles.clone()
    }

    /// Number of particles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.lock().particles.len()
    }

    /// Seconds of animation since mount.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.state.lock().elapsed
    }

    /// Styling class passed at mount.
    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Container element.
    #[must_use]
    pub fn container(&self) -> ElementId {
        self.container
    }
}

impl Effect for ParticleField {
    fn name(&self) -> &'static str {
        "particle_field"
    }

    fn render(&self, page: &Page, renderer: &mut UIRenderer) {
        if !self.is_mounted() {
            return;
        }
        let Some(bounds) = page
            .element(self.container)
            .and_then(|e| e.bounds)
            .filter(Rect::is_measurable)
        else {
            return;
        };

        let state = self.state.lock();
        if state.particles.is_empty() {
            return;
        }

        renderer.push_clip(bounds);
        for particle in &state.particles {
            let frame = particle.sample(state.elapsed);
            let hue = particle.color.hue();
            renderer.push(RenderCommand::Circle {
                cx: bounds.x + bounds.width * particle.x / 100.0 + frame.offset_x,
                cy: bounds.y + bounds.height * particle.y / 100.0 + frame.offset_y,
                radius: particle.size * 0.5 * frame.scale,
                fill: hue.with_alpha(0.6).to_rgba(),
                shadows: vec![Shadow::spread(10.0, 2.0, hue.with_alpha(0.4))],
                opacity: frame.opacity,
            });
        }
        renderer.pop_clip();
    }

    fn unmount(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        self.listeners.release_all();
        debug!(container = %self.container, "particle field unmounted");
    }

    fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn revision(&self) -> u64 {
        self.state.lock().revision
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generation_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let particles = generate_particles(500, &mut rng);

        assert_eq!(particles.len(), 500);
        for (i, p) in particles.iter().enumerate() {
            assert_eq!(p.id, i);
            assert!((0.0..100.0).contains(&p.x));
            assert!((0.0..100.0).contains(&p.y));
            assert!((1.0..5.0).contains(&p.size));
            assert!((15.0..25.0).contains(&p.duration));
            assert!((0.0..5.0).contains(&p.delay));
            assert!((-10.0..10.0).contains(&p.drift_x));
        }
        assert!(particles.iter().any(|p| p.color == ParticleColor::Primary));
        assert!(particles.iter().any(|p| p.color == ParticleColor::Secondary));
    }

    #[test]
    fn test_zero_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(generate_particles(0, &mut rng).is_empty());
    }

    #[test]
    fn test_particle_waits_for_delay() {
        let particle = Particle {
            id: 0,
            x: 50.0,
            y: 50.0,
            size: 2.0,
            duration: 20.0,
            delay: 4.0,
            drift_x: 6.0,
            color: ParticleColor::Primary,
        };

        let rest = particle.sample(3.9);
        assert!(rest.offset_y.abs() < 1e-4);
        assert!((rest.opacity - 0.2).abs() < 1e-4);

        let peak = particle.sample(4.0 + 10.0);
        assert!((peak.offset_y + 30.0).abs() < 1e-3);
        assert!((peak.offset_x - 6.0).abs() < 1e-3);
        assert!((peak.opacity - 0.8).abs() < 1e-3);
        assert!((peak.scale - 1.2).abs() < 1e-3);

        let next_peak = particle.sample(4.0 + 30.0);
        assert!((next_peak.offset_y + 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_particle_keeps_moving_after_weeks() {
        let particle = Particle {
            id: 0,
            x: 10.0,
            y: 10.0,
            size: 3.0,
            duration: 20.0,
            delay: 0.0,
            drift_x: 0.0,
            color: ParticleColor::Secondary,
        };

        // Thirty days in, a quarter of the way through a cycle.
        let start = 30.0 * 24.0 * 3600.0 + 5.0;
        let before = particle.sample(start);
        let after = particle.sample(start + f64::from(1.0_f32 / 60.0));
        assert!((after.offset_y - before.offset_y).abs() > 1e-3);

        let peak = particle.sample(start + 5.0);
        assert!((peak.offset_y + 30.0).abs() < 1e-3);
    }
}
