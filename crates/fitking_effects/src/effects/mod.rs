//! The four ambient effects.
//!
//! Each effect is mounted onto a [`Page`], keeps its state behind an
//! `Arc<Mutex<_>>` shared with the listeners it registers, and releases
//! every listener on [`Effect::unmount`] or drop. Effects never depend on
//! each other.

mod glow_card;
mod neon_cursor;
mod neon_text;
mod particle_field;

pub use glow_card::{GlowCard, GlowCardProps, GlowCardState};
pub use neon_cursor::{CursorPhase, CursorState, HoverDetection, NeonCursor, CURSOR_BREAKPOINT};
pub use neon_text::{NeonText, NeonTextProps, NeonTextState};
pub use particle_field::{
    generate_particles, Particle, ParticleColor, ParticleField, ParticleFieldProps, ParticleFrame,
};

use crate::page::{ListenerHandle, Page};
use crate::render::UIRenderer;

/// A mounted visual effect.
pub trait Effect {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Emits this frame's render commands.
    ///
    /// `page` supplies current element bounds. Unmounted effects draw
    /// nothing.
    fn render(&self, page: &Page, renderer: &mut UIRenderer);

    /// Releases every listener. Safe to call more than once.
    fn unmount(&mut self);

    /// True until [`Effect::unmount`] has run.
    fn is_mounted(&self) -> bool;

    /// Counter bumped by every input event the effect handled.
    ///
    /// Frame ticks do not count; a pointer event that changes nothing after
    /// unmount must leave this untouched.
    fn revision(&self) -> u64;
}

/// Listener handles owned by a mounted effect.
#[derive(Debug, Default)]
pub struct MountedListeners {
    handles: Vec<ListenerHandle>,
}

impl MountedListeners {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a handle.
    pub fn push(&mut self, handle: ListenerHandle) {
        self.handles.push(handle);
    }

    /// Releases every handle.
    pub fn release_all(&mut self) {
        for mut handle in self.handles.drain(..) {
            handle.release();
        }
    }

    /// Number of handles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True if no handle is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
