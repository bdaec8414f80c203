//! # FitnessKing Effects
//!
//! Ambient neon effects for the FitnessKing landing site:
//! - Pointer-reactive glow cards
//! - Floating particle fields
//! - Glowing text with an entrance slide
//! - A trailing custom cursor
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     EFFECT PIPELINE                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  Pointer/Frame → Page dispatch → Effect state → Commands │
//! │        ↓               ↓               ↓            ↓    │
//! │   Hit Testing    Listener registry  Springs     z-batches │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every effect is mounted onto a [`Page`], owns the listeners it registers
//! through [`ListenerHandle`]s and releases all of them on unmount or drop.
//! Effects are purely presentational: they never change page structure and
//! never block input.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod effects;
pub mod error;
pub mod layout;
pub mod page;
pub mod render;
pub mod style;

pub use animation::{Animation, Easing, Spring, SpringAnimation, Transition};
pub use effects::{
    Effect, GlowCard, GlowCardProps, HoverDetection, NeonCursor, NeonText, NeonTextProps,
    ParticleField, ParticleFieldProps,
};
pub use error::{PageError, PageResult};
pub use layout::{Grid, Rect};
pub use page::{ElementId, ElementSpec, ListenerHandle, Page, Tag, Viewport};
pub use render::{RenderCommand, UIBatch, UIRenderer};
pub use style::{Color, GlowColor, Intensity, TextColor};
