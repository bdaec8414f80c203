//! # FitnessKing Site Shell
//!
//! Ties the effects layer to a running landing page:
//! - [`config`]: TOML site configuration with defaults for every field
//! - [`session`]: auth session state owned by an explicit controller
//! - [`site`]: page layout and effect mounting
//!
//! ## Lifecycle
//!
//! ```text
//! SiteConfig::load ─→ Site::mount ─→ tick / pointer_* / render ─→ unmount
//!                         │                                         │
//!                  SessionController::start            SessionController::shutdown
//! ```
//!
//! No tracing subscriber is installed here; binaries choose their own.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod session;
pub mod site;

pub use config::{EffectsConfig, SiteConfig, ViewportConfig};
pub use error::{AuthError, AuthResult, ConfigError, ConfigResult, SiteError, SiteResult};
pub use session::{
    AuthEvent, AuthProvider, InMemoryAuthProvider, Session, SessionController, SessionState,
    Subscription, User,
};
pub use site::{Site, SiteLayout, GOALS, HERO_TITLE};
