//! # Page Error Types
//!
//! The effects never fail; only structural misuse of the page does.

use thiserror::Error;

use crate::page::ElementId;

/// Errors raised by the page model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    /// The element was never created or has been removed.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),

    /// Bounds with negative or non-finite size.
    #[error("invalid bounds for element {id}: {width}x{height}")]
    InvalidBounds {
        /// The element being laid out.
        id: ElementId,
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}

/// Result type for page operations.
pub type PageResult<T> = Result<T, PageError>;
