//! Error types for the selection engine.
//!
//! Only caller-contract violations surface as errors: combining masks from
//! different scopes, or constructing buffers with impossible dimensions.
//! Degenerate-but-valid input (empty flood fill results, sub-minimum
//! gestures, short lasso paths) is never an error - those resolve to empty
//! masks or silent no-ops.

use thiserror::Error;

use crate::space::Scope;

/// Errors raised by the selection engine.
///
/// Every variant indicates a bug in the calling layer rather than a
/// runtime condition to recover from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Two masks of different scopes were combined without reprojection.
    #[error("cannot combine masks of different scopes: existing is {existing:?}, incoming is {incoming:?}")]
    ScopeMismatch { existing: Scope, incoming: Scope },

    /// A coverage buffer does not match its claimed dimensions.
    #[error("invalid mask dimensions: {width}x{height} with a buffer of {len} bytes")]
    InvalidDimensions {
        width: usize,
        height: usize,
        len: usize,
    },

    /// A virtual coordinate space was created with a zero dimension.
    #[error("coordinate space dimensions must be positive, got {width}x{height}")]
    InvalidSpace { width: usize, height: usize },
}
