//! Errors raised while building a path commitment.

use thiserror::Error;

use crate::griffin::GriffinError;

pub type Result<T> = core::result::Result<T, CommitError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error("path has {count} points, at most {max} allowed")]
    TooManyPoints { count: usize, max: usize },
    #[error("point ({x}, {y}) is outside a map of width {map_width}")]
    CoordinateOutOfRange { x: u32, y: u32, map_width: u32 },
    #[error("map width must be positive")]
    InvalidMapWidth,
    #[error("owner identity does not fit in {0} bits")]
    IdentityTooWide(usize),
    #[error("reveal needs at least one path point")]
    EmptyPath,
    #[error("{got} hash rounds requested, must be between 1 and {max}")]
    InvalidHashRounds { got: usize, max: usize },
    #[error("path uses {got} hash rounds, circuit expects {expected}")]
    HashRoundsMismatch { got: usize, expected: usize },
    #[error("permutation failed: {0}")]
    Permutation(#[from] GriffinError),
}

impl CommitError {
    /// Internal invariant violations, as opposed to malformed caller input.
    pub fn is_internal(&self) -> bool {
        matches!(self, CommitError::Permutation(_))
    }
}
