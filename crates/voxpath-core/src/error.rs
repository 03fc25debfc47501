//! Error types for coordinate validation.

use std::fmt;

use thiserror::Error;

/// Coordinate axis, used to report which component failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        })
    }
}

/// Core error type.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A chunk-local component fell outside `0..bound`
    #[error("{axis} component {value} is out of range 0..{bound}")]
    OutOfRange { axis: Axis, value: i32, bound: i32 },

    /// A flat chunk index fell outside the chunk's voxel count
    #[error("chunk index {index} is out of range 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
