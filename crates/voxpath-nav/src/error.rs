//! Error types for the path search engine.

use thiserror::Error;

/// Invalid invocation of the search engine.
///
/// Reported before any search work starts. A search that simply finds no
/// route is not an error; see [`crate::PathOutcome::NoPathFound`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The agent's bounding volume is empty, inverted or not finite
    #[error("Invalid bounding volume: {0}")]
    InvalidBounds(String),

    /// The search configuration cannot produce correct results
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, SearchError>;
