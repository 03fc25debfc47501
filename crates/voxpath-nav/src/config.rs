//! Search engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Configuration for [`crate::PathFinder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of node expansions before giving up.
    pub max_expansions: usize,
    /// Allow planar diagonal moves (never across a blocked corner).
    pub allow_diagonal: bool,
    /// Allow single-block step-ups and drops while standing on solid ground.
    pub allow_vertical: bool,
    /// Cost of one vertical step; at least `√2` so the heuristic stays admissible.
    pub vertical_step_cost: f64,
    /// Wall-clock limit for one search.
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_expansions: 100_000,
            allow_diagonal: true,
            allow_vertical: true,
            vertical_step_cost: 2.0,
            timeout: None,
        }
    }
}

impl SearchConfig {
    /// Set the node expansion budget.
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    /// Enable or disable diagonal moves.
    #[must_use]
    pub fn with_diagonal(mut self, allow: bool) -> Self {
        self.allow_diagonal = allow;
        self
    }

    /// Enable or disable vertical steps.
    #[must_use]
    pub fn with_vertical(mut self, allow: bool) -> Self {
        self.allow_vertical = allow;
        self
    }

    /// Set the cost of a vertical step.
    #[must_use]
    pub fn with_vertical_step_cost(mut self, cost: f64) -> Self {
        self.vertical_step_cost = cost;
        self
    }

    /// Set a wall-clock limit.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_expansions == 0 {
            return Err(SearchError::InvalidConfig(
                "max_expansions must be at least 1".to_string(),
            ));
        }
        // A vertical step spans one voxel diagonally in a vertical plane.
        if !self.vertical_step_cost.is_finite() || self.vertical_step_cost < std::f64::consts::SQRT_2
        {
            return Err(SearchError::InvalidConfig(format!(
                "vertical_step_cost {} must be finite and at least sqrt(2)",
                self.vertical_step_cost
            )));
        }
        Ok(())
    }
}
