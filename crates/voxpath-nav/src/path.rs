//! Search results.

use std::fmt;

use voxpath_core::GlobalVoxelCoordinates;

/// An ordered, immutable waypoint sequence from start to goal inclusive.
///
/// Every consecutive pair of waypoints is one move of the search engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    waypoints: Vec<GlobalVoxelCoordinates>,
    cost: f64,
    nodes_expanded: usize,
}

impl PathResult {
    pub(crate) fn new(
        waypoints: Vec<GlobalVoxelCoordinates>,
        cost: f64,
        nodes_expanded: usize,
    ) -> Self {
        debug_assert!(!waypoints.is_empty());
        Self {
            waypoints,
            cost,
            nodes_expanded,
        }
    }

    /// All waypoints, start first.
    pub fn waypoints(&self) -> &[GlobalVoxelCoordinates] {
        &self.waypoints
    }

    /// First waypoint.
    pub fn start(&self) -> GlobalVoxelCoordinates {
        self.waypoints[0]
    }

    /// Last waypoint.
    pub fn goal(&self) -> GlobalVoxelCoordinates {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// Number of waypoints, including start and goal.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; a path holds at least its start.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Accumulated movement cost from start to goal.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of nodes the search expanded to find this path.
    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Iterate over the waypoints in order.
    pub fn iter(&self) -> std::slice::Iter<'_, GlobalVoxelCoordinates> {
        self.waypoints.iter()
    }

    /// Returns true if the path passes through `pos`.
    pub fn contains(&self, pos: GlobalVoxelCoordinates) -> bool {
        self.waypoints.contains(&pos)
    }

    /// Returns true if every consecutive pair of waypoints is a distinct
    /// single-voxel move (at most one unit on each axis).
    pub fn is_contiguous(&self) -> bool {
        let near = |a: i32, b: i32| (i64::from(b) - i64::from(a)).abs() <= 1;
        self.waypoints.windows(2).all(|pair| {
            let (a, b) = (pair[0], pair[1]);
            a != b && near(a.x, b.x) && near(a.y, b.y) && near(a.z, b.z)
        })
    }

    /// Consume the result, returning the waypoints.
    pub fn into_waypoints(self) -> Vec<GlobalVoxelCoordinates> {
        self.waypoints
    }
}

impl<'a> IntoIterator for &'a PathResult {
    type Item = &'a GlobalVoxelCoordinates;
    type IntoIter = std::slice::Iter<'a, GlobalVoxelCoordinates>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, waypoint) in self.waypoints.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{waypoint}")?;
        }
        Ok(())
    }
}

/// Why a search ended without a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoPathReason {
    /// Every reachable position was expanded.
    Exhausted,
    /// The node expansion budget ran out.
    BudgetExceeded,
    /// The caller's cancel token was set.
    Cancelled,
    /// The configured timeout elapsed.
    TimedOut,
}

impl fmt::Display for NoPathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exhausted => "frontier exhausted",
            Self::BudgetExceeded => "expansion budget exceeded",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed out",
        })
    }
}

/// Details of an unsuccessful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPathFound {
    pub reason: NoPathReason,
    pub nodes_expanded: usize,
}

impl fmt::Display for NoPathFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no path found ({}) after {} expansions",
            self.reason, self.nodes_expanded
        )
    }
}

/// Outcome of a search. Both variants are normal results.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    Found(PathResult),
    NoPathFound(NoPathFound),
}

impl PathOutcome {
    /// Returns true if a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Borrow the path, if one was found.
    pub fn path(&self) -> Option<&PathResult> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoPathFound(_) => None,
        }
    }

    /// Take the path, if one was found.
    pub fn into_path(self) -> Option<PathResult> {
        match self {
            Self::Found(path) => Some(path),
            Self::NoPathFound(_) => None,
        }
    }

    /// Reason the search failed, if it did.
    pub fn no_path_reason(&self) -> Option<NoPathReason> {
        match self {
            Self::Found(_) => None,
            Self::NoPathFound(failure) => Some(failure.reason),
        }
    }
}
