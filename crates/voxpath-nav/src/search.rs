//! A* path search over voxel worlds.
//!
//! The engine expands the frontier node with the lowest `f = g + h`, where
//! `g` is the cost accumulated from the start and `h` the Euclidean distance
//! to the goal. Planar axis moves cost 1 and planar diagonals `√2`, so the
//! heuristic never overestimates.
//!
//! # Movement rules
//!
//! - The four axis-aligned planar neighbours are accepted when the agent's
//!   bounding volume fits there.
//! - A diagonal is accepted only when both flanking axis neighbours are also
//!   clear; the agent never cuts a blocked corner.
//! - While standing on solid ground the agent may step up onto a blocked
//!   neighbour (headroom for the whole volume is required above its current
//!   position) or step down off a ledge onto supported ground one level lower.
//!
//! # Example
//!
//! ```
//! use voxpath_core::{query::from_fn, GlobalVoxelCoordinates};
//! use voxpath_nav::{find_path, BoundingBox};
//!
//! let open_air = from_fn(|_| false);
//! let outcome = find_path(
//!     &open_air,
//!     &BoundingBox::default(),
//!     GlobalVoxelCoordinates::new(0, 4, 0),
//!     GlobalVoxelCoordinates::new(5, 4, 0),
//! )
//! .unwrap();
//!
//! assert_eq!(outcome.path().unwrap().len(), 6);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::SQRT_2;
use std::time::Instant;

use hashbrown::hash_map::Entry;
use hashbrown::{HashMap, HashSet};
use voxpath_core::{GlobalVoxelCoordinates, Vector3i, WorldQuery};

use crate::bounds::BoundingBox;
use crate::cancel::CancelToken;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::path::{NoPathFound, NoPathReason, PathOutcome, PathResult};

/// How often the wall clock is sampled, in expansions.
const CLOCK_INTERVAL: usize = 64;

/// Pairs of indices into [`Vector3i::HORIZONTAL`] forming the four diagonals.
const DIAGONALS: [(usize, usize); 4] = [(0, 2), (0, 3), (1, 2), (1, 3)];

/// Frontier entry.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    pos: GlobalVoxelCoordinates,
    f: f64,
    h: f64,
    /// Insertion order, the final tie-breaker.
    seq: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap: lowest f, then lowest h, then oldest.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Best known cost and predecessor for a visited position.
#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    g: f64,
    parent: Option<GlobalVoxelCoordinates>,
}

/// A* path finder.
///
/// Holds only configuration, so one instance can serve any number of
/// concurrent searches. The world and bounding volume are supplied per call.
#[derive(Debug, Clone, Default)]
pub struct PathFinder {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl PathFinder {
    /// Create a path finder with the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Stop searches early once `token` is cancelled.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find a path from `start` to `goal`.
    ///
    /// Returns `Ok(PathOutcome::NoPathFound)` when no route exists or a limit
    /// was hit; `Err` only for an invalid configuration or bounding volume.
    /// The start position itself is not checked for clearance.
    #[tracing::instrument(level = "trace", skip_all, fields(%start, %goal))]
    pub fn find_path<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        bounds: &BoundingBox,
        start: GlobalVoxelCoordinates,
        goal: GlobalVoxelCoordinates,
    ) -> Result<PathOutcome> {
        self.config.validate()?;
        bounds.validate()?;
        tracing::debug!(%start, %goal, budget = self.config.max_expansions, "searching");

        let search = Search {
            world,
            bounds,
            config: &self.config,
            cancel: self.cancel.as_ref(),
            goal,
        };
        let outcome = search.run(start);

        match &outcome {
            PathOutcome::Found(path) => tracing::debug!(
                %start,
                %goal,
                waypoints = path.len(),
                cost = path.cost(),
                expanded = path.nodes_expanded(),
                "path found"
            ),
            PathOutcome::NoPathFound(failure) => tracing::debug!(
                %start,
                %goal,
                reason = %failure.reason,
                expanded = failure.nodes_expanded,
                "no path found"
            ),
        }
        Ok(outcome)
    }
}

/// Find a path with the default configuration.
///
/// See [`PathFinder::find_path`].
pub fn find_path<W: WorldQuery + ?Sized>(
    world: &W,
    bounds: &BoundingBox,
    start: GlobalVoxelCoordinates,
    goal: GlobalVoxelCoordinates,
) -> Result<PathOutcome> {
    PathFinder::default().find_path(world, bounds, start, goal)
}

/// State borrowed for the duration of one search.
struct Search<'a, W: ?Sized> {
    world: &'a W,
    bounds: &'a BoundingBox,
    config: &'a SearchConfig,
    cancel: Option<&'a CancelToken>,
    goal: GlobalVoxelCoordinates,
}

impl<W: WorldQuery + ?Sized> Search<'_, W> {
    fn heuristic(&self, pos: GlobalVoxelCoordinates) -> f64 {
        pos.distance_to(self.goal)
    }

    fn fits(&self, pos: GlobalVoxelCoordinates) -> bool {
        self.bounds.fits(self.world, pos)
    }

    fn supported(&self, pos: GlobalVoxelCoordinates) -> bool {
        self.bounds.is_supported(self.world, pos)
    }

    fn run(&self, start: GlobalVoxelCoordinates) -> PathOutcome {
        let started = Instant::now();
        let mut open = BinaryHeap::new();
        let mut records: HashMap<GlobalVoxelCoordinates, NodeRecord> = HashMap::new();
        let mut closed: HashSet<GlobalVoxelCoordinates> = HashSet::new();
        let mut neighbors = Vec::with_capacity(16);
        let mut seq = 0u64;
        let mut expanded = 0usize;

        let h = self.heuristic(start);
        records.insert(start, NodeRecord { g: 0.0, parent: None });
        open.push(OpenNode {
            pos: start,
            f: h,
            h,
            seq,
        });

        let no_path = |reason, nodes_expanded| {
            PathOutcome::NoPathFound(NoPathFound {
                reason,
                nodes_expanded,
            })
        };

        while let Some(node) = open.pop() {
            // A position may sit in the heap several times; the first pop wins.
            if closed.contains(&node.pos) {
                continue;
            }
            let Some(&NodeRecord { g, .. }) = records.get(&node.pos) else {
                continue;
            };

            if node.pos == self.goal {
                let waypoints = reconstruct(&records, self.goal);
                return PathOutcome::Found(PathResult::new(waypoints, g, expanded));
            }

            if self.cancel.is_some_and(CancelToken::is_cancelled) {
                tracing::trace!(expanded, "search cancelled");
                return no_path(NoPathReason::Cancelled, expanded);
            }
            if expanded >= self.config.max_expansions {
                tracing::trace!(expanded, "expansion budget exceeded");
                return no_path(NoPathReason::BudgetExceeded, expanded);
            }
            if let Some(timeout) = self.config.timeout {
                if expanded % CLOCK_INTERVAL == 0 && started.elapsed() >= timeout {
                    tracing::trace!(expanded, ?timeout, "search timed out");
                    return no_path(NoPathReason::TimedOut, expanded);
                }
            }

            closed.insert(node.pos);
            expanded += 1;

            self.neighbors(node.pos, &mut neighbors);
            for &(next, step_cost) in &neighbors {
                if closed.contains(&next) {
                    continue;
                }
                let tentative = g + step_cost;
                match records.entry(next) {
                    Entry::Occupied(mut entry) => {
                        if entry.get().g <= tentative {
                            continue;
                        }
                        *entry.get_mut() = NodeRecord {
                            g: tentative,
                            parent: Some(node.pos),
                        };
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(NodeRecord {
                            g: tentative,
                            parent: Some(node.pos),
                        });
                    }
                }

                let h = self.heuristic(next);
                seq += 1;
                open.push(OpenNode {
                    pos: next,
                    f: tentative + h,
                    h,
                    seq,
                });
            }
        }

        no_path(NoPathReason::Exhausted, expanded)
    }

    /// Collect every legal move out of `pos` with its cost.
    ///
    /// Moves that would leave the `i32` coordinate range are skipped.
    fn neighbors(&self, pos: GlobalVoxelCoordinates, out: &mut Vec<(GlobalVoxelCoordinates, f64)>) {
        out.clear();

        let mut open_axes = [false; 4];
        for (i, &dir) in Vector3i::HORIZONTAL.iter().enumerate() {
            let Some(next) = pos.checked_add(dir) else {
                continue;
            };
            if self.fits(next) {
                open_axes[i] = true;
                out.push((next, 1.0));
            }
        }

        if self.config.allow_diagonal {
            for (a, b) in DIAGONALS {
                if !(open_axes[a] && open_axes[b]) {
                    continue;
                }
                let step = Vector3i::HORIZONTAL[a] + Vector3i::HORIZONTAL[b];
                if let Some(next) = pos.checked_add(step).filter(|&next| self.fits(next)) {
                    out.push((next, SQRT_2));
                }
            }
        }

        if self.config.allow_vertical && self.supported(pos) {
            self.vertical_neighbors(pos, &open_axes, out);
        }
    }

    fn vertical_neighbors(
        &self,
        pos: GlobalVoxelCoordinates,
        open_axes: &[bool; 4],
        out: &mut Vec<(GlobalVoxelCoordinates, f64)>,
    ) {
        let cost = self.config.vertical_step_cost;
        let mut headroom: Option<bool> = None;

        for (i, &dir) in Vector3i::HORIZONTAL.iter().enumerate() {
            if open_axes[i] {
                // Step down off a ledge onto ground one level lower.
                let Some(ledge) = pos.checked_add(dir) else {
                    continue;
                };
                if self.supported(ledge) {
                    continue;
                }
                if let Some(below) = ledge.checked_add(Vector3i::DOWN) {
                    if self.fits(below) && self.supported(below) {
                        out.push((below, cost));
                    }
                }
            } else {
                // Step up onto the blocked neighbour.
                let clear_above = *headroom.get_or_insert_with(|| {
                    pos.checked_add(Vector3i::UP)
                        .is_some_and(|up| self.fits(up))
                });
                if !clear_above {
                    continue;
                }
                if let Some(above) = pos.checked_add(dir + Vector3i::UP) {
                    if self.fits(above) {
                        out.push((above, cost));
                    }
                }
            }
        }
    }
}

/// Follow predecessor links back from `goal` and return the path start-first.
fn reconstruct(
    records: &HashMap<GlobalVoxelCoordinates, NodeRecord>,
    goal: GlobalVoxelCoordinates,
) -> Vec<GlobalVoxelCoordinates> {
    let mut waypoints = vec![goal];
    let mut current = goal;
    while let Some(parent) = records.get(&current).and_then(|record| record.parent) {
        waypoints.push(parent);
        current = parent;
    }
    waypoints.reverse();
    waypoints
}
