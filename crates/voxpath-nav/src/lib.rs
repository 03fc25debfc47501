//! A* path search for agents moving through chunked voxel worlds.
//!
//! The engine reads occupancy through [`voxpath_core::WorldQuery`] and never
//! mutates or caches the world, so many searches can run concurrently against
//! one shared store.
//!
//! - [`PathFinder`] runs searches under a [`SearchConfig`]
//! - [`BoundingBox`] describes the volume an agent occupies
//! - [`PathOutcome`] is either a [`PathResult`] or a [`NoPathFound`] report
//! - [`CancelToken`] stops a search from another thread

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod bounds;
pub mod cancel;
pub mod config;
pub mod error;
pub mod path;
pub mod search;

pub use bounds::BoundingBox;
pub use cancel::CancelToken;
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use path::{NoPathFound, NoPathReason, PathOutcome, PathResult};
pub use search::{find_path, PathFinder};
