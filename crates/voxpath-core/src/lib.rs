//! Core types for the Voxpath navigation engine.
//!
//! This crate provides the foundational types shared by the world store and
//! the path search engine:
//! - Integer displacement vectors
//! - Coordinate systems (global, chunk, chunk-local, column)
//! - Block identifiers
//! - The [`WorldQuery`] occupancy facade

pub mod coords;
pub mod error;
pub mod query;
pub mod types;
pub mod vector;

pub use coords::{
    ChunkCoordinates, GlobalColumnCoordinates, GlobalVoxelCoordinates, LocalColumnCoordinates,
    LocalVoxelCoordinates,
};
pub use error::{Axis, Error, Result};
pub use query::{from_fn, FnQuery, WorldQuery};
pub use types::BlockId;
pub use vector::Vector3i;

/// World-wide dimensions shared by every crate that converts coordinates.
pub mod constants {
    /// Width of a chunk along X, in voxels
    pub const CHUNK_WIDTH: i32 = 16;
    /// Depth of a chunk along Z, in voxels
    pub const CHUNK_DEPTH: i32 = 16;
    /// Vertical extent of the world, in voxels
    pub const WORLD_HEIGHT: i32 = 256;
    /// Total voxels in one chunk column
    pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_DEPTH * WORLD_HEIGHT) as usize;
}
