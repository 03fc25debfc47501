//! Chunked voxel world for the Voxpath navigation engine.
//!
//! [`VoxelWorld`] is a thread-safe chunk store that implements
//! [`voxpath_core::WorldQuery`], so it can be handed straight to the path
//! search engine. [`ObstacleGenerator`] fills chunks with a flat floor and
//! noise-placed pillars for tests and benchmarks.

pub mod chunk;
pub mod generation;
pub mod world;

pub use chunk::Chunk;
pub use generation::{ObstacleConfig, ObstacleGenerator};
pub use world::{UnloadedPolicy, VoxelWorld, WorldConfig};

/// World seed for procedural generation.
pub type WorldSeed = u64;
