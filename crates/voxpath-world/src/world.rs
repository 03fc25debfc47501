//! Thread-safe chunk store with block-level access.

use hashbrown::HashMap;
use parking_lot::RwLock;
use voxpath_core::constants::WORLD_HEIGHT;
use voxpath_core::{BlockId, ChunkCoordinates, GlobalVoxelCoordinates, Result, WorldQuery};

use crate::chunk::Chunk;

/// What the world reports for voxels in chunks that are not loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnloadedPolicy {
    /// Missing chunks block movement.
    #[default]
    Solid,
    /// Missing chunks are open air.
    Empty,
}

/// Configuration for a [`VoxelWorld`].
#[derive(Debug, Clone)]
pub struct WorldConfig {
    /// Occupancy reported for unloaded chunks.
    pub unloaded: UnloadedPolicy,
    /// Number of chunks to reserve space for up front.
    pub initial_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            unloaded: UnloadedPolicy::Solid,
            initial_capacity: 64,
        }
    }
}

impl WorldConfig {
    /// Use the given policy for unloaded chunks.
    #[must_use]
    pub fn with_unloaded(mut self, unloaded: UnloadedPolicy) -> Self {
        self.unloaded = unloaded;
        self
    }
}

/// Manages all loaded chunks with spatial indexing.
///
/// Provides thread-safe access to chunks via `RwLock`, so path searches can
/// read while other threads edit blocks. Each query takes the read lock for a
/// single lookup only.
pub struct VoxelWorld {
    /// All loaded chunks indexed by position.
    chunks: RwLock<HashMap<ChunkCoordinates, Chunk>>,
    config: WorldConfig,
}

impl VoxelWorld {
    /// Create an empty world.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            chunks: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            config,
        }
    }

    /// Create an empty world where unloaded chunks read as air.
    pub fn open() -> Self {
        Self::new(WorldConfig::default().with_unloaded(UnloadedPolicy::Empty))
    }

    /// Get the world configuration.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Check if a chunk exists at the given position.
    pub fn contains_chunk(&self, pos: ChunkCoordinates) -> bool {
        self.chunks.read().contains_key(&pos)
    }

    /// Get the number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().len()
    }

    /// Check if no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Insert or replace a chunk, returning the one it replaced.
    pub fn insert_chunk(&self, chunk: Chunk) -> Option<Chunk> {
        self.chunks.write().insert(chunk.pos, chunk)
    }

    /// Remove a chunk at the given position.
    pub fn remove_chunk(&self, pos: ChunkCoordinates) -> Option<Chunk> {
        self.chunks.write().remove(&pos)
    }

    /// Get all loaded chunk positions.
    pub fn positions(&self) -> Vec<ChunkCoordinates> {
        self.chunks.read().keys().copied().collect()
    }

    /// Execute a function with read access to a chunk.
    ///
    /// Returns `None` if the chunk doesn't exist.
    pub fn with_chunk<F, R>(&self, pos: ChunkCoordinates, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        self.chunks.read().get(&pos).map(f)
    }

    /// Execute a function with write access to a chunk.
    ///
    /// Returns `None` if the chunk doesn't exist.
    pub fn with_chunk_mut<F, R>(&self, pos: ChunkCoordinates, f: F) -> Option<R>
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        self.chunks.write().get_mut(&pos).map(f)
    }

    /// Get the block at a global position.
    ///
    /// Returns `None` if the owning chunk is not loaded or `pos` lies outside
    /// the world's vertical extent.
    pub fn block(&self, pos: GlobalVoxelCoordinates) -> Option<BlockId> {
        let (chunk, local) = pos.split().ok()?;
        self.with_chunk(chunk, |c| c.get(local))
    }

    /// Set the block at a global position, loading an empty chunk if needed.
    ///
    /// Returns the previous block.
    pub fn set_block(&self, pos: GlobalVoxelCoordinates, block: BlockId) -> Result<BlockId> {
        let (chunk_pos, local) = pos.split()?;
        let mut chunks = self.chunks.write();
        let chunk = chunks
            .entry(chunk_pos)
            .or_insert_with(|| Chunk::new(chunk_pos));
        Ok(chunk.set(local, block))
    }

    /// Fill the inclusive box `min..=max` with one block.
    ///
    /// Returns the number of voxels written.
    pub fn fill(
        &self,
        min: GlobalVoxelCoordinates,
        max: GlobalVoxelCoordinates,
        block: BlockId,
    ) -> Result<usize> {
        let mut written = 0;
        for y in min.y.min(max.y)..=min.y.max(max.y) {
            for z in min.z.min(max.z)..=min.z.max(max.z) {
                for x in min.x.min(max.x)..=min.x.max(max.x) {
                    self.set_block(GlobalVoxelCoordinates::new(x, y, z), block)?;
                    written += 1;
                }
            }
        }
        Ok(written)
    }

    /// Load empty chunks covering every column within `radius` chunks of `center`.
    pub fn ensure_chunks(&self, center: ChunkCoordinates, radius: i32) -> usize {
        let mut chunks = self.chunks.write();
        let mut created = 0;
        for x in center.x - radius..=center.x + radius {
            for z in center.z - radius..=center.z + radius {
                let pos = ChunkCoordinates::new(x, z);
                chunks.entry(pos).or_insert_with(|| {
                    created += 1;
                    Chunk::new(pos)
                });
            }
        }
        tracing::debug!(%center, radius, created, "ensured chunks");
        created
    }

    /// Get total memory usage of all chunks.
    pub fn memory_usage(&self) -> usize {
        self.chunks.read().values().map(Chunk::memory_usage).sum()
    }
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl WorldQuery for VoxelWorld {
    fn is_occupied(&self, pos: GlobalVoxelCoordinates) -> bool {
        if !(0..WORLD_HEIGHT).contains(&pos.y) {
            return true;
        }
        match self.block(pos) {
            Some(block) => block.is_solid(),
            None => self.config.unloaded == UnloadedPolicy::Solid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use voxpath_core::constants::{CHUNK_DEPTH, CHUNK_WIDTH};
    use voxpath_core::Error;

    #[test]
    fn insert_and_retrieve() {
        let world = VoxelWorld::default();
        let pos = ChunkCoordinates::new(1, 2);

        assert!(world.insert_chunk(Chunk::new(pos)).is_none());

        assert!(world.contains_chunk(pos));
        assert_eq!(world.chunk_count(), 1);
        assert_eq!(world.positions(), vec![pos]);
    }

    #[test]
    fn remove_chunk() {
        let world = VoxelWorld::default();
        let pos = ChunkCoordinates::new(1, 2);
        world.insert_chunk(Chunk::new(pos));

        assert!(world.remove_chunk(pos).is_some());
        assert!(!world.contains_chunk(pos));
        assert!(world.is_empty());
    }

    #[test]
    fn set_block_across_negative_chunks() {
        let world = VoxelWorld::default();
        let pos = GlobalVoxelCoordinates::new(-1, 10, -CHUNK_DEPTH - 3);

        assert_eq!(world.set_block(pos, BlockId::STONE), Ok(BlockId::AIR));
        assert!(world.contains_chunk(ChunkCoordinates::new(-1, -2)));
        assert_eq!(world.block(pos), Some(BlockId::STONE));
        assert_eq!(
            world.block(GlobalVoxelCoordinates::new(CHUNK_WIDTH - 1, 10, CHUNK_DEPTH - 3)),
            None
        );
    }

    #[test]
    fn set_block_rejects_out_of_height() {
        let world = VoxelWorld::default();
        let result = world.set_block(GlobalVoxelCoordinates::new(0, WORLD_HEIGHT, 0), BlockId::STONE);
        assert!(matches!(result, Err(Error::OutOfRange { .. })));
        assert!(world.is_empty());
    }

    #[test]
    fn unloaded_policy() {
        let pos = GlobalVoxelCoordinates::new(100, 5, 100);

        let solid = VoxelWorld::default();
        assert!(solid.is_occupied(pos));

        let open = VoxelWorld::open();
        assert!(!open.is_occupied(pos));

        // Outside the vertical extent is always solid.
        assert!(open.is_occupied(GlobalVoxelCoordinates::new(0, -1, 0)));
        assert!(open.is_occupied(GlobalVoxelCoordinates::new(0, WORLD_HEIGHT, 0)));
    }

    #[test]
    fn loaded_air_is_not_occupied() {
        let world = VoxelWorld::default();
        world.ensure_chunks(ChunkCoordinates::new(0, 0), 1);
        assert_eq!(world.chunk_count(), 9);
        assert!(!world.is_occupied(GlobalVoxelCoordinates::new(-5, 4, 20)));
        assert!(world.is_occupied(GlobalVoxelCoordinates::new(-50, 4, 20)));
    }

    #[test]
    fn fill_box() {
        let world = VoxelWorld::open();
        let written = world
            .fill(
                GlobalVoxelCoordinates::new(2, 4, 2),
                GlobalVoxelCoordinates::new(-2, 3, -2),
                BlockId::STONE,
            )
            .unwrap();
        assert_eq!(written, 5 * 2 * 5);
        assert!(world.is_occupied(GlobalVoxelCoordinates::new(-2, 3, 2)));
        assert!(!world.is_occupied(GlobalVoxelCoordinates::new(-2, 5, 2)));
    }

    #[test]
    fn with_chunk_access() {
        let world = VoxelWorld::default();
        let pos = ChunkCoordinates::new(0, 0);
        world.insert_chunk(Chunk::new(pos));

        assert_eq!(world.with_chunk(pos, Chunk::is_empty), Some(true));
        world.with_chunk_mut(pos, |c| c.fill_layers(0, 1, BlockId::BEDROCK));
        assert_eq!(world.with_chunk(pos, Chunk::is_empty), Some(false));
        assert_eq!(world.with_chunk(ChunkCoordinates::new(9, 9), Chunk::is_empty), None);
    }

    #[test]
    fn concurrent_reads_and_writes() {
        let world = Arc::new(VoxelWorld::open());
        let writer = {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                for x in 0..64 {
                    world
                        .set_block(GlobalVoxelCoordinates::new(x, 1, 0), BlockId::STONE)
                        .unwrap();
                }
            })
        };
        let reader = {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                (0..64)
                    .filter(|&x| world.is_occupied(GlobalVoxelCoordinates::new(x, 2, 0)))
                    .count()
            })
        };

        writer.join().unwrap();
        assert_eq!(reader.join().unwrap(), 0);
        assert!((0..64).all(|x| world.is_occupied(GlobalVoxelCoordinates::new(x, 1, 0))));
    }
}
