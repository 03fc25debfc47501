//! Chunk data structure for voxel world storage.

use voxpath_core::constants::{CHUNK_DEPTH, CHUNK_VOLUME, CHUNK_WIDTH, WORLD_HEIGHT};
use voxpath_core::{BlockId, ChunkCoordinates, LocalVoxelCoordinates};

/// A single column of voxel data spanning the full world height.
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkCoordinates,
    /// Flat block storage indexed by [`LocalVoxelCoordinates::to_index`].
    blocks: Box<[BlockId]>,
    /// Number of non-air blocks.
    solid_count: usize,
}

impl Chunk {
    /// Create a new chunk filled with air.
    pub fn new(pos: ChunkCoordinates) -> Self {
        Self {
            pos,
            blocks: vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice(),
            solid_count: 0,
        }
    }

    /// Get the block at a local position.
    #[inline]
    pub fn get(&self, local: LocalVoxelCoordinates) -> BlockId {
        self.blocks[local.to_index()]
    }

    /// Set the block at a local position, returning the previous block.
    pub fn set(&mut self, local: LocalVoxelCoordinates, block: BlockId) -> BlockId {
        let slot = &mut self.blocks[local.to_index()];
        let previous = std::mem::replace(slot, block);
        match (previous.is_solid(), block.is_solid()) {
            (false, true) => self.solid_count += 1,
            (true, false) => self.solid_count -= 1,
            _ => {}
        }
        previous
    }

    /// Fill whole horizontal layers `y_min..y_max` with one block.
    pub fn fill_layers(&mut self, y_min: i32, y_max: i32, block: BlockId) {
        for y in y_min.max(0)..y_max.min(WORLD_HEIGHT) {
            for z in 0..CHUNK_DEPTH {
                for x in 0..CHUNK_WIDTH {
                    if let Ok(local) = LocalVoxelCoordinates::new(x, y, z) {
                        self.set(local, block);
                    }
                }
            }
        }
    }

    /// Check if this chunk is empty (all air).
    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Number of solid blocks in the chunk.
    pub fn solid_count(&self) -> usize {
        self.solid_count
    }

    /// Get memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + std::mem::size_of_val(&*self.blocks)
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("solid_count", &self.solid_count)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(x: i32, y: i32, z: i32) -> LocalVoxelCoordinates {
        LocalVoxelCoordinates::new(x, y, z).unwrap()
    }

    #[test]
    fn new_chunk_is_empty() {
        let chunk = Chunk::new(ChunkCoordinates::new(0, 0));
        assert!(chunk.is_empty());
        assert_eq!(chunk.get(local(3, 100, 7)), BlockId::AIR);
    }

    #[test]
    fn set_tracks_solid_count() {
        let mut chunk = Chunk::new(ChunkCoordinates::new(2, -1));
        let pos = local(1, 2, 3);

        assert_eq!(chunk.set(pos, BlockId::STONE), BlockId::AIR);
        assert_eq!(chunk.solid_count(), 1);
        assert_eq!(chunk.get(pos), BlockId::STONE);

        // Replacing solid with solid keeps the count.
        assert_eq!(chunk.set(pos, BlockId::GRASS), BlockId::STONE);
        assert_eq!(chunk.solid_count(), 1);

        chunk.set(pos, BlockId::AIR);
        assert!(chunk.is_empty());
    }

    #[test]
    fn fill_layers_covers_whole_layer() {
        let mut chunk = Chunk::new(ChunkCoordinates::new(0, 0));
        chunk.fill_layers(0, 2, BlockId::STONE);

        assert_eq!(chunk.solid_count(), (CHUNK_WIDTH * CHUNK_DEPTH * 2) as usize);
        assert!(chunk.get(local(CHUNK_WIDTH - 1, 1, CHUNK_DEPTH - 1)).is_solid());
        assert!(chunk.get(local(0, 2, 0)).is_air());
    }

    #[test]
    fn memory_usage_includes_blocks() {
        let chunk = Chunk::new(ChunkCoordinates::new(0, 0));
        assert!(chunk.memory_usage() >= CHUNK_VOLUME * std::mem::size_of::<BlockId>());
    }
}
