//! Procedural obstacle fields for exercising the path search engine.
//!
//! Produces a flat floor with scattered pillars. The layout is a pure function
//! of the seed, so searches over a generated world are reproducible.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use rayon::prelude::*;
use voxpath_core::constants::{CHUNK_DEPTH, CHUNK_WIDTH, WORLD_HEIGHT};
use voxpath_core::{BlockId, ChunkCoordinates, GlobalColumnCoordinates, LocalColumnCoordinates};

use crate::chunk::Chunk;
use crate::world::VoxelWorld;
use crate::WorldSeed;

/// Obstacle generator configuration.
#[derive(Debug, Clone)]
pub struct ObstacleConfig {
    /// Seed for noise generation.
    pub seed: WorldSeed,
    /// Number of solid layers forming the floor; agents walk at this Y.
    pub floor_height: i32,
    /// Height of each pillar above the floor.
    pub pillar_height: i32,
    /// Noise value above which a column becomes a pillar, in `[-1, 1]`.
    /// Lower values produce denser obstacles.
    pub threshold: f64,
    /// Horizontal scale of obstacle clusters.
    pub scale: f64,
    /// Number of noise octaves for detail.
    pub octaves: usize,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_height: 4,
            pillar_height: 3,
            threshold: 0.25,
            scale: 12.0,
            octaves: 3,
        }
    }
}

/// Flat-floor world generator with noise-placed pillars.
pub struct ObstacleGenerator {
    config: ObstacleConfig,
    noise: Fbm<Perlin>,
}

impl ObstacleGenerator {
    /// Create a new generator with the given configuration.
    pub fn new(config: ObstacleConfig) -> Self {
        let noise = Fbm::<Perlin>::new(fold_seed(config.seed)).set_octaves(config.octaves);
        Self { config, noise }
    }

    /// Create a generator with default configuration.
    pub fn with_seed(seed: WorldSeed) -> Self {
        Self::new(ObstacleConfig {
            seed,
            ..Default::default()
        })
    }

    /// Get the generator configuration.
    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }

    /// Y level agents stand at (first air layer above the floor).
    pub fn walk_level(&self) -> i32 {
        self.config.floor_height
    }

    /// Returns true if the column carries a pillar.
    pub fn is_pillar(&self, column: GlobalColumnCoordinates) -> bool {
        let nx = f64::from(column.x) / self.config.scale;
        let nz = f64::from(column.z) / self.config.scale;
        self.noise.get([nx, nz]) > self.config.threshold
    }

    /// Generate a chunk's voxel data at the given position.
    pub fn generate_chunk(&self, pos: ChunkCoordinates) -> Chunk {
        let mut chunk = Chunk::new(pos);
        let floor = self.config.floor_height.clamp(0, WORLD_HEIGHT);
        let pillar_top = (floor + self.config.pillar_height).clamp(floor, WORLD_HEIGHT);

        chunk.fill_layers(0, 1_i32.min(floor), BlockId::BEDROCK);
        chunk.fill_layers(1, floor - 1, BlockId::STONE);
        chunk.fill_layers(floor - 1, floor, BlockId::GRASS);

        for lz in 0..CHUNK_DEPTH {
            for lx in 0..CHUNK_WIDTH {
                let Ok(local) = LocalColumnCoordinates::new(lx, lz) else {
                    continue;
                };
                if !self.is_pillar(GlobalColumnCoordinates::from_chunk_local(pos, local)) {
                    continue;
                }
                for y in floor..pillar_top {
                    if let Ok(voxel) = local.at_height(y) {
                        chunk.set(voxel, BlockId::STONE);
                    }
                }
            }
        }

        chunk
    }

    /// Generate multiple chunks in parallel.
    pub fn generate_chunks_parallel(&self, positions: &[ChunkCoordinates]) -> Vec<Chunk> {
        positions
            .par_iter()
            .map(|&pos| self.generate_chunk(pos))
            .collect()
    }

    /// Generate and load every chunk within `radius` of `center`.
    ///
    /// Returns the number of chunks inserted.
    pub fn populate(&self, world: &VoxelWorld, center: ChunkCoordinates, radius: i32) -> usize {
        let positions: Vec<_> = (center.x - radius..=center.x + radius)
            .flat_map(|x| {
                (center.z - radius..=center.z + radius).map(move |z| ChunkCoordinates::new(x, z))
            })
            .collect();

        let chunks = self.generate_chunks_parallel(&positions);
        let count = chunks.len();
        for chunk in chunks {
            world.insert_chunk(chunk);
        }
        tracing::info!(%center, radius, chunks = count, seed = self.config.seed, "populated world");
        count
    }
}

/// Noise seeds are 32-bit; fold the high half in so every seed bit counts.
#[allow(clippy::cast_possible_truncation)]
const fn fold_seed(seed: WorldSeed) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxpath_core::{GlobalVoxelCoordinates, WorldQuery};

    #[test]
    fn generator_deterministic() {
        let gen1 = ObstacleGenerator::with_seed(12345);
        let gen2 = ObstacleGenerator::with_seed(12345);

        for x in -50..50 {
            for z in -50..50 {
                let column = GlobalColumnCoordinates::new(x, z);
                assert_eq!(gen1.is_pillar(column), gen2.is_pillar(column));
            }
        }
    }

    #[test]
    fn high_seed_bits_change_layout() {
        let low = 0x0000_0000_1234_5678;
        let high = 0x0000_0001_1234_5678;
        assert_ne!(fold_seed(low), fold_seed(high));

        let gen_low = ObstacleGenerator::with_seed(low);
        let gen_high = ObstacleGenerator::with_seed(high);
        let differing = (-50..50)
            .flat_map(|x| (-50..50).map(move |z| GlobalColumnCoordinates::new(x, z)))
            .filter(|&column| gen_low.is_pillar(column) != gen_high.is_pillar(column))
            .count();
        assert!(differing > 0);
    }

    #[test]
    fn floor_is_solid_and_walk_level_has_air() {
        let gen = ObstacleGenerator::with_seed(7);
        let world = VoxelWorld::default();
        gen.populate(&world, ChunkCoordinates::new(0, 0), 1);

        let level = gen.walk_level();
        let mut open_columns = 0;
        for x in -16..32 {
            for z in -16..32 {
                let column = GlobalColumnCoordinates::new(x, z);
                assert!(world.is_occupied(column.at_height(level - 1)));
                assert!(world.is_occupied(column.at_height(0)));
                if !world.is_occupied(column.at_height(level)) {
                    open_columns += 1;
                }
                assert_eq!(world.is_occupied(column.at_height(level)), gen.is_pillar(column));
            }
        }
        assert!(open_columns > 0);
    }

    #[test]
    fn pillars_stop_at_configured_height() {
        let gen = ObstacleGenerator::new(ObstacleConfig {
            threshold: -2.0, // every column is a pillar
            ..Default::default()
        });
        let chunk = gen.generate_chunk(ChunkCoordinates::new(0, 0));
        let world = VoxelWorld::default();
        world.insert_chunk(chunk);

        let top = gen.walk_level() + gen.config().pillar_height;
        assert!(world.is_occupied(GlobalVoxelCoordinates::new(3, top - 1, 3)));
        assert!(!world.is_occupied(GlobalVoxelCoordinates::new(3, top, 3)));
    }

    #[test]
    fn parallel_generation_matches_sequential() {
        let gen = ObstacleGenerator::with_seed(42);
        let positions = vec![
            ChunkCoordinates::new(0, 0),
            ChunkCoordinates::new(-1, 0),
            ChunkCoordinates::new(0, -3),
        ];

        for parallel in gen.generate_chunks_parallel(&positions) {
            let sequential = gen.generate_chunk(parallel.pos);
            assert_eq!(parallel.solid_count(), sequential.solid_count());
        }
    }
}
