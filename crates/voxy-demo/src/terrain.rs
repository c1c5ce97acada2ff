//! Seeded heightmap terrain for streamed chunks.

use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use voxy_voxel::VoxelId;

use crate::grid::{CHUNK_SIZE, DemoChunk};

/// Topsoil voxel.
pub const DIRT: VoxelId = VoxelId::FIRST_CUSTOM;
/// Bedrock voxel, more than [`DIRT_DEPTH`] below the surface.
pub const STONE: VoxelId = VoxelId(VoxelId::FIRST_CUSTOM.0 + 1);
/// Dirt layer thickness in voxels.
pub const DIRT_DEPTH: i32 = 3;
/// Maximum surface deviation from the ground level, in voxels.
pub const ROUGHNESS: i32 = 2;

/// Deterministic terrain: the same seed always yields the same chunks.
#[derive(Clone, Copy, Debug)]
pub struct TerrainGenerator {
    seed: u64,
    ground_level: i32,
}

impl TerrainGenerator {
    pub fn new(seed: u64, ground_level: i32) -> Self {
        Self { seed, ground_level }
    }

    /// World-space height of the topmost solid voxel in column `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let column = (x as u32 as u64) << 32 | z as u32 as u64;
        let mut rng =
            Xoshiro256StarStar::seed_from_u64(self.seed ^ column.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        self.ground_level + rng.gen_range(-ROUGHNESS..=ROUGHNESS)
    }

    /// Voxel at a world position, given its column's surface height.
    fn voxel_at(height: i32, y: i32) -> VoxelId {
        if y > height {
            VoxelId::EMPTY
        } else if y > height - DIRT_DEPTH {
            DIRT
        } else {
            STONE
        }
    }

    /// Builds the chunk at chunk-grid address `addr`.
    pub fn generate(&self, addr: IVec3) -> Box<DemoChunk> {
        let size = CHUNK_SIZE as i32;
        let origin = addr * size;
        let (bottom, top) = (origin.y, origin.y + size - 1);

        // Chunks clear of the rough surface band skip the per-voxel pass.
        if bottom > self.ground_level + ROUGHNESS {
            return Box::new(DemoChunk::new());
        }
        if top <= self.ground_level - ROUGHNESS - DIRT_DEPTH {
            return Box::new(DemoChunk::filled(STONE));
        }

        let mut chunk = Box::new(DemoChunk::new());
        for lz in 0..CHUNK_SIZE {
            for lx in 0..CHUNK_SIZE {
                let height = self.surface_height(origin.x + lx as i32, origin.z + lz as i32);
                for ly in 0..CHUNK_SIZE {
                    let voxel = Self::voxel_at(height, origin.y + ly as i32);
                    if !voxel.is_empty() {
                        chunk.set(lx, ly, lz, voxel);
                    }
                }
            }
        }
        chunk
    }
}
