//! Counts solid voxel faces that border empty space, looking across chunk
//! boundaries through a face cluster.

use voxy_voxel::{FaceCluster, FaceSlot};

use crate::grid::{CHUNK_SIZE, DemoChunk};

/// Face tallies for one chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceExposure {
    /// Faces of solid voxels whose neighbor is empty.
    pub exposed: u64,
    /// Faces whose neighbor lies in an unloaded chunk.
    pub unresolved: u64,
}

impl std::ops::AddAssign for FaceExposure {
    fn add_assign(&mut self, rhs: Self) {
        self.exposed += rhs.exposed;
        self.unresolved += rhs.unresolved;
    }
}

/// Tallies the faces of every solid voxel in the cluster's center chunk.
///
/// Returns the default tally if the center slot is empty.
pub fn count_exposed_faces(cluster: &FaceCluster<&DemoChunk>) -> FaceExposure {
    let mut tally = FaceExposure::default();
    let Some(center) = cluster.center() else {
        return tally;
    };
    if center.is_uniform() && center.get(0, 0, 0).is_empty() {
        return tally;
    }

    let size = CHUNK_SIZE as i32;
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                if center.get(x as usize, y as usize, z as usize).is_empty() {
                    continue;
                }
                for slot in &FaceSlot::ALL[1..] {
                    let [dx, dy, dz] = slot.offset();
                    match cluster.try_get_voxel(x + dx, y + dy, z + dz) {
                        Some(neighbor) if neighbor.is_empty() => tally.exposed += 1,
                        Some(_) => {}
                        None => tally.unresolved += 1,
                    }
                }
            }
        }
    }
    tally
}

#[cfg(test)]
mod tests {
    use glam::IVec3;
    use voxy_voxel::VoxelId;

    use super::*;
    use crate::grid::ChunkGrid;

    const SOLID: VoxelId = VoxelId(5);

    #[test]
    fn test_lone_voxel_without_neighbors() {
        let mut chunk = DemoChunk::new();
        chunk.set(4, 4, 4, SOLID);
        let cluster = FaceCluster::new(Some(&chunk), None, None, None, None, None, None);
        assert_eq!(count_exposed_faces(&cluster), FaceExposure {
            exposed: 6,
            unresolved: 0
        });
    }

    #[test]
    fn test_boundary_voxel_needs_neighbor() {
        let mut chunk = DemoChunk::new();
        chunk.set(0, 4, 4, SOLID);
        let cluster = FaceCluster::new(Some(&chunk), None, None, None, None, None, None);
        let tally = count_exposed_faces(&cluster);
        assert_eq!(tally.exposed, 5);
        assert_eq!(tally.unresolved, 1);

        let air = DemoChunk::new();
        let cluster = FaceCluster::new(Some(&chunk), Some(&air), None, None, None, None, None);
        assert_eq!(count_exposed_faces(&cluster).exposed, 6);
    }

    #[test]
    fn test_solid_block_hides_shared_faces() {
        let mut grid = ChunkGrid::new();
        grid.load_chunk(IVec3::ZERO, Box::new(DemoChunk::filled(SOLID)));
        grid.load_chunk(IVec3::X, Box::new(DemoChunk::filled(SOLID)));
        grid.load_chunk(IVec3::NEG_X, Box::new(DemoChunk::new()));

        let tally = count_exposed_faces(&grid.face_cluster(IVec3::ZERO));
        let face = (CHUNK_SIZE * CHUNK_SIZE) as u64;
        // -X borders air, +X borders stone, the other four are unloaded.
        assert_eq!(tally.exposed, face);
        assert_eq!(tally.unresolved, 4 * face);
    }

    #[test]
    fn test_empty_center_counts_nothing() {
        let chunk = DemoChunk::new();
        let cluster = FaceCluster::new(Some(&chunk), None, None, None, None, None, None);
        assert_eq!(count_exposed_faces(&cluster), FaceExposure::default());
        assert_eq!(count_exposed_faces(&FaceCluster::empty()), FaceExposure::default());
    }
}
