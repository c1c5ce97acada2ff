//! Owner of all loaded chunks, keyed by chunk-grid address.

use glam::IVec3;
use rustc_hash::FxHashMap;
use voxy_voxel::{BlockCluster, BlockLayout, Chunk, FaceCluster, FaceSlot};

/// Edge length of a demo chunk in voxels.
pub const CHUNK_SIZE: usize = 16;

/// The chunk type streamed by the demo.
pub type DemoChunk = Chunk<CHUNK_SIZE, CHUNK_SIZE, CHUNK_SIZE>;

/// Loaded chunks by chunk-grid address. Chunk `a` covers world voxels
/// `a * CHUNK_SIZE .. (a + 1) * CHUNK_SIZE` on every axis.
#[derive(Default)]
pub struct ChunkGrid {
    chunks: FxHashMap<IVec3, Box<DemoChunk>>,
}

impl ChunkGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a chunk, replacing any chunk already at `addr`.
    pub fn load_chunk(&mut self, addr: IVec3, chunk: Box<DemoChunk>) {
        self.chunks.insert(addr, chunk);
    }

    /// Removes and returns the chunk at `addr`.
    pub fn unload_chunk(&mut self, addr: IVec3) -> Option<Box<DemoChunk>> {
        self.chunks.remove(&addr)
    }

    pub fn get_chunk(&self, addr: IVec3) -> Option<&DemoChunk> {
        self.chunks.get(&addr).map(|chunk| &**chunk)
    }

    pub fn contains(&self, addr: IVec3) -> bool {
        self.chunks.contains_key(&addr)
    }

    /// Number of currently loaded chunks.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over all loaded chunk addresses.
    pub fn loaded_addresses(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.chunks.keys().copied()
    }

    /// Drops every chunk for which `keep` returns `false`, returning how many.
    pub fn retain(&mut self, mut keep: impl FnMut(IVec3) -> bool) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|addr, _| keep(*addr));
        before - self.chunks.len()
    }

    /// Face cluster around `addr`. Unloaded neighbors leave their slot empty.
    pub fn face_cluster(&self, addr: IVec3) -> FaceCluster<&DemoChunk> {
        let mut cluster = FaceCluster::empty();
        for slot in FaceSlot::ALL {
            let offset = IVec3::from_array(slot.offset());
            cluster.set_face(slot, self.get_chunk(addr + offset));
        }
        cluster
    }

    /// Block cluster of the 27 chunks around `addr`.
    pub fn block_cluster(&self, addr: IVec3) -> BlockCluster<&DemoChunk> {
        let mut cluster = BlockCluster::empty();
        for slot in 0..27 {
            let offset = IVec3::from_array(BlockLayout::slot_offset(slot));
            cluster.set_slot(slot, self.get_chunk(addr + offset));
        }
        cluster
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use voxy_voxel::VoxelId;

    use super::*;

    fn filled(id: u32) -> Box<DemoChunk> {
        Box::new(DemoChunk::filled(VoxelId(id)))
    }

    #[test]
    fn test_load_then_get_returns_some() {
        let mut grid = ChunkGrid::new();
        let mut chunk = Box::new(DemoChunk::new());
        chunk.set(1, 2, 3, VoxelId(7));
        grid.load_chunk(IVec3::ZERO, chunk);

        let got = grid.get_chunk(IVec3::ZERO).expect("just loaded");
        assert_eq!(got.get(1, 2, 3), VoxelId(7));
    }

    #[test]
    fn test_unload_then_get_returns_none() {
        let mut grid = ChunkGrid::new();
        let a = IVec3::new(1, 2, 3);
        grid.load_chunk(a, filled(4));
        assert!(grid.unload_chunk(a).is_some());
        assert!(grid.get_chunk(a).is_none());
        assert!(grid.unload_chunk(a).is_none());
    }

    #[test]
    fn test_double_load_replaces() {
        let mut grid = ChunkGrid::new();
        grid.load_chunk(IVec3::ONE, filled(1));
        grid.load_chunk(IVec3::ONE, filled(2));
        assert_eq!(grid.loaded_count(), 1);
        assert_eq!(grid.get_chunk(IVec3::ONE).map(|c| c.get(0, 0, 0)), Some(VoxelId(2)));
    }

    #[test]
    fn test_retain_reports_removed() {
        let mut grid = ChunkGrid::new();
        for x in 0..5 {
            grid.load_chunk(IVec3::new(x, 0, 0), filled(3));
        }
        let removed = grid.retain(|addr| addr.x < 2);
        assert_eq!(removed, 3);
        assert_eq!(grid.loaded_count(), 2);
    }

    #[test]
    fn test_face_cluster_reads_across_chunks() {
        let mut grid = ChunkGrid::new();
        grid.load_chunk(IVec3::ZERO, filled(10));
        grid.load_chunk(IVec3::new(-1, 0, 0), filled(11));
        grid.load_chunk(IVec3::new(0, 0, 1), filled(12));

        let cluster = grid.face_cluster(IVec3::ZERO);
        assert_eq!(cluster.populated(), 3);
        assert_eq!(cluster.try_get_voxel(-1, 4, 4), Some(VoxelId(11)));
        assert_eq!(cluster.try_get_voxel(4, 4, 16), Some(VoxelId(12)));
        assert_eq!(cluster.try_get_voxel(16, 4, 4), None);
        assert_eq!(cluster.get_voxel(4, 4, 4, VoxelId::UNKNOWN), VoxelId(10));
    }

    #[test]
    fn test_block_cluster_includes_corners() {
        let mut grid = ChunkGrid::new();
        grid.load_chunk(IVec3::ZERO, filled(10));
        grid.load_chunk(IVec3::new(1, 1, 1), filled(20));

        let cluster = grid.block_cluster(IVec3::ZERO);
        assert_eq!(cluster.populated(), 2);
        assert_eq!(cluster.try_get_voxel(16, 16, 16), Some(VoxelId(20)));
        assert_eq!(cluster.try_get_voxel(-1, -1, -1), None);
    }
}
