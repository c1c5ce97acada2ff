//! Dense voxel chunks, sentinel voxel IDs, and neighbor-aware cluster addressing.

pub mod chunk;
pub mod cluster;
pub mod error;
pub mod voxel;

pub use chunk::{Chunk, VoxelAccess, index_to_pos, pos_to_index};
pub use cluster::{
    BlockCluster, BlockLayout, ChunkRef, Cluster, ClusterLayout, FaceCluster, FaceLayout,
    FaceSlot,
};
pub use error::ChunkError;
pub use voxel::VoxelId;
