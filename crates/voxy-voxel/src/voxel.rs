//! Raw voxel identifiers and the engine-wide sentinel values.
//!
//! A voxel carries no identity beyond its integer value. Material data lives
//! outside this crate; here an ID is only ever copied, compared, and stored.
//! `EMPTY` is zero so that zero-initialized chunk memory represents air.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Compact identifier stored inside every voxel cell (4 bytes).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[derive(Pod, Zeroable)]
#[repr(transparent)]
pub struct VoxelId(pub u32);

impl VoxelId {
    /// Empty space (air). Also the value of zeroed storage.
    pub const EMPTY: VoxelId = VoxelId(0);
    /// Placeholder for a voxel whose content is missing or not yet known.
    pub const UNKNOWN: VoxelId = VoxelId(1);
    /// Highly visible marker used while debugging generation and meshing.
    pub const DEBUG: VoxelId = VoxelId(2);

    /// Number of reserved IDs. Application IDs start here.
    pub const PREDEFINED_COUNT: u32 = 3;

    /// First ID free for application use.
    pub const FIRST_CUSTOM: VoxelId = VoxelId(Self::PREDEFINED_COUNT);

    /// Returns `true` for the empty sentinel.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Returns `true` if this ID is one of the reserved sentinel values.
    #[inline]
    pub const fn is_predefined(self) -> bool {
        self.0 < Self::PREDEFINED_COUNT
    }
}

impl From<u32> for VoxelId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<VoxelId> for u32 {
    fn from(id: VoxelId) -> Self {
        id.0
    }
}
