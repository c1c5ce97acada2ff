//! Neighbor-aware voxel addressing across chunk boundaries.
//!
//! A [`Cluster`] holds references to a center chunk and some of its
//! neighbors. Voxel coordinates are given relative to the center chunk's
//! origin and may step one chunk length outside it on any axis; the cluster
//! routes each query to the chunk that owns the voxel and rewrites the
//! coordinate into that chunk's local space.
//!
//! Slots hold borrowed handles only (`&Chunk` or `&mut Chunk`, see
//! [`ChunkRef`]). A cluster never owns chunk memory, and the borrow checker
//! guarantees it cannot outlive the chunks it references. Clusters are meant
//! to be built per query and dropped afterwards.

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::chunk::VoxelAccess;
use crate::voxel::VoxelId;

mod sealed {
    pub trait Sealed {}

    impl<C: ?Sized> Sealed for &C {}
    impl<C: ?Sized> Sealed for &mut C {}
}

/// Borrowed chunk handle a cluster slot can hold: `&C` or `&mut C`.
///
/// Sealed; owning pointers such as `Box<C>` are not handles.
pub trait ChunkRef: Deref + sealed::Sealed {}

impl<C: VoxelAccess> ChunkRef for &C {}
impl<C: VoxelAccess> ChunkRef for &mut C {}

/// Strategy mapping a center-relative voxel coordinate to a cluster slot.
pub trait ClusterLayout {
    /// Number of chunk slots in this layout.
    const SLOTS: usize;

    /// Resolves `(x, y, z)` into `(slot, local position)` for chunks of the
    /// given `size`, or `None` if no slot can own the coordinate.
    fn route(x: i32, y: i32, z: i32, size: [usize; 3]) -> Option<(usize, [usize; 3])>;
}

/// Named slots of a [`FaceCluster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceSlot {
    /// The chunk the coordinates are relative to.
    Center = 0,
    /// −X neighbor.
    NegX = 1,
    /// +X neighbor.
    PosX = 2,
    /// −Y neighbor.
    NegY = 3,
    /// +Y neighbor.
    PosY = 4,
    /// −Z neighbor.
    NegZ = 5,
    /// +Z neighbor.
    PosZ = 6,
}

impl FaceSlot {
    /// All slots in storage order.
    pub const ALL: [FaceSlot; 7] = [
        FaceSlot::Center,
        FaceSlot::NegX,
        FaceSlot::PosX,
        FaceSlot::NegY,
        FaceSlot::PosY,
        FaceSlot::NegZ,
        FaceSlot::PosZ,
    ];

    /// Storage index of this slot.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Chunk-grid offset of the neighbor this slot refers to.
    pub const fn offset(self) -> [i32; 3] {
        match self {
            FaceSlot::Center => [0, 0, 0],
            FaceSlot::NegX => [-1, 0, 0],
            FaceSlot::PosX => [1, 0, 0],
            FaceSlot::NegY => [0, -1, 0],
            FaceSlot::PosY => [0, 1, 0],
            FaceSlot::NegZ => [0, 0, -1],
            FaceSlot::PosZ => [0, 0, 1],
        }
    }
}

/// Center chunk plus its six axis-adjacent neighbors.
///
/// Valid input on each axis is `[-length, 2 * length - 1]` with at most one
/// axis outside `[0, length)`. Edge and corner voxels of the neighborhood are
/// not reachable; use [`BlockLayout`] for those.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLayout;

impl ClusterLayout for FaceLayout {
    const SLOTS: usize = 7;

    #[inline]
    fn route(x: i32, y: i32, z: i32, size: [usize; 3]) -> Option<(usize, [usize; 3])> {
        let [sx, sy, sz] = size.map(|len| len as i32);
        let (slot, x, y, z) = if x < 0 {
            (FaceSlot::NegX, x + sx, y, z)
        } else if x >= sx {
            (FaceSlot::PosX, x - sx, y, z)
        } else if y < 0 {
            (FaceSlot::NegY, x, y + sy, z)
        } else if y >= sy {
            (FaceSlot::PosY, x, y - sy, z)
        } else if z < 0 {
            (FaceSlot::NegZ, x, y, z + sz)
        } else if z >= sz {
            (FaceSlot::PosZ, x, y, z - sz)
        } else {
            (FaceSlot::Center, x, y, z)
        };
        local_position([x, y, z], size).map(|local| (slot.index(), local))
    }
}

/// Center chunk plus all 26 surrounding chunks (3×3×3).
///
/// Valid input on each axis is `[-length, 2 * length - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout;

impl BlockLayout {
    /// Slot of the center chunk.
    pub const CENTER: usize = 13;

    /// Slot index of the neighbor at chunk offset `(dx, dy, dz)`, each in
    /// `-1..=1`.
    pub const fn slot_index(dx: i32, dy: i32, dz: i32) -> usize {
        debug_assert!(dx.abs() <= 1 && dy.abs() <= 1 && dz.abs() <= 1);
        ((dx + 1) + (dy + 1) * 3 + (dz + 1) * 9) as usize
    }

    /// Chunk offset of a slot index, inverse of [`BlockLayout::slot_index`].
    pub const fn slot_offset(slot: usize) -> [i32; 3] {
        let slot = slot as i32;
        [slot % 3 - 1, slot / 3 % 3 - 1, slot / 9 - 1]
    }
}

impl ClusterLayout for BlockLayout {
    const SLOTS: usize = 27;

    #[inline]
    fn route(x: i32, y: i32, z: i32, size: [usize; 3]) -> Option<(usize, [usize; 3])> {
        let mut slot = 0;
        let mut stride = 1;
        let mut local = [0usize; 3];
        for (axis, coord) in [x, y, z].into_iter().enumerate() {
            // Widened so coordinates near the i32 limits stay unroutable
            // instead of overflowing.
            let len = size[axis] as i64;
            let shifted = i64::from(coord) + len;
            if !(0..3 * len).contains(&shifted) {
                return None;
            }
            let neighbor = shifted / len;
            local[axis] = (shifted - neighbor * len) as usize;
            slot += neighbor as usize * stride;
            stride *= 3;
        }
        Some((slot, local))
    }
}

fn local_position(pos: [i32; 3], size: [usize; 3]) -> Option<[usize; 3]> {
    let mut local = [0usize; 3];
    for axis in 0..3 {
        let coord = usize::try_from(pos[axis]).ok()?;
        if coord >= size[axis] {
            return None;
        }
        local[axis] = coord;
    }
    Some(local)
}

/// Fixed set of borrowed chunk handles arranged by layout `L`.
///
/// Only the [`FaceCluster`] and [`BlockCluster`] aliases can be constructed,
/// so `N` always equals `L::SLOTS`.
pub struct Cluster<S, L, const N: usize> {
    slots: [Option<S>; N],
    layout: PhantomData<L>,
}

/// Center chunk plus its six face neighbors (7 slots, see [`FaceSlot`]).
pub type FaceCluster<S> = Cluster<S, FaceLayout, 7>;

/// Center chunk plus its 26 neighbors (27 slots, see [`BlockLayout`]).
pub type BlockCluster<S> = Cluster<S, BlockLayout, 27>;

impl<S: ChunkRef> FaceCluster<S> {
    /// Creates a face cluster from its center and six neighbors.
    pub fn new(
        center: Option<S>,
        neg_x: Option<S>,
        pos_x: Option<S>,
        neg_y: Option<S>,
        pos_y: Option<S>,
        neg_z: Option<S>,
        pos_z: Option<S>,
    ) -> Self {
        Self::from_slots([center, neg_x, pos_x, neg_y, pos_y, neg_z, pos_z])
    }

    /// Creates a face cluster from slots in [`FaceSlot`] order.
    pub fn from_slots(slots: [Option<S>; 7]) -> Self {
        Self::with_slots(slots)
    }

    /// Creates a face cluster with every slot empty.
    pub fn empty() -> Self {
        Self::with_slots(std::array::from_fn(|_| None))
    }
}

impl<S> FaceCluster<S> {
    /// Handle in a named slot.
    pub fn face(&self, slot: FaceSlot) -> Option<&S> {
        self.slots[slot.index()].as_ref()
    }

    /// Replaces the handle in a named slot, returning the previous one.
    pub fn set_face(&mut self, slot: FaceSlot, handle: Option<S>) -> Option<S> {
        self.set_slot(slot.index(), handle)
    }
}

impl<S: ChunkRef> BlockCluster<S> {
    /// Creates a block cluster from slots in [`BlockLayout::slot_index`] order.
    pub fn from_slots(slots: [Option<S>; 27]) -> Self {
        Self::with_slots(slots)
    }

    /// Creates a block cluster with every slot empty.
    pub fn empty() -> Self {
        Self::with_slots(std::array::from_fn(|_| None))
    }
}

impl<S> BlockCluster<S> {
    /// Handle of the neighbor at chunk offset `(dx, dy, dz)`.
    pub fn neighbor(&self, dx: i32, dy: i32, dz: i32) -> Option<&S> {
        self.slot(BlockLayout::slot_index(dx, dy, dz))
    }
}

impl<S: ChunkRef, L: ClusterLayout, const N: usize> Cluster<S, L, N> {
    fn with_slots(slots: [Option<S>; N]) -> Self {
        const { assert!(N == L::SLOTS, "slot count does not match the cluster layout") };
        Self {
            slots,
            layout: PhantomData,
        }
    }
}

impl<S, L: ClusterLayout, const N: usize> Cluster<S, L, N> {
    /// Handle in slot `index`, or `None` if unpopulated.
    pub fn slot(&self, index: usize) -> Option<&S> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Mutable handle in slot `index`.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut S> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Replaces slot `index`, returning the previous handle.
    ///
    /// Panics if `index >= N`.
    pub fn set_slot(&mut self, index: usize, handle: Option<S>) -> Option<S> {
        std::mem::replace(&mut self.slots[index], handle)
    }

    /// Returns `true` if every slot is populated.
    ///
    /// This is the only validity guard a cluster has. Check it, or use the
    /// `try_*` accessors, before relying on boundary voxels.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of populated slots.
    pub fn populated(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Consumes the cluster, returning its slots.
    pub fn into_slots(self) -> [Option<S>; N] {
        self.slots
    }
}

impl<S, C, L, const N: usize> Cluster<S, L, N>
where
    S: Deref<Target = C>,
    C: VoxelAccess,
    L: ClusterLayout,
{
    const SIZE: [usize; 3] = [C::SIZE_X, C::SIZE_Y, C::SIZE_Z];

    /// Center chunk, if populated.
    pub fn center(&self) -> Option<&C> {
        self.chunk(L::route(0, 0, 0, Self::SIZE)?.0)
    }

    /// Chunk in slot `index`, if populated.
    pub fn chunk(&self, index: usize) -> Option<&C> {
        self.slot(index).map(Deref::deref)
    }

    /// Resolves a center-relative coordinate into `(slot, local position)`.
    ///
    /// Pure routing: the slot may be unpopulated.
    #[inline]
    pub fn resolve(&self, x: i32, y: i32, z: i32) -> Option<(usize, [usize; 3])> {
        L::route(x, y, z, Self::SIZE)
    }

    /// Reads the voxel at a center-relative coordinate.
    ///
    /// Returns `null` if the owning slot is unpopulated. The coordinate must
    /// be in the layout's valid range; outside it, debug builds panic and
    /// release builds return `null`.
    #[inline]
    pub fn get_voxel(&self, x: i32, y: i32, z: i32, null: VoxelId) -> VoxelId {
        let Some((slot, [lx, ly, lz])) = self.resolve(x, y, z) else {
            debug_assert!(false, "({x}, {y}, {z}) is outside the cluster");
            return null;
        };
        self.chunk(slot).map_or(null, |chunk| chunk.get(lx, ly, lz))
    }

    /// Reads the voxel at a center-relative coordinate, or `None` if the
    /// owning slot is unpopulated or no slot owns the coordinate.
    #[inline]
    pub fn try_get_voxel(&self, x: i32, y: i32, z: i32) -> Option<VoxelId> {
        let (slot, [lx, ly, lz]) = self.resolve(x, y, z)?;
        self.chunk(slot)?.try_get(lx, ly, lz)
    }
}

impl<S, C, L, const N: usize> Cluster<S, L, N>
where
    S: DerefMut<Target = C>,
    C: VoxelAccess,
    L: ClusterLayout,
{
    /// Mutable chunk in slot `index`, if populated.
    pub fn chunk_mut(&mut self, index: usize) -> Option<&mut C> {
        self.slot_mut(index).map(DerefMut::deref_mut)
    }

    /// Writes the voxel at a center-relative coordinate.
    ///
    /// Panics if no slot owns the coordinate or the owning slot is
    /// unpopulated; use [`Cluster::try_set_voxel`] when either can happen.
    #[inline]
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, voxel: VoxelId) {
        let Some((slot, [lx, ly, lz])) = self.resolve(x, y, z) else {
            panic!("({x}, {y}, {z}) is outside the cluster");
        };
        let Some(chunk) = self.chunk_mut(slot) else {
            panic!("set_voxel at ({x}, {y}, {z}) routed to unpopulated slot {slot}");
        };
        chunk.set(lx, ly, lz, voxel);
    }

    /// Writes the voxel at a center-relative coordinate.
    ///
    /// Returns `false` without writing anything if the owning slot is
    /// unpopulated or no slot owns the coordinate.
    #[inline]
    pub fn try_set_voxel(&mut self, x: i32, y: i32, z: i32, voxel: VoxelId) -> bool {
        let Some((slot, [lx, ly, lz])) = self.resolve(x, y, z) else {
            return false;
        };
        self.chunk_mut(slot)
            .is_some_and(|chunk| chunk.try_set(lx, ly, lz, voxel))
    }
}

impl<S: ChunkRef> Default for FaceCluster<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ChunkRef> Default for BlockCluster<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S, L, const N: usize> std::fmt::Debug for Cluster<S, L, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let populated: Vec<bool> = self.slots.iter().map(Option::is_some).collect();
        f.debug_struct("Cluster")
            .field("populated", &populated)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
