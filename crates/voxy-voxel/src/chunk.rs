//! Dense voxel storage with compile-time dimensions.
//!
//! A [`Chunk`] is a plain `SX × SY × SZ` array of [`VoxelId`] values with no
//! palette and no indirection. The linear layout is fixed: X varies fastest,
//! then Y, then Z, so `index = z * (SX * SY) + y * SX + x`. Serializers may
//! rely on this layout through [`Chunk::voxels`] and [`Chunk::as_bytes`].

use std::fmt;

use crate::error::ChunkError;
use crate::voxel::VoxelId;

/// Converts `(x, y, z)` to a linear index (x varies fastest).
#[inline(always)]
pub const fn pos_to_index(x: usize, y: usize, z: usize, size_x: usize, size_xy: usize) -> usize {
    z * size_xy + y * size_x + x
}

/// Inverse of [`pos_to_index`] for the same `size_x` and `size_xy`.
#[inline(always)]
pub const fn index_to_pos(index: usize, size_x: usize, size_xy: usize) -> (usize, usize, usize) {
    let rem = index % size_xy;
    (rem % size_x, rem / size_x, index / size_xy)
}

/// Voxel access shared by every chunk representation a cluster can reference.
pub trait VoxelAccess {
    /// Chunk length along X in voxels.
    const SIZE_X: usize;
    /// Chunk length along Y in voxels.
    const SIZE_Y: usize;
    /// Chunk length along Z in voxels.
    const SIZE_Z: usize;

    /// Returns the voxel at `(x, y, z)`. Panics if out of bounds.
    fn get(&self, x: usize, y: usize, z: usize) -> VoxelId;

    /// Sets the voxel at `(x, y, z)`. Panics if out of bounds.
    fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId);

    /// Returns the voxel at `(x, y, z)`, or `None` if out of bounds.
    fn try_get(&self, x: usize, y: usize, z: usize) -> Option<VoxelId>;

    /// Sets the voxel at `(x, y, z)`. Returns `false` and leaves the chunk
    /// untouched if out of bounds.
    fn try_set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) -> bool;
}

/// Fixed-size dense voxel array.
///
/// The storage is inline, so a chunk can live on the stack, inside a `Box`,
/// or in an arena slot owned by whatever manages chunk lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk<const SX: usize, const SY: usize, const SZ: usize> {
    voxels: [[[VoxelId; SX]; SY]; SZ],
}

impl<const SX: usize, const SY: usize, const SZ: usize> Chunk<SX, SY, SZ> {
    /// Length along X in voxels.
    pub const SIZE_X: usize = SX;
    /// Length along Y in voxels.
    pub const SIZE_Y: usize = SY;
    /// Length along Z in voxels.
    pub const SIZE_Z: usize = SZ;
    /// Voxels in one Z layer.
    pub const SIZE_XY: usize = SX * SY;
    /// Total number of voxels.
    pub const VOLUME: usize = SX * SY * SZ;

    const ASSERT_NON_EMPTY: () = assert!(SX > 0 && SY > 0 && SZ > 0);

    /// Creates a chunk with every voxel set to [`VoxelId::EMPTY`].
    pub fn new() -> Self {
        Self::filled(VoxelId::EMPTY)
    }

    /// Creates a chunk with every voxel set to `voxel`.
    pub fn filled(voxel: VoxelId) -> Self {
        let () = Self::ASSERT_NON_EMPTY;
        Self {
            voxels: [[[voxel; SX]; SY]; SZ],
        }
    }

    /// Creates an empty chunk and copies the whole `source` array into it at
    /// `offset`.
    ///
    /// `source` is laid out like a chunk of dimensions `source_size`.
    pub fn from_voxels(
        source: &[VoxelId],
        source_size: [usize; 3],
        offset: [usize; 3],
    ) -> Result<Self, ChunkError> {
        let mut chunk = Self::new();
        chunk.copy_from(source, source_size, source_size, [0, 0, 0], offset)?;
        Ok(chunk)
    }

    /// Linear index of `(x, y, z)` in this chunk's layout.
    #[inline]
    pub const fn index(x: usize, y: usize, z: usize) -> usize {
        pos_to_index(x, y, z, SX, Self::SIZE_XY)
    }

    /// Position of a linear index in this chunk's layout.
    #[inline]
    pub const fn position(index: usize) -> (usize, usize, usize) {
        index_to_pos(index, SX, Self::SIZE_XY)
    }

    /// Returns the voxel at `(x, y, z)`.
    ///
    /// Each coordinate must be inside the chunk; violating that panics.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelId {
        self.voxels[z][y][x]
    }

    /// Sets the voxel at `(x, y, z)`.
    ///
    /// Each coordinate must be inside the chunk; violating that panics.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) {
        self.voxels[z][y][x] = voxel;
    }

    /// Returns the voxel at a linear index. Panics if `index >= VOLUME`.
    #[inline]
    pub fn get_at(&self, index: usize) -> VoxelId {
        self.voxels()[index]
    }

    /// Sets the voxel at a linear index. Panics if `index >= VOLUME`.
    #[inline]
    pub fn set_at(&mut self, index: usize, voxel: VoxelId) {
        self.voxels_mut()[index] = voxel;
    }

    /// Returns the voxel at `(x, y, z)`, or `None` if any axis is out of bounds.
    #[inline]
    pub fn try_get(&self, x: usize, y: usize, z: usize) -> Option<VoxelId> {
        self.voxels.get(z)?.get(y)?.get(x).copied()
    }

    /// Sets the voxel at `(x, y, z)` if it is inside the chunk.
    ///
    /// Returns `false` without modifying anything otherwise.
    #[inline]
    pub fn try_set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) -> bool {
        match self
            .voxels
            .get_mut(z)
            .and_then(|layer| layer.get_mut(y))
            .and_then(|row| row.get_mut(x))
        {
            Some(cell) => {
                *cell = voxel;
                true
            }
            None => false,
        }
    }

    /// Returns the voxel at a linear index, or `None` if out of range.
    #[inline]
    pub fn try_get_at(&self, index: usize) -> Option<VoxelId> {
        self.voxels().get(index).copied()
    }

    /// Sets the voxel at a linear index if it is in range.
    #[inline]
    pub fn try_set_at(&mut self, index: usize, voxel: VoxelId) -> bool {
        match self.voxels_mut().get_mut(index) {
            Some(cell) => {
                *cell = voxel;
                true
            }
            None => false,
        }
    }

    /// Returns the voxel at `(x, y, z)` without any bounds checks.
    ///
    /// # Safety
    ///
    /// `x < SX`, `y < SY` and `z < SZ` must all hold.
    #[inline]
    pub unsafe fn get_unchecked(&self, x: usize, y: usize, z: usize) -> VoxelId {
        // SAFETY: the caller guarantees each axis is in bounds.
        unsafe { *self.voxels.get_unchecked(z).get_unchecked(y).get_unchecked(x) }
    }

    /// Sets the voxel at `(x, y, z)` without any bounds checks.
    ///
    /// # Safety
    ///
    /// `x < SX`, `y < SY` and `z < SZ` must all hold.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) {
        // SAFETY: the caller guarantees each axis is in bounds.
        unsafe {
            *self
                .voxels
                .get_unchecked_mut(z)
                .get_unchecked_mut(y)
                .get_unchecked_mut(x) = voxel;
        }
    }

    /// Overwrites every voxel with `voxel`.
    ///
    /// Filling with [`VoxelId::EMPTY`] zeroes the storage in bulk.
    pub fn fill(&mut self, voxel: VoxelId) {
        if voxel.is_empty() {
            bytemuck::fill_zeroes(self.voxels_mut());
        } else {
            self.voxels_mut().fill(voxel);
        }
    }

    /// Copies an `extent`-sized box from `source` into this chunk.
    ///
    /// `source` is laid out like a chunk of dimensions `source_size`. The box
    /// starts at `src_offset` in the source and lands at `dst_offset` here.
    /// A box that does not fit either side is rejected before anything is
    /// written.
    pub fn copy_from(
        &mut self,
        source: &[VoxelId],
        source_size: [usize; 3],
        extent: [usize; 3],
        src_offset: [usize; 3],
        dst_offset: [usize; 3],
    ) -> Result<(), ChunkError> {
        if let Err(err) =
            Self::check_region(source.len(), source_size, extent, src_offset, dst_offset)
        {
            tracing::trace!(%err, "rejected chunk region copy");
            return Err(err);
        }
        if extent.contains(&0) {
            return Ok(());
        }

        // Offsets are necessarily zero when the box spans both arrays entirely.
        if source_size == [SX, SY, SZ] && extent == source_size {
            self.voxels_mut().copy_from_slice(source);
            return Ok(());
        }

        let [row_len, rows, layers] = extent;
        let source_xy = source_size[0] * source_size[1];
        let voxels = self.voxels_mut();
        for z in 0..layers {
            for y in 0..rows {
                let src = pos_to_index(
                    src_offset[0],
                    src_offset[1] + y,
                    src_offset[2] + z,
                    source_size[0],
                    source_xy,
                );
                let dst = Self::index(dst_offset[0], dst_offset[1] + y, dst_offset[2] + z);
                voxels[dst..dst + row_len].copy_from_slice(&source[src..src + row_len]);
            }
        }
        Ok(())
    }

    /// Copies an `extent`-sized box out of another chunk of any dimensions.
    pub fn copy_from_chunk<const OX: usize, const OY: usize, const OZ: usize>(
        &mut self,
        source: &Chunk<OX, OY, OZ>,
        extent: [usize; 3],
        src_offset: [usize; 3],
        dst_offset: [usize; 3],
    ) -> Result<(), ChunkError> {
        self.copy_from(source.voxels(), [OX, OY, OZ], extent, src_offset, dst_offset)
    }

    /// All voxels in linear order.
    #[inline]
    pub fn voxels(&self) -> &[VoxelId] {
        self.voxels.as_flattened().as_flattened()
    }

    /// All voxels in linear order, mutably.
    #[inline]
    pub fn voxels_mut(&mut self) -> &mut [VoxelId] {
        self.voxels.as_flattened_mut().as_flattened_mut()
    }

    /// Raw bytes of the storage in linear order (native endianness).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.voxels())
    }

    /// Returns `true` if every voxel holds the same ID.
    pub fn is_uniform(&self) -> bool {
        let voxels = self.voxels();
        voxels.iter().all(|&voxel| voxel == voxels[0])
    }

    fn check_region(
        source_len: usize,
        source_size: [usize; 3],
        extent: [usize; 3],
        src_offset: [usize; 3],
        dst_offset: [usize; 3],
    ) -> Result<(), ChunkError> {
        let expected = source_size
            .iter()
            .try_fold(1usize, |acc, &len| acc.checked_mul(len));
        if expected != Some(source_len) {
            return Err(ChunkError::SourceLength {
                size: source_size,
                expected: expected.unwrap_or(usize::MAX),
                actual: source_len,
            });
        }
        if !box_fits(extent, src_offset, source_size) {
            return Err(ChunkError::SourceOverflow {
                extent,
                offset: src_offset,
                size: source_size,
            });
        }
        if !box_fits(extent, dst_offset, [SX, SY, SZ]) {
            return Err(ChunkError::DestinationOverflow {
                extent,
                offset: dst_offset,
                size: [SX, SY, SZ],
            });
        }
        Ok(())
    }
}

fn box_fits(extent: [usize; 3], offset: [usize; 3], size: [usize; 3]) -> bool {
    (0..3).all(|axis| {
        offset[axis]
            .checked_add(extent[axis])
            .is_some_and(|end| end <= size[axis])
    })
}

impl<const SX: usize, const SY: usize, const SZ: usize> Default for Chunk<SX, SY, SZ> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SX: usize, const SY: usize, const SZ: usize> fmt::Debug for Chunk<SX, SY, SZ> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("size", &[SX, SY, SZ])
            .field("uniform", &self.is_uniform())
            .finish_non_exhaustive()
    }
}

impl<const SX: usize, const SY: usize, const SZ: usize> VoxelAccess for Chunk<SX, SY, SZ> {
    const SIZE_X: usize = SX;
    const SIZE_Y: usize = SY;
    const SIZE_Z: usize = SZ;

    #[inline]
    fn get(&self, x: usize, y: usize, z: usize) -> VoxelId {
        Chunk::get(self, x, y, z)
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) {
        Chunk::set(self, x, y, z, voxel);
    }

    #[inline]
    fn try_get(&self, x: usize, y: usize, z: usize) -> Option<VoxelId> {
        Chunk::try_get(self, x, y, z)
    }

    #[inline]
    fn try_set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelId) -> bool {
        Chunk::try_set(self, x, y, z, voxel)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    type Chunk16 = Chunk<16, 16, 16>;
    type Oblong = Chunk<5, 3, 4>;

    #[test]
    fn test_index_roundtrip_all_positions() {
        for index in 0..Oblong::VOLUME {
            let (x, y, z) = Oblong::position(index);
            assert!(x < 5 && y < 3 && z < 4);
            assert_eq!(Oblong::index(x, y, z), index);
        }
    }

    #[test]
    fn test_x_varies_fastest() {
        assert_eq!(Oblong::index(1, 0, 0), 1);
        assert_eq!(Oblong::index(0, 1, 0), 5);
        assert_eq!(Oblong::index(0, 0, 1), 15);
        assert_eq!(Oblong::index(4, 2, 3), Oblong::VOLUME - 1);
    }

    #[test]
    fn test_set_then_get_matches_linear_storage() {
        let mut chunk = Oblong::new();
        chunk.set(3, 1, 2, VoxelId(9));
        assert_eq!(chunk.get(3, 1, 2), VoxelId(9));
        assert_eq!(chunk.get_at(Oblong::index(3, 1, 2)), VoxelId(9));
        assert_eq!(chunk.voxels()[2 * 15 + 5 + 3], VoxelId(9));
    }

    #[test]
    fn test_set_does_not_touch_other_voxels() {
        let mut chunk = Chunk16::new();
        chunk.set(1, 2, 3, VoxelId(100));
        assert_eq!(chunk.get(1, 2, 3), VoxelId(100));

        let changed: Vec<usize> = chunk
            .voxels()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(changed, vec![Chunk16::index(1, 2, 3)]);
    }

    #[test]
    fn test_every_voxel_addressable() {
        let mut chunk = Oblong::new();
        for index in 0..Oblong::VOLUME {
            let (x, y, z) = Oblong::position(index);
            chunk.set(x, y, z, VoxelId(index as u32 + 10));
        }
        for index in 0..Oblong::VOLUME {
            assert_eq!(chunk.get_at(index), VoxelId(index as u32 + 10));
        }
    }

    #[test]
    fn test_fill_then_get_everywhere() {
        let mut chunk = Chunk16::new();
        chunk.set(1, 2, 3, VoxelId(100));

        chunk.fill(VoxelId::UNKNOWN);
        assert!(chunk.voxels().iter().all(|&v| v == VoxelId::UNKNOWN));
        assert_eq!(chunk.get(2, 2, 2), VoxelId::UNKNOWN);

        // Bulk-zero path.
        chunk.fill(VoxelId::EMPTY);
        assert!(chunk.voxels().iter().all(|&v| v == VoxelId::EMPTY));
        assert!(chunk.is_uniform());
    }

    #[test]
    fn test_filled_constructor() {
        let chunk = Chunk16::filled(VoxelId::DEBUG);
        assert!(chunk.is_uniform());
        assert_eq!(chunk.get(15, 15, 15), VoxelId::DEBUG);
        assert_eq!(Chunk16::default(), Chunk16::new());
    }

    #[test]
    fn test_try_get_out_of_bounds() {
        let chunk = Oblong::filled(VoxelId(7));
        assert_eq!(chunk.try_get(4, 2, 3), Some(VoxelId(7)));
        assert_eq!(chunk.try_get(5, 0, 0), None);
        assert_eq!(chunk.try_get(0, 3, 0), None);
        assert_eq!(chunk.try_get(0, 0, 4), None);
        assert_eq!(chunk.try_get_at(Oblong::VOLUME), None);
    }

    #[test]
    fn test_try_set_out_of_bounds_leaves_chunk_unchanged() {
        let mut chunk = Oblong::new();
        let before = chunk.clone();
        assert!(!chunk.try_set(5, 0, 0, VoxelId(1)));
        assert!(!chunk.try_set(0, 3, 0, VoxelId(1)));
        assert!(!chunk.try_set(0, 0, 4, VoxelId(1)));
        assert!(!chunk.try_set_at(Oblong::VOLUME, VoxelId(1)));
        assert_eq!(chunk, before);

        assert!(chunk.try_set(4, 2, 3, VoxelId(8)));
        assert!(chunk.try_set_at(0, VoxelId(6)));
        assert_eq!(chunk.get(4, 2, 3), VoxelId(8));
        assert_eq!(chunk.get(0, 0, 0), VoxelId(6));
    }

    #[test]
    #[should_panic]
    fn test_get_out_of_bounds_panics() {
        let chunk = Oblong::new();
        chunk.get(0, 3, 0);
    }

    #[test]
    fn test_unchecked_access() {
        let mut chunk = Chunk16::new();
        // SAFETY: coordinates are inside a 16³ chunk.
        unsafe {
            chunk.set_unchecked(15, 0, 7, VoxelId(33));
            assert_eq!(chunk.get_unchecked(15, 0, 7), VoxelId(33));
        }
        assert_eq!(chunk.get(15, 0, 7), VoxelId(33));
    }

    #[test]
    fn test_copy_partial_box_with_offsets() {
        let source: Vec<VoxelId> = (0..4 * 4 * 4).map(|i| VoxelId(i + 100)).collect();
        let mut chunk = Oblong::new();
        chunk
            .copy_from(&source, [4, 4, 4], [2, 2, 3], [1, 2, 0], [3, 1, 1])
            .unwrap();

        for z in 0..3 {
            for y in 0..2 {
                for x in 0..2 {
                    let expected = source[pos_to_index(1 + x, 2 + y, z, 4, 16)];
                    assert_eq!(chunk.get(3 + x, 1 + y, 1 + z), expected);
                }
            }
        }
        let copied = chunk.voxels().iter().filter(|v| !v.is_empty()).count();
        assert_eq!(copied, 2 * 2 * 3);
    }

    #[test]
    fn test_copy_rejects_source_overflow() {
        let source = vec![VoxelId(5); 4 * 4 * 4];
        let mut chunk = Chunk16::new();
        let err = chunk
            .copy_from(&source, [4, 4, 4], [3, 1, 1], [2, 0, 0], [0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, ChunkError::SourceOverflow { .. }));
        assert!(chunk.voxels().iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_copy_rejects_destination_overflow() {
        let source = vec![VoxelId(5); 4 * 4 * 4];
        let mut chunk = Oblong::new();
        let err = chunk
            .copy_from(&source, [4, 4, 4], [4, 4, 4], [0, 0, 0], [0, 0, 0])
            .unwrap_err();
        assert!(matches!(err, ChunkError::DestinationOverflow { .. }));

        let err = chunk
            .copy_from(&source, [4, 4, 4], [1, 1, 1], [0, 0, 0], [usize::MAX, 0, 0])
            .unwrap_err();
        assert!(matches!(err, ChunkError::DestinationOverflow { .. }));
        assert!(chunk.voxels().iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_copy_rejects_mismatched_source_length() {
        let source = vec![VoxelId(5); 10];
        let mut chunk = Oblong::new();
        let err = chunk
            .copy_from(&source, [4, 4, 4], [1, 1, 1], [0, 0, 0], [0, 0, 0])
            .unwrap_err();
        assert_eq!(
            err,
            ChunkError::SourceLength {
                size: [4, 4, 4],
                expected: 64,
                actual: 10,
            }
        );
    }

    #[test]
    fn test_copy_empty_extent_is_noop() {
        let source = vec![VoxelId(5); 8];
        let mut chunk = Oblong::new();
        chunk
            .copy_from(&source, [2, 2, 2], [0, 2, 2], [0, 0, 0], [5, 0, 0])
            .unwrap();
        assert!(chunk.voxels().iter().all(|v| v.is_empty()));
    }

    #[test]
    fn test_from_voxels_full_chunk() {
        let source: Vec<VoxelId> = (0..Oblong::VOLUME as u32).map(VoxelId).collect();
        let chunk = Oblong::from_voxels(&source, [5, 3, 4], [0, 0, 0]).unwrap();
        assert_eq!(chunk.voxels(), source.as_slice());
    }

    #[test]
    fn test_from_voxels_with_offset() {
        let source = vec![VoxelId(4); 2 * 2 * 2];
        let chunk = Oblong::from_voxels(&source, [2, 2, 2], [3, 1, 2]).unwrap();
        assert_eq!(chunk.get(3, 1, 2), VoxelId(4));
        assert_eq!(chunk.get(4, 2, 3), VoxelId(4));
        assert_eq!(chunk.get(2, 1, 2), VoxelId::EMPTY);
        assert!(Oblong::from_voxels(&source, [2, 2, 2], [4, 0, 0]).is_err());
    }

    #[test]
    fn test_copy_from_chunk() {
        let mut small = Chunk::<2, 2, 2>::filled(VoxelId(11));
        small.set(1, 1, 1, VoxelId(12));
        let mut chunk = Chunk16::new();
        chunk
            .copy_from_chunk(&small, [2, 2, 2], [0, 0, 0], [14, 14, 14])
            .unwrap();
        assert_eq!(chunk.get(14, 14, 14), VoxelId(11));
        assert_eq!(chunk.get(15, 15, 15), VoxelId(12));
    }

    #[test]
    fn test_as_bytes_covers_storage() {
        let mut chunk = Chunk::<2, 2, 2>::new();
        chunk.set(1, 0, 0, VoxelId(0x0102_0304));
        let bytes = chunk.as_bytes();
        assert_eq!(bytes.len(), 8 * std::mem::size_of::<VoxelId>());
        assert_eq!(&bytes[4..8], &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_voxel_access_trait_dispatch() {
        fn read<C: VoxelAccess>(chunk: &C) -> (usize, Option<VoxelId>) {
            (C::SIZE_X * C::SIZE_Y * C::SIZE_Z, chunk.try_get(0, 0, 0))
        }
        let chunk = Oblong::filled(VoxelId(3));
        assert_eq!(read(&chunk), (60, Some(VoxelId(3))));
    }
}
