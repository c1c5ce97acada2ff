//! Chunk error types.

use thiserror::Error;

/// Errors returned by bulk region operations on a [`Chunk`](crate::Chunk).
///
/// Single-voxel accessors never produce these; they use `try_*` variants
/// returning `Option`/`bool` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The source slice length does not match its declared dimensions.
    #[error("source holds {actual} voxels but its size {size:?} requires {expected}")]
    SourceLength {
        /// Declared source dimensions.
        size: [usize; 3],
        /// Voxel count implied by `size`.
        expected: usize,
        /// Length of the slice actually supplied.
        actual: usize,
    },

    /// The copied box does not fit inside the source array.
    #[error("box {extent:?} at {offset:?} exceeds source size {size:?}")]
    SourceOverflow {
        /// Box dimensions.
        extent: [usize; 3],
        /// Box origin inside the source.
        offset: [usize; 3],
        /// Source dimensions.
        size: [usize; 3],
    },

    /// The copied box does not fit inside the destination chunk.
    #[error("box {extent:?} at {offset:?} exceeds chunk size {size:?}")]
    DestinationOverflow {
        /// Box dimensions.
        extent: [usize; 3],
        /// Box origin inside the chunk.
        offset: [usize; 3],
        /// Chunk dimensions.
        size: [usize; 3],
    },
}
