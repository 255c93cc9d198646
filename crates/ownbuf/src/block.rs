//! Block acquisition.
//!
//! Blocks are acquired through a fallible reservation so that an allocator
//! refusal surfaces as [`BufferError::AllocationFailed`] instead of
//! aborting the process.

use crate::error::BufferError;

/// Allocate a block of exactly `src.len()` bytes holding a copy of `src`.
///
/// A zero-length `src` yields an empty block without touching the
/// allocator.
pub(crate) fn copy_into_block(src: &[u8]) -> Result<Box<[u8]>, BufferError> {
    let mut data = Vec::new();
    data.try_reserve_exact(src.len())
        .map_err(|_| BufferError::AllocationFailed {
            requested: src.len(),
        })?;
    data.extend_from_slice(src);
    // Capacity already equals length, so this does not reallocate.
    Ok(data.into_boxed_slice())
}
