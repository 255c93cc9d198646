//! Buffer configuration parameters.

use crate::error::BufferError;

/// Limits applied when constructing an [`OwnedBuffer`](crate::OwnedBuffer)
/// through [`OwnedBuffer::with_config`](crate::OwnedBuffer::with_config).
///
/// Plain [`OwnedBuffer::new`](crate::OwnedBuffer::new) uses the default,
/// which only rejects what the allocator itself would reject.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Maximum block length in bytes.
    ///
    /// Default: `isize::MAX`, the largest allocation Rust permits.
    pub max_len: usize,
}

impl BufferConfig {
    /// Default maximum block length.
    pub const DEFAULT_MAX_LEN: usize = isize::MAX as usize;

    /// Create a config with the given length limit.
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Check a requested length against the limit.
    pub fn check(&self, requested: usize) -> Result<(), BufferError> {
        if requested > self.max_len {
            return Err(BufferError::CapacityExceeded {
                requested,
                limit: self.max_len,
            });
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LEN)
    }
}
