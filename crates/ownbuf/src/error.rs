//! Buffer error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur while acquiring a buffer's block.
///
/// Both variants are raised before a value exists, so a failed
/// construction never leaves a partially built buffer behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The allocator could not provide a block of the requested size.
    AllocationFailed {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The input is longer than the configured length limit.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// The configured `max_len`.
        limit: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "allocation failed: requested {requested} bytes")
            }
            Self::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "buffer capacity exceeded: requested {requested} bytes, limit {limit} bytes"
                )
            }
        }
    }
}

impl Error for BufferError {}
