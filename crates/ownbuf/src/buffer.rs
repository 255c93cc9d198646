//! The owned buffer value and its lifecycle states.
//!
//! An [`OwnedBuffer`] is either [`Holding`](BufferState::Holding) a block or
//! [`Cleared`](BufferState::Cleared). The only transition is Holding →
//! Cleared, taken by [`OwnedBuffer::clear`] or by `Drop`.

use std::alloc::{handle_alloc_error, Layout};
use std::fmt;

use crate::block::copy_into_block;
use crate::config::BufferConfig;
use crate::error::BufferError;

/// Lifecycle state of an [`OwnedBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferState {
    /// A block is held (possibly of length zero).
    Holding,
    /// The block has been released.
    Cleared,
}

/// A value that exclusively owns one heap-allocated byte block.
///
/// The block is released exactly once: by [`clear`](Self::clear), or when
/// the value goes out of scope. Copies are explicit and deep, through
/// [`try_clone`](Self::try_clone) or `Clone`.
///
/// The type is not `Copy`, so handing a buffer to another binding moves it
/// and the original can no longer be used:
///
/// ```compile_fail
/// use ownbuf::OwnedBuffer;
///
/// let first = OwnedBuffer::new("Hello").unwrap();
/// let second = first;
/// assert!(first.is_valid());
/// # drop(second);
/// ```
///
/// ```compile_fail
/// fn requires_copy<T: Copy>() {}
/// requires_copy::<ownbuf::OwnedBuffer>();
/// ```
///
/// Overwriting a mutable binding releases the old block through `Drop`
/// before the new one takes its place, so no block is ever shared.
#[derive(PartialEq, Eq)]
pub struct OwnedBuffer {
    /// `None` once cleared. The boxed slice carries its own length.
    data: Option<Box<[u8]>>,
}

impl OwnedBuffer {
    /// Create a buffer holding a copy of `input`.
    ///
    /// An empty input produces a zero-length buffer in the Holding state.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] if the block cannot be
    /// allocated.
    pub fn new(input: impl AsRef<[u8]>) -> Result<Self, BufferError> {
        let input = input.as_ref();
        let data = copy_into_block(input).inspect_err(|err| {
            tracing::warn!(len = input.len(), %err, "buffer acquisition failed");
        })?;
        tracing::trace!(len = data.len(), "buffer acquired");
        Ok(Self { data: Some(data) })
    }

    /// Create a buffer holding a copy of `input`, enforcing `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::CapacityExceeded`] if `input` is longer than
    /// `config.max_len`, checked before anything is allocated, or
    /// [`BufferError::AllocationFailed`] as for [`new`](Self::new).
    pub fn with_config(
        input: impl AsRef<[u8]>,
        config: &BufferConfig,
    ) -> Result<Self, BufferError> {
        let input = input.as_ref();
        config.check(input.len()).inspect_err(|err| {
            tracing::warn!(len = input.len(), %err, "buffer input rejected");
        })?;
        Self::new(input)
    }

    /// Create an independent copy of this buffer.
    ///
    /// Copying a cleared buffer yields another cleared buffer without
    /// allocating.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::AllocationFailed`] if the new block cannot be
    /// allocated.
    pub fn try_clone(&self) -> Result<Self, BufferError> {
        match &self.data {
            Some(data) => Self::new(&data[..]),
            None => {
                tracing::debug!("copying a cleared buffer");
                Ok(Self { data: None })
            }
        }
    }

    /// Whether a block is currently held.
    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BufferState {
        if self.is_valid() {
            BufferState::Holding
        } else {
            BufferState::Cleared
        }
    }

    /// The held bytes, or an empty slice once cleared.
    ///
    /// The slice is not NUL-terminated.
    pub fn get(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// The held bytes, or `None` once cleared.
    ///
    /// Unlike [`get`](Self::get), this distinguishes a zero-length buffer
    /// from a cleared one.
    pub fn as_option(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Length of the held block in bytes; 0 once cleared.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.len())
    }

    /// Whether the held block is empty or the buffer is cleared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Release the block and move to the Cleared state.
    ///
    /// Calling this on a cleared buffer does nothing.
    pub fn clear(&mut self) {
        if let Some(data) = self.data.take() {
            tracing::trace!(len = data.len(), "buffer released");
        }
    }
}

impl Clone for OwnedBuffer {
    /// Deep copy. Aborts through [`handle_alloc_error`] if the allocator
    /// refuses, as `Vec` does; use [`OwnedBuffer::try_clone`] to observe
    /// the failure instead.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(_) => handle_alloc_error(
                Layout::array::<u8>(self.len()).unwrap_or_else(|_| Layout::new::<u8>()),
            ),
        }
    }
}

impl Drop for OwnedBuffer {
    fn drop(&mut self) {
        self.clear();
    }
}

impl AsRef<[u8]> for OwnedBuffer {
    fn as_ref(&self) -> &[u8] {
        self.get()
    }
}

impl TryFrom<&str> for OwnedBuffer {
    type Error = BufferError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        Self::new(input)
    }
}

impl TryFrom<&[u8]> for OwnedBuffer {
    type Error = BufferError;

    fn try_from(input: &[u8]) -> Result<Self, Self::Error> {
        Self::new(input)
    }
}

impl fmt::Debug for OwnedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBuffer")
            .field("state", &self.state())
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_round_trip_then_clear() {
        let mut r = OwnedBuffer::new("Hello").unwrap();
        assert!(r.is_valid());
        assert_eq!(r.get(), b"Hello");
        assert_eq!(r.len(), 5);

        r.clear();
        assert!(!r.is_valid());
        assert_eq!(r.state(), BufferState::Cleared);
    }

    #[test]
    fn copy_survives_clearing_source() {
        let mut r = OwnedBuffer::new("Hello").unwrap();
        let r2 = r.try_clone().unwrap();
        assert_eq!(r.get(), b"Hello");
        assert_eq!(r2.get(), b"Hello");

        r.clear();
        assert!(r2.is_valid());
        assert_eq!(r2.get(), b"Hello");
    }

    #[test]
    fn copy_owns_a_distinct_block() {
        let r = OwnedBuffer::new("Hello").unwrap();
        let r2 = r.clone();
        assert_ne!(r.get().as_ptr(), r2.get().as_ptr());
        assert_eq!(r, r2);
    }

    #[test]
    fn empty_input_is_holding_with_zero_len() {
        let r = OwnedBuffer::new("").unwrap();
        assert!(r.is_valid());
        assert_eq!(r.state(), BufferState::Holding);
        assert!(r.get().is_empty());
        assert_eq!(r.as_option(), Some(&[][..]));
        assert!(r.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut r = OwnedBuffer::new("Hello").unwrap();
        r.clear();
        r.clear();
        assert!(!r.is_valid());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn cleared_reads_as_empty() {
        let mut r = OwnedBuffer::new("Hello").unwrap();
        r.clear();
        assert!(r.get().is_empty());
        assert_eq!(r.as_option(), None);
        assert!(r.as_ref().is_empty());
    }

    #[test]
    fn copying_cleared_yields_cleared() {
        let mut r = OwnedBuffer::new("Hello").unwrap();
        r.clear();
        let r2 = r.try_clone().unwrap();
        assert!(!r2.is_valid());
        let r3 = r.clone();
        assert_eq!(r3.state(), BufferState::Cleared);
    }

    #[test]
    fn cleared_differs_from_zero_length() {
        let empty = OwnedBuffer::new("").unwrap();
        let mut cleared = OwnedBuffer::new("").unwrap();
        cleared.clear();
        assert_ne!(empty, cleared);
        assert_eq!(empty.get(), cleared.get());
    }

    #[test]
    fn with_config_rejects_oversized_input() {
        let config = BufferConfig::new(4);
        let err = OwnedBuffer::with_config("Hello", &config).unwrap_err();
        assert_eq!(
            err,
            BufferError::CapacityExceeded {
                requested: 5,
                limit: 4
            }
        );
    }

    #[test]
    fn with_config_accepts_input_at_limit() {
        let config = BufferConfig::new(5);
        let r = OwnedBuffer::with_config("Hello", &config).unwrap();
        assert_eq!(r.get(), b"Hello");
    }

    #[test]
    fn try_from_str_and_bytes() {
        let a = OwnedBuffer::try_from("abc").unwrap();
        let b = OwnedBuffer::try_from(&b"abc"[..]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn interior_nul_bytes_are_preserved() {
        let r = OwnedBuffer::new(b"a\0b\0").unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.get(), b"a\0b\0");
    }

    #[test]
    fn overwriting_binding_releases_old_block() {
        let mut r = OwnedBuffer::new("old").unwrap();
        assert_eq!(r.get(), b"old");
        r = OwnedBuffer::new("new").unwrap();
        assert_eq!(r.get(), b"new");
    }

    #[test]
    fn debug_omits_contents() {
        let r = OwnedBuffer::new("secret").unwrap();
        let text = format!("{r:?}");
        assert!(text.contains("Holding"));
        assert!(text.contains("len: 6"));
        assert!(!text.contains("secret"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn read_returns_input(input in proptest::collection::vec(any::<u8>(), 0..512)) {
                let r = OwnedBuffer::new(&input).unwrap();
                prop_assert!(r.is_valid());
                prop_assert_eq!(r.get(), input.as_slice());
                prop_assert_eq!(r.len(), input.len());
            }

            #[test]
            fn copies_are_independent(input in proptest::collection::vec(any::<u8>(), 0..512)) {
                let mut original = OwnedBuffer::new(&input).unwrap();
                let copy = original.try_clone().unwrap();
                prop_assert_eq!(copy.get(), original.get());
                original.clear();
                prop_assert!(!original.is_valid());
                prop_assert_eq!(copy.get(), input.as_slice());
            }

            #[test]
            fn clear_any_number_of_times(
                input in proptest::collection::vec(any::<u8>(), 0..64),
                clears in 1usize..5,
            ) {
                let mut r = OwnedBuffer::new(&input).unwrap();
                for _ in 0..clears {
                    r.clear();
                    prop_assert!(!r.is_valid());
                    prop_assert_eq!(r.len(), 0);
                }
            }

            #[test]
            fn config_limit_is_exact(len in 0usize..128, limit in 0usize..128) {
                let input = vec![7u8; len];
                let result = OwnedBuffer::with_config(&input, &BufferConfig::new(limit));
                prop_assert_eq!(result.is_ok(), len <= limit);
            }
        }
    }
}
