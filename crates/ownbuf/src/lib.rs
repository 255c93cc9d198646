//! Exclusively owned, scope-released byte buffers.
//!
//! [`OwnedBuffer`] owns exactly one heap block. The block is acquired when
//! the value is constructed and released when it is cleared or dropped,
//! whichever comes first. Copies are always deep and always explicit.
//!
//! # Lifecycle
//!
//! ```text
//! new / with_config / try_clone
//!            │
//!            ▼
//!       ┌─────────┐   clear / drop   ┌─────────┐
//!       │ Holding │ ───────────────▶ │ Cleared │ ◀─┐ clear / drop
//!       └─────────┘                  └─────────┘ ──┘
//! ```
//!
//! A cleared buffer reads as an empty slice and copies to another cleared
//! buffer. Use [`OwnedBuffer::as_option`] to tell a cleared buffer apart
//! from a zero-length one.
//!
//! # Example
//!
//! ```
//! use ownbuf::OwnedBuffer;
//!
//! let mut first = OwnedBuffer::new("Hello")?;
//! let second = first.try_clone()?;
//!
//! first.clear();
//! assert!(!first.is_valid());
//! assert_eq!(second.get(), b"Hello");
//! # Ok::<(), ownbuf::BufferError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

mod block;
pub mod buffer;
pub mod config;
pub mod error;

// Public re-exports for the primary API surface.
pub use buffer::{BufferState, OwnedBuffer};
pub use config::BufferConfig;
pub use error::BufferError;
