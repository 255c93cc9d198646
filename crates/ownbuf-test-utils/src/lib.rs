//! Test utilities for ownbuf development.
//!
//! Provides a counting global allocator ([`CountingAllocator`]) with a
//! [`track`] scope for asserting that buffers release everything they
//! acquire, a [`track_refusing`] scope that simulates allocator refusal,
//! plus shared input [`fixtures`].
//!
//! A test binary opts in by installing the allocator:
//!
//! ```ignore
//! #[global_allocator]
//! static ALLOC: CountingAllocator = CountingAllocator;
//! ```

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod counting;
pub mod fixtures;

pub use counting::{track, track_refusing, AllocationStats, CountingAllocator};
