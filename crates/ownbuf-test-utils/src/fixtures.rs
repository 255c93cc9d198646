//! Reusable buffer inputs.

/// The greeting used throughout the lifecycle scenarios.
pub const GREETING: &str = "Hello";

/// Text with interior NUL bytes, which must survive a round trip intact.
pub const WITH_NULS: &[u8] = b"he\0llo\0";

/// Deterministic byte pattern of the given length.
///
/// Cycles through every byte value so that truncation or offset bugs show
/// up as mismatches rather than as runs of identical bytes.
pub fn byte_pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Input lengths covering empty, tiny, and multi-page blocks.
pub const SIZES: &[usize] = &[0, 1, 5, 64, 4096, 65_536];
