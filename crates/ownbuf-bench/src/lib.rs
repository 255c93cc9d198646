//! Shared inputs for the ownbuf benchmarks.

use ownbuf_test_utils::fixtures::{byte_pattern, SIZES};

/// Byte inputs for every fixture size, smallest first.
pub fn inputs() -> Vec<Vec<u8>> {
    SIZES.iter().map(|&len| byte_pattern(len)).collect()
}
