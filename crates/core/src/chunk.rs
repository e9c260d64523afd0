//! Contiguous batching of identifier lists.
//!
//! Bulk endpoints cap how many identifiers a single call may carry, so larger
//! inputs are split into ordered, non-overlapping slices before being sent.

use crate::{CoreError, CoreResult};

/// Split `items` into contiguous slices of at most `size` elements.
///
/// Order is preserved and the last slice may be shorter. Concatenating the
/// returned slices yields `items` exactly. An empty input produces no slices.
///
/// # Errors
/// Returns [`CoreError::InvalidChunkSize`] when `size` is zero.
///
/// # Example
/// ```
/// use clickup_core::partition;
///
/// let ids = ["a", "b", "c", "d", "e"];
/// let chunks = partition(&ids, 2).unwrap();
/// assert_eq!(chunks, vec![&ids[0..2], &ids[2..4], &ids[4..5]]);
/// ```
pub fn partition<T>(items: &[T], size: usize) -> CoreResult<Vec<&[T]>> {
    if size == 0 {
        return Err(CoreError::InvalidChunkSize);
    }
    Ok(items.chunks(size).collect())
}

/// Number of slices [`partition`] would produce for `len` items.
#[must_use]
pub fn chunk_count(len: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    len.div_ceil(size)
}
