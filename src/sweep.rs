//! The window of byte offsets probed around the boundary.

use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::error::ProbeError;

/// Consecutive byte offsets relative to the boundary: `start .. start + count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetSweep {
    /// First offset in bytes (may be negative).
    pub start: isize,
    /// Number of offsets.
    pub count: usize,
}

/// A validated probe location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Byte offset relative to the boundary.
    pub offset: isize,
    /// Byte index of the target word from the buffer base.
    pub byte_index: usize,
}

impl OffsetSweep {
    /// Create a sweep of `count` offsets starting at `start`.
    pub fn new(start: isize, count: usize) -> Self {
        Self { start, count }
    }

    /// The offsets in probe order.
    ///
    /// Stops early if an offset would overflow `isize`; [`resolve`](Self::resolve)
    /// rejects such sweeps.
    pub fn offsets(&self) -> impl Iterator<Item = isize> {
        let start = self.start;
        (0..self.count).map_while(move |i| {
            isize::try_from(i)
                .ok()
                .and_then(|i| start.checked_add(i))
        })
    }

    /// Check that the range `start .. start + count` fits in `isize`.
    pub fn validate(&self) -> Result<(), ProbeError> {
        isize::try_from(self.count)
            .ok()
            .and_then(|count| self.start.checked_add(count))
            .map(|_| ())
            .ok_or_else(|| ProbeError::InvalidParameter {
                name: "offset_count".to_string(),
                reason: format!(
                    "{} offsets starting at {:+} overflow the offset range",
                    self.count, self.start
                ),
            })
    }

    /// Check every offset against the buffer and compute its target.
    ///
    /// The whole word written by the increment must fit in
    /// `[0, buffer_bytes)`; the first offset that does not is reported.
    pub fn resolve(
        &self,
        boundary: &Boundary,
        buffer_bytes: usize,
        word_size: usize,
    ) -> Result<Vec<Target>, ProbeError> {
        self.validate()?;
        self.offsets()
            .map(|offset| {
                boundary
                    .byte_index()
                    .checked_add_signed(offset)
                    .filter(|index| {
                        index
                            .checked_add(word_size)
                            .is_some_and(|end| end <= buffer_bytes)
                    })
                    .map(|byte_index| Target { offset, byte_index })
                    .ok_or(ProbeError::OffsetOutOfBounds {
                        offset,
                        boundary_index: boundary.index,
                        buffer_bytes,
                    })
            })
            .collect()
    }
}
