//! Probe buffer ownership and cache-line boundary discovery.

use crate::error::ProbeError;
use crate::measurement::word_size_bytes;

/// Check that a cache-line size is a non-zero power of two.
pub fn validate_cacheline_size(cacheline_size: usize) -> Result<usize, ProbeError> {
    if cacheline_size.is_power_of_two() {
        Ok(cacheline_size)
    } else {
        Err(ProbeError::InvalidCacheLineSize {
            size: cacheline_size,
        })
    }
}

/// Find the index of the first word whose address starts a cache line.
///
/// Buffers holding less than one full line of words never report a boundary,
/// even if one of their elements happens to be aligned.
pub fn locate(buffer: &[usize], cacheline_size: usize) -> Result<usize, ProbeError> {
    let cacheline_size = validate_cacheline_size(cacheline_size)?;
    let not_found = ProbeError::BoundaryNotFound {
        cacheline_size,
        buffer_len: buffer.len(),
    };

    if buffer.len() * word_size_bytes() < cacheline_size {
        return Err(not_found);
    }

    buffer
        .iter()
        .position(|word| (word as *const usize as usize) % cacheline_size == 0)
        .ok_or(not_found)
}

/// Heap-allocated array of machine words spanning several cache lines.
///
/// The profiler mutates words through raw pointers derived from
/// [`as_mut_ptr`](Self::as_mut_ptr); holding `&mut self` keeps that access exclusive.
#[derive(Debug)]
pub struct ProbeBuffer {
    words: Vec<usize>,
}

impl ProbeBuffer {
    /// Allocate `lines * cacheline_size / word_size` zeroed words.
    ///
    /// A size that overflows or cannot be allocated is reported against
    /// `buffer_lines`.
    pub fn new(cacheline_size: usize, lines: usize) -> Result<Self, ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidParameter {
            name: "buffer_lines".to_string(),
            reason,
        };
        let bytes = lines.checked_mul(cacheline_size).ok_or_else(|| {
            invalid(format!(
                "{} lines of {} B overflow the address space",
                lines, cacheline_size
            ))
        })?;
        let len = bytes / word_size_bytes();

        let mut words = Vec::new();
        words
            .try_reserve_exact(len)
            .map_err(|e| invalid(e.to_string()))?;
        words.resize(len, 0);
        Ok(Self { words })
    }

    /// Length in words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the buffer holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.words.len() * word_size_bytes()
    }

    /// Address of the first word.
    pub fn base_address(&self) -> usize {
        self.words.as_ptr() as usize
    }

    /// The words, for boundary discovery.
    pub fn words(&self) -> &[usize] {
        &self.words
    }

    /// Byte pointer to the first word, carrying provenance over the whole buffer.
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr().cast()
    }

    /// Locate the first cache-line boundary inside this buffer.
    pub fn locate_boundary(&self, cacheline_size: usize) -> Result<Boundary, ProbeError> {
        self.locate_boundary_after(cacheline_size, 0)
    }

    /// Locate the first boundary at least `lead_bytes` past the buffer base.
    ///
    /// Leaves room for sweeps that start before the boundary. When no boundary
    /// lies past the lead, the first boundary in the buffer is returned and the
    /// sweep's bounds check reports the offending offset.
    pub fn locate_boundary_after(
        &self,
        cacheline_size: usize,
        lead_bytes: usize,
    ) -> Result<Boundary, ProbeError> {
        let skip = lead_bytes.div_ceil(word_size_bytes()).min(self.words.len());
        let index = match locate(&self.words[skip..], cacheline_size) {
            Ok(index) => skip + index,
            Err(ProbeError::BoundaryNotFound { .. }) if skip > 0 => {
                locate(&self.words, cacheline_size)?
            }
            Err(e) => return Err(e),
        };
        Ok(Boundary {
            index,
            address: self.base_address() + index * word_size_bytes(),
            line_size: cacheline_size,
        })
    }
}

/// Position of the located boundary inside its [`ProbeBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    /// Word index in the buffer.
    pub index: usize,
    /// Absolute address.
    pub address: usize,
    /// Size of the line this boundary starts, in bytes.
    pub line_size: usize,
}

impl Boundary {
    /// Byte offset of the boundary from the buffer base.
    pub fn byte_index(&self) -> usize {
        self.index * word_size_bytes()
    }

    /// Whether a word written at `offset` bytes from the boundary spans two lines.
    pub fn straddles(&self, offset: isize) -> bool {
        let line = self.line_size as isize;
        offset.rem_euclid(line) + word_size_bytes() as isize > line
    }
}
