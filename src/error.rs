//! Error taxonomy for the cache-line probe.

/// Errors raised while locating the boundary or profiling offsets.
///
/// Every variant is recoverable by the caller: the harness decides whether
/// to abort the run or skip the affected offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The platform reported a cache-line size that is zero or not a power of two.
    InvalidCacheLineSize {
        /// The reported size in bytes.
        size: usize,
    },

    /// No element of the probe buffer starts a cache line.
    BoundaryNotFound {
        /// Cache-line size used for the search.
        cacheline_size: usize,
        /// Buffer length in words.
        buffer_len: usize,
    },

    /// An offset would read or write outside the probe buffer.
    OffsetOutOfBounds {
        /// The offending byte offset relative to the boundary.
        offset: isize,
        /// Word index of the boundary inside the buffer.
        boundary_index: usize,
        /// Buffer length in bytes.
        buffer_bytes: usize,
    },

    /// No trials were recorded for an offset, so no average exists.
    ZeroTrialDivision {
        /// The offset that recorded no trials.
        offset: isize,
    },

    /// A harness parameter could not be parsed.
    InvalidParameter {
        /// Parameter name, or `"params"` when the whole map is malformed.
        name: String,
        /// Parser message.
        reason: String,
    },
}

impl ProbeError {
    /// Stable identifier for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::InvalidCacheLineSize { .. } => "InvalidCacheLineSize",
            ProbeError::BoundaryNotFound { .. } => "BoundaryNotFound",
            ProbeError::OffsetOutOfBounds { .. } => "OffsetOutOfBounds",
            ProbeError::ZeroTrialDivision { .. } => "ZeroTrialDivision",
            ProbeError::InvalidParameter { .. } => "InvalidParameter",
        }
    }
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::InvalidCacheLineSize { size } => {
                write!(f, "invalid cache line size {} B (must be a non-zero power of two)", size)
            }
            ProbeError::BoundaryNotFound {
                cacheline_size,
                buffer_len,
            } => write!(
                f,
                "could not find a {} B cache line boundary in a buffer of {} words",
                cacheline_size, buffer_len
            ),
            ProbeError::OffsetOutOfBounds {
                offset,
                boundary_index,
                buffer_bytes,
            } => write!(
                f,
                "offset {:+} from boundary at word {} falls outside the {} B probe buffer",
                offset, boundary_index, buffer_bytes
            ),
            ProbeError::ZeroTrialDivision { offset } => {
                write!(f, "no trials recorded for offset {:+}", offset)
            }
            ProbeError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ProbeError {}
