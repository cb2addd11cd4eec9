//! Probe result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::preflight::SystemWarning;
use crate::sweep::OffsetSweep;

/// Complete result of one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// Word index of the located boundary in the probe buffer.
    pub boundary_index: usize,

    /// Absolute address of the located boundary.
    pub boundary_address: usize,

    /// The offsets that were probed.
    pub sweep: OffsetSweep,

    /// Per-offset measurements in sweep order.
    pub results: Vec<OffsetResult>,

    /// Non-fatal system warnings collected before measuring.
    pub warnings: Vec<SystemWarning>,

    /// Run parameters for debugging.
    pub metadata: Metadata,
}

impl ProbeReport {
    /// Offset to average cycles per increment; `None` where no trials ran.
    pub fn averages(&self) -> BTreeMap<isize, Option<u64>> {
        self.results
            .iter()
            .map(|r| (r.offset, r.average_cycles))
            .collect()
    }

    /// Result for one offset, if it was part of the sweep.
    pub fn get(&self, offset: isize) -> Option<&OffsetResult> {
        self.results.iter().find(|r| r.offset == offset)
    }
}

/// Measurement for a single byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetResult {
    /// Byte offset relative to the boundary.
    pub offset: isize,

    /// Absolute address that was incremented.
    pub address: usize,

    /// Whether the incremented word crosses into the next cache line.
    pub straddles_line: bool,

    /// Overhead-corrected cycles summed over all trials.
    pub total_cycles: u64,

    /// Number of timed increments.
    pub trials: u64,

    /// Trials whose raw delta was below the overhead estimate and counted as 0.
    pub clamped: u64,

    /// `total_cycles / trials`, truncated. `None` when no trials ran.
    pub average_cycles: Option<u64>,
}

impl OffsetResult {
    /// Build a result, computing the truncated average.
    pub fn new(
        offset: isize,
        address: usize,
        straddles_line: bool,
        total_cycles: u64,
        trials: u64,
        clamped: u64,
    ) -> Self {
        Self {
            offset,
            address,
            straddles_line,
            total_cycles,
            trials,
            clamped,
            average_cycles: total_cycles.checked_div(trials),
        }
    }

    /// Average cycles per increment.
    pub fn average(&self) -> Result<u64, ProbeError> {
        self.average_cycles
            .ok_or(ProbeError::ZeroTrialDivision {
                offset: self.offset,
            })
    }
}

/// Metadata describing how the probe ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Cache-line size in bytes.
    pub cacheline_size: usize,

    /// Probe buffer element size in bytes.
    pub word_size: usize,

    /// Probe buffer length in words.
    pub buffer_len: usize,

    /// Counter used for timing.
    pub counter: String,

    /// Minimum measurement time per offset in milliseconds.
    pub duration_ms: u64,

    /// Timed increments per burst.
    pub trials_per_burst: usize,

    /// Wall-clock time of the whole run in seconds.
    pub runtime_secs: f64,
}
