//! Configuration for cache-line latency profiling.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Configuration options for `CacheLineProbe`.
///
/// Every field can be overridden from a harness parameter map; missing keys
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum wall-clock measurement time per offset in milliseconds (default: 3,000).
    pub duration_ms: u64,

    /// Sleep between the overhead estimate and each burst in milliseconds (default: 10).
    pub burst_pause_ms: u64,

    /// Timed atomic increments per burst (default: 999).
    pub trials_per_burst: usize,

    /// Probe buffer size in cache lines (default: 10).
    pub buffer_lines: usize,

    /// First byte offset of the sweep relative to the boundary.
    ///
    /// `None` uses two words before the boundary plus half a word, which is
    /// -12 on 64-bit targets.
    pub offset_start: Option<isize>,

    /// Number of consecutive byte offsets to probe (default: 15).
    pub offset_count: usize,

    /// Back-to-back counter reads used to estimate counter overhead (default: 10,000).
    pub overhead_samples: usize,

    /// Print diagnostics to stderr (default: true).
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_ms: 3_000,
            burst_pause_ms: 10,
            trials_per_burst: 999,
            buffer_lines: 10,
            offset_start: None,
            offset_count: 15,
            overhead_samples: 10_000,
            verbose: true,
        }
    }
}

impl Config {
    /// Fast configuration for tests: one short burst per offset, no pauses.
    pub fn quick() -> Self {
        Self {
            duration_ms: 0,
            burst_pause_ms: 0,
            trials_per_burst: 32,
            overhead_samples: 100,
            verbose: false,
            ..Self::default()
        }
    }

    /// Parse a harness parameter map, falling back to defaults for absent keys.
    pub fn from_params(
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ProbeError> {
        serde_json::from_value(serde_json::Value::Object(params.clone())).map_err(|e| {
            ProbeError::InvalidParameter {
                name: offending_key(params),
                reason: e.to_string(),
            }
        })
    }

    /// Per-offset measurement duration.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Pause before each burst.
    pub fn burst_pause(&self) -> Duration {
        Duration::from_millis(self.burst_pause_ms)
    }

    /// Resolve the first sweep offset for a given word size.
    pub fn resolved_offset_start(&self, word_size: usize) -> isize {
        self.offset_start
            .unwrap_or(-2 * word_size as isize + (word_size / 2) as isize)
    }
}

/// Find the first key that fails to parse on its own.
fn offending_key(params: &serde_json::Map<String, serde_json::Value>) -> String {
    params
        .iter()
        .find(|(key, value)| {
            let mut single = serde_json::Map::new();
            single.insert((*key).clone(), (*value).clone());
            serde_json::from_value::<Config>(serde_json::Value::Object(single)).is_err()
        })
        .map(|(key, _)| key.clone())
        .unwrap_or_else(|| "params".to_string())
}
