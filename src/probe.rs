//! Main `CacheLineProbe` entry point and builder.

use std::time::{Duration, Instant};

use crate::boundary::{validate_cacheline_size, ProbeBuffer};
use crate::config::Config;
use crate::error::ProbeError;
use crate::measurement::{
    word_size_bytes, AtomicIncrement, CycleCounter, LockedIncrement, Platform, SystemPlatform, Tsc,
};
use crate::preflight::system_check;
use crate::profiler::LatencyProfiler;
use crate::result::{Metadata, ProbeReport};
use crate::sweep::OffsetSweep;

/// Locates a cache-line boundary and profiles atomic increments around it.
///
/// # Example
///
/// ```ignore
/// use cacheline_probe::CacheLineProbe;
/// use std::time::Duration;
///
/// let report = CacheLineProbe::new()
///     .duration(Duration::from_millis(500))
///     .run()?;
///
/// for (offset, avg) in report.averages() {
///     println!("{offset:+}: {avg:?} cycles");
/// }
/// ```
///
/// With the default configuration the run blocks for about 45 seconds
/// (3 seconds for each of 15 offsets).
#[derive(Debug, Clone, Default)]
pub struct CacheLineProbe {
    config: Config,
}

impl CacheLineProbe {
    /// Create with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create with [`Config::quick`]: one short burst per offset.
    pub fn quick() -> Self {
        Self {
            config: Config::quick(),
        }
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Set the minimum measurement time per offset.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.config.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the pause before each burst.
    pub fn burst_pause(mut self, pause: Duration) -> Self {
        self.config.burst_pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the timed increments per burst.
    pub fn trials_per_burst(mut self, trials: usize) -> Self {
        self.config.trials_per_burst = trials;
        self
    }

    /// Set the probe buffer size in cache lines.
    pub fn buffer_lines(mut self, lines: usize) -> Self {
        self.config.buffer_lines = lines;
        self
    }

    /// Probe `count` consecutive byte offsets starting at `start`.
    pub fn offsets(mut self, start: isize, count: usize) -> Self {
        self.config.offset_start = Some(start);
        self.config.offset_count = count;
        self
    }

    /// Enable or disable stderr diagnostics.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// The offset window this probe will measure.
    pub fn sweep(&self) -> OffsetSweep {
        OffsetSweep::new(
            self.config.resolved_offset_start(word_size_bytes()),
            self.config.offset_count,
        )
    }

    /// Run on this machine with the hardware counter and locked increments.
    pub fn run(&self) -> Result<ProbeReport, ProbeError> {
        let warnings = system_check();
        if self.config.verbose {
            for warning in &warnings {
                eprintln!("[cacheline-probe] {}", warning.description());
            }
        }

        let mut counter = Tsc::new(self.config.overhead_samples);
        let mut report = self.run_with(&SystemPlatform, &mut counter, &LockedIncrement)?;
        report.warnings = warnings;
        Ok(report)
    }

    /// Run with injected platform primitives.
    pub fn run_with<P, C, A>(
        &self,
        platform: &P,
        counter: &mut C,
        atomic: &A,
    ) -> Result<ProbeReport, ProbeError>
    where
        P: Platform + ?Sized,
        C: CycleCounter + ?Sized,
        A: AtomicIncrement + ?Sized,
    {
        let started = Instant::now();
        let verbose = self.config.verbose;

        let cacheline_size = validate_cacheline_size(platform.cacheline_size())?;
        if verbose {
            eprintln!("[cacheline-probe] Cache line size: {} B", cacheline_size);
            eprintln!("[cacheline-probe] Array integer size: {} B", word_size_bytes());
        }

        let sweep = self.sweep();
        let mut buffer = ProbeBuffer::new(cacheline_size, self.config.buffer_lines)?;
        let boundary = buffer
            .locate_boundary_after(cacheline_size, sweep.start.min(0).unsigned_abs())?;
        if verbose {
            eprintln!(
                "[cacheline-probe] The address at the beginning boundary of cache line is {:#x}",
                boundary.address
            );
        }

        let results = LatencyProfiler::from_config(&self.config)
            .profile(&mut buffer, &boundary, &sweep, counter, atomic)?;

        Ok(ProbeReport {
            boundary_index: boundary.index,
            boundary_address: boundary.address,
            sweep,
            results,
            warnings: Vec::new(),
            metadata: Metadata {
                cacheline_size,
                word_size: word_size_bytes(),
                buffer_len: buffer.len(),
                counter: counter.name().to_string(),
                duration_ms: self.config.duration_ms,
                trials_per_burst: self.config.trials_per_burst,
                runtime_secs: started.elapsed().as_secs_f64(),
            },
        })
    }
}
