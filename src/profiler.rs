//! Timed atomic increments over the offset sweep.
//!
//! For each offset the profiler runs bursts until the per-offset duration
//! has elapsed. A burst re-estimates counter overhead, pauses briefly, then
//! times `trials_per_burst` increments, subtracting the overhead from each
//! raw delta.

use std::thread;
use std::time::{Duration, Instant};

use crate::boundary::{Boundary, ProbeBuffer};
use crate::config::Config;
use crate::error::ProbeError;
use crate::measurement::{word_size_bytes, AtomicIncrement, CycleCounter};
use crate::result::OffsetResult;
use crate::sweep::{OffsetSweep, Target};

/// Running totals for one offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    total_cycles: u64,
    trials: u64,
    clamped: u64,
}

impl Tally {
    /// Add one overhead-corrected sample. Deltas below the overhead count as 0.
    #[inline]
    fn record(&mut self, raw: u64, overhead: u64) {
        match raw.checked_sub(overhead) {
            Some(cycles) => self.total_cycles = self.total_cycles.saturating_add(cycles),
            None => self.clamped += 1,
        }
        self.trials += 1;
    }
}

/// Measures the cost of an atomic increment at each offset around a boundary.
#[derive(Debug, Clone)]
pub struct LatencyProfiler {
    duration: Duration,
    burst_pause: Duration,
    trials_per_burst: usize,
    verbose: bool,
}

impl LatencyProfiler {
    /// Create a profiler with explicit timing parameters.
    pub fn new(duration: Duration, burst_pause: Duration, trials_per_burst: usize) -> Self {
        Self {
            duration,
            burst_pause,
            trials_per_burst,
            verbose: false,
        }
    }

    /// Create a profiler from a [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self {
            duration: config.duration(),
            burst_pause: config.burst_pause(),
            trials_per_burst: config.trials_per_burst,
            verbose: config.verbose,
        }
    }

    /// Print each probed address and its average to stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Profile every offset of `sweep` around `boundary`.
    ///
    /// All offsets are checked against `buffer` before any increment runs.
    /// Blocks for at least `duration * sweep.count`.
    pub fn profile<C, A>(
        &self,
        buffer: &mut ProbeBuffer,
        boundary: &Boundary,
        sweep: &OffsetSweep,
        counter: &mut C,
        atomic: &A,
    ) -> Result<Vec<OffsetResult>, ProbeError>
    where
        C: CycleCounter + ?Sized,
        A: AtomicIncrement + ?Sized,
    {
        let targets = sweep.resolve(boundary, buffer.len_bytes(), word_size_bytes())?;
        let base = buffer.as_mut_ptr();

        let mut results = Vec::with_capacity(targets.len());
        for target in &targets {
            // SAFETY: `resolve` guarantees the whole word lies inside `buffer`,
            // which `&mut` keeps exclusively ours while we measure.
            let ptr = unsafe { base.add(target.byte_index) };
            let address = ptr as usize;
            if self.verbose {
                eprintln!(
                    "[cacheline-probe] Address: {:#x} (offset {:+})",
                    address, target.offset
                );
            }

            let tally = self.measure(ptr, &mut *counter, atomic);
            let result = OffsetResult::new(
                target.offset,
                address,
                boundary.straddles(target.offset),
                tally.total_cycles,
                tally.trials,
                tally.clamped,
            );
            if self.verbose {
                self.log_result(target, &result);
            }
            results.push(result);
        }

        Ok(results)
    }

    /// Run bursts against one address until the duration has elapsed.
    fn measure<C, A>(&self, ptr: *mut u8, counter: &mut C, atomic: &A) -> Tally
    where
        C: CycleCounter + ?Sized,
        A: AtomicIncrement + ?Sized,
    {
        let started = Instant::now();
        let mut tally = Tally::default();

        loop {
            let overhead = counter.overhead();
            if !self.burst_pause.is_zero() {
                thread::sleep(self.burst_pause);
            }

            for _ in 0..self.trials_per_burst {
                let start = counter.read();
                // SAFETY: see `profile`.
                unsafe { atomic.increment(ptr) };
                let end = counter.read();
                tally.record(end.saturating_sub(start), overhead);
            }

            if started.elapsed() >= self.duration {
                break;
            }
        }

        tally
    }

    fn log_result(&self, target: &Target, result: &OffsetResult) {
        match result.average_cycles {
            Some(avg) => eprintln!("[cacheline-probe] Total average cycles spent: {}", avg),
            None => eprintln!(
                "[cacheline-probe] No trials recorded for offset {:+}; average unavailable",
                target.offset
            ),
        }
        if result.clamped > 0 {
            eprintln!(
                "[cacheline-probe] {} of {} samples at offset {:+} fell below the counter overhead",
                result.clamped, result.trials, target.offset
            );
        }
    }
}
