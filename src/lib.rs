//! # cacheline-probe
//!
//! Measure how much an atomic increment costs as its target slides across
//! a cache-line boundary.
//!
//! The probe allocates a buffer of machine words spanning several cache
//! lines, finds the first word that starts a line, and then, for each byte
//! offset in a small window around that boundary, times locked increments
//! with the cycle counter. Offsets whose word spans two lines show the
//! split-lock penalty relevant to false sharing and packed concurrent
//! data structures.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cacheline_probe::CacheLineProbe;
//!
//! let report = CacheLineProbe::new().run()?;
//! for result in &report.results {
//!     println!("{:+} -> {:?} cycles", result.offset, result.average_cycles);
//! }
//! ```
//!
//! The default run measures 15 offsets for 3 seconds each. Use
//! [`Config::quick`] or the builder methods on [`CacheLineProbe`] to shorten it.
//!
//! ## Deterministic Testing
//!
//! The cache-line size, the cycle counter, and the increment itself are
//! injected through the [`Platform`], [`CycleCounter`] and
//! [`AtomicIncrement`] traits, so [`CacheLineProbe::run_with`] can be driven
//! by stubs.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod boundary;
mod config;
mod error;
mod probe;
mod profiler;
mod result;
mod sweep;

// Functional modules
pub mod harness;
pub mod measurement;
pub mod output;
pub mod preflight;

pub use boundary::{locate, validate_cacheline_size, Boundary, ProbeBuffer};
pub use config::Config;
pub use error::ProbeError;
pub use measurement::{
    word_size_bytes, AtomicIncrement, CycleCounter, LockedIncrement, Platform, StaticPlatform,
    SystemPlatform, Tsc,
};
pub use probe::CacheLineProbe;
pub use profiler::LatencyProfiler;
pub use result::{Metadata, OffsetResult, ProbeReport};
pub use sweep::{OffsetSweep, Target};

/// Run the probe on this machine with the default configuration.
///
/// Blocks for roughly 45 seconds.
pub fn profile() -> Result<ProbeReport, ProbeError> {
    CacheLineProbe::new().run()
}
