//! Platform primitives consumed by the profiler.
//!
//! This module provides:
//! - Cycle counter reads and overhead estimation ([`CycleCounter`], [`Tsc`])
//! - Indivisible increments at arbitrary byte addresses ([`AtomicIncrement`])
//! - Cache-line size discovery ([`Platform`])
//!
//! Each primitive sits behind a trait so tests can substitute deterministic stubs.
//!
//! # Counter Selection
//!
//! - **x86_64**: `rdtsc` (constant-rate TSC on modern CPUs)
//! - **aarch64**: `cntvct_el0` virtual timer, which ticks well below core
//!   frequency on most SoCs, so per-increment deltas are often zero
//! - Elsewhere: nanoseconds from `Instant`

mod atomic;
mod platform;
mod timer;

pub use atomic::{AtomicIncrement, LockedIncrement};
pub use platform::{Platform, StaticPlatform, SystemPlatform};
pub use timer::{rdtsc, CycleCounter, Tsc};

#[cfg(test)]
pub(crate) use atomic::read_word;

/// Size of one probe buffer element in bytes.
pub const fn word_size_bytes() -> usize {
    std::mem::size_of::<usize>()
}
