//! Cycle counter access and counter-overhead estimation.
//!
//! Provides:
//! - x86_64: `lfence; rdtsc` with compiler fences
//! - aarch64: `isb; mrs cntvct_el0`
//! - Fallback: nanoseconds since first use via `std::time::Instant`

use std::sync::atomic::{compiler_fence, Ordering};

/// Read the cycle counter with appropriate serialization.
#[inline]
pub fn rdtsc() -> u64 {
    compiler_fence(Ordering::SeqCst);

    #[cfg(target_arch = "x86_64")]
    let cycles = rdtsc_x86_64();

    #[cfg(target_arch = "aarch64")]
    let cycles = rdtsc_aarch64();

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let cycles = rdtsc_fallback();

    compiler_fence(Ordering::SeqCst);
    cycles
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn rdtsc_x86_64() -> u64 {
    let cycles: u64;
    // SAFETY: lfence and rdtsc have no memory operands and are available on every x86_64 CPU.
    unsafe {
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            options(nostack, nomem),
        );
    }
    cycles
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn rdtsc_aarch64() -> u64 {
    let cycles: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on every supported OS.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }
    cycles
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn rdtsc_fallback() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

/// Source of cycle timestamps for the profiler.
///
/// Implemented by [`Tsc`] for real measurements and by stubs in tests.
pub trait CycleCounter {
    /// Read the counter.
    fn read(&mut self) -> u64;

    /// Fixed cost of two back-to-back [`read`](Self::read) calls, in counter units.
    fn overhead(&mut self) -> u64;

    /// Counter name for reports.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Hardware cycle counter backed by [`rdtsc`].
#[derive(Debug, Clone)]
pub struct Tsc {
    overhead_samples: usize,
}

impl Tsc {
    /// Create a counter whose overhead estimate takes the minimum of
    /// `overhead_samples` back-to-back read pairs.
    pub fn new(overhead_samples: usize) -> Self {
        Self {
            overhead_samples: overhead_samples.max(1),
        }
    }
}

impl Default for Tsc {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl CycleCounter for Tsc {
    #[inline]
    fn read(&mut self) -> u64 {
        rdtsc()
    }

    fn overhead(&mut self) -> u64 {
        let mut min = u64::MAX;
        for _ in 0..self.overhead_samples {
            let start = rdtsc();
            let end = rdtsc();
            min = min.min(end.saturating_sub(start));
        }
        min
    }

    fn name(&self) -> &'static str {
        #[cfg(target_arch = "x86_64")]
        {
            "rdtsc"
        }
        #[cfg(target_arch = "aarch64")]
        {
            "cntvct_el0"
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            "Instant"
        }
    }
}
