//! Deterministic stand-ins for the platform primitives.

#![allow(dead_code)]

use std::cell::Cell;

use cacheline_probe::{AtomicIncrement, CycleCounter};

/// Counter whose reads alternate between a fixed start and end value.
pub struct FixedPairCounter {
    pub start: u64,
    pub end: u64,
    pub overhead: u64,
    next_is_start: bool,
}

impl FixedPairCounter {
    pub fn new(start: u64, end: u64, overhead: u64) -> Self {
        Self {
            start,
            end,
            overhead,
            next_is_start: true,
        }
    }
}

impl CycleCounter for FixedPairCounter {
    fn read(&mut self) -> u64 {
        let value = if self.next_is_start { self.start } else { self.end };
        self.next_is_start = !self.next_is_start;
        value
    }

    fn overhead(&mut self) -> u64 {
        self.overhead
    }

    fn name(&self) -> &'static str {
        "fixed-pair"
    }
}

/// Strictly increasing counter: each (start, end) pair is `overhead + delta`
/// apart, where `delta` cycles through `deltas`.
pub struct SequenceCounter {
    now: u64,
    overhead: u64,
    deltas: Vec<u64>,
    pair: usize,
    next_is_start: bool,
}

impl SequenceCounter {
    pub fn new(overhead: u64, deltas: Vec<u64>) -> Self {
        Self {
            now: 1_000,
            overhead,
            deltas,
            pair: 0,
            next_is_start: true,
        }
    }

    /// Sum of the true deltas over the first `trials` pairs.
    pub fn expected_total(&self, trials: usize) -> u64 {
        (0..trials).map(|i| self.deltas[i % self.deltas.len()]).sum()
    }
}

impl CycleCounter for SequenceCounter {
    fn read(&mut self) -> u64 {
        if self.next_is_start {
            self.now += 17;
        } else {
            self.now += self.overhead + self.deltas[self.pair % self.deltas.len()];
            self.pair += 1;
        }
        self.next_is_start = !self.next_is_start;
        self.now
    }

    fn overhead(&mut self) -> u64 {
        self.overhead
    }
}

/// Counts increments without touching memory.
#[derive(Default)]
pub struct CountingIncrement {
    pub calls: Cell<usize>,
    pub targets: std::cell::RefCell<Vec<usize>>,
}

impl AtomicIncrement for CountingIncrement {
    unsafe fn increment(&self, target: *mut u8) {
        self.calls.set(self.calls.get() + 1);
        let mut targets = self.targets.borrow_mut();
        if targets.last() != Some(&(target as usize)) {
            targets.push(target as usize);
        }
    }
}
