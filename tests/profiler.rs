//! Latency profiler behavior with stubbed counters.

mod common;

use std::time::Duration;

use cacheline_probe::{
    word_size_bytes, CacheLineProbe, Config, LatencyProfiler, LockedIncrement, OffsetSweep,
    ProbeBuffer, StaticPlatform, Tsc,
};
use common::{CountingIncrement, FixedPairCounter, SequenceCounter};

fn reference_probe() -> CacheLineProbe {
    CacheLineProbe::with_config(Config {
        trials_per_burst: 999,
        ..Config::quick()
    })
}

/// start=100, end=110, overhead=5: every trial costs 5 cycles.
#[test]
fn fixed_counter_average_is_exact() {
    let mut counter = FixedPairCounter::new(100, 110, 5);
    let atomic = CountingIncrement::default();

    let report = reference_probe()
        .run_with(&StaticPlatform(64), &mut counter, &atomic)
        .unwrap();

    assert_eq!(report.results.len(), 15);
    for result in &report.results {
        assert_eq!(result.trials, 999);
        assert_eq!(result.average_cycles, Some(5));
        assert_eq!(result.clamped, 0);
    }
    assert_eq!(atomic.calls.get(), 15 * 999);
    assert_eq!(report.metadata.counter, "fixed-pair");
}

/// The overhead estimate cancels regardless of its magnitude.
#[test]
fn overhead_cancels() {
    let deltas = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3];
    let trials = 999;

    for overhead in [0, 7, 250, 1_000_000] {
        let mut counter = SequenceCounter::new(overhead, deltas.clone());
        let expected = counter.expected_total(trials) / trials as u64;

        let report = reference_probe()
            .offsets(0, 1)
            .run_with(&StaticPlatform(64), &mut counter, &CountingIncrement::default())
            .unwrap();

        assert_eq!(
            report.results[0].average_cycles,
            Some(expected),
            "overhead = {}",
            overhead
        );
    }
}

/// Deltas below the overhead are clamped to zero and counted.
#[test]
fn negative_deltas_clamped() {
    let mut counter = FixedPairCounter::new(100, 103, 5);

    let report = reference_probe()
        .offsets(0, 2)
        .run_with(&StaticPlatform(64), &mut counter, &CountingIncrement::default())
        .unwrap();

    for result in &report.results {
        assert_eq!(result.average_cycles, Some(0));
        assert_eq!(result.clamped, result.trials);
    }
}

/// Each offset increments its own address, one byte apart, in sweep order.
#[test]
fn targets_follow_sweep() {
    let atomic = CountingIncrement::default();
    let report = reference_probe()
        .trials_per_burst(2)
        .run_with(&StaticPlatform(64), &mut FixedPairCounter::new(0, 1, 0), &atomic)
        .unwrap();

    let targets = atomic.targets.borrow();
    assert_eq!(targets.len(), 15);
    for (i, pair) in targets.windows(2).enumerate() {
        assert_eq!(pair[1], pair[0] + 1, "step {}", i);
    }
    for result in &report.results {
        let expected = (report.boundary_address as isize + result.offset) as usize;
        assert_eq!(result.address, expected);
    }
}

#[cfg(target_pointer_width = "64")]
#[test]
fn default_window_marks_straddling_offsets() {
    let report = reference_probe()
        .trials_per_burst(1)
        .run_with(&StaticPlatform(64), &mut FixedPairCounter::new(0, 1, 0), &CountingIncrement::default())
        .unwrap();

    let offsets: Vec<isize> = report.results.iter().map(|r| r.offset).collect();
    assert_eq!(offsets, (-12..=2).collect::<Vec<_>>());

    let straddling: Vec<isize> = report
        .results
        .iter()
        .filter(|r| r.straddles_line)
        .map(|r| r.offset)
        .collect();
    assert_eq!(straddling, (-7..=-1).collect::<Vec<_>>());
}

/// Bursts repeat until the duration elapses.
#[test]
fn duration_drives_burst_count() {
    let mut buffer = ProbeBuffer::new(64, 10).unwrap();
    let boundary = buffer.locate_boundary(64).unwrap();
    let profiler = LatencyProfiler::new(Duration::from_millis(30), Duration::from_millis(10), 4);

    let results = profiler
        .profile(
            &mut buffer,
            &boundary,
            &OffsetSweep::new(0, 1),
            &mut FixedPairCounter::new(0, 2, 1),
            &CountingIncrement::default(),
        )
        .unwrap();

    let trials = results[0].trials;
    assert_eq!(trials % 4, 0);
    // At least three 10 ms pauses fit in 30 ms.
    assert!(trials >= 12, "trials = {}", trials);
    assert_eq!(results[0].average_cycles, Some(1));
}

/// Real counter and real locked increments on straddling addresses.
#[test]
fn hardware_run_completes() {
    let word = word_size_bytes() as isize;
    let report = CacheLineProbe::quick()
        .offsets(-word, word as usize + 1)
        .run_with(&StaticPlatform(64), &mut Tsc::new(100), &LockedIncrement)
        .unwrap();

    assert_eq!(report.results.len(), word as usize + 1);
    assert!(report.results.iter().all(|r| r.average().is_ok()));
    assert_eq!(report.results.iter().filter(|r| r.straddles_line).count(), word as usize - 1);
}
