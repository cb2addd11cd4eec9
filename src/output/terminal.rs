//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::result::{OffsetResult, ProbeReport};

/// Format a report for human-readable terminal output.
pub fn format_report(report: &ProbeReport) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let meta = &report.metadata;

    output.push_str("cacheline-probe\n");
    output.push_str(&sep);
    output.push_str("\n\n");

    output.push_str(&format!(
        "  Cache line: {} B   Word: {} B   Counter: {}\n",
        meta.cacheline_size, meta.word_size, meta.counter
    ));
    output.push_str(&format!(
        "  Boundary:   {:#x} (word {} of {})\n",
        report.boundary_address, report.boundary_index, meta.buffer_len
    ));
    output.push_str(&format!(
        "  Sampling:   {} ms per offset, {} trials per burst\n\n",
        meta.duration_ms, meta.trials_per_burst
    ));

    output.push_str(&format!(
        "  {:>7}  {:<18}  {:>10}  {:>10}  {:>8}\n",
        "offset", "address", "avg cycles", "trials", "clamped"
    ));

    let baseline = report
        .results
        .iter()
        .filter(|r| !r.straddles_line)
        .filter_map(|r| r.average_cycles)
        .min();

    for result in &report.results {
        output.push_str(&format_row(result, baseline));
    }
    output.push('\n');

    if !report.warnings.is_empty() {
        for warning in &report.warnings {
            output.push_str(&format!("  {} {}\n", "\u{26A0}".yellow(), warning.description()));
        }
        output.push('\n');
    }

    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!(
        "Note: {} marks a word that spans two cache lines. Runtime {:.1} s.\n",
        "*".red().bold(),
        meta.runtime_secs
    ));

    output
}

fn format_row(result: &OffsetResult, baseline: Option<u64>) -> String {
    let avg = match result.average_cycles {
        Some(avg) => colorize_cycles(avg, baseline),
        None => "n/a".dimmed().to_string(),
    };
    let marker = if result.straddles_line {
        "*".red().bold().to_string()
    } else {
        " ".to_string()
    };
    // Colored strings carry escape codes, so pad the plain text first.
    let avg_plain_len = result
        .average_cycles
        .map_or(3, |avg| avg.to_string().len());
    let pad = " ".repeat(10usize.saturating_sub(avg_plain_len));

    format!(
        "  {:>+7}{} {:<#18x}  {}{}  {:>10}  {:>8}\n",
        result.offset, marker, result.address, pad, avg, result.trials, result.clamped
    )
}

/// Green near the aligned baseline, red at twice it or more.
fn colorize_cycles(avg: u64, baseline: Option<u64>) -> String {
    let text = avg.to_string();
    match baseline {
        Some(base) if avg >= base.saturating_mul(2).max(1) => text.red().to_string(),
        Some(base) if avg > base + base / 4 => text.yellow().to_string(),
        _ => text.green().to_string(),
    }
}
