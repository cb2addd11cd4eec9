//! JSON serialization for probe reports.

use crate::result::ProbeReport;

/// Serialize a report to a compact JSON string.
pub fn to_json(report: &ProbeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
pub fn to_json_pretty(report: &ProbeReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
