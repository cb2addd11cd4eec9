//! Invocation boundary: parameter map in, `{success, payload}` map out.
//!
//! ```ignore
//! let response = cacheline_probe::harness::invoke(&serde_json::Map::new());
//! assert_eq!(response["success"], true);
//! ```

use std::time::Instant;

use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::ProbeError;
use crate::measurement::{AtomicIncrement, CycleCounter, Platform};
use crate::probe::CacheLineProbe;
use crate::result::ProbeReport;

/// Label carried in every payload.
pub const TEST_LABEL: &str = "cache latency test";

/// Run the probe on this machine.
pub fn invoke(params: &Map<String, Value>) -> Value {
    let started = Instant::now();
    let outcome = Config::from_params(params)
        .and_then(|config| CacheLineProbe::with_config(config).run());
    respond(&outcome, u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
}

/// Run the probe with injected platform primitives.
pub fn invoke_with<P, C, A>(
    params: &Map<String, Value>,
    platform: &P,
    counter: &mut C,
    atomic: &A,
) -> Value
where
    P: Platform + ?Sized,
    C: CycleCounter + ?Sized,
    A: AtomicIncrement + ?Sized,
{
    let started = Instant::now();
    let outcome = Config::from_params(params)
        .and_then(|config| CacheLineProbe::with_config(config).run_with(platform, counter, atomic));
    respond(&outcome, u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX))
}

/// Build the response map for a finished run.
pub fn respond(outcome: &Result<ProbeReport, ProbeError>, elapsed_ms: u64) -> Value {
    let mut payload = Map::new();
    payload.insert("test".into(), json!(TEST_LABEL));
    payload.insert("time".into(), json!(elapsed_ms));

    match outcome {
        Ok(report) => {
            let results: Map<String, Value> = report
                .averages()
                .into_iter()
                .map(|(offset, avg)| (offset.to_string(), json!(avg)))
                .collect();
            payload.insert("cacheline_size".into(), json!(report.metadata.cacheline_size));
            payload.insert("word_size".into(), json!(report.metadata.word_size));
            payload.insert("boundary_index".into(), json!(report.boundary_index));
            payload.insert(
                "boundary_address".into(),
                json!(format!("{:#x}", report.boundary_address)),
            );
            payload.insert("results".into(), Value::Object(results));
            json!({ "success": true, "payload": payload })
        }
        Err(error) => {
            payload.insert(
                "error".into(),
                json!({ "kind": error.kind(), "message": error.to_string() }),
            );
            json!({ "success": false, "payload": payload })
        }
    }
}
