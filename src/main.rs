//! Command-line entry point.
//!
//! Usage: `cacheline-probe [PARAMS_JSON] [--json]`
//!
//! `PARAMS_JSON` is an optional object of configuration overrides, for
//! example `'{"duration_ms": 500}'`. With `--json` the harness response map is
//! printed instead of the colored report.

use std::process::ExitCode;
use std::time::Instant;

use cacheline_probe::{harness, output, CacheLineProbe, Config, ProbeError};

fn main() -> ExitCode {
    let mut json = false;
    let mut raw_params = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("usage: cacheline-probe [PARAMS_JSON] [--json]");
                return ExitCode::SUCCESS;
            }
            _ => raw_params = Some(arg),
        }
    }

    let started = Instant::now();
    let outcome = parse_params(raw_params.as_deref())
        .and_then(|params| Config::from_params(&params))
        .and_then(|config| CacheLineProbe::with_config(config).run());

    if json {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let response = harness::respond(&outcome, elapsed_ms);
        match serde_json::to_string_pretty(&response) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("[cacheline-probe] failed to serialize response: {}", e),
        }
    } else if let Ok(report) = &outcome {
        print!("{}", output::format_report(report));
    }

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[cacheline-probe] {}", e);
            ExitCode::FAILURE
        }
    }
}

fn parse_params(
    raw: Option<&str>,
) -> Result<serde_json::Map<String, serde_json::Value>, ProbeError> {
    let Some(raw) = raw else {
        return Ok(serde_json::Map::new());
    };
    serde_json::from_str(raw).map_err(|e| ProbeError::InvalidParameter {
        name: "params".to_string(),
        reason: e.to_string(),
    })
}
