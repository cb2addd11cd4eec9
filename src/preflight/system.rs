//! System-level preflight checks.

use serde::{Deserialize, Serialize};

/// Warning from system checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SystemWarning {
    /// CPU frequency scaling is not pinned, so TSC ticks and core cycles diverge.
    CpuGovernorNotPerformance {
        /// Current governor setting.
        current: String,
    },

    /// Turbo boost is enabled.
    TurboBoostEnabled,

    /// Running under a hypervisor.
    VirtualMachineDetected,

    /// One-minute load average above the threshold.
    HighSystemLoad {
        /// Current load average.
        load_average: f64,
        /// Threshold exceeded.
        threshold: f64,
    },

    /// The kernel traps locked operations that straddle a cache line.
    SplitLockDetection,
}

impl SystemWarning {
    /// Human-readable description.
    pub fn description(&self) -> String {
        match self {
            SystemWarning::CpuGovernorNotPerformance { current } => format!(
                "CPU frequency governor is '{}'; cycle counts drift with frequency. \
                 Set with: sudo cpupower frequency-set -g performance",
                current
            ),
            SystemWarning::TurboBoostEnabled => {
                "Turbo boost is enabled; the TSC rate no longer matches core cycles.".to_string()
            }
            SystemWarning::VirtualMachineDetected => {
                "Running in a virtual machine; the hypervisor may intercept split locks \
                 and scale the TSC."
                    .to_string()
            }
            SystemWarning::HighSystemLoad {
                load_average,
                threshold,
            } => format!(
                "High system load: {:.2} (threshold: {:.2}). Bursts may be preempted.",
                load_average, threshold
            ),
            SystemWarning::SplitLockDetection => {
                "Split lock detection is active; increments that straddle a cache line \
                 may be trapped or throttled by the kernel (see split_lock_detect=off)."
                    .to_string()
            }
        }
    }
}

/// Perform all system checks. Returns an empty vector on unsupported platforms.
pub fn system_check() -> Vec<SystemWarning> {
    #[allow(unused_mut)]
    let mut warnings = Vec::new();

    #[cfg(target_os = "linux")]
    {
        let cpuinfo = std::fs::read_to_string("/proc/cpuinfo").unwrap_or_default();
        warnings.extend(check_cpu_governor_linux());
        warnings.extend(check_turbo_boost_linux());
        warnings.extend(check_cpu_flags(&cpuinfo));
        warnings.extend(check_load_linux());
    }

    warnings
}

#[cfg(target_os = "linux")]
fn check_cpu_governor_linux() -> Option<SystemWarning> {
    let governor =
        std::fs::read_to_string("/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor").ok()?;
    let governor = governor.trim().to_lowercase();
    (governor != "performance").then_some(SystemWarning::CpuGovernorNotPerformance {
        current: governor,
    })
}

#[cfg(target_os = "linux")]
fn check_turbo_boost_linux() -> Option<SystemWarning> {
    if let Ok(value) = std::fs::read_to_string("/sys/devices/system/cpu/intel_pstate/no_turbo") {
        return (value.trim() == "0").then_some(SystemWarning::TurboBoostEnabled);
    }
    let value = std::fs::read_to_string("/sys/devices/system/cpu/cpufreq/boost").ok()?;
    (value.trim() == "1").then_some(SystemWarning::TurboBoostEnabled)
}

/// Inspect the `flags` line of `/proc/cpuinfo`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn check_cpu_flags(cpuinfo: &str) -> Vec<SystemWarning> {
    let Some(flags) = cpuinfo
        .lines()
        .find(|line| line.starts_with("flags"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, flags)| flags)
    else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    if flags.split_whitespace().any(|flag| flag == "hypervisor") {
        warnings.push(SystemWarning::VirtualMachineDetected);
    }
    if flags.split_whitespace().any(|flag| flag == "split_lock_detect") {
        warnings.push(SystemWarning::SplitLockDetection);
    }
    warnings
}

#[cfg(target_os = "linux")]
fn check_load_linux() -> Option<SystemWarning> {
    const LOAD_THRESHOLD: f64 = 1.0;

    let loadavg = std::fs::read_to_string("/proc/loadavg").ok()?;
    let load = loadavg.split_whitespace().next()?.parse::<f64>().ok()?;
    (load > LOAD_THRESHOLD).then_some(SystemWarning::HighSystemLoad {
        load_average: load,
        threshold: LOAD_THRESHOLD,
    })
}
