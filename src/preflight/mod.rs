//! Preflight checks run before measuring.
//!
//! None of these stop a run. They flag machine settings that make cycle
//! counts for locked increments noisy or misleading.

mod system;

pub use system::{system_check, SystemWarning};
