//! Local system stats tool
//!
//! The only adapter with no external service behind it; reads host stats via
//! `sysinfo` and always reports success.

use sysinfo::System;

use super::ToolResult;

const SOURCE: &str = "sysinfo";

/// Snapshot of host stats as a spoken reply
#[must_use]
pub fn report() -> ToolResult {
    let mut sys = System::new_all();
    sys.refresh_all();

    let host = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "this machine".to_string());
    let os = System::name().unwrap_or_else(|| "an unknown OS".to_string());
    let cpus = sys.cpus().len();
    let used_gib = to_gib(sys.used_memory());
    let total_gib = to_gib(sys.total_memory());

    ToolResult::success(
        format!(
            "{host} is running {os} with {cpus} CPU cores, using \
             {used_gib:.1} of {total_gib:.1} GiB of memory."
        ),
        SOURCE,
    )
}

#[allow(clippy::cast_precision_loss)]
fn to_gib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0 * 1024.0)
}
