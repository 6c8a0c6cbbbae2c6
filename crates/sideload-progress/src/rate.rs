//! Transfer-rate reporting.
//!
//! End-of-session throughput is derived from the total byte count and the
//! elapsed wall time, reported in mebibytes per second with fixed-point
//! precision.

use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// Transfer rate in MiB/s.
///
/// A zero-length elapsed time yields `0.0` — near-instant transfers have
/// no measurable rate, and the sentinel keeps the report finite.
#[must_use]
pub fn rate_mib(total_bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    total_bytes as f64 / MIB / secs
}

/// Transfer rate formatted with two decimal places, e.g. `"10.00"`.
#[must_use]
pub fn format_rate(total_bytes: u64, elapsed: Duration) -> String {
    format!("{:.2}", rate_mib(total_bytes, elapsed))
}
