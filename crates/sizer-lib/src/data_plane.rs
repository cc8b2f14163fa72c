//! Data-plane sizing
//!
//! Log servers are sized by ingest throughput, storage servers by the
//! write latency they can hold under load.

use crate::error::{PlanError, PlanResult};
use crate::models::ceil_count;
use crate::profile::{LatencyPoint, PerformanceProfile};
use tracing::debug;

/// Sizes log and storage servers from the write workload
pub struct DataPlaneSizer<'a> {
    profile: &'a PerformanceProfile,
}

impl<'a> DataPlaneSizer<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Self {
        Self { profile }
    }

    /// Log servers needed to absorb `events_per_second` without unbounded queueing
    ///
    /// Every event is written `log_replication_factor` times, and each server
    /// absorbs at most the profile's ceiling for the event size.
    pub fn log_servers_for_workload(&self, events_per_second: u64, event_size: u64) -> PlanResult<u32> {
        let ceiling = self.profile.log_server_ceiling(event_size)?;
        let replicated_load = events_per_second as f64 * self.profile.log_replication_factor as f64;
        let servers = ceil_count(replicated_load / ceiling, "log server")?;

        debug!(
            events_per_second,
            event_size,
            ceiling,
            servers,
            "Log servers for workload"
        );
        Ok(servers)
    }

    /// Storage servers needed to keep p95 write latency at or below the target
    ///
    /// # Errors
    /// `InvalidInput` if the event size is unknown or the target is below the
    /// lowest latency a storage server reaches at any measured load.
    pub fn storage_servers_for_latency(
        &self,
        events_per_second: u64,
        event_size: u64,
        target_latency_ms: u64,
    ) -> PlanResult<u32> {
        let curve = self.profile.latency_curve(event_size)?;
        let per_server = sustainable_load(curve, target_latency_ms as f64).ok_or_else(|| {
            PlanError::invalid_input(format!(
                "p95 latency target of {} ms is unattainable for {} byte events (best case {} ms)",
                target_latency_ms, event_size, curve[0].p95_latency_ms
            ))
        })?;
        let servers = ceil_count(events_per_second as f64 / per_server, "storage server")?;

        debug!(
            events_per_second,
            event_size,
            target_latency_ms,
            per_server,
            servers,
            "Storage servers for latency"
        );
        Ok(servers)
    }
}

/// Highest per-server load whose p95 latency stays within `target_ms`
///
/// Interpolates linearly between measured points; targets beyond the last
/// point saturate at its load.
fn sustainable_load(curve: &[LatencyPoint], target_ms: f64) -> Option<f64> {
    let first = curve.first()?;
    if target_ms < first.p95_latency_ms {
        return None;
    }
    for pair in curve.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if target_ms < high.p95_latency_ms {
            let fraction = (target_ms - low.p95_latency_ms) / (high.p95_latency_ms - low.p95_latency_ms);
            return Some(low.events_per_second + fraction * (high.events_per_second - low.events_per_second));
        }
    }
    curve.last().map(|point| point.events_per_second)
}
