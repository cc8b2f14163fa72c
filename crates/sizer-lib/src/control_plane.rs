//! Control-plane sizing
//!
//! Control servers carry two kinds of work with very different cost:
//! heavy operations that mutate stream structure (truncation, scaling,
//! transaction create/commit) and light metadata operations (segment
//! lookups, stream info, keep-alives). Both rates are derived from the
//! workload and then weighed against their own per-instance capacity.

use crate::error::{PlanError, PlanResult};
use crate::models::{ceil_count, ControlPlaneWorkload};
use crate::profile::PerformanceProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Operations a transaction costs at minimum: create plus commit or abort
const OPS_PER_TRANSACTION: f64 = 2.0;

/// Control-plane operation rates derived from a workload
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPlaneLoad {
    pub truncations_per_second: f64,
    pub scales_per_second: f64,
    pub transaction_ops_per_second: f64,
    /// Baseline metadata load from readers and writers
    pub client_metadata_ops_per_second: f64,
    pub extra_metadata_ops_per_second: f64,
    /// Transaction pings, assuming every transaction is open at once
    pub keepalive_ops_per_second: f64,
}

impl ControlPlaneLoad {
    /// Derive operation rates from a characterized workload
    ///
    /// # Errors
    /// `InvalidInput` for a zero retention period, transactions without
    /// writers, or extra metadata clients declared with a zero client count.
    pub fn derive(workload: &ControlPlaneWorkload, profile: &PerformanceProfile) -> PlanResult<Self> {
        let streams = workload.streams as f64;
        let writers = workload.writers as f64;
        let readers = workload.readers as f64;

        let truncations_per_second = match workload.retention_hours {
            Some(0) => {
                return Err(PlanError::invalid_input(
                    "retention period must be at least one hour",
                ))
            }
            Some(hours) => streams / hours as f64 / SECONDS_PER_HOUR,
            None => 0.0,
        };

        let scales_per_second = workload
            .scales_per_hour
            .map(|per_hour| streams * per_hour as f64 / SECONDS_PER_HOUR)
            .unwrap_or(0.0);

        let (transaction_ops_per_second, keepalive_ops_per_second) = match workload.transactions_per_hour {
            Some(_) if workload.writers == 0 => {
                return Err(PlanError::invalid_input(
                    "transactions require at least one writer",
                ))
            }
            Some(per_hour) => {
                let per_hour = per_hour as f64;
                (
                    writers * per_hour * OPS_PER_TRANSACTION / SECONDS_PER_HOUR,
                    writers * per_hour / profile.transaction_ping_period_in_seconds,
                )
            }
            None => (0.0, 0.0),
        };

        let extra_metadata_ops_per_second = match workload.extra_metadata {
            Some(extra) if extra.clients == 0 => {
                return Err(PlanError::invalid_input(
                    "extra metadata clients declared with a client count of zero",
                ))
            }
            Some(extra) => extra.clients as f64 * extra.ops_per_hour as f64 / SECONDS_PER_HOUR,
            None => 0.0,
        };

        let client_metadata_ops_per_second = writers * profile.writer_default_metadata_ops_per_second
            + readers * profile.reader_default_metadata_ops_per_second;

        Ok(Self {
            truncations_per_second,
            scales_per_second,
            transaction_ops_per_second,
            client_metadata_ops_per_second,
            extra_metadata_ops_per_second,
            keepalive_ops_per_second,
        })
    }

    /// Structural mutations per second
    pub fn heavy_ops_per_second(&self) -> f64 {
        self.truncations_per_second + self.scales_per_second + self.transaction_ops_per_second
    }

    /// Light metadata operations per second
    pub fn metadata_ops_per_second(&self) -> f64 {
        self.client_metadata_ops_per_second
            + self.extra_metadata_ops_per_second
            + self.keepalive_ops_per_second
    }
}

/// Sizes control servers from stream count and operation rates
pub struct ControlPlaneSizer<'a> {
    profile: &'a PerformanceProfile,
}

impl<'a> ControlPlaneSizer<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Self {
        Self { profile }
    }

    /// Control servers needed for `streams` streams and the given operation rates
    ///
    /// Each server owns a bounded number of streams. Its operation budget is
    /// shared by heavy and light work in proportion to their per-instance
    /// capacities, so the two rates are weighted separately before combining.
    pub fn control_servers_for_workload(
        &self,
        streams: u64,
        heavy_ops_per_second: f64,
        metadata_ops_per_second: f64,
    ) -> PlanResult<u32> {
        for (name, rate) in [
            ("heavy operation rate", heavy_ops_per_second),
            ("metadata operation rate", metadata_ops_per_second),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(PlanError::invalid_input(format!(
                    "{} must be a finite non-negative number (got {})",
                    name, rate
                )));
            }
        }

        let for_streams = streams as f64 / self.profile.control_max_streams_per_instance;
        let for_operations = heavy_ops_per_second / self.profile.control_max_heavy_ops_per_second
            + metadata_ops_per_second / self.profile.control_max_light_ops_per_second;
        let servers = ceil_count(for_streams.max(for_operations), "control server")?;

        debug!(
            streams,
            heavy_ops_per_second,
            metadata_ops_per_second,
            servers,
            "Control servers for workload"
        );
        Ok(servers)
    }

    /// Derive the workload's load and size control servers for it
    pub fn size(&self, workload: &ControlPlaneWorkload) -> PlanResult<(ControlPlaneLoad, u32)> {
        let load = ControlPlaneLoad::derive(workload, self.profile)?;
        let servers = self.control_servers_for_workload(
            workload.streams,
            load.heavy_ops_per_second(),
            load.metadata_ops_per_second(),
        )?;
        Ok((load, servers))
    }
}
