//! Performance profiles
//!
//! A profile carries the environment-calibrated constants every sizing
//! calculation reads: per-event-size lookup tables, per-client metadata
//! rates, per-instance capacities and the redundancy arithmetic of each
//! service type. Profiles are plain values; any number of them can coexist
//! and a planning run only ever reads the one it was handed.

mod bare_metal;

use crate::error::{PlanError, PlanResult};
use crate::models::{ServiceKind, ServiceTable};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Failure-tolerance arithmetic of one service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedundancyScheme {
    /// Majority ensemble: `2f + 1` members survive `f` failures
    Quorum,
    /// Fixed write ensemble: `size + f` members keep a full ensemble after `f` failures
    Ensemble { size: u32 },
    /// Replicated without quorum: `f + 1` members keep one survivor
    Standby,
}

impl RedundancyScheme {
    /// Instances needed to survive `failures` concurrent instance failures
    pub fn required(&self, failures: u32) -> u32 {
        match self {
            RedundancyScheme::Quorum => failures.saturating_mul(2).saturating_add(1),
            RedundancyScheme::Ensemble { size } => size.saturating_add(failures),
            RedundancyScheme::Standby => failures.saturating_add(1),
        }
    }

    /// Instance failures a group of `instances` survives
    pub fn tolerated(&self, instances: u32) -> u32 {
        match self {
            RedundancyScheme::Quorum => instances.saturating_sub(1) / 2,
            RedundancyScheme::Ensemble { size } => instances.saturating_sub(*size),
            RedundancyScheme::Standby => instances.saturating_sub(1),
        }
    }

    /// Round a count up to a size the scheme can run with
    pub fn normalize(&self, instances: u32) -> u32 {
        match self {
            // Even quorum sizes add no tolerance over the next smaller odd size
            RedundancyScheme::Quorum if instances % 2 == 0 => instances.saturating_add(1),
            _ => instances,
        }
    }
}

/// CPU and RAM reserved by one instance of a service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceFootprint {
    pub cpu_cores: f64,
    pub ram_gb: f64,
}

/// Sizing constants of one service type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Smallest deployable instance count
    pub minimum: u32,
    pub redundancy: RedundancyScheme,
    pub footprint: ServiceFootprint,
}

/// One measured point of a storage server's load/latency curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyPoint {
    /// Write load on a single storage server (events/s)
    pub events_per_second: f64,
    /// Observed 95th percentile write latency at that load (ms)
    pub p95_latency_ms: f64,
}

impl LatencyPoint {
    pub const fn new(events_per_second: f64, p95_latency_ms: f64) -> Self {
        Self {
            events_per_second,
            p95_latency_ms,
        }
    }
}

/// Environment-calibrated constants consumed by every sizing calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub name: String,
    /// Supported event sizes in bytes, ascending
    pub event_sizes: Vec<u64>,
    /// Lowest scaling trigger worth setting on one segment (events/s)
    pub segment_scaling_min_events: BTreeMap<u64, f64>,
    /// Highest scaling trigger one segment can absorb (events/s)
    pub segment_scaling_max_events: BTreeMap<u64, f64>,
    pub writer_default_metadata_ops_per_second: f64,
    pub reader_default_metadata_ops_per_second: f64,
    pub transaction_ping_period_in_seconds: f64,
    /// Ingest ceiling of a single log server (events/s)
    pub log_server_max_events: BTreeMap<u64, f64>,
    /// Copies of every event written to log servers
    pub log_replication_factor: u32,
    pub storage_latency_curves: BTreeMap<u64, Vec<LatencyPoint>>,
    pub control_max_streams_per_instance: f64,
    pub control_max_heavy_ops_per_second: f64,
    pub control_max_light_ops_per_second: f64,
    pub services: ServiceTable<ServiceSpec>,
    pub containers_per_storage_server: u32,
    pub buckets_per_control_server: u32,
}

impl PerformanceProfile {
    /// Built-in calibration for clusters running on dedicated hardware
    pub fn bare_metal() -> Self {
        bare_metal::profile()
    }

    /// Parse and validate a profile from JSON
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let profile: PerformanceProfile =
            serde_json::from_str(json).context("Failed to parse performance profile")?;
        profile.validate()?;
        Ok(profile)
    }

    /// Load and validate a profile from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid profile {}", path.display()))
    }

    pub fn service(&self, kind: ServiceKind) -> &ServiceSpec {
        self.services.get(kind)
    }

    /// Reject event sizes the profile has no calibration for
    pub fn ensure_event_size(&self, event_size: u64) -> PlanResult<()> {
        if self.event_sizes.contains(&event_size) {
            Ok(())
        } else {
            Err(PlanError::invalid_input(format!(
                "event size {} bytes is not supported by profile '{}' (valid values: {:?})",
                event_size, self.name, self.event_sizes
            )))
        }
    }

    /// Scaling trigger bounds `(min, max)` for an event size
    pub fn scaling_bounds(&self, event_size: u64) -> PlanResult<(f64, f64)> {
        let min = self.lookup(&self.segment_scaling_min_events, "segment_scaling_min_events", event_size)?;
        let max = self.lookup(&self.segment_scaling_max_events, "segment_scaling_max_events", event_size)?;
        if min > max {
            return Err(PlanError::configuration(format!(
                "scaling bounds inverted for {} byte events: min {} > max {}",
                event_size, min, max
            )));
        }
        Ok((min, max))
    }

    pub fn log_server_ceiling(&self, event_size: u64) -> PlanResult<f64> {
        self.lookup(&self.log_server_max_events, "log_server_max_events", event_size)
    }

    pub fn latency_curve(&self, event_size: u64) -> PlanResult<&[LatencyPoint]> {
        self.ensure_event_size(event_size)?;
        self.storage_latency_curves
            .get(&event_size)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                PlanError::configuration(format!(
                    "storage_latency_curves has no entry for {} byte events",
                    event_size
                ))
            })
    }

    fn lookup(&self, table: &BTreeMap<u64, f64>, table_name: &str, event_size: u64) -> PlanResult<f64> {
        self.ensure_event_size(event_size)?;
        table.get(&event_size).copied().ok_or_else(|| {
            PlanError::configuration(format!(
                "{} has no entry for {} byte events",
                table_name, event_size
            ))
        })
    }

    /// Check every invariant the sizing calculations rely on
    pub fn validate(&self) -> PlanResult<()> {
        if self.event_sizes.is_empty() {
            return Err(PlanError::configuration("event_sizes is empty"));
        }
        if self.event_sizes.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PlanError::configuration(
                "event_sizes must be strictly ascending",
            ));
        }

        let mut previous_ceiling = f64::INFINITY;
        for &size in &self.event_sizes {
            let (min, _max) = self.scaling_bounds(size)?;
            positive(&format!("segment_scaling_min_events[{}]", size), min)?;

            let ceiling = self.log_server_ceiling(size)?;
            positive(&format!("log_server_max_events[{}]", size), ceiling)?;
            if ceiling > previous_ceiling {
                return Err(PlanError::configuration(format!(
                    "log_server_max_events must not grow with event size ({} bytes: {})",
                    size, ceiling
                )));
            }
            previous_ceiling = ceiling;

            validate_curve(size, self.latency_curve(size)?)?;
        }

        positive(
            "writer_default_metadata_ops_per_second",
            self.writer_default_metadata_ops_per_second,
        )?;
        positive(
            "reader_default_metadata_ops_per_second",
            self.reader_default_metadata_ops_per_second,
        )?;
        positive(
            "transaction_ping_period_in_seconds",
            self.transaction_ping_period_in_seconds,
        )?;
        positive(
            "control_max_streams_per_instance",
            self.control_max_streams_per_instance,
        )?;
        positive(
            "control_max_heavy_ops_per_second",
            self.control_max_heavy_ops_per_second,
        )?;
        positive(
            "control_max_light_ops_per_second",
            self.control_max_light_ops_per_second,
        )?;

        if self.log_replication_factor == 0 {
            return Err(PlanError::configuration("log_replication_factor must be > 0"));
        }
        if self.containers_per_storage_server == 0 {
            return Err(PlanError::configuration(
                "containers_per_storage_server must be > 0",
            ));
        }
        if self.buckets_per_control_server == 0 {
            return Err(PlanError::configuration(
                "buckets_per_control_server must be > 0",
            ));
        }

        for (kind, spec) in self.services.iter() {
            validate_service(kind, spec)?;
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> PlanResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlanError::configuration(format!(
            "{} must be a positive finite number (got {})",
            name, value
        )))
    }
}

fn validate_curve(event_size: u64, curve: &[LatencyPoint]) -> PlanResult<()> {
    if curve.is_empty() {
        return Err(PlanError::configuration(format!(
            "storage latency curve for {} byte events is empty",
            event_size
        )));
    }
    for point in curve {
        positive("latency curve load", point.events_per_second)?;
        positive("latency curve p95", point.p95_latency_ms)?;
    }
    let ordered = curve.windows(2).all(|w| {
        w[0].events_per_second < w[1].events_per_second && w[0].p95_latency_ms <= w[1].p95_latency_ms
    });
    if !ordered {
        return Err(PlanError::configuration(format!(
            "storage latency curve for {} byte events must have increasing load and non-decreasing latency",
            event_size
        )));
    }
    Ok(())
}

fn validate_service(kind: ServiceKind, spec: &ServiceSpec) -> PlanResult<()> {
    if spec.minimum == 0 {
        return Err(PlanError::configuration(format!(
            "{} minimum must be > 0",
            kind
        )));
    }
    match spec.redundancy {
        RedundancyScheme::Quorum if spec.minimum < 3 || spec.minimum % 2 == 0 => {
            return Err(PlanError::configuration(format!(
                "{} is a quorum ensemble and needs an odd minimum >= 3 (got {})",
                kind, spec.minimum
            )));
        }
        RedundancyScheme::Ensemble { size } if size == 0 || spec.minimum < size => {
            return Err(PlanError::configuration(format!(
                "{} minimum {} is below its write ensemble size {}",
                kind, spec.minimum, size
            )));
        }
        _ => {}
    }
    positive(&format!("{} cpu footprint", kind), spec.footprint.cpu_cores)?;
    positive(&format!("{} ram footprint", kind), spec.footprint.ram_gb)?;
    Ok(())
}
