//! Core data models for the sizing model

use crate::error::{PlanError, PlanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service types that make up a streaming cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// Quorum ensemble holding cluster coordination state
    Coordination,
    /// Durable append-only write-ahead log servers
    Log,
    /// Segment storage servers serving reads and writes
    Storage,
    /// Control-plane servers handling stream metadata
    Control,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Coordination,
        ServiceKind::Log,
        ServiceKind::Storage,
        ServiceKind::Control,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Coordination => "coordination",
            ServiceKind::Log => "log",
            ServiceKind::Storage => "storage",
            ServiceKind::Control => "control",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per service type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceTable<T> {
    pub coordination: T,
    pub log: T,
    pub storage: T,
    pub control: T,
}

impl<T> ServiceTable<T> {
    pub fn get(&self, kind: ServiceKind) -> &T {
        match kind {
            ServiceKind::Coordination => &self.coordination,
            ServiceKind::Log => &self.log,
            ServiceKind::Storage => &self.storage,
            ServiceKind::Control => &self.control,
        }
    }

    pub fn get_mut(&mut self, kind: ServiceKind) -> &mut T {
        match kind {
            ServiceKind::Coordination => &mut self.coordination,
            ServiceKind::Log => &mut self.log,
            ServiceKind::Storage => &mut self.storage,
            ServiceKind::Control => &mut self.control,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceKind, &T)> {
        ServiceKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(ServiceKind, &T) -> U) -> ServiceTable<U> {
        ServiceTable {
            coordination: f(ServiceKind::Coordination, &self.coordination),
            log: f(ServiceKind::Log, &self.log),
            storage: f(ServiceKind::Storage, &self.storage),
            control: f(ServiceKind::Control, &self.control),
        }
    }
}

/// Instance count per service type
pub type ServiceCounts = ServiceTable<u32>;

impl ServiceCounts {
    /// Componentwise maximum of two count sets
    pub fn max(&self, other: &ServiceCounts) -> ServiceCounts {
        self.map(|kind, count| (*count).max(*other.get(kind)))
    }

    /// True if every count is at least the matching count in `other`
    pub fn dominates(&self, other: &ServiceCounts) -> bool {
        self.iter().all(|(kind, count)| *count >= *other.get(kind))
    }

    pub fn total(&self) -> u64 {
        self.iter().map(|(_, count)| *count as u64).sum()
    }
}

/// Resources of one homogeneous host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmFlavor {
    pub cpu_cores: u32,
    pub ram_gb: u32,
}

impl VmFlavor {
    pub fn new(cpu_cores: u32, ram_gb: u32) -> Self {
        Self { cpu_cores, ram_gb }
    }
}

/// Aggregate CPU and RAM requested by a set of service instances
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceDemand {
    pub cpu_cores: f64,
    pub ram_gb: f64,
}

/// How instances of different service types may share hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Any host may run instances of several service types
    #[default]
    Shared,
    /// Every host runs instances of a single service type
    Dedicated,
}

/// Write workload driving the data-plane pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPlaneWorkload {
    /// Write throughput across the cluster (events/s)
    pub events_per_second: u64,
    /// Typical event size in bytes; must be one of the profile's sizes
    pub event_size: u64,
    /// Target 95th percentile write latency (ms)
    pub target_p95_latency_ms: u64,
}

/// Clients issuing metadata operations besides readers and writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraMetadataClients {
    pub clients: u64,
    /// Extra metadata operations per hour, per client
    pub ops_per_hour: u64,
}

/// Stream and client population driving the control-plane pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControlPlaneWorkload {
    pub streams: u64,
    /// Retention period in hours; `None` when streams have no retention policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_hours: Option<u64>,
    /// Scale events per stream per hour; `None` when scaling is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scales_per_hour: Option<u64>,
    #[serde(default)]
    pub writers: u64,
    #[serde(default)]
    pub readers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_metadata: Option<ExtraMetadataClients>,
    /// Transactions per hour, per writer; `None` when writers do not use transactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions_per_hour: Option<u64>,
}

/// Workload dimensions the caller characterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkloadCharacterization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_plane: Option<DataPlaneWorkload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane: Option<ControlPlaneWorkload>,
}

/// Fully populated input of one planning run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub vm_flavor: VmFlavor,
    /// Concurrent instance/host failures to tolerate; `None` skips the availability pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures_to_tolerate: Option<u32>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub workload: WorkloadCharacterization,
}

impl PlanRequest {
    pub fn new(vm_flavor: VmFlavor) -> Self {
        Self {
            vm_flavor,
            failures_to_tolerate: None,
            placement: Placement::default(),
            workload: WorkloadCharacterization::default(),
        }
    }

    pub fn with_failures(mut self, failures: u32) -> Self {
        self.failures_to_tolerate = Some(failures);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_data_plane(mut self, workload: DataPlaneWorkload) -> Self {
        self.workload.data_plane = Some(workload);
        self
    }

    pub fn with_control_plane(mut self, workload: ControlPlaneWorkload) -> Self {
        self.workload.control_plane = Some(workload);
        self
    }
}

/// Round a fractional instance requirement up to a whole count
pub(crate) fn ceil_count(value: f64, what: &str) -> PlanResult<u32> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlanError::invalid_input(format!(
            "{} requirement is not a finite non-negative number ({})",
            what, value
        )));
    }
    let rounded = value.ceil();
    if rounded > u32::MAX as f64 {
        return Err(PlanError::invalid_input(format!(
            "{} requirement {} exceeds the plannable range",
            what, rounded
        )));
    }
    Ok(rounded as u32)
}
