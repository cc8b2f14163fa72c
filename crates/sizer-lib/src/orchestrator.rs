//! Provisioning orchestration
//!
//! Runs the sizing passes in a fixed order over one [`ClusterTopology`]:
//!
//! 1. availability (when failures to tolerate are given)
//! 2. data plane (when a write workload is given)
//! 3. control plane (when a stream/client workload is given)
//! 4. host resources
//! 5. container and bucket counts
//! 6. scaling trigger (when both workloads are given)
//!
//! Each pass can only raise counts. Any error aborts the run.

use crate::availability::AvailabilityPlanner;
use crate::control_plane::{ControlPlaneLoad, ControlPlaneSizer};
use crate::data_plane::DataPlaneSizer;
use crate::error::PlanResult;
use crate::models::{PlanRequest, ResourceDemand, ServiceCounts, ServiceKind};
use crate::observability::PlanningLogger;
use crate::profile::PerformanceProfile;
use crate::resources::{min_vms_for_resources, ResourceResolver};
use crate::scaling::{ScalingPolicyAdvisor, ScalingTrigger};
use crate::topology::ClusterTopology;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Result of one planning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningPlan {
    /// Name of the profile the plan was computed with
    pub profile: String,
    pub counts: ServiceCounts,
    pub vm_count: u32,
    /// Hosts needed to keep the failure guarantee
    pub availability_vm_count: u32,
    /// Hosts needed to fit the requested CPU and RAM
    pub resource_vm_count: u32,
    pub requested: ResourceDemand,
    pub container_count: u32,
    pub bucket_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_load: Option<ControlPlaneLoad>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling_trigger: Option<ScalingTrigger>,
}

/// Computes provisioning plans against one performance profile
///
/// Holds no per-run state, so a single planner can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct Planner {
    profile: Arc<PerformanceProfile>,
    logger: PlanningLogger,
}

impl Planner {
    /// Create a planner, rejecting profiles that violate their invariants
    pub fn new(profile: PerformanceProfile) -> PlanResult<Self> {
        Self::from_shared(Arc::new(profile))
    }

    pub fn from_shared(profile: Arc<PerformanceProfile>) -> PlanResult<Self> {
        profile.validate()?;
        Ok(Self {
            profile,
            logger: PlanningLogger::new("local"),
        })
    }

    pub fn with_logger(mut self, logger: PlanningLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn profile(&self) -> &PerformanceProfile {
        &self.profile
    }

    /// Compute a provisioning plan
    pub fn plan(&self, request: &PlanRequest) -> PlanResult<ProvisioningPlan> {
        match self.run(request) {
            Ok(plan) => {
                self.logger.log_plan_completed(&plan);
                Ok(plan)
            }
            Err(e) => {
                self.logger.log_plan_rejected(&self.profile.name, &e);
                Err(e)
            }
        }
    }

    fn run(&self, request: &PlanRequest) -> PlanResult<ProvisioningPlan> {
        let profile = self.profile.as_ref();
        let mut topology = ClusterTopology::from_minimums(profile);

        let mut availability_vm_count = 0;
        if let Some(failures) = request.failures_to_tolerate {
            let availability = AvailabilityPlanner::new(profile);
            topology.raise_all(&availability.for_failures(failures));
            availability_vm_count =
                availability.min_vms_for_availability(topology.counts(), failures, request.placement)?;
            topology.raise_vms(availability_vm_count);
            debug!(failures, vms = availability_vm_count, "Availability pass done");
        }

        if let Some(data) = request.workload.data_plane {
            let sizer = DataPlaneSizer::new(profile);
            let log_servers = sizer.log_servers_for_workload(data.events_per_second, data.event_size)?;
            let storage_servers = sizer.storage_servers_for_latency(
                data.events_per_second,
                data.event_size,
                data.target_p95_latency_ms,
            )?;
            topology.raise(ServiceKind::Log, log_servers);
            topology.raise(ServiceKind::Storage, storage_servers);
            debug!(log_servers, storage_servers, "Data-plane pass done");
        }

        let mut control_plane_load = None;
        if let Some(control) = request.workload.control_plane {
            let (load, control_servers) = ControlPlaneSizer::new(profile).size(&control)?;
            topology.raise(ServiceKind::Control, control_servers);
            control_plane_load = Some(load);
            debug!(
                heavy_ops_per_second = load.heavy_ops_per_second(),
                metadata_ops_per_second = load.metadata_ops_per_second(),
                control_servers,
                "Control-plane pass done"
            );
        }

        let requested = ResourceResolver::new(profile).requested_resources(topology.counts());
        let resource_vm_count = min_vms_for_resources(&request.vm_flavor, &requested)?;
        topology.raise_vms(resource_vm_count);

        let container_count = topology.container_count(profile);
        let bucket_count = topology.bucket_count(profile);

        let scaling_trigger = match (request.workload.data_plane, request.workload.control_plane) {
            (Some(data), Some(control)) if data.events_per_second > 0 => {
                Some(ScalingPolicyAdvisor::new(profile).suggest_trigger(
                    data.events_per_second,
                    control.streams,
                    container_count,
                    data.event_size,
                )?)
            }
            _ => None,
        };

        Ok(ProvisioningPlan {
            profile: profile.name.clone(),
            counts: *topology.counts(),
            vm_count: topology.vm_count(),
            availability_vm_count,
            resource_vm_count,
            requested,
            container_count,
            bucket_count,
            control_plane_load,
            scaling_trigger,
        })
    }
}
