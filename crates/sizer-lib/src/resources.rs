//! Host resource resolution

use crate::error::{PlanError, PlanResult};
use crate::models::{ceil_count, ResourceDemand, ServiceCounts, VmFlavor};
use crate::profile::PerformanceProfile;

/// Converts instance counts into CPU/RAM demand and hosts
pub struct ResourceResolver<'a> {
    profile: &'a PerformanceProfile,
}

impl<'a> ResourceResolver<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Self {
        Self { profile }
    }

    /// Total CPU cores and RAM requested by all instances
    pub fn requested_resources(&self, counts: &ServiceCounts) -> ResourceDemand {
        counts
            .iter()
            .fold(ResourceDemand::default(), |mut demand, (kind, &count)| {
                let footprint = self.profile.service(kind).footprint;
                demand.cpu_cores += footprint.cpu_cores * count as f64;
                demand.ram_gb += footprint.ram_gb * count as f64;
                demand
            })
    }
}

/// Fewest hosts of `vm_flavor` whose combined CPU and RAM cover `demand`
///
/// Assumes perfect packing in both dimensions, so this is a lower bound.
pub fn min_vms_for_resources(vm_flavor: &VmFlavor, demand: &ResourceDemand) -> PlanResult<u32> {
    if vm_flavor.cpu_cores == 0 || vm_flavor.ram_gb == 0 {
        return Err(PlanError::invalid_input(format!(
            "VM flavor must have CPU and RAM (got {} cores, {} GB)",
            vm_flavor.cpu_cores, vm_flavor.ram_gb
        )));
    }
    let by_cpu = demand.cpu_cores / vm_flavor.cpu_cores as f64;
    let by_ram = demand.ram_gb / vm_flavor.ram_gb as f64;
    ceil_count(by_cpu.max(by_ram), "VM")
}
