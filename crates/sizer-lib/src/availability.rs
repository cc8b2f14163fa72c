//! Availability-driven sizing
//!
//! Derives the smallest instance count per service that survives `f`
//! concurrent instance failures, and the smallest host count that keeps
//! that guarantee once instances are spread over hosts.

use crate::error::{PlanError, PlanResult};
use crate::models::{Placement, ServiceCounts};
use crate::profile::PerformanceProfile;
use tracing::debug;

/// Sizes services for fault tolerance
pub struct AvailabilityPlanner<'a> {
    profile: &'a PerformanceProfile,
}

impl<'a> AvailabilityPlanner<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Self {
        Self { profile }
    }

    /// Minimum instances per service that survive any `failures` instance failures
    ///
    /// Each service applies its own redundancy scheme, and the result never
    /// drops below the configured service minimum.
    pub fn for_failures(&self, failures: u32) -> ServiceCounts {
        self.profile.services.map(|kind, spec| {
            let required = spec.redundancy.required(failures).max(spec.minimum);
            let count = spec.redundancy.normalize(required);
            debug!(service = %kind, failures, count, "Availability requirement");
            count
        })
    }

    /// Minimum hosts such that losing any `failures` hosts removes no more
    /// instances of a service than that service tolerates
    ///
    /// A host may carry at most `tolerated(n) / failures` instances of a
    /// service. With [`Placement::Shared`] every service spreads over the same
    /// hosts, so the widest service decides; with [`Placement::Dedicated`]
    /// hosts are not shared and the per-service host counts add up.
    ///
    /// # Errors
    /// `InvalidInput` if some count is too small to tolerate `failures`.
    pub fn min_vms_for_availability(
        &self,
        counts: &ServiceCounts,
        failures: u32,
        placement: Placement,
    ) -> PlanResult<u32> {
        if failures == 0 {
            return Ok(0);
        }

        let mut per_service = Vec::with_capacity(4);
        for (kind, &instances) in counts.iter() {
            if instances == 0 {
                continue;
            }
            let tolerated = self.profile.service(kind).redundancy.tolerated(instances);
            let per_host = tolerated / failures;
            if per_host == 0 {
                return Err(PlanError::invalid_input(format!(
                    "{} {} instances cannot tolerate {} failures",
                    instances, kind, failures
                )));
            }
            per_service.push(instances.div_ceil(per_host));
        }

        let vms = match placement {
            Placement::Shared => per_service.into_iter().max().unwrap_or(0),
            Placement::Dedicated => per_service.into_iter().sum(),
        };
        Ok(vms)
    }
}
