//! Cluster topology accumulator
//!
//! Owned by a single planning run. Counts only ever move up: each pass
//! proposes a value and the topology keeps the larger of the two.

use crate::models::{ServiceCounts, ServiceKind};
use crate::profile::PerformanceProfile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTopology {
    counts: ServiceCounts,
    vm_count: u32,
}

impl ClusterTopology {
    /// Start from the configured service minimums and no hosts
    pub fn from_minimums(profile: &PerformanceProfile) -> Self {
        Self {
            counts: profile.services.map(|_, spec| spec.minimum),
            vm_count: 0,
        }
    }

    pub fn counts(&self) -> &ServiceCounts {
        &self.counts
    }

    pub fn count(&self, kind: ServiceKind) -> u32 {
        *self.counts.get(kind)
    }

    pub fn vm_count(&self) -> u32 {
        self.vm_count
    }

    /// Raise one service count; returns true if it changed
    pub fn raise(&mut self, kind: ServiceKind, proposed: u32) -> bool {
        let current = self.counts.get_mut(kind);
        if proposed > *current {
            *current = proposed;
            true
        } else {
            false
        }
    }

    /// Raise every count to at least the proposed one
    pub fn raise_all(&mut self, proposed: &ServiceCounts) {
        self.counts = self.counts.max(proposed);
    }

    pub fn raise_vms(&mut self, proposed: u32) {
        self.vm_count = self.vm_count.max(proposed);
    }

    pub fn container_count(&self, profile: &PerformanceProfile) -> u32 {
        profile
            .containers_per_storage_server
            .saturating_mul(self.counts.storage)
    }

    pub fn bucket_count(&self, profile: &PerformanceProfile) -> u32 {
        profile
            .buckets_per_control_server
            .saturating_mul(self.counts.control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_minimums() {
        let profile = PerformanceProfile::bare_metal();
        let topology = ClusterTopology::from_minimums(&profile);
        for (kind, spec) in profile.services.iter() {
            assert_eq!(topology.count(kind), spec.minimum);
        }
        assert_eq!(topology.vm_count(), 0);
    }

    #[test]
    fn test_counts_never_decrease() {
        let profile = PerformanceProfile::bare_metal();
        let mut topology = ClusterTopology::from_minimums(&profile);

        assert!(topology.raise(ServiceKind::Log, 7));
        assert!(!topology.raise(ServiceKind::Log, 4));
        assert_eq!(topology.count(ServiceKind::Log), 7);

        topology.raise_vms(6);
        topology.raise_vms(2);
        assert_eq!(topology.vm_count(), 6);

        let lower = ServiceCounts { coordination: 1, log: 1, storage: 1, control: 1 };
        let before = *topology.counts();
        topology.raise_all(&lower);
        assert_eq!(topology.counts(), &before);
    }

    #[test]
    fn test_derived_parallelism() {
        let profile = PerformanceProfile::bare_metal();
        let mut topology = ClusterTopology::from_minimums(&profile);
        topology.raise(ServiceKind::Storage, 3);
        topology.raise(ServiceKind::Control, 2);
        assert_eq!(
            topology.container_count(&profile),
            3 * profile.containers_per_storage_server
        );
        assert_eq!(
            topology.bucket_count(&profile),
            2 * profile.buckets_per_control_server
        );
    }
}
