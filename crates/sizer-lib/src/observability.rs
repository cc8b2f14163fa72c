//! Observability infrastructure for the sizer
//!
//! Provides:
//! - Prometheus metrics (planning latency, completed and rejected runs, last plan size)
//! - Structured logging of planning events with tracing

use crate::error::PlanError;
use crate::orchestrator::ProvisioningPlan;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for planning latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PlannerMetricsInner> = OnceLock::new();

struct PlannerMetricsInner {
    planning_latency_seconds: Histogram,
    plans_completed: IntCounter,
    plans_rejected: IntCounterVec,
    last_vm_count: IntGauge,
    last_instance_count: IntGauge,
}

impl PlannerMetricsInner {
    fn new() -> Self {
        Self {
            planning_latency_seconds: register_histogram!(
                "sizer_planning_latency_seconds",
                "Time spent computing a provisioning plan",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register planning_latency_seconds"),

            plans_completed: register_int_counter!(
                "sizer_plans_completed_total",
                "Total number of provisioning plans computed"
            )
            .expect("Failed to register plans_completed"),

            plans_rejected: register_int_counter_vec!(
                "sizer_plans_rejected_total",
                "Total number of planning runs aborted, by error kind",
                &["kind"]
            )
            .expect("Failed to register plans_rejected"),

            last_vm_count: register_int_gauge!(
                "sizer_last_plan_vm_count",
                "VM count of the most recent provisioning plan"
            )
            .expect("Failed to register last_vm_count"),

            last_instance_count: register_int_gauge!(
                "sizer_last_plan_instance_count",
                "Service instances in the most recent provisioning plan"
            )
            .expect("Failed to register last_instance_count"),
        }
    }
}

/// Planner metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share it.
#[derive(Clone)]
pub struct PlannerMetrics {
    _private: (),
}

impl Default for PlannerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PlannerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PlannerMetricsInner {
        GLOBAL_METRICS.get_or_init(PlannerMetricsInner::new)
    }

    pub fn observe_planning_latency(&self, duration_secs: f64) {
        self.inner().planning_latency_seconds.observe(duration_secs);
    }

    /// Record a completed plan
    pub fn record_plan(&self, plan: &ProvisioningPlan) {
        let inner = self.inner();
        inner.plans_completed.inc();
        inner.last_vm_count.set(plan.vm_count as i64);
        inner.last_instance_count.set(plan.counts.total() as i64);
    }

    /// Record an aborted planning run
    pub fn record_rejection(&self, error: &PlanError) {
        self.inner()
            .plans_rejected
            .with_label_values(&[error.kind()])
            .inc();
    }
}

/// Structured logger for planning events
#[derive(Debug, Clone)]
pub struct PlanningLogger {
    instance: String,
}

impl PlanningLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_plan_completed(&self, plan: &ProvisioningPlan) {
        info!(
            event = "plan_completed",
            instance = %self.instance,
            profile = %plan.profile,
            vm_count = plan.vm_count,
            coordination_servers = plan.counts.coordination,
            log_servers = plan.counts.log,
            storage_servers = plan.counts.storage,
            control_servers = plan.counts.control,
            requested_cpu_cores = plan.requested.cpu_cores,
            requested_ram_gb = plan.requested.ram_gb,
            container_count = plan.container_count,
            bucket_count = plan.bucket_count,
            scaling_trigger = ?plan.scaling_trigger.map(|t| t.events_per_second),
            "Provisioning plan computed"
        );
    }

    pub fn log_plan_rejected(&self, profile: &str, error: &PlanError) {
        warn!(
            event = "plan_rejected",
            instance = %self.instance,
            profile = %profile,
            kind = error.kind(),
            error = %error,
            "Provisioning plan rejected"
        );
    }

    pub fn log_profile_loaded(&self, profile: &str, source: &str, event_sizes: usize) {
        info!(
            event = "profile_loaded",
            instance = %self.instance,
            profile = %profile,
            source = %source,
            event_sizes = event_sizes,
            "Performance profile loaded"
        );
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            instance = %self.instance,
            version = %version,
            "Sizing service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Sizing service shutting down"
        );
    }
}
