//! Capacity-planning model for streaming platform clusters
//!
//! This crate provides the core functionality for:
//! - Sizing coordination, log, storage and control services for fault tolerance
//! - Right-sizing the data plane from write throughput and latency targets
//! - Right-sizing the control plane from stream and client workloads
//! - Resolving host resources and suggesting stream scaling triggers
//! - Health checks and observability for the sizing service

pub mod availability;
pub mod control_plane;
pub mod data_plane;
pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod orchestrator;
pub mod profile;
pub mod resources;
pub mod scaling;
pub mod topology;


pub use error::{PlanError, PlanResult};
pub use health::{ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse};
pub use models::*;
pub use observability::{PlannerMetrics, PlanningLogger};
pub use orchestrator::{Planner, ProvisioningPlan};
pub use profile::{PerformanceProfile, RedundancyScheme};
pub use scaling::{ScalingTrigger, TriggerBound};
pub use control_plane::ControlPlaneLoad;
