//! Stream scaling policy advice
//!
//! Proposes a per-segment scaling trigger that spreads one stream's write
//! load over every segment container in the cluster, kept within the
//! profile's bounds for the event size: below the floor, splits and merges
//! cost more metadata work than they gain in balance; above the ceiling, a
//! single segment can saturate its storage server before it scales.

use crate::error::{PlanError, PlanResult};
use crate::profile::PerformanceProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which profile bound, if any, decided the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerBound {
    Floor,
    Ceiling,
}

/// Suggested scaling trigger for streams in the planned cluster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingTrigger {
    /// Per-stream, per-container share of the write load (events/s)
    pub fair_share_events_per_second: f64,
    /// Trigger rate after clamping to the profile bounds (events/s)
    pub events_per_second: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<TriggerBound>,
}

pub struct ScalingPolicyAdvisor<'a> {
    profile: &'a PerformanceProfile,
}

impl<'a> ScalingPolicyAdvisor<'a> {
    pub fn new(profile: &'a PerformanceProfile) -> Self {
        Self { profile }
    }

    /// Suggest a trigger rate for `streams` streams sharing `total_events_per_second`
    ///
    /// The fair share `(total / streams) / containers` is capped at the
    /// ceiling first and then raised to the floor, so the floor wins.
    ///
    /// # Errors
    /// `InvalidInput` for zero streams, zero containers or an unknown event
    /// size; `Configuration` if the profile bounds are inverted.
    pub fn suggest_trigger(
        &self,
        total_events_per_second: u64,
        streams: u64,
        containers: u32,
        event_size: u64,
    ) -> PlanResult<ScalingTrigger> {
        if streams == 0 {
            return Err(PlanError::invalid_input(
                "a scaling suggestion needs at least one stream",
            ));
        }
        if containers == 0 {
            return Err(PlanError::invalid_input(
                "a scaling suggestion needs at least one segment container",
            ));
        }
        let (floor, ceiling) = self.profile.scaling_bounds(event_size)?;

        let fair_share = (total_events_per_second as f64 / streams as f64) / containers as f64;
        let events_per_second = fair_share.min(ceiling).max(floor);
        let bound = if fair_share < floor {
            Some(TriggerBound::Floor)
        } else if fair_share > ceiling {
            Some(TriggerBound::Ceiling)
        } else {
            None
        };

        debug!(
            fair_share,
            floor,
            ceiling,
            events_per_second,
            "Scaling trigger suggestion"
        );
        Ok(ScalingTrigger {
            fair_share_events_per_second: fair_share,
            events_per_second,
            bound,
        })
    }
}
