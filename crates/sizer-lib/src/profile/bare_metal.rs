//! Calibration for clusters on dedicated hardware
//!
//! Values come from benchmark runs on bare-metal nodes with local NVMe
//! journals. Other environments should ship their own profile file.

use super::{
    LatencyPoint, PerformanceProfile, RedundancyScheme, ServiceFootprint, ServiceSpec,
};
use crate::models::ServiceTable;
use std::collections::BTreeMap;

const EVENT_SIZES: [u64; 6] = [10, 100, 1_000, 10_000, 100_000, 1_000_000];

/// (event size, min trigger, max trigger) in events/s per segment
const SEGMENT_SCALING_BOUNDS: [(u64, f64, f64); 6] = [
    (10, 2_000.0, 100_000.0),
    (100, 1_000.0, 50_000.0),
    (1_000, 500.0, 10_000.0),
    (10_000, 100.0, 1_000.0),
    (100_000, 10.0, 100.0),
    (1_000_000, 1.0, 10.0),
];

/// Events/s a single log server absorbs before its journal queue grows
const LOG_SERVER_MAX_EVENTS: [(u64, f64); 6] = [
    (10, 400_000.0),
    (100, 250_000.0),
    (1_000, 80_000.0),
    (10_000, 9_000.0),
    (100_000, 1_000.0),
    (1_000_000, 100.0),
];

fn latency_curve(event_size: u64) -> Vec<LatencyPoint> {
    let points: &[(f64, f64)] = match event_size {
        10 => &[(1_000.0, 5.0), (50_000.0, 10.0), (150_000.0, 25.0), (300_000.0, 80.0)],
        100 => &[(1_000.0, 5.0), (40_000.0, 10.0), (120_000.0, 25.0), (250_000.0, 80.0)],
        1_000 => &[(500.0, 6.0), (15_000.0, 12.0), (40_000.0, 30.0), (80_000.0, 90.0)],
        10_000 => &[(100.0, 8.0), (2_000.0, 15.0), (5_000.0, 35.0), (9_000.0, 100.0)],
        100_000 => &[(10.0, 10.0), (200.0, 20.0), (500.0, 45.0), (1_000.0, 120.0)],
        _ => &[(1.0, 15.0), (20.0, 30.0), (50.0, 60.0), (100.0, 150.0)],
    };
    points
        .iter()
        .map(|&(load, p95)| LatencyPoint::new(load, p95))
        .collect()
}

pub(super) fn profile() -> PerformanceProfile {
    PerformanceProfile {
        name: "bare-metal".to_string(),
        event_sizes: EVENT_SIZES.to_vec(),
        segment_scaling_min_events: SEGMENT_SCALING_BOUNDS
            .iter()
            .map(|&(size, min, _)| (size, min))
            .collect(),
        segment_scaling_max_events: SEGMENT_SCALING_BOUNDS
            .iter()
            .map(|&(size, _, max)| (size, max))
            .collect(),
        writer_default_metadata_ops_per_second: 0.5,
        reader_default_metadata_ops_per_second: 1.0,
        transaction_ping_period_in_seconds: 30.0,
        log_server_max_events: LOG_SERVER_MAX_EVENTS.into_iter().collect(),
        log_replication_factor: 3,
        storage_latency_curves: EVENT_SIZES
            .iter()
            .map(|&size| (size, latency_curve(size)))
            .collect::<BTreeMap<_, _>>(),
        control_max_streams_per_instance: 10_000.0,
        control_max_heavy_ops_per_second: 50.0,
        control_max_light_ops_per_second: 2_000.0,
        services: ServiceTable {
            coordination: ServiceSpec {
                minimum: 3,
                redundancy: RedundancyScheme::Quorum,
                footprint: ServiceFootprint { cpu_cores: 1.0, ram_gb: 2.0 },
            },
            log: ServiceSpec {
                minimum: 3,
                redundancy: RedundancyScheme::Ensemble { size: 3 },
                footprint: ServiceFootprint { cpu_cores: 2.0, ram_gb: 8.0 },
            },
            storage: ServiceSpec {
                minimum: 1,
                redundancy: RedundancyScheme::Standby,
                footprint: ServiceFootprint { cpu_cores: 4.0, ram_gb: 16.0 },
            },
            control: ServiceSpec {
                minimum: 1,
                redundancy: RedundancyScheme::Standby,
                footprint: ServiceFootprint { cpu_cores: 1.0, ram_gb: 4.0 },
            },
        },
        containers_per_storage_server: 8,
        buckets_per_control_server: 4,
    }
}
