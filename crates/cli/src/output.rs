//! Output formatting utilities

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use sizer_lib::{PerformanceProfile, ProvisioningPlan, RedundancyScheme, ServiceKind, TriggerBound};
use std::str::FromStr;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format '{}' (expected table or json)", s))
    }
}

/// Row for the per-service count table
#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Instances")]
    instances: u32,
    #[tabled(rename = "CPU")]
    cpu_cores: String,
    #[tabled(rename = "RAM")]
    ram_gb: String,
}

/// Row for the control-plane load table
#[derive(Tabled)]
struct LoadRow {
    #[tabled(rename = "Operation")]
    operation: &'static str,
    #[tabled(rename = "Ops/s")]
    rate: String,
}

/// Row for the profile service table
#[derive(Tabled)]
struct ProfileServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Minimum")]
    minimum: u32,
    #[tabled(rename = "Redundancy")]
    redundancy: String,
    #[tabled(rename = "CPU")]
    cpu_cores: String,
    #[tabled(rename = "RAM")]
    ram_gb: String,
}

/// Row for the per-event-size calibration table
#[derive(Tabled)]
struct EventSizeRow {
    #[tabled(rename = "Event size")]
    event_size: String,
    #[tabled(rename = "Log server max ev/s")]
    log_server_max: String,
    #[tabled(rename = "Scaling min ev/s")]
    scaling_min: String,
    #[tabled(rename = "Scaling max ev/s")]
    scaling_max: String,
    #[tabled(rename = "Latency curve points")]
    curve_points: usize,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a provisioning plan
pub fn print_plan(plan: &ProvisioningPlan, profile: &PerformanceProfile, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(plan);
    }

    println!("{}", "Cluster Provisioning".bold());
    println!("{}", "=".repeat(50));
    println!("Profile:                {}", plan.profile.cyan());
    println!(
        "Generated:              {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("VMs required:           {}", plan.vm_count.to_string().green().bold());
    println!("  for availability:     {}", plan.availability_vm_count);
    println!("  for resources:        {}", plan.resource_vm_count);
    println!(
        "Requested resources:    {} cores, {} GB RAM",
        format_amount(plan.requested.cpu_cores),
        format_amount(plan.requested.ram_gb)
    );
    println!();

    let rows: Vec<ServiceRow> = plan
        .counts
        .iter()
        .map(|(kind, &instances)| {
            let footprint = profile.service(kind).footprint;
            ServiceRow {
                service: kind.to_string(),
                instances,
                cpu_cores: format_amount(footprint.cpu_cores * instances as f64),
                ram_gb: format!("{} GB", format_amount(footprint.ram_gb * instances as f64)),
            }
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    println!();

    println!("{}", "Cluster Config Params".bold());
    println!("{}", "=".repeat(50));
    println!("Segment containers:     {}", plan.container_count);
    println!("Stream buckets:         {}", plan.bucket_count);

    if let Some(load) = &plan.control_plane_load {
        println!();
        println!("{}", "Control Plane Load".bold());
        let rows = vec![
            LoadRow { operation: "Truncations", rate: format_rate(load.truncations_per_second) },
            LoadRow { operation: "Scale events", rate: format_rate(load.scales_per_second) },
            LoadRow { operation: "Transactions", rate: format_rate(load.transaction_ops_per_second) },
            LoadRow { operation: "Client metadata", rate: format_rate(load.client_metadata_ops_per_second) },
            LoadRow { operation: "Extra metadata", rate: format_rate(load.extra_metadata_ops_per_second) },
            LoadRow { operation: "Transaction keep-alives", rate: format_rate(load.keepalive_ops_per_second) },
        ];
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!(
            "Heavy: {} ops/s, light: {} ops/s",
            format_rate(load.heavy_ops_per_second()),
            format_rate(load.metadata_ops_per_second())
        );
    }

    if let Some(trigger) = &plan.scaling_trigger {
        println!();
        println!("{}", "Stream Scaling Policy".bold());
        println!("{}", "=".repeat(50));
        println!(
            "Suggested trigger:      {} events/s",
            (trigger.events_per_second as u64).to_string().green().bold()
        );
        println!("Fair share:             {} events/s", format_rate(trigger.fair_share_events_per_second));
        match trigger.bound {
            Some(TriggerBound::Floor) => print_warning("Fair share is below the profile minimum; raised to the floor"),
            Some(TriggerBound::Ceiling) => print_warning("Fair share is above the profile maximum; lowered to the ceiling"),
            None => {}
        }
    }

    Ok(())
}

/// Print a performance profile
pub fn print_profile(profile: &PerformanceProfile, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(profile);
    }

    println!("{}", "Performance Profile".bold());
    println!("{}", "=".repeat(50));
    println!("Name:                   {}", profile.name.cyan());
    println!("Log replication:        {}", profile.log_replication_factor);
    println!("Containers per storage: {}", profile.containers_per_storage_server);
    println!("Buckets per control:    {}", profile.buckets_per_control_server);
    println!(
        "Control capacity:       {} streams, {} heavy ops/s, {} light ops/s",
        format_amount(profile.control_max_streams_per_instance),
        format_amount(profile.control_max_heavy_ops_per_second),
        format_amount(profile.control_max_light_ops_per_second)
    );
    println!();

    let services: Vec<ProfileServiceRow> = ServiceKind::ALL
        .iter()
        .map(|&kind| {
            let spec = profile.service(kind);
            ProfileServiceRow {
                service: kind.to_string(),
                minimum: spec.minimum,
                redundancy: format_redundancy(&spec.redundancy),
                cpu_cores: format_amount(spec.footprint.cpu_cores),
                ram_gb: format!("{} GB", format_amount(spec.footprint.ram_gb)),
            }
        })
        .collect();
    println!("{}", Table::new(services).with(Style::rounded()));

    let sizes: Vec<EventSizeRow> = profile
        .event_sizes
        .iter()
        .map(|size| EventSizeRow {
            event_size: format_event_size(*size),
            log_server_max: lookup(profile.log_server_max_events.get(size)),
            scaling_min: lookup(profile.segment_scaling_min_events.get(size)),
            scaling_max: lookup(profile.segment_scaling_max_events.get(size)),
            curve_points: profile.storage_latency_curves.get(size).map_or(0, Vec::len),
        })
        .collect();
    println!("{}", Table::new(sizes).with(Style::rounded()));

    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn lookup(value: Option<&f64>) -> String {
    value.map_or_else(|| "-".red().to_string(), |v| format_amount(*v))
}

fn format_redundancy(scheme: &RedundancyScheme) -> String {
    match scheme {
        RedundancyScheme::Quorum => "quorum (2f+1)".to_string(),
        RedundancyScheme::Ensemble { size } => format!("ensemble ({}+f)", size),
        RedundancyScheme::Standby => "standby (f+1)".to_string(),
    }
}

/// Format a whole or fractional amount without trailing zeros
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format an operation rate
pub fn format_rate(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value < 0.01 {
        format!("{:.4}", value)
    } else {
        format_amount(value)
    }
}

/// Format an event size in bytes as a human-readable string
pub fn format_event_size(bytes: u64) -> String {
    const KB: u64 = 1000;
    const MB: u64 = KB * 1000;

    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= KB && bytes % KB == 0 {
        format!("{}KB", bytes / KB)
    } else {
        format!("{}B", bytes)
    }
}
