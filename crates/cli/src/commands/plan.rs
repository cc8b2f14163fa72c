//! Planning command: build a request from flags and print the plan

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use sizer_lib::{
    ControlPlaneWorkload, DataPlaneWorkload, ExtraMetadataClients, Placement, PlanRequest, Planner,
    VmFlavor,
};
use tracing::debug;

use crate::client::ApiClient;
use crate::config::Settings;
use crate::output::{print_json, print_plan, OutputFormat};

/// Host sharing policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PlacementArg {
    /// Hosts may run several service types
    #[default]
    Shared,
    /// Each host runs a single service type
    Dedicated,
}

impl From<PlacementArg> for Placement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::Shared => Placement::Shared,
            PlacementArg::Dedicated => Placement::Dedicated,
        }
    }
}

/// Flags of `ssz plan`; each optional group enables its sizing pass
#[derive(Debug, Clone, Default, Args)]
pub struct PlanArgs {
    /// CPU cores of each VM
    #[arg(long)]
    pub vm_cpus: u32,

    /// RAM in GB of each VM
    #[arg(long)]
    pub vm_ram_gb: u32,

    /// Concurrent instance/VM failures the cluster must tolerate
    #[arg(long)]
    pub failures: Option<u32>,

    /// Whether service types may share VMs
    #[arg(long, value_enum, default_value_t = PlacementArg::Shared)]
    pub placement: PlacementArg,

    /// Write throughput across the cluster (events/s)
    #[arg(long, requires_all = ["event_size", "latency_ms"])]
    pub events_per_second: Option<u64>,

    /// Typical event size in bytes
    #[arg(long, requires = "events_per_second")]
    pub event_size: Option<u64>,

    /// Target 95th percentile write latency in milliseconds
    #[arg(long, requires = "events_per_second")]
    pub latency_ms: Option<u64>,

    /// Number of streams stored in the cluster
    #[arg(long)]
    pub streams: Option<u64>,

    /// Stream retention period in hours
    #[arg(long, requires = "streams")]
    pub retention_hours: Option<u64>,

    /// Scale events per stream per hour
    #[arg(long, requires = "streams")]
    pub scales_per_hour: Option<u64>,

    /// Number of writers
    #[arg(long, requires = "streams")]
    pub writers: Option<u64>,

    /// Number of readers
    #[arg(long, requires = "streams")]
    pub readers: Option<u64>,

    /// Clients issuing other metadata operations
    #[arg(long, requires_all = ["streams", "extra_ops_per_hour"])]
    pub extra_clients: Option<u64>,

    /// Extra metadata operations per client per hour
    #[arg(long, requires = "extra_clients")]
    pub extra_ops_per_hour: Option<u64>,

    /// Transactions per writer per hour
    #[arg(long, requires = "streams")]
    pub transactions_per_hour: Option<u64>,

    /// Send the request to the sizing service instead of planning locally
    #[arg(long)]
    pub remote: bool,
}

impl PlanArgs {
    /// Build the planning request the flags describe
    pub fn to_request(&self) -> Result<PlanRequest> {
        let mut request = PlanRequest::new(VmFlavor::new(self.vm_cpus, self.vm_ram_gb))
            .with_placement(self.placement.into());

        if let Some(failures) = self.failures {
            request = request.with_failures(failures);
        }

        match (self.events_per_second, self.event_size, self.latency_ms) {
            (Some(events_per_second), Some(event_size), Some(target_p95_latency_ms)) => {
                request = request.with_data_plane(DataPlaneWorkload {
                    events_per_second,
                    event_size,
                    target_p95_latency_ms,
                });
            }
            (None, None, None) => {}
            _ => anyhow::bail!(
                "--events-per-second, --event-size and --latency-ms must be given together"
            ),
        }

        let extra_metadata = match (self.extra_clients, self.extra_ops_per_hour) {
            (Some(clients), Some(ops_per_hour)) => Some(ExtraMetadataClients {
                clients,
                ops_per_hour,
            }),
            (None, None) => None,
            _ => anyhow::bail!("--extra-clients and --extra-ops-per-hour must be given together"),
        };

        match self.streams {
            Some(streams) => {
                request = request.with_control_plane(ControlPlaneWorkload {
                    streams,
                    retention_hours: self.retention_hours,
                    scales_per_hour: self.scales_per_hour,
                    writers: self.writers.unwrap_or(0),
                    readers: self.readers.unwrap_or(0),
                    extra_metadata,
                    transactions_per_hour: self.transactions_per_hour,
                });
            }
            None if self.has_control_plane_flags() || extra_metadata.is_some() => {
                anyhow::bail!("control-plane flags require --streams")
            }
            None => {}
        }

        Ok(request)
    }

    fn has_control_plane_flags(&self) -> bool {
        self.retention_hours.is_some()
            || self.scales_per_hour.is_some()
            || self.writers.is_some()
            || self.readers.is_some()
            || self.transactions_per_hour.is_some()
    }
}

/// Run `ssz plan`
pub async fn run(args: &PlanArgs, settings: &Settings) -> Result<()> {
    let request = args.to_request()?;
    execute(&request, args.remote, settings).await
}

/// Plan locally or remotely and print the result
pub async fn execute(request: &PlanRequest, remote: bool, settings: &Settings) -> Result<()> {
    debug!(?request, remote, "Planning");

    if remote {
        let client = ApiClient::new(&settings.api_url)?;
        let plan = client.plan(request).await?;
        if settings.format == OutputFormat::Json {
            return print_json(&plan);
        }
        let profile = client.profile().await?;
        return print_plan(&plan, &profile, settings.format);
    }

    let planner = Planner::new(settings.load_profile()?).context("Performance profile rejected")?;
    let plan = planner.plan(request)?;
    print_plan(&plan, planner.profile(), settings.format)
}
