//! Streaming Cluster Sizer CLI
//!
//! Plans how many coordination, log, storage and control instances (and
//! VMs) a streaming cluster needs, either locally or through the sizing
//! service.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{interactive, plan, profile};
use tracing_subscriber::EnvFilter;

/// Streaming Cluster Sizer CLI
#[derive(Parser)]
#[command(name = "ssz")]
#[command(author, version, about = "Capacity planner for streaming storage clusters", long_about = None)]
pub struct Cli {
    /// Sizing service URL used with --remote (can also be set via SSZ_API_URL env var)
    #[arg(long, env = "SSZ_API_URL")]
    pub api_url: Option<String>,

    /// Performance profile JSON for local planning (built-in bare-metal profile if not specified)
    #[arg(long, env = "SSZ_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(long, short, value_enum)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan a cluster from command-line flags
    Plan(plan::PlanArgs),

    /// Plan a cluster by answering questions
    Interactive {
        /// Send the request to the sizing service instead of planning locally
        #[arg(long)]
        remote: bool,
    },

    /// Inspect performance profiles
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the profile plans are computed with
    Show {
        /// Show the profile served by the sizing service
        #[arg(long)]
        remote: bool,
    },

    /// Check that a profile file parses and is internally consistent
    Validate {
        /// Path to the profile JSON file
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let settings = config::Settings::resolve(cli.api_url, cli.profile, cli.format, config::Config::load()?)?;

    match cli.command {
        Commands::Plan(args) => {
            plan::run(&args, &settings).await?;
        }
        Commands::Interactive { remote } => {
            interactive::run(remote, &settings).await?;
        }
        Commands::Profile(profile_cmd) => match profile_cmd {
            ProfileCommands::Show { remote } => {
                profile::show(remote, &settings).await?;
            }
            ProfileCommands::Validate { path } => {
                profile::validate(&path)?;
            }
        },
    }

    Ok(())
}
