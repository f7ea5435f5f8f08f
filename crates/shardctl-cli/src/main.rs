mod commands;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use shardctl_core::types::ClusterName;

#[derive(Parser)]
#[command(name = "shardctl")]
#[command(about = "Drive a sharded key-value cluster through its control-plane broker")]
#[command(version)]
struct Cli {
    /// Path to the shardctl config directory (default: ~/.shardctl)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Broker base URL, overriding the config file (or set SHARDCTL_BROKER env var)
    #[arg(long, global = true, env = "SHARDCTL_BROKER")]
    broker: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config with a sample fleet
    Init,

    /// Show the effective configuration
    Config,

    /// Register every configured proxy and its nodes with the broker
    Bootstrap,

    /// Create a cluster
    CreateCluster {
        name: ClusterName,
        /// Number of storage nodes (default: cluster.node_number from config)
        #[arg(long)]
        nodes: Option<u32>,
    },

    /// Bootstrap the fleet, then create a cluster on it
    Setup {
        name: ClusterName,
        /// Number of storage nodes (default: cluster.node_number from config)
        #[arg(long)]
        nodes: Option<u32>,
    },

    /// Attach one free node to a cluster
    AddNode { name: ClusterName },

    /// Rebalance slots across the cluster's current nodes
    Migrate { name: ClusterName },

    /// Add a node, optionally followed by a slot migration
    Grow {
        name: ClusterName,
        /// Start slot migration once the node is attached
        #[arg(long)]
        migrate: bool,
    },

    /// Show the broker's current view of a cluster
    ShowCluster {
        name: ClusterName,
        /// Print the raw view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fail over the proxy of the first master (or replica) node
    ReplaceProxy {
        name: ClusterName,
        /// Target the first replica instead of the first master
        #[arg(long)]
        replica: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shardctl=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => shardctl_core::config::ShardctlConfig::default_base_dir()?,
    };

    run(cli.command, &base_dir, cli.broker.as_deref())
}

fn run(command: Commands, base_dir: &Path, broker: Option<&str>) -> anyhow::Result<()> {
    let config = || commands::load_config(base_dir, broker);

    match command {
        Commands::Init => commands::init::run(base_dir),
        Commands::Config => commands::config::run(base_dir, &config()?),
        Commands::Bootstrap => block_on(commands::bootstrap::run(&config()?)),
        Commands::CreateCluster { name, nodes } => {
            block_on(commands::cluster::create(&config()?, &name, nodes))
        }
        Commands::Setup { name, nodes } => {
            block_on(commands::bootstrap::setup(&config()?, &name, nodes))
        }
        Commands::AddNode { name } => block_on(commands::grow::add_node(&config()?, &name)),
        Commands::Migrate { name } => block_on(commands::grow::migrate(&config()?, &name)),
        Commands::Grow { name, migrate } => {
            block_on(commands::grow::grow(&config()?, &name, migrate))
        }
        Commands::ShowCluster { name, json } => {
            block_on(commands::cluster::show(&config()?, &name, json))
        }
        Commands::ReplaceProxy { name, replica } => {
            block_on(commands::replace::run(&config()?, &name, replica))
        }
    }
}

/// Drive one command to completion on a single-threaded runtime.
fn block_on(future: impl Future<Output = anyhow::Result<()>>) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}
