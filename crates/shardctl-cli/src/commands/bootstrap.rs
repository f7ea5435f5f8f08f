use anyhow::Result;

use shardctl_core::config::ShardctlConfig;
use shardctl_core::types::ClusterName;
use shardctl_core::workflow::BootstrapReport;

use super::connect;

fn require_hosts(config: &ShardctlConfig) -> Result<()> {
    if config.hosts.is_empty() {
        anyhow::bail!("No hosts configured. Add [[hosts]] entries or run `shardctl init` first.");
    }
    Ok(())
}

fn print_report(report: &BootstrapReport) {
    println!(
        "\nRegistered {} proxies ({} new, {} already registered)",
        report.total(),
        report.created.len(),
        report.already_registered.len()
    );
}

pub async fn run(config: &ShardctlConfig) -> Result<()> {
    require_hosts(config)?;
    let workflow = connect(config)?;

    println!("Bootstrapping {} proxies", config.hosts.len());
    let report = workflow.bootstrap_fleet(&config.hosts).await?;
    print_report(&report);
    Ok(())
}

pub async fn setup(config: &ShardctlConfig, name: &ClusterName, nodes: Option<u32>) -> Result<()> {
    require_hosts(config)?;
    let node_count = nodes.unwrap_or(config.cluster.node_number);
    let workflow = connect(config)?;

    let report = workflow.setup(&config.hosts, name, node_count).await?;
    print_report(&report);
    println!("Cluster {name} created with {node_count} nodes");
    Ok(())
}
