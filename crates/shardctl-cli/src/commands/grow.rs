use anyhow::Result;

use shardctl_core::config::ShardctlConfig;
use shardctl_core::types::ClusterName;

use super::connect;

pub async fn add_node(config: &ShardctlConfig, name: &ClusterName) -> Result<()> {
    let workflow = connect(config)?;
    workflow.grow_cluster(name).await?;
    println!("Node added to {name}. Run `shardctl migrate {name}` to move slots onto it.");
    Ok(())
}

pub async fn migrate(config: &ShardctlConfig, name: &ClusterName) -> Result<()> {
    let workflow = connect(config)?;
    workflow.expand_cluster(name).await?;
    println!("Slot migration started for {name}");
    Ok(())
}

/// Add a node and, if asked, migrate slots. A failed migration leaves the
/// node attached.
pub async fn grow(config: &ShardctlConfig, name: &ClusterName, migrate: bool) -> Result<()> {
    let workflow = connect(config)?;
    workflow.grow_cluster(name).await?;
    println!("Node added to {name}");

    if migrate {
        workflow.expand_cluster(name).await?;
        println!("Slot migration started for {name}");
    }
    Ok(())
}
