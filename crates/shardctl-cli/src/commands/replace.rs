use anyhow::Result;

use shardctl_core::config::ShardctlConfig;
use shardctl_core::types::{ClusterName, FailoverTarget};

use super::connect;

pub async fn run(config: &ShardctlConfig, name: &ClusterName, replica: bool) -> Result<()> {
    let target = if replica {
        FailoverTarget::Replica
    } else {
        FailoverTarget::Master
    };
    let workflow = connect(config)?;

    let proxy = workflow.replace_proxy(name, target).await?;
    println!("Failover requested for proxy {proxy} ({target} node in {name})");
    Ok(())
}
