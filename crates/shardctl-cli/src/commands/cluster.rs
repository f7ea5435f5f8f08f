use anyhow::Result;

use shardctl_core::config::ShardctlConfig;
use shardctl_core::types::{ClusterName, ClusterView};

use super::connect;

pub async fn create(config: &ShardctlConfig, name: &ClusterName, nodes: Option<u32>) -> Result<()> {
    let node_count = nodes.unwrap_or(config.cluster.node_number);
    let workflow = connect(config)?;

    workflow.provision_cluster(name, node_count).await?;
    println!("Cluster {name} created with {node_count} nodes");
    Ok(())
}

pub async fn show(config: &ShardctlConfig, name: &ClusterName, json: bool) -> Result<()> {
    let workflow = connect(config)?;
    let view = workflow.show_cluster(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&view));
    }
    Ok(())
}

fn render(view: &ClusterView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Cluster: {}\n", view.name));
    if let Some(epoch) = view.epoch {
        out.push_str(&format!("Epoch:   {epoch}\n"));
    }
    out.push_str(&format!(
        "\n{:<24} {:<24} {:<8} {}\n",
        "NODE", "PROXY", "ROLE", "SLOTS"
    ));
    out.push_str(&format!("{}\n", "-".repeat(72)));
    for node in &view.nodes {
        let slots: Vec<String> = node.slots.iter().map(|s| s.to_string()).collect();
        out.push_str(&format!(
            "{:<24} {:<24} {:<8} {}\n",
            node.address,
            node.proxy_address,
            node.repl.role,
            slots.join(",")
        ));
    }
    out
}
