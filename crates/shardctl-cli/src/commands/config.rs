use anyhow::Result;
use std::path::Path;

use shardctl_core::config::ShardctlConfig;

pub fn run(base_dir: &Path, config: &ShardctlConfig) -> Result<()> {
    let config_path = ShardctlConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config: {}", config_path.display());
    } else {
        println!("Config: {} (not found, using defaults)", config_path.display());
    }
    println!();
    println!("  Broker:         {}", config.broker.address);
    println!("  API version:    {}", config.broker.api_version);
    match config.broker.timeout_secs {
        Some(secs) => println!("  Timeout:        {secs}s"),
        None => println!("  Timeout:        transport default"),
    }
    println!("  Cluster nodes:  {}", config.cluster.node_number);
    println!();

    if config.hosts.is_empty() {
        println!("  No hosts configured.");
        println!();
        println!("  Add hosts to {}:", config_path.display());
        println!("  [[hosts]]");
        println!("  proxy_address = \"server_proxy1:6001\"");
        println!("  nodes = [\"redis1:6379\", \"redis2:6379\"]");
    } else {
        println!("  Hosts ({}):", config.hosts.len());
        for host in &config.hosts {
            let nodes: Vec<&str> = host.nodes.iter().map(|n| n.as_str()).collect();
            println!("    - {} -> {}", host.proxy_address, nodes.join(", "));
        }
    }

    Ok(())
}
