use anyhow::Result;
use std::path::Path;

use shardctl_core::config::ShardctlConfig;

pub fn run(base_dir: &Path) -> Result<()> {
    println!("Initializing shardctl in {}", base_dir.display());

    std::fs::create_dir_all(base_dir)?;

    let config_path = ShardctlConfig::default_path(base_dir);
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    let config = ShardctlConfig::default_config()?;
    config.save(&config_path)?;
    println!("Created config: {}", config_path.display());

    println!("\nNext steps:");
    println!("  1. Point [broker].address at your broker and list your proxies under [[hosts]]");
    println!("  2. Run `shardctl setup <cluster>` to register the fleet and create a cluster");

    Ok(())
}
