pub mod bootstrap;
pub mod cluster;
pub mod config;
pub mod grow;
pub mod init;
pub mod replace;

use std::path::Path;

use shardctl_broker::HttpBroker;
use shardctl_core::config::ShardctlConfig;
use shardctl_core::workflow::Workflow;

/// Load `<base_dir>/shardctl.toml` (defaults if absent) and apply the broker override.
pub fn load_config(base_dir: &Path, broker: Option<&str>) -> anyhow::Result<ShardctlConfig> {
    let config_path = ShardctlConfig::default_path(base_dir);
    let mut config = ShardctlConfig::load_or_default(&config_path)?;
    if let Some(address) = broker {
        config.broker.address = address.to_string();
    }
    config.validate()?;
    Ok(config)
}

/// Build a workflow over the configured broker. Every exchange is echoed to stdout.
pub fn connect(config: &ShardctlConfig) -> anyhow::Result<Workflow<HttpBroker>> {
    let broker = HttpBroker::new(&config.broker)?
        .with_observer(|exchange| println!("{} {}", exchange.status, exchange.body));
    tracing::debug!(
        address = %config.broker.address,
        api_version = %config.broker.api_version,
        "Using broker"
    );
    Ok(Workflow::new(broker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn override_replaces_configured_address() {
        let tmp = TempDir::new().unwrap();
        ShardctlConfig::default_config()
            .unwrap()
            .save(&ShardctlConfig::default_path(tmp.path()))
            .unwrap();

        let config = load_config(tmp.path(), Some("http://10.0.0.5:7799")).unwrap();
        assert_eq!(config.broker.address, "http://10.0.0.5:7799");
        assert_eq!(config.hosts.len(), 6);
    }

    #[test]
    fn empty_override_is_rejected() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config(tmp.path(), Some("")).is_err());
    }

    #[test]
    fn connect_rejects_bad_address() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), Some("::nope")).unwrap();
        assert!(connect(&config).is_err());
    }
}
