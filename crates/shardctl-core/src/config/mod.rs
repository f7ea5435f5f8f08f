use crate::error::{Result, ShardctlError};
use crate::types::{NodeAddress, ProxyAddress, ProxyHost};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Top-level shardctl configuration stored as TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShardctlConfig {
    #[serde(default)]
    pub broker: BrokerSettings,
    #[serde(default)]
    pub cluster: ClusterSettings,
    /// Fleet registered by `bootstrap`, in file order.
    #[serde(default)]
    pub hosts: Vec<ProxyHost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerSettings {
    /// Base URL of the broker (e.g. "http://localhost:7799").
    #[serde(default = "default_broker_address")]
    pub address: String,
    /// Version segment of the API path.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Per-request timeout. Unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            address: default_broker_address(),
            api_version: default_api_version(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// Storage nodes requested when creating a cluster.
    #[serde(default = "default_node_number")]
    pub node_number: u32,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            node_number: default_node_number(),
        }
    }
}

fn default_broker_address() -> String {
    "http://localhost:7799".to_string()
}

fn default_api_version() -> String {
    "v2".to_string()
}

fn default_node_number() -> u32 {
    4
}

impl ShardctlConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShardctlError::ConfigNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ShardctlError::TomlDe(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(ShardctlError::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Save config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ShardctlError::TomlSer(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.broker.address.trim().is_empty() {
            return Err(ShardctlError::Config("broker.address is empty".to_string()));
        }
        if self.broker.api_version.trim().is_empty() {
            return Err(ShardctlError::Config(
                "broker.api_version is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for host in &self.hosts {
            if host.proxy_address.is_empty() {
                return Err(ShardctlError::Config(
                    "host with empty proxy_address".to_string(),
                ));
            }
            if host.nodes.is_empty() {
                return Err(ShardctlError::Config(format!(
                    "host {} has no nodes",
                    host.proxy_address
                )));
            }
            if host.nodes.iter().any(|n| n.is_empty()) {
                return Err(ShardctlError::Config(format!(
                    "host {} has an empty node address",
                    host.proxy_address
                )));
            }
            if !seen.insert(host.proxy_address.as_str()) {
                return Err(ShardctlError::Config(format!(
                    "duplicate proxy_address {}",
                    host.proxy_address
                )));
            }
        }
        Ok(())
    }

    /// Default config for `shardctl init`: six proxies fronting two nodes each.
    pub fn default_config() -> Result<Self> {
        let mut hosts = Vec::with_capacity(6);
        for i in 1..=6u32 {
            hosts.push(ProxyHost::new(
                ProxyAddress::new(format!("server_proxy{i}:{}", 6000 + i))?,
                vec![
                    NodeAddress::new(format!("redis{}:6379", 2 * i - 1))?,
                    NodeAddress::new(format!("redis{}:6379", 2 * i))?,
                ],
            ));
        }
        Ok(Self {
            hosts,
            ..Self::default()
        })
    }

    /// Resolve the config file path: `<base_dir>/shardctl.toml`
    pub fn default_path(base_dir: &Path) -> PathBuf {
        base_dir.join("shardctl.toml")
    }

    /// Resolve the default shardctl home directory: `~/.shardctl`
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|h| h.join(".shardctl"))
            .ok_or_else(|| ShardctlError::Config("Cannot determine home directory".to_string()))
    }
}
