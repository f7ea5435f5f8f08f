use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Url};
use tracing::{debug, warn};

use shardctl_core::broker::BrokerApi;
use shardctl_core::config::BrokerSettings;
use shardctl_core::error::{Result, ShardctlError};
use shardctl_core::types::{
    ClusterName, ClusterView, Exchange, NodeAddress, ProxyAddress, RegisterOutcome,
};

use crate::api::{CLUSTERS, ClusterResponse, CreateClusterRequest, PROXIES, RegisterProxyRequest};

/// Callback receiving every raw broker exchange before it is interpreted.
pub type Observer = Arc<dyn Fn(&Exchange) + Send + Sync>;

/// Broker client speaking the JSON control-plane API over HTTP.
pub struct HttpBroker {
    client: reqwest::Client,
    base_url: Url,
    api_version: String,
    observer: Option<Observer>,
}

impl HttpBroker {
    pub fn new(settings: &BrokerSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.address).map_err(|e| {
            ShardctlError::Config(format!("invalid broker address '{}': {e}", settings.address))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ShardctlError::Config(format!(
                "broker address '{}' cannot be used as a base URL",
                settings.address
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ShardctlError::Transport(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_version: settings.api_version.clone(),
            observer: None,
        })
    }

    /// Hand every exchange to `observer` before its status is interpreted.
    pub fn with_observer(mut self, observer: impl Fn(&Exchange) + Send + Sync + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// `<base>/api/<version>/<segments...>`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ShardctlError::Config(format!("cannot extend broker URL {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["api", self.api_version.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Perform one round-trip. Non-2xx statuses are returned, not raised.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<Exchange> {
        let url = self.url(segments)?;
        let path = url.path().to_string();
        debug!(%method, %path, "Sending broker request");

        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, %path, error = %e, "Broker request failed");
            ShardctlError::Transport(format!("{method} {path}: {e}"))
        })?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            warn!(%method, %path, status, error = %e, "Cannot read broker response");
            ShardctlError::Transport(format!("{method} {path}: reading body: {e}"))
        })?;

        let exchange = Exchange {
            method: method.to_string(),
            path,
            status,
            body: text,
        };
        debug!(
            method = %exchange.method,
            path = %exchange.path,
            status,
            body = %exchange.body,
            "Broker responded"
        );
        if let Some(observer) = &self.observer {
            observer(&exchange);
        }
        Ok(exchange)
    }

    async fn send_expecting_success(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<Exchange> {
        let exchange = self.send(method, segments, body).await?;
        if is_success(exchange.status) {
            Ok(exchange)
        } else {
            warn!(path = %exchange.path, status = exchange.status, "Broker rejected request");
            Err(ShardctlError::BrokerRejected {
                status: exchange.status,
                body: exchange.body,
            })
        }
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Map a registration response onto its outcome. 400 is how the broker
/// reports a proxy it already knows.
pub fn classify_registration(status: u16, body: String) -> RegisterOutcome {
    match status {
        s if is_success(s) => RegisterOutcome::Created,
        400 => RegisterOutcome::AlreadyExists,
        _ => RegisterOutcome::Rejected { status, body },
    }
}

fn to_json<T: serde::Serialize>(payload: &T) -> Result<serde_json::Value> {
    serde_json::to_value(payload).map_err(|e| ShardctlError::InvalidInput(e.to_string()))
}

#[async_trait]
impl BrokerApi for HttpBroker {
    async fn register_proxy(
        &self,
        proxy_address: &ProxyAddress,
        nodes: &[NodeAddress],
    ) -> Result<RegisterOutcome> {
        if proxy_address.is_empty() {
            return Err(ShardctlError::InvalidInput(
                "proxy address must not be empty".to_string(),
            ));
        }
        if nodes.is_empty() {
            return Err(ShardctlError::InvalidInput(format!(
                "proxy {proxy_address} needs at least one node"
            )));
        }

        let body = to_json(&RegisterProxyRequest {
            proxy_address,
            nodes,
        })?;
        let exchange = self.send(Method::POST, &[PROXIES, "meta"], Some(body)).await?;
        Ok(classify_registration(exchange.status, exchange.body))
    }

    async fn create_cluster(&self, cluster: &ClusterName, node_count: u32) -> Result<()> {
        let body = to_json(&CreateClusterRequest {
            cluster_name: cluster,
            node_number: node_count,
        })?;
        self.send_expecting_success(Method::POST, &[CLUSTERS], Some(body))
            .await?;
        Ok(())
    }

    async fn add_node(&self, cluster: &ClusterName) -> Result<()> {
        self.send_expecting_success(Method::PUT, &[CLUSTERS, "nodes", cluster.as_str()], None)
            .await?;
        Ok(())
    }

    async fn get_cluster(&self, cluster: &ClusterName) -> Result<ClusterView> {
        let exchange = self
            .send_expecting_success(Method::GET, &[CLUSTERS, "meta", cluster.as_str()], None)
            .await?;
        let response: ClusterResponse = serde_json::from_str(&exchange.body)
            .map_err(|e| ShardctlError::Decode(format!("cluster {cluster}: {e}")))?;
        Ok(response.cluster)
    }

    async fn migrate_slots(&self, cluster: &ClusterName) -> Result<()> {
        self.send_expecting_success(
            Method::POST,
            &[CLUSTERS, "migrations", "expand", cluster.as_str()],
            None,
        )
        .await?;
        Ok(())
    }

    async fn failover_proxy(&self, proxy_address: &ProxyAddress) -> Result<()> {
        self.send_expecting_success(
            Method::POST,
            &[PROXIES, "failover", proxy_address.as_str()],
            None,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broker(address: &str) -> HttpBroker {
        HttpBroker::new(&BrokerSettings {
            address: address.to_string(),
            ..BrokerSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn urls_carry_version_prefix() {
        let b = broker("http://localhost:7799");
        let url = b.url(&[CLUSTERS, "meta", "mydb"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:7799/api/v2/clusters/meta/mydb");
    }

    #[test]
    fn base_path_is_kept() {
        let b = broker("http://broker.internal/control/");
        let url = b.url(&[PROXIES, "meta"]).unwrap();
        assert_eq!(url.path(), "/control/api/v2/proxies/meta");
    }

    #[test]
    fn segments_are_escaped() {
        let b = broker("http://localhost:7799");
        let url = b.url(&[CLUSTERS, "nodes", "a/b c"]).unwrap();
        assert_eq!(url.path(), "/api/v2/clusters/nodes/a%2Fb%20c");
    }

    #[test]
    fn invalid_address_is_config_error() {
        let result = HttpBroker::new(&BrokerSettings {
            address: "not a url".to_string(),
            ..BrokerSettings::default()
        });
        assert!(matches!(result, Err(ShardctlError::Config(_))));
    }

    #[test]
    fn registration_statuses() {
        assert_eq!(classify_registration(200, String::new()), RegisterOutcome::Created);
        assert_eq!(classify_registration(201, String::new()), RegisterOutcome::Created);
        assert_eq!(
            classify_registration(400, "exists".to_string()),
            RegisterOutcome::AlreadyExists
        );
        assert_eq!(
            classify_registration(409, "conflict".to_string()),
            RegisterOutcome::Rejected {
                status: 409,
                body: "conflict".to_string()
            }
        );
    }
}
