use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ClusterName, ClusterView, NodeAddress, ProxyAddress, RegisterOutcome};

/// Control-plane operations exposed by the broker.
///
/// Each call is exactly one round-trip and is never retried. Implementations
/// only interpret status codes; all decisions live in the workflow.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// Register a proxy with the storage nodes it fronts.
    async fn register_proxy(
        &self,
        proxy_address: &ProxyAddress,
        nodes: &[NodeAddress],
    ) -> Result<RegisterOutcome>;

    /// Create a cluster sized to `node_count` storage nodes.
    async fn create_cluster(&self, cluster: &ClusterName, node_count: u32) -> Result<()>;

    /// Attach one more free node to the cluster.
    async fn add_node(&self, cluster: &ClusterName) -> Result<()>;

    /// Fetch the current view of the cluster.
    async fn get_cluster(&self, cluster: &ClusterName) -> Result<ClusterView>;

    /// Start rebalancing slots over the cluster's current members.
    async fn migrate_slots(&self, cluster: &ClusterName) -> Result<()>;

    /// Retire and replace the proxy.
    async fn failover_proxy(&self, proxy_address: &ProxyAddress) -> Result<()>;
}
