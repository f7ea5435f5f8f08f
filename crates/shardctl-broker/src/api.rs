//! Request and response payloads of the broker's control-plane API.

use serde::{Deserialize, Serialize};

use shardctl_core::types::{ClusterName, ClusterView, NodeAddress, ProxyAddress};

pub const PROXIES: &str = "proxies";
pub const CLUSTERS: &str = "clusters";

#[derive(Debug, Serialize)]
pub struct RegisterProxyRequest<'a> {
    pub proxy_address: &'a ProxyAddress,
    pub nodes: &'a [NodeAddress],
}

#[derive(Debug, Serialize)]
pub struct CreateClusterRequest<'a> {
    pub cluster_name: &'a ClusterName,
    pub node_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct ClusterResponse {
    pub cluster: ClusterView,
}
