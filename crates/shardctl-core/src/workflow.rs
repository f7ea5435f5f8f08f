//! Orchestration intents composed from single broker operations.
//!
//! Every intent either completes or aborts on the first failure. Nothing is
//! rolled back: a proxy registered before a later failure stays registered,
//! and a node added without a following migration stays unbalanced.

use tracing::{debug, info, warn};

use crate::broker::BrokerApi;
use crate::error::{Result, ShardctlError};
use crate::select::select_node;
use crate::types::{
    ClusterName, ClusterView, FailoverTarget, ProxyAddress, ProxyHost, RegisterOutcome,
};

/// Which proxies a bootstrap registered and which the broker already knew.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub created: Vec<ProxyAddress>,
    pub already_registered: Vec<ProxyAddress>,
}

impl BootstrapReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.already_registered.len()
    }
}

pub struct Workflow<B> {
    broker: B,
}

impl<B: BrokerApi> Workflow<B> {
    pub fn new(broker: B) -> Self {
        Self { broker }
    }

    #[cfg(test)]
    fn broker(&self) -> &B {
        &self.broker
    }

    /// Register every proxy of the fleet, in fleet order.
    ///
    /// Proxies the broker already knows are skipped so a partially
    /// initialized fleet can be bootstrapped again. Any other failure stops
    /// the run before the next registration.
    pub async fn bootstrap_fleet(&self, fleet: &[ProxyHost]) -> Result<BootstrapReport> {
        let mut report = BootstrapReport::default();
        for host in fleet {
            debug!(proxy = %host.proxy_address, nodes = host.nodes.len(), "Registering proxy");
            match self
                .broker
                .register_proxy(&host.proxy_address, &host.nodes)
                .await?
            {
                RegisterOutcome::Created => {
                    info!(proxy = %host.proxy_address, "Proxy registered");
                    report.created.push(host.proxy_address.clone());
                }
                RegisterOutcome::AlreadyExists => {
                    info!(proxy = %host.proxy_address, "Proxy already registered, skipping");
                    report.already_registered.push(host.proxy_address.clone());
                }
                RegisterOutcome::Rejected { status, body } => {
                    warn!(proxy = %host.proxy_address, status, "Proxy registration rejected");
                    return Err(ShardctlError::BrokerRejected { status, body });
                }
            }
        }
        Ok(report)
    }

    pub async fn provision_cluster(&self, cluster: &ClusterName, node_count: u32) -> Result<()> {
        if node_count == 0 {
            return Err(ShardctlError::InvalidInput(
                "node count must be greater than zero".to_string(),
            ));
        }
        self.broker.create_cluster(cluster, node_count).await?;
        info!(cluster = %cluster, node_count, "Cluster created");
        Ok(())
    }

    /// Attach one node. Slots stay where they are until `expand_cluster`.
    pub async fn grow_cluster(&self, cluster: &ClusterName) -> Result<()> {
        self.broker.add_node(cluster).await?;
        info!(cluster = %cluster, "Node added");
        Ok(())
    }

    pub async fn expand_cluster(&self, cluster: &ClusterName) -> Result<()> {
        self.broker.migrate_slots(cluster).await?;
        info!(cluster = %cluster, "Slot migration started");
        Ok(())
    }

    pub async fn show_cluster(&self, cluster: &ClusterName) -> Result<ClusterView> {
        self.broker.get_cluster(cluster).await
    }

    /// Fail over the proxy owning the first node matching `target`.
    ///
    /// Returns the address of the proxy that was failed over.
    pub async fn replace_proxy(
        &self,
        cluster: &ClusterName,
        target: FailoverTarget,
    ) -> Result<ProxyAddress> {
        let view = self.broker.get_cluster(cluster).await?;
        let node = select_node(&view.nodes, target).ok_or_else(|| {
            ShardctlError::NoEligibleNode {
                cluster: cluster.to_string(),
                target,
            }
        })?;
        let proxy = node.proxy_address.clone();
        debug!(
            cluster = %cluster,
            node = %node.address,
            proxy = %proxy,
            failover = %target,
            "Selected node"
        );

        self.broker.failover_proxy(&proxy).await?;
        info!(cluster = %cluster, proxy = %proxy, "Proxy failover requested");
        Ok(proxy)
    }

    /// Bootstrap the fleet, then create the cluster on top of it.
    pub async fn setup(
        &self,
        fleet: &[ProxyHost],
        cluster: &ClusterName,
        node_count: u32,
    ) -> Result<BootstrapReport> {
        let report = self.bootstrap_fleet(fleet).await?;
        self.provision_cluster(cluster, node_count).await?;
        Ok(report)
    }
}
