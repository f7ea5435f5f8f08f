use crate::types::{ClusterNode, FailoverTarget};

/// First node that currently owns slots, in broker order.
pub fn select_master(nodes: &[ClusterNode]) -> Option<&ClusterNode> {
    for node in nodes {
        if node.owns_slots() {
            return Some(node);
        }
    }
    None
}

/// First node whose replication role is replica, in broker order.
pub fn select_replica(nodes: &[ClusterNode]) -> Option<&ClusterNode> {
    for node in nodes {
        if node.is_replica() {
            return Some(node);
        }
    }
    None
}

pub fn select_node(nodes: &[ClusterNode], target: FailoverTarget) -> Option<&ClusterNode> {
    match target {
        FailoverTarget::Master => select_master(nodes),
        FailoverTarget::Replica => select_replica(nodes),
    }
}
