use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ShardctlError;

macro_rules! address_type {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a non-empty identifier.
            pub fn new(value: impl Into<String>) -> Result<Self, ShardctlError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ShardctlError::InvalidInput(format!(
                        "{} must not be empty",
                        $what
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl TryFrom<String> for $name {
            type Error = ShardctlError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ShardctlError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

address_type!(
    /// `host:port` of a proxy instance.
    ProxyAddress,
    "proxy address"
);
address_type!(
    /// `host:port` of a storage node fronted by a proxy.
    NodeAddress,
    "node address"
);
address_type!(
    /// Name of a logical cluster.
    ClusterName,
    "cluster name"
);

/// A proxy and the ordered storage nodes it fronts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyHost {
    pub proxy_address: ProxyAddress,
    pub nodes: Vec<NodeAddress>,
}

impl ProxyHost {
    pub fn new(proxy_address: ProxyAddress, nodes: Vec<NodeAddress>) -> Self {
        Self {
            proxy_address,
            nodes,
        }
    }
}

/// Replication role reported by the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Master,
    Replica,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Master => f.pad("master"),
            Role::Replica => f.pad("replica"),
            Role::Unknown => f.pad("unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplPeer {
    pub node_address: NodeAddress,
    pub proxy_address: ProxyAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replication {
    pub role: Role,
    #[serde(default)]
    pub peers: Vec<ReplPeer>,
}

/// Hash-slot ownership entry. The broker sends ranges; bare slot numbers are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotRange {
    Slot(u64),
    Range {
        start: u64,
        end: u64,
        #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
        tag: serde_json::Value,
    },
}

impl fmt::Display for SlotRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRange::Slot(slot) => write!(f, "{slot}"),
            SlotRange::Range { start, end, .. } => write!(f, "{start}-{end}"),
        }
    }
}

/// One storage node's current role within a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterNode {
    pub address: NodeAddress,
    pub proxy_address: ProxyAddress,
    #[serde(default)]
    pub slots: Vec<SlotRange>,
    pub repl: Replication,
}

impl ClusterNode {
    /// A node holding any slots is serving as a master.
    pub fn owns_slots(&self) -> bool {
        !self.slots.is_empty()
    }

    pub fn is_replica(&self) -> bool {
        self.repl.role == Role::Replica
    }
}

/// The broker's current snapshot of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterView {
    pub name: ClusterName,
    #[serde(default)]
    pub epoch: Option<u64>,
    #[serde(default)]
    pub nodes: Vec<ClusterNode>,
}

/// Which kind of node a proxy replacement should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailoverTarget {
    /// First node that currently owns slots.
    #[default]
    Master,
    /// First node currently acting as a replica.
    Replica,
}

impl fmt::Display for FailoverTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailoverTarget::Master => f.pad("master"),
            FailoverTarget::Replica => f.pad("replica"),
        }
    }
}

/// Result of registering a proxy with the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    /// The broker answered 400, which it uses for duplicate registrations.
    AlreadyExists,
    Rejected { status: u16, body: String },
}

/// Raw record of one broker round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body: String,
}
