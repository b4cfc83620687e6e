//! # netlab - Dynamic experiment networks
//!
//! Typed participants ("nodes") joined by directed links ("vectors") inside a
//! bounded network. Nodes move through a lifecycle (alive, dead, failed)
//! without ever leaving the network, and every query reads the *alive*
//! subgraph unless asked otherwise.
//!
//! ## Core Capabilities
//!
//! - **Query Engine**: Filter nodes by polymorphic kind and by status
//! - **Lifecycle**: Explicit, one-way status transitions
//! - **Topologies**: Chain, fully connected, scale-free and discrete
//!   generational growth policies that wire nodes as they are added
//! - **Invariants**: Structural checks over a grown network

pub mod config;
pub mod network;
pub mod node;
pub mod query;
pub mod topology;
pub mod vector;

pub use config::{NetworkConfig, TopologyConfig};
pub use network::{Network, NetworkId, NetworkSnapshot};
pub use node::{Node, NodeId, NodeKind, Status};
pub use query::{Connection, Direction, NodeFilter, StatusFilter, VectorDirection};
pub use topology::{
    graph::Graph,
    invariants::{InvariantChecker, InvariantViolation, ViolationSeverity},
    Base, Chain, DiscreteGenerational, FullyConnected, ScaleFree, Topology,
};
pub use vector::{Link, Vector, VectorId};

use serde::{Deserialize, Serialize};

/// Main error types for network operations
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("Node {node_id} is already assigned to network {network_id}")]
    AlreadyAssigned { node_id: NodeId, network_id: NetworkId },

    #[error("Network {network_id} is full ({max_size} nodes)")]
    FullNetwork { network_id: NetworkId, max_size: usize },

    #[error("Cannot connect {origin} to {destination}: {reason}")]
    InvalidConnection {
        origin: NodeId,
        destination: NodeId,
        reason: String,
    },

    #[error("Node {node_id} is a {actual}, expected a {expected}")]
    KindMismatch {
        node_id: NodeId,
        expected: NodeKind,
        actual: NodeKind,
    },

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Unrecognized status: {0}")]
    UnrecognizedStatus(String),

    #[error("Node {node_id} cannot go from {from} to {to}")]
    InvalidLifecycleTransition {
        node_id: NodeId,
        from: Status,
        to: Status,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid node kind: {0}")]
    InvalidKind(String),

    #[error("Sampling error: {0}")]
    Sampling(#[from] rand::distributions::WeightedError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl NetworkError {
    /// Disallowed edges, the TypeError-class failures of `connect`
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::InvalidConnection { .. })
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;

/// Summary of a network's current composition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    pub network_id: NetworkId,
    pub topology: String,
    pub max_size: Option<usize>,
    /// Nodes of every status
    pub node_count: usize,
    pub alive: usize,
    pub dead: usize,
    pub failed: usize,
    /// Alive agents
    pub agents: usize,
    /// Alive sources
    pub sources: usize,
    pub vector_count: usize,
    pub nodes_by_kind: Vec<(String, usize)>,
}
