//! Directed links between nodes of one network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::network::NetworkId;
use crate::node::NodeId;

/// Unique identifier for a vector
pub type VectorId = Uuid;

/// A directed edge from `origin` to `destination`.
///
/// Vectors are immutable once created; a bidirectional link is two vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector {
    pub id: VectorId,
    pub origin: NodeId,
    pub destination: NodeId,
    pub network: NetworkId,
    pub created_at: DateTime<Utc>,
}

impl Vector {
    pub(crate) fn new(network: NetworkId, link: Link) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin: link.origin,
            destination: link.destination,
            network,
            created_at: Utc::now(),
        }
    }

    pub fn link(&self) -> Link {
        Link::new(self.origin, self.destination)
    }

    /// True if `node` is either endpoint
    pub fn touches(&self, node: NodeId) -> bool {
        self.origin == node || self.destination == node
    }
}

/// A planned vector: the endpoints before the vector exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub origin: NodeId,
    pub destination: NodeId,
}

impl Link {
    pub fn new(origin: NodeId, destination: NodeId) -> Self {
        Self {
            origin,
            destination,
        }
    }

    pub fn reversed(self) -> Self {
        Self::new(self.destination, self.origin)
    }
}
