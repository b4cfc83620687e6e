//! Node and vector store owned by a network

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::network::NetworkId;
use crate::node::{Node, NodeId};
use crate::query::{Connection, NodeFilter, VectorDirection};
use crate::vector::{Link, Vector, VectorId};
use crate::{NetworkError, Result};

/// The nodes and vectors of one network, both in insertion order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    network_id: NetworkId,
    nodes: IndexMap<NodeId, Node>,
    vectors: IndexMap<VectorId, Vector>,
}

impl Graph {
    pub fn new(network_id: NetworkId) -> Self {
        Self {
            network_id,
            nodes: IndexMap::new(),
            vectors: IndexMap::new(),
        }
    }

    pub fn network_id(&self) -> NetworkId {
        self.network_id
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id, node);
    }

    /// Drop every node and vector inserted after the given counts
    pub(crate) fn truncate(&mut self, node_count: usize, vector_count: usize) {
        self.nodes.truncate(node_count);
        self.vectors.truncate(vector_count);
    }

    /// Get a node by ID
    pub fn get_node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub(crate) fn get_node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    fn require_node(&self, node_id: NodeId) -> Result<&Node> {
        self.get_node(node_id)
            .ok_or(NetworkError::NodeNotFound(node_id))
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Nodes matching `filter`, in insertion order
    pub fn nodes(&self, filter: &NodeFilter) -> Vec<&Node> {
        self.nodes.values().filter(|n| filter.matches(n)).collect()
    }

    pub fn node_ids(&self, filter: &NodeFilter) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| filter.matches(n))
            .map(|n| n.id)
            .collect()
    }

    pub fn count(&self, filter: &NodeFilter) -> usize {
        self.nodes.values().filter(|n| filter.matches(n)).count()
    }

    /// All vectors in creation order, regardless of endpoint status
    pub fn vectors(&self) -> Vec<&Vector> {
        self.vectors.values().collect()
    }

    pub fn get_vector(&self, vector_id: VectorId) -> Option<&Vector> {
        self.vectors.get(&vector_id)
    }

    /// Get all vectors leaving a node
    pub fn vectors_from(&self, node_id: NodeId) -> impl Iterator<Item = &Vector> {
        self.vectors.values().filter(move |v| v.origin == node_id)
    }

    /// Get all vectors arriving at a node
    pub fn vectors_to(&self, node_id: NodeId) -> impl Iterator<Item = &Vector> {
        self.vectors.values().filter(move |v| v.destination == node_id)
    }

    /// A node's incident vectors, in creation order
    pub fn node_vectors(&self, node_id: NodeId, direction: VectorDirection) -> Result<Vec<&Vector>> {
        self.require_node(node_id)?;
        let vectors = self.vectors.values().filter(|v| match direction {
            VectorDirection::All => v.touches(node_id),
            VectorDirection::Incoming => v.destination == node_id,
            VectorDirection::Outgoing => v.origin == node_id,
        });
        Ok(vectors.collect())
    }

    /// One-hop neighbors of a node.
    ///
    /// The filter is applied to each neighbor's own kind and status; the
    /// status of `node_id` itself plays no part. Neighbors appear once, in the
    /// order of the first vector reaching them.
    pub fn neighbors(
        &self,
        node_id: NodeId,
        connection: Connection,
        filter: &NodeFilter,
    ) -> Result<Vec<&Node>> {
        self.require_node(node_id)?;

        let mut seen: IndexMap<NodeId, &Node> = IndexMap::new();
        for vector in self.vectors.values() {
            let other = match connection {
                Connection::To if vector.origin == node_id => vector.destination,
                Connection::From if vector.destination == node_id => vector.origin,
                Connection::Either if vector.origin == node_id => vector.destination,
                Connection::Either if vector.destination == node_id => vector.origin,
                _ => continue,
            };
            if seen.contains_key(&other) {
                continue;
            }
            if let Some(node) = self.get_node(other) {
                if filter.matches(node) {
                    seen.insert(other, node);
                }
            }
        }

        Ok(seen.into_values().collect())
    }

    /// Check if a vector exists from `from` to `to`, whatever either status
    pub fn has_connection(&self, from: NodeId, to: NodeId) -> bool {
        self.vectors
            .values()
            .any(|v| v.origin == from && v.destination == to)
    }

    /// Calculate in-degree (number of incoming vectors)
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        self.vectors_to(node_id).count()
    }

    /// Calculate out-degree (number of outgoing vectors)
    pub fn out_degree(&self, node_id: NodeId) -> usize {
        self.vectors_from(node_id).count()
    }

    pub fn degree(&self, node_id: NodeId) -> usize {
        self.vectors.values().filter(|v| v.touches(node_id)).count()
    }

    /// Check that a link may be created in this graph
    pub fn validate_link(&self, link: &Link) -> Result<()> {
        self.require_node(link.origin)?;
        let destination = self.require_node(link.destination)?;

        if link.origin == link.destination {
            return Err(NetworkError::InvalidConnection {
                origin: link.origin,
                destination: link.destination,
                reason: "a node cannot connect to itself".to_string(),
            });
        }

        if destination.kind.is_source() {
            return Err(NetworkError::InvalidConnection {
                origin: link.origin,
                destination: link.destination,
                reason: format!("{} nodes cannot receive connections", destination.kind),
            });
        }

        Ok(())
    }

    /// Create one vector per link, or none if any link is invalid
    pub(crate) fn insert_links(&mut self, links: &[Link]) -> Result<Vec<VectorId>> {
        for link in links {
            self.validate_link(link)?;
        }

        let mut created = Vec::with_capacity(links.len());
        for link in links {
            let vector = Vector::new(self.network_id, *link);
            tracing::debug!(
                vector_id = %vector.id,
                origin = %vector.origin,
                destination = %vector.destination,
                "Created vector"
            );
            created.push(vector.id);
            self.vectors.insert(vector.id, vector);
        }
        Ok(created)
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the number of nodes, whatever their status
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of vectors
    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use uuid::Uuid;

    fn create_test_graph() -> (Graph, Vec<NodeId>) {
        let network_id = Uuid::new_v4();
        let mut graph = Graph::new(network_id);

        let mut ids = Vec::new();
        for kind in [NodeKind::NODE, NodeKind::AGENT, NodeKind::AGENT, NodeKind::SOURCE] {
            let mut node = Node::new(kind);
            node.network = Some(network_id);
            ids.push(node.id);
            graph.insert_node(node);
        }

        (graph, ids)
    }

    #[test]
    fn test_insert_links_is_atomic() {
        let (mut graph, ids) = create_test_graph();

        let links = [Link::new(ids[0], ids[1]), Link::new(ids[0], ids[3])];
        let err = graph.insert_links(&links).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConnection { .. }));
        assert_eq!(graph.vector_count(), 0);

        graph.insert_links(&links[..1]).unwrap();
        assert_eq!(graph.vector_count(), 1);
        assert!(graph.has_connection(ids[0], ids[1]));
        assert!(!graph.has_connection(ids[1], ids[0]));
    }

    #[test]
    fn test_self_link_rejected() {
        let (graph, ids) = create_test_graph();
        assert!(graph.validate_link(&Link::new(ids[1], ids[1])).is_err());
    }

    #[test]
    fn test_unknown_endpoint() {
        let (graph, ids) = create_test_graph();
        let stranger = Uuid::new_v4();
        let err = graph.validate_link(&Link::new(ids[0], stranger)).unwrap_err();
        assert!(matches!(err, NetworkError::NodeNotFound(id) if id == stranger));
    }

    #[test]
    fn test_degrees_and_neighbors() {
        let (mut graph, ids) = create_test_graph();
        graph
            .insert_links(&[
                Link::new(ids[3], ids[1]),
                Link::new(ids[1], ids[2]),
                Link::new(ids[1], ids[2]),
                Link::new(ids[2], ids[1]),
            ])
            .unwrap();

        assert_eq!(graph.out_degree(ids[1]), 2);
        assert_eq!(graph.in_degree(ids[1]), 2);
        assert_eq!(graph.degree(ids[1]), 4);

        let to: Vec<NodeId> = graph
            .neighbors(ids[1], Connection::To, &NodeFilter::new())
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(to, vec![ids[2]]);

        let either: Vec<NodeId> = graph
            .neighbors(ids[1], Connection::Either, &NodeFilter::new())
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(either, vec![ids[3], ids[2]]);
    }
}
