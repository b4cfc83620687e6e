//! The network aggregate: owns nodes and vectors, runs the growth policy

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::node::{Node, NodeId, NodeKind};
use crate::query::{Connection, Direction, NodeFilter, StatusFilter, VectorDirection};
use crate::topology::{
    Base, Chain, DiscreteGenerational, FullyConnected, Graph, ScaleFree, Topology,
};
use crate::vector::{Link, Vector, VectorId};
use crate::{NetworkError, NetworkSummary, Result};

/// Unique identifier for a network
pub type NetworkId = Uuid;

/// A bounded set of nodes and the vectors between them.
///
/// All mutation goes through the network: nodes are registered with
/// [`Network::add`], vectors are created by the topology's growth hooks or by
/// [`Network::connect`]. Nodes are never removed; dying or failing only
/// hides them from the default (alive-only) queries.
#[derive(Debug)]
pub struct Network {
    id: NetworkId,
    max_size: Option<usize>,
    graph: Graph,
    topology: Box<dyn Topology>,
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

impl Network {
    /// A base network with no automatic wiring and no size limit
    pub fn new() -> Self {
        Self::with_topology(Box::new(Base))
    }

    pub fn with_topology(topology: Box<dyn Topology>) -> Self {
        let id = Uuid::new_v4();
        let max_size = topology.capacity();
        tracing::info!(network_id = %id, topology = topology.tag(), "Created network");
        Self {
            id,
            max_size,
            graph: Graph::new(id),
            topology,
        }
    }

    pub fn chain() -> Self {
        Self::with_topology(Box::new(Chain::new()))
    }

    pub fn fully_connected() -> Self {
        Self::with_topology(Box::new(FullyConnected::new()))
    }

    pub fn scale_free(m0: usize, m: usize) -> Result<Self> {
        Ok(Self::with_topology(Box::new(ScaleFree::new(m0, m)?)))
    }

    pub fn discrete_generational(
        generations: usize,
        generation_size: usize,
        initial_source: bool,
    ) -> Result<Self> {
        Ok(Self::with_topology(Box::new(DiscreteGenerational::new(
            generations,
            generation_size,
            initial_source,
        )?)))
    }

    /// Limit the number of nodes. A topology's own capacity still applies.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(match self.max_size {
            Some(existing) => existing.min(max_size),
            None => max_size,
        });
        self
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    pub fn topology_tag(&self) -> &'static str {
        self.topology.tag()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// True once the node count (any status) has reached `max_size`
    pub fn is_full(&self) -> bool {
        self.max_size
            .is_some_and(|max| self.graph.node_count() >= max)
    }

    /// Register a node and let the topology wire it.
    ///
    /// Either the node and all of its planned vectors are added, or nothing is.
    pub fn add(&mut self, mut node: Node) -> Result<NodeId> {
        if let Some(network_id) = node.network {
            return Err(NetworkError::AlreadyAssigned {
                node_id: node.id,
                network_id,
            });
        }
        if self.graph.contains(node.id) {
            return Err(NetworkError::AlreadyAssigned {
                node_id: node.id,
                network_id: self.id,
            });
        }
        if let Some(max_size) = self.max_size.filter(|_| self.is_full()) {
            return Err(NetworkError::FullNetwork {
                network_id: self.id,
                max_size,
            });
        }

        let node_id = node.id;
        let kind = node.kind.clone();
        let (node_count, vector_count) = (self.graph.node_count(), self.graph.vector_count());
        node.network = Some(self.id);
        self.graph.insert_node(node);

        if let Err(err) = self.grow(node_id, &kind) {
            self.graph.truncate(node_count, vector_count);
            return Err(err);
        }

        tracing::debug!(
            network_id = %self.id,
            node_id = %node_id,
            kind = %kind,
            "Added node"
        );
        Ok(node_id)
    }

    fn grow(&mut self, node_id: NodeId, kind: &NodeKind) -> Result<()> {
        let links = if kind.is_agent() {
            self.topology.on_agent_added(&self.graph, node_id)?
        } else if kind.is_source() {
            self.topology.on_source_added(&self.graph, node_id)?
        } else {
            Vec::new()
        };
        self.graph.insert_links(&links)?;
        Ok(())
    }

    /// Add several nodes in order.
    ///
    /// The batch is all or nothing: if any node is rejected, every node and
    /// vector added by this call is removed again.
    pub fn add_all(&mut self, nodes: impl IntoIterator<Item = Node>) -> Result<Vec<NodeId>> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        if let Some(max_size) = self.max_size {
            if self.graph.node_count() + nodes.len() > max_size {
                return Err(NetworkError::FullNetwork {
                    network_id: self.id,
                    max_size,
                });
            }
        }

        let (node_count, vector_count) = (self.graph.node_count(), self.graph.vector_count());
        let mut added = Vec::with_capacity(nodes.len());
        for node in nodes {
            match self.add(node) {
                Ok(node_id) => added.push(node_id),
                Err(err) => {
                    self.graph.truncate(node_count, vector_count);
                    tracing::debug!(
                        network_id = %self.id,
                        rolled_back = added.len(),
                        "Rejected node batch"
                    );
                    return Err(err);
                }
            }
        }
        Ok(added)
    }

    /// Add a node that must be an agent
    pub fn add_agent(&mut self, node: Node) -> Result<NodeId> {
        Self::expect_kind(&node, &NodeKind::AGENT)?;
        self.add(node)
    }

    /// Add a node that must be a source
    pub fn add_source(&mut self, node: Node) -> Result<NodeId> {
        Self::expect_kind(&node, &NodeKind::SOURCE)?;
        self.add(node)
    }

    fn expect_kind(node: &Node, expected: &NodeKind) -> Result<()> {
        if node.is_a(expected) {
            Ok(())
        } else {
            Err(NetworkError::KindMismatch {
                node_id: node.id,
                expected: expected.clone(),
                actual: node.kind.clone(),
            })
        }
    }

    /// Connect `origin` with each target.
    ///
    /// Creates one vector per target (two for [`Direction::Both`]). If any
    /// link is rejected, no vector is created.
    pub fn connect(
        &mut self,
        origin: NodeId,
        targets: &[NodeId],
        direction: Direction,
    ) -> Result<Vec<VectorId>> {
        let links: Vec<Link> = targets
            .iter()
            .flat_map(|target| {
                let link = Link::new(origin, *target);
                match direction {
                    Direction::To => vec![link],
                    Direction::From => vec![link.reversed()],
                    Direction::Both => vec![link, link.reversed()],
                }
            })
            .collect();
        self.graph.insert_links(&links)
    }

    /// Shorthand for connecting `origin -> target`
    pub fn connect_to(&mut self, origin: NodeId, target: NodeId) -> Result<VectorId> {
        let created = self.connect(origin, &[target], Direction::To)?;
        Ok(created[0])
    }

    /// Transition a node `alive -> dead`
    pub fn die(&mut self, node_id: NodeId) -> Result<()> {
        self.node_mut(node_id)?.die()?;
        tracing::debug!(network_id = %self.id, node_id = %node_id, "Node died");
        Ok(())
    }

    /// Transition a node `alive -> failed`
    pub fn fail(&mut self, node_id: NodeId) -> Result<()> {
        self.node_mut(node_id)?.fail()?;
        tracing::debug!(network_id = %self.id, node_id = %node_id, "Node failed");
        Ok(())
    }

    fn node_mut(&mut self, node_id: NodeId) -> Result<&mut Node> {
        self.graph
            .get_node_mut(node_id)
            .ok_or(NetworkError::NodeNotFound(node_id))
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.graph.get_node(node_id)
    }

    /// Nodes matching `filter`, in insertion order
    pub fn nodes(&self, filter: &NodeFilter) -> Vec<&Node> {
        self.graph.nodes(filter)
    }

    /// Number of nodes with the given status
    pub fn size(&self, status: StatusFilter) -> usize {
        self.graph.count(&NodeFilter::new().with_status(status))
    }

    /// Every vector, in creation order
    pub fn vectors(&self) -> Vec<&Vector> {
        self.graph.vectors()
    }

    pub fn node_vectors(&self, node_id: NodeId, direction: VectorDirection) -> Result<Vec<&Vector>> {
        self.graph.node_vectors(node_id, direction)
    }

    pub fn neighbors(
        &self,
        node_id: NodeId,
        connection: Connection,
        filter: &NodeFilter,
    ) -> Result<Vec<&Node>> {
        self.graph.neighbors(node_id, connection, filter)
    }

    pub fn has_connection(&self, from: NodeId, to: NodeId) -> bool {
        self.graph.has_connection(from, to)
    }

    pub fn degree(&self, node_id: NodeId) -> usize {
        self.graph.degree(node_id)
    }

    /// Counts describing the network's current composition
    pub fn summary(&self) -> NetworkSummary {
        let count = |filter: NodeFilter| self.graph.count(&filter);
        let mut nodes_by_kind: Vec<(String, usize)> = Vec::new();
        for node in self.graph.nodes(&NodeFilter::any()) {
            match nodes_by_kind.iter_mut().find(|(k, _)| k == node.kind.as_str()) {
                Some((_, n)) => *n += 1,
                None => nodes_by_kind.push((node.kind.to_string(), 1)),
            }
        }

        NetworkSummary {
            network_id: self.id,
            topology: self.topology.tag().to_string(),
            max_size: self.max_size,
            node_count: self.graph.node_count(),
            alive: count(NodeFilter::new()),
            dead: count(NodeFilter::any().with_status(StatusFilter::Dead)),
            failed: count(NodeFilter::any().with_status(StatusFilter::Failed)),
            agents: count(NodeFilter::agents()),
            sources: count(NodeFilter::sources()),
            vector_count: self.graph.vector_count(),
            nodes_by_kind,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.simple().to_string();
        write!(
            f,
            "<Network-{}-{} with {} agents, {} sources, {} vectors>",
            &id[..6],
            self.topology.tag(),
            self.graph.count(&NodeFilter::agents()),
            self.graph.count(&NodeFilter::sources()),
            self.graph.vector_count()
        )
    }
}

/// Serializable snapshot of a network's nodes and vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub network_id: NetworkId,
    pub topology: String,
    pub nodes: Vec<Node>,
    pub vectors: Vec<Vector>,
}

impl From<&Network> for NetworkSnapshot {
    fn from(network: &Network) -> Self {
        Self {
            network_id: network.id,
            topology: network.topology_tag().to_string(),
            nodes: network.nodes(&NodeFilter::any()).into_iter().cloned().collect(),
            vectors: network.vectors().into_iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix_and_tag() {
        let mut net = Network::new();
        net.add(Node::agent()).unwrap();
        let text = net.to_string();
        assert!(text.starts_with("<Network-"));
        assert_eq!(&text[15..], "-base with 1 agents, 0 sources, 0 vectors>");
    }

    #[test]
    fn test_max_size_counts_every_status() {
        let mut net = Network::new().with_max_size(2);
        let a = net.add(Node::agent()).unwrap();
        net.add(Node::agent()).unwrap();
        net.fail(a).unwrap();

        assert!(net.is_full());
        let err = net.add(Node::agent()).unwrap_err();
        assert!(matches!(err, NetworkError::FullNetwork { max_size: 2, .. }));
        assert_eq!(net.size(StatusFilter::All), 2);
    }

    #[test]
    fn test_add_agent_checks_kind() {
        let mut net = Network::new();
        let err = net.add_agent(Node::source()).unwrap_err();
        assert!(matches!(err, NetworkError::KindMismatch { .. }));
        assert!(net.add_agent(Node::new(NodeKind::REPLICATOR_AGENT)).is_ok());
        assert!(net.add_source(Node::new(NodeKind::RANDOM_BINARY_STRING_SOURCE)).is_ok());
    }

    #[test]
    fn test_copied_node_cannot_join_another_network() {
        let mut first = Network::new();
        let mut second = Network::new();
        let id = first.add(Node::agent()).unwrap();

        let copy = first.node(id).cloned().unwrap();
        let err = second.add(copy).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::AlreadyAssigned { network_id, .. } if network_id == first.id()
        ));
        assert!(second.graph().is_empty());
    }

    #[test]
    fn test_clone_shares_identity_within_a_network() {
        let mut net = Network::new();
        let node = Node::agent();
        let twin = node.clone();
        assert_eq!(twin.id, node.id);

        let id = net.add(node).unwrap();
        let err = net.add(twin).unwrap_err();
        assert!(matches!(err, NetworkError::AlreadyAssigned { node_id, .. } if node_id == id));
        assert_eq!(net.size(StatusFilter::All), 1);
    }

    #[test]
    fn test_add_all_rejects_batch_over_capacity() {
        let mut net = Network::new().with_max_size(2);
        let err = net
            .add_all([Node::agent(), Node::agent(), Node::agent()])
            .unwrap_err();

        assert!(matches!(err, NetworkError::FullNetwork { max_size: 2, .. }));
        assert!(net.graph().is_empty());
    }

    #[test]
    fn test_add_all_rolls_back_nodes_and_vectors() {
        let mut net = Network::fully_connected();
        let first = net.add(Node::agent()).unwrap();

        let batch = Node::agent();
        let duplicate = batch.clone();
        let err = net
            .add_all([batch, Node::agent(), duplicate])
            .unwrap_err();

        assert!(matches!(err, NetworkError::AlreadyAssigned { .. }));
        assert_eq!(net.graph().node_ids(&NodeFilter::any()), vec![first]);
        assert!(net.vectors().is_empty());

        let added = net.add_all([Node::agent(), Node::agent()]).unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(net.vectors().len(), 6);
    }

    /// Wires every new agent into the sources, which is never allowed
    #[derive(Debug)]
    struct IntoSources;

    impl Topology for IntoSources {
        fn tag(&self) -> &'static str {
            "into-sources"
        }

        fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>> {
            Ok(graph
                .node_ids(&NodeFilter::sources())
                .into_iter()
                .map(|s| Link::new(agent, s))
                .collect())
        }

        fn on_source_added(&mut self, _graph: &Graph, _source: NodeId) -> Result<Vec<Link>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_failed_hook_rolls_back_node() {
        let mut net = Network::with_topology(Box::new(IntoSources));
        net.add_agent(Node::agent()).unwrap();
        net.add_source(Node::source()).unwrap();

        let err = net.add_agent(Node::agent()).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidConnection { .. }));
        assert_eq!(net.size(StatusFilter::All), 2);
        assert!(net.vectors().is_empty());
    }

    #[test]
    fn test_topology_capacity_caps_max_size() {
        let net = Network::discrete_generational(2, 2, true)
            .unwrap()
            .with_max_size(10);
        assert_eq!(net.max_size(), Some(5));
    }

    #[test]
    fn test_summary_counts() {
        let mut net = Network::fully_connected();
        let ids = net.add_all([Node::agent(), Node::agent(), Node::agent()]).unwrap();
        net.die(ids[0]).unwrap();

        let summary = net.summary();
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.alive, 2);
        assert_eq!(summary.dead, 1);
        assert_eq!(summary.agents, 2);
        assert_eq!(summary.vector_count, 6);
        assert_eq!(summary.nodes_by_kind, vec![("node/agent".to_string(), 3)]);
    }
}
