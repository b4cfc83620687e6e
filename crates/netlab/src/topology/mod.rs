//! Topology module - Node store and the growth policies that wire new nodes

pub mod graph;
pub mod chain;
pub mod fully_connected;
pub mod scale_free;
pub mod discrete_generational;
pub mod invariants;

use std::fmt;

pub use graph::Graph;
pub use chain::Chain;
pub use fully_connected::FullyConnected;
pub use scale_free::ScaleFree;
pub use discrete_generational::DiscreteGenerational;
pub use invariants::{InvariantChecker, InvariantViolation, ViolationSeverity};

use crate::node::NodeId;
use crate::query::NodeFilter;
use crate::vector::Link;
use crate::Result;

/// A growth policy deciding which vectors a newly added node receives.
///
/// Hooks only plan links; the network validates and creates them all at
/// once, so a rejected plan leaves the graph untouched. The new node is
/// already present in `graph` when a hook runs.
pub trait Topology: fmt::Debug + Send {
    /// Short tag used in the network's textual summary
    fn tag(&self) -> &'static str;

    /// Upper bound on the number of nodes this topology can hold
    fn capacity(&self) -> Option<usize> {
        None
    }

    fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>>;

    fn on_source_added(&mut self, graph: &Graph, source: NodeId) -> Result<Vec<Link>>;
}

/// The base network: nodes are registered but never wired automatically
#[derive(Debug, Clone, Copy, Default)]
pub struct Base;

impl Topology for Base {
    fn tag(&self) -> &'static str {
        "base"
    }

    fn on_agent_added(&mut self, _graph: &Graph, _agent: NodeId) -> Result<Vec<Link>> {
        Ok(Vec::new())
    }

    fn on_source_added(&mut self, _graph: &Graph, _source: NodeId) -> Result<Vec<Link>> {
        Ok(Vec::new())
    }
}

/// Alive agents other than `exclude`, in insertion order
pub(crate) fn other_alive_agents(graph: &Graph, exclude: NodeId) -> Vec<NodeId> {
    graph
        .node_ids(&NodeFilter::agents())
        .into_iter()
        .filter(|id| *id != exclude)
        .collect()
}

/// Links from `origin` to each target
pub(crate) fn fan_out(origin: NodeId, targets: &[NodeId]) -> Vec<Link> {
    targets.iter().map(|t| Link::new(origin, *t)).collect()
}

/// Links in both directions between `node` and each peer
pub(crate) fn mutual(node: NodeId, peers: &[NodeId]) -> Vec<Link> {
    peers
        .iter()
        .flat_map(|p| {
            let link = Link::new(node, *p);
            [link, link.reversed()]
        })
        .collect()
}
