//! Fully connected topology

use super::{fan_out, mutual, other_alive_agents, Graph, Topology};
use crate::node::NodeId;
use crate::query::NodeFilter;
use crate::vector::Link;
use crate::Result;

/// Every ordered pair of alive agents is linked exactly once, so `n` agents
/// carry `n * (n - 1)` vectors. Sources fan out to all alive agents.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullyConnected;

impl FullyConnected {
    pub fn new() -> Self {
        Self
    }
}

impl Topology for FullyConnected {
    fn tag(&self) -> &'static str {
        "fully-connected"
    }

    fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>> {
        Ok(mutual(agent, &other_alive_agents(graph, agent)))
    }

    fn on_source_added(&mut self, graph: &Graph, source: NodeId) -> Result<Vec<Link>> {
        Ok(fan_out(source, &graph.node_ids(&NodeFilter::agents())))
    }
}
