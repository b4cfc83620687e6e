//! Chain topology - each agent hears only from the one before it

use super::{fan_out, Graph, Topology};
use crate::node::NodeId;
use crate::query::NodeFilter;
use crate::vector::Link;
use crate::Result;

/// Agents form a line in arrival order.
///
/// A new agent receives a vector from the previous alive agent. Sources feed
/// the head of the chain only: a source added after the first agent links to
/// it, and a first agent arriving after sources receives a link from each.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chain;

impl Chain {
    pub fn new() -> Self {
        Self
    }
}

impl Topology for Chain {
    fn tag(&self) -> &'static str {
        "chain"
    }

    fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>> {
        let agents = graph.node_ids(&NodeFilter::agents());
        let position = agents.iter().position(|id| *id == agent);

        match position {
            Some(0) => {
                let sources = graph.node_ids(&NodeFilter::sources());
                Ok(sources.into_iter().map(|s| Link::new(s, agent)).collect())
            }
            Some(i) => Ok(vec![Link::new(agents[i - 1], agent)]),
            None => Ok(Vec::new()),
        }
    }

    fn on_source_added(&mut self, graph: &Graph, source: NodeId) -> Result<Vec<Link>> {
        let head = graph.node_ids(&NodeFilter::agents()).into_iter().next();
        Ok(head.map(|h| fan_out(source, &[h])).unwrap_or_default())
    }
}
