//! Discrete generations: layered transmission from one generation to the next

use super::{Graph, Topology};
use crate::node::NodeId;
use crate::query::{NodeFilter, StatusFilter};
use crate::vector::Link;
use crate::{NetworkError, Result};

/// Agents are grouped into generations by arrival order; agent `i` belongs
/// to generation `i / generation_size`, counting agents of every status.
///
/// Each agent of generation `g >= 1` receives a vector from every agent of
/// generation `g - 1`. With `initial_source`, generation 0 is fed by the
/// network's sources instead.
#[derive(Debug, Clone)]
pub struct DiscreteGenerational {
    generations: usize,
    generation_size: usize,
    initial_source: bool,
}

impl DiscreteGenerational {
    pub fn new(generations: usize, generation_size: usize, initial_source: bool) -> Result<Self> {
        if generations == 0 || generation_size == 0 {
            return Err(NetworkError::Configuration(format!(
                "discrete-generational needs at least one generation of at least one agent \
                 (got {} generations of {})",
                generations, generation_size
            )));
        }
        Ok(Self {
            generations,
            generation_size,
            initial_source,
        })
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn generation_size(&self) -> usize {
        self.generation_size
    }

    pub fn initial_source(&self) -> bool {
        self.initial_source
    }

    /// Generation of the agent at insertion index `index`
    pub fn generation_of(&self, index: usize) -> usize {
        index / self.generation_size
    }

    /// All agents ever added, in insertion order
    fn agents(graph: &Graph) -> Vec<NodeId> {
        graph.node_ids(&NodeFilter::agents().with_status(StatusFilter::All))
    }

    /// Agents of `generation`, in insertion order
    pub fn members(&self, graph: &Graph, generation: usize) -> Vec<NodeId> {
        Self::agents(graph)
            .into_iter()
            .skip(generation * self.generation_size)
            .take(self.generation_size)
            .collect()
    }
}

impl Topology for DiscreteGenerational {
    fn tag(&self) -> &'static str {
        "discrete-generational"
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.generations * self.generation_size + usize::from(self.initial_source))
    }

    fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>> {
        let Some(index) = Self::agents(graph).iter().position(|id| *id == agent) else {
            return Ok(Vec::new());
        };

        let generation = self.generation_of(index);
        if generation >= self.generations {
            return Err(NetworkError::FullNetwork {
                network_id: graph.network_id(),
                max_size: self.generations * self.generation_size,
            });
        }

        let parents = if generation == 0 {
            if !self.initial_source {
                return Ok(Vec::new());
            }
            graph.node_ids(&NodeFilter::sources().with_status(StatusFilter::All))
        } else {
            self.members(graph, generation - 1)
        };

        Ok(parents.into_iter().map(|p| Link::new(p, agent)).collect())
    }

    fn on_source_added(&mut self, graph: &Graph, source: NodeId) -> Result<Vec<Link>> {
        if !self.initial_source {
            return Ok(Vec::new());
        }
        Ok(self
            .members(graph, 0)
            .into_iter()
            .map(|a| Link::new(source, a))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_assignment() {
        let topology = DiscreteGenerational::new(3, 4, true).unwrap();
        assert_eq!(topology.generation_of(0), 0);
        assert_eq!(topology.generation_of(3), 0);
        assert_eq!(topology.generation_of(4), 1);
        assert_eq!(topology.generation_of(11), 2);
        assert_eq!(topology.capacity(), Some(13));
    }

    #[test]
    fn test_rejects_empty_generations() {
        assert!(DiscreteGenerational::new(0, 4, false).is_err());
        assert!(DiscreteGenerational::new(4, 0, false).is_err());
    }
}
