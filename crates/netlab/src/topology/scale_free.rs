//! Scale-free topology grown by preferential attachment

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{fan_out, mutual, other_alive_agents, Graph, Topology};
use crate::node::NodeId;
use crate::query::NodeFilter;
use crate::vector::Link;
use crate::{NetworkError, Result};

/// Barabasi-Albert style growth.
///
/// The first `m0` agents are fully connected. Every later agent links in both
/// directions with `m` distinct alive agents, drawn without replacement with
/// probability proportional to their current degree.
#[derive(Debug, Clone)]
pub struct ScaleFree {
    m0: usize,
    m: usize,
    rng: StdRng,
}

impl ScaleFree {
    pub fn new(m0: usize, m: usize) -> Result<Self> {
        Self::validate(m0, m)?;
        Ok(Self {
            m0,
            m,
            rng: StdRng::from_entropy(),
        })
    }

    /// Same as [`ScaleFree::new`] with a reproducible random stream
    pub fn seeded(m0: usize, m: usize, seed: u64) -> Result<Self> {
        Self::validate(m0, m)?;
        Ok(Self {
            m0,
            m,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    fn validate(m0: usize, m: usize) -> Result<()> {
        if m == 0 {
            return Err(NetworkError::Configuration(
                "scale-free m must be at least 1".to_string(),
            ));
        }
        if m0 < m {
            return Err(NetworkError::Configuration(format!(
                "scale-free m0 ({}) must be at least m ({})",
                m0, m
            )));
        }
        Ok(())
    }

    pub fn m0(&self) -> usize {
        self.m0
    }

    pub fn m(&self) -> usize {
        self.m
    }
}

/// Draw up to `k` distinct candidates, each pick weighted by its degree.
///
/// Degrees are read once up front. A round where every remaining weight is
/// zero falls back to a uniform pick.
fn sample_by_degree<R: Rng>(
    rng: &mut R,
    mut candidates: Vec<(NodeId, usize)>,
    k: usize,
) -> Result<Vec<NodeId>> {
    let mut chosen = Vec::with_capacity(k.min(candidates.len()));

    while chosen.len() < k && !candidates.is_empty() {
        let total: usize = candidates.iter().map(|(_, w)| *w).sum();
        let index = if total == 0 {
            rng.gen_range(0..candidates.len())
        } else {
            WeightedIndex::new(candidates.iter().map(|(_, w)| *w))?.sample(rng)
        };
        let (id, _) = candidates.remove(index);
        chosen.push(id);
    }

    Ok(chosen)
}

impl Topology for ScaleFree {
    fn tag(&self) -> &'static str {
        "scale-free"
    }

    fn on_agent_added(&mut self, graph: &Graph, agent: NodeId) -> Result<Vec<Link>> {
        let existing = other_alive_agents(graph, agent);

        if existing.len() < self.m0 {
            return Ok(mutual(agent, &existing));
        }

        let candidates: Vec<(NodeId, usize)> = existing
            .iter()
            .map(|id| (*id, graph.degree(*id)))
            .collect();
        let targets = sample_by_degree(&mut self.rng, candidates, self.m)?;

        tracing::debug!(
            agent = %agent,
            targets = targets.len(),
            "Attached agent by preferential attachment"
        );
        Ok(mutual(agent, &targets))
    }

    fn on_source_added(&mut self, graph: &Graph, source: NodeId) -> Result<Vec<Link>> {
        Ok(fan_out(source, &graph.node_ids(&NodeFilter::agents())))
    }
}
