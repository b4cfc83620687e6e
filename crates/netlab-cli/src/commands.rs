//! Command implementations

use anyhow::{Context, Result};
use netlab::{InvariantChecker, Network, Node, NodeFilter, ViolationSeverity};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::GrowthPlan;
use crate::output;

/// Build a network and add the plan's nodes to it
pub fn grow(plan: &GrowthPlan) -> Result<Network> {
    let mut network = plan
        .network
        .build()
        .context("Failed to build network")?;

    let sources_first = plan.network.topology.sources_first();
    if sources_first {
        add_sources(&mut network, plan.sources)?;
    }
    for i in 0..plan.agents {
        network
            .add_agent(Node::agent())
            .with_context(|| format!("Failed to add agent {}", i + 1))?;
    }
    if !sources_first {
        add_sources(&mut network, plan.sources)?;
    }

    if plan.fail > 0 {
        let mut rng = match plan.network.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let alive = network.graph().node_ids(&NodeFilter::agents());
        let victims: Vec<_> = alive.choose_multiple(&mut rng, plan.fail).copied().collect();
        for id in victims {
            network.fail(id)?;
        }
    }

    tracing::info!("Grew {}", network);
    Ok(network)
}

fn add_sources(network: &mut Network, count: usize) -> Result<()> {
    for i in 0..count {
        network
            .add_source(Node::source())
            .with_context(|| format!("Failed to add source {}", i + 1))?;
    }
    Ok(())
}

pub fn run_grow(plan: &GrowthPlan, json: bool) -> Result<()> {
    let network = grow(plan)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&network.summary())?);
    } else {
        output::print_summary(&network);
    }
    Ok(())
}

/// Grow the plan and check invariants. Returns true if no error-level
/// violation was found.
pub fn run_check(plan: &GrowthPlan, strict: bool) -> Result<bool> {
    let network = grow(plan)?;
    let violations = InvariantChecker::new()
        .with_strict_mode(strict)
        .check_all(&network);

    output::print_violations(&network, &violations);
    Ok(violations
        .iter()
        .all(|v| v.severity < ViolationSeverity::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netlab::{StatusFilter, TopologyConfig};

    #[test]
    fn test_grow_discrete_generational_adds_sources_first() {
        let mut plan = GrowthPlan::new(TopologyConfig::DiscreteGenerational {
            generations: 2,
            generation_size: 3,
            initial_source: true,
        });
        plan.agents = 6;
        plan.sources = 1;

        let network = grow(&plan).unwrap();
        assert_eq!(network.vectors().len(), 3 + 9);
    }

    #[test]
    fn test_grow_fails_requested_agents() {
        let mut plan = GrowthPlan::new(TopologyConfig::FullyConnected);
        plan.agents = 5;
        plan.fail = 2;
        plan.network.seed = Some(5);

        let network = grow(&plan).unwrap();
        assert_eq!(network.size(StatusFilter::Failed), 2);
        assert_eq!(network.vectors().len(), 20);
    }

    #[test]
    fn test_grow_reports_full_network() {
        let mut plan = GrowthPlan::new(TopologyConfig::Chain);
        plan.network.max_size = Some(2);
        plan.agents = 3;

        let err = grow(&plan).unwrap_err();
        assert!(err.to_string().contains("Failed to add agent 3"));
    }

    #[test]
    fn test_check_grown_network_passes() {
        let mut plan = GrowthPlan::new(TopologyConfig::ScaleFree { m0: 3, m: 2 });
        plan.network.seed = Some(1);
        plan.sources = 1;
        assert!(run_check(&plan, true).unwrap());
    }
}
