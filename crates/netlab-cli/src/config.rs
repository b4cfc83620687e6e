//! Growth plans for the CLI
//!
//! A plan is either read from a TOML file or assembled from flags.

use std::path::Path;

use anyhow::{Context, Result};
use netlab::{NetworkConfig, TopologyConfig};
use serde::{Deserialize, Serialize};

/// How to grow a network: its configuration plus the nodes to add
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthPlan {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default = "default_agents")]
    pub agents: usize,

    #[serde(default)]
    pub sources: usize,

    /// Number of alive agents to fail once growth is done
    #[serde(default)]
    pub fail: usize,
}

fn default_agents() -> usize {
    10
}

impl Default for GrowthPlan {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            agents: default_agents(),
            sources: 0,
            fail: 0,
        }
    }
}

impl GrowthPlan {
    pub fn new(topology: TopologyConfig) -> Self {
        Self {
            network: NetworkConfig::new(topology),
            ..Default::default()
        }
    }

    /// Load a plan from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid plan {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_plan() {
        let plan = GrowthPlan::parse(
            r#"
            agents = 16
            sources = 1

            [network]
            seed = 3

            [network.topology]
            kind = "discrete-generational"
            generations = 4
            generation_size = 4
            "#,
        )
        .unwrap();

        assert_eq!(plan.agents, 16);
        assert_eq!(plan.sources, 1);
        assert_eq!(plan.fail, 0);
        assert_eq!(plan.network.seed, Some(3));
        assert_eq!(
            plan.network.topology,
            TopologyConfig::DiscreteGenerational {
                generations: 4,
                generation_size: 4,
                initial_source: true,
            }
        );
    }

    #[test]
    fn test_empty_plan_uses_defaults() {
        assert_eq!(GrowthPlan::parse("").unwrap(), GrowthPlan::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "agents = 3\n[network.topology]\nkind = \"chain\"").unwrap();

        let plan = GrowthPlan::load(file.path()).unwrap();
        assert_eq!(plan.agents, 3);
        assert_eq!(plan.network.topology, TopologyConfig::Chain);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GrowthPlan::load(Path::new("/nonexistent/plan.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read plan"));
    }
}
