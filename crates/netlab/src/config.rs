//! Configuration for building networks

use serde::{Deserialize, Serialize};

use crate::network::Network;
use crate::topology::{Chain, DiscreteGenerational, FullyConnected, ScaleFree, Topology};
use crate::{Base, Result};

/// Which growth policy a network uses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TopologyConfig {
    /// No automatic wiring
    #[default]
    Base,
    Chain,
    FullyConnected,
    ScaleFree {
        #[serde(default = "default_m0")]
        m0: usize,
        #[serde(default = "default_m")]
        m: usize,
    },
    DiscreteGenerational {
        generations: usize,
        generation_size: usize,
        #[serde(default = "default_true")]
        initial_source: bool,
    },
}

fn default_m0() -> usize {
    4
}

fn default_m() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl TopologyConfig {
    /// Whether sources should join before agents so they are wired in
    pub fn sources_first(&self) -> bool {
        matches!(self, TopologyConfig::DiscreteGenerational { .. })
    }

    fn into_topology(self, seed: Option<u64>) -> Result<Box<dyn Topology>> {
        Ok(match self {
            TopologyConfig::Base => Box::new(Base),
            TopologyConfig::Chain => Box::new(Chain::new()),
            TopologyConfig::FullyConnected => Box::new(FullyConnected::new()),
            TopologyConfig::ScaleFree { m0, m } => match seed {
                Some(seed) => Box::new(ScaleFree::seeded(m0, m, seed)?),
                None => Box::new(ScaleFree::new(m0, m)?),
            },
            TopologyConfig::DiscreteGenerational {
                generations,
                generation_size,
                initial_source,
            } => Box::new(DiscreteGenerational::new(
                generations,
                generation_size,
                initial_source,
            )?),
        })
    }
}

/// Everything needed to construct a network
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NetworkConfig {
    /// Maximum number of nodes, any status
    #[serde(default)]
    pub max_size: Option<usize>,
    /// Seed for topologies that draw random numbers
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub topology: TopologyConfig,
}

impl NetworkConfig {
    pub fn new(topology: TopologyConfig) -> Self {
        Self {
            topology,
            ..Default::default()
        }
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a configuration from TOML
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Construct an empty network from this configuration
    pub fn build(&self) -> Result<Network> {
        let topology = self.topology.clone().into_topology(self.seed)?;
        let network = Network::with_topology(topology);
        Ok(match self.max_size {
            Some(max_size) => network.with_max_size(max_size),
            None => network,
        })
    }
}
