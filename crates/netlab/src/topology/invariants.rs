//! Structural invariants - rules a grown network must always satisfy
//!
//! The network's own operations keep these true; the checker exists to
//! validate networks rebuilt from snapshots and to report on grown ones.

use serde::{Deserialize, Serialize};

use crate::network::{Network, NetworkSnapshot};
use crate::node::{NodeId, Status};
use crate::vector::VectorId;

/// A violation of a structural invariant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantViolation {
    pub invariant_name: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub affected_nodes: Vec<NodeId>,
    pub affected_vectors: Vec<VectorId>,
}

/// Severity levels for invariant violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    /// Informational - doesn't break anything but worth noting
    Info,
    /// Warning - could cause issues, should be addressed
    Warning,
    /// Error - violates a required invariant
    Error,
    /// Critical - the network is in an invalid state
    Critical,
}

/// Invariant checker for network validation
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Enable strict mode (all warnings become errors)
    strict_mode: bool,
}

impl InvariantChecker {
    pub fn new() -> Self {
        Self { strict_mode: false }
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn check_all(&self, network: &Network) -> Vec<InvariantViolation> {
        self.check_snapshot(&NetworkSnapshot::from(network))
    }

    /// Check all invariants against a snapshot
    pub fn check_snapshot(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        violations.extend(self.check_vector_endpoints(snapshot));
        violations.extend(self.check_network_references(snapshot));
        violations.extend(self.check_no_self_links(snapshot));
        violations.extend(self.check_sources_receive_nothing(snapshot));
        violations.extend(self.check_time_of_death(snapshot));

        if self.strict_mode {
            for v in &mut violations {
                if v.severity == ViolationSeverity::Warning {
                    v.severity = ViolationSeverity::Error;
                }
            }
        }

        violations
    }

    /// Check that all vectors reference nodes of the network
    fn check_vector_endpoints(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        let known = |id: &NodeId| snapshot.nodes.iter().any(|n| n.id == *id);

        snapshot
            .vectors
            .iter()
            .filter_map(|vector| {
                let missing: Vec<NodeId> = [vector.origin, vector.destination]
                    .into_iter()
                    .filter(|id| !known(id))
                    .collect();
                (!missing.is_empty()).then(|| InvariantViolation {
                    invariant_name: "vector_endpoints_exist".to_string(),
                    severity: ViolationSeverity::Critical,
                    message: format!(
                        "Vector {} references nodes outside the network: {:?}",
                        vector.id, missing
                    ),
                    affected_nodes: missing,
                    affected_vectors: vec![vector.id],
                })
            })
            .collect()
    }

    /// Check that nodes and vectors point back at the owning network
    fn check_network_references(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        for node in &snapshot.nodes {
            if node.network != Some(snapshot.network_id) {
                violations.push(InvariantViolation {
                    invariant_name: "node_network_reference".to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!(
                        "Node {} belongs to {:?}, not {}",
                        node.id, node.network, snapshot.network_id
                    ),
                    affected_nodes: vec![node.id],
                    affected_vectors: vec![],
                });
            }
        }

        for vector in &snapshot.vectors {
            if vector.network != snapshot.network_id {
                violations.push(InvariantViolation {
                    invariant_name: "vector_network_reference".to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!(
                        "Vector {} belongs to {}, not {}",
                        vector.id, vector.network, snapshot.network_id
                    ),
                    affected_nodes: vec![vector.origin, vector.destination],
                    affected_vectors: vec![vector.id],
                });
            }
        }

        violations
    }

    fn check_no_self_links(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        snapshot
            .vectors
            .iter()
            .filter(|v| v.origin == v.destination)
            .map(|v| InvariantViolation {
                invariant_name: "no_self_links".to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("Vector {} is a self-link on node {}", v.id, v.origin),
                affected_nodes: vec![v.origin],
                affected_vectors: vec![v.id],
            })
            .collect()
    }

    fn check_sources_receive_nothing(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        snapshot
            .vectors
            .iter()
            .filter(|v| {
                snapshot
                    .nodes
                    .iter()
                    .any(|n| n.id == v.destination && n.kind.is_source())
            })
            .map(|v| InvariantViolation {
                invariant_name: "sources_receive_nothing".to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Vector {} points into source {}", v.id, v.destination),
                affected_nodes: vec![v.destination],
                affected_vectors: vec![v.id],
            })
            .collect()
    }

    fn check_time_of_death(&self, snapshot: &NetworkSnapshot) -> Vec<InvariantViolation> {
        snapshot
            .nodes
            .iter()
            .filter(|n| (n.status != Status::Alive) != n.time_of_death.is_some())
            .map(|n| InvariantViolation {
                invariant_name: "time_of_death_matches_status".to_string(),
                severity: ViolationSeverity::Info,
                message: format!(
                    "Node {} is {} but time_of_death is {:?}",
                    n.id, n.status, n.time_of_death
                ),
                affected_nodes: vec![n.id],
                affected_vectors: vec![],
            })
            .collect()
    }
}
