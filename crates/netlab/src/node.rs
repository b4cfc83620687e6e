//! Node model: typed, stateful vertices with a lifecycle

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::network::NetworkId;
use crate::{NetworkError, Result};

/// Unique identifier for a node
pub type NodeId = Uuid;

/// Type tag of a node.
///
/// Kinds form a hierarchy written as a `/`-separated path rooted at `node`,
/// e.g. `node/agent/replicator`. A kind *is a* another kind when the other
/// kind's path is a whole-segment prefix of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeKind(Cow<'static, str>);

impl NodeKind {
    pub const NODE: NodeKind = NodeKind(Cow::Borrowed("node"));
    pub const AGENT: NodeKind = NodeKind(Cow::Borrowed("node/agent"));
    pub const REPLICATOR_AGENT: NodeKind = NodeKind(Cow::Borrowed("node/agent/replicator"));
    pub const SOURCE: NodeKind = NodeKind(Cow::Borrowed("node/source"));
    pub const RANDOM_BINARY_STRING_SOURCE: NodeKind =
        NodeKind(Cow::Borrowed("node/source/random_binary_string"));

    const SEPARATOR: char = '/';

    /// Derive a subtype of this kind
    pub fn subtype(&self, name: &str) -> Result<NodeKind> {
        if !is_valid_segment(name) {
            return Err(NetworkError::InvalidKind(format!(
                "'{}' is not a valid kind segment",
                name
            )));
        }
        Ok(NodeKind(Cow::Owned(format!(
            "{}{}{}",
            self.0,
            Self::SEPARATOR,
            name
        ))))
    }

    /// Polymorphic match: true if `self` equals `ancestor` or descends from it
    pub fn is_a(&self, ancestor: &NodeKind) -> bool {
        match self.0.strip_prefix(ancestor.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with(Self::SEPARATOR),
            None => false,
        }
    }

    pub fn parent(&self) -> Option<NodeKind> {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(parent, _)| NodeKind(Cow::Owned(parent.to_string())))
    }

    /// Last path segment, e.g. `agent` for `node/agent`
    pub fn name(&self) -> &str {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(_, name)| name)
            .unwrap_or(self.0.as_ref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_agent(&self) -> bool {
        self.is_a(&Self::AGENT)
    }

    pub fn is_source(&self) -> bool {
        self.is_a(&Self::SOURCE)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::NODE
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for NodeKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        let mut segments = s.split(Self::SEPARATOR);
        if segments.next() != Some("node") {
            return Err(NetworkError::InvalidKind(format!(
                "'{}' must be rooted at 'node'",
                s
            )));
        }
        if let Some(bad) = segments.find(|seg| !is_valid_segment(seg)) {
            return Err(NetworkError::InvalidKind(format!(
                "'{}' has invalid segment '{}'",
                s, bad
            )));
        }
        Ok(NodeKind(Cow::Owned(s.to_string())))
    }
}

impl TryFrom<String> for NodeKind {
    type Error = NetworkError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.0.into_owned()
    }
}

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Alive,
    Dead,
    Failed,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Alive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Alive => "alive",
            Status::Dead => "dead",
            Status::Failed => "failed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vertex in an experiment network.
///
/// The id is minted by [`Node::new`] and a clone keeps it, so a clone is the
/// same node, not a new one. A network rejects any node carrying an id it
/// already holds or a network reference. Two networks do not see each
/// other's ids: registering clones of one unregistered node with two
/// different networks gives both the same id. Build a fresh node per network
/// instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub status: Status,
    pub network: Option<NetworkId>,
    pub created_at: DateTime<Utc>,
    pub time_of_death: Option<DateTime<Utc>>,
    pub metadata: Option<serde_json::Value>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            status: Status::Alive,
            network: None,
            created_at: Utc::now(),
            time_of_death: None,
            metadata: None,
        }
    }

    pub fn agent() -> Self {
        Self::new(NodeKind::AGENT)
    }

    pub fn source() -> Self {
        Self::new(NodeKind::SOURCE)
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Register this node with `network`, returning its id
    pub fn add_to(self, network: &mut crate::Network) -> Result<NodeId> {
        network.add(self)
    }

    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    pub fn is_a(&self, kind: &NodeKind) -> bool {
        self.kind.is_a(kind)
    }

    /// Transition `alive -> dead`
    pub fn die(&mut self) -> Result<()> {
        self.transition(Status::Dead)
    }

    /// Transition `alive -> failed`
    pub fn fail(&mut self) -> Result<()> {
        self.transition(Status::Failed)
    }

    fn transition(&mut self, to: Status) -> Result<()> {
        if self.status.is_terminal() {
            tracing::warn!(
                node_id = %self.id,
                from = %self.status,
                to = %to,
                "Rejected lifecycle transition out of a terminal status"
            );
            return Err(NetworkError::InvalidLifecycleTransition {
                node_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.time_of_death = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_hierarchy() {
        assert!(NodeKind::AGENT.is_a(&NodeKind::NODE));
        assert!(NodeKind::REPLICATOR_AGENT.is_a(&NodeKind::AGENT));
        assert!(NodeKind::AGENT.is_a(&NodeKind::AGENT));
        assert!(!NodeKind::AGENT.is_a(&NodeKind::REPLICATOR_AGENT));
        assert!(!NodeKind::SOURCE.is_a(&NodeKind::AGENT));
        assert!(NodeKind::RANDOM_BINARY_STRING_SOURCE.is_source());
    }

    #[test]
    fn test_prefix_match_respects_segments() {
        let agents = NodeKind::NODE.subtype("agents").unwrap();
        assert!(!agents.is_a(&NodeKind::AGENT));
        assert_eq!(agents.parent(), Some(NodeKind::NODE));
        assert_eq!(agents.name(), "agents");
    }

    #[test]
    fn test_kind_parsing() {
        let kind: NodeKind = "node/agent/replicator".parse().unwrap();
        assert_eq!(kind, NodeKind::REPLICATOR_AGENT);
        assert!("agent".parse::<NodeKind>().is_err());
        assert!("node//agent".parse::<NodeKind>().is_err());
        assert!(NodeKind::AGENT.subtype("Bad Name").is_err());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut node = Node::agent();
        assert!(node.is_alive());
        assert!(node.time_of_death.is_none());

        node.fail().unwrap();
        assert_eq!(node.status, Status::Failed);
        assert!(node.time_of_death.is_some());

        let err = node.die().unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InvalidLifecycleTransition {
                from: Status::Failed,
                to: Status::Dead,
                ..
            }
        ));
        assert_eq!(node.status, Status::Failed);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&Status::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
        let kind = serde_json::to_string(&NodeKind::SOURCE).unwrap();
        assert_eq!(kind, "\"node/source\"");
    }
}
