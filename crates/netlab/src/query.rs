//! Query filters shared by network-wide and per-node reads
//!
//! Every read defaults to the *alive* subgraph. A [`NodeFilter`] combines a
//! polymorphic kind predicate with a status predicate; results always keep
//! insertion order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeKind, Status};
use crate::{NetworkError, Result};

/// Status predicate for node queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Alive,
    Dead,
    Failed,
    All,
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::Alive => status == Status::Alive,
            StatusFilter::Dead => status == Status::Dead,
            StatusFilter::Failed => status == Status::Failed,
            StatusFilter::All => true,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alive" => Ok(Self::Alive),
            "dead" => Ok(Self::Dead),
            "failed" => Ok(Self::Failed),
            "all" => Ok(Self::All),
            other => {
                tracing::warn!(status = other, "Unrecognized status filter");
                Err(NetworkError::UnrecognizedStatus(other.to_string()))
            }
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Alive => Self::Alive,
            Status::Dead => Self::Dead,
            Status::Failed => Self::Failed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::Alive => "alive",
            StatusFilter::Dead => "dead",
            StatusFilter::Failed => "failed",
            StatusFilter::All => "all",
        };
        f.write_str(s)
    }
}

/// Combined kind and status predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    /// `None` matches every kind
    pub kind: Option<NodeKind>,
    pub status: StatusFilter,
}

impl NodeFilter {
    /// Alive nodes of any kind
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes of any kind and any status
    pub fn any() -> Self {
        Self::default().with_status(StatusFilter::All)
    }

    pub fn of_kind(kind: NodeKind) -> Self {
        Self {
            kind: Some(kind),
            status: StatusFilter::Alive,
        }
    }

    pub fn agents() -> Self {
        Self::of_kind(NodeKind::AGENT)
    }

    pub fn sources() -> Self {
        Self::of_kind(NodeKind::SOURCE)
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Set the status predicate from its textual name
    pub fn with_status_str(self, status: &str) -> Result<Self> {
        Ok(self.with_status(status.parse()?))
    }

    pub fn matches(&self, node: &Node) -> bool {
        self.status.matches(node.status)
            && self.kind.as_ref().map_or(true, |kind| node.is_a(kind))
    }
}

/// Which vectors a neighbor lookup follows
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Connection {
    /// Follow outgoing vectors to their destinations
    To,
    /// Follow incoming vectors back to their origins
    From,
    Either,
}

impl FromStr for Connection {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "to" => Ok(Self::To),
            "from" => Ok(Self::From),
            "either" => Ok(Self::Either),
            other => Err(NetworkError::Configuration(format!(
                "unknown connection '{}', expected to, from or either",
                other
            ))),
        }
    }
}

/// Which of a node's incident vectors to list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VectorDirection {
    #[default]
    All,
    Incoming,
    Outgoing,
}

impl FromStr for VectorDirection {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Self::All),
            "incoming" => Ok(Self::Incoming),
            "outgoing" => Ok(Self::Outgoing),
            other => Err(NetworkError::Configuration(format!(
                "unknown vector direction '{}', expected all, incoming or outgoing",
                other
            ))),
        }
    }
}

/// Orientation of the vectors created by a connect call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// origin -> target
    #[default]
    To,
    /// target -> origin
    From,
    /// One vector each way
    Both,
}
