//! Accounting resource records and query conditions
//!
//! A service resource (for example a license served by a license server) is
//! tracked once and then shared out to clusters. Each cluster's share is a
//! cluster resource.

use serde::{Deserialize, Serialize};

use crate::sentinel::NO_VAL;

/// What a service resource represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Unknown,
    License,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::License => write!(f, "license"),
        }
    }
}

/// A cluster's allotment of a service resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterResourceRecord {
    /// Resource name the allotment belongs to
    pub name: String,
    /// Server providing the resource
    pub server: String,
    pub cluster: String,
    /// Share of the resource count this cluster may use, in percent
    pub percent_allowed: u16,
}

/// A service resource as stored by accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResourceRecord {
    pub id: Option<u32>,
    pub name: String,
    pub server: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    /// Total count available; `NO_VAL` when left unchanged by a modify
    pub count: u32,
    pub kind: ResourceKind,
    #[serde(default)]
    pub flags: u32,
    /// Sum of all cluster allotments, in percent
    #[serde(default)]
    pub percent_used: u16,
    #[serde(default)]
    pub clusters: Vec<ClusterResourceRecord>,
}

impl ServiceResourceRecord {
    /// Create a record with only the identifying fields set.
    #[must_use]
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            server: server.into(),
            description: None,
            manager: None,
            count: NO_VAL,
            kind: ResourceKind::Unknown,
            flags: 0,
            percent_used: 0,
            clusters: Vec::new(),
        }
    }
}

/// Filter for service resource queries. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceResourceCondition {
    pub ids: Vec<u32>,
    pub names: Vec<String>,
    pub servers: Vec<String>,
    pub descriptions: Vec<String>,
    pub managers: Vec<String>,
    pub kinds: Vec<ResourceKind>,
    pub clusters: Vec<String>,
    pub percent_allowed: Vec<u16>,
    pub with_clusters: bool,
    pub with_deleted: bool,
}

/// Filter for cluster resource queries. Empty lists match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterResourceCondition {
    pub names: Vec<String>,
    pub servers: Vec<String>,
    pub clusters: Vec<String>,
    pub percent_allowed: Vec<u16>,
    pub with_deleted: bool,
}
