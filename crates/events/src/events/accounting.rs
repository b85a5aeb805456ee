//! Accounting pass-through events

use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Resource category a request addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Service,
    Cluster,
}

impl std::fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service => write!(f, "service resource"),
            Self::Cluster => write!(f, "cluster resource"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AccountingEvent {
    /// Request handed to the accounting storage plugin
    Delegated {
        operation: String,
        category: ResourceCategory,
        uid: u32,
    },

    /// Plugin answered successfully
    Completed {
        operation: String,
        category: ResourceCategory,
        /// Number of records or names returned, if the call returns a list
        returned: Option<usize>,
    },

    /// Plugin returned an error (forwarded to the caller unchanged)
    Failed {
        operation: String,
        category: ResourceCategory,
        failure: FailureContext,
    },
}
