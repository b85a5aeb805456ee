#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Resource accounting entry points.
//!
//! [`ResourceFunctions`] is the public face of the accounting storage plugin
//! for service and cluster resources. Every call is handed to the
//! [`AccountingStorage`] backend unchanged and its answer handed back
//! unchanged; the only thing added on the way is an [`AccountingEvent`] for
//! each request.

mod storage;

pub use storage::AccountingStorage;

use std::fmt;

use rmkit_errors::AccountingError;
use rmkit_events::{
    AccountingEvent, AppEvent, EventEmitter, EventSender, FailureContext, ResourceCategory,
};
use rmkit_types::{
    ClusterResourceCondition, ClusterResourceRecord, ServiceResourceCondition,
    ServiceResourceRecord,
};
use serde::{Deserialize, Serialize};

/// Identifier of the user a request is made on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl UserId {
    /// The real uid of this process.
    #[must_use]
    pub fn current() -> Self {
        // SAFETY: getuid has no preconditions and cannot fail.
        #[allow(unsafe_code)]
        let uid = unsafe { libc::getuid() };
        Self(uid)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Size of a plugin answer, for the completion event.
trait Returned {
    fn returned(&self) -> Option<usize>;
}

impl Returned for () {
    fn returned(&self) -> Option<usize> {
        None
    }
}

impl<T> Returned for Vec<T> {
    fn returned(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Service and cluster resource operations over a storage backend.
pub struct ResourceFunctions<S: AccountingStorage> {
    storage: S,
    event_sender: Option<EventSender>,
}

impl<S: AccountingStorage> ResourceFunctions<S> {
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            event_sender: None,
        }
    }

    /// Report every request on `sender`.
    #[must_use]
    pub fn with_event_sender(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn delegated(&self, operation: &str, category: ResourceCategory, uid: UserId) {
        tracing::debug!(operation, %category, uid = uid.0, "delegating to accounting storage");
        self.emit(AppEvent::Accounting(AccountingEvent::Delegated {
            operation: operation.to_string(),
            category,
            uid: uid.0,
        }));
    }

    fn finished<T: Returned>(
        &self,
        operation: &str,
        category: ResourceCategory,
        result: Result<T, AccountingError>,
    ) -> Result<T, AccountingError> {
        let event = match &result {
            Ok(value) => AccountingEvent::Completed {
                operation: operation.to_string(),
                category,
                returned: value.returned(),
            },
            Err(err) => {
                tracing::warn!(
                    operation,
                    %category,
                    error = %err,
                    "accounting storage refused request"
                );
                AccountingEvent::Failed {
                    operation: operation.to_string(),
                    category,
                    failure: FailureContext::from_error(err),
                }
            }
        };
        self.emit(AppEvent::Accounting(event));
        result
    }

    /// Add service resources.
    ///
    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn res_add(
        &self,
        conn: &S::Connection,
        uid: UserId,
        records: Vec<ServiceResourceRecord>,
    ) -> Result<(), AccountingError> {
        const OP: &str = "res_add";
        self.delegated(OP, ResourceCategory::Service, uid);
        let result = self.storage.add_service_resources(conn, uid, records).await;
        self.finished(OP, ResourceCategory::Service, result)
    }

    /// Service resources matching `condition`.
    ///
    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn res_get(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
    ) -> Result<Vec<ServiceResourceRecord>, AccountingError> {
        const OP: &str = "res_get";
        self.delegated(OP, ResourceCategory::Service, uid);
        let result = self.storage.get_service_resources(conn, uid, condition).await;
        self.finished(OP, ResourceCategory::Service, result)
    }

    /// Modify matching service resources; returns the names changed.
    ///
    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn res_modify(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
        changes: &ServiceResourceRecord,
    ) -> Result<Vec<String>, AccountingError> {
        const OP: &str = "res_modify";
        self.delegated(OP, ResourceCategory::Service, uid);
        let result = self
            .storage
            .modify_service_resources(conn, uid, condition, changes)
            .await;
        self.finished(OP, ResourceCategory::Service, result)
    }

    /// Remove matching service resources; returns the names removed.
    ///
    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn res_remove(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
    ) -> Result<Vec<String>, AccountingError> {
        const OP: &str = "res_remove";
        self.delegated(OP, ResourceCategory::Service, uid);
        let result = self
            .storage
            .remove_service_resources(conn, uid, condition)
            .await;
        self.finished(OP, ResourceCategory::Service, result)
    }

    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn clus_res_add(
        &self,
        conn: &S::Connection,
        uid: UserId,
        records: Vec<ClusterResourceRecord>,
    ) -> Result<(), AccountingError> {
        const OP: &str = "clus_res_add";
        self.delegated(OP, ResourceCategory::Cluster, uid);
        let result = self.storage.add_cluster_resources(conn, uid, records).await;
        self.finished(OP, ResourceCategory::Cluster, result)
    }

    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn clus_res_get(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
    ) -> Result<Vec<ClusterResourceRecord>, AccountingError> {
        const OP: &str = "clus_res_get";
        self.delegated(OP, ResourceCategory::Cluster, uid);
        let result = self.storage.get_cluster_resources(conn, uid, condition).await;
        self.finished(OP, ResourceCategory::Cluster, result)
    }

    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn clus_res_modify(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
        changes: &ClusterResourceRecord,
    ) -> Result<Vec<String>, AccountingError> {
        const OP: &str = "clus_res_modify";
        self.delegated(OP, ResourceCategory::Cluster, uid);
        let result = self
            .storage
            .modify_cluster_resources(conn, uid, condition, changes)
            .await;
        self.finished(OP, ResourceCategory::Cluster, result)
    }

    /// # Errors
    ///
    /// Returns the storage backend's error unchanged.
    pub async fn clus_res_remove(
        &self,
        conn: &S::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
    ) -> Result<Vec<String>, AccountingError> {
        const OP: &str = "clus_res_remove";
        self.delegated(OP, ResourceCategory::Cluster, uid);
        let result = self
            .storage
            .remove_cluster_resources(conn, uid, condition)
            .await;
        self.finished(OP, ResourceCategory::Cluster, result)
    }
}

impl<S: AccountingStorage> EventEmitter for ResourceFunctions<S> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}
