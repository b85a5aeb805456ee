//! Accounting storage plugin interface

use async_trait::async_trait;
use rmkit_errors::AccountingError;
use rmkit_types::{
    ClusterResourceCondition, ClusterResourceRecord, ServiceResourceCondition,
    ServiceResourceRecord,
};

use crate::UserId;

/// Backend that persists and retrieves resource records.
///
/// Implementations own the authorization model; `uid` is forwarded exactly
/// as the caller supplied it.
#[async_trait]
pub trait AccountingStorage: Send + Sync {
    /// Handle to an open storage session, held by the caller.
    type Connection: Send + Sync;

    async fn add_service_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        records: Vec<ServiceResourceRecord>,
    ) -> Result<(), AccountingError>;

    async fn get_service_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
    ) -> Result<Vec<ServiceResourceRecord>, AccountingError>;

    /// Apply the set fields of `changes` to every match; returns the names
    /// of the modified resources.
    async fn modify_service_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
        changes: &ServiceResourceRecord,
    ) -> Result<Vec<String>, AccountingError>;

    /// Returns the names of the removed resources.
    async fn remove_service_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ServiceResourceCondition,
    ) -> Result<Vec<String>, AccountingError>;

    async fn add_cluster_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        records: Vec<ClusterResourceRecord>,
    ) -> Result<(), AccountingError>;

    async fn get_cluster_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
    ) -> Result<Vec<ClusterResourceRecord>, AccountingError>;

    async fn modify_cluster_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
        changes: &ClusterResourceRecord,
    ) -> Result<Vec<String>, AccountingError>;

    async fn remove_cluster_resources(
        &self,
        conn: &Self::Connection,
        uid: UserId,
        condition: &ClusterResourceCondition,
    ) -> Result<Vec<String>, AccountingError>;
}
