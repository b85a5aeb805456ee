//! Integration tests for accounting

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rmkit_accounting::*;
    use rmkit_errors::AccountingError;
    use rmkit_events::{AccountingEvent, AppEvent, ResourceCategory};
    use rmkit_types::{
        ClusterResourceCondition, ClusterResourceRecord, ServiceResourceCondition,
        ServiceResourceRecord,
    };

    /// Connection handle that remembers which session it belongs to
    struct Session(&'static str);

    #[derive(Debug, PartialEq)]
    struct Call {
        operation: &'static str,
        session: &'static str,
        uid: UserId,
    }

    #[derive(Default)]
    struct RecordingStorage {
        calls: Mutex<Vec<Call>>,
        service: Vec<ServiceResourceRecord>,
        refuse: Option<AccountingError>,
    }

    impl RecordingStorage {
        fn record(
            &self,
            operation: &'static str,
            conn: &Session,
            uid: UserId,
        ) -> Result<(), AccountingError> {
            self.calls.lock().unwrap().push(Call {
                operation,
                session: conn.0,
                uid,
            });
            match &self.refuse {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl AccountingStorage for RecordingStorage {
        type Connection = Session;

        async fn add_service_resources(
            &self,
            conn: &Session,
            uid: UserId,
            _records: Vec<ServiceResourceRecord>,
        ) -> Result<(), AccountingError> {
            self.record("add_service_resources", conn, uid)
        }

        async fn get_service_resources(
            &self,
            conn: &Session,
            uid: UserId,
            condition: &ServiceResourceCondition,
        ) -> Result<Vec<ServiceResourceRecord>, AccountingError> {
            self.record("get_service_resources", conn, uid)?;
            Ok(self
                .service
                .iter()
                .filter(|r| condition.names.is_empty() || condition.names.contains(&r.name))
                .cloned()
                .collect())
        }

        async fn modify_service_resources(
            &self,
            conn: &Session,
            uid: UserId,
            _condition: &ServiceResourceCondition,
            changes: &ServiceResourceRecord,
        ) -> Result<Vec<String>, AccountingError> {
            self.record("modify_service_resources", conn, uid)?;
            Ok(vec![changes.name.clone()])
        }

        async fn remove_service_resources(
            &self,
            conn: &Session,
            uid: UserId,
            condition: &ServiceResourceCondition,
        ) -> Result<Vec<String>, AccountingError> {
            self.record("remove_service_resources", conn, uid)?;
            Ok(condition.names.clone())
        }

        async fn add_cluster_resources(
            &self,
            conn: &Session,
            uid: UserId,
            _records: Vec<ClusterResourceRecord>,
        ) -> Result<(), AccountingError> {
            self.record("add_cluster_resources", conn, uid)
        }

        async fn get_cluster_resources(
            &self,
            conn: &Session,
            uid: UserId,
            _condition: &ClusterResourceCondition,
        ) -> Result<Vec<ClusterResourceRecord>, AccountingError> {
            self.record("get_cluster_resources", conn, uid)?;
            Ok(Vec::new())
        }

        async fn modify_cluster_resources(
            &self,
            conn: &Session,
            uid: UserId,
            _condition: &ClusterResourceCondition,
            changes: &ClusterResourceRecord,
        ) -> Result<Vec<String>, AccountingError> {
            self.record("modify_cluster_resources", conn, uid)?;
            Ok(vec![changes.cluster.clone()])
        }

        async fn remove_cluster_resources(
            &self,
            conn: &Session,
            uid: UserId,
            condition: &ClusterResourceCondition,
        ) -> Result<Vec<String>, AccountingError> {
            self.record("remove_cluster_resources", conn, uid)?;
            Ok(condition.clusters.clone())
        }
    }

    fn licenses() -> Vec<ServiceResourceRecord> {
        vec![
            ServiceResourceRecord::new("matlab", "flex1"),
            ServiceResourceRecord::new("ansys", "flex2"),
        ]
    }

    fn allotment() -> ClusterResourceRecord {
        ClusterResourceRecord {
            name: "matlab".to_string(),
            server: "flex1".to_string(),
            cluster: "alpine".to_string(),
            percent_allowed: 50,
        }
    }

    #[tokio::test]
    async fn test_every_call_reaches_the_matching_entry_point() {
        let functions = ResourceFunctions::new(RecordingStorage::default());
        let conn = Session("primary");
        let uid = UserId(1000);
        let service = ServiceResourceCondition::default();
        let cluster = ClusterResourceCondition::default();

        functions.res_add(&conn, uid, licenses()).await.unwrap();
        functions.res_get(&conn, uid, &service).await.unwrap();
        functions
            .res_modify(&conn, uid, &service, &licenses()[0])
            .await
            .unwrap();
        functions.res_remove(&conn, uid, &service).await.unwrap();
        functions.clus_res_add(&conn, uid, vec![allotment()]).await.unwrap();
        functions.clus_res_get(&conn, uid, &cluster).await.unwrap();
        functions
            .clus_res_modify(&conn, uid, &cluster, &allotment())
            .await
            .unwrap();
        functions.clus_res_remove(&conn, uid, &cluster).await.unwrap();

        let calls = functions.storage().calls.lock().unwrap();
        let operations: Vec<&str> = calls.iter().map(|c| c.operation).collect();
        assert_eq!(
            operations,
            vec![
                "add_service_resources",
                "get_service_resources",
                "modify_service_resources",
                "remove_service_resources",
                "add_cluster_resources",
                "get_cluster_resources",
                "modify_cluster_resources",
                "remove_cluster_resources",
            ]
        );
        assert!(calls.iter().all(|c| c.session == "primary" && c.uid == uid));
    }

    #[tokio::test]
    async fn test_results_pass_through_unchanged() {
        let storage = RecordingStorage {
            service: licenses(),
            ..RecordingStorage::default()
        };
        let functions = ResourceFunctions::new(storage);
        let conn = Session("primary");

        let all = functions
            .res_get(&conn, UserId(0), &ServiceResourceCondition::default())
            .await
            .unwrap();
        assert_eq!(all, licenses());

        let condition = ServiceResourceCondition {
            names: vec!["ansys".to_string()],
            ..ServiceResourceCondition::default()
        };
        let matched = functions.res_get(&conn, UserId(0), &condition).await.unwrap();
        assert_eq!(matched, vec![licenses()[1].clone()]);

        let removed = functions
            .res_remove(&conn, UserId(0), &condition)
            .await
            .unwrap();
        assert_eq!(removed, vec!["ansys".to_string()]);
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let refusal = AccountingError::PermissionDenied {
            uid: 1000,
            operation: "remove".to_string(),
        };
        let storage = RecordingStorage {
            refuse: Some(refusal.clone()),
            ..RecordingStorage::default()
        };
        let (tx, mut rx) = rmkit_events::channel();
        let functions = ResourceFunctions::new(storage).with_event_sender(tx);

        let err = functions
            .clus_res_remove(&Session("s"), UserId(1000), &ClusterResourceCondition::default())
            .await
            .unwrap_err();
        assert_eq!(err, refusal);

        let delegated = rx.recv().await.unwrap();
        assert!(matches!(
            delegated.event,
            AppEvent::Accounting(AccountingEvent::Delegated {
                category: ResourceCategory::Cluster,
                uid: 1000,
                ..
            })
        ));
        let failed = rx.recv().await.unwrap();
        match failed.event {
            AppEvent::Accounting(AccountingEvent::Failed { operation, failure, .. }) => {
                assert_eq!(operation, "clus_res_remove");
                assert_eq!(failure.code.as_deref(), Some("accounting.permission_denied"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_completion_reports_returned_count() {
        let storage = RecordingStorage {
            service: licenses(),
            ..RecordingStorage::default()
        };
        let (tx, mut rx) = rmkit_events::channel();
        let functions = ResourceFunctions::new(storage).with_event_sender(tx);

        functions
            .res_get(&Session("s"), UserId(7), &ServiceResourceCondition::default())
            .await
            .unwrap();
        functions
            .res_add(&Session("s"), UserId(7), licenses())
            .await
            .unwrap();

        let mut returned = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let AppEvent::Accounting(AccountingEvent::Completed { returned: count, .. }) =
                message.event
            {
                returned.push(count);
            }
        }
        assert_eq!(returned, vec![Some(2), None]);
    }

    #[test]
    fn test_current_uid_matches_process() {
        #[allow(unsafe_code)]
        let expected = unsafe { libc::getuid() };
        assert_eq!(UserId::current(), UserId(expected));
        assert_eq!(UserId(42).to_string(), "42");
    }
}
