//! Integration tests for types

#[cfg(test)]
mod tests {
    use rmkit_types::*;

    #[test]
    fn test_new_record_uses_no_val_count() {
        let record = ServiceResourceRecord::new("matlab", "flex1");
        assert_eq!(record.count, NO_VAL);
        assert_eq!(record.kind, ResourceKind::Unknown);
        assert!(record.clusters.is_empty());
    }

    #[test]
    fn test_condition_defaults_from_partial_json() {
        let cond: ServiceResourceCondition =
            serde_json::from_str(r#"{"names":["matlab"],"with_clusters":true}"#).unwrap();
        assert_eq!(cond.names, vec!["matlab".to_string()]);
        assert!(cond.with_clusters);
        assert!(cond.servers.is_empty());
        assert!(!cond.with_deleted);
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ResourceKind::License).unwrap();
        assert_eq!(json, r#""license""#);
        assert_eq!(ResourceKind::License.to_string(), "license");
    }

    #[test]
    fn test_call_site_macro_from_another_crate() {
        let site = call_site!();
        assert!(site.file.ends_with("integration.rs"));
        assert!(site.function.contains("test_call_site_macro_from_another_crate"));
    }

    #[test]
    fn test_sentinel_detection_in_float_fields() {
        let stored = f64::from(INFINITE);
        assert!(is_infinite(stored));
        assert!(!is_no_val(stored));
        assert!(fuzzy_equal(stored, INFINITE_F64));
        assert_eq!(INFINITE64, u64::MAX);
        assert_eq!(NO_VAL64, u64::MAX - 1);
    }
}
