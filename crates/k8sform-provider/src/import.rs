//! Import identifier parsing

use crate::error::{ProviderError, Result};

/// Identity parsed from an import ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub namespace: Option<String>,
    pub name: String,
}

/// Parse `namespace/name` (namespaced types) or `name` (cluster-scoped types)
///
/// Every segment must be non-empty and the segment count must match the
/// scope exactly.
pub fn parse_import_id(id: &str, namespaced: bool) -> Result<ImportId> {
    let parts: Vec<&str> = id.split('/').collect();

    match (namespaced, parts.as_slice()) {
        (true, [namespace, name]) if !namespace.is_empty() && !name.is_empty() => Ok(ImportId {
            namespace: Some(namespace.to_string()),
            name: name.to_string(),
        }),
        (false, [name]) if !name.is_empty() => Ok(ImportId {
            namespace: None,
            name: name.to_string(),
        }),
        _ => Err(ProviderError::InvalidImportId {
            id: id.to_string(),
            expected: if namespaced {
                "expected the format 'namespace/name'".to_string()
            } else {
                "expected the format 'name'".to_string()
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced() {
        let id = parse_import_id("kube-system/vpa-recommender", true).unwrap();
        assert_eq!(id.namespace.as_deref(), Some("kube-system"));
        assert_eq!(id.name, "vpa-recommender");
    }

    #[test]
    fn test_namespaced_rejects_other_shapes() {
        for id in ["", "name", "a/b/c", "/name", "ns/", "/", "a//b"] {
            let err = parse_import_id(id, true).unwrap_err();
            assert!(
                matches!(err, ProviderError::InvalidImportId { .. }),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_cluster_scoped() {
        let id = parse_import_id("cluster", false).unwrap();
        assert_eq!(id.namespace, None);
        assert_eq!(id.name, "cluster");

        for id in ["", "ns/cluster", "cluster/"] {
            assert!(parse_import_id(id, false).is_err(), "{id:?} should be rejected");
        }
    }
}
