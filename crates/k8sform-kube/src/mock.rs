//! Mock object client for testing
//!
//! Objects live in memory, keyed by apiVersion, kind, namespace and name.
//! Server-side apply is approximated: the manifest replaces the stored
//! object while uid is kept and resourceVersion/generation advance.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::client::{ApplyOptions, DeleteOptions, ObjectClient};
use crate::error::{KubeError, Result};
use crate::target::ObjectRef;

type ObjectKey = (String, String, Option<String>, String);

/// Verb of an object client call, used for failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Apply,
    Delete,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub applies: usize,
    pub deletes: usize,
}

impl OperationCounts {
    pub fn total(&self) -> usize {
        self.gets + self.applies + self.deletes
    }
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    code: u16,
    reason: String,
    message: String,
}

/// In-memory object client for testing
#[derive(Clone, Default)]
pub struct MockObjectClient {
    store: Arc<RwLock<BTreeMap<ObjectKey, Value>>>,
    operations: Arc<RwLock<OperationCounts>>,
    failures: Arc<RwLock<HashMap<Verb, InjectedFailure>>>,
    last_apply: Arc<RwLock<Option<ApplyOptions>>>,
    next_uid: Arc<RwLock<u64>>,
}

impl MockObjectClient {
    /// Create a new empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object as if it already existed in the cluster
    pub fn insert(&self, object: &ObjectRef, value: Value) {
        self.store.write().unwrap().insert(key(object), value);
    }

    /// Stored object, bypassing operation counting
    pub fn object(&self, object: &ObjectRef) -> Option<Value> {
        self.store.read().unwrap().get(&key(object)).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.store.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make every call with `verb` fail with the given API status
    pub fn fail_with(&self, verb: Verb, code: u16, reason: &str, message: &str) {
        self.failures.write().unwrap().insert(
            verb,
            InjectedFailure {
                code,
                reason: reason.to_string(),
                message: message.to_string(),
            },
        );
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.failures.write().unwrap().clear();
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// Options passed to the most recent apply
    pub fn last_apply_options(&self) -> Option<ApplyOptions> {
        self.last_apply.read().unwrap().clone()
    }

    fn check_failure(&self, verb: Verb) -> Result<()> {
        match self.failures.read().unwrap().get(&verb) {
            Some(failure) => Err(KubeError::Status {
                code: failure.code,
                reason: failure.reason.clone(),
                message: failure.message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn allocate_uid(&self) -> String {
        let mut next = self.next_uid.write().unwrap();
        *next += 1;
        format!("00000000-0000-0000-0000-{:012}", *next)
    }
}

fn key(object: &ObjectRef) -> ObjectKey {
    (
        object.api.api_version(),
        object.api.kind.clone(),
        object.namespace.clone(),
        object.name.clone(),
    )
}

fn metadata_field<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    value.get("metadata").and_then(|m| m.get(field))
}

#[async_trait]
impl ObjectClient for MockObjectClient {
    async fn get(&self, object: &ObjectRef) -> Result<Option<Value>> {
        self.operations.write().unwrap().gets += 1;
        self.check_failure(Verb::Get)?;
        Ok(self.object(object))
    }

    async fn apply(
        &self,
        object: &ObjectRef,
        manifest: &Value,
        options: &ApplyOptions,
    ) -> Result<Value> {
        self.operations.write().unwrap().applies += 1;
        *self.last_apply.write().unwrap() = Some(options.clone());
        self.check_failure(Verb::Apply)?;

        if !manifest.is_object() {
            return Err(KubeError::InvalidObject(
                "manifest must be a mapping".to_string(),
            ));
        }

        let existing = self.object(object);
        let mut applied = manifest.clone();

        let (uid, generation) = match &existing {
            Some(current) => {
                let uid = metadata_field(current, "uid")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| self.allocate_uid());
                let generation = metadata_field(current, "generation")
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                let changed = current.get("spec") != manifest.get("spec");
                (uid, if changed { generation + 1 } else { generation })
            }
            None => (self.allocate_uid(), 1),
        };
        let resource_version = (self.operation_counts().applies as u64).to_string();

        let metadata = applied
            .as_object_mut()
            .map(|obj| obj.entry("metadata").or_insert_with(|| json!({})));
        if let Some(Value::Object(metadata)) = metadata {
            metadata.insert("name".into(), json!(object.name));
            if let Some(ns) = &object.namespace {
                metadata.insert("namespace".into(), json!(ns));
            }
            metadata.insert("uid".into(), json!(uid));
            metadata.insert("resourceVersion".into(), json!(resource_version));
            metadata.insert("generation".into(), json!(generation));
        }

        if !options.dry_run {
            self.insert(object, applied.clone());
        }
        Ok(applied)
    }

    async fn delete(&self, object: &ObjectRef, _options: &DeleteOptions) -> Result<bool> {
        self.operations.write().unwrap().deletes += 1;
        self.check_failure(Verb::Delete)?;
        Ok(self.store.write().unwrap().remove(&key(object)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ApiTarget;

    fn vpa(name: &str) -> ObjectRef {
        ApiTarget {
            group: "autoscaling.k8s.io".into(),
            version: "v1".into(),
            kind: "VerticalPodAutoscaler".into(),
            plural: "verticalpodautoscalers".into(),
            namespaced: true,
        }
        .object(Some("default"), name)
    }

    fn manifest(mode: &str) -> Value {
        json!({
            "apiVersion": "autoscaling.k8s.io/v1",
            "kind": "VerticalPodAutoscaler",
            "metadata": {"name": "web", "namespace": "default"},
            "spec": {"updatePolicy": {"updateMode": mode}}
        })
    }

    #[tokio::test]
    async fn test_apply_then_get() {
        let client = MockObjectClient::new();
        let target = vpa("web");

        assert!(client.get(&target).await.unwrap().is_none());

        let applied = client
            .apply(&target, &manifest("Off"), &ApplyOptions::default())
            .await
            .unwrap();
        assert_eq!(applied["metadata"]["generation"], 1);
        assert!(applied["metadata"]["uid"].is_string());

        let fetched = client.get(&target).await.unwrap().unwrap();
        assert_eq!(fetched, applied);

        let counts = client.operation_counts();
        assert_eq!(counts.gets, 2);
        assert_eq!(counts.applies, 1);
    }

    #[tokio::test]
    async fn test_reapply_keeps_uid_and_bumps_generation() {
        let client = MockObjectClient::new();
        let target = vpa("web");
        let options = ApplyOptions::default();

        let first = client.apply(&target, &manifest("Off"), &options).await.unwrap();
        let same = client.apply(&target, &manifest("Off"), &options).await.unwrap();
        let changed = client.apply(&target, &manifest("Auto"), &options).await.unwrap();

        assert_eq!(first["metadata"]["uid"], changed["metadata"]["uid"]);
        assert_eq!(same["metadata"]["generation"], 1);
        assert_eq!(changed["metadata"]["generation"], 2);
        assert_ne!(
            first["metadata"]["resourceVersion"],
            changed["metadata"]["resourceVersion"]
        );
    }

    #[tokio::test]
    async fn test_dry_run_does_not_store() {
        let client = MockObjectClient::new();
        let options = ApplyOptions {
            dry_run: true,
            ..Default::default()
        };

        client.apply(&vpa("web"), &manifest("Off"), &options).await.unwrap();
        assert!(client.is_empty());
        assert_eq!(client.last_apply_options(), Some(options));
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let client = MockObjectClient::new();
        let target = vpa("web");
        client.insert(&target, manifest("Off"));

        assert!(client.delete(&target, &DeleteOptions::default()).await.unwrap());
        assert!(!client.delete(&target, &DeleteOptions::default()).await.unwrap());
        assert_eq!(client.operation_counts().deletes, 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let client = MockObjectClient::new();
        client.fail_with(Verb::Get, 403, "Forbidden", "access denied");

        let err = client.get(&vpa("web")).await.unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert!(err.to_string().contains("access denied"));

        client.clear_failures();
        assert!(client.get(&vpa("web")).await.unwrap().is_none());
    }
}
