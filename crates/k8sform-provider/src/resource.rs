//! Generic resource for any catalog entry
//!
//! Create and update are the same server-side apply call; read is a GET and
//! delete a DELETE. Each operation makes exactly one request and reports a
//! failure as a single diagnostic, without retrying.

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;

use k8sform_kube::{
    ApplyOptions, DeleteOptions, ObjectClient, ObjectRef, Propagation, client::DEFAULT_FIELD_MANAGER,
};
use k8sform_schema::{AttributeKind, AttributePath, Schema, validate_object, validate_state};

use crate::catalog::CrdDefinition;
use crate::config::ProviderConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::ProviderError;
use crate::import::parse_import_id;
use crate::manifest::{build_object, model_from_object, normalize, object_id, object_ref};
use crate::schema::resource_schema;
use crate::traits::{OpResult, PlanResult, Resource};

/// Metadata fields whose change replaces the object
const IDENTITY_FIELDS: [&str; 2] = ["name", "namespace"];

/// Server-side apply settings inherited from the provider block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyDefaults {
    pub field_manager: Option<String>,
    pub force_conflicts: Option<bool>,
}

impl From<&ProviderConfig> for ApplyDefaults {
    fn from(config: &ProviderConfig) -> Self {
        Self {
            field_manager: config.field_manager.clone(),
            force_conflicts: config.force_conflicts,
        }
    }
}

/// Resource backed by one CRD version
pub struct CrdResource {
    definition: Arc<CrdDefinition>,
    schema: Schema,
    client: Option<Arc<dyn ObjectClient>>,
    defaults: ApplyDefaults,
}

impl CrdResource {
    /// Create a resource; without a client every cluster operation reports
    /// the provider as offline
    pub fn new(
        definition: Arc<CrdDefinition>,
        client: Option<Arc<dyn ObjectClient>>,
        defaults: ApplyDefaults,
    ) -> Self {
        let schema = resource_schema(&definition);
        Self {
            definition,
            schema,
            client,
            defaults,
        }
    }

    pub fn definition(&self) -> &CrdDefinition {
        &self.definition
    }

    /// The object a configuration describes, in Kubernetes form
    pub fn desired_object(&self, config: &Value) -> Value {
        build_object(&self.definition, &self.schema, config)
    }

    /// The object as it currently exists in the cluster
    pub async fn live_object(&self, config: &Value) -> OpResult<Option<Value>> {
        let client = self.client()?;
        let target = self.target(config)?;
        match client.get(&target).await {
            Ok(object) => Ok(object),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(self.failure("read", &e)),
        }
    }

    /// Server-side apply with `dry_run`: the object as the server would store it
    pub async fn dry_run(&self, config: &Value) -> OpResult<Value> {
        self.check(config)?;
        let client = self.client()?;
        let target = self.target(config)?;
        let options = ApplyOptions {
            dry_run: true,
            ..self.apply_options(config)
        };
        client
            .apply(&target, &self.desired_object(config), &options)
            .await
            .map_err(|e| self.failure("apply", &e))
    }

    fn client(&self) -> OpResult<&Arc<dyn ObjectClient>> {
        self.client.as_ref().ok_or_else(|| {
            Diagnostics::from_error(
                format!("Unable to manage {}", self.definition.kind),
                &ProviderError::Offline,
            )
        })
    }

    fn target(&self, model: &Value) -> OpResult<ObjectRef> {
        object_ref(&self.definition, model).ok_or_else(|| {
            let detail = if self.definition.is_namespaced() {
                "metadata.name and metadata.namespace must be known"
            } else {
                "metadata.name must be known"
            };
            Diagnostics::error("Missing object identity", detail)
        })
    }

    fn failure(&self, verb: &str, error: &dyn std::fmt::Display) -> Diagnostics {
        Diagnostics::error(
            format!("Unable to {} {}", verb, self.definition.kind),
            error.to_string(),
        )
    }

    fn check(&self, config: &Value) -> OpResult<()> {
        Diagnostics::from(validate_object(&self.schema.attributes, config)).into_result()
    }

    /// Resource attribute, then provider default, then the built-in default
    fn apply_options(&self, model: &Value) -> ApplyOptions {
        let field_manager = model
            .get("field_manager")
            .and_then(Value::as_str)
            .map(String::from)
            .or_else(|| self.defaults.field_manager.clone())
            .unwrap_or_else(|| DEFAULT_FIELD_MANAGER.to_string());
        let force = model
            .get("force_conflicts")
            .and_then(Value::as_bool)
            .or(self.defaults.force_conflicts)
            .unwrap_or(false);

        ApplyOptions {
            field_manager,
            force,
            dry_run: false,
        }
    }

    fn delete_options(&self, state: &Value) -> DeleteOptions {
        DeleteOptions {
            propagation: state
                .get("deletion_propagation")
                .and_then(Value::as_str)
                .and_then(Propagation::parse)
                .unwrap_or_default(),
        }
    }

    async fn apply(&self, planned: &Value) -> OpResult<Value> {
        let client = self.client()?;
        let target = self.target(planned)?;
        let object = self.desired_object(planned);
        let options = self.apply_options(planned);

        tracing::info!(object = %target, field_manager = %options.field_manager, "applying object");
        let applied = client
            .apply(&target, &object, &options)
            .await
            .map_err(|e| self.failure("apply", &e))?;

        Ok(model_from_object(&self.schema, &applied, planned))
    }
}

/// Object-typed values with computed attributes removed
fn configurable_view(kind: &AttributeKind, value: &Value) -> Value {
    match (kind, value) {
        (AttributeKind::Object(attributes), Value::Object(fields)) => Value::Object(
            attributes
                .iter()
                .filter(|a| a.mode.is_configurable())
                .map(|a| {
                    let field = fields.get(&a.name).unwrap_or(&Value::Null);
                    (a.name.clone(), configurable_view(&a.kind, field))
                })
                .collect::<Map<_, _>>(),
        ),
        _ => value.clone(),
    }
}

#[async_trait]
impl Resource for CrdResource {
    fn type_name(&self) -> &str {
        &self.definition.type_name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn validate(&self, config: &Value) -> Diagnostics {
        let mut diagnostics = Diagnostics::from(validate_object(&self.schema.attributes, config));
        if let Some(warning) = &self.definition.deprecation_warning {
            diagnostics.push(Diagnostic::warning("Deprecated API version", warning.clone()));
        }
        diagnostics
    }

    fn plan(&self, prior: Option<&Value>, config: &Value) -> OpResult<PlanResult> {
        self.check(config)?;
        let mut planned = normalize(&self.schema.attributes, config);
        let target = self.target(&planned)?;

        let mut requires_replace = Vec::new();
        let mut changed = Vec::new();

        for attribute in self.schema.attributes.iter().filter(|a| a.mode.is_configurable()) {
            let before = prior
                .and_then(|p| p.get(&attribute.name))
                .map(|v| configurable_view(&attribute.kind, v))
                .unwrap_or(Value::Null);
            let after = planned
                .get(&attribute.name)
                .map(|v| configurable_view(&attribute.kind, v))
                .unwrap_or(Value::Null);
            if before != after {
                changed.push(attribute.name.clone());
            }
        }

        if let Some(prior) = prior {
            for field in IDENTITY_FIELDS {
                let pointer = format!("/metadata/{}", field);
                if prior.pointer(&pointer) != planned.pointer(&pointer)
                    && self.schema.attribute_at(&format!("metadata.{}", field)).is_some()
                {
                    requires_replace.push(AttributePath::from("metadata").attribute(field));
                }
            }
        }

        // Server-assigned metadata survives only when nothing is re-applied
        if let (Some(prior), Some(metadata)) = (prior, planned.get_mut("metadata")) {
            if requires_replace.is_empty() {
                metadata["uid"] = prior.pointer("/metadata/uid").cloned().unwrap_or(Value::Null);
            }
            if changed.is_empty() {
                for field in ["resource_version", "generation"] {
                    metadata[field] = prior
                        .pointer(&format!("/metadata/{}", field))
                        .cloned()
                        .unwrap_or(Value::Null);
                }
            }
        }

        planned["id"] = json!(object_id(target.namespace.as_deref(), &target.name));

        Ok(PlanResult {
            planned_state: planned,
            requires_replace,
            changed,
        })
    }

    async fn create(&self, planned: &Value) -> OpResult<Value> {
        Diagnostics::from(validate_state(&self.schema.attributes, planned)).into_result()?;
        self.apply(planned).await
    }

    async fn read(&self, state: &Value) -> OpResult<Option<Value>> {
        let client = self.client()?;
        let target = self.target(state)?;

        match client.get(&target).await {
            Ok(Some(object)) => Ok(Some(model_from_object(&self.schema, &object, state))),
            Ok(None) => {
                tracing::warn!(object = %target, "object no longer exists, removing from state");
                Ok(None)
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!(object = %target, "object no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(self.failure("read", &e)),
        }
    }

    async fn update(&self, prior: &Value, planned: &Value) -> OpResult<Value> {
        Diagnostics::from(validate_state(&self.schema.attributes, planned)).into_result()?;

        let before = self.target(prior)?;
        let after = self.target(planned)?;
        if before != after {
            return Err(Diagnostics::error(
                "Resource requires replacement",
                format!("cannot rename {} to {} in place", before, after),
            ));
        }

        self.apply(planned).await
    }

    async fn delete(&self, state: &Value) -> OpResult<()> {
        let client = self.client()?;
        let target = self.target(state)?;

        match client.delete(&target, &self.delete_options(state)).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!(object = %target, "object already deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(object = %target, "object already deleted");
                Ok(())
            }
            Err(e) => Err(self.failure("delete", &e)),
        }
    }

    async fn import_state(&self, id: &str) -> OpResult<Value> {
        let parsed = parse_import_id(id, self.definition.is_namespaced()).map_err(|e| {
            let detail = match &e {
                ProviderError::InvalidImportId { expected, .. } => {
                    format!("{}, got: {:?}", expected, id)
                }
                other => other.to_string(),
            };
            Diagnostics::error("Error parsing ID", detail)
        })?;

        let mut metadata = Map::new();
        metadata.insert("name".into(), json!(parsed.name));
        if let Some(namespace) = &parsed.namespace {
            metadata.insert("namespace".into(), json!(namespace));
        }

        Ok(normalize(
            &self.schema.attributes,
            &json!({
                "id": object_id(parsed.namespace.as_deref(), &parsed.name),
                "metadata": metadata,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use k8sform_kube::{MockObjectClient, Verb};

    const VPA: &str = "k8s_autoscaling_k8s_io_vertical_pod_autoscaler_v1";
    const OAUTH: &str = "k8s_config_openshift_io_o_auth_v1";

    fn resource_with(type_name: &str, client: &MockObjectClient) -> CrdResource {
        let definition = Catalog::builtin().unwrap().get(type_name).unwrap().clone();
        CrdResource::new(
            definition,
            Some(Arc::new(client.clone())),
            ApplyDefaults::default(),
        )
    }

    fn vpa_config(mode: &str) -> Value {
        json!({
            "metadata": {"name": "web", "namespace": "apps"},
            "spec": {
                "target_ref": {"api_version": "apps/v1", "kind": "Deployment", "name": "web"},
                "update_policy": {"update_mode": mode}
            }
        })
    }

    async fn create_vpa(resource: &CrdResource, mode: &str) -> Value {
        let plan = resource.plan(None, &vpa_config(mode)).unwrap();
        resource.create(&plan.planned_state).await.unwrap()
    }

    #[tokio::test]
    async fn test_read_after_create_keeps_identity() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);

        let state = create_vpa(&resource, "Off").await;
        assert_eq!(state["id"], "apps/web");
        assert!(state["metadata"]["uid"].is_string());

        let read = resource.read(&state).await.unwrap().unwrap();
        assert_eq!(read["metadata"]["name"], "web");
        assert_eq!(read["metadata"]["namespace"], "apps");
        assert_eq!(read["spec"]["update_policy"]["update_mode"], "Off");
        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn test_create_sends_apply_options() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        create_vpa(&resource, "Auto").await;

        let options = client.last_apply_options().unwrap();
        assert_eq!(options.field_manager, "k8sform");
        assert!(!options.force);

        let mut config = vpa_config("Auto");
        config["field_manager"] = json!("platform");
        config["force_conflicts"] = json!(true);
        let plan = resource.plan(None, &config).unwrap();
        let state = resource.create(&plan.planned_state).await.unwrap();

        let options = client.last_apply_options().unwrap();
        assert_eq!(options.field_manager, "platform");
        assert!(options.force);
        assert_eq!(state["field_manager"], "platform");
    }

    #[tokio::test]
    async fn test_provider_defaults_apply() {
        let client = MockObjectClient::new();
        let definition = Catalog::builtin().unwrap().get(VPA).unwrap().clone();
        let resource = CrdResource::new(
            definition,
            Some(Arc::new(client.clone())),
            ApplyDefaults {
                field_manager: Some("ci".into()),
                force_conflicts: Some(true),
            },
        );

        create_vpa(&resource, "Auto").await;
        let options = client.last_apply_options().unwrap();
        assert_eq!(options.field_manager, "ci");
        assert!(options.force);
    }

    #[tokio::test]
    async fn test_read_missing_object_removes_state() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let state = create_vpa(&resource, "Off").await;

        client
            .delete(
                &resource.target(&state).unwrap(),
                &DeleteOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(resource.read(&state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_404_error_removes_state() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        client.fail_with(Verb::Get, 404, "NotFound", "not found");

        let state = resource.import_state("apps/web").await.unwrap();
        assert_eq!(resource.read(&state).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_api_failure_is_single_diagnostic() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        client.fail_with(
            Verb::Apply,
            422,
            "Invalid",
            "strict decoding error: unknown field \"spec.updatePolicy.mode\"",
        );

        let plan = resource.plan(None, &vpa_config("Off")).unwrap();
        let diags = resource.create(&plan.planned_state).await.unwrap_err();
        assert_eq!(diags.len(), 1);

        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Unable to apply VerticalPodAutoscaler");
        assert!(diag.detail.contains("strict decoding error"));
        assert_eq!(client.operation_counts().applies, 1);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let state = create_vpa(&resource, "Off").await;

        resource.delete(&state).await.unwrap();
        assert!(client.is_empty());
        resource.delete(&state).await.unwrap();

        client.fail_with(Verb::Delete, 404, "NotFound", "gone");
        resource.delete(&state).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        client.fail_with(Verb::Delete, 403, "Forbidden", "cannot delete");

        let state = resource.import_state("apps/web").await.unwrap();
        let diags = resource.delete(&state).await.unwrap_err();
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "Unable to delete VerticalPodAutoscaler"
        );
    }

    #[tokio::test]
    async fn test_update_changes_spec() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let state = create_vpa(&resource, "Off").await;

        let plan = resource.plan(Some(&state), &vpa_config("Recreate")).unwrap();
        assert_eq!(plan.changed, vec!["spec"]);
        assert!(!plan.requires_replace());
        assert_eq!(plan.planned_state["metadata"]["uid"], state["metadata"]["uid"]);
        assert_eq!(plan.planned_state["metadata"]["generation"], Value::Null);

        let updated = resource.update(&state, &plan.planned_state).await.unwrap();
        assert_eq!(updated["spec"]["update_policy"]["update_mode"], "Recreate");
        assert_eq!(updated["metadata"]["generation"], 2);
    }

    #[tokio::test]
    async fn test_plan_without_changes() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let state = create_vpa(&resource, "Off").await;

        let plan = resource.plan(Some(&state), &vpa_config("Off")).unwrap();
        assert!(!plan.has_changes());
        assert_eq!(plan.planned_state, state);
    }

    #[tokio::test]
    async fn test_rename_requires_replace() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let state = create_vpa(&resource, "Off").await;

        let mut config = vpa_config("Off");
        config["metadata"]["namespace"] = json!("other");
        let plan = resource.plan(Some(&state), &config).unwrap();

        let paths: Vec<String> = plan.requires_replace.iter().map(|p| p.to_string()).collect();
        assert_eq!(paths, vec!["metadata.namespace"]);
        assert_eq!(plan.planned_state["id"], "other/web");
        assert_eq!(plan.planned_state["metadata"]["uid"], Value::Null);

        let diags = resource
            .update(&state, &plan.planned_state)
            .await
            .unwrap_err();
        assert_eq!(
            diags.iter().next().unwrap().summary,
            "Resource requires replacement"
        );
    }

    #[tokio::test]
    async fn test_plan_rejects_invalid_enum() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);

        for mode in ["Off", "Initial", "Recreate", "Auto"] {
            assert!(resource.plan(None, &vpa_config(mode)).is_ok(), "{mode}");
        }

        let diags = resource.plan(None, &vpa_config("Sometimes")).unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Invalid Attribute Value");
        assert_eq!(
            diag.attribute.as_ref().map(|p| p.to_string()).as_deref(),
            Some("spec.update_policy.update_mode")
        );
        assert_eq!(client.operation_counts().total(), 0);
    }

    #[tokio::test]
    async fn test_import_namespaced() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);

        let state = resource.import_state("apps/web").await.unwrap();
        assert_eq!(state["id"], "apps/web");
        assert_eq!(state["metadata"]["namespace"], "apps");
        assert_eq!(state["metadata"]["name"], "web");
        assert_eq!(state["spec"], Value::Null);

        for bad in ["web", "a/b/c", "/web", "apps/", ""] {
            let diags = resource.import_state(bad).await.unwrap_err();
            assert_eq!(diags.len(), 1);
            assert_eq!(diags.iter().next().unwrap().summary, "Error parsing ID");
        }
    }

    #[tokio::test]
    async fn test_import_then_read() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);
        let created = create_vpa(&resource, "Initial").await;

        let imported = resource.import_state("apps/web").await.unwrap();
        let read = resource.read(&imported).await.unwrap().unwrap();
        assert_eq!(read["spec"], created["spec"]);
        assert_eq!(read["metadata"]["uid"], created["metadata"]["uid"]);
    }

    #[tokio::test]
    async fn test_cluster_scoped_lifecycle() {
        let client = MockObjectClient::new();
        let resource = resource_with(OAUTH, &client);

        let config = json!({
            "metadata": {"name": "cluster"},
            "spec": {"token_config": {"access_token_max_age_seconds": 86400}}
        });
        let plan = resource.plan(None, &config).unwrap();
        assert_eq!(plan.planned_state["id"], "cluster");

        let state = resource.create(&plan.planned_state).await.unwrap();
        assert_eq!(state["metadata"].get("namespace"), None);

        let imported = resource.import_state("cluster").await.unwrap();
        assert_eq!(imported["id"], "cluster");
        assert!(resource.import_state("openshift/cluster").await.is_err());
    }

    #[tokio::test]
    async fn test_offline_resource() {
        let definition = Catalog::builtin().unwrap().get(VPA).unwrap().clone();
        let resource = CrdResource::new(definition, None, ApplyDefaults::default());

        // planning needs no cluster
        let plan = resource.plan(None, &vpa_config("Off")).unwrap();

        let diags = resource.create(&plan.planned_state).await.unwrap_err();
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.summary, "Unable to manage VerticalPodAutoscaler");
        assert_eq!(diag.detail, "Provider is offline");
    }

    #[tokio::test]
    async fn test_deletion_propagation_option() {
        let client = MockObjectClient::new();
        let resource = resource_with(VPA, &client);

        let mut state = resource.import_state("apps/web").await.unwrap();
        state["deletion_propagation"] = json!("Foreground");
        assert_eq!(
            resource.delete_options(&state).propagation,
            Propagation::Foreground
        );

        let mut config = vpa_config("Off");
        config["deletion_propagation"] = json!("Cascade");
        assert!(resource.plan(None, &config).is_err());
    }
}
