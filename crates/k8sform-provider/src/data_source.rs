//! Manifest data source: renders an object as YAML, no cluster involved

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

use k8sform_schema::{Schema, validate_object};

use crate::catalog::CrdDefinition;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::manifest::{build_object, normalize, object_id, render_yaml};
use crate::schema::data_source_schema;
use crate::traits::{DataSource, OpResult};

pub struct ManifestDataSource {
    definition: Arc<CrdDefinition>,
    type_name: String,
    schema: Schema,
}

impl ManifestDataSource {
    pub fn new(definition: Arc<CrdDefinition>) -> Self {
        Self {
            type_name: definition.data_source_name(),
            schema: data_source_schema(&definition),
            definition,
        }
    }

    pub fn definition(&self) -> &CrdDefinition {
        &self.definition
    }

    /// Render the manifest for a configuration without validating it
    pub fn render(&self, config: &Value) -> OpResult<String> {
        let object = build_object(&self.definition, &self.schema, config);
        render_yaml(&object)
            .map_err(|e| Diagnostics::error("Unable to marshal manifest", e.to_string()))
    }
}

#[async_trait]
impl DataSource for ManifestDataSource {
    fn type_name(&self) -> &str {
        &self.type_name
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

    async fn read(&self, config: &Value) -> OpResult<Value> {
        Diagnostics::from(validate_object(&self.schema.attributes, config)).into_result()?;

        let yaml = self.render(config)?;
        let mut state = normalize(&self.schema.attributes, config);

        let name = state.pointer("/metadata/name").and_then(Value::as_str);
        let namespace = state.pointer("/metadata/namespace").and_then(Value::as_str);
        let id = name.map(|name| object_id(namespace, name));

        state["id"] = json!(id);
        state["yaml"] = json!(yaml);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn data_source(type_name: &str) -> ManifestDataSource {
        ManifestDataSource::new(Catalog::builtin().unwrap().get(type_name).unwrap().clone())
    }

    #[tokio::test]
    async fn test_vpa_manifest() {
        let ds = data_source("k8s_autoscaling_k8s_io_vertical_pod_autoscaler_v1");
        assert_eq!(
            ds.type_name(),
            "k8s_autoscaling_k8s_io_vertical_pod_autoscaler_v1_manifest"
        );

        let state = ds
            .read(&json!({
                "metadata": {"name": "web", "namespace": "apps"},
                "spec": {
                    "target_ref": {"kind": "Deployment", "name": "web"},
                    "update_policy": {"update_mode": "Initial", "min_replicas": 2}
                }
            }))
            .await
            .unwrap();

        assert_eq!(state["id"], "apps/web");
        let yaml = state["yaml"].as_str().unwrap();
        assert!(yaml.starts_with("apiVersion: autoscaling.k8s.io/v1\nkind: VerticalPodAutoscaler\n"));
        assert!(yaml.contains("updateMode: Initial"));
        assert!(yaml.contains("minReplicas: 2"));

        let parsed: Value = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed["apiVersion"], "autoscaling.k8s.io/v1");
        assert_eq!(parsed["kind"], "VerticalPodAutoscaler");
        assert_eq!(parsed["metadata"]["namespace"], "apps");
        assert_eq!(parsed["spec"]["targetRef"]["name"], "web");
    }

    #[tokio::test]
    async fn test_cluster_scoped_manifest() {
        let ds = data_source("k8s_config_openshift_io_infrastructure_v1");
        let state = ds
            .read(&json!({
                "metadata": {"name": "cluster"},
                "spec": {"platform_spec": {"type": "BareMetal"}}
            }))
            .await
            .unwrap();

        assert_eq!(state["id"], "cluster");
        let parsed: Value = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
        assert_eq!(parsed["apiVersion"], "config.openshift.io/v1");
        assert_eq!(parsed["kind"], "Infrastructure");
        assert_eq!(parsed["spec"]["platformSpec"]["type"], "BareMetal");
        assert!(parsed["metadata"].get("namespace").is_none());
    }

    #[tokio::test]
    async fn test_empty_objects_are_kept() {
        let ds = data_source("k8s_config_openshift_io_o_auth_v1");
        let state = ds
            .read(&json!({"metadata": {"name": "cluster"}, "spec": {}}))
            .await
            .unwrap();

        let parsed: Value = serde_yaml::from_str(state["yaml"].as_str().unwrap()).unwrap();
        assert_eq!(parsed["spec"], json!({}));
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let ds = data_source("k8s_cert_manager_io_certificate_v1");
        let diags = ds
            .read(&json!({
                "metadata": {"name": "Not_A_Name", "namespace": "apps"},
                "spec": {"issuer_ref": {"name": "letsencrypt"}},
                "yaml": "apiVersion: v1"
            }))
            .await
            .unwrap_err();

        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert!(summaries.contains(&"Invalid Attribute Value"));
        assert!(summaries.contains(&"Missing required argument"));
        assert!(summaries.contains(&"Value for unconfigurable attribute"));
    }
}
