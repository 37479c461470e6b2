//! kube-rs implementation of the object client
//!
//! Objects are handled as `DynamicObject` so any CRD can be served without
//! generated Rust types. Writes always go through Server-Side Apply with
//! strict field validation: unknown or duplicate fields are rejected by the
//! API server instead of being silently pruned.

use async_trait::async_trait;
use kube::{
    Client,
    api::{Api, DeleteParams, DynamicObject, Patch, PatchParams, PropagationPolicy},
    core::{GroupVersionKind, params::ValidationDirective},
    discovery::ApiResource,
};
use serde_json::Value;

use crate::client::{ApplyOptions, DeleteOptions, ObjectClient, Propagation};
use crate::error::{KubeError, Result};
use crate::target::{ApiTarget, ObjectRef};

/// Object client backed by a live cluster
#[derive(Clone)]
pub struct KubeObjectClient {
    client: Client,
}

impl KubeObjectClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create an Api client for an object's type and namespace
    fn api_for(&self, object: &ObjectRef) -> Api<DynamicObject> {
        let resource = api_resource(&object.api);
        match (&object.namespace, object.api.namespaced) {
            (Some(ns), true) => Api::namespaced_with(self.client.clone(), ns, &resource),
            (None, true) => Api::default_namespaced_with(self.client.clone(), &resource),
            _ => Api::all_with(self.client.clone(), &resource),
        }
    }
}

#[async_trait]
impl ObjectClient for KubeObjectClient {
    async fn get(&self, object: &ObjectRef) -> Result<Option<Value>> {
        tracing::debug!(object = %object, "reading object");
        let api = self.api_for(object);

        match api.get_opt(&object.name).await? {
            Some(found) => Ok(Some(serde_json::to_value(&found)?)),
            None => Ok(None),
        }
    }

    async fn apply(
        &self,
        object: &ObjectRef,
        manifest: &Value,
        options: &ApplyOptions,
    ) -> Result<Value> {
        tracing::debug!(
            object = %object,
            field_manager = %options.field_manager,
            force = options.force,
            dry_run = options.dry_run,
            "server-side apply"
        );
        let api = self.api_for(object);
        let params = patch_params(options);

        let applied = api
            .patch(&object.name, &params, &Patch::Apply(manifest))
            .await?;
        Ok(serde_json::to_value(&applied)?)
    }

    async fn delete(&self, object: &ObjectRef, options: &DeleteOptions) -> Result<bool> {
        tracing::debug!(object = %object, "deleting object");
        let api = self.api_for(object);

        match api.delete(&object.name, &delete_params(options)).await {
            Ok(_) => Ok(true),
            Err(kube::Error::Api(resp)) if resp.code == 404 => Ok(false),
            Err(e) => Err(KubeError::Api(e)),
        }
    }
}

/// Build the `ApiResource` for a target without discovery
pub fn api_resource(target: &ApiTarget) -> ApiResource {
    let gvk = GroupVersionKind::gvk(&target.group, &target.version, &target.kind);
    ApiResource::from_gvk_with_plural(&gvk, &target.plural)
}

/// Patch params for Server-Side Apply
pub fn patch_params(options: &ApplyOptions) -> PatchParams {
    let mut params = PatchParams::apply(&options.field_manager);
    params.force = options.force;
    params.dry_run = options.dry_run;
    params.field_validation = Some(ValidationDirective::Strict);
    params
}

/// Delete params with the requested propagation
pub fn delete_params(options: &DeleteOptions) -> DeleteParams {
    let policy = match options.propagation {
        Propagation::Background => PropagationPolicy::Background,
        Propagation::Foreground => PropagationPolicy::Foreground,
        Propagation::Orphan => PropagationPolicy::Orphan,
    };
    DeleteParams {
        propagation_policy: Some(policy),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificate() -> ApiTarget {
        ApiTarget {
            group: "cert-manager.io".into(),
            version: "v1".into(),
            kind: "Certificate".into(),
            plural: "certificates".into(),
            namespaced: true,
        }
    }

    #[test]
    fn test_api_resource_from_target() {
        let resource = api_resource(&certificate());
        assert_eq!(resource.group, "cert-manager.io");
        assert_eq!(resource.version, "v1");
        assert_eq!(resource.api_version, "cert-manager.io/v1");
        assert_eq!(resource.kind, "Certificate");
        assert_eq!(resource.plural, "certificates");
    }

    #[test]
    fn test_patch_params_are_strict() {
        let params = patch_params(&ApplyOptions::default());
        assert_eq!(params.field_manager.as_deref(), Some("k8sform"));
        assert!(!params.force);
        assert!(!params.dry_run);
        assert!(matches!(
            params.field_validation,
            Some(ValidationDirective::Strict)
        ));
    }

    #[test]
    fn test_patch_params_force_and_dry_run() {
        let params = patch_params(&ApplyOptions {
            field_manager: "platform-team".into(),
            force: true,
            dry_run: true,
        });
        assert_eq!(params.field_manager.as_deref(), Some("platform-team"));
        assert!(params.force);
        assert!(params.dry_run);
    }

    #[test]
    fn test_delete_params_propagation() {
        let params = delete_params(&DeleteOptions::default());
        assert!(matches!(
            params.propagation_policy,
            Some(PropagationPolicy::Background)
        ));

        let params = delete_params(&DeleteOptions {
            propagation: Propagation::Orphan,
        });
        assert!(matches!(
            params.propagation_policy,
            Some(PropagationPolicy::Orphan)
        ));
    }
}
