//! Resource, data source and provider block schemas

use serde::Serialize;
use std::collections::BTreeMap;

use k8sform_kube::Propagation;
use k8sform_schema::{Attribute, AttributeKind, AttributeMode, Schema, Validator};

use crate::catalog::{Catalog, CrdDefinition};

/// Every schema the provider serves
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
    pub data_sources: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            provider: provider_schema(),
            resources: catalog
                .iter()
                .map(|d| (d.type_name.clone(), resource_schema(d)))
                .collect(),
            data_sources: catalog
                .iter()
                .map(|d| (d.data_source_name(), data_source_schema(d)))
                .collect(),
        }
    }
}

/// Provider block
pub fn provider_schema() -> Schema {
    Schema::new(vec![
        Attribute::optional("kubeconfig", AttributeKind::String)
            .with_description("Path to the kubeconfig file. Defaults to the usual kubeconfig lookup."),
        Attribute::optional("context", AttributeKind::String)
            .with_description("Context to use from the kubeconfig file."),
        Attribute::optional("field_manager", AttributeKind::String)
            .with_description("Default field manager for server-side apply.")
            .with_validator(Validator::Length {
                min: Some(1),
                max: Some(128),
            }),
        Attribute::optional("force_conflicts", AttributeKind::Bool)
            .with_description("Default for forcing field ownership conflicts."),
        Attribute::optional("offline", AttributeKind::Bool)
            .with_description("Serve manifest data sources only, without connecting to a cluster."),
    ])
    .with_description("Manage Kubernetes custom resources with server-side apply.")
}

/// Resource schema for a catalog entry
pub fn resource_schema(definition: &CrdDefinition) -> Schema {
    let mut attributes = vec![
        Attribute::computed("id", AttributeKind::String)
            .with_description("The namespace/name of the object, or its name when cluster-scoped."),
        Attribute::optional("field_manager", AttributeKind::String)
            .with_description("The name of the manager used to track field ownership.")
            .with_validator(Validator::Length {
                min: Some(1),
                max: Some(128),
            }),
        Attribute::optional("force_conflicts", AttributeKind::Bool)
            .with_description("If true, server-side apply will force the changes against conflicts."),
        Attribute::optional("deletion_propagation", AttributeKind::String)
            .with_description("How dependents are handled when the object is deleted.")
            .with_validator(Validator::one_of(Propagation::VALUES)),
        metadata_attribute(definition, true),
    ];
    attributes.extend(definition.body.iter().cloned());

    Schema::new(attributes).with_description(description(definition, "resource"))
}

/// Manifest data source schema for a catalog entry
pub fn data_source_schema(definition: &CrdDefinition) -> Schema {
    let mut attributes = vec![
        Attribute::computed("id", AttributeKind::String)
            .with_description("The namespace/name of the object, or its name when cluster-scoped."),
        metadata_attribute(definition, false),
    ];
    attributes.extend(definition.body.iter().cloned());
    attributes.push(
        Attribute::computed("yaml", AttributeKind::String)
            .with_description("The generated manifest in YAML format."),
    );

    Schema::new(attributes).with_description(description(definition, "manifest data source"))
}

fn description(definition: &CrdDefinition, what: &str) -> String {
    let mut text = match &definition.description {
        Some(d) => d.trim().to_string(),
        None => format!("{} {}", definition.api_version(), definition.kind),
    };
    text.push_str(&format!(" ({} for {}, {})", what, definition.crd_name, definition.scope));
    if let Some(warning) = &definition.deprecation_warning {
        text.push_str(&format!(" Deprecated: {}", warning));
    }
    text
}

/// `metadata` object; state-only fields are added for resources
pub fn metadata_attribute(definition: &CrdDefinition, with_server_fields: bool) -> Attribute {
    let mut fields = vec![
        Attribute::required("name", AttributeKind::String)
            .with_k8s_name("name")
            .with_description("Unique name of the object within its namespace or the cluster.")
            .with_validator(Validator::DnsSubdomain),
    ];

    if definition.is_namespaced() {
        fields.push(
            Attribute::required("namespace", AttributeKind::String)
                .with_k8s_name("namespace")
                .with_description("Namespace the object lives in.")
                .with_validator(Validator::DnsLabel),
        );
    }

    fields.push(
        Attribute::optional("labels", AttributeKind::Map(Box::new(AttributeKind::String)))
            .with_k8s_name("labels")
            .with_description("Map of string keys and values that can be used to organize and categorize objects.")
            .with_validator(Validator::Labels),
    );
    fields.push(
        Attribute::optional("annotations", AttributeKind::Map(Box::new(AttributeKind::String)))
            .with_k8s_name("annotations")
            .with_description("Unstructured key value map stored with the object.")
            .with_validator(Validator::Annotations),
    );

    if with_server_fields {
        fields.push(Attribute::computed("uid", AttributeKind::String).with_k8s_name("uid"));
        fields.push(
            Attribute::computed("resource_version", AttributeKind::String)
                .with_k8s_name("resourceVersion"),
        );
        fields.push(Attribute::computed("generation", AttributeKind::Int64).with_k8s_name("generation"));
    }

    Attribute::new("metadata", AttributeKind::Object(fields), AttributeMode::Required)
        .with_k8s_name("metadata")
        .with_description("Data that helps uniquely identify the object.")
}
