//! Model <-> Kubernetes object conversion for a catalog entry

use serde_json::{Map, Value, json};

use k8sform_kube::ObjectRef;
use k8sform_schema::{
    Attribute, AttributeKind, Schema, from_kubernetes, object_to_kubernetes, to_kubernetes,
};

use crate::catalog::CrdDefinition;
use crate::error::Result;

/// Build the Kubernetes object for a model
///
/// `apiVersion` and `kind` are stamped from the definition; only the
/// configurable metadata fields are sent.
pub fn build_object(definition: &CrdDefinition, schema: &Schema, model: &Value) -> Value {
    let mut object = Map::new();
    object.insert("apiVersion".into(), json!(definition.api_version()));
    object.insert("kind".into(), json!(definition.kind));

    if let Some(metadata) = schema.attribute("metadata") {
        let configurable: Vec<Attribute> = metadata
            .kind
            .attributes()
            .unwrap_or_default()
            .iter()
            .filter(|a| a.mode.is_configurable())
            .cloned()
            .collect();
        let value = model.get("metadata").unwrap_or(&Value::Null);
        object.insert(
            "metadata".into(),
            Value::Object(object_to_kubernetes(&configurable, value)),
        );
    }

    for attribute in &definition.body {
        if let Some(value) = model
            .get(&attribute.name)
            .and_then(|v| to_kubernetes(&attribute.kind, v))
        {
            object.insert(attribute.wire_name().to_string(), value);
        }
    }

    Value::Object(object)
}

/// Render an object as YAML: `apiVersion`, `kind`, `metadata`, then the body
pub fn render_yaml(object: &Value) -> Result<String> {
    const HEAD: [&str; 3] = ["apiVersion", "kind", "metadata"];

    let mut mapping = serde_yaml::Mapping::new();
    if let Some(fields) = object.as_object() {
        for key in HEAD {
            if let Some(value) = fields.get(key) {
                mapping.insert(key.into(), serde_yaml::to_value(value)?);
            }
        }
        for (key, value) in fields.iter().filter(|(k, _)| !HEAD.contains(&k.as_str())) {
            mapping.insert(key.as_str().into(), serde_yaml::to_value(value)?);
        }
    }
    Ok(serde_yaml::to_string(&mapping)?)
}

/// Object identifier: `namespace/name`, or `name` when cluster-scoped
pub fn object_id(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(ns) => format!("{}/{}", ns, name),
        None => name.to_string(),
    }
}

/// Address of the object a model describes
///
/// Returns `None` when the model lacks a name (or a namespace for
/// namespaced types).
pub fn object_ref(definition: &CrdDefinition, model: &Value) -> Option<ObjectRef> {
    let name = model.pointer("/metadata/name").and_then(Value::as_str)?;
    let namespace = if definition.is_namespaced() {
        Some(model.pointer("/metadata/namespace").and_then(Value::as_str)?)
    } else {
        None
    };
    Some(definition.api_target().object(namespace, name))
}

/// Build a model from an object returned by the API server
///
/// Attributes that only exist in configuration are copied from `config`.
pub fn model_from_object(schema: &Schema, object: &Value, config: &Value) -> Value {
    let mut model = Map::new();

    for attribute in &schema.attributes {
        let value = match attribute.name.as_str() {
            "id" => {
                let name = object.pointer("/metadata/name").and_then(Value::as_str);
                let namespace = object.pointer("/metadata/namespace").and_then(Value::as_str);
                name.map(|name| json!(object_id(namespace, name)))
                    .unwrap_or(Value::Null)
            }
            "field_manager" | "force_conflicts" | "deletion_propagation" => {
                config.get(&attribute.name).cloned().unwrap_or(Value::Null)
            }
            _ => from_kubernetes(&attribute.kind, object.get(attribute.wire_name())),
        };
        model.insert(attribute.name.clone(), value);
    }

    Value::Object(model)
}

/// Fill every declared attribute of a model object, recursively, with null
pub fn normalize(attributes: &[Attribute], value: &Value) -> Value {
    let Some(fields) = value.as_object() else {
        return value.clone();
    };

    let mut out = Map::new();
    for attribute in attributes {
        let field = fields.get(&attribute.name).unwrap_or(&Value::Null);
        out.insert(attribute.name.clone(), normalize_value(&attribute.kind, field));
    }
    Value::Object(out)
}

fn normalize_value(kind: &AttributeKind, value: &Value) -> Value {
    match (kind, value) {
        (AttributeKind::Object(attributes), Value::Object(_)) => normalize(attributes, value),
        (AttributeKind::List(item), Value::Array(items)) => {
            Value::Array(items.iter().map(|v| normalize_value(item, v)).collect())
        }
        (AttributeKind::Map(item), Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), normalize_value(item, v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
