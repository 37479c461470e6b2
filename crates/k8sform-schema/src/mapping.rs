//! Model <-> Kubernetes object mapping
//!
//! Provider models are JSON trees keyed by attribute names. Kubernetes
//! objects use the wire names recorded on each attribute. Map keys are user
//! data and are never renamed.

use serde_json::{Map, Value};

use crate::attribute::{Attribute, AttributeKind};

/// Convert a model value to its Kubernetes form
///
/// Null yields `None` so the field is omitted from the object.
pub fn to_kubernetes(kind: &AttributeKind, value: &Value) -> Option<Value> {
    if value.is_null() {
        return None;
    }

    let converted = match (kind, value) {
        (AttributeKind::Object(attributes), Value::Object(_)) => {
            Value::Object(object_to_kubernetes(attributes, value))
        }
        (AttributeKind::List(item), Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|v| to_kubernetes(item, v).unwrap_or(Value::Null))
                .collect(),
        ),
        (AttributeKind::Map(item), Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .filter_map(|(k, v)| to_kubernetes(item, v).map(|v| (k.clone(), v)))
                .collect(),
        ),
        (AttributeKind::Int64, Value::Number(n)) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => integral(n.as_f64()).map(Value::from).unwrap_or_else(|| value.clone()),
        },
        _ => value.clone(),
    };

    Some(converted)
}

/// Convert the attributes of an object model, dropping null fields
pub fn object_to_kubernetes(attributes: &[Attribute], value: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(fields) = value.as_object() else {
        return out;
    };

    for attribute in attributes {
        if let Some(converted) = fields
            .get(&attribute.name)
            .and_then(|v| to_kubernetes(&attribute.kind, v))
        {
            out.insert(attribute.wire_name().to_string(), converted);
        }
    }

    out
}

/// Convert a Kubernetes value back into model form
///
/// Objects list every declared attribute (absent fields become null); fields
/// the schema does not declare are dropped.
pub fn from_kubernetes(kind: &AttributeKind, value: Option<&Value>) -> Value {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Value::Null;
    };

    match (kind, value) {
        (AttributeKind::Object(attributes), Value::Object(_)) => {
            object_from_kubernetes(attributes, value)
        }
        (AttributeKind::List(item), Value::Array(items)) => Value::Array(
            items
                .iter()
                .map(|v| from_kubernetes(item, Some(v)))
                .collect(),
        ),
        (AttributeKind::Map(item), Value::Object(entries)) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_kubernetes(item, Some(v))))
                .collect(),
        ),
        (AttributeKind::Int64, Value::Number(n)) if n.as_i64().is_none() => integral(n.as_f64())
            .map(Value::from)
            .unwrap_or_else(|| value.clone()),
        _ => value.clone(),
    }
}

/// Convert a Kubernetes object into a model object with the given attributes
pub fn object_from_kubernetes(attributes: &[Attribute], value: &Value) -> Value {
    Value::Object(
        attributes
            .iter()
            .map(|attribute| {
                (
                    attribute.name.clone(),
                    from_kubernetes(&attribute.kind, value.get(attribute.wire_name())),
                )
            })
            .collect(),
    )
}

fn integral(f: Option<f64>) -> Option<i64> {
    f.filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i64)
}
