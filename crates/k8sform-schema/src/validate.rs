//! Validation of schema-shaped values
//!
//! Walks a model against its attribute tree and reports every violation:
//! missing required arguments, unsupported arguments, type mismatches and
//! failed validators.

use serde::Serialize;
use serde_json::Value;

use crate::attribute::{Attribute, AttributeKind, AttributePath};
use crate::suggestions::did_you_mean;

/// One problem found in a value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub path: AttributePath,
    pub summary: String,
    pub detail: String,
}

impl Violation {
    fn new(path: &AttributePath, summary: &str, detail: impl Into<String>) -> Self {
        Self {
            path: path.clone(),
            summary: summary.to_string(),
            detail: detail.into(),
        }
    }
}

/// Validate user configuration
///
/// Computed-only attributes must be left unset.
pub fn validate_object(attributes: &[Attribute], value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk_object(attributes, value, &AttributePath::root(), false, &mut violations);
    violations
}

/// Validate a planned or stored model, where computed values may be present
pub fn validate_state(attributes: &[Attribute], value: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();
    walk_object(attributes, value, &AttributePath::root(), true, &mut violations);
    violations
}

fn walk_object(
    attributes: &[Attribute],
    value: &Value,
    path: &AttributePath,
    allow_computed: bool,
    out: &mut Vec<Violation>,
) {
    let Some(fields) = value.as_object() else {
        out.push(Violation::new(
            path,
            "Incorrect attribute value type",
            format!("expected an object, got: {}", json_type(value)),
        ));
        return;
    };

    for key in fields.keys() {
        if !attributes.iter().any(|a| &a.name == key) {
            let mut detail = format!("An argument named {:?} is not expected here.", key);
            if let Some(hint) = did_you_mean(key, attributes.iter().map(|a| a.name.as_str())) {
                detail.push(' ');
                detail.push_str(&hint);
            }
            out.push(Violation::new(&path.attribute(key.clone()), "Unsupported argument", detail));
        }
    }

    for attribute in attributes {
        let child_path = path.attribute(attribute.name.clone());
        let child = fields.get(&attribute.name).unwrap_or(&Value::Null);

        if child.is_null() {
            if attribute.mode.is_required() {
                out.push(Violation::new(
                    &child_path,
                    "Missing required argument",
                    format!(
                        "The argument {:?} is required, but no definition was found.",
                        attribute.name
                    ),
                ));
            }
            continue;
        }

        if !allow_computed && !attribute.mode.is_configurable() {
            out.push(Violation::new(
                &child_path,
                "Value for unconfigurable attribute",
                format!(
                    "Can't configure a value for {:?}: its value will be decided automatically.",
                    attribute.name
                ),
            ));
            continue;
        }

        walk_value(&attribute.kind, child, &child_path, allow_computed, out);

        for validator in &attribute.validators {
            if let Err(detail) = validator.check(child) {
                out.push(Violation::new(
                    &child_path,
                    "Invalid Attribute Value",
                    format!("Attribute {} {}", child_path, detail),
                ));
            }
        }
    }
}

fn walk_value(
    kind: &AttributeKind,
    value: &Value,
    path: &AttributePath,
    allow_computed: bool,
    out: &mut Vec<Violation>,
) {
    let matches = match (kind, value) {
        (AttributeKind::Dynamic, _) => true,
        (AttributeKind::String, Value::String(_)) => true,
        (AttributeKind::Bool, Value::Bool(_)) => true,
        (AttributeKind::Float64, Value::Number(_)) => true,
        (AttributeKind::Int64, Value::Number(n)) => {
            n.as_i64().is_some() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
        }
        (AttributeKind::Object(attributes), Value::Object(_)) => {
            walk_object(attributes, value, path, allow_computed, out);
            true
        }
        (AttributeKind::List(item), Value::Array(items)) => {
            for (i, v) in items.iter().enumerate() {
                if !v.is_null() {
                    walk_value(item, v, &path.index(i), allow_computed, out);
                }
            }
            true
        }
        (AttributeKind::Map(item), Value::Object(entries)) => {
            for (k, v) in entries {
                if !v.is_null() {
                    walk_value(item, v, &path.key(k.clone()), allow_computed, out);
                }
            }
            true
        }
        _ => false,
    };

    if !matches {
        out.push(Violation::new(
            path,
            "Incorrect attribute value type",
            format!(
                "Inappropriate value for attribute {}: {} required, got: {}",
                path,
                kind.type_label(),
                json_type(value)
            ),
        ));
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
