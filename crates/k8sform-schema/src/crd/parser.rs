//! CRD YAML parser
//!
//! Parses CustomResourceDefinition manifests into structured `CrdSchema`
//! values the attribute converter can walk.

use serde::Deserialize;
use serde_json::Value;

use super::schema::{
    AdditionalProperties, CrdNames, CrdSchema, CrdScope, CrdVersionSchema, OpenApiSchema,
    PropertyType, SchemaProperty,
};
use crate::error::{Result, SchemaError};

/// Parser for CRD YAML manifests
pub struct CrdParser;

impl CrdParser {
    /// Parse a single CRD YAML manifest into a structured schema
    pub fn parse(yaml: &str) -> Result<CrdSchema> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::parse_value(&value)
    }

    /// Parse every CRD in a multi-document YAML stream
    ///
    /// Empty documents are skipped; any other non-CRD document is an error.
    pub fn parse_all(yaml: &str) -> Result<Vec<CrdSchema>> {
        let mut crds = Vec::new();
        for document in serde_yaml::Deserializer::from_str(yaml) {
            let value = Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            crds.push(Self::parse_value(&value)?);
        }
        Ok(crds)
    }

    /// Parse from a serde_json::Value (useful for objects fetched from a cluster)
    pub fn parse_value(value: &Value) -> Result<CrdSchema> {
        let kind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("kind"))?;

        if kind != "CustomResourceDefinition" {
            return Err(SchemaError::NotACrd {
                kind: kind.to_string(),
            });
        }

        let name = value
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("metadata.name"))?
            .to_string();

        let spec = value.get("spec").ok_or_else(|| missing("spec"))?;

        let group = spec
            .get("group")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("spec.group"))?
            .to_string();

        let scope = spec
            .get("scope")
            .and_then(Value::as_str)
            .map(|s| match s {
                "Cluster" => CrdScope::Cluster,
                _ => CrdScope::Namespaced,
            })
            .unwrap_or(CrdScope::Namespaced);

        let names = Self::parse_names(spec.get("names"))?;
        let versions = Self::parse_versions(spec.get("versions"))?;

        Ok(CrdSchema {
            name,
            group,
            scope,
            names,
            versions,
        })
    }

    fn parse_names(names_value: Option<&Value>) -> Result<CrdNames> {
        let names = names_value.ok_or_else(|| missing("spec.names"))?;

        let kind = names
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("spec.names.kind"))?
            .to_string();
        let plural = names
            .get("plural")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("spec.names.plural"))?
            .to_string();

        Ok(CrdNames {
            kind,
            plural,
            singular: names
                .get("singular")
                .and_then(Value::as_str)
                .map(String::from),
            short_names: string_list(names.get("shortNames")),
            list_kind: names
                .get("listKind")
                .and_then(Value::as_str)
                .map(String::from),
        })
    }

    fn parse_versions(versions_value: Option<&Value>) -> Result<Vec<CrdVersionSchema>> {
        let versions = versions_value
            .and_then(Value::as_array)
            .ok_or_else(|| missing("spec.versions"))?;

        versions.iter().map(Self::parse_version).collect()
    }

    fn parse_version(version: &Value) -> Result<CrdVersionSchema> {
        let name = version
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("spec.versions[].name"))?
            .to_string();

        let served = version
            .get("served")
            .and_then(Value::as_bool)
            .unwrap_or(true);

        let storage = version
            .get("storage")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let deprecated = version
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let deprecation_warning = version
            .get("deprecationWarning")
            .and_then(Value::as_str)
            .map(String::from);

        let schema = version
            .pointer("/schema/openAPIV3Schema")
            .map(Self::parse_openapi_schema);

        Ok(CrdVersionSchema {
            name,
            served,
            storage,
            deprecated,
            deprecation_warning,
            schema,
        })
    }

    fn parse_openapi_schema(schema: &Value) -> OpenApiSchema {
        OpenApiSchema {
            description: schema
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            properties: parse_properties(schema).unwrap_or_default(),
            required: string_list(schema.get("required")),
            x_preserve_unknown: flag(schema, "x-kubernetes-preserve-unknown-fields"),
        }
    }

    /// Parse a single schema property (recursive)
    pub fn parse_schema_property(prop: &Value) -> SchemaProperty {
        let type_ = prop
            .get("type")
            .and_then(Value::as_str)
            .map(PropertyType::parse)
            .unwrap_or_else(|| {
                // Untyped nodes are either int-or-string or free-form
                if flag(prop, "x-kubernetes-int-or-string") {
                    PropertyType::String
                } else if prop.get("properties").is_some() {
                    PropertyType::Object
                } else {
                    PropertyType::Unknown(String::new())
                }
            });

        // OpenAPI 3.0 uses boolean exclusivity flags; 3.1 uses numeric bounds
        let mut minimum = prop.get("minimum").and_then(Value::as_f64);
        let mut maximum = prop.get("maximum").and_then(Value::as_f64);
        let exclusive_minimum = match prop.get("exclusiveMinimum") {
            Some(Value::Bool(b)) => *b,
            Some(v) => {
                minimum = v.as_f64().or(minimum);
                true
            }
            None => false,
        };
        let exclusive_maximum = match prop.get("exclusiveMaximum") {
            Some(Value::Bool(b)) => *b,
            Some(v) => {
                maximum = v.as_f64().or(maximum);
                true
            }
            None => false,
        };

        let additional_properties = prop.get("additionalProperties").map(|v| match v {
            Value::Bool(true) => AdditionalProperties::Allowed,
            Value::Bool(false) => AdditionalProperties::Denied,
            other => AdditionalProperties::Schema(Box::new(Self::parse_schema_property(other))),
        });

        SchemaProperty {
            type_,
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(String::from),
            default: prop.get("default").cloned(),
            format: prop.get("format").and_then(Value::as_str).map(String::from),
            pattern: prop.get("pattern").and_then(Value::as_str).map(String::from),
            enum_values: prop.get("enum").and_then(Value::as_array).cloned(),
            minimum,
            maximum,
            exclusive_minimum,
            exclusive_maximum,
            multiple_of: prop
                .get("multipleOf")
                .and_then(Value::as_f64)
                .filter(|f| *f > 0.0),
            min_length: prop.get("minLength").and_then(Value::as_u64),
            max_length: prop.get("maxLength").and_then(Value::as_u64),
            min_items: prop.get("minItems").and_then(Value::as_u64),
            max_items: prop.get("maxItems").and_then(Value::as_u64),
            unique_items: flag(prop, "uniqueItems"),
            min_properties: prop.get("minProperties").and_then(Value::as_u64),
            max_properties: prop.get("maxProperties").and_then(Value::as_u64),
            properties: parse_properties(prop),
            required: prop.get("required").map(|r| string_list(Some(r))),
            items: prop
                .get("items")
                .map(|v| Box::new(Self::parse_schema_property(v))),
            additional_properties,
            x_preserve_unknown: flag(prop, "x-kubernetes-preserve-unknown-fields"),
            x_embedded_resource: flag(prop, "x-kubernetes-embedded-resource"),
            x_int_or_string: flag(prop, "x-kubernetes-int-or-string"),
        }
    }
}

fn missing(field: &str) -> SchemaError {
    SchemaError::MissingField {
        field: field.to_string(),
    }
}

fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_properties(
    value: &Value,
) -> Option<std::collections::BTreeMap<String, SchemaProperty>> {
    value
        .get("properties")
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), CrdParser::parse_schema_property(v)))
                .collect()
        })
}
