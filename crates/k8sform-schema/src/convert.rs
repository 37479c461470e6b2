//! OpenAPI property -> attribute conversion

use std::collections::HashSet;

use crate::attribute::{Attribute, AttributeKind, AttributeMode};
use crate::crd::{AdditionalProperties, PropertyType, SchemaProperty};
use crate::naming::snake_case;
use crate::validators::Validator;

/// Build the attribute for one named property
pub fn attribute_from_property(k8s_name: &str, prop: &SchemaProperty, required: bool) -> Attribute {
    let kind = kind_from_property(prop);
    let mode = if required {
        AttributeMode::Required
    } else {
        AttributeMode::Optional
    };

    let mut attribute = Attribute::new(snake_case(k8s_name), kind, mode).with_k8s_name(k8s_name);
    attribute.validators = validators_for(prop, &attribute.kind);
    if let Some(description) = &prop.description {
        attribute.description = Some(description.clone());
    }
    attribute
}

/// Attribute kind for a property
pub fn kind_from_property(prop: &SchemaProperty) -> AttributeKind {
    if prop.x_int_or_string {
        return AttributeKind::Dynamic;
    }

    match &prop.type_ {
        PropertyType::String => AttributeKind::String,
        PropertyType::Integer => AttributeKind::Int64,
        PropertyType::Number => AttributeKind::Float64,
        PropertyType::Boolean => AttributeKind::Bool,
        PropertyType::Array => AttributeKind::List(Box::new(
            prop.items
                .as_deref()
                .map(kind_from_property)
                .unwrap_or(AttributeKind::Dynamic),
        )),
        PropertyType::Object => object_kind(prop),
        PropertyType::Unknown(_) => AttributeKind::Dynamic,
    }
}

fn object_kind(prop: &SchemaProperty) -> AttributeKind {
    if prop.x_embedded_resource {
        return AttributeKind::Dynamic;
    }

    if let Some(properties) = prop.properties.as_ref().filter(|p| !p.is_empty()) {
        let mut seen = HashSet::new();
        let attributes = properties
            .iter()
            .map(|(name, child)| attribute_from_property(name, child, prop.is_required(name)))
            .filter(|attr| {
                let fresh = seen.insert(attr.name.clone());
                if !fresh {
                    tracing::warn!(attribute = %attr.name, "duplicate attribute name after snake_case conversion, keeping first");
                }
                fresh
            })
            .collect();
        return AttributeKind::Object(attributes);
    }

    match &prop.additional_properties {
        Some(AdditionalProperties::Schema(value)) => {
            AttributeKind::Map(Box::new(kind_from_property(value)))
        }
        _ => AttributeKind::Dynamic,
    }
}

/// Validators re-declaring a property's OpenAPI constraints
pub fn validators_for(prop: &SchemaProperty, kind: &AttributeKind) -> Vec<Validator> {
    let mut validators = Vec::new();

    match kind {
        AttributeKind::String => {
            if let Some(values) = prop.string_enum() {
                validators.push(Validator::OneOf { values });
            }
            if let Some(validator) = prop.pattern.as_deref().and_then(Validator::regex) {
                validators.push(validator);
            }
            if prop.min_length.is_some() || prop.max_length.is_some() {
                validators.push(Validator::Length {
                    min: prop.min_length,
                    max: prop.max_length,
                });
            }
        }
        AttributeKind::Int64 => {
            if prop.minimum.is_some() || prop.maximum.is_some() {
                // Exclusive integer bounds become the next inclusive integer
                let min = prop.minimum.map(|m| {
                    let m = m.ceil() as i64;
                    if prop.exclusive_minimum { m.saturating_add(1) } else { m }
                });
                let max = prop.maximum.map(|m| {
                    let m = m.floor() as i64;
                    if prop.exclusive_maximum { m.saturating_sub(1) } else { m }
                });
                validators.push(Validator::IntRange { min, max });
            }
        }
        AttributeKind::Float64 => {
            if prop.minimum.is_some() || prop.maximum.is_some() {
                validators.push(Validator::FloatRange {
                    min: prop.minimum,
                    max: prop.maximum,
                    exclusive_min: prop.exclusive_minimum,
                    exclusive_max: prop.exclusive_maximum,
                });
            }
        }
        AttributeKind::List(_) => {
            if prop.min_items.is_some() || prop.max_items.is_some() {
                validators.push(Validator::ItemCount {
                    min: prop.min_items,
                    max: prop.max_items,
                });
            }
            if prop.unique_items {
                validators.push(Validator::UniqueItems);
            }
        }
        AttributeKind::Map(_) => {
            if prop.min_properties.is_some() || prop.max_properties.is_some() {
                validators.push(Validator::PropertyCount {
                    min: prop.min_properties,
                    max: prop.max_properties,
                });
            }
        }
        _ => {}
    }

    if let (Some(factor), AttributeKind::Int64 | AttributeKind::Float64) = (prop.multiple_of, kind) {
        validators.push(Validator::MultipleOf { factor });
    }

    validators
}
