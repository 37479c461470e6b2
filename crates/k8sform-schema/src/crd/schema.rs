//! CRD schema representation
//!
//! Structured types for the subset of a CustomResourceDefinition that drives
//! attribute generation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parsed CustomResourceDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct CrdSchema {
    /// Full CRD name (e.g., "verticalpodautoscalers.autoscaling.k8s.io")
    pub name: String,
    /// API group (e.g., "autoscaling.k8s.io")
    pub group: String,
    /// Resource scope
    pub scope: CrdScope,
    /// Resource names (kind, plural, singular, shortNames)
    pub names: CrdNames,
    /// API versions with their schemas
    pub versions: Vec<CrdVersionSchema>,
}

impl CrdSchema {
    /// Get the storage version
    pub fn storage_version(&self) -> Option<&CrdVersionSchema> {
        self.versions.iter().find(|v| v.storage)
    }

    /// Get all served versions
    pub fn served_versions(&self) -> impl Iterator<Item = &CrdVersionSchema> {
        self.versions.iter().filter(|v| v.served)
    }

    /// Check if a specific version exists
    pub fn has_version(&self, name: &str) -> bool {
        self.versions.iter().any(|v| v.name == name)
    }

    /// `apiVersion` string for one of this CRD's versions
    pub fn api_version(&self, version: &str) -> String {
        format!("{}/{}", self.group, version)
    }
}

/// CRD scope - whether resources are namespaced or cluster-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CrdScope {
    #[default]
    Namespaced,
    Cluster,
}

impl CrdScope {
    pub fn is_namespaced(self) -> bool {
        self == Self::Namespaced
    }
}

impl std::fmt::Display for CrdScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespaced => write!(f, "Namespaced"),
            Self::Cluster => write!(f, "Cluster"),
        }
    }
}

/// CRD naming information
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrdNames {
    /// Kind (e.g., "VerticalPodAutoscaler")
    pub kind: String,
    /// Plural name used in REST paths (e.g., "verticalpodautoscalers")
    pub plural: String,
    /// Singular name (e.g., "verticalpodautoscaler")
    pub singular: Option<String>,
    /// Short names for kubectl (e.g., ["vpa"])
    pub short_names: Vec<String>,
    /// List kind (e.g., "VerticalPodAutoscalerList")
    pub list_kind: Option<String>,
}

/// A single API version of a CRD
#[derive(Debug, Clone, PartialEq)]
pub struct CrdVersionSchema {
    /// Version name (e.g., "v1", "v1beta1", "v1alpha1")
    pub name: String,
    /// Whether this version is served by the API server
    pub served: bool,
    /// Whether this is the storage version
    pub storage: bool,
    /// Whether this version is deprecated
    pub deprecated: bool,
    /// Deprecation warning message
    pub deprecation_warning: Option<String>,
    /// OpenAPI v3 schema for validation
    pub schema: Option<OpenApiSchema>,
}

impl CrdVersionSchema {
    /// Get the root spec schema if present
    pub fn spec_schema(&self) -> Option<&SchemaProperty> {
        self.schema.as_ref().and_then(|s| s.properties.get("spec"))
    }
}

/// OpenAPI v3 schema at the root of a CRD version
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OpenApiSchema {
    /// Description of the whole object
    pub description: Option<String>,
    /// Root properties (typically: apiVersion, kind, metadata, spec, status)
    pub properties: BTreeMap<String, SchemaProperty>,
    /// Required field names at root level
    pub required: Vec<String>,
    /// Whether to preserve unknown fields
    pub x_preserve_unknown: bool,
}

impl OpenApiSchema {
    /// Check if a property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Root properties that make up the object body
    ///
    /// Type and object metadata are owned by the provider, status by the
    /// cluster.
    pub fn body_properties(&self) -> impl Iterator<Item = (&String, &SchemaProperty)> {
        self.properties
            .iter()
            .filter(|(name, _)| !matches!(name.as_str(), "apiVersion" | "kind" | "metadata" | "status"))
    }
}

/// Schema for a single property
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaProperty {
    /// Property type
    pub type_: PropertyType,
    /// Human-readable description
    pub description: Option<String>,
    /// Default value
    pub default: Option<serde_json::Value>,
    /// Format hint (e.g., "date-time", "int32")
    pub format: Option<String>,
    /// Regex pattern for strings
    pub pattern: Option<String>,
    /// Allowed values (enum)
    pub enum_values: Option<Vec<serde_json::Value>>,
    /// Minimum value for numbers
    pub minimum: Option<f64>,
    /// Maximum value for numbers
    pub maximum: Option<f64>,
    /// `minimum` is exclusive
    pub exclusive_minimum: bool,
    /// `maximum` is exclusive
    pub exclusive_maximum: bool,
    /// Numbers must be a multiple of this
    pub multiple_of: Option<f64>,
    /// Minimum string length
    pub min_length: Option<u64>,
    /// Maximum string length
    pub max_length: Option<u64>,
    /// Minimum array items
    pub min_items: Option<u64>,
    /// Maximum array items
    pub max_items: Option<u64>,
    /// Array items must be distinct
    pub unique_items: bool,
    /// Minimum object entries
    pub min_properties: Option<u64>,
    /// Maximum object entries
    pub max_properties: Option<u64>,
    /// Nested object properties
    pub properties: Option<BTreeMap<String, SchemaProperty>>,
    /// Required nested properties
    pub required: Option<Vec<String>>,
    /// Array item schema
    pub items: Option<Box<SchemaProperty>>,
    /// Additional properties for objects
    pub additional_properties: Option<AdditionalProperties>,
    /// Preserve unknown fields
    pub x_preserve_unknown: bool,
    /// Kubernetes embedded resource
    pub x_embedded_resource: bool,
    /// Integer or string (for ports, percentages, ...)
    pub x_int_or_string: bool,
}

impl SchemaProperty {
    /// Create a simple string property
    pub fn string() -> Self {
        Self {
            type_: PropertyType::String,
            ..Default::default()
        }
    }

    /// Create a simple integer property
    pub fn integer() -> Self {
        Self {
            type_: PropertyType::Integer,
            ..Default::default()
        }
    }

    /// Create a simple boolean property
    pub fn boolean() -> Self {
        Self {
            type_: PropertyType::Boolean,
            ..Default::default()
        }
    }

    /// Create an object property with nested properties
    pub fn object(properties: BTreeMap<String, SchemaProperty>) -> Self {
        Self {
            type_: PropertyType::Object,
            properties: Some(properties),
            ..Default::default()
        }
    }

    /// Create an array property with item schema
    pub fn array(items: SchemaProperty) -> Self {
        Self {
            type_: PropertyType::Array,
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Check if this property has nested properties
    pub fn has_nested_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Get a nested property by path (dot-separated)
    pub fn get_nested(&self, path: &str) -> Option<&SchemaProperty> {
        let mut current = self;
        for part in path.split('.') {
            current = current.properties.as_ref()?.get(part)?;
        }
        Some(current)
    }

    /// Check if a nested property is required
    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|n| n == name))
    }

    /// String enum values, if every enum entry is a string
    pub fn string_enum(&self) -> Option<Vec<String>> {
        let values = self.enum_values.as_ref()?;
        values
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect()
    }
}

/// Property type in OpenAPI schema
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    #[default]
    Object,
    /// Unknown or unspecified type
    Unknown(String),
}

impl PropertyType {
    /// Parse from string representation
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array => write!(f, "array"),
            Self::Object => write!(f, "object"),
            Self::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Additional properties configuration for objects
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AdditionalProperties {
    /// Additional properties are allowed (any type)
    #[default]
    Allowed,
    /// Additional properties are not allowed
    Denied,
    /// Additional properties must match a schema
    Schema(Box<SchemaProperty>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_property_nested() {
        let mut nested = BTreeMap::new();
        nested.insert("updateMode".to_string(), SchemaProperty::string());
        nested.insert("minReplicas".to_string(), SchemaProperty::integer());

        let policy = SchemaProperty {
            type_: PropertyType::Object,
            properties: Some(nested),
            required: Some(vec!["updateMode".to_string()]),
            ..Default::default()
        };

        assert!(policy.has_nested_properties());
        assert!(policy.is_required("updateMode"));
        assert!(!policy.is_required("minReplicas"));
        assert!(policy.get_nested("minReplicas").is_some());
        assert!(policy.get_nested("nonexistent").is_none());
    }

    #[test]
    fn test_string_enum() {
        let mut prop = SchemaProperty::string();
        prop.enum_values = Some(vec![
            serde_json::json!("Off"),
            serde_json::json!("Auto"),
        ]);
        assert_eq!(prop.string_enum(), Some(vec!["Off".into(), "Auto".into()]));

        prop.enum_values = Some(vec![serde_json::json!(1), serde_json::json!("x")]);
        assert_eq!(prop.string_enum(), None);
    }

    #[test]
    fn test_crd_scope_display() {
        assert_eq!(CrdScope::Namespaced.to_string(), "Namespaced");
        assert_eq!(CrdScope::Cluster.to_string(), "Cluster");
        assert!(CrdScope::Namespaced.is_namespaced());
        assert!(!CrdScope::Cluster.is_namespaced());
    }

    #[test]
    fn test_body_properties_skip_owned_fields() {
        let mut properties = BTreeMap::new();
        for name in ["apiVersion", "kind", "metadata", "spec", "status", "data"] {
            properties.insert(name.to_string(), SchemaProperty::string());
        }
        let schema = OpenApiSchema {
            properties,
            ..Default::default()
        };

        let body: Vec<&str> = schema.body_properties().map(|(n, _)| n.as_str()).collect();
        assert_eq!(body, vec!["data", "spec"]);
    }

    #[test]
    fn test_crd_schema_versions() {
        let schema = CrdSchema {
            name: "tests.example.com".to_string(),
            group: "example.com".to_string(),
            scope: CrdScope::Namespaced,
            names: CrdNames {
                kind: "Test".to_string(),
                plural: "tests".to_string(),
                ..Default::default()
            },
            versions: vec![
                CrdVersionSchema {
                    name: "v1".to_string(),
                    served: true,
                    storage: true,
                    deprecated: false,
                    deprecation_warning: None,
                    schema: None,
                },
                CrdVersionSchema {
                    name: "v1beta1".to_string(),
                    served: false,
                    storage: false,
                    deprecated: true,
                    deprecation_warning: Some("Use v1 instead".to_string()),
                    schema: None,
                },
            ],
        };

        assert!(schema.has_version("v1"));
        assert!(schema.has_version("v1beta1"));
        assert!(!schema.has_version("v2"));

        assert_eq!(schema.storage_version().unwrap().name, "v1");
        assert_eq!(schema.served_versions().count(), 1);
        assert_eq!(schema.api_version("v1"), "example.com/v1");
    }
}
