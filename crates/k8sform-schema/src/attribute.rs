//! Attribute schema model
//!
//! A `Schema` is the tree of attributes a resource or data source accepts.
//! Every attribute carries both its provider name (snake_case) and the
//! Kubernetes field name it maps to.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::validators::Validator;

/// Whether an attribute is set by the user, by the provider, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

impl AttributeMode {
    pub fn is_required(self) -> bool {
        self == Self::Required
    }

    /// Whether the user may set this attribute in configuration
    pub fn is_configurable(self) -> bool {
        self != Self::Computed
    }

    /// Whether the provider may fill this attribute
    pub fn is_computed(self) -> bool {
        matches!(self, Self::Computed | Self::OptionalComputed)
    }
}

/// Value type of an attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Float64,
    Bool,
    /// Any JSON value (int-or-string, preserve-unknown-fields, ...)
    Dynamic,
    List(Box<AttributeKind>),
    Map(Box<AttributeKind>),
    Object(Vec<Attribute>),
}

impl AttributeKind {
    /// Nested attributes of an object kind
    pub fn attributes(&self) -> Option<&[Attribute]> {
        match self {
            Self::Object(attrs) => Some(attrs),
            _ => None,
        }
    }

    /// Short type description used in diagnostics
    pub fn type_label(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Int64 => "number (int64)".to_string(),
            Self::Float64 => "number".to_string(),
            Self::Bool => "bool".to_string(),
            Self::Dynamic => "dynamic".to_string(),
            Self::List(inner) => format!("list of {}", inner.type_label()),
            Self::Map(inner) => format!("map of {}", inner.type_label()),
            Self::Object(_) => "object".to_string(),
        }
    }
}

/// A single attribute in a schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    /// Attribute name as seen in configuration
    pub name: String,
    /// Field name on the Kubernetes object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k8s_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind, mode: AttributeMode) -> Self {
        Self {
            name: name.into(),
            k8s_name: None,
            description: None,
            kind,
            mode,
            sensitive: false,
            validators: Vec::new(),
        }
    }

    pub fn required(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Required)
    }

    pub fn optional(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Optional)
    }

    pub fn computed(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Computed)
    }

    /// Set the Kubernetes field this attribute maps to
    pub fn with_k8s_name(mut self, k8s_name: impl Into<String>) -> Self {
        self.k8s_name = Some(k8s_name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Kubernetes field name, falling back to the attribute name
    pub fn wire_name(&self) -> &str {
        self.k8s_name.as_deref().unwrap_or(&self.name)
    }

    /// Nested attribute by name (objects only)
    pub fn child(&self, name: &str) -> Option<&Attribute> {
        self.kind.attributes()?.iter().find(|a| a.name == name)
    }
}

/// Schema of a resource, data source or provider block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self {
            version: 0,
            description: None,
            attributes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Top-level attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Attribute at a dotted path of object attribute names
    pub fn attribute_at(&self, path: &str) -> Option<&Attribute> {
        let mut parts = path.split('.');
        let mut current = self.attribute(parts.next()?)?;
        for part in parts {
            current = current.child(part)?;
        }
        Some(current)
    }

    /// An object value with every top-level attribute set to null
    pub fn null_object(&self) -> Value {
        Value::Object(
            self.attributes
                .iter()
                .map(|a| (a.name.clone(), Value::Null))
                .collect(),
        )
    }
}

/// One step of an attribute path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    Attribute(String),
    Index(usize),
    Key(String),
}

/// Location of a value inside a schema-shaped document
///
/// Displays like Terraform paths: `spec.containers[0].name`,
/// `metadata.labels["app"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

impl AttributePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: impl Into<String>) -> Self {
        self.with(PathStep::Attribute(name.into()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.with(PathStep::Index(index))
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with(PathStep::Key(key.into()))
    }

    fn with(&self, step: PathStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<&str> for AttributePath {
    /// Build a path of attribute steps from a dotted name
    fn from(dotted: &str) -> Self {
        Self {
            steps: dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| PathStep::Attribute(s.to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
                PathStep::Key(key) => write!(f, "[{:?}]", key)?,
            }
        }
        Ok(())
    }
}

impl Serialize for AttributePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
