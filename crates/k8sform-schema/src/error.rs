//! Error types for k8sform-schema

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while reading CRD documents
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The document is not valid YAML/JSON
    #[error("invalid CRD document: {0}")]
    Parse(String),

    /// The document is a Kubernetes object of another kind
    #[error("expected CustomResourceDefinition, got {kind}")]
    NotACrd { kind: String },

    /// A required field of the CRD is absent
    #[error("CRD is missing required field '{field}'")]
    MissingField { field: String },

    /// A CRD version declares no OpenAPI schema
    #[error("version '{version}' of CRD '{crd}' has no openAPIV3Schema")]
    MissingSchema { crd: String, version: String },
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(e: serde_yaml::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}
