//! Provider error types

use miette::Diagnostic;
use thiserror::Error;

use k8sform_kube::KubeError;
use k8sform_schema::SchemaError;

/// Result type for provider operations that fail with a single error
pub type Result<T> = std::result::Result<T, ProviderError>;

#[derive(Error, Debug, Diagnostic)]
pub enum ProviderError {
    #[error("Invalid CRD: {0}")]
    #[diagnostic(code(k8sform::provider::crd))]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    #[diagnostic(code(k8sform::provider::kubernetes))]
    Kube(#[from] KubeError),

    #[error("Unknown {category} type \"{name}\"")]
    #[diagnostic(code(k8sform::provider::unknown_type))]
    UnknownType {
        category: &'static str,
        name: String,
        #[help]
        suggestion: Option<String>,
    },

    #[error("Type \"{name}\" is already registered by {existing}")]
    #[diagnostic(code(k8sform::provider::duplicate_type))]
    DuplicateType { name: String, existing: String },

    #[error("CRD {crd} has no served version with a schema")]
    #[diagnostic(code(k8sform::provider::no_versions))]
    NoServedVersions { crd: String },

    #[error("Invalid import ID \"{id}\"")]
    #[diagnostic(code(k8sform::provider::import_id))]
    InvalidImportId {
        id: String,
        #[help]
        expected: String,
    },

    #[error("Provider is offline")]
    #[diagnostic(
        code(k8sform::provider::offline),
        help("unset `offline` in the provider configuration to manage resources")
    )]
    Offline,

    #[error("Invalid provider configuration {path}: {message}")]
    #[diagnostic(code(k8sform::provider::config))]
    Config { path: String, message: String },

    #[error("Unable to marshal manifest: {0}")]
    #[diagnostic(code(k8sform::provider::marshal))]
    Marshal(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(k8sform::provider::io))]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Whether the error came from the Kubernetes API or the connection to it
    pub fn is_cluster_error(&self) -> bool {
        matches!(self, ProviderError::Kube(_))
    }
}
