//! Error types for k8sform-kube

use thiserror::Error;

/// Result type for k8sform-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur during Kubernetes operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// API status returned without a kube-rs transport (mock client)
    #[error("{reason} ({code}): {message}")]
    Status {
        code: u16,
        reason: String,
        message: String,
    },

    /// Kubeconfig could not be read or resolved
    #[error("invalid kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// No usable client configuration could be inferred
    #[error("unable to infer cluster configuration: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Object is not a valid Kubernetes object
    #[error("invalid object: {0}")]
    InvalidObject(String),
}

impl From<serde_json::Error> for KubeError {
    fn from(e: serde_json::Error) -> Self {
        KubeError::Serialization(e.to_string())
    }
}

impl KubeError {
    /// HTTP status code, when the error came from the API server
    pub fn status_code(&self) -> Option<u16> {
        match self {
            KubeError::Api(kube::Error::Api(resp)) => Some(resp.code),
            KubeError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Check if this is a conflict error (409)
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }
}
