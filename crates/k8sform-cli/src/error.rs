//! CLI error types with exit code handling

use miette::Diagnostic;
use thiserror::Error;

use k8sform_provider::{Diagnostics, ProviderError};

use crate::exit_codes;

/// CLI error carrying its exit code
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration rejected before anything reached the cluster
    #[error("Validation failed: {message}")]
    #[diagnostic(code(k8sform::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Unknown type or unusable CRD input
    #[error("Catalog error: {message}")]
    #[diagnostic(code(k8sform::cli::catalog))]
    Catalog {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The cluster failed an operation, or could not be reached
    #[error("Cluster error: {message}")]
    #[diagnostic(code(k8sform::cli::cluster))]
    Cluster {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{count} example file(s) missing or stale")]
    #[diagnostic(
        code(k8sform::cli::examples),
        help("regenerate them with `k8sform generate --out <dir>`")
    )]
    Examples { count: usize },

    #[error("IO error: {message}")]
    #[diagnostic(code(k8sform::cli::io))]
    Io { message: String },

    #[error("{message}")]
    #[diagnostic(code(k8sform::cli::error))]
    Other { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Catalog { .. } => exit_codes::CATALOG_ERROR,
            CliError::Cluster { .. } => exit_codes::CLUSTER_ERROR,
            CliError::Examples { .. } => exit_codes::EXAMPLES_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Validation or planning produced error diagnostics
    pub fn rejected(diagnostics: &Diagnostics) -> Self {
        Self::Validation {
            message: summarize(diagnostics),
            help: None,
        }
    }

    /// A cluster operation produced error diagnostics
    pub fn cluster(diagnostics: &Diagnostics) -> Self {
        Self::Cluster {
            message: summarize(diagnostics),
            help: None,
        }
    }
}

fn summarize(diagnostics: &Diagnostics) -> String {
    let errors: Vec<_> = diagnostics.iter().filter(|d| d.is_error()).collect();
    match errors.as_slice() {
        [] => "no errors reported".to_string(),
        [only] => only.summary.clone(),
        [first, rest @ ..] => format!("{} (and {} more)", first.summary, rest.len()),
    }
}

impl From<ProviderError> for CliError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        match err {
            ProviderError::UnknownType { suggestion, .. } => CliError::Catalog {
                message,
                help: suggestion,
            },
            ProviderError::Schema(_)
            | ProviderError::DuplicateType { .. }
            | ProviderError::NoServedVersions { .. } => CliError::Catalog {
                message,
                help: None,
            },
            ProviderError::InvalidImportId { expected, .. } => CliError::Validation {
                message,
                help: Some(expected),
            },
            ProviderError::Config { .. } => CliError::validation(message),
            ProviderError::Kube(_) => CliError::Cluster {
                message,
                help: Some("check the kubeconfig and context settings".to_string()),
            },
            ProviderError::Offline => CliError::Cluster {
                message,
                help: Some("remove --offline to manage resources".to_string()),
            },
            ProviderError::Io(_) => CliError::Io { message },
            ProviderError::Marshal(_) => CliError::Other { message },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::Other {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
