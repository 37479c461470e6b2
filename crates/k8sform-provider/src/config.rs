//! Provider configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use k8sform_kube::ClientSettings;

use crate::error::{ProviderError, Result};

/// Provider block settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Path to a kubeconfig file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Default field manager for server-side apply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_manager: Option<String>,

    /// Default for forcing ownership conflicts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_conflicts: Option<bool>,

    /// Serve manifest data sources only, without a cluster connection
    pub offline: bool,
}

impl ProviderConfig {
    /// Default location: `<config dir>/k8sform/provider.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("k8sform").join("provider.yaml"))
    }

    /// Load from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| ProviderError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the default file if it exists
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading provider configuration");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Cluster connection settings
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings::new(self.kubeconfig.clone(), self.context.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full() {
        let config = ProviderConfig::from_yaml(
            r#"
kubeconfig: /etc/k8s/admin.conf
context: prod
field_manager: platform
force_conflicts: true
"#,
        )
        .unwrap();

        assert_eq!(config.kubeconfig, Some(PathBuf::from("/etc/k8s/admin.conf")));
        assert_eq!(config.context.as_deref(), Some("prod"));
        assert_eq!(config.field_manager.as_deref(), Some("platform"));
        assert_eq!(config.force_conflicts, Some(true));
        assert!(!config.offline);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(ProviderConfig::from_yaml("").unwrap(), ProviderConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ProviderConfig::from_yaml("kube_config: x").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"offline: maybe").unwrap();

        let err = ProviderConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ProviderError::Config { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_client_settings() {
        let config = ProviderConfig {
            context: Some("dev".into()),
            ..Default::default()
        };
        let settings = config.client_settings();
        assert_eq!(settings.context.as_deref(), Some("dev"));
        assert_eq!(settings.kubeconfig, None);
    }
}
