//! CLI commands

use std::path::{Path, PathBuf};

use serde_json::Value;

use k8sform_provider::{
    Catalog, CrdResource, Diagnostics, ManifestDataSource, Provider, ProviderConfig,
};

use crate::display;
use crate::error::{CliError, Result};

// Offline commands
pub mod catalog;
pub mod check_examples;
pub mod generate;
pub mod manifest;
pub mod schema;
pub mod validate;

// Cluster commands
pub mod apply;
pub mod delete;
pub mod import;
pub mod plan;
pub mod read;

/// Settings shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Extra CRD files or directories
    pub crds: Vec<PathBuf>,
    /// Provider configuration file; the default location otherwise
    pub config: Option<PathBuf>,
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
    pub field_manager: Option<String>,
    pub force_conflicts: bool,
    pub offline: bool,
}

impl GlobalOptions {
    /// Built-in catalog plus every `--crd` path
    pub fn catalog(&self) -> Result<Catalog> {
        let mut catalog = Catalog::builtin()?;
        for path in &self.crds {
            let added = catalog.add_path(path)?;
            tracing::debug!(path = %path.display(), types = added.len(), "loaded CRDs");
        }
        Ok(catalog)
    }

    /// Configuration file overlaid with command-line flags
    pub fn provider_config(&self) -> Result<ProviderConfig> {
        let mut config = match &self.config {
            Some(path) => ProviderConfig::load(path)?,
            None => ProviderConfig::load_default()?,
        };

        if self.kubeconfig.is_some() {
            config.kubeconfig = self.kubeconfig.clone();
        }
        if self.context.is_some() {
            config.context = self.context.clone();
        }
        if self.field_manager.is_some() {
            config.field_manager = self.field_manager.clone();
        }
        if self.force_conflicts {
            config.force_conflicts = Some(true);
        }
        config.offline |= self.offline;
        Ok(config)
    }

    /// A provider that never contacts the cluster
    pub fn offline_provider(&self) -> Result<Provider> {
        Ok(Provider::new(self.catalog()?))
    }

    /// A configured provider, connected unless configured offline
    pub async fn provider(&self) -> Result<Provider> {
        let mut provider = Provider::new(self.catalog()?);
        provider.configure(self.provider_config()?).await?;
        Ok(provider)
    }
}

/// Either kind of type, resolved from its name
pub enum TypeHandle {
    Resource(CrdResource),
    DataSource(ManifestDataSource),
}

impl TypeHandle {
    pub fn resolve(provider: &Provider, type_name: &str) -> Result<Self> {
        if type_name.ends_with(k8sform_provider::MANIFEST_SUFFIX) {
            Ok(Self::DataSource(provider.data_source(type_name)?))
        } else {
            Ok(Self::Resource(provider.resource(type_name)?))
        }
    }
}

/// Report diagnostics from validation or planning
pub fn rejected(diagnostics: Diagnostics) -> CliError {
    display::print_diagnostics(&diagnostics);
    CliError::rejected(&diagnostics)
}

/// Report diagnostics from a cluster operation
pub fn cluster_failure(diagnostics: Diagnostics) -> CliError {
    display::print_diagnostics(&diagnostics);
    CliError::cluster(&diagnostics)
}

/// Read a configuration model from a YAML or JSON file (`-` for stdin)
pub fn read_model(path: &Path) -> Result<Value> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path).map_err(|e| CliError::Io {
            message: format!("{}: {}", path.display(), e),
        })?
    };

    if content.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let model: Value = serde_yaml::from_str(&content).map_err(|e| {
        CliError::validation_with_help(
            format!("{} is not valid YAML: {}", path.display(), e),
            "configuration files use the attribute names shown by `k8sform schema <type>`",
        )
    })?;
    if !model.is_object() {
        return Err(CliError::validation(format!(
            "{} must contain a mapping of attributes",
            path.display()
        )));
    }
    Ok(model)
}

/// Read a saved state, if the file exists
pub fn read_state(path: Option<&Path>) -> Result<Option<Value>> {
    match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path)?;
            Ok(Some(serde_json::from_str(&content)?))
        }
        _ => Ok(None),
    }
}

pub fn write_state(path: &Path, state: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json + "\n")?;
    tracing::debug!(path = %path.display(), "wrote state");
    Ok(())
}
