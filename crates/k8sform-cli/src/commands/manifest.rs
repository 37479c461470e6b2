//! Manifest command - render the YAML a configuration describes

use std::path::Path;

use super::{GlobalOptions, read_model};
use crate::display;
use crate::error::{CliError, Result};
use k8sform_provider::DataSource;

pub async fn run(
    options: &GlobalOptions,
    type_name: &str,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let provider = options.offline_provider()?;
    let data_source = match type_name.strip_suffix(k8sform_provider::MANIFEST_SUFFIX) {
        Some(_) => provider.data_source(type_name)?,
        None => provider.data_source(&format!("{}{}", type_name, k8sform_provider::MANIFEST_SUFFIX))?,
    };

    let config = read_model(file)?;
    let warnings = data_source.validate(&config);
    let state = data_source.read(&config).await.map_err(|diagnostics| {
        display::print_diagnostics(&diagnostics);
        CliError::rejected(&diagnostics)
    })?;
    if !warnings.is_empty() {
        display::print_diagnostics(&warnings);
    }

    let yaml = state["yaml"].as_str().unwrap_or_default();
    match output {
        Some(path) => {
            std::fs::write(path, yaml)?;
            tracing::info!(path = %path.display(), "wrote manifest");
        }
        None => print!("{}", yaml),
    }
    Ok(())
}
