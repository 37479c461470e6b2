//! Validate command - check a configuration against a type's schema

use console::style;
use std::path::Path;

use super::{GlobalOptions, TypeHandle, read_model};
use crate::display;
use crate::error::{CliError, Result};
use k8sform_provider::{DataSource, Diagnostics, Resource};

pub fn run(options: &GlobalOptions, type_name: &str, file: &Path, json: bool) -> Result<()> {
    let provider = options.offline_provider()?;
    let config = read_model(file)?;

    let diagnostics: Diagnostics = match TypeHandle::resolve(&provider, type_name)? {
        TypeHandle::Resource(resource) => resource.validate(&config),
        TypeHandle::DataSource(data_source) => data_source.validate(&config),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        display::print_diagnostics(&diagnostics);
    }

    if diagnostics.has_errors() {
        return Err(CliError::rejected(&diagnostics));
    }
    if !json {
        println!(
            "{} {} is a valid {} configuration",
            style("✓").green(),
            file.display(),
            style(type_name).cyan()
        );
    }
    Ok(())
}
