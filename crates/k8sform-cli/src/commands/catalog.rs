//! Catalog command - list every resource and data source type

use console::style;
use serde::Serialize;

use super::GlobalOptions;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct CatalogEntry {
    resource: String,
    data_source: String,
    api_version: String,
    kind: String,
    namespaced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    deprecation_warning: Option<String>,
}

pub fn run(options: &GlobalOptions, json: bool) -> Result<()> {
    let catalog = options.catalog()?;
    let entries: Vec<CatalogEntry> = catalog
        .iter()
        .map(|d| CatalogEntry {
            resource: d.type_name.clone(),
            data_source: d.data_source_name(),
            api_version: d.api_version(),
            kind: d.kind.clone(),
            namespaced: d.is_namespaced(),
            deprecation_warning: d.deprecation_warning.clone(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let width = entries.iter().map(|e| e.resource.len()).max().unwrap_or(0);
    println!(
        "{:<width$}  {:<32}  {}",
        style("TYPE").bold(),
        style("API VERSION").bold(),
        style("KIND").bold(),
        width = width
    );
    for entry in &entries {
        let scope = if entry.namespaced { "" } else { " (cluster)" };
        println!(
            "{:<width$}  {:<32}  {}{}",
            entry.resource,
            entry.api_version,
            entry.kind,
            style(scope).dim(),
            width = width
        );
        if let Some(warning) = &entry.deprecation_warning {
            println!("  {} {}", style("⚠").yellow(), warning);
        }
    }
    println!();
    println!(
        "{} resource(s), each with a {} data source",
        entries.len(),
        style("_manifest").cyan()
    );
    Ok(())
}
