//! Read command - show the current state of an object

use super::{GlobalOptions, cluster_failure, rejected};
use crate::error::{CliError, Result};
use k8sform_provider::{Provider, Resource};
use serde_json::Value;

pub async fn run(options: &GlobalOptions, type_name: &str, id: &str, json: bool) -> Result<()> {
    let provider = options.provider().await?;
    let state = fetch(&provider, type_name, id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", serde_yaml::to_string(&state)?);
    }
    Ok(())
}

/// Seed a state from the import ID and refresh it from the cluster
pub(crate) async fn fetch(provider: &Provider, type_name: &str, id: &str) -> Result<Value> {
    let resource = provider.resource(type_name)?;
    let seed = resource.import_state(id).await.map_err(rejected)?;

    resource
        .read(&seed)
        .await
        .map_err(cluster_failure)?
        .ok_or_else(|| CliError::Cluster {
            message: format!("{} {} not found", resource.definition().kind, id),
            help: None,
        })
}

