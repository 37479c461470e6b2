//! Delete command - remove an object from the cluster

use console::style;
use serde_json::json;
use std::path::Path;

use super::{GlobalOptions, cluster_failure, read_state, rejected};
use crate::error::{CliError, Result};
use k8sform_provider::Resource;

pub async fn run(
    options: &GlobalOptions,
    type_name: &str,
    id: Option<&str>,
    state_path: Option<&Path>,
    propagation: Option<&str>,
) -> Result<()> {
    let provider = options.provider().await?;
    let resource = provider.resource(type_name)?;

    let mut state = match (read_state(state_path)?, id) {
        (Some(state), _) => state,
        (None, Some(id)) => resource.import_state(id).await.map_err(rejected)?,
        (None, None) => {
            return Err(CliError::validation_with_help(
                "nothing to delete",
                "pass an object ID or an existing --state file",
            ));
        }
    };
    if let Some(propagation) = propagation {
        state["deletion_propagation"] = json!(propagation);
    }

    resource.delete(&state).await.map_err(cluster_failure)?;

    if let Some(path) = state_path.filter(|p| p.exists()) {
        std::fs::remove_file(path)?;
    }
    println!(
        "{} Deleted {}",
        style("✓").green(),
        state["id"].as_str().or(id).unwrap_or_default()
    );
    Ok(())
}
