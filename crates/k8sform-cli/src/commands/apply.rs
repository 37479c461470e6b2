//! Apply command - create, update or replace an object

use console::style;
use std::path::Path;

use super::{GlobalOptions, cluster_failure, read_model, read_state, rejected, write_state};
use crate::error::Result;
use k8sform_provider::Resource;

pub async fn run(
    options: &GlobalOptions,
    type_name: &str,
    file: &Path,
    state_path: Option<&Path>,
) -> Result<()> {
    let provider = options.provider().await?;
    let resource = provider.resource(type_name)?;
    let config = read_model(file)?;

    let prior = match read_state(state_path)? {
        Some(state) => resource.read(&state).await.map_err(cluster_failure)?,
        None => None,
    };
    let plan = resource.plan(prior.as_ref(), &config).map_err(rejected)?;
    let id = plan.planned_state["id"].as_str().unwrap_or_default().to_string();

    let state = match prior {
        None => {
            let state = resource
                .create(&plan.planned_state)
                .await
                .map_err(cluster_failure)?;
            println!("{} Created {}", style("✓").green(), id);
            state
        }
        Some(prior) if plan.requires_replace() => {
            resource.delete(&prior).await.map_err(cluster_failure)?;
            let state = resource
                .create(&plan.planned_state)
                .await
                .map_err(cluster_failure)?;
            println!("{} Replaced {}", style("✓").green(), id);
            state
        }
        Some(prior) if !plan.has_changes() => {
            println!("{} {} is up to date", style("✓").green(), id);
            prior
        }
        Some(prior) => {
            let state = resource
                .update(&prior, &plan.planned_state)
                .await
                .map_err(cluster_failure)?;
            println!(
                "{} Updated {} ({})",
                style("✓").green(),
                id,
                plan.changed.join(", ")
            );
            state
        }
    };

    match state_path {
        Some(path) => write_state(path, &state)?,
        None => println!("{}", serde_json::to_string_pretty(&state)?),
    }
    Ok(())
}
