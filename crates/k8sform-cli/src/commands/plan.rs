//! Plan command - show what apply would change

use console::style;
use serde_json::Value;
use std::path::Path;

use super::{GlobalOptions, cluster_failure, read_model, read_state, rejected};
use crate::display;
use crate::error::Result;
use k8sform_provider::{PlanResult, Resource, render_yaml};

/// Fields the server owns; left out of diffs
const SERVER_METADATA: [&str; 5] = [
    "managedFields",
    "resourceVersion",
    "generation",
    "uid",
    "creationTimestamp",
];

pub async fn run(
    options: &GlobalOptions,
    type_name: &str,
    file: &Path,
    state_path: Option<&Path>,
) -> Result<()> {
    let provider = options.provider().await?;
    let resource = provider.resource(type_name)?;
    let config = read_model(file)?;
    let prior = read_state(state_path)?;

    let plan = resource.plan(prior.as_ref(), &config).map_err(rejected)?;
    print_summary(resource.type_name(), prior.is_some(), &plan);

    let (before, after) = if provider.is_offline() {
        tracing::debug!("offline, diffing against the prior configuration");
        let before = prior
            .as_ref()
            .map(|p| render_yaml(&resource.desired_object(p)))
            .transpose()?;
        (before, render_yaml(&resource.desired_object(&config))?)
    } else {
        let live = resource
            .live_object(&config)
            .await
            .map_err(cluster_failure)?;
        let stored = resource.dry_run(&config).await.map_err(cluster_failure)?;
        let before = live.map(|o| render_yaml(&comparable(o))).transpose()?;
        (before, render_yaml(&comparable(stored))?)
    };

    println!();
    display::print_diff(before.as_deref().unwrap_or_default(), &after);
    Ok(())
}

fn print_summary(type_name: &str, has_prior: bool, plan: &PlanResult) {
    let id = plan.planned_state["id"].as_str().unwrap_or_default();
    let action = if !has_prior {
        style("create").green()
    } else if plan.requires_replace() {
        style("replace").red()
    } else if plan.has_changes() {
        style("update").yellow()
    } else {
        style("no changes").dim()
    };
    println!("{} {} {}", action, style(type_name).cyan(), id);

    if has_prior {
        for attribute in &plan.changed {
            println!("  {} {}", style("~").yellow(), attribute);
        }
        for path in &plan.requires_replace {
            println!("  {} {} forces replacement", style("!").red(), path);
        }
    }
}

/// Object without server-managed fields
fn comparable(mut object: Value) -> Value {
    if let Some(fields) = object.as_object_mut() {
        fields.remove("status");
        if let Some(metadata) = fields.get_mut("metadata").and_then(Value::as_object_mut) {
            for key in SERVER_METADATA {
                metadata.remove(key);
            }
        }
    }
    object
}
