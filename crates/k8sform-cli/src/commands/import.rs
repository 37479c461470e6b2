//! Import command - adopt an existing object into a state file

use console::style;
use std::path::Path;

use super::{GlobalOptions, write_state};
use crate::error::Result;

pub async fn run(
    options: &GlobalOptions,
    type_name: &str,
    id: &str,
    state_path: Option<&Path>,
) -> Result<()> {
    let provider = options.provider().await?;
    let state = super::read::fetch(&provider, type_name, id).await?;

    match state_path {
        Some(path) => {
            write_state(path, &state)?;
            println!(
                "{} Imported {} into {}",
                style("✓").green(),
                id,
                path.display()
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&state)?),
    }
    Ok(())
}
