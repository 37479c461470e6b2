//! Check-examples command - every type has an up-to-date example

use console::style;
use std::path::Path;

use super::GlobalOptions;
use crate::error::{CliError, Result};
use k8sform_provider::{generate_examples, missing_examples};

pub fn run(options: &GlobalOptions, dir: &Path) -> Result<()> {
    let catalog = options.catalog()?;

    let missing = missing_examples(&catalog, dir);
    for path in &missing {
        println!("  {} missing {}", style("✗").red(), path.display());
    }

    let stale: Vec<_> = generate_examples(&catalog)
        .into_iter()
        .filter(|file| !missing.contains(&file.path))
        .filter(|file| {
            std::fs::read_to_string(dir.join(&file.path))
                .map(|on_disk| on_disk != file.contents)
                .unwrap_or(true)
        })
        .collect();
    for file in &stale {
        println!("  {} stale {}", style("⚠").yellow(), file.path.display());
    }

    let count = missing.len() + stale.len();
    if count > 0 {
        return Err(CliError::Examples { count });
    }

    println!(
        "{} {} example file(s) up to date in {}",
        style("✓").green(),
        catalog.len() * 2,
        dir.display()
    );
    Ok(())
}
