//! Generate command - write example configurations for every type

use console::style;
use std::path::Path;

use super::GlobalOptions;
use crate::error::Result;
use k8sform_provider::write_examples;

pub fn run(options: &GlobalOptions, out: &Path) -> Result<()> {
    let catalog = options.catalog()?;
    let written = write_examples(&catalog, out)?;

    for path in &written {
        println!("  {} {}", style("+").green(), path.display());
    }
    println!(
        "{} Wrote {} example file(s) to {}",
        style("✓").green(),
        written.len(),
        out.display()
    );
    Ok(())
}
