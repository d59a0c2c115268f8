//! Status command implementation

use anyhow::Result;
use clap::Args;

use super::ProjectArgs;
use eo_build::catalog::{Catalog, Catalogs};
use eo_build::output::field;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// List every object with its status
    #[arg(short, long)]
    pub verbose: bool,
}

/// Execute the status command
pub fn execute(args: StatusArgs) -> Result<()> {
    let config = args.project.load()?;
    let catalogs = Catalogs::open(&config.target)?;
    for (label, catalog) in [("foreign", &catalogs.foreign), ("external", &catalogs.external)] {
        summary(label, catalog);
        if args.verbose {
            for tojo in catalog.all() {
                println!(
                    "  {} {}",
                    tojo.id,
                    tojo.status.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

fn summary(label: &str, catalog: &Catalog) {
    println!(
        "{}",
        field(
            label,
            format!("{} object(s), digest {}", catalog.size(), catalog.status_digest())
        )
    );
}
