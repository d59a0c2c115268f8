//! Deps command implementation

use anyhow::Result;
use clap::Args;

use super::ProjectArgs;
use eo_build::deps;

/// Arguments for the deps command
#[derive(Args, Debug)]
pub struct DepsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also list the dependencies filtered out
    #[arg(long)]
    pub all: bool,
}

/// Execute the deps command
pub fn execute(args: DepsArgs) -> Result<()> {
    let config = args.project.load()?;
    let filters = deps::filters(&config.project);
    let kept = deps::resolve(&config.dependencies, &filters);
    for dependency in &kept {
        println!("{}", dependency);
    }
    if args.all {
        for dependency in config.dependencies.iter().filter(|d| !kept.contains(d)) {
            let rejected_by: Vec<&str> = filters
                .iter()
                .filter(|f| !f.accepts(dependency))
                .map(|f| f.name)
                .collect();
            println!("{} filtered by {}", dependency, rejected_by.join(", "));
        }
    }
    Ok(())
}
