//! Assemble command implementation
//!
//! Runs the whole pipeline: Register once, then Parse, Optimize, Discover and
//! Pull until the catalog settles.

use std::time::Instant;

use anyhow::Result;
use clap::Args;

use super::{table_source, ProjectArgs};
use eo_build::cache::TableCache;
use eo_build::objectionary::GitObjectionary;
use eo_build::output::done;
use eo_build::phases::orchestrator;
use eo_build::phases::parse::CommandParser;
use eo_build::phases::pull::Remote;

/// Arguments for the assemble command
#[derive(Args, Debug)]
pub struct AssembleArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Pull objects again even if their sources exist
    #[arg(long)]
    pub overwrite: bool,

    /// Objectionary ref for unversioned objects
    #[arg(long = "ref", value_name = "REF")]
    pub objectionary_ref: Option<String>,
}

/// Execute the assemble command
pub fn execute(args: AssembleArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut config = args.project.load()?;
    if args.overwrite {
        config.overwrite = true;
    }
    if let Some(objectionary_ref) = args.objectionary_ref {
        config.objectionary.r#ref = objectionary_ref;
    }

    let objectionary = GitObjectionary::new(
        &config.objectionary.url,
        &config.objectionary.r#ref,
        args.project.cache_root(),
    );
    let parser = CommandParser::new(config.parser.clone());
    let cache = TableCache::new();
    let table = table_source(&config);
    let remote = Remote {
        objectionary: &objectionary,
        parser: &parser,
        cache: &cache,
        table: table.as_ref(),
    };

    let assembly = orchestrator::assemble(&config, &remote)?;
    println!(
        "{}",
        done(&format!(
            "Assembled {} object(s) in {:.2}s ({} registered, {} pulled, {} cycle(s))",
            assembly.objects,
            start_time.elapsed().as_secs_f64(),
            assembly.registered,
            assembly.pulled,
            assembly.cycles
        ))
    );
    Ok(())
}
