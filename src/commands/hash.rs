//! Hash command implementation

use anyhow::Result;
use clap::Args;

use super::{table_source, ProjectArgs};
use eo_build::cache::TableCache;
use eo_build::hash::CommitHashes;

/// Arguments for the hash command
#[derive(Args, Debug)]
pub struct HashArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Release tag, e.g. 0.28.10
    pub tag: String,
}

/// Execute the hash command
pub fn execute(args: HashArgs) -> Result<()> {
    let config = args.project.load()?;
    let hashes = CommitHashes::load(&TableCache::new(), table_source(&config).as_ref())?;
    println!("{}", hashes.get(&args.tag)?);
    Ok(())
}
