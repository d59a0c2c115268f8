//! Register command implementation

use anyhow::Result;
use clap::Args;

use super::ProjectArgs;
use eo_build::catalog::Catalogs;
use eo_build::output::done;
use eo_build::phases::register;

/// Arguments for the register command
#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Allow any file name, not only [a-z0-9-]
    #[arg(long)]
    pub lenient_names: bool,

    /// Also register objects in the External catalog
    #[arg(long)]
    pub with_versions: bool,
}

/// Execute the register command
pub fn execute(args: RegisterArgs) -> Result<()> {
    let mut config = args.project.load()?;
    if args.lenient_names {
        config.strict_names = false;
    }
    if args.with_versions {
        config.with_versions = true;
    }
    let mut catalogs = Catalogs::open(&config.target)?;
    let count = register::execute(&config, &mut catalogs)?;
    println!("{}", done(&format!("Registered {} EO source(s)", count)));
    Ok(())
}
