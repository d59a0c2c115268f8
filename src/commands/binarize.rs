//! Binarize command implementation

use anyhow::Result;
use clap::Args;

use super::ProjectArgs;
use eo_build::catalog::Catalogs;
use eo_build::native::build::CancelToken;
use eo_build::output::done;
use eo_build::phases::binarize;

/// Arguments for the binarize command
#[derive(Args, Debug)]
pub struct BinarizeArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Generate the native project without building it
    #[arg(long)]
    pub no_build: bool,

    /// Program used to build the native project
    #[arg(long, value_name = "PROGRAM")]
    pub cargo: Option<String>,
}

/// Execute the binarize command
///
/// Ctrl-C (or SIGTERM) stops a running build and kills what it spawned.
pub fn execute(args: BinarizeArgs) -> Result<()> {
    let mut config = args.project.load()?;
    if let Some(cargo) = args.cargo {
        config.cargo = cargo;
    }
    let catalogs = Catalogs::open(&config.target)?;
    let token = CancelToken::new();
    token.cancel_on_interrupt();
    let report = binarize::execute(&config, &catalogs.foreign, !args.no_build, &token)?;
    let state = if report.built { "built" } else { "generated" };
    println!(
        "{}",
        done(&format!(
            "{} native insert(s) {}, {} file(s) changed",
            report.functions.len(),
            state,
            report.written
        ))
    );
    Ok(())
}
