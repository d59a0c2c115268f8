//! Orchestrator for the complete assembly
//!
//! This module coordinates the stages into one call: Register once, then
//! Parse, Optimize, Discover and Pull in cycles until the Foreign catalog
//! stops changing.

use log::{debug, info};

use super::pull::Remote;
use super::{discover, optimize, parse, pull, register};
use crate::catalog::Catalogs;
use crate::config::BuildConfig;
use crate::error::{Error, Result};

/// Outcome of an assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub registered: usize,
    /// Cycles run, including the last one that changed nothing.
    pub cycles: usize,
    pub pulled: usize,
    /// Objects in the Foreign catalog at the end.
    pub objects: usize,
}

/// Execute the complete assembly.
///
/// Each cycle runs Parse, Optimize, Discover and Pull. A cycle that leaves
/// the status digest of the Foreign catalog unchanged ends the assembly;
/// running more than `max-cycles` cycles is a configuration error.
pub fn assemble(config: &BuildConfig, remote: &Remote<'_>) -> Result<Assembly> {
    let mut catalogs = Catalogs::open(&config.target)?;
    let registered = register::execute(config, &mut catalogs)?;
    let catalog = &mut catalogs.foreign;

    let mut pulled = 0;
    let mut cycles = 0;
    loop {
        if cycles == config.max_cycles {
            return Err(Error::Configuration {
                message: format!(
                    "The build didn't settle after {} cycles",
                    config.max_cycles
                ),
                hint: Some("Raise 'max-cycles' in eo.yaml".to_string()),
            });
        }
        cycles += 1;
        let before = catalog.status_digest();
        parse::execute(config, catalog, remote.parser)?;
        optimize::execute(&config.target, catalog)?;
        discover::execute(catalog)?;
        pulled += pull::execute(config, catalog, remote)?;
        let after = catalog.status_digest();
        debug!("Cycle {}: {} -> {}", cycles, before, after);
        if before == after {
            break;
        }
    }
    let assembly = Assembly {
        registered,
        cycles,
        pulled,
        objects: catalog.size(),
    };
    info!(
        "Assembled {} object(s) in {} cycle(s), {} pulled",
        assembly.objects, assembly.cycles, assembly.pulled
    );
    Ok(assembly)
}
