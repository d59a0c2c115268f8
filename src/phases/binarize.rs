//! Binarize: collect native inserts into a Cargo library and build it.
//!
//! Every `org.eolang.rust` insert of every optimized document gets a
//! function name made of the target directory (see [`native_prefix`]) and a
//! running index. The stage writes:
//!
//! - `binarize/codes/<name>.rs`: the code of each insert as found;
//! - `Lib/src/<name>.rs` and `Lib/src/lib.rs`: the library sources;
//! - `Lib/Cargo.toml`: the manifest, with the dependencies of all inserts;
//! - `names.json`: insert locator to function name.
//!
//! Files are only rewritten when their content changes. The library is then
//! built with the configured cargo, unless there's nothing to build.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::catalog::Catalog;
use crate::config::BuildConfig;
use crate::document::Xmir;
use crate::error::Result;
use crate::native::build::{CancelToken, CargoBuild};
use crate::native::cargo::CargoProject;
use crate::native::write_if_changed;
use crate::path::native_prefix;

pub const BINARIZE_DIR: &str = "binarize";
pub const CODES_DIR: &str = "codes";
pub const LIB_DIR: &str = "Lib";
pub const NAMES_FILE: &str = "names.json";

/// Name of the generated library crate.
pub const LIB_NAME: &str = "common";

/// What one Binarize run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Function name of every insert, in order.
    pub functions: Vec<String>,
    /// Files written because their content changed.
    pub written: usize,
    /// Whether the native build ran.
    pub built: bool,
}

/// Execute Binarize. The build itself only runs when `build` is set.
pub fn execute(
    config: &BuildConfig,
    catalog: &Catalog,
    build: bool,
    token: &CancelToken,
) -> Result<Report> {
    let target = &config.target;
    let prefix = native_prefix(target);
    let codes = target.join(BINARIZE_DIR).join(CODES_DIR);
    let lib = lib_dir(target);

    let mut report = Report::default();
    let mut cargo = CargoProject::new(LIB_NAME);
    let mut names = BTreeMap::new();
    for tojo in catalog.all() {
        let Some(optimized) = tojo.optimized.as_deref() else {
            continue;
        };
        for insert in Xmir::load(optimized)?.inserts()? {
            let name = format!("{}{}", prefix, report.functions.len());
            let file = format!("{}.rs", name);
            report.written += usize::from(write_if_changed(&codes.join(&file), &insert.code)?);
            report.written +=
                usize::from(write_if_changed(&lib.join("src").join(&file), &insert.code)?);
            for (krate, version) in &insert.dependencies {
                cargo.add(krate, version);
            }
            debug!("Insert {} of '{}' is {}", insert.locator, tojo.id, name);
            names.insert(insert.locator, name.clone());
            report.functions.push(name);
        }
    }
    if report.functions.is_empty() {
        info!("No native inserts found, nothing to binarize");
        return Ok(report);
    }

    let modules: String = report
        .functions
        .iter()
        .map(|name| format!("pub mod {};\n", name))
        .collect();
    report.written += usize::from(write_if_changed(&lib.join("src/lib.rs"), &modules)?);
    report.written += usize::from(cargo.save(&lib.join("Cargo.toml"))?);
    report.written += usize::from(write_if_changed(
        &target.join(NAMES_FILE),
        &serde_json::to_string_pretty(&names)?,
    )?);
    info!(
        "Binarized {} native insert(s), {} file(s) changed",
        report.functions.len(),
        report.written
    );

    if build {
        CargoBuild::new(&config.cargo, &lib).run(token)?;
        report.built = true;
    }
    Ok(report)
}

/// Directory of the generated Cargo library.
pub fn lib_dir(target: &Path) -> PathBuf {
    target.join(LIB_DIR)
}
