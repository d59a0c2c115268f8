//! Parse: turn EO sources into XMIR documents.
//!
//! The parser itself is an external tool behind the [`Parser`] trait. The
//! default [`CommandParser`] runs the configured command line, feeds it the
//! source on stdin and reads the XMIR document from stdout.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use log::{debug, info};

use super::{status, PARSE_DIR};
use crate::catalog::Catalog;
use crate::config::BuildConfig;
use crate::document::Xmir;
use crate::error::{Error, Result};
use crate::path::place;

/// Turns the source of one object into XMIR text.
pub trait Parser {
    fn parse(&self, id: &str, source: &str) -> Result<String>;
}

/// Runs an external parser.
///
/// The id of the object is passed in the `EO_OBJECT` environment variable.
#[derive(Debug, Clone)]
pub struct CommandParser {
    command: Vec<String>,
}

impl CommandParser {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl Parser for CommandParser {
    fn parse(&self, id: &str, source: &str) -> Result<String> {
        let (program, args) = self.command.split_first().ok_or_else(|| Error::Configuration {
            message: "The parser command line is empty".to_string(),
            hint: None,
        })?;
        let mut child = Command::new(program)
            .args(args)
            .env("EO_OBJECT", id)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Configuration {
                message: format!("Can't start parser '{}': {}", program, e),
                hint: Some("Set 'parser:' in eo.yaml".to_string()),
            })?;
        let writer = child.stdin.take().map(|mut stdin| {
            let text = source.to_string();
            thread::spawn(move || stdin.write_all(text.as_bytes()))
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            // a parser may exit without reading everything; its status decides
            let _ = writer.join();
        }
        if !output.status.success() {
            return Err(Error::Document {
                path: id.to_string(),
                message: format!(
                    "Parser '{}' failed: {}",
                    program,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        String::from_utf8(output.stdout).map_err(|e| Error::Document {
            path: id.to_string(),
            message: format!("Parser output is not UTF-8: {}", e),
        })
    }
}

/// Execute Parse over every tojo with a source and no parsed document,
/// returning the number of documents produced.
pub fn execute(config: &BuildConfig, catalog: &mut Catalog, parser: &dyn Parser) -> Result<usize> {
    let pending: Vec<String> = catalog
        .all()
        .filter(|t| t.source.is_some() && t.xmir.is_none())
        .map(|t| t.id.clone())
        .collect();
    for id in &pending {
        parse_one(config, catalog, parser, id)?;
    }
    if !pending.is_empty() {
        info!("Parsed {} EO source(s)", pending.len());
    }
    Ok(pending.len())
}

/// Parse the source of one tojo and record the document.
pub fn parse_one(
    config: &BuildConfig,
    catalog: &mut Catalog,
    parser: &dyn Parser,
    id: &str,
) -> Result<PathBuf> {
    let source = catalog.get(id)?.source()?.to_path_buf();
    let text = std::fs::read_to_string(&source).map_err(|e| Error::Filesystem {
        message: format!("Can't read '{}': {}", source.display(), e),
    })?;
    let xmir = parser.parse(id, &text)?;
    let target = place(id, &config.target.join(PARSE_DIR), "xmir");
    Xmir::parse(&xmir, target.display().to_string())?.save(&target)?;
    catalog.update(id, |tojo| {
        tojo.xmir = Some(target.clone());
        tojo.status = Some(status::PARSED.to_string());
    })?;
    debug!("Parsed '{}' into {}", id, target.display());
    Ok(target)
}
