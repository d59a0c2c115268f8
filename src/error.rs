//! # Error Handling
//!
//! This module defines the centralized error type for the `eo-build`
//! pipeline. It uses the `thiserror` library to build a single `Error` enum
//! covering every anticipated failure mode, each with a descriptive message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum representing everything that can go wrong
//!   while registering, parsing, optimizing, discovering, pulling or
//!   binarizing objects.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! The variants fall into a few families:
//!
//! - Configuration errors (invalid object names, missing directories, bad
//!   configuration files). They are fatal and always name the offending input.
//! - Catalog misses. `NotFound` means the object was never registered,
//!   `NotProcessed` means it was registered but the given stage hasn't
//!   touched it yet.
//! - I/O errors (fetching from the objectionary, writing files). They are
//!   fatal for the current object and never leave the catalog half-written,
//!   since catalog writes only happen after the file operation succeeded.
//! - Build failures of the native toolchain, carrying the captured
//!   diagnostic output of the subprocess.

use thiserror::Error;

/// Main error type for eo-build operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing input, e.g. a source file with an incorrect name.
    ///
    /// The message always names the offending input; the hint, when present,
    /// suggests how to fix it.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Configuration {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The object was never registered in the catalog.
    #[error("Object '{id}' is not registered in the catalog")]
    NotFound { id: String },

    /// The object is registered, but the given stage hasn't processed it yet.
    #[error("Object '{id}' is registered but hasn't been processed by '{stage}' yet")]
    NotProcessed { id: String, stage: String },

    /// Fetching an object from the objectionary failed.
    #[error("Can't fetch '{name}': {message}")]
    Fetch { name: String, message: String },

    /// An error occurred while executing a Git command.
    #[error("Git command failed for {url}: {command} - {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// An error occurred while cloning a Git repository.
    #[error("Git clone error for {url}@{r#ref}: {message}")]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
    },

    /// A file-level operation on the host filesystem failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An XMIR document can't be read, parsed or serialized.
    #[error("Broken XMIR document {path}: {message}")]
    Document { path: String, message: String },

    /// The optimized document still has references pointing nowhere.
    #[error("Broken references in {document}: {refs}")]
    BrokenRefs { document: String, refs: String },

    /// A commit hash doesn't have the expected shape.
    #[error("Invalid commit hash '{hash}': {message}")]
    InvalidHash { hash: String, message: String },

    /// The commit hash table has no such tag.
    #[error("Tag '{tag}' is not present in the commit hash table")]
    UnknownTag { tag: String },

    /// The native build failed or was interrupted.
    ///
    /// `output` holds whatever the subprocess printed before it stopped.
    #[error("Build failure: {message}{}", if output.is_empty() { String::new() } else { format!("\n{}", output) })]
    BuildFailure { message: String, output: String },

    /// No native function is registered for the code locator.
    #[error("No native function registered for '{locator}'")]
    NativeNotFound { locator: String },

    /// A native function returned bytes that can't be decoded.
    #[error("Native function for '{locator}' returned an invalid reply: {message}")]
    NativeReply { locator: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A TOML serialization error, wrapped from `toml::ser::Error`.
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A semantic versioning parsing error, wrapped from `semver::Error`.
    #[error("Semver parsing error: {0}")]
    Semver(#[from] semver::Error),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_configuration() {
        let error = Error::Configuration {
            message: "Incorrect name found: '.abc.eo'".to_string(),
            hint: None,
        };
        let display = format!("{}", error);
        assert!(display.contains("Configuration error"));
        assert!(display.contains("'.abc.eo'"));
        assert!(!display.contains("hint:"));
    }

    #[test]
    fn test_error_display_configuration_with_hint() {
        let error = Error::Configuration {
            message: "Sources directory is missing".to_string(),
            hint: Some("Set 'sources:' in eo.yaml".to_string()),
        };
        let display = format!("{}", error);
        assert!(display.contains("hint:"));
        assert!(display.contains("Set 'sources:'"));
    }

    #[test]
    fn test_not_found_and_not_processed_differ() {
        let missing = Error::NotFound {
            id: "org.example.app".to_string(),
        };
        let pending = Error::NotProcessed {
            id: "org.example.app".to_string(),
            stage: "optimize".to_string(),
        };
        assert!(missing.to_string().contains("not registered"));
        assert!(pending.to_string().contains("hasn't been processed by 'optimize'"));
    }

    #[test]
    fn test_build_failure_carries_output() {
        let error = Error::BuildFailure {
            message: "Failed to build cargo project".to_string(),
            output: "error[E0425]: cannot find value".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Build failure"));
        assert!(display.contains("E0425"));
    }

    #[test]
    fn test_build_failure_without_output() {
        let error = Error::BuildFailure {
            message: "Interrupted".to_string(),
            output: String::new(),
        };
        assert_eq!(format!("{}", error), "Build failure: Interrupted");
    }

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: "https://github.com/objectionary/home.git".to_string(),
            stderr: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("ls-remote"));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }

    #[test]
    fn test_error_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: [unclosed").unwrap_err();
        let error: Error = yaml_error.into();
        assert!(format!("{}", error).contains("YAML parsing error"));
    }

    #[test]
    fn test_error_broken_refs() {
        let error = Error::BrokenRefs {
            document: "org/example/app.xmir".to_string(),
            refs: "42".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Broken references"));
        assert!(display.contains("42"));
    }
}
