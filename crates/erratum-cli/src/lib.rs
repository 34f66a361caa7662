//! CLI logic for the Erratum documentation tool.
//!
//! This module contains the core CLI logic: load configuration, discover
//! the error kinds of a package, and write the troubleshooting page.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::path::PathBuf;

use log::info;

use erratum::{
    ErratumError, PageBuilder,
    registry::{self, Registry},
};

/// Run the Erratum CLI application against the process-wide registry
///
/// # Errors
///
/// See [`run_with`].
pub fn run(args: &Args) -> Result<(), ErratumError> {
    run_with(args, &mut registry::global())
}

/// Run the Erratum CLI application against `registry`
///
/// Discovery runs to completion before anything is written, so a failure
/// leaves the output file untouched.
///
/// # Arguments
///
/// * `args` - Command-line arguments
/// * `registry` - Registry holding the package to document
///
/// # Errors
///
/// Returns `ErratumError` for:
/// - Configuration loading errors
/// - Unknown packages
/// - Modules that fail to load
/// - File I/O errors
pub fn run_with(args: &Args, registry: &mut Registry) -> Result<(), ErratumError> {
    info!(
        package = args.package,
        output_path:? = args.output;
        "Documenting errors declared in package and all submodules"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| app_config.output().path());

    // Discover, then write
    let builder = PageBuilder::new(app_config).with_include_base(args.include_error);
    let errors = builder.discover(registry, &args.package)?;
    builder.write(&errors, &output)?;

    info!(
        output_file = output.display().to_string(),
        entries = errors.len();
        "Troubleshooting page written"
    );

    Ok(())
}
