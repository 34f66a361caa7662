//! Command-line argument definitions for the Erratum CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the package to document, the output
//! path, configuration file selection, and logging verbosity.

use clap::Parser;

/// Document the error kinds defined in a package
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Dotted name of the package to document
    #[arg(help = "The name of the package to document")]
    pub package: String,

    /// Enable verbose output (for debugging purposes)
    #[arg(short, long)]
    pub verbose: bool,

    /// Include the base Error kind in the output
    #[arg(short = 'i', long = "include-error")]
    pub include_error: bool,

    /// The file to write the documentation to [default: troubleshooting.rst]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["erratum", "demo", "-v", "-i", "-o", "errors.rst"]);

        assert_eq!(args.package, "demo");
        assert!(args.verbose);
        assert!(args.include_error);
        assert_eq!(args.output.as_deref(), Some("errors.rst"));
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["erratum", "demo"]);

        assert!(!args.verbose);
        assert!(!args.include_error);
        assert!(args.output.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn test_package_is_required() {
        assert!(Args::try_parse_from(["erratum"]).is_err());
    }
}
