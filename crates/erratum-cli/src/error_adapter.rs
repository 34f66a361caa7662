//! Error adapter for converting ErratumError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Every failure
//! carries the reference of the builtin error kind describing it, shown as
//! the diagnostic's help text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use erratum::ErratumError;

/// Prefix of the help line pointing at the troubleshooting page.
const MORE_INFO: &str = "More info --> ";

/// Adapter rendering an [`ErratumError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a ErratumError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ErratumError::PackageNotFound(_) => "erratum::package_not_found",
            ErratumError::Import { .. } => "erratum::import",
            ErratumError::Config(_) => "erratum::config",
            ErratumError::Io(_) => "erratum::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("{MORE_INFO}{}", self.0.reference())))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// Wrap an [`ErratumError`] for rendering.
pub fn to_reportable(err: &ErratumError) -> ErrorAdapter<'_> {
    ErrorAdapter(err)
}

#[cfg(test)]
mod tests {
    use erratum::{ErrorDefinition, builtin::PackageNotFound};

    use super::*;

    #[test]
    fn test_display_matches_error() {
        let err = ErratumError::PackageNotFound("demo".to_string());
        let reportable = to_reportable(&err);

        assert_eq!(reportable.to_string(), "Fatal: module [demo] not found");
    }

    #[test]
    fn test_code_and_help() {
        let err = ErratumError::PackageNotFound("demo".to_string());
        let reportable = to_reportable(&err);

        assert_eq!(
            reportable.code().unwrap().to_string(),
            "erratum::package_not_found"
        );
        assert_eq!(
            reportable.help().unwrap().to_string(),
            format!("More info --> {}", PackageNotFound::reference())
        );
        assert!(reportable.labels().is_none());
    }

    #[test]
    fn test_io_source_is_exposed() {
        let err = ErratumError::Io(std::io::Error::other("disk full"));
        let reportable = to_reportable(&err);

        assert_eq!(reportable.code().unwrap().to_string(), "erratum::io");
        assert!(std::error::Error::source(&reportable).is_some());
    }
}
