//! Error types for Erratum operations.
//!
//! This module provides the main error type [`ErratumError`]. Every variant
//! is fatal for a documentation run and maps to one of the builtin error
//! kinds, whose reference tells the user where to read more.

use std::io;

use thiserror::Error;

use erratum_core::{ErrorDefinition, Kind};

use crate::builtin::{ConfigInvalid, ImportFailed, PackageNotFound, WriteFailed};

/// The main error type for Erratum operations.
#[derive(Debug, Error)]
pub enum ErratumError {
    #[error("Fatal: module [{0}] not found")]
    PackageNotFound(String),

    #[error("Unable to import [{module}]: {reason}")]
    Import { module: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ErratumError {
    /// The builtin error kind describing this failure.
    pub fn kind(&self) -> Kind {
        match self {
            Self::PackageNotFound(_) => PackageNotFound::kind(),
            Self::Import { .. } => ImportFailed::kind(),
            Self::Config(_) => ConfigInvalid::kind(),
            Self::Io(_) => WriteFailed::kind(),
        }
    }

    /// Help reference for this failure.
    pub fn reference(&self) -> String {
        self.kind().reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ErratumError::PackageNotFound("nope".to_string());
        assert_eq!(err.to_string(), "Fatal: module [nope] not found");

        let err = ErratumError::Import {
            module: "demo.a".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Unable to import [demo.a]: boom");
    }

    #[test]
    fn test_reference_points_at_builtin_kind() {
        let err = ErratumError::PackageNotFound("nope".to_string());
        assert!(err.kind().is::<PackageNotFound>());
        assert_eq!(err.reference(), PackageNotFound::reference());

        let err = ErratumError::from(io::Error::other("disk full"));
        assert!(err.kind().is::<WriteFailed>());
    }
}
