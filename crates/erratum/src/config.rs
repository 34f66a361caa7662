//! Configuration types for Erratum page generation.
//!
//! This module provides configuration structures that control where the
//! troubleshooting page is written, what discovery collects, and how
//! headings are drawn. All types implement [`serde::Deserialize`] for
//! loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`OutputConfig`] - Destination of the generated page.
//! - [`DiscoveryConfig`] - Whether the base error kind is documented.
//! - [`StyleConfig`] - Heading underline characters.
//!
//! # Example
//!
//! ```
//! # use erratum::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.output().path().to_str(), Some("troubleshooting.rst"));
//! assert_eq!(config.style().title_char(), Ok('='));
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::render::DEFAULT_OUTPUT;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,

    /// Discovery configuration section.
    #[serde(default)]
    discovery: DiscoveryConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(output: OutputConfig, discovery: DiscoveryConfig, style: StyleConfig) -> Self {
        Self {
            output,
            discovery,
            style,
        }
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the discovery configuration.
    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Destination of the generated page.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputConfig {
    /// Output path; [`DEFAULT_OUTPUT`] when unset.
    #[serde(default)]
    path: Option<PathBuf>,
}

impl OutputConfig {
    /// Creates an output section writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Returns the configured output path.
    pub fn path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }
}

/// Discovery settings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Document the base error kind alongside the discovered ones.
    #[serde(default)]
    include_base: bool,
}

impl DiscoveryConfig {
    /// Creates a discovery section.
    pub fn new(include_base: bool) -> Self {
        Self { include_base }
    }

    /// Returns whether the base kind is included.
    pub fn include_base(&self) -> bool {
        self.include_base
    }
}

/// Heading underline characters.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    /// Underline of the page title; `=` when unset.
    #[serde(default)]
    title_char: Option<char>,

    /// Underline of each entry heading; `-` when unset.
    #[serde(default)]
    entry_char: Option<char>,
}

impl StyleConfig {
    /// Creates a style section with explicit characters.
    pub fn new(title_char: char, entry_char: char) -> Self {
        Self {
            title_char: Some(title_char),
            entry_char: Some(entry_char),
        }
    }

    /// Returns the title underline character.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured character is not ASCII punctuation.
    pub fn title_char(&self) -> Result<char, String> {
        validate_heading_char("title_char", self.title_char.unwrap_or('='))
    }

    /// Returns the entry underline character.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured character is not ASCII punctuation.
    pub fn entry_char(&self) -> Result<char, String> {
        validate_heading_char("entry_char", self.entry_char.unwrap_or('-'))
    }
}

fn validate_heading_char(field: &str, c: char) -> Result<char, String> {
    if c.is_ascii_punctuation() {
        Ok(c)
    } else {
        Err(format!(
            "Invalid {field} in config: {c:?} is not an ASCII punctuation character"
        ))
    }
}
