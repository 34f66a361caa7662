//! Erratum - troubleshooting pages from error kind definitions.
//!
//! Discovery and rendering for Erratum. Error kinds declared with
//! [`define_error!`] are exported from modules in a [`Registry`]; discovery
//! walks a package in that registry and the renderer writes one
//! reStructuredText section per kind.

pub mod builtin;
pub mod config;
pub mod discovery;
pub mod registry;
pub mod render;

mod error;

pub use erratum_core::{
    Annotate, Annotator, Error, ErrorDefinition, Failure, Item, Kind, ResultExt, Wrapped,
    annotate, annotated, define_error, definition, is_error, item,
};

pub use error::ErratumError;

use std::path::Path;

use log::{debug, info, trace};

use config::AppConfig;
use discovery::DiscoveredSet;
use registry::Registry;
use render::{Document, title_for};

/// Builder for discovering error kinds and writing troubleshooting pages.
///
/// # Examples
///
/// ```rust,no_run
/// use erratum::{PageBuilder, config::AppConfig, registry};
///
/// let builder = PageBuilder::new(AppConfig::default());
///
/// // Collect the error kinds of a registered package
/// let errors = builder
///     .discover(&mut registry::global(), "erratum")
///     .expect("Failed to discover");
///
/// // Write the page
/// builder
///     .write(&errors, "troubleshooting.rst")
///     .expect("Failed to write");
/// ```
#[derive(Debug, Default)]
pub struct PageBuilder {
    config: AppConfig,
    include_base: bool,
}

impl PageBuilder {
    /// Create a new page builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let include_base = config.discovery().include_base();
        Self {
            config,
            include_base,
        }
    }

    /// Also document the base error kind.
    ///
    /// Setting this to `false` keeps whatever the configuration asked for.
    pub fn with_include_base(mut self, include_base: bool) -> Self {
        self.include_base |= include_base;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Find the error kinds declared in `package` and all its submodules.
    ///
    /// # Errors
    ///
    /// Returns `ErratumError` when the package is not registered or any of
    /// its modules fails to load.
    pub fn discover(
        &self,
        registry: &mut Registry,
        package: &str,
    ) -> Result<DiscoveredSet, ErratumError> {
        info!(package, include_base = self.include_base; "Discovering error definitions");

        let errors = discovery::discover(registry, package, self.include_base)?;

        debug!(count = errors.len(); "Discovery finished");
        trace!(errors:?; "Discovered error definitions");

        Ok(errors)
    }

    /// Render discovered kinds to a page with the given title.
    ///
    /// # Errors
    ///
    /// Returns `ErratumError` when the configured style is invalid.
    pub fn render(&self, errors: &DiscoveredSet, title: &str) -> Result<String, ErratumError> {
        Ok(Document::from_style(self.config.style())?.render(title, errors))
    }

    /// Render discovered kinds and write the page to `path`.
    ///
    /// The page title is derived from the file name.
    ///
    /// # Errors
    ///
    /// Returns `ErratumError` when the configured style is invalid or the
    /// file cannot be written.
    pub fn write(
        &self,
        errors: &DiscoveredSet,
        path: impl AsRef<Path>,
    ) -> Result<(), ErratumError> {
        let path = path.as_ref();
        let document = Document::from_style(self.config.style())?;

        info!(
            path = path.display().to_string(),
            title = title_for(path);
            "Writing troubleshooting page"
        );
        document.write(errors, path)
    }
}
