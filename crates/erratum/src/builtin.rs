//! Error kinds of Erratum itself.
//!
//! The tool documents its own failures: registering the builtin package
//! makes `erratum erratum` produce the tool's troubleshooting page.

use erratum_core::{Error, Item, define_error};

use crate::registry::{Module, Registry};

/// Name of the builtin package.
pub const PACKAGE: &str = "erratum";

define_error! {
    /// Failures reported by the erratum command itself.
    pub ToolError => "troubleshooting.html";
}

define_error! {
    /// The package given on the command line is not registered.
    ///
    /// Packages become visible to erratum once their modules are added to
    /// the registry, either by the program embedding erratum or through
    /// `Registry::register`. Check the spelling of the dotted name.
    pub PackageNotFound: ToolError;
}

define_error! {
    /// A submodule of the package failed to load.
    ///
    /// Discovery stops at the first module that cannot be loaded and no
    /// output is written. The message names the module and the reason its
    /// loader gave.
    pub ImportFailed: ToolError;
}

define_error! {
    /// The configuration file could not be used.
    ///
    /// Either the file given with `--config` does not exist, it is not valid
    /// TOML, or a heading character is not ASCII punctuation.
    pub ConfigInvalid: ToolError;
}

define_error! {
    /// The troubleshooting page could not be written.
    ///
    /// The page is written to a temporary file next to the destination and
    /// moved into place, so the destination directory must exist and be
    /// writable.
    pub WriteFailed: ToolError;
}

/// Adds the builtin package and its submodules to `registry`.
pub fn register(registry: &mut Registry) {
    registry.provide(Module::new(PACKAGE).with_item(Item::kind::<Error>()));
    registry.provide(
        Module::new(format!("{PACKAGE}.failures"))
            .with_item(Item::kind::<ToolError>())
            .with_item(Item::kind::<PackageNotFound>())
            .with_item(Item::kind::<ImportFailed>())
            .with_item(Item::kind::<ConfigInvalid>())
            .with_item(Item::kind::<WriteFailed>()),
    );
}
