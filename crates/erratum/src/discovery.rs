//! Discovery of error kinds declared in a package.
//!
//! Discovery imports the root package and every module registered below it,
//! then collects the error kinds each module exports. The first module to
//! export a given name wins; later exports of the same name are dropped.
//! Names are case-folded, so `FooError` and `Fooerror` share one entry and
//! one reference anchor.
//!
//! Traversal order is the root package first, then submodules in
//! registration order.

use std::sync::Arc;

use indexmap::{IndexMap, map::Entry};
use log::{debug, trace};

use erratum_core::{Kind, is_error};

use crate::{
    error::ErratumError,
    registry::{Module, Registry},
};

/// An error kind found during discovery, with the module it was found in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    kind: Kind,
    module: String,
}

impl Discovered {
    /// The discovered kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Dotted name of the module the kind was first found in.
    pub fn module(&self) -> &str {
        &self.module
    }
}

/// Discovered kinds keyed by case-folded name, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredSet {
    entries: IndexMap<String, Discovered>,
}

impl DiscoveredSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `kind` unless a kind with the same name is present.
    ///
    /// Returns whether the kind was inserted.
    pub fn insert(&mut self, kind: Kind, module: &str) -> bool {
        match self.entries.entry(kind.name()) {
            Entry::Occupied(existing) => {
                trace!(
                    name = kind.ident(),
                    module,
                    first = existing.get().kind.ident(),
                    first_module = existing.get().module;
                    "Dropping duplicate error definition"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Discovered {
                    kind,
                    module: module.to_string(),
                });
                true
            }
        }
    }

    /// Looks up a kind by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Discovered> {
        self.entries.get(&name.to_lowercase())
    }

    /// Whether a kind with this name was discovered, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_lowercase())
    }

    /// Number of discovered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identifiers of the kept kinds, in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|found| found.kind.ident())
    }

    /// Discovered kinds in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Discovered> {
        self.entries.values()
    }
}

/// Collects the error kinds exported by `modules`, in order.
///
/// The base kind is skipped unless `include_base` is set.
pub fn collect(modules: &[Arc<Module>], include_base: bool) -> DiscoveredSet {
    let mut errors = DiscoveredSet::new();

    for module in modules {
        for kind in module.items().iter().filter_map(is_error) {
            if kind.is_base() && !include_base {
                continue;
            }
            errors.insert(*kind, module.name());
        }
    }

    errors
}

/// Finds every error kind declared in `package` and all its submodules.
///
/// # Errors
///
/// Returns [`ErratumError::PackageNotFound`] when the root package is not
/// registered, and [`ErratumError::Import`] when any module fails to load.
/// Nothing is collected unless every module imports.
pub fn discover(
    registry: &mut Registry,
    package: &str,
    include_base: bool,
) -> Result<DiscoveredSet, ErratumError> {
    debug!(package; "Importing package");
    let root = registry.import(package)?;

    debug!(package; "Looking for submodules");
    let names = registry.submodules(package);
    for name in &names {
        debug!(module = name.as_str(); "Found submodule");
    }
    debug!(count = names.len(); "Found submodules");

    let mut modules = Vec::with_capacity(names.len() + 1);
    modules.push(root);
    for name in &names {
        modules.push(registry.import(name)?);
        debug!(module = name.as_str(); "Imported module");
    }

    let errors = collect(&modules, include_base);
    debug!(package, count = errors.len(); "Collected error definitions");

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use erratum_core::{Error, ErrorDefinition, Item, define_error};

    use super::*;

    define_error! {
        /// First.
        FirstError;
    }

    define_error! {
        /// Second.
        SecondError;
    }

    mod shadow {
        erratum_core::define_error! {
            /// Same name, different type.
            pub FirstError;
        }
    }

    mod folded {
        erratum_core::define_error! {
            /// Same name once case-folded.
            pub Firsterror;
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.provide(
            Module::new("pkg")
                .with_kind::<Error>()
                .with_item(Item::Value("VERSION")),
        );
        registry.provide(
            Module::new("pkg.one")
                .with_kind::<FirstError>()
                .with_item(Item::Function("helper")),
        );
        registry.provide(
            Module::new("pkg.two")
                .with_kind::<SecondError>()
                .with_kind::<shadow::FirstError>()
                .with_kind::<Error>(),
        );
        registry
    }

    #[test]
    fn test_first_seen_wins() {
        let errors = discover(&mut registry(), "pkg", false).unwrap();

        assert_eq!(errors.names().collect::<Vec<_>>(), ["FirstError", "SecondError"]);
        let first = errors.get("FirstError").unwrap();
        assert_eq!(first.module(), "pkg.one");
        assert!(first.kind().is::<FirstError>());
        assert!(!first.kind().is::<shadow::FirstError>());
    }

    #[test]
    fn test_base_kind_excluded_by_default() {
        let errors = discover(&mut registry(), "pkg", false).unwrap();
        assert!(!errors.contains(Error::IDENT));
        assert!(errors.iter().all(|found| !found.kind().is_base()));
    }

    #[test]
    fn test_base_kind_included_once_on_request() {
        let errors = discover(&mut registry(), "pkg", true).unwrap();

        assert_eq!(
            errors.names().collect::<Vec<_>>(),
            ["Error", "FirstError", "SecondError"]
        );
        assert_eq!(errors.get("Error").unwrap().module(), "pkg");
    }

    #[test]
    fn test_missing_package_is_fatal() {
        let err = discover(&mut registry(), "nope", false).unwrap_err();
        assert!(matches!(err, ErratumError::PackageNotFound(_)));
    }

    #[test]
    fn test_failing_submodule_is_fatal() {
        let mut registry = registry();
        registry.register("pkg.three", || Err("cannot load".into()));

        let err = discover(&mut registry, "pkg", false).unwrap_err();
        assert!(matches!(err, ErratumError::Import { module, .. } if module == "pkg.three"));
    }

    #[test]
    fn test_discovery_lists_transitive_submodules() {
        let mut registry = registry();
        registry.register("pkg.one.deep", || {
            Ok(Module::new("pkg.one.deep").with_item(Item::kind::<shadow::FirstError>()))
        });

        let errors = discover(&mut registry, "pkg.one", false).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("FirstError").unwrap().module(), "pkg.one");
        assert!(registry.is_loaded("pkg.one.deep"));
    }

    #[test]
    fn test_names_differing_in_case_share_an_entry() {
        let mut registry = registry();
        registry.provide(Module::new("pkg.three").with_kind::<folded::Firsterror>());

        let errors = discover(&mut registry, "pkg", false).unwrap();
        assert_eq!(errors.names().collect::<Vec<_>>(), ["FirstError", "SecondError"]);
        assert!(errors.get("firsterror").unwrap().kind().is::<FirstError>());
    }

    #[test]
    fn test_collect_skips_non_kinds() {
        let module = Arc::new(
            Module::new("solo")
                .with_item(Item::Function("FirstError"))
                .with_item(Item::Value("SecondError")),
        );
        assert!(collect(&[module], true).is_empty());
    }
}
