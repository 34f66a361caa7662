//! Process-wide module registry.
//!
//! Rust has no runtime import machinery, so packages are made visible to
//! discovery explicitly. A module is registered under its dotted name either
//! as a ready [`Module`] or as a loader that builds one on first import.
//! Successful imports are cached for the lifetime of the registry; failed
//! imports are not, so a later import runs the loader again.
//!
//! # Example
//!
//! ```
//! use erratum::registry::{Module, Registry};
//! use erratum_core::{Item, define_error};
//!
//! define_error! {
//!     /// The widget jammed.
//!     pub JamError => "https://example.com/widgets.html";
//! }
//!
//! let mut registry = Registry::new();
//! registry.provide(Module::new("widgets"));
//! registry.register("widgets.gears", || {
//!     Ok(Module::new("widgets.gears").with_item(Item::kind::<JamError>()))
//! });
//!
//! assert_eq!(registry.submodules("widgets"), ["widgets.gears"]);
//! assert!(!registry.is_loaded("widgets.gears"));
//!
//! let gears = registry.import("widgets.gears").unwrap();
//! assert_eq!(gears.items().len(), 1);
//! assert!(registry.is_loaded("widgets.gears"));
//! ```

use std::{
    error::Error as StdError,
    fmt,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use erratum_core::{ErrorDefinition, Item};

use crate::{builtin, error::ErratumError};

/// Error returned by a module loader.
pub type LoadError = Box<dyn StdError + Send + Sync>;

type Loader = Box<dyn Fn() -> Result<Module, LoadError> + Send>;

/// Global registry, created with the builtin package on first use.
///
/// # Thread Safety
///
/// This uses `Mutex` so the registry can live in a `static`.
static GLOBAL: OnceLock<Mutex<Registry>> = OnceLock::new();

/// Locks and returns the process-wide registry.
pub fn global() -> MutexGuard<'static, Registry> {
    GLOBAL
        .get_or_init(|| Mutex::new(Registry::with_builtins()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// A named module and its top-level exports, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    items: Vec<Item>,
}

impl Module {
    /// Creates an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Adds an export.
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    /// Exports error kind `D`.
    pub fn with_kind<D: ErrorDefinition>(self) -> Self {
        self.with_item(Item::kind::<D>())
    }

    /// The dotted module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The exported items.
    pub fn items(&self) -> &[Item] {
        &self.items
    }
}

enum Entry {
    Pending(Loader),
    Loaded(Arc<Module>),
}

/// Append-only map from dotted module names to modules.
///
/// Registration order is the enumeration order reported by
/// [`Registry::submodules`].
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<String, Entry>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the builtin `erratum` package.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Registers a loader for `name`.
    ///
    /// Returns `false`, leaving the first registration in place, when the
    /// name is already registered.
    pub fn register<F>(&mut self, name: impl Into<String>, loader: F) -> bool
    where
        F: Fn() -> Result<Module, LoadError> + Send + 'static,
    {
        self.insert(name.into(), Entry::Pending(Box::new(loader)))
    }

    /// Registers an already built module under its own name.
    pub fn provide(&mut self, module: Module) -> bool {
        let name = module.name.clone();
        self.insert(name, Entry::Loaded(Arc::new(module)))
    }

    fn insert(&mut self, name: String, entry: Entry) -> bool {
        if self.entries.contains_key(&name) {
            warn!(module = name; "Module already registered, keeping the first registration");
            return false;
        }

        trace!(module = name; "Registering module");
        self.entries.insert(name, entry);
        true
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `name` has been imported successfully.
    pub fn is_loaded(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(Entry::Loaded(_)))
    }

    /// Imports `name`, consulting the cache before running its loader.
    ///
    /// # Errors
    ///
    /// Returns [`ErratumError::PackageNotFound`] when nothing is registered
    /// under `name`, and [`ErratumError::Import`] when the loader fails.
    pub fn import(&mut self, name: &str) -> Result<Arc<Module>, ErratumError> {
        let entry = self
            .entries
            .get_mut(name)
            .ok_or_else(|| ErratumError::PackageNotFound(name.to_string()))?;

        let module = match entry {
            Entry::Loaded(module) => return Ok(Arc::clone(module)),
            Entry::Pending(loader) => loader().map_err(|err| ErratumError::Import {
                module: name.to_string(),
                reason: err.to_string(),
            })?,
        };

        if module.name != name {
            debug!(registered = name, declared = module.name; "Loader returned a module with a different name");
        }

        let module = Arc::new(module);
        *entry = Entry::Loaded(Arc::clone(&module));
        Ok(module)
    }

    /// Names of every module below `root`, direct or transitive, in
    /// registration order.
    pub fn submodules(&self, root: &str) -> Vec<String> {
        let prefix = format!("{root}.");
        self.entries
            .keys()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in &self.entries {
            let state = match entry {
                Entry::Pending(_) => "pending",
                Entry::Loaded(_) => "loaded",
            };
            map.entry(name, &state);
        }
        map.finish()
    }
}
