//! Module items and kind classification.
//!
//! A module exports a list of [`Item`]s. Only [`Item::Kind`] denotes an
//! error definition; callables (wrapped or not) and plain values never do.

use crate::definition::{ErrorDefinition, Kind};

/// One top-level export of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// An error kind.
    Kind(Kind),

    /// A callable, including callables wrapped by an error kind.
    Function(&'static str),

    /// Any other exported value.
    Value(&'static str),
}

impl Item {
    /// The item for kind `D`.
    pub fn kind<D: ErrorDefinition>() -> Self {
        Self::Kind(Kind::of::<D>())
    }

    /// The exported name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kind(kind) => kind.ident(),
            Self::Function(name) | Self::Value(name) => name,
        }
    }
}

/// Returns the kind an item denotes, if it denotes one.
///
/// Accepts the base kind and all its descendants.
pub fn is_error(item: &Item) -> Option<&Kind> {
    match item {
        Item::Kind(kind) => Some(kind),
        Item::Function(_) | Item::Value(_) => None,
    }
}
