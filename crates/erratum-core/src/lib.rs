//! Erratum Core Types and Definitions
//!
//! This crate provides the runtime half of Erratum. It includes:
//!
//! - **Definitions**: error kinds declared with [`define_error!`] ([`definition`] module)
//! - **Annotation**: guards that add help references to failures ([`annotate`] module)
//! - **Items**: module exports and kind classification ([`item`] module)

pub mod annotate;
pub mod definition;
pub mod item;

pub use annotate::{Annotate, Annotator, Failure, ResultExt};
pub use definition::{Error, ErrorDefinition, Invoke, Kind, Wrapped};
pub use item::{Item, is_error};
