//! Mock definitions, the registry that stores them, and the bundles that
//! seed it.
//!
//! Defines the [`Mocker`] trait for reusable mock bundles. Submodules
//! provide the data model, the synchronized registry, static validation,
//! and the file-backed bundle.

pub mod bundle;
pub mod model;
pub mod registry;
pub mod validation;

pub use model::{Mock, Properties, PropertyValue, RequestExpectation, ResponseDefinition};
pub use registry::MockRegistry;

/// A named set of mocks loaded into the registry at startup.
pub trait Mocker: Send + Sync {
    fn name(&self) -> &str;
    fn mocks(&self) -> Vec<Mock>;
}
