//! Loading and validation of IP catalogs and bus project descriptions.
//!
//! The catalog (a JSON library of reusable slave blocks) is read into a
//! validated [`Catalog`], either from a local file or over HTTP. The project
//! description (which slaves are attached and how) is read into a
//! [`ProjectConfig`] from YAML, TOML, or JSON.

#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod loader;
pub mod project;

pub use catalog::{Catalog, CatalogEntry, CostValue, Direction, InterfaceSpec, ResourceCost};
pub use error::ConfigError;
pub use loader::{
    load_catalog, load_catalog_from_str, load_project, load_project_from_str, CatalogSource,
    ProjectFormat, DEFAULT_IP_LIBRARY_URL,
};
pub use project::{PinValue, ProjectConfig, SlaveConfig};
