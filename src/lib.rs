//! Popcat: a catalog of population-genetic reference data with a coalescent
//! simulation driver.
//!
//! The workspace is split into two libraries that are re-exported here:
//!
//! - [`engine`]: a structured coalescent simulator producing tree sequences.
//! - [`catalog`]: species genomes, genetic maps and published demographic models
//!   that resolve into engine inputs.
//!
//! The `popcat` command line lives in the `popcat-cli` crate.

pub use popcat_catalog as catalog;
pub use popcat_engine as engine;

pub mod prelude;

pub use popcat_catalog::{
    build_registry, CatalogConfig, CatalogError, Contig, Model, Registry, Species,
};
pub use popcat_engine::{Sample, TreeSequence};
