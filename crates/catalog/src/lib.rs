//! # Catalog Crate
//!
//! The `catalog` crate holds curated population-genetic reference data:
//! species genomes, empirical genetic maps and published demographic models.
//! It resolves a [`Contig`] and a [`Model`] from user choices, turns sample
//! counts into samples, and runs the simulation engine on them. Models can be
//! compared within numerical tolerance to check them against a reference.

pub mod catalog;
pub mod citations;
pub mod config;
pub mod docs;
pub mod errors;
pub mod genetic_maps;
pub mod genome;
pub mod models;
pub mod prelude;
pub mod registry;
pub mod species;

pub use catalog::build_registry;
pub use citations::Citation;
pub use config::CatalogConfig;
pub use errors::{CatalogError, EquivalenceError, InvalidModel, Result, UnequalModels};
pub use genetic_maps::GeneticMap;
pub use genome::{Chromosome, Genome};
pub use models::{Model, ModelBuilder, Population, Tolerance};
pub use registry::Registry;
pub use species::{Contig, Species};

/// Version this crate reports in provenance records.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
