//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use popcat_catalog::prelude::*;
//!
//! let registry = build_registry(&CatalogConfig::new("/tmp/popcat-cache")).unwrap();
//! let species = registry.get_species("esccol").unwrap();
//! assert_eq!(species.name, "Escherichia coli");
//! ```

pub use crate::catalog::build_registry;
pub use crate::citations::Citation;
pub use crate::config::CatalogConfig;
pub use crate::errors::{CatalogError, EquivalenceError, InvalidModel, UnequalModels};
pub use crate::genetic_maps::GeneticMap;
pub use crate::genome::{Chromosome, Genome};
pub use crate::models::{generic, Model, ModelBuilder, Population, Tolerance};
pub use crate::registry::Registry;
pub use crate::species::{Contig, Species};
