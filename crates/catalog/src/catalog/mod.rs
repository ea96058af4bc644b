//! Built-in species definitions.
//!
//! Each submodule describes one species: its genome, genetic maps and
//! demographic models. [`build_registry`] assembles them into a [`Registry`]
//! once at startup.

pub mod arabidopsis_thaliana;
pub mod drosophila_melanogaster;
pub mod e_coli;

use crate::config::CatalogConfig;
use crate::errors::Result;
use crate::registry::Registry;
use log::debug;

/// Build the registry holding every built-in species.
pub fn build_registry(config: &CatalogConfig) -> Result<Registry> {
    let mut registry = Registry::new();
    registry.register_species(e_coli::species()?);
    registry.register_species(drosophila_melanogaster::species(config)?);
    registry.register_species(arabidopsis_thaliana::species(config)?);
    debug!(
        "Catalog holds {} species, {} models, {} genetic maps",
        registry.len(),
        registry.all_models().count(),
        registry.all_genetic_maps().count()
    );
    Ok(registry)
}
