//! In-memory registry of species.
//!
//! The registry is filled once by [`crate::catalog::build_registry`] and read
//! afterwards. Iteration follows registration order; re-registering a species
//! replaces it in place.

use crate::errors::{CatalogError, Result};
use crate::genetic_maps::GeneticMap;
use crate::models::Model;
use crate::species::Species;
use log::debug;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    species: Vec<Species>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `species`, replacing any species with the same id.
    pub fn register_species(&mut self, species: Species) {
        match self.index.get(&species.id) {
            Some(&position) => {
                debug!("Replacing species '{}'", species.id);
                self.species[position] = species;
            }
            None => {
                debug!("Registering species '{}'", species.id);
                self.index.insert(species.id.clone(), self.species.len());
                self.species.push(species);
            }
        }
    }

    /// Look up a species by id.
    pub fn get_species(&self, id: &str) -> Result<&Species> {
        self.index
            .get(id)
            .map(|&position| &self.species[position])
            .ok_or_else(|| CatalogError::not_found("Species", id))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Every species, in registration order.
    pub fn all_species(&self) -> impl Iterator<Item = &Species> + Clone + '_ {
        self.species.iter()
    }

    /// Every genetic map of every species.
    pub fn all_genetic_maps(&self) -> impl Iterator<Item = &GeneticMap> + Clone + '_ {
        self.species.iter().flat_map(|s| s.genetic_maps().iter())
    }

    /// Every model of every species.
    pub fn all_models(&self) -> impl Iterator<Item = &Model> + Clone + '_ {
        self.species.iter().flat_map(|s| s.models().iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::{Chromosome, Genome};
    use crate::models::generic;

    fn species(id: &str, population_size: f64) -> Species {
        let genome = Genome::new(vec![Chromosome::new("chr1", 100, 0.0, 0.0).unwrap()]).unwrap();
        let mut species = Species::new(id, id, genome, 1.0, population_size);
        species.add_model(generic::constant_size(population_size).unwrap());
        species
    }

    #[test]
    fn test_get_species() {
        let mut registry = Registry::new();
        registry.register_species(species("a", 10.0));
        assert_eq!(registry.get_species("a").unwrap().population_size, 10.0);
        assert!(matches!(
            registry.get_species("unknown"),
            Err(CatalogError::NotFound { kind: "Species", .. })
        ));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut registry = Registry::new();
        registry.register_species(species("a", 10.0));
        registry.register_species(species("b", 20.0));
        registry.register_species(species("a", 30.0));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_species("a").unwrap().population_size, 30.0);
        let ids: Vec<&str> = registry.all_species().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_iterators_are_restartable() {
        let mut registry = Registry::new();
        registry.register_species(species("a", 10.0));
        registry.register_species(species("b", 20.0));
        let models = registry.all_models();
        assert_eq!(models.clone().count(), 2);
        assert_eq!(models.count(), 2);
        assert_eq!(registry.all_genetic_maps().count(), 0);
    }
}
