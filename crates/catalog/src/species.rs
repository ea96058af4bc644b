//! Species and the contigs resolved from them.

use crate::citations::Citation;
use crate::errors::{CatalogError, Result};
use crate::genetic_maps::GeneticMap;
use crate::genome::Genome;
use crate::models::Model;
use log::debug;
use popcat_engine::RecombinationMap;
use std::fmt;

/// A region ready to be simulated.
#[derive(Debug, Clone, PartialEq)]
pub struct Contig {
    pub recombination_map: RecombinationMap,
    pub mutation_rate: f64,
    /// Id of the genetic map the recombination map was read from
    pub genetic_map: Option<String>,
}

impl fmt::Display for Contig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contig(length={:.2E}, recombination_rate={:.2E}, mutation_rate={:.2E}",
            self.recombination_map.sequence_length(),
            self.recombination_map.mean_recombination_rate(),
            self.mutation_rate
        )?;
        if let Some(map) = &self.genetic_map {
            write!(f, ", genetic_map={map}")?;
        }
        write!(f, ")")
    }
}

/// A species with its genome, genetic maps and demographic models.
#[derive(Debug, Clone)]
pub struct Species {
    /// Short identifier, e.g. `dromel`
    pub id: String,
    /// Scientific name
    pub name: String,
    pub genome: Genome,
    /// Years per generation
    pub generation_time: f64,
    /// Default effective population size
    pub population_size: f64,
    pub population_size_citations: Vec<Citation>,
    models: Vec<Model>,
    genetic_maps: Vec<GeneticMap>,
}

impl Species {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genome: Genome,
        generation_time: f64,
        population_size: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            genome,
            generation_time,
            population_size,
            population_size_citations: Vec::new(),
            models: Vec::new(),
            genetic_maps: Vec::new(),
        }
    }

    /// Record where the default population size comes from.
    pub fn with_population_size_citations(mut self, citations: Vec<Citation>) -> Self {
        self.population_size_citations = citations;
        self
    }

    /// Register a model with this species.
    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    /// Register a genetic map with this species.
    pub fn add_genetic_map(&mut self, mut genetic_map: GeneticMap) {
        genetic_map.species_id = Some(self.id.clone());
        self.genetic_maps.push(genetic_map);
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn genetic_maps(&self) -> &[GeneticMap] {
        &self.genetic_maps
    }

    /// Look up a model by id.
    pub fn get_model(&self, id: &str) -> Result<&Model> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::not_found("Model", id))
    }

    /// Look up a genetic map by id.
    pub fn get_genetic_map(&self, id: &str) -> Result<&GeneticMap> {
        self.genetic_maps
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::not_found("Genetic map", id))
    }

    /// Resolve a contig for `chromosome`.
    ///
    /// Without a genetic map the contig has the chromosome's flat recombination
    /// rate over `length * length_multiplier` base pairs. With a genetic map the
    /// map's recombination map for the chromosome is used. The mutation rate is
    /// always the chromosome's.
    ///
    /// # Errors
    /// Returns [`CatalogError::NotFound`] for an unknown chromosome or map, and
    /// [`CatalogError::InvalidArgument`] when a genetic map is combined with a
    /// length multiplier other than 1.
    pub fn get_contig(
        &self,
        chromosome: &str,
        genetic_map: Option<&str>,
        length_multiplier: f64,
    ) -> Result<Contig> {
        let chrom = self.genome.get_chromosome(chromosome)?;
        let contig = match genetic_map {
            None => {
                debug!(
                    "Making flat chromosome {} * {}",
                    length_multiplier,
                    chrom.id()
                );
                Contig {
                    recombination_map: RecombinationMap::uniform(
                        chrom.length() as f64 * length_multiplier,
                        chrom.recombination_rate(),
                    )?,
                    mutation_rate: chrom.mutation_rate(),
                    genetic_map: None,
                }
            }
            Some(map_id) => {
                if length_multiplier != 1.0 {
                    return Err(CatalogError::InvalidArgument(
                        "Cannot use a length multiplier with a genetic map".into(),
                    ));
                }
                debug!("Getting map for {} from {}", chrom.id(), map_id);
                let map = self.get_genetic_map(map_id)?;
                Contig {
                    recombination_map: map.get_chromosome_map(chrom)?,
                    mutation_rate: chrom.mutation_rate(),
                    genetic_map: Some(map.id.clone()),
                }
            }
        };
        Ok(contig)
    }
}
