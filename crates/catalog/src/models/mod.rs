//! Demographic models.
//!
//! A model pairs the demography handed to the simulation engine (population
//! configurations, migration matrix, demographic events) with the descriptive
//! metadata shown to users (name, description, populations, citations).

pub mod equivalence;
pub mod generic;

use crate::citations::Citation;
use crate::errors::{CatalogError, InvalidModel, Result};
use crate::species::Contig;
use log::info;
use popcat_engine::{
    DemographicEvent, DemographyDebugger, EngineError, PopulationConfiguration, Sample, Simulator,
    TreeSequence,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::Write;

pub use equivalence::{EventRecord, ParamValue, Tolerance};

/// A population in a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Population {
    pub id: String,
    pub description: String,
    /// Whether samples may be drawn from this population
    pub allow_samples: bool,
}

impl Population {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            allow_samples: true,
        }
    }

    /// Forbid sampling from this population.
    pub fn without_samples(mut self) -> Self {
        self.allow_samples = false;
        self
    }

    /// Metadata embedded in simulation output.
    pub fn as_metadata(&self) -> Value {
        json!({ "name": self.id, "description": self.description })
    }
}

/// A demographic model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Short machine identifier, unique within a species
    pub id: String,
    pub name: String,
    pub description: String,
    pub citations: Vec<Citation>,
    /// Index-aligned with `population_configurations`
    pub populations: Vec<Population>,
    pub population_configurations: Vec<PopulationConfiguration>,
    pub migration_matrix: Vec<Vec<f64>>,
    pub demographic_events: Vec<DemographicEvent>,
    /// Years per generation, when the model fixes one
    pub generation_time: Option<f64>,
}

impl Model {
    /// Start building a model.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(id, name)
    }

    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    /// Number of populations that allow sampling.
    pub fn num_sampling_populations(&self) -> usize {
        self.populations.iter().filter(|p| p.allow_samples).count()
    }

    /// Samples taken at time zero: `counts[i]` from population `i`, population
    /// 0 first.
    ///
    /// # Panics
    /// Panics if more counts are given than the model has populations; use
    /// [`Model::check_sample_counts`] to validate user input first.
    pub fn get_samples(&self, counts: &[usize]) -> Vec<Sample> {
        let n = self.num_populations();
        assert!(
            counts.len() <= n,
            "population index {} out of range for model '{}' with {n} populations",
            counts.len() - 1,
            self.id
        );
        counts
            .iter()
            .enumerate()
            .flat_map(|(population, &count)| {
                std::iter::repeat_n(Sample::new(population, 0.0), count)
            })
            .collect()
    }

    /// Check that `counts` can be passed to [`Model::get_samples`].
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidArgument`] when there are more counts than
    /// sampling populations, or when a population that forbids sampling is
    /// asked for samples.
    pub fn check_sample_counts(&self, counts: &[usize]) -> Result<()> {
        let allowed = self.num_sampling_populations();
        if counts.len() > allowed {
            return Err(CatalogError::InvalidArgument(format!(
                "Cannot sample from more than {allowed} populations for model '{}'; \
                 got {} sample counts",
                self.id,
                counts.len()
            )));
        }
        for (population, &count) in counts.iter().enumerate() {
            if count > 0 && !self.populations[population].allow_samples {
                return Err(CatalogError::InvalidArgument(format!(
                    "Population '{}' of model '{}' cannot be sampled",
                    self.populations[population].id, self.id
                )));
            }
        }
        Ok(())
    }

    /// Simulate `samples` on `contig` with a random seed.
    pub fn run(&self, contig: &Contig, samples: &[Sample]) -> Result<TreeSequence> {
        self.run_with_seed(contig, samples, None)
    }

    /// Simulate `samples` on `contig`.
    pub fn run_with_seed(
        &self,
        contig: &Contig,
        samples: &[Sample],
        seed: Option<u64>,
    ) -> Result<TreeSequence> {
        info!(
            "Running model '{}' on {} with {} samples",
            self.id,
            contig,
            samples.len()
        );
        let ts = Simulator::new()
            .population_configurations(self.population_configurations.clone())
            .migration_matrix(self.migration_matrix.clone())
            .demographic_events(self.demographic_events.clone())
            .samples(samples.to_vec())
            .recombination_map(contig.recombination_map.clone())
            .mutation_rate(contig.mutation_rate)
            .maybe_seed(seed)
            .run()?;
        Ok(ts)
    }

    /// Epochs of this model's demography.
    pub fn debugger(&self) -> Result<DemographyDebugger> {
        Ok(DemographyDebugger::new(
            &self.population_configurations,
            &self.migration_matrix,
            &self.demographic_events,
        )?)
    }

    /// Print the demographic history epoch by epoch.
    pub fn debug(&self, out: &mut impl Write) -> Result<()> {
        self.debugger()?
            .print_history(out)
            .map_err(EngineError::from)?;
        Ok(())
    }
}

/// Builder for [`Model`] that enforces its structural invariants.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    id: String,
    name: String,
    description: String,
    citations: Vec<Citation>,
    populations: Vec<Population>,
    population_configurations: Vec<PopulationConfiguration>,
    migration_matrix: Option<Vec<Vec<f64>>>,
    demographic_events: Vec<DemographicEvent>,
    generation_time: Option<f64>,
}

impl ModelBuilder {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            citations: Vec::new(),
            populations: Vec::new(),
            population_configurations: Vec::new(),
            migration_matrix: None,
            demographic_events: Vec::new(),
            generation_time: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn citation(mut self, citation: Citation) -> Self {
        self.citations.push(citation);
        self
    }

    pub fn citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations.extend(citations);
        self
    }

    pub fn populations(mut self, populations: Vec<Population>) -> Self {
        self.populations = populations;
        self
    }

    pub fn population_configurations(mut self, configurations: Vec<PopulationConfiguration>) -> Self {
        self.population_configurations = configurations;
        self
    }

    /// Add a population together with its configuration.
    pub fn population(mut self, population: Population, configuration: PopulationConfiguration) -> Self {
        self.populations.push(population);
        self.population_configurations.push(configuration);
        self
    }

    /// Set the migration matrix. Defaults to no migration.
    pub fn migration_matrix(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.migration_matrix = Some(matrix);
        self
    }

    pub fn event(mut self, event: DemographicEvent) -> Self {
        self.demographic_events.push(event);
        self
    }

    pub fn events(mut self, events: impl IntoIterator<Item = DemographicEvent>) -> Self {
        self.demographic_events.extend(events);
        self
    }

    pub fn generation_time(mut self, years: f64) -> Self {
        self.generation_time = Some(years);
        self
    }

    /// Build the model.
    ///
    /// Configurations without metadata get their population's metadata.
    ///
    /// # Errors
    /// Returns [`InvalidModel`] if the populations, configurations and matrix
    /// disagree on the number of populations, if a configuration sets a sample
    /// size, lacks a positive initial size or has a non-finite growth rate, if
    /// the matrix holds a non-finite entry, or if an event is invalid.
    pub fn build(self) -> std::result::Result<Model, InvalidModel> {
        let n = self.populations.len();
        if n == 0 {
            return Err(InvalidModel(format!("model '{}' has no populations", self.id)));
        }
        if self.population_configurations.len() != n {
            return Err(InvalidModel(format!(
                "model '{}' has {n} populations but {} population configurations",
                self.id,
                self.population_configurations.len()
            )));
        }
        let migration_matrix = self.migration_matrix.unwrap_or_else(|| vec![vec![0.0; n]; n]);
        if migration_matrix.len() != n || migration_matrix.iter().any(|row| row.len() != n) {
            return Err(InvalidModel(format!(
                "model '{}' migration matrix must be {n}x{n}",
                self.id
            )));
        }
        popcat_engine::demography::validate_migration_matrix(&migration_matrix, n)
            .map_err(|e| InvalidModel(format!("model '{}': {e}", self.id)))?;

        for (index, config) in self.population_configurations.iter().enumerate() {
            if config.sample_size.is_some() {
                return Err(InvalidModel(format!(
                    "model '{}' population {index} sets a sample size",
                    self.id
                )));
            }
            if !config.growth_rate.is_finite() {
                return Err(InvalidModel(format!(
                    "model '{}' population {index} has invalid growth rate {}",
                    self.id, config.growth_rate
                )));
            }
            match config.initial_size {
                Some(size) if size > 0.0 && size.is_finite() => {}
                Some(size) => {
                    return Err(InvalidModel(format!(
                        "model '{}' population {index} has invalid initial size {size}",
                        self.id
                    )))
                }
                None => {
                    return Err(InvalidModel(format!(
                        "model '{}' population {index} has no initial size",
                        self.id
                    )))
                }
            }
        }
        for event in &self.demographic_events {
            event
                .validate(n)
                .map_err(|e| InvalidModel(format!("model '{}': {e}", self.id)))?;
        }

        let population_configurations = self
            .population_configurations
            .into_iter()
            .zip(&self.populations)
            .map(|(mut config, population)| {
                if config.metadata.is_none() {
                    config.metadata = Some(population.as_metadata());
                }
                config
            })
            .collect();

        Ok(Model {
            id: self.id,
            name: self.name,
            description: self.description,
            citations: self.citations,
            populations: self.populations,
            population_configurations,
            migration_matrix,
            demographic_events: self.demographic_events,
            generation_time: self.generation_time,
        })
    }
}
