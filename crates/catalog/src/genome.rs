//! Chromosomes and genomes.

use crate::errors::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A chromosome with constant recombination and mutation rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromosome {
    id: String,
    /// Length in base pairs
    length: u64,
    /// Per base pair, per generation
    recombination_rate: f64,
    /// Per base pair, per generation
    mutation_rate: f64,
}

impl Chromosome {
    /// Create a chromosome.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidArgument`] for a zero length or a negative or
    /// non-finite rate.
    pub fn new(
        id: impl Into<String>,
        length: u64,
        recombination_rate: f64,
        mutation_rate: f64,
    ) -> Result<Self> {
        let id = id.into();
        if length == 0 {
            return Err(CatalogError::InvalidArgument(format!(
                "chromosome '{id}' must have a positive length"
            )));
        }
        for (name, rate) in [
            ("recombination", recombination_rate),
            ("mutation", mutation_rate),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(CatalogError::InvalidArgument(format!(
                    "chromosome '{id}' has invalid {name} rate {rate}"
                )));
            }
        }
        Ok(Self {
            id,
            length,
            recombination_rate,
            mutation_rate,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn recombination_rate(&self) -> f64 {
        self.recombination_rate
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chromosome(id={}, length={}, recombination_rate={}, mutation_rate={})",
            self.id, self.length, self.recombination_rate, self.mutation_rate
        )
    }
}

/// The chromosomes of a species, in assembly order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    chromosomes: Vec<Chromosome>,
}

impl Genome {
    /// Create a genome.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidArgument`] if two chromosomes share an id.
    pub fn new(chromosomes: Vec<Chromosome>) -> Result<Self> {
        let mut seen = HashSet::new();
        for chromosome in &chromosomes {
            if !seen.insert(chromosome.id()) {
                return Err(CatalogError::InvalidArgument(format!(
                    "duplicate chromosome id '{}'",
                    chromosome.id()
                )));
            }
        }
        Ok(Self { chromosomes })
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Look up a chromosome by id.
    pub fn get_chromosome(&self, id: &str) -> Result<&Chromosome> {
        self.chromosomes
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| CatalogError::not_found("Chromosome", id))
    }

    /// Total length in base pairs.
    pub fn length(&self) -> u64 {
        self.chromosomes.iter().map(Chromosome::length).sum()
    }

    /// Recombination rate averaged over chromosomes, weighted by length.
    pub fn mean_recombination_rate(&self) -> f64 {
        self.length_weighted_mean(Chromosome::recombination_rate)
    }

    /// Mutation rate averaged over chromosomes, weighted by length.
    pub fn mean_mutation_rate(&self) -> f64 {
        self.length_weighted_mean(Chromosome::mutation_rate)
    }

    fn length_weighted_mean(&self, rate: impl Fn(&Chromosome) -> f64) -> f64 {
        let total = self.length() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.chromosomes
            .iter()
            .map(|c| rate(c) * c.length() as f64 / total)
            .sum()
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Genome:")?;
        let mut chromosomes: Vec<&Chromosome> = self.chromosomes.iter().collect();
        chromosomes.sort_by(|a, b| b.length().cmp(&a.length()));
        for chromosome in chromosomes {
            writeln!(f, "\t{chromosome}")?;
        }
        Ok(())
    }
}
