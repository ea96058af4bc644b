//! Empirical genetic maps stored in the local cache.
//!
//! A map is a set of HapMap-format files, one per chromosome, unpacked into
//! `<cache_dir>/<species id>/<map id>/`. Downloading is left to the user; the
//! catalog only records where the archive lives.

use crate::citations::Citation;
use crate::errors::{CatalogError, Result};
use crate::genome::Chromosome;
use log::{debug, warn};
use popcat_engine::RecombinationMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder replaced by the chromosome id in file patterns.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticMap {
    pub id: String,
    pub description: String,
    /// Location of the archive holding the per-chromosome files
    pub url: String,
    /// File name of a chromosome's map, with `{name}` standing for its id
    pub file_pattern: String,
    pub citations: Vec<Citation>,
    /// Owning species, set when the map is added to a species
    pub species_id: Option<String>,
    /// Root of the genetic map cache
    pub cache_dir: PathBuf,
}

impl GeneticMap {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        file_pattern: impl Into<String>,
        citations: Vec<Citation>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            url: url.into(),
            file_pattern: file_pattern.into(),
            citations,
            species_id: None,
            cache_dir: cache_dir.into(),
        }
    }

    /// Directory holding this map's files.
    pub fn map_cache_dir(&self) -> PathBuf {
        let mut dir = self.cache_dir.clone();
        if let Some(species) = &self.species_id {
            dir.push(species);
        }
        dir.push(&self.id);
        dir
    }

    /// File name of the map for `chromosome_id`.
    pub fn file_name(&self, chromosome_id: &str) -> String {
        self.file_pattern.replace(NAME_PLACEHOLDER, chromosome_id)
    }

    /// Whether the map's directory exists.
    pub fn is_cached(&self) -> bool {
        self.map_cache_dir().is_dir()
    }

    /// Recombination map of `chromosome`.
    ///
    /// A chromosome without a file in the cached map gets a zero-rate map over
    /// its full length.
    ///
    /// # Errors
    /// Returns [`CatalogError::GeneticMapNotCached`] if the map has not been
    /// downloaded, or an engine error if the file cannot be parsed.
    pub fn get_chromosome_map(&self, chromosome: &Chromosome) -> Result<RecombinationMap> {
        let dir = self.map_cache_dir();
        if !dir.is_dir() {
            return Err(CatalogError::GeneticMapNotCached {
                id: self.id.clone(),
                url: self.url.clone(),
                path: dir,
            });
        }
        let path = dir.join(self.file_name(chromosome.id()));
        if !path.is_file() {
            warn!(
                "Recombination map not found for chromosome '{}' in genetic map '{}'; \
                 setting the recombination rate to zero",
                chromosome.id(),
                self.id
            );
            return Ok(RecombinationMap::uniform(chromosome.length() as f64, 0.0)?);
        }
        debug!("Reading genetic map file {}", path.display());
        Ok(RecombinationMap::read_hapmap(&path)?)
    }
}
