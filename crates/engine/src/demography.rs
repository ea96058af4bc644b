//! Demographic inputs to the coalescent: population configurations, migration
//! matrices, demographic events and samples.
//!
//! Time is measured in generations before the present. The migration matrix entry
//! `m[j][k]` is the rate at which a lineage in population `j` moves to population
//! `k` per generation, looking backwards in time (equivalently, the fraction of
//! population `j` made of migrants from `k` each generation, forwards in time).

use crate::errors::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Initial state of one population at time zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfiguration {
    /// Population size at time zero
    pub initial_size: Option<f64>,
    /// Exponential growth rate (positive means the population grew towards the present)
    #[serde(default)]
    pub growth_rate: f64,
    /// Legacy per-population sample count, used when no explicit samples are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<usize>,
    /// Free-form metadata attached to the population in the output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl PopulationConfiguration {
    /// Configuration with a constant size and no metadata.
    pub fn new(initial_size: f64) -> Self {
        Self {
            initial_size: Some(initial_size),
            growth_rate: 0.0,
            sample_size: None,
            metadata: None,
        }
    }

    /// Set the growth rate.
    pub fn with_growth_rate(mut self, growth_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self
    }

    /// Attach output metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A time-stamped change to the demography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemographicEvent {
    /// Change the size and/or growth rate of one population (or all when `population`
    /// is `None`). An unset field keeps its current value.
    PopulationParametersChange {
        time: f64,
        population: Option<usize>,
        initial_size: Option<f64>,
        growth_rate: Option<f64>,
    },
    /// Set one migration matrix entry (or every off-diagonal entry when
    /// `matrix_index` is `None`).
    MigrationRateChange {
        time: f64,
        rate: f64,
        matrix_index: Option<(usize, usize)>,
    },
    /// Move each lineage in `source` to `dest` with probability `proportion`.
    MassMigration {
        time: f64,
        source: usize,
        dest: usize,
        proportion: f64,
    },
}

impl DemographicEvent {
    /// Size change of a single population to a constant size.
    pub fn size_change(time: f64, population: usize, initial_size: f64) -> Self {
        Self::PopulationParametersChange {
            time,
            population: Some(population),
            initial_size: Some(initial_size),
            growth_rate: None,
        }
    }

    /// Split looking backwards in time: every lineage in `source` moves to `dest`.
    pub fn split(time: f64, source: usize, dest: usize) -> Self {
        Self::MassMigration {
            time,
            source,
            dest,
            proportion: 1.0,
        }
    }

    /// Generation at which the event happens.
    pub fn time(&self) -> f64 {
        match self {
            Self::PopulationParametersChange { time, .. }
            | Self::MigrationRateChange { time, .. }
            | Self::MassMigration { time, .. } => *time,
        }
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                let target = match population {
                    Some(p) => format!("population {p}"),
                    None => "all populations".to_string(),
                };
                let mut changes = Vec::new();
                if let Some(size) = initial_size {
                    changes.push(format!("initial_size -> {size:.6}"));
                }
                if let Some(rate) = growth_rate {
                    changes.push(format!("growth_rate -> {rate:.6}"));
                }
                format!("Population parameter change for {target}: {}", changes.join(", "))
            }
            Self::MigrationRateChange {
                rate, matrix_index, ..
            } => match matrix_index {
                Some((j, k)) => format!("Migration rate change for ({j}, {k}) to {rate}"),
                None => format!("Migration rate change to {rate} everywhere"),
            },
            Self::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => format!(
                "Mass migration: lineages move from {source} to {dest} with probability {proportion}"
            ),
        }
    }

    /// Check population indexes and parameter ranges against `num_populations`.
    pub fn validate(&self, num_populations: usize) -> Result<()> {
        let check_index = |index: usize, what: &str| {
            if index >= num_populations {
                Err(EngineError::InvalidParameter(format!(
                    "{what} {index} out of bounds for {num_populations} populations"
                )))
            } else {
                Ok(())
            }
        };
        let time = self.time();
        if !time.is_finite() || time < 0.0 {
            return Err(EngineError::InvalidParameter(format!(
                "event time must be finite and non-negative, got {time}"
            )));
        }
        match self {
            Self::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                if let Some(p) = population {
                    check_index(*p, "population")?;
                }
                if let Some(size) = initial_size {
                    if !(*size > 0.0) || !size.is_finite() {
                        return Err(EngineError::InvalidParameter(format!(
                            "population size must be positive, got {size}"
                        )));
                    }
                }
                if let Some(rate) = growth_rate {
                    if !rate.is_finite() {
                        return Err(EngineError::InvalidParameter(format!(
                            "growth rate must be finite, got {rate}"
                        )));
                    }
                }
                if initial_size.is_none() && growth_rate.is_none() {
                    return Err(EngineError::InvalidParameter(
                        "population parameter change must set a size or a growth rate".into(),
                    ));
                }
                Ok(())
            }
            Self::MigrationRateChange {
                rate, matrix_index, ..
            } => {
                if !(*rate >= 0.0) || !rate.is_finite() {
                    return Err(EngineError::InvalidParameter(format!(
                        "migration rate must be non-negative, got {rate}"
                    )));
                }
                if let Some((j, k)) = matrix_index {
                    check_index(*j, "matrix row")?;
                    check_index(*k, "matrix column")?;
                    if j == k {
                        return Err(EngineError::InvalidParameter(
                            "cannot set a diagonal migration rate".into(),
                        ));
                    }
                }
                Ok(())
            }
            Self::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => {
                check_index(*source, "source population")?;
                check_index(*dest, "destination population")?;
                if source == dest {
                    return Err(EngineError::InvalidParameter(
                        "mass migration source and destination must differ".into(),
                    ));
                }
                if !(0.0..=1.0).contains(proportion) {
                    return Err(EngineError::InvalidParameter(format!(
                        "mass migration proportion must be in [0, 1], got {proportion}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A request for one sampled haploid genome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Population the sample is drawn from
    pub population: usize,
    /// Generation at which it is sampled
    pub time: f64,
}

impl Sample {
    pub fn new(population: usize, time: f64) -> Self {
        Self { population, time }
    }
}

/// Check that `matrix` is square with dimension `num_populations`, finite
/// everywhere and non-negative off the diagonal.
pub fn validate_migration_matrix(matrix: &[Vec<f64>], num_populations: usize) -> Result<()> {
    if matrix.len() != num_populations {
        return Err(EngineError::InvalidParameter(format!(
            "migration matrix has {} rows, expected {num_populations}",
            matrix.len()
        )));
    }
    for (j, row) in matrix.iter().enumerate() {
        if row.len() != num_populations {
            return Err(EngineError::InvalidParameter(format!(
                "migration matrix row {j} has {} entries, expected {num_populations}",
                row.len()
            )));
        }
        for (k, &rate) in row.iter().enumerate() {
            if !rate.is_finite() {
                return Err(EngineError::InvalidParameter(format!(
                    "migration rate ({j}, {k}) must be finite, got {rate}"
                )));
            }
            if j != k && rate < 0.0 {
                return Err(EngineError::InvalidParameter(format!(
                    "migration rate ({j}, {k}) must be non-negative, got {rate}"
                )));
            }
        }
    }
    Ok(())
}

/// Size and growth of one population since its last parameter change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationState {
    /// Size at `start_time`
    pub start_size: f64,
    /// Growth rate in effect since `start_time`
    pub growth_rate: f64,
    /// Time of the last parameter change
    pub start_time: f64,
}

impl PopulationState {
    /// Population size at time `t`.
    pub fn size_at(&self, t: f64) -> f64 {
        self.start_size * (-self.growth_rate * (t - self.start_time)).exp()
    }
}

/// Demographic parameters in effect at a point in time.
///
/// Shared by the simulator and the debugger so both apply events identically.
#[derive(Debug, Clone, PartialEq)]
pub struct DemographyState {
    pub populations: Vec<PopulationState>,
    pub migration_matrix: Vec<Vec<f64>>,
}

impl DemographyState {
    /// State at time zero.
    ///
    /// # Errors
    /// Returns an error if a configuration lacks a positive initial size or the
    /// migration matrix has the wrong shape.
    pub fn new(
        configurations: &[PopulationConfiguration],
        migration_matrix: &[Vec<f64>],
    ) -> Result<Self> {
        if configurations.is_empty() {
            return Err(EngineError::InvalidParameter(
                "at least one population configuration is required".into(),
            ));
        }
        validate_migration_matrix(migration_matrix, configurations.len())?;
        let populations = configurations
            .iter()
            .enumerate()
            .map(|(index, config)| match config.initial_size {
                _ if !config.growth_rate.is_finite() => Err(EngineError::InvalidParameter(format!(
                    "population {index} has invalid growth rate {}",
                    config.growth_rate
                ))),
                Some(size) if size > 0.0 && size.is_finite() => Ok(PopulationState {
                    start_size: size,
                    growth_rate: config.growth_rate,
                    start_time: 0.0,
                }),
                Some(size) => Err(EngineError::InvalidParameter(format!(
                    "population {index} has invalid initial size {size}"
                ))),
                None => Err(EngineError::InvalidParameter(format!(
                    "population {index} has no initial size"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            populations,
            migration_matrix: migration_matrix.to_vec(),
        })
    }

    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    /// Apply a size/growth or migration-rate change at time `t`.
    ///
    /// Mass migrations move lineages and do not change parameters, so they are
    /// ignored here.
    pub fn apply(&mut self, event: &DemographicEvent, t: f64) {
        match event {
            DemographicEvent::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                let targets: Vec<usize> = match population {
                    Some(p) => vec![*p],
                    None => (0..self.populations.len()).collect(),
                };
                for p in targets {
                    let state = &mut self.populations[p];
                    let size = initial_size.unwrap_or_else(|| state.size_at(t));
                    state.start_size = size;
                    if let Some(rate) = growth_rate {
                        state.growth_rate = *rate;
                    }
                    state.start_time = t;
                }
            }
            DemographicEvent::MigrationRateChange {
                rate, matrix_index, ..
            } => match matrix_index {
                Some((j, k)) => self.migration_matrix[*j][*k] = *rate,
                None => {
                    let n = self.migration_matrix.len();
                    for j in 0..n {
                        for k in 0..n {
                            if j != k {
                                self.migration_matrix[j][k] = *rate;
                            }
                        }
                    }
                }
            },
            DemographicEvent::MassMigration { .. } => {}
        }
    }

    /// Total backwards-in-time migration rate out of population `j`.
    pub fn emigration_rate(&self, j: usize) -> f64 {
        self.migration_matrix[j]
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .map(|(_, rate)| rate)
            .sum()
    }
}
