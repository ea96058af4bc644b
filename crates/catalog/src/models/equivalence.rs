//! Tolerance-based comparison of demographic models.
//!
//! Two models are equivalent when their migration matrices, per-population
//! initial sizes and growth rates, and their demographic events (compared in
//! order) agree within a relative and absolute tolerance. Events are first
//! lowered to an [`EventRecord`], a flat key/value description of the event, so
//! that every event kind is compared the same way.

use super::Model;
use crate::errors::{EquivalenceError, InvalidModel, UnequalModels};
use popcat_engine::DemographicEvent;
use std::collections::BTreeMap;
use std::fmt;

/// Relative and absolute tolerance for comparing floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub rtol: f64,
    pub atol: f64,
}

impl Tolerance {
    pub const DEFAULT_RTOL: f64 = 1e-8;
    pub const DEFAULT_ATOL: f64 = 1e-5;

    pub fn new(rtol: f64, atol: f64) -> Self {
        Self { rtol, atol }
    }

    /// Whether `a` is within tolerance of the reference value `b`.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        a == b || (a - b).abs() <= self.atol + self.rtol * b.abs()
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RTOL, Self::DEFAULT_ATOL)
    }
}

/// One parameter of an [`EventRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Canonical key/value form of a demographic event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord(BTreeMap<&'static str, ParamValue>);

impl EventRecord {
    /// Lower `event` for a model with `num_populations` populations.
    ///
    /// Population indexes become integers with `-1` meaning "all"; a migration
    /// matrix entry `(j, k)` becomes `j * num_populations + k`.
    ///
    /// An unset size or growth rate is left out of the record rather than
    /// filled with a default, so a change that sets the growth rate to zero
    /// and one that leaves it unset are reported as a type mismatch even
    /// when they simulate the same history.
    pub fn from_event(event: &DemographicEvent, num_populations: usize) -> Self {
        let mut params = BTreeMap::new();
        let index = |i: usize| ParamValue::Int(i as i64);
        params.insert("time", ParamValue::Float(event.time()));
        match event {
            DemographicEvent::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                params.insert(
                    "type",
                    ParamValue::Text("population_parameters_change".into()),
                );
                params.insert("population", population.map_or(ParamValue::Int(-1), index));
                if let Some(size) = initial_size {
                    params.insert("initial_size", ParamValue::Float(*size));
                }
                if let Some(rate) = growth_rate {
                    params.insert("growth_rate", ParamValue::Float(*rate));
                }
            }
            DemographicEvent::MigrationRateChange {
                rate, matrix_index, ..
            } => {
                params.insert("type", ParamValue::Text("migration_rate_change".into()));
                params.insert("migration_rate", ParamValue::Float(*rate));
                params.insert(
                    "matrix_index",
                    matrix_index.map_or(ParamValue::Int(-1), |(j, k)| {
                        index(j * num_populations + k)
                    }),
                );
            }
            DemographicEvent::MassMigration {
                source,
                dest,
                proportion,
                ..
            } => {
                params.insert("type", ParamValue::Text("mass_migration".into()));
                params.insert("source", index(*source));
                params.insert("dest", index(*dest));
                params.insert("proportion", ParamValue::Float(*proportion));
            }
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

fn check_configurations(model: &Model) -> Result<(), InvalidModel> {
    for (index, config) in model.population_configurations.iter().enumerate() {
        if config.sample_size.is_some() {
            return Err(InvalidModel(format!(
                "model '{}' population {index}: sample size must not be set in a model \
                 population configuration",
                model.id
            )));
        }
        if config.initial_size.is_none() {
            return Err(InvalidModel(format!(
                "model '{}' population {index}: initial size must be set",
                model.id
            )));
        }
    }
    Ok(())
}

fn verify_migration_matrices(
    a: &[Vec<f64>],
    b: &[Vec<f64>],
    tolerance: &Tolerance,
) -> Result<(), UnequalModels> {
    let shape = |m: &[Vec<f64>]| m.iter().map(Vec::len).collect::<Vec<_>>();
    if shape(a) != shape(b) {
        return Err(UnequalModels::ShapeMismatch(format!(
            "migration matrices have different shapes: {:?} != {:?}",
            shape(a),
            shape(b)
        )));
    }
    for (j, (row_a, row_b)) in a.iter().zip(b).enumerate() {
        for (k, (&x, &y)) in row_a.iter().zip(row_b).enumerate() {
            if !tolerance.is_close(x, y) {
                return Err(UnequalModels::ValueMismatch(format!(
                    "migration matrix entry ({j}, {k}) differs: {x} != {y}"
                )));
            }
        }
    }
    Ok(())
}

fn verify_vectors(
    what: &str,
    a: &[f64],
    b: &[f64],
    tolerance: &Tolerance,
) -> Result<(), UnequalModels> {
    for (index, (&x, &y)) in a.iter().zip(b).enumerate() {
        if !tolerance.is_close(x, y) {
            return Err(UnequalModels::ValueMismatch(format!(
                "{what} differ at population {index}: {x} != {y}"
            )));
        }
    }
    Ok(())
}

fn verify_events(
    a: &[DemographicEvent],
    b: &[DemographicEvent],
    num_populations: usize,
    tolerance: &Tolerance,
) -> Result<(), UnequalModels> {
    if a.len() != b.len() {
        return Err(UnequalModels::CountMismatch(format!(
            "different numbers of demographic events: {} != {}",
            a.len(),
            b.len()
        )));
    }
    for (position, (event_a, event_b)) in a.iter().zip(b).enumerate() {
        let record_a = EventRecord::from_event(event_a, num_populations);
        let record_b = EventRecord::from_event(event_b, num_populations);
        let keys_a: Vec<_> = record_a.keys().collect();
        let keys_b: Vec<_> = record_b.keys().collect();
        if keys_a != keys_b {
            return Err(UnequalModels::TypeMismatch(format!(
                "event {position} has parameters {keys_a:?} != {keys_b:?}"
            )));
        }
        for key in keys_a {
            let (x, y) = match (record_a.get(key), record_b.get(key)) {
                (Some(x), Some(y)) => (x, y),
                _ => continue,
            };
            let equal = match (x, y) {
                (ParamValue::Float(x), ParamValue::Float(y)) => tolerance.is_close(*x, *y),
                _ => x == y,
            };
            if !equal {
                return Err(UnequalModels::ValueMismatch(format!(
                    "event {position} {key} mismatch: {x} != {y}"
                )));
            }
        }
    }
    Ok(())
}

impl Model {
    /// Check that `self` and `other` describe the same demography.
    ///
    /// # Errors
    /// Returns [`EquivalenceError::InvalidModel`] if either model sets a sample
    /// size or leaves an initial size unset, whether or not the rest agrees, and
    /// [`EquivalenceError::Unequal`] naming the first component that differs.
    pub fn verify_equal(&self, other: &Model, tolerance: &Tolerance) -> Result<(), EquivalenceError> {
        check_configurations(self)?;
        check_configurations(other)?;

        verify_migration_matrices(&self.migration_matrix, &other.migration_matrix, tolerance)?;

        let configs_a = &self.population_configurations;
        let configs_b = &other.population_configurations;
        if configs_a.len() != configs_b.len() {
            return Err(UnequalModels::CountMismatch(format!(
                "different numbers of populations: {} != {}",
                configs_a.len(),
                configs_b.len()
            ))
            .into());
        }
        // Initial sizes are known to be set after the configuration checks
        let sizes = |configs: &[popcat_engine::PopulationConfiguration]| {
            configs
                .iter()
                .map(|c| c.initial_size.unwrap_or_default())
                .collect::<Vec<_>>()
        };
        verify_vectors("initial sizes", &sizes(configs_a), &sizes(configs_b), tolerance)?;
        let growth = |configs: &[popcat_engine::PopulationConfiguration]| {
            configs.iter().map(|c| c.growth_rate).collect::<Vec<_>>()
        };
        verify_vectors("growth rates", &growth(configs_a), &growth(configs_b), tolerance)?;

        verify_events(
            &self.demographic_events,
            &other.demographic_events,
            configs_a.len(),
            tolerance,
        )?;
        Ok(())
    }

    /// Whether `self` and `other` describe the same demography.
    ///
    /// # Errors
    /// Invalid models are reported rather than compared.
    pub fn equals(&self, other: &Model, tolerance: &Tolerance) -> Result<bool, InvalidModel> {
        match self.verify_equal(other, tolerance) {
            Ok(()) => Ok(true),
            Err(EquivalenceError::Unequal(_)) => Ok(false),
            Err(EquivalenceError::InvalidModel(e)) => Err(e),
        }
    }
}
