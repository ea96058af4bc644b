//! Generic models that are not tied to a species.

use super::{Model, Population};
use crate::errors::InvalidModel;
use popcat_engine::{DemographicEvent, PopulationConfiguration};

fn pop0() -> Population {
    Population::new("pop0", "Generic population")
}

/// A single population of constant size `n`.
pub fn constant_size(n: f64) -> Result<Model, InvalidModel> {
    Model::builder("constant", "ConstantSize")
        .description("Generic model of constant size.")
        .population(pop0(), PopulationConfiguration::new(n))
        .build()
}

/// A single population of size `n1` until generation `t` and `n2` before it.
pub fn two_epoch(n1: f64, n2: f64, t: f64) -> Result<Model, InvalidModel> {
    Model::builder("2_epoch", "TwoEpoch")
        .description(
            "Generic model of a single population with piecewise constant \
             population size with a single change.",
        )
        .population(pop0(), PopulationConfiguration::new(n1))
        .event(DemographicEvent::PopulationParametersChange {
            time: t,
            population: Some(0),
            initial_size: Some(n2),
            growth_rate: Some(0.0),
        })
        .build()
}

/// A single population of size `n0` at present that changes to `n` at each
/// `(t, n)` in `epochs`, given oldest last.
pub fn piecewise_constant_size(n0: f64, epochs: &[(f64, f64)]) -> Result<Model, InvalidModel> {
    Model::builder("piecewise_constant", "PiecewiseConstant")
        .description(
            "Generic model of a single population with piecewise constant population size.",
        )
        .population(pop0(), PopulationConfiguration::new(n0))
        .events(epochs.iter().map(|&(t, n)| DemographicEvent::PopulationParametersChange {
            time: t,
            population: Some(0),
            initial_size: Some(n),
            growth_rate: Some(0.0),
        }))
        .build()
}

/// Two populations of sizes `n1` and `n2` exchanging migrants at rates `m12`
/// and `m21` since they split from an ancestral population of size `na` at
/// generation `t`.
pub fn isolation_with_migration(
    na: f64,
    n1: f64,
    n2: f64,
    t: f64,
    m12: f64,
    m21: f64,
) -> Result<Model, InvalidModel> {
    Model::builder("IM", "Isolation with migration")
        .description(
            "Generic isolation with migration model in which a single ancestral \
             population splits into two populations that exchange migrants.",
        )
        .population(Population::new("pop1", "Generic population 1"), PopulationConfiguration::new(n1))
        .population(Population::new("pop2", "Generic population 2"), PopulationConfiguration::new(n2))
        .migration_matrix(vec![vec![0.0, m12], vec![m21, 0.0]])
        .event(DemographicEvent::split(t, 1, 0))
        .event(DemographicEvent::MigrationRateChange {
            time: t,
            rate: 0.0,
            matrix_index: None,
        })
        .event(DemographicEvent::PopulationParametersChange {
            time: t,
            population: Some(0),
            initial_size: Some(na),
            growth_rate: Some(0.0),
        })
        .build()
}
