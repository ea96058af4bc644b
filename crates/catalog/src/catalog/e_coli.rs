//! Escherichia coli.

use crate::citations::Citation;
use crate::errors::Result;
use crate::genome::{Chromosome, Genome};
use crate::models::{Model, Population};
use crate::species::Species;
use popcat_engine::PopulationConfiguration;

/// Minutes per year over minutes per generation.
const GENERATION_TIME: f64 = 0.00003805175;
const POPULATION_SIZE: f64 = 1.8e8;

fn lapierre_2016() -> Citation {
    Citation::new(
        "Lapierre et al.",
        2016,
        "https://doi.org/10.1093/molbev/msw048",
    )
}

/// Genome of strain K-12.
fn genome() -> Result<Genome> {
    Genome::new(vec![Chromosome::new(
        "Chromosome",
        4_641_652,
        0.0,
        1e-5 + 2e-4,
    )?])
}

fn lapierre_constant() -> Result<Model> {
    Ok(Model::builder("constant", "Constant size")
        .description(
            "The constant population size model from Lapierre et al. 2016. The \
             population does not undergo growth or size changes, making it a simple \
             scenario in which to study the effects of recombination and/or mutation \
             on a variety of inference methods.",
        )
        .citation(lapierre_2016())
        .population(
            Population::new("e_coli", "Single E-coli population"),
            PopulationConfiguration::new(POPULATION_SIZE),
        )
        .generation_time(GENERATION_TIME)
        .build()?)
}

pub fn species() -> Result<Species> {
    let mut species = Species::new(
        "esccol",
        "Escherichia coli",
        genome()?,
        GENERATION_TIME,
        POPULATION_SIZE,
    )
    .with_population_size_citations(vec![lapierre_2016()]);
    species.add_model(lapierre_constant()?);
    Ok(species)
}
