//! Arabidopsis thaliana.

use crate::citations::Citation;
use crate::config::CatalogConfig;
use crate::errors::Result;
use crate::genetic_maps::GeneticMap;
use crate::genome::{Chromosome, Genome};
use crate::models::{Model, Population};
use crate::species::Species;
use popcat_engine::{DemographicEvent, PopulationConfiguration};

const GENERATION_TIME: f64 = 1.0;
const POPULATION_SIZE: f64 = 1000.0;

/// Ossowski et al. 2010.
const MUTATION_RATE: f64 = 7e-9;
/// Huber et al. 2014: rho = 200/Mb with Ne = 124,000.
const RECOMBINATION_RATE: f64 = 8.1e-9;

/// TAIR10 lengths.
const CHROMOSOMES: &[(&str, u64)] = &[
    ("chr1", 30_427_671),
    ("chr2", 19_698_289),
    ("chr3", 23_459_830),
    ("chr4", 18_585_056),
    ("chr5", 26_975_502),
];

/// Start of each MSMC epoch, in generations.
const MSMC_TIMES: [f64; 32] = [
    699.0, 2796.0, 6068.0, 9894.0, 14370.0, 19606.0, 25730.0, 32894.0, 41275.0, 51077.0,
    62544.0, 75958.0, 91648.0, 110001.0, 131471.0, 156584.0, 185960.0, 220324.0, 260520.0,
    307540.0, 362541.0, 426879.0, 502139.0, 590173.0, 693151.0, 813610.0, 954517.0,
    1119341.0, 1312147.0, 1537686.0, 1801500.0, 2110100.0,
];

/// Size in each MSMC epoch as published.
const MSMC_SIZES: [f64; 32] = [
    42252426.0, 42252426.0, 60323.0, 72174.0, 40591.0, 21158.0, 21442.0, 39942.0, 78908.0,
    111132.0, 110745.0, 96283.0, 87661.0, 83932.0, 83829.0, 91813.0, 111644.0, 143456.0,
    181571.0, 217331.0, 241400.0, 246984.0, 238593.0, 228222.0, 217752.0, 198019.0,
    165210.0, 121796.0, 121796.0, 73989.0, 73989.0, 73989.0,
];

fn genome() -> Result<Genome> {
    let chromosomes = CHROMOSOMES
        .iter()
        .map(|&(id, length)| Chromosome::new(id, length, RECOMBINATION_RATE, MUTATION_RATE))
        .collect::<Result<Vec<_>>>()?;
    Genome::new(chromosomes)
}

fn salome_2012(config: &CatalogConfig) -> GeneticMap {
    GeneticMap::new(
        "Salome2012",
        "Genetic map from Salome 2012 averaged across population crosses.",
        "http://www.eeb.ucla.edu/Faculty/Lohmueller/data/uploads/salome2012_maps.tar.gz",
        "arab_{name}_map_loess.txt",
        vec![Citation::new(
            "Salome et al.",
            2012,
            "https://doi.org/10.1038/hdy.2011.95",
        )],
        &config.cache_dir,
    )
}

/// MSMC sizes clamped to the range where the inference is reliable.
///
/// MSMC is accurate from about 40 kya to 1.6 Mya, so the first eight sizes take
/// the value at index 8 and the last two the value at index 30.
fn msmc_sizes() -> [f64; 32] {
    let mut sizes = MSMC_SIZES;
    let recent = sizes[8];
    sizes[..8].fill(recent);
    let ancient = sizes[30];
    sizes[30..].fill(ancient);
    sizes
}

fn durvasula_msmc() -> Result<Model> {
    let sizes = msmc_sizes();
    Ok(Model::builder("msmc", "MSMC estimate for the South Middle Atlas")
        .description(
            "Model estimated from two homozygous individuals from the South Middle \
             Atlas using MSMC.",
        )
        .citation(Citation::new(
            "Durvasula et al.",
            2017,
            "https://doi.org/10.1073/pnas.1616736114",
        ))
        .population(
            Population::new("a_thaliana", "Arabidopsis Thaliana population"),
            PopulationConfiguration::new(sizes[0]),
        )
        .events(
            MSMC_TIMES
                .iter()
                .zip(sizes)
                .map(|(&t, size)| DemographicEvent::size_change(t, 0, size)),
        )
        .generation_time(GENERATION_TIME)
        .build()?)
}

pub fn species(config: &CatalogConfig) -> Result<Species> {
    let mut species = Species::new(
        "aratha",
        "Arabidopsis thaliana",
        genome()?,
        GENERATION_TIME,
        POPULATION_SIZE,
    );
    species.add_genetic_map(salome_2012(config));
    species.add_model(durvasula_msmc()?);
    Ok(species)
}
