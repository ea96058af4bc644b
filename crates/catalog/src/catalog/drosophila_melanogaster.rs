//! Drosophila melanogaster.

use crate::citations::Citation;
use crate::config::CatalogConfig;
use crate::errors::Result;
use crate::genetic_maps::GeneticMap;
use crate::genome::{Chromosome, Genome};
use crate::models::{Model, Population};
use crate::species::Species;
use popcat_engine::{DemographicEvent, PopulationConfiguration};

const GENERATION_TIME: f64 = 0.1;
const POPULATION_SIZE: f64 = 1_720_600.0;

/// Rate used by Sheehan and Song for both mutation and recombination.
const RATE: f64 = 8.4e-9;

/// dm6 assembly lengths.
const CHROMOSOMES: &[(&str, u64)] = &[
    ("chrX", 23_542_271),
    ("chr2L", 23_513_712),
    ("chr2R", 25_286_936),
    ("chr3L", 28_110_227),
    ("chr3R", 32_079_331),
    ("chr4", 1_348_131),
    ("chrY", 3_667_352),
    ("chrM", 19_524),
];

fn genome() -> Result<Genome> {
    let chromosomes = CHROMOSOMES
        .iter()
        .map(|&(id, length)| Chromosome::new(id, length, RATE, RATE))
        .collect::<Result<Vec<_>>>()?;
    Genome::new(chromosomes)
}

fn african() -> Population {
    Population::new("AFR_dmel", "African D. melanogaster population")
}

fn european() -> Population {
    Population::new("EU_dmel", "European D. melanogaster population")
}

fn sheehan_song_2016() -> Citation {
    Citation::new(
        "Sheehan et al.",
        2016,
        "https://doi.org/10.1371/journal.pcbi.1004845",
    )
}

fn li_stephan_2006() -> Citation {
    Citation::new("Li et al.", 2006, "https://doi.org/10.1371/journal.pgen.0020166")
}

fn comeron_2012(config: &CatalogConfig) -> GeneticMap {
    GeneticMap::new(
        "Comeron2012_dm6",
        "Comeron et al. (2012) maps, lifted over to dm6.",
        "http://sesame.uoregon.edu/~adkern/dmel_recombination_map/comeron2012_maps.tar.gz",
        "genetic_map_comeron2012_dm6_{name}.txt",
        vec![Citation::new(
            "Comeron et al.",
            2012,
            "https://doi.org/10.1371/journal.pgen.1002905",
        )],
        &config.cache_dir,
    )
}

/// Modern, bottleneck and ancestral epochs of one African population.
fn sheehan_song_three_epoch() -> Result<Model> {
    // Times are given in units of 4 * N_ref generations
    let n_ref = 100_000.0;
    let t_1_coal = 0.5;
    let t_2_coal = 5.0;
    let t_1 = t_1_coal * 4.0 * n_ref;
    let t_2 = (t_1_coal + t_2_coal) * 4.0 * n_ref;
    // Estimates from the neural network
    let n_r = 544_200.0;
    let n_b = 145_300.0;
    let n_a = 652_700.0;

    Ok(Model::builder("three_epoch", "Three epoch African population")
        .description(
            "The three epoch (modern, bottleneck, ancestral) model estimated for a \
             single African Drosophila melanogaster population from Sheehan and Song \
             (2016). Population sizes are estimated by a deep learning model trained \
             on simulation data. Due to differences in coalescence units between PSMC \
             (2N) and msms (4N) the number of generations were doubled from PSMC \
             estimates when simulating data in the original publication; the \
             published model is represented here as is.",
        )
        .citation(sheehan_song_2016())
        .population(african(), PopulationConfiguration::new(n_r))
        .event(DemographicEvent::size_change(t_1, 0, n_b))
        .event(DemographicEvent::size_change(t_2, 0, n_a))
        .generation_time(GENERATION_TIME)
        .build()?)
}

/// African and European populations with a European bottleneck and split.
fn li_stephan_two_population() -> Result<Model> {
    let n_a0 = 8.603e6;
    let t_a0 = 600_000.0;
    let n_a1 = n_a0 / 5.0;
    let n_e0 = 1.075e6;
    let n_e1 = 2200.0;
    let t_ae = 158_000.0;
    let t_e1 = t_ae - 3400.0;

    Ok(Model::builder("ooa_2", "Three epoch model for African and European populations")
        .description(
            "The three epoch (modern, bottleneck, ancestral) model estimated for two \
             Drosophila melanogaster populations, African (ancestral) and European \
             (derived), from Li and Stephan (2006).",
        )
        .citation(li_stephan_2006())
        .population(african(), PopulationConfiguration::new(n_a0))
        .population(european(), PopulationConfiguration::new(n_e0))
        .migration_matrix(vec![vec![0.0, 0.0], vec![0.0, 0.0]])
        .event(DemographicEvent::size_change(t_e1, 1, n_e1))
        .event(DemographicEvent::split(t_ae, 1, 0))
        .event(DemographicEvent::size_change(t_a0, 0, n_a1))
        .generation_time(GENERATION_TIME)
        .build()?)
}

pub fn species(config: &CatalogConfig) -> Result<Species> {
    let mut species = Species::new(
        "dromel",
        "Drosophila melanogaster",
        genome()?,
        GENERATION_TIME,
        POPULATION_SIZE,
    )
    .with_population_size_citations(vec![li_stephan_2006()]);
    species.add_genetic_map(comeron_2012(config));
    species.add_model(sheehan_song_three_epoch()?);
    species.add_model(li_stephan_two_population()?);
    Ok(species)
}
