//! Command line definition.
//!
//! The simulation subcommands depend on the registered species, so the parser is
//! assembled at runtime with the clap builder API.

use crate::defaults::{
    BIN_NAME, LENGTH_MULTIPLIER, SIMULATE_PREFIX, SIM_ALIAS_PREFIX, SOFTWARE_VERSION,
};
use clap::builder::PossibleValuesParser;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use popcat_catalog::{Registry, Species};
use std::path::PathBuf;

pub const VERBOSITY: &str = "verbosity";
pub const QUIET: &str = "quiet";

const GENETIC_MAP: &str = "genetic_map";
const CHROMOSOME: &str = "chromosome";
const LENGTH: &str = "length_multiplier";
const MODEL: &str = "model";
const SEED: &str = "seed";
const SAMPLES: &str = "samples";
const OUTPUT: &str = "output";
const DIRECTORY: &str = "directory";

/// Build the full command line for the species in `registry`.
pub fn build_cli(registry: &Registry) -> Command {
    let mut cli = Command::new(BIN_NAME)
        .version(SOFTWARE_VERSION)
        .about("Run simulations of catalogued species from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(VERBOSITY)
                .short('v')
                .long("verbosity")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase the verbosity"),
        )
        .arg(
            Arg::new(QUIET)
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Do not write out citation information"),
        );

    for species in registry.all_species() {
        cli = cli.subcommand(simulate_command(species));
    }

    cli.subcommand(
        Command::new("list").about("List the species, chromosomes, genetic maps and models"),
    )
    .subcommand(
        Command::new("docs")
            .about("Write documentation pages for every species")
            .arg(
                Arg::new(DIRECTORY)
                    .short('o')
                    .long("output-dir")
                    .value_parser(value_parser!(PathBuf))
                    .help("Directory to write one page per species to. Prints to stdout if omitted"),
            ),
    )
}

fn simulate_command(species: &Species) -> Command {
    let mut command = Command::new(format!("{SIMULATE_PREFIX}{}", species.id))
        .visible_alias(format!("{SIM_ALIAS_PREFIX}{}", species.id))
        .about(format!("Run simulations for {}", species.name));

    if !species.genetic_maps().is_empty() {
        let maps: Vec<String> = species.genetic_maps().iter().map(|m| m.id.clone()).collect();
        command = command.arg(
            Arg::new(GENETIC_MAP)
                .short('g')
                .long("genetic-map")
                .value_parser(PossibleValuesParser::new(maps))
                .help("Specify a particular genetic map. Use a flat map by default"),
        );
    }

    let chromosomes: Vec<String> = species
        .genome
        .chromosomes()
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    let default_chromosome = chromosomes.first().cloned().unwrap_or_default();
    let models: Vec<String> = species.models().iter().map(|m| m.id.clone()).collect();

    command
        .arg(
            Arg::new(CHROMOSOME)
                .short('c')
                .long("chromosome")
                .value_parser(PossibleValuesParser::new(chromosomes))
                .default_value(default_chromosome.clone())
                .help(format!("Simulate a specific chromosome. Default={default_chromosome}")),
        )
        .arg(
            Arg::new(LENGTH)
                .short('l')
                .long("length-multiplier")
                .value_parser(value_parser!(f64))
                .default_value(LENGTH_MULTIPLIER.to_string())
                .help("Simulate a chromosome of length l times the named chromosome"),
        )
        .arg(
            Arg::new(MODEL)
                .short('m')
                .long("model")
                .value_parser(PossibleValuesParser::new(models))
                .help("Specify a simulation model. A constant size model is used if omitted"),
        )
        .arg(
            Arg::new(SEED)
                .short('s')
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed. Chosen at random if omitted"),
        )
        .arg(
            Arg::new(SAMPLES)
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(usize))
                .help("Number of samples to draw from each population, in population order"),
        )
        .arg(
            Arg::new(OUTPUT)
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("The file to write the simulated tree sequence to"),
        )
}

/// Options of a `simulate-<species>` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateArgs {
    pub genetic_map: Option<String>,
    pub chromosome: String,
    pub length_multiplier: f64,
    pub model: Option<String>,
    pub seed: Option<u64>,
    pub samples: Vec<usize>,
    pub output: PathBuf,
    pub quiet: bool,
}

impl SimulateArgs {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            // Not every species has a genetic map option.
            genetic_map: matches
                .try_get_one::<String>(GENETIC_MAP)
                .ok()
                .flatten()
                .cloned(),
            chromosome: matches
                .get_one::<String>(CHROMOSOME)
                .cloned()
                .unwrap_or_default(),
            length_multiplier: matches
                .get_one::<f64>(LENGTH)
                .copied()
                .unwrap_or(LENGTH_MULTIPLIER),
            model: matches.get_one::<String>(MODEL).cloned(),
            seed: matches.get_one::<u64>(SEED).copied(),
            samples: matches
                .get_many::<usize>(SAMPLES)
                .map(|values| values.copied().collect())
                .unwrap_or_default(),
            output: matches
                .get_one::<PathBuf>(OUTPUT)
                .cloned()
                .unwrap_or_default(),
            quiet: matches.get_flag(QUIET),
        }
    }
}

/// Output directory of a `docs` invocation.
pub fn docs_directory(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>(DIRECTORY).cloned()
}
