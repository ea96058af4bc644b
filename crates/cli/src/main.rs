mod args;
mod commands;
pub mod defaults;
mod logging;
mod printing;
mod provenance;

use anyhow::{bail, Context, Result};
use popcat_catalog::{build_registry, CatalogConfig};

use args::{SimulateArgs, VERBOSITY};
use commands::{docs, list, simulate};
use defaults::SIMULATE_PREFIX;

fn main() -> Result<()> {
    let config = CatalogConfig::from_env();
    let registry = build_registry(&config).context("Failed to load the species catalog")?;

    let argv: Vec<String> = std::env::args().collect();
    let matches = args::build_cli(&registry).get_matches_from(&argv);
    let Some((name, sub)) = matches.subcommand() else {
        bail!("No subcommand given");
    };
    logging::init(sub.get_count(VERBOSITY));

    match name {
        "list" => list::list_catalog(&registry)?,
        "docs" => docs::write_docs(&registry, args::docs_directory(sub).as_deref())?,
        _ => {
            let Some(species_id) = name.strip_prefix(SIMULATE_PREFIX) else {
                bail!("Unknown subcommand {name}");
            };
            let species = registry.get_species(species_id)?;
            simulate::simulate(species, &SimulateArgs::from_matches(sub), &argv)?;
        }
    }

    Ok(())
}
