use crate::args::SimulateArgs;
use crate::printing::write_citations;
use crate::provenance::provenance_record;
use anyhow::{Context, Result};
use log::{debug, info};
use popcat_catalog::models::generic;
use popcat_catalog::{Model, Species};
use std::io;
use std::time::Instant;

/// Model used when none is named: a constant population of the species'
/// default size.
pub fn default_model(species: &Species) -> Result<Model> {
    let mut model = generic::constant_size(species.population_size)
        .context("Invalid default population size")?;
    model.citations = species.population_size_citations.clone();
    Ok(model)
}

/// Simulate `species` as described by `args` and write the tree sequence.
pub fn simulate(species: &Species, args: &SimulateArgs, argv: &[String]) -> Result<()> {
    let start = Instant::now();

    let model = match &args.model {
        Some(id) => species.get_model(id)?.clone(),
        None => default_model(species)?,
    };
    model.check_sample_counts(&args.samples)?;
    let samples = model.get_samples(&args.samples);

    let contig = species
        .get_contig(
            &args.chromosome,
            args.genetic_map.as_deref(),
            args.length_multiplier,
        )
        .with_context(|| format!("Failed to resolve chromosome {}", args.chromosome))?;

    info!(
        "Running simulation model {} for {} on {} with {} samples",
        model.name,
        species.name,
        contig,
        samples.len()
    );
    let mut ts = model
        .run_with_seed(&contig, &samples, args.seed)
        .context("Simulation failed")?;
    info!(
        "Simulated {} trees and {} mutations in {:.2?}",
        ts.num_trees(),
        ts.num_mutations(),
        start.elapsed()
    );

    debug!("Updating provenance");
    ts.add_provenance(provenance_record(argv)?)?;
    info!("Writing to {}", args.output.display());
    ts.dump(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if !args.quiet {
        write_citations(&mut io::stdout().lock(), species, &contig, &model)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcat_catalog::{build_registry, CatalogConfig};
    use popcat_engine::TreeSequence;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(output: PathBuf) -> SimulateArgs {
        SimulateArgs {
            genetic_map: None,
            chromosome: "chr4".to_string(),
            length_multiplier: 1e-4,
            model: None,
            seed: Some(3),
            samples: vec![3],
            output,
            quiet: true,
        }
    }

    #[test]
    fn test_default_model_cites_population_size() {
        let registry = build_registry(&CatalogConfig::new("/nonexistent/popcat")).unwrap();
        let species = registry.get_species("dromel").unwrap();
        let model = default_model(species).unwrap();
        assert_eq!(model.id, "constant");
        assert_eq!(
            model.population_configurations[0].initial_size,
            Some(species.population_size)
        );
        assert_eq!(model.citations, species.population_size_citations);
    }

    #[test]
    fn test_simulate_writes_provenance() {
        let registry = build_registry(&CatalogConfig::new("/nonexistent/popcat")).unwrap();
        let species = registry.get_species("dromel").unwrap();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.json");
        let argv = vec!["popcat".to_string(), "simulate-dromel".to_string()];

        simulate(species, &args(output.clone()), &argv).unwrap();

        let ts = TreeSequence::load(&output).unwrap();
        assert_eq!(ts.num_samples(), 3);
        let last = &ts.provenances().last().unwrap().record;
        assert_eq!(last["software"]["name"], "popcat");
        assert_eq!(last["parameters"]["args"][0], "simulate-dromel");
    }

    #[test]
    fn test_too_many_sample_groups() {
        let registry = build_registry(&CatalogConfig::new("/nonexistent/popcat")).unwrap();
        let species = registry.get_species("dromel").unwrap();
        let dir = tempdir().unwrap();
        let mut args = args(dir.path().join("out.json"));
        args.samples = vec![2, 2];
        let err = simulate(species, &args, &[]).unwrap_err();
        assert!(err.to_string().contains("got 2 sample counts"));
        assert!(!dir.path().join("out.json").exists());
    }
}
