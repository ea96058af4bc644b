//! Integration tests for resolving catalog entries and simulating them.

use popcat::catalog::models::generic;
use popcat::catalog::{Chromosome, Genome, Tolerance};
use popcat::prelude::*;

fn registry() -> Registry {
    build_registry(&CatalogConfig::new("/nonexistent/popcat")).unwrap()
}

fn test_species() -> Species {
    let genome = Genome::new(vec![Chromosome::new("chr1", 1000, 1e-8, 1e-8).unwrap()]).unwrap();
    let mut species = Species::new("testsp", "Test species", genome, 1.0, 1000.0);
    species.add_model(generic::constant_size(1000.0).unwrap());
    species
}

#[test]
fn test_end_to_end_constant_size() {
    let species = test_species();
    let contig = species.get_contig("chr1", None, 1.0).unwrap();
    let model = species.get_model("constant").unwrap();
    let samples = model.get_samples(&[4]);

    let ts = model.run(&contig, &samples).unwrap();
    assert_eq!(ts.num_samples(), 4);
    assert_eq!(ts.sequence_length(), 1000.0);
    assert!(ts.max_root_time() > 0.0);
    assert_eq!(ts.provenances().len(), 1);
}

#[test]
fn test_registry_overwrite() {
    let mut registry = registry();
    let before = registry.len();
    let mut replacement = test_species();
    replacement.id = "dromel".to_string();
    registry.register_species(replacement);

    assert_eq!(registry.len(), before);
    assert_eq!(registry.get_species("dromel").unwrap().name, "Test species");
    assert!(matches!(
        registry.get_species("unknown"),
        Err(CatalogError::NotFound { .. })
    ));
}

#[test]
fn test_genome_weighted_mean_rate() {
    let genome = Genome::new(vec![
        Chromosome::new("a", 10, 0.0, 1e-8).unwrap(),
        Chromosome::new("b", 30, 0.0, 3e-8).unwrap(),
    ])
    .unwrap();
    let expected = (10.0 * 1e-8 + 30.0 * 3e-8) / 40.0;
    assert!((genome.mean_mutation_rate() - expected).abs() < 1e-20);
}

#[test]
fn test_samples_skip_empty_populations() {
    let model = Model::builder("three", "Three populations")
        .population(Population::new("a", "A"), PopulationConfiguration::new(100.0))
        .population(Population::new("b", "B"), PopulationConfiguration::new(100.0))
        .population(Population::new("c", "C"), PopulationConfiguration::new(100.0))
        .build()
        .unwrap();
    let populations: Vec<usize> = model
        .get_samples(&[2, 0, 3])
        .iter()
        .map(|s| s.population)
        .collect();
    assert_eq!(populations, vec![0, 0, 2, 2, 2]);
    assert!(model.get_samples(&[2, 0, 3]).iter().all(|s| s.time == 0.0));
}

#[test]
fn test_every_catalog_model_is_self_equal() {
    let registry = registry();
    for model in registry.all_models() {
        assert!(
            model.equals(model, &Tolerance::default()).unwrap(),
            "{} differs from itself",
            model.id
        );
    }
}

#[test]
fn test_sample_size_override_is_invalid() {
    let model = generic::constant_size(100.0).unwrap();
    let mut other = model.clone();
    other.population_configurations[0].sample_size = Some(2);
    assert!(matches!(
        model.verify_equal(&other, &Tolerance::default()),
        Err(EquivalenceError::InvalidModel(_))
    ));
}

#[test]
fn test_species_model_on_catalog_contig() {
    let registry = registry();
    let species = registry.get_species("aratha").unwrap();
    let contig = species.get_contig("chr5", None, 1e-5).unwrap();
    let model = species.get_model("msmc").unwrap();
    model.check_sample_counts(&[3]).unwrap();
    assert!(model.check_sample_counts(&[3, 1]).is_err());

    let ts = model
        .run_with_seed(&contig, &model.get_samples(&[3]), Some(17))
        .unwrap();
    assert_eq!(ts.num_samples(), 3);
    assert_eq!(ts.sequence_length(), contig.recombination_map.sequence_length());
}
