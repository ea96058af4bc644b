//! Integration tests for catalog lookups and contig resolution.

use popcat_catalog::prelude::*;
use std::fs;

fn registry_with_cache(cache: &std::path::Path) -> Registry {
    build_registry(&CatalogConfig::new(cache)).unwrap()
}

#[test]
fn test_lookup_errors() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    assert!(matches!(
        registry.get_species("homsap"),
        Err(CatalogError::NotFound { kind: "Species", .. })
    ));
    let dromel = registry.get_species("dromel").unwrap();
    assert!(matches!(
        dromel.get_model("unknown"),
        Err(CatalogError::NotFound { .. })
    ));
}

#[test]
fn test_flat_contig_with_multiplier() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let dromel = registry.get_species("dromel").unwrap();
    let contig = dromel.get_contig("chrX", None, 2.0).unwrap();
    assert_eq!(
        contig.recombination_map.sequence_length(),
        2.0 * 23_542_271.0
    );
    assert!((contig.recombination_map.mean_recombination_rate() - 8.4e-9).abs() < 1e-20);
    assert_eq!(contig.mutation_rate, 8.4e-9);
}

#[test]
fn test_genetic_map_with_multiplier_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let dromel = registry.get_species("dromel").unwrap();
    assert!(matches!(
        dromel.get_contig("chr2L", Some("Comeron2012_dm6"), 0.5),
        Err(CatalogError::InvalidArgument(_))
    ));
}

#[test]
fn test_cached_genetic_map() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let aratha = registry.get_species("aratha").unwrap();

    assert!(matches!(
        aratha.get_contig("chr1", Some("Salome2012"), 1.0),
        Err(CatalogError::GeneticMapNotCached { .. })
    ));

    let map_dir = dir.path().join("aratha").join("Salome2012");
    fs::create_dir_all(&map_dir).unwrap();
    fs::write(
        map_dir.join("arab_chr1_map_loess.txt"),
        "Chromosome\tPosition(bp)\tRate(cM/Mb)\tMap(cM)\n\
         chr1\t1000\t5.0\t0.0\n\
         chr1\t30427671\t0.0\t152.0\n",
    )
    .unwrap();

    let contig = aratha.get_contig("chr1", Some("Salome2012"), 1.0).unwrap();
    assert_eq!(contig.genetic_map.as_deref(), Some("Salome2012"));
    assert_eq!(contig.recombination_map.positions()[0], 0.0);
    assert_eq!(contig.recombination_map.rates()[0], 0.0);
    assert!((contig.recombination_map.rates()[1] - 5e-8).abs() < 1e-20);
    assert_eq!(contig.mutation_rate, 7e-9);

    // Chromosome without a file in the cached map
    let contig = aratha.get_contig("chr2", Some("Salome2012"), 1.0).unwrap();
    assert_eq!(contig.recombination_map.sequence_length(), 19_698_289.0);
    assert_eq!(contig.recombination_map.mean_recombination_rate(), 0.0);
}

#[test]
fn test_all_genetic_maps() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let ids: Vec<&str> = registry.all_genetic_maps().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["Comeron2012_dm6", "Salome2012"]);
    for map in registry.all_genetic_maps() {
        assert!(map.file_pattern.contains("{name}"));
        assert!(map.map_cache_dir().starts_with(dir.path()));
    }
}

#[test]
fn test_catalog_models_differ_from_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let models: Vec<&Model> = registry.all_models().collect();
    for (i, a) in models.iter().enumerate() {
        for (j, b) in models.iter().enumerate() {
            let equal = a.equals(b, &Tolerance::default()).unwrap();
            assert_eq!(equal, i == j, "{} vs {}", a.id, b.id);
        }
    }
}

#[test]
fn test_run_catalog_model_on_short_contig() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with_cache(dir.path());
    let dromel = registry.get_species("dromel").unwrap();
    let model = dromel.get_model("ooa_2").unwrap();
    let contig = dromel.get_contig("chr4", None, 1e-4).unwrap();
    model.check_sample_counts(&[2, 2]).unwrap();
    let samples = model.get_samples(&[2, 2]);
    let ts = model.run_with_seed(&contig, &samples, Some(12)).unwrap();
    assert_eq!(ts.num_samples(), 4);
    assert_eq!(ts.populations.len(), 2);
    assert_eq!(
        ts.populations[1].metadata.as_ref().unwrap()["name"],
        "EU_dmel"
    );
}
