//! Integration tests for the coalescent simulator.

use popcat_engine::prelude::*;
use popcat_engine::provenance::validate_provenance;

fn two_population_split() -> Simulator {
    Simulator::new()
        .population_configurations(vec![
            PopulationConfiguration::new(500.0),
            PopulationConfiguration::new(200.0),
        ])
        .demographic_events(vec![
            DemographicEvent::size_change(50.0, 1, 100.0),
            DemographicEvent::split(300.0, 1, 0),
        ])
        .samples(vec![
            Sample::new(0, 0.0),
            Sample::new(0, 0.0),
            Sample::new(1, 0.0),
            Sample::new(1, 0.0),
        ])
        .recombination_map(RecombinationMap::uniform(5e4, 1e-8).unwrap())
        .mutation_rate(1e-8)
}

#[test]
fn test_split_model_completes() {
    let ts = two_population_split().seed(21).run().unwrap();
    assert_eq!(ts.num_samples(), 4);
    assert_eq!(ts.num_populations(), 2);
    assert_eq!(ts.sequence_length(), 5e4);
    // Population 1 only joins population 0 at the split
    assert!(ts.max_root_time() >= 300.0);
}

#[test]
fn test_same_seed_same_genealogy() {
    let a = two_population_split().seed(99).run().unwrap();
    let b = two_population_split().seed(99).run().unwrap();
    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.edges, b.edges);
    assert_eq!(a.mutations, b.mutations);
}

#[test]
fn test_every_position_reaches_a_root() {
    let ts = two_population_split().seed(5).run().unwrap();
    // On each marginal tree every sample has exactly one parent edge
    let breakpoints = ts.breakpoints();
    for w in breakpoints.windows(2) {
        let mid = (w[0] + w[1]) / 2.0;
        for sample in ts.samples() {
            let parents = ts
                .edges
                .iter()
                .filter(|e| e.child == sample && e.left <= mid && mid < e.right)
                .count();
            assert_eq!(parents, 1, "sample {sample} at {mid}");
        }
    }
}

#[test]
fn test_engine_provenance_is_valid() {
    let ts = two_population_split().seed(1).run().unwrap();
    let record = &ts.provenances()[0].record;
    validate_provenance(record).unwrap();
    assert_eq!(record["software"]["name"], "popcat-engine");
    assert_eq!(record["parameters"]["random_seed"], 1);
}

#[test]
fn test_round_trip_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sim.trees");
    let ts = two_population_split().seed(8).run().unwrap();
    ts.dump(&path).unwrap();
    let loaded = TreeSequence::load(&path).unwrap();
    assert_eq!(loaded.num_samples(), 4);
    assert_eq!(loaded.num_trees(), ts.num_trees());
}

#[test]
fn test_population_metadata_is_kept() {
    let ts = Simulator::new()
        .population_configurations(vec![PopulationConfiguration::new(100.0)
            .with_metadata(serde_json::json!({"name": "pop0", "description": "test"}))])
        .samples(vec![Sample::new(0, 0.0); 2])
        .recombination_map(RecombinationMap::uniform(100.0, 0.0).unwrap())
        .seed(2)
        .run()
        .unwrap();
    let metadata = ts.populations[0].metadata.as_ref().unwrap();
    assert_eq!(metadata["name"], "pop0");
}
