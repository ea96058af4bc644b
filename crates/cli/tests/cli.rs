use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn popcat() -> Command {
    let mut cmd = Command::cargo_bin("popcat").unwrap();
    cmd.env("POPCAT_CACHE_DIR", "/nonexistent/popcat");
    cmd
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help_lists_species() {
    popcat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate-esccol"))
        .stdout(predicate::str::contains("simulate-dromel"))
        .stdout(predicate::str::contains("simulate-aratha"));
}

#[test]
fn test_version() {
    popcat()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_arguments_fails() {
    popcat().assert().failure();
}

#[test]
fn test_simulate_writes_tree_sequence() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("out.json");

    popcat()
        .arg("simulate-dromel")
        .arg("-c")
        .arg("chr4")
        .arg("-l")
        .arg("1e-4")
        .arg("-s")
        .arg("11")
        .arg("4")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation engine:"))
        .stdout(predicate::str::contains("Li et al. 2006"));

    let ts = read_json(&output);
    let samples = ts["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|node| node["is_sample"] == true)
        .count();
    assert_eq!(samples, 4);

    let last = &ts["provenances"].as_array().unwrap().last().unwrap()["record"];
    assert_eq!(last["schema_version"], "1.0.0");
    assert_eq!(last["software"]["name"], "popcat");
    let args: Vec<&str> = last["parameters"]["args"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a.as_str().unwrap())
        .collect();
    assert_eq!(
        &args[..8],
        &["simulate-dromel", "-c", "chr4", "-l", "1e-4", "-s", "11", "4"]
    );
    assert!(last["environment"]["libraries"]["popcat-engine"].is_object());
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let temp = tempdir().unwrap();
    let run = |name: &str| {
        let output = temp.path().join(name);
        popcat()
            .args(["-q", "sim-dromel", "-c", "chr4", "-l", "1e-4", "-s", "5", "3"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
        let mut ts = read_json(&output);
        ts.as_object_mut().unwrap().remove("provenances");
        ts
    };
    assert_eq!(run("a.json"), run("b.json"));
}

#[test]
fn test_named_model_with_two_populations() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("ooa.json");

    popcat()
        .args(["-q", "simulate-dromel", "-m", "ooa_2", "-c", "chr4", "-l", "1e-4", "-s", "2"])
        .args(["2", "3"])
        .arg(&output)
        .assert()
        .success();

    let ts = read_json(&output);
    let populations: Vec<u64> = ts["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|node| node["is_sample"] == true)
        .map(|node| node["population"].as_u64().unwrap())
        .collect();
    assert_eq!(populations, vec![0, 0, 1, 1, 1]);
}

#[test]
fn test_too_many_sample_groups() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("out.json");

    popcat()
        .args(["simulate-dromel", "-c", "chr4", "-l", "1e-4", "2", "2", "2"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("got 3 sample counts"));

    assert!(!output.exists());
}

#[test]
fn test_genetic_map_choice_is_checked() {
    popcat()
        .args(["simulate-dromel", "-g", "NoSuchMap", "2", "out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NoSuchMap"));
}

#[test]
fn test_uncached_genetic_map_fails() {
    let temp = tempdir().unwrap();
    let output = temp.path().join("out.json");

    popcat()
        .args(["simulate-dromel", "-g", "Comeron2012_dm6", "-c", "chr4", "2"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not cached"));
}

#[test]
fn test_list() {
    popcat()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("dromel (Drosophila melanogaster)"))
        .stdout(predicate::str::contains("three_epoch"))
        .stdout(predicate::str::contains("Salome2012"));
}

#[test]
fn test_docs_to_directory() {
    let temp = tempdir().unwrap();
    let target = temp.path().join("pages");

    popcat()
        .args(["docs", "-o"])
        .arg(&target)
        .assert()
        .success();

    let page = fs::read_to_string(target.join("aratha.rst")).unwrap();
    assert!(page.starts_with("Arabidopsis thaliana\n"));
    assert!(page.contains("msmc"));
}

#[test]
fn test_docs_to_stdout() {
    popcat()
        .arg("docs")
        .assert()
        .success()
        .stdout(predicate::str::contains(":ID: ``esccol``"));
}
