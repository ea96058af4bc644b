//! Provenance record describing a command line invocation.

use crate::defaults::{SOFTWARE_NAME, SOFTWARE_VERSION};
use anyhow::{Context, Result};
use popcat_engine::provenance::{environment, ProvenanceRecord, ENGINE_NAME, ENGINE_VERSION};
use serde_json::{json, Value};

/// Versions of the libraries that produced the output.
fn libraries() -> Value {
    json!({
        (ENGINE_NAME): { "version": ENGINE_VERSION },
        "popcat-catalog": { "version": popcat_catalog::VERSION },
    })
}

/// Provenance record for the invocation `argv`, program name first.
pub fn provenance_record(argv: &[String]) -> Result<Value> {
    let (command, args) = match argv.split_first() {
        Some((command, args)) => (command.as_str(), args),
        None => (SOFTWARE_NAME, &[][..]),
    };
    ProvenanceRecord::new(SOFTWARE_NAME, SOFTWARE_VERSION)
        .parameters(json!({ "command": command, "args": args }))
        .environment(environment(libraries()))
        .to_value()
        .context("Invalid provenance record")
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcat_engine::provenance::validate_provenance;

    #[test]
    fn test_provenance_record() {
        let argv: Vec<String> = ["popcat", "simulate-dromel", "2", "out.json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let record = provenance_record(&argv).unwrap();
        validate_provenance(&record).unwrap();
        assert_eq!(record["schema_version"], "1.0.0");
        assert_eq!(record["software"]["name"], "popcat");
        assert_eq!(record["parameters"]["command"], "popcat");
        assert_eq!(
            record["parameters"]["args"],
            json!(["simulate-dromel", "2", "out.json"])
        );
        assert!(record["environment"]["os"]["system"].is_string());
        assert!(record["environment"]["libraries"]["popcat-engine"]["version"].is_string());
        assert!(record["environment"]["libraries"]["popcat-catalog"]["version"].is_string());
    }

    #[test]
    fn test_empty_argv() {
        let record = provenance_record(&[]).unwrap();
        assert_eq!(record["parameters"]["command"], "popcat");
        assert_eq!(record["parameters"]["args"], json!([]));
    }
}
