//! Provenance records attached to simulation output.
//!
//! A provenance record is a JSON document describing how an output file was
//! produced. Every record must carry a `schema_version` string, a `software`
//! object with `name` and `version` strings, a `parameters` object and an
//! `environment` object. Records are stored in a tree sequence together with the
//! time they were created.

use crate::errors::{EngineError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Version of the provenance document layout.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Name this crate reports in its own provenance records.
pub const ENGINE_NAME: &str = "popcat-engine";

/// Version this crate reports in its own provenance records.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One timestamped provenance entry in a tree sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// RFC 3339 creation time
    pub timestamp: String,
    /// The provenance document
    pub record: Value,
}

impl Provenance {
    /// Wrap `record` with the current time.
    pub fn now(record: Value) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            record,
        }
    }
}

/// Name and version of the program that wrote a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Software {
    pub name: String,
    pub version: String,
}

/// A provenance document before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub schema_version: String,
    pub software: Software,
    pub parameters: Value,
    pub environment: Value,
}

impl ProvenanceRecord {
    /// Record for `software` at the current schema version.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            software: Software {
                name: name.into(),
                version: version.into(),
            },
            parameters: Value::Object(Map::new()),
            environment: environment(Value::Object(Map::new())),
        }
    }

    /// Set the parameters object.
    pub fn parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the environment object.
    pub fn environment(mut self, environment: Value) -> Self {
        self.environment = environment;
        self
    }

    /// Convert to a JSON value, checking it against the schema.
    pub fn to_value(&self) -> Result<Value> {
        let value = serde_json::to_value(self)?;
        validate_provenance(&value)?;
        Ok(value)
    }
}

/// Describe the running operating system together with `libraries`.
pub fn environment(libraries: Value) -> Value {
    json!({
        "os": {
            "system": std::env::consts::OS,
            "machine": std::env::consts::ARCH,
            "family": std::env::consts::FAMILY,
        },
        "libraries": libraries,
    })
}

/// Check that `record` has the shape of a provenance document.
///
/// # Errors
/// Returns [`EngineError::Provenance`] naming the first missing or mistyped field.
pub fn validate_provenance(record: &Value) -> Result<()> {
    let object = record
        .as_object()
        .ok_or_else(|| EngineError::Provenance("record must be a JSON object".into()))?;

    match object.get("schema_version") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(EngineError::Provenance(
                "schema_version must be a string".into(),
            ))
        }
        None => return Err(EngineError::Provenance("missing schema_version".into())),
    }

    let software = object
        .get("software")
        .and_then(Value::as_object)
        .ok_or_else(|| EngineError::Provenance("software must be an object".into()))?;
    for key in ["name", "version"] {
        if !software.get(key).is_some_and(Value::is_string) {
            return Err(EngineError::Provenance(format!(
                "software.{key} must be a string"
            )));
        }
    }

    for key in ["parameters", "environment"] {
        if !object.get(key).is_some_and(Value::is_object) {
            return Err(EngineError::Provenance(format!("{key} must be an object")));
        }
    }
    Ok(())
}
