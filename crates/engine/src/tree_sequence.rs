//! Simulation output: the genealogy of the samples as a set of tables.
//!
//! Nodes are genomes at a point in time (samples first), edges record that a
//! parent node is the ancestor of a child node on an interval of the sequence,
//! sites and mutations carry the neutral variation thrown onto the edges.

use crate::errors::Result;
use crate::provenance::{validate_provenance, Provenance};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// A genome in the genealogy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Generations before the present
    pub time: f64,
    /// Population the genome lived in
    pub population: usize,
    /// Whether this node is one of the requested samples
    pub is_sample: bool,
}

/// Parent-child relationship on `[left, right)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub left: f64,
    pub right: f64,
    pub parent: usize,
    pub child: usize,
}

/// A position carrying a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub position: f64,
    pub ancestral_state: String,
}

/// A state change at a site, inherited by every sample below `node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub site: usize,
    pub node: usize,
    pub derived_state: String,
}

/// Population table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub metadata: Option<Value>,
}

/// The complete result of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSequence {
    pub sequence_length: f64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub sites: Vec<Site>,
    pub mutations: Vec<Mutation>,
    pub populations: Vec<PopulationRecord>,
    pub provenances: Vec<Provenance>,
}

impl TreeSequence {
    /// Number of sample nodes.
    pub fn num_samples(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_sample).count()
    }

    /// Ids of the sample nodes.
    pub fn samples(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_sample)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn num_mutations(&self) -> usize {
        self.mutations.len()
    }

    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    pub fn sequence_length(&self) -> f64 {
        self.sequence_length
    }

    /// Positions where the marginal tree changes, including both ends.
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self
            .edges
            .iter()
            .flat_map(|e| [e.left, e.right])
            .chain([0.0, self.sequence_length])
            .collect();
        points.sort_by(f64::total_cmp);
        points.dedup();
        points
    }

    /// Number of distinct marginal trees along the sequence.
    pub fn num_trees(&self) -> usize {
        self.breakpoints().len().saturating_sub(1).max(1)
    }

    /// Time of the oldest node.
    pub fn max_root_time(&self) -> f64 {
        self.nodes.iter().map(|n| n.time).fold(0.0, f64::max)
    }

    /// Provenance records, oldest first.
    pub fn provenances(&self) -> &[Provenance] {
        &self.provenances
    }

    /// Validate `record` and append it as the newest provenance entry.
    pub fn add_provenance(&mut self, record: Value) -> Result<()> {
        validate_provenance(&record)?;
        self.provenances.push(Provenance::now(record));
        Ok(())
    }

    /// Write the tree sequence as JSON.
    pub fn write_to(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Write the tree sequence to a file.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a tree sequence written by [`TreeSequence::dump`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cherry() -> TreeSequence {
        TreeSequence {
            sequence_length: 100.0,
            nodes: vec![
                Node { time: 0.0, population: 0, is_sample: true },
                Node { time: 0.0, population: 0, is_sample: true },
                Node { time: 5.0, population: 0, is_sample: false },
                Node { time: 9.0, population: 0, is_sample: false },
            ],
            edges: vec![
                Edge { left: 0.0, right: 40.0, parent: 2, child: 0 },
                Edge { left: 0.0, right: 40.0, parent: 2, child: 1 },
                Edge { left: 40.0, right: 100.0, parent: 3, child: 0 },
                Edge { left: 40.0, right: 100.0, parent: 3, child: 1 },
            ],
            sites: vec![],
            mutations: vec![],
            populations: vec![PopulationRecord::default()],
            provenances: vec![],
        }
    }

    #[test]
    fn test_counts() {
        let ts = cherry();
        assert_eq!(ts.num_samples(), 2);
        assert_eq!(ts.samples(), vec![0, 1]);
        assert_eq!(ts.num_trees(), 2);
        assert_eq!(ts.breakpoints(), vec![0.0, 40.0, 100.0]);
        assert_eq!(ts.max_root_time(), 9.0);
    }

    #[test]
    fn test_add_provenance_validates() {
        let mut ts = cherry();
        assert!(ts.add_provenance(json!({"schema_version": "1.0.0"})).is_err());
        let record = json!({
            "schema_version": "1.0.0",
            "software": {"name": "x", "version": "1"},
            "parameters": {},
            "environment": {}
        });
        ts.add_provenance(record.clone()).unwrap();
        assert_eq!(ts.provenances().len(), 1);
        assert_eq!(ts.provenances()[0].record, record);
    }

    #[test]
    fn test_dump_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.trees");
        let ts = cherry();
        ts.dump(&path).unwrap();
        let loaded = TreeSequence::load(&path).unwrap();
        assert_eq!(loaded, ts);
    }
}
