//! # Engine Crate
//!
//! The `engine` crate is a small coalescent simulator. It takes population
//! configurations, a migration matrix, demographic events, samples and a
//! recombination map, and produces a [`TreeSequence`] describing the genealogy of
//! the samples, with neutral mutations and provenance records attached.

pub mod debugger;
pub mod demography;
pub mod errors;
mod overlap;
pub mod prelude;
pub mod provenance;
pub mod recombination_map;
pub mod simulator;
pub mod tree_sequence;

pub use debugger::DemographyDebugger;
pub use demography::{DemographicEvent, PopulationConfiguration, Sample};
pub use errors::{EngineError, Result};
pub use recombination_map::RecombinationMap;
pub use simulator::Simulator;
pub use tree_sequence::TreeSequence;
