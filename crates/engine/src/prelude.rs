//! Commonly used imports for convenience.
//!
//! # Example
//!
//! ```
//! use popcat_engine::prelude::*;
//!
//! let map = RecombinationMap::uniform(100.0, 1e-8).unwrap();
//! assert_eq!(map.sequence_length(), 100.0);
//! ```

pub use crate::debugger::DemographyDebugger;
pub use crate::demography::{DemographicEvent, PopulationConfiguration, Sample};
pub use crate::errors::{EngineError, Result};
pub use crate::recombination_map::RecombinationMap;
pub use crate::simulator::Simulator;
pub use crate::tree_sequence::TreeSequence;
