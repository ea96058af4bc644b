//! Shared default values for the command line.

pub const BIN_NAME: &str = "popcat";

/// Prefix of the per-species simulation subcommands.
pub const SIMULATE_PREFIX: &str = "simulate-";
/// Prefix of the short aliases of the simulation subcommands.
pub const SIM_ALIAS_PREFIX: &str = "sim-";

pub const LENGTH_MULTIPLIER: f64 = 1.0;

/// Name of the software recorded in output provenance.
pub const SOFTWARE_NAME: &str = "popcat";
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
