use std::path::PathBuf;
use thiserror::Error;

/// Error type for simulation engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A simulation input was out of range or inconsistent.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Lineages remain but no event can ever happen to them.
    #[error("Infinite waiting time at generation {time}: {lineages} lineages can never coalesce")]
    InfiniteWaitingTime { time: f64, lineages: usize },

    /// A line of an input file could not be parsed.
    #[error("Parse error in {}, line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A provenance record does not follow the provenance schema.
    #[error("Invalid provenance record: {0}")]
    Provenance(String),

    /// A random distribution could not be constructed.
    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
