use popcat_engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for catalog lookups and model construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A species, chromosome, model or genetic map id is not registered.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A model breaks a structural invariant.
    #[error(transparent)]
    InvalidModel(#[from] InvalidModel),

    /// An argument combination is not supported.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The files of a genetic map have not been downloaded.
    #[error("Genetic map '{id}' is not cached in {}; download it from {url}", path.display())]
    GeneticMapNotCached {
        id: String,
        url: String,
        path: PathBuf,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

impl CatalogError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// A model that cannot be simulated or compared as built.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid model: {0}")]
pub struct InvalidModel(pub String);

/// Reason two models were found to differ.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnequalModels {
    /// Dimensions of a matrix differ.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Two lists have different lengths.
    #[error("Count mismatch: {0}")]
    CountMismatch(String),

    /// Two values differ beyond tolerance.
    #[error("Value mismatch: {0}")]
    ValueMismatch(String),

    /// Two events have different kinds or parameters.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),
}

/// Outcome of a failed model comparison.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquivalenceError {
    #[error(transparent)]
    InvalidModel(#[from] InvalidModel),

    #[error(transparent)]
    Unequal(#[from] UnequalModels),
}

/// Result alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
