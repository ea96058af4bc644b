use serde::{Deserialize, Serialize};
use std::fmt;

/// A publication that a catalog entry is taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub author: String,
    pub year: u16,
    pub doi: String,
}

impl Citation {
    pub fn new(author: impl Into<String>, year: u16, doi: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            year,
            doi: doi.into(),
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.author, self.year, self.doi)
    }
}
