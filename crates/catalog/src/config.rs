//! Catalog configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the genetic map cache directory.
pub const CACHE_DIR_ENV: &str = "POPCAT_CACHE_DIR";

/// Directory name used below `$HOME/.cache`.
const CACHE_DIR_NAME: &str = "popcat";

/// Fallback cache directory when no home directory is known.
const LOCAL_CACHE_DIR: &str = ".popcat_cache";

/// Settings shared by every catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root directory of downloaded genetic maps
    pub cache_dir: PathBuf,
}

impl CatalogConfig {
    /// Configuration using `cache_dir` as the genetic map cache.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Configuration from the environment.
    ///
    /// Uses `POPCAT_CACHE_DIR` when set, else `$HOME/.cache/popcat`, else
    /// `./.popcat_cache`.
    pub fn from_env() -> Self {
        let cache_dir = std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .filter(|v| !v.is_empty())
                    .map(|home| PathBuf::from(home).join(".cache").join(CACHE_DIR_NAME))
            })
            .unwrap_or_else(|| PathBuf::from(LOCAL_CACHE_DIR));
        Self { cache_dir }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
