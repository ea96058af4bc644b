use anyhow::{Context, Result};
use log::info;
use popcat_catalog::docs::{species_docs, species_file_name};
use popcat_catalog::Registry;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Write one documentation page per species into `directory`, or all pages
/// to stdout when no directory is given.
pub fn write_docs(registry: &Registry, directory: Option<&Path>) -> Result<()> {
    match directory {
        Some(directory) => {
            fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create {}", directory.display()))?;
            for species in registry.all_species() {
                let path = directory.join(species_file_name(species));
                info!("Writing {}", path.display());
                fs::write(&path, species_docs(species)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        None => {
            let mut out = io::stdout().lock();
            for species in registry.all_species() {
                writeln!(out, "{}", species_docs(species)?)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use popcat_catalog::{build_registry, CatalogConfig};
    use tempfile::tempdir;

    #[test]
    fn test_write_docs_to_directory() {
        let registry = build_registry(&CatalogConfig::new("/nonexistent/popcat")).unwrap();
        let dir = tempdir().unwrap();
        let target = dir.path().join("docs");
        write_docs(&registry, Some(&target)).unwrap();

        for id in ["esccol", "dromel", "aratha"] {
            assert!(target.join(format!("{id}.rst")).exists());
        }
        let page = fs::read_to_string(target.join("dromel.rst")).unwrap();
        assert!(page.contains(":ID: ``dromel``"));
        assert!(page.contains("Comeron2012_dm6"));
    }
}
