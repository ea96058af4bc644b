use popcat_catalog::Registry;
use std::io::{self, Write};

/// Write an overview of every species in `registry`.
pub fn write_catalog(out: &mut impl Write, registry: &Registry) -> io::Result<()> {
    for species in registry.all_species() {
        writeln!(out, "{} ({})", species.id, species.name)?;
        writeln!(
            out,
            "  Generation time: {} years, default population size: {}",
            species.generation_time, species.population_size
        )?;

        let chromosomes: Vec<&str> = species.genome.chromosomes().iter().map(|c| c.id()).collect();
        writeln!(out, "  Chromosomes: {}", chromosomes.join(", "))?;

        if !species.genetic_maps().is_empty() {
            writeln!(out, "  Genetic maps:")?;
            for map in species.genetic_maps() {
                let status = if map.is_cached() { "cached" } else { "not cached" };
                writeln!(out, "    • {} ({status})", map.id)?;
            }
        }

        writeln!(out, "  Models:")?;
        for model in species.models() {
            writeln!(out, "    • {}: {}", model.id, model.name)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn list_catalog(registry: &Registry) -> io::Result<()> {
    write_catalog(&mut io::stdout().lock(), registry)
}
