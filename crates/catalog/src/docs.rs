//! Documentation generated from catalog metadata.
//!
//! The text is reStructuredText built from the same fields the CLI shows, so the
//! docs never drift from the catalog. Nothing here changes a catalog entry.

use crate::errors::Result;
use crate::models::Model;
use crate::species::Species;
use std::fmt::Write as _;

/// Collapse every run of whitespace, including newlines, into one space.
pub fn cleanup(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn underline(title: &str, c: char) -> String {
    format!("{title}\n{}\n", c.to_string().repeat(title.chars().count()))
}

/// Documentation of `model` as simulated for `species_id`.
pub fn model_docs(model: &Model, species_id: &str) -> Result<String> {
    let mut history = Vec::new();
    model.debug(&mut history)?;
    let history = String::from_utf8_lossy(&history);

    let mut doc = String::new();
    writeln!(doc, "Name:\n    {}\n", cleanup(&model.name))?;
    writeln!(doc, "Description:\n    {}\n", cleanup(&model.description))?;
    writeln!(doc, "Populations:")?;
    for (index, population) in model.populations.iter().enumerate() {
        let sampling = if population.allow_samples {
            ""
        } else {
            " (no samples)"
        };
        writeln!(
            doc,
            "    - {index}: {}: {}{sampling}",
            population.id,
            cleanup(&population.description)
        )?;
    }
    writeln!(
        doc,
        "\nCLI help:\n    popcat simulate-{species_id} -m {} -h\n",
        model.id
    )?;
    writeln!(doc, "Citations:")?;
    for citation in &model.citations {
        writeln!(doc, "    - {citation}")?;
    }
    if let Some(years) = model.generation_time {
        writeln!(doc, "\nGeneration time:\n    {years} years")?;
    }
    writeln!(doc, "\nDemographic history:\n\n.. code-block:: none\n")?;
    writeln!(doc, "{}", indent(&history, "    "))?;
    Ok(doc)
}

/// Documentation page of `species` with its genome, maps and models.
pub fn species_docs(species: &Species) -> Result<String> {
    let mut doc = String::new();
    writeln!(doc, "{}", underline(&species.name, '='))?;
    writeln!(doc, ":ID: ``{}``", species.id)?;
    writeln!(doc, ":Generation time: {} years", species.generation_time)?;
    write!(doc, ":Default population size: {}", species.population_size)?;
    if species.population_size_citations.is_empty() {
        writeln!(doc)?;
    } else {
        let cited: Vec<String> = species
            .population_size_citations
            .iter()
            .map(ToString::to_string)
            .collect();
        writeln!(doc, " ({})", cited.join("; "))?;
    }
    writeln!(doc)?;

    writeln!(doc, "{}", underline("Genome", '-'))?;
    writeln!(doc, ".. csv-table::")?;
    writeln!(
        doc,
        "    :header: \"ID\", \"Length\", \"Recombination rate\", \"Mutation rate\"\n"
    )?;
    for chromosome in species.genome.chromosomes() {
        writeln!(
            doc,
            "    {}, {}, {:e}, {:e}",
            chromosome.id(),
            chromosome.length(),
            chromosome.recombination_rate(),
            chromosome.mutation_rate()
        )?;
    }
    writeln!(doc)?;

    if !species.genetic_maps().is_empty() {
        writeln!(doc, "{}", underline("Genetic maps", '-'))?;
        for map in species.genetic_maps() {
            writeln!(doc, "{}", underline(&map.id, '^'))?;
            writeln!(doc, "{}\n", cleanup(&map.description))?;
            writeln!(doc, ":URL: {}", map.url)?;
            for citation in &map.citations {
                writeln!(doc, ":Citation: {citation}")?;
            }
            writeln!(doc)?;
        }
    }

    writeln!(doc, "{}", underline("Models", '-'))?;
    for model in species.models() {
        writeln!(doc, "{}", underline(&model.id, '^'))?;
        writeln!(doc, "{}", model_docs(model, &species.id)?)?;
    }
    Ok(doc)
}

/// File name of a species page.
pub fn species_file_name(species: &Species) -> String {
    format!("{}.rst", species.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::e_coli;
    use crate::models::generic;

    #[test]
    fn test_cleanup() {
        assert_eq!(cleanup("  a\n   b  \n\n c "), "a b c");
    }

    #[test]
    fn test_model_docs() {
        let model = generic::two_epoch(100.0, 50.0, 10.0).unwrap();
        let doc = model_docs(&model, "testsp").unwrap();
        assert!(doc.contains("Name:\n    TwoEpoch"));
        assert!(doc.contains("    - 0: pop0: Generic population"));
        assert!(doc.contains("popcat simulate-testsp -m 2_epoch -h"));
        assert!(doc.contains("Epoch: 10 -- inf generations"));
    }

    #[test]
    fn test_model_docs_do_not_change_model() {
        let model = generic::constant_size(10.0).unwrap();
        let before = model.clone();
        model_docs(&model, "x").unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn test_species_docs() {
        let species = e_coli::species().unwrap();
        let doc = species_docs(&species).unwrap();
        assert!(doc.starts_with("Escherichia coli\n================"));
        assert!(doc.contains(":ID: ``esccol``"));
        assert!(doc.contains("Chromosome, 4641652"));
        assert!(doc.contains("Lapierre et al. 2016"));
        assert!(!doc.contains("Genetic maps"));
    }
}
