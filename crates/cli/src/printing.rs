use popcat_catalog::{Citation, Contig, Model, Species};
use std::io::{self, Write};

/// Reference for the coalescent algorithm the engine implements.
pub fn engine_citation() -> Citation {
    Citation::new(
        "Kelleher et al.",
        2016,
        "https://doi.org/10.1371/journal.pcbi.1004842",
    )
}

fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "******************")?;
    writeln!(out, "{title}")?;
    writeln!(out, "******************")
}

/// Write the papers to cite for a simulation of `model` on `contig`.
pub fn write_citations(
    out: &mut impl Write,
    species: &Species,
    contig: &Contig,
    model: &Model,
) -> io::Result<()> {
    writeln!(
        out,
        "If you use this simulation in published work, please cite the following papers:"
    )?;
    heading(out, "Simulation engine:")?;
    writeln!(out, "\tpopcat-engine: {}", engine_citation())?;

    if let Some(map) = contig
        .genetic_map
        .as_deref()
        .and_then(|id| species.get_genetic_map(id).ok())
    {
        heading(out, "Genetic map:")?;
        writeln!(out, "\t{}", map.id)?;
        for citation in &map.citations {
            writeln!(out, "\t{citation}")?;
        }
    }

    heading(out, "Simulation model:")?;
    writeln!(out, "\t{}", model.name)?;
    for citation in &model.citations {
        writeln!(out, "\t{citation}")?;
    }
    Ok(())
}
