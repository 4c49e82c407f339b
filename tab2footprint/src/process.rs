use std::io::{BufRead, Write};

use anyhow::Context;

use pars_core::{
    counts::parse_counts, get_next_line, open_output, spearman, write_matrix, Input, MatrixFormat,
};

use crate::{config::Config, plot::plot_profiles};

/// Enrichment profile of one record of the selected transcript
pub struct Profile {
    /// Index of the input file
    pub file: usize,
    pub label: String,
    pub values: Vec<f64>,
}

/// Counts divided by their mean.  None if the mean is not positive.
pub fn enrichment(counts: &[f64]) -> Option<Vec<f64>> {
    let m = pars_core::load(counts)?;
    if m > 0.0 {
        Some(counts.iter().map(|x| x / m).collect())
    } else {
        None
    }
}

/// Collect the count sequences of every record for `gene` from a tab file
pub fn read_gene<R: BufRead>(mut rdr: R, gene: &str, name: &str) -> anyhow::Result<Vec<Vec<f64>>> {
    let mut buf = String::new();
    let mut line = 0;
    let mut v = Vec::new();
    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, name))?
    {
        line += 1;
        if fields.len() != 2 {
            if !(fields.len() == 1 && fields[0].is_empty()) {
                warn!(
                    "{}:{} 2 fields expected, but {} found",
                    name,
                    line,
                    fields.len()
                );
            }
            continue;
        }
        if fields[0] != gene {
            continue;
        }
        match parse_counts(fields[1]) {
            Ok(c) => v.push(c),
            Err(e) => warn!("{}:{} Skipping line: {:#}", name, line, e),
        }
    }
    Ok(v)
}

/// Build labelled enrichment profiles for one file
pub fn file_profiles(file: usize, name: &str, records: Vec<Vec<f64>>) -> Vec<Profile> {
    let multi = records.len() > 1;
    records
        .into_iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let label = if multi {
                format!("{}:{}", name, i + 1)
            } else {
                name.to_owned()
            };
            match enrichment(&c) {
                Some(values) => Some(Profile {
                    file,
                    label,
                    values,
                }),
                None => {
                    warn!("Skipping profile {} with no counts", label);
                    None
                }
            }
        })
        .collect()
}

/// Matrix with 1 on the diagonal, Spearman rho in the upper triangle and
/// the p-value in the lower triangle
pub fn profile_matrix(profiles: &[Profile]) -> Vec<Vec<f64>> {
    let n = profiles.len();
    let mut m = vec![vec![0.0; n]; n];
    for i in 0..n {
        m[i][i] = 1.0;
        for j in i + 1..n {
            let (a, b) = (&profiles[i], &profiles[j]);
            let (r, p) = if a.values.len() == b.values.len() {
                let c = spearman(&a.values, &b.values);
                (c.r, c.p)
            } else {
                warn!(
                    "Profiles {} and {} differ in length ({}, {})",
                    a.label,
                    b.label,
                    a.values.len(),
                    b.values.len()
                );
                (0.0, 1.0)
            };
            m[i][j] = r;
            m[j][i] = p;
        }
    }
    m
}

/// One row per position, one column per profile.  Short profiles leave empty cells.
pub fn write_profiles<W: Write>(wrt: &mut W, profiles: &[Profile]) -> std::io::Result<()> {
    write!(wrt, "position")?;
    for p in profiles.iter() {
        write!(wrt, "\t{}", p.label)?;
    }
    writeln!(wrt)?;
    let len = profiles.iter().map(|p| p.values.len()).max().unwrap_or(0);
    for i in 0..len {
        write!(wrt, "{}", i + 1)?;
        for p in profiles.iter() {
            match p.values.get(i) {
                Some(x) => write!(wrt, "\t{:.4}", x)?,
                None => write!(wrt, "\t")?,
            }
        }
        writeln!(wrt)?;
    }
    Ok(())
}

fn get_profiles(inputs: &[Input], gene: &str) -> anyhow::Result<Vec<Profile>> {
    let mut profiles = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        let name = input.name();
        let records = read_gene(input.bufreader()?, gene, &name)?;
        info!("{}: {} records found for {}", name, records.len(), gene);
        profiles.extend(file_profiles(i, &name, records))
    }
    Ok(profiles)
}

pub fn tab2footprint(cfg: &Config) -> anyhow::Result<()> {
    let profiles = get_profiles(cfg.inputs(), cfg.gene())?;
    if profiles.is_empty() {
        warn!("No profiles found for {}", cfg.gene())
    }
    let labels: Vec<_> = profiles.iter().map(|p| p.label.clone()).collect();
    let m = profile_matrix(&profiles);

    let mut wrt = open_output(cfg.output())?;
    write_matrix(
        &mut wrt,
        "Spearman correlation coefficient vs P value",
        &labels,
        &m,
        MatrixFormat::Fixed3,
    )
    .and_then(|_| wrt.flush())
    .with_context(|| "Error writing correlation matrix")?;

    if let Some(p) = cfg.profiles() {
        let mut wrt = open_output(Some(p))?;
        write_profiles(&mut wrt, &profiles)
            .and_then(|_| wrt.flush())
            .with_context(|| format!("Error writing profiles to {}", p.display()))?
    }
    if let Some(p) = cfg.plot() {
        let titles: Vec<_> = cfg.inputs().iter().map(|i| i.label()).collect();
        plot_profiles(p, &titles, &profiles)
            .with_context(|| format!("Error writing plot to {}", p.display()))?
    }
    Ok(())
}
