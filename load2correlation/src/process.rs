use std::{
    collections::HashMap,
    io::{BufRead, Write},
};

use anyhow::Context;

use pars_core::{
    mean_sd, normalize_by_control, open_output, passes, CountFormat, CountStore,
};

use crate::config::Config;

/// Read gene -> coefficient from the first two whitespace separated fields.
/// Comment lines, headers and lines without a numeric coefficient are skipped.
pub fn read_coefficients<R: BufRead>(rdr: R, name: &str) -> anyhow::Result<HashMap<String, f64>> {
    let mut h = HashMap::new();
    for (i, l) in rdr.lines().enumerate() {
        let l = l.with_context(|| format!("Error reading line {} from {}", i + 1, name))?;
        if l.starts_with('#') {
            continue;
        }
        let mut it = l.split_whitespace();
        match (it.next(), it.next().map(|s| s.parse::<f64>())) {
            (Some(gene), Some(Ok(x))) => {
                h.insert(gene.to_owned(), x);
            }
            (None, _) => (),
            _ => debug!("{}:{} Skipping line", name, i + 1),
        }
    }
    Ok(h)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub load: f64,
    /// Transcripts passing the load filter in both libraries
    pub genes: usize,
    pub mean_sd: Option<(f64, f64)>,
}

pub fn summarize(
    s1: &CountStore,
    v1: &CountStore,
    coeffs: &HashMap<String, f64>,
    load: f64,
) -> LoadSummary {
    let mut genes = 0;
    let mut v = Vec::new();
    for s in s1.iter() {
        let Some(t) = v1.get(s.id()) else {
            continue;
        };
        if !(passes(s.counts(), load) && passes(t.counts(), load)) {
            continue;
        }
        genes += 1;
        match coeffs.get(s.id().as_ref()) {
            Some(x) if !x.is_nan() => v.push(*x),
            Some(_) => (),
            None => trace!("{} not found in correlation table", s.id()),
        }
    }
    LoadSummary {
        load,
        genes,
        mean_sd: mean_sd(&v),
    }
}

pub fn load2correlation(cfg: &Config) -> anyhow::Result<()> {
    info!("Loading correlation coefficients");
    let coeffs = read_coefficients(cfg.table().bufreader()?, &cfg.table().name())?;
    info!("{} coefficients loaded", coeffs.len());

    info!("Loading counts");
    let s1 = CountStore::from_input(cfg.s1(), CountFormat::Counts)?;
    let v1 = CountStore::from_input(cfg.v1(), CountFormat::Counts)?;
    let (s1, v1) = match cfg.control() {
        Some(ctrl) => {
            info!("Normalising by control alignments");
            let c0 = CountStore::from_input(ctrl, CountFormat::Counts)?;
            normalize_by_control(&s1, &v1, &c0)
                .with_context(|| format!("Could not normalize using control {}", ctrl))?
        }
        None => (s1, v1),
    };

    let mut wrt = open_output(cfg.output())?;
    writeln!(wrt, "#load\tgenes\tmean\tstdev")?;
    for l in cfg.loads().iter() {
        let summ = summarize(&s1, &v1, &coeffs, *l);
        match summ.mean_sd {
            Some((m, sd)) => writeln!(wrt, "{}\t{}\t{:.4}\t{:.4}", l, summ.genes, m, sd)?,
            None => writeln!(wrt, "{}\t{}\tNA\tNA", l, summ.genes)?,
        }
    }
    wrt.flush()?;
    Ok(())
}
