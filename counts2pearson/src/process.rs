use std::io::Write;

use anyhow::Context;

use pars_core::{
    fdr, mean_sd, open_output, pair_values, pearson, CountFormat, CountStore, Correlation,
    ZeroPolicy,
};

use crate::{config::Config, plot::plot_genes};

pub struct GeneCor {
    pub gene: String,
    pub cor: Correlation,
    /// Values compared from each file
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Pearson correlation for each transcript of `b` (sorted by id) that is also in `a`
pub fn gene_correlations(
    a: &CountStore,
    b: &CountStore,
    zp: ZeroPolicy,
    min_positions: usize,
) -> Vec<GeneCor> {
    let mut ids: Vec<_> = b.iter().map(|t| t.id()).collect();
    ids.sort_unstable();
    let mut res = Vec::new();
    for id in ids {
        let (ta, tb) = match (a.get(id), b.get(id)) {
            (Some(x), Some(y)) => (x, y),
            _ => continue,
        };
        if ta.len() != tb.len() {
            error!(
                "Different transcript length for {} ({},{})",
                id,
                ta.len(),
                tb.len()
            );
            continue;
        }
        let (x, y) = pair_values(ta.counts(), tb.counts(), zp);
        if zp != ZeroPolicy::Keep && x.len() < min_positions {
            trace!("{}: only {} positions", id, x.len());
            continue;
        }
        let cor = pearson(&x, &y);
        res.push(GeneCor {
            gene: id.to_string(),
            cor,
            x,
            y,
        })
    }
    res
}

pub fn write_correlations<W: Write>(wrt: &mut W, v: &[GeneCor]) -> std::io::Result<()> {
    let p: Vec<_> = v.iter().map(|g| g.cor.p).collect();
    let q = fdr(&p);
    writeln!(wrt, "gene\tr\tp\tq\tn")?;
    for (g, q) in v.iter().zip(q.iter()) {
        writeln!(
            wrt,
            "{}\t{:.6}\t{:.6e}\t{:.6e}\t{}",
            g.gene, g.cor.r, g.cor.p, q, g.cor.n
        )?;
    }
    Ok(())
}

pub fn counts2pearson(cfg: &Config) -> anyhow::Result<()> {
    info!("Loading counts");
    let a = CountStore::from_input(cfg.input1(), CountFormat::Counts)?;
    let b = CountStore::from_input(cfg.input2(), CountFormat::Counts)?;

    info!("Calculating correlations for {} transcripts", b.len());
    let v = gene_correlations(&a, &b, cfg.zero_policy(), cfg.min_positions());

    let mut wrt = open_output(cfg.output())?;
    write_correlations(&mut wrt, &v)
        .and_then(|_| wrt.flush())
        .with_context(|| "Error writing correlations")?;

    if let Some(dir) = cfg.plot_dir() {
        info!("Writing scatter plots to {}", dir.display());
        let axes = (cfg.input1().label(), cfg.input2().label());
        plot_genes(dir, &v, &axes)?
    }

    let r: Vec<_> = v
        .iter()
        .filter(|g| g.cor.is_defined())
        .map(|g| g.cor.r)
        .collect();
    let positions: usize = v.iter().map(|g| g.cor.n).sum();
    match mean_sd(&r) {
        Some((m, sd)) => info!(
            "Correlation mean: {:.2} [+- {:.2}] for {} positions",
            m, sd, positions
        ),
        None => warn!("No correlations calculated"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(s: &str) -> CountStore {
        CountStore::from_reader(s.as_bytes(), CountFormat::Counts, "test").unwrap()
    }

    #[test]
    fn sorted_common_transcripts() {
        let a = store("z\t3\t1;2;3\nb\t2\t1;1\na\t4\t1;2;3;4\n");
        let b = store("z\t3\t2;4;6\na\t4\t4;3;2;1\nb\t3\t1;1;1\nc\t3\t1;2;3\n");
        let v = gene_correlations(&a, &b, ZeroPolicy::Keep, 5);
        let genes: Vec<_> = v.iter().map(|g| g.gene.as_str()).collect();
        assert_eq!(genes, vec!["a", "z"]);
        assert!((v[0].cor.r + 1.0).abs() < 1e-12);
        assert!((v[1].cor.r - 1.0).abs() < 1e-12);
        assert_eq!(v[1].cor.n, 3);
    }

    #[test]
    fn min_positions_when_ignoring_zeros() {
        let a = store("g\t5\t1;0;3;4;5\n");
        let b = store("g\t5\t2;4;0;8;9\n");
        assert!(gene_correlations(&a, &b, ZeroPolicy::DropAny, 5).is_empty());
        let v = gene_correlations(&a, &b, ZeroPolicy::DropAny, 3);
        assert_eq!(v[0].cor.n, 3);
        assert_eq!(gene_correlations(&a, &b, ZeroPolicy::Keep, 10).len(), 1);
    }

    #[test]
    fn output_has_q_values() {
        let a = store("g1\t4\t1;2;3;4\ng2\t4\t1;2;3;4\n");
        let b = store("g1\t4\t1;2;3;4\ng2\t4\t1;1;1;1\n");
        let v = gene_correlations(&a, &b, ZeroPolicy::Keep, 0);
        let mut out = Vec::new();
        write_correlations(&mut out, &v).unwrap();
        let s = String::from_utf8(out).unwrap();
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines[0], "gene\tr\tp\tq\tn");
        assert!(lines[1].starts_with("g1\t1.000000\t0.000000e0\t0.000000e0\t4"));
        assert_eq!(lines[2], "g2\tNaN\tNaN\tNaN\t4");
    }
}
