use std::io::Write;

use anyhow::Context;

use pars_core::{
    load_tab, open_output, pair_common_loaded, spearman, CountStore, Correlation, ZeroPolicy,
};

use crate::{config::Config, plot::plot_curves};

/// One row of the output table
#[derive(Debug, Clone, PartialEq)]
pub struct RocPoint {
    pub load: f64,
    pub genes: usize,
    pub positions: usize,
    pub rho: f64,
    pub p: f64,
}

/// Comparison of files `i` and `j` (i < j) over all load thresholds
pub struct PairCurve {
    pub i: usize,
    pub j: usize,
    pub title: String,
    pub points: Vec<RocPoint>,
}

/// Spearman correlation between two stores for each load threshold
pub fn roc_curve(a: &CountStore, b: &CountStore, zp: ZeroPolicy, loads: &[f64]) -> Vec<RocPoint> {
    loads
        .iter()
        .map(|l| {
            let p = pair_common_loaded(a, b, zp, *l);
            let c = if p.genes > 0 {
                spearman(&p.x, &p.y)
            } else {
                Correlation {
                    r: 0.0,
                    p: 1.0,
                    n: 0,
                }
            };
            trace!(
                "LOAD>={}: {} common positions in {} genes with {:.3} {}",
                l,
                p.positions(),
                p.genes,
                c.r,
                c.p
            );
            RocPoint {
                load: *l,
                genes: p.genes,
                positions: p.positions(),
                rho: c.r,
                p: c.p,
            }
        })
        .collect()
}

pub fn tab2roc(cfg: &Config) -> anyhow::Result<()> {
    let stores = cfg
        .inputs()
        .iter()
        .map(|i| load_tab(i, cfg.controls(), 0.0, 0))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let labels: Vec<_> = cfg.inputs().iter().map(|i| i.label()).collect();

    let mut curves = Vec::new();
    for (i, a) in stores.iter().enumerate() {
        for (j, b) in stores.iter().enumerate().skip(i + 1) {
            info!("Comparing {} and {}", labels[i], labels[j]);
            curves.push(PairCurve {
                i,
                j,
                title: format!("{} vs {}", labels[i], labels[j]),
                points: roc_curve(a, b, cfg.zero_policy(), cfg.loads()),
            })
        }
    }

    let mut wrt = open_output(cfg.output())?;
    writeln!(wrt, "sample1\tsample2\tload\tgenes\tpositions\trho\tp")?;
    for c in curves.iter() {
        for pt in c.points.iter() {
            writeln!(
                wrt,
                "{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6e}",
                labels[c.i], labels[c.j], pt.load, pt.genes, pt.positions, pt.rho, pt.p
            )?;
        }
    }
    wrt.flush()?;

    if let Some(p) = cfg.plot() {
        info!("Plotting to {}", p.display());
        plot_curves(p, stores.len(), &curves)
            .with_context(|| format!("Error writing plot to {}", p.display()))?
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pars_core::CountFormat;

    fn store(s: &str) -> CountStore {
        CountStore::from_reader(s.as_bytes(), CountFormat::Tab, "test").unwrap()
    }

    #[test]
    fn fewer_genes_at_higher_load() {
        let a = store("g1\t1;2;3;0\ng2\t10;20;30;40\n");
        let b = store("g1\t1;3;2;0\ng2\t11;19;35;50\n");
        let v = roc_curve(&a, &b, ZeroPolicy::Keep, &[0.0, 5.0, 100.0]);
        assert_eq!(v.len(), 3);
        assert_eq!((v[0].genes, v[0].positions), (2, 8));
        assert_eq!((v[1].genes, v[1].positions), (1, 4));
        assert!((v[1].rho - 1.0).abs() < 1e-12);
        // No common genes
        assert_eq!((v[2].genes, v[2].positions), (0, 0));
        assert_eq!((v[2].rho, v[2].p), (0.0, 1.0));
    }

    #[test]
    fn no_common_transcripts_gives_zero_rho() {
        let a = store("g1\t1;2;3\n");
        let b = store("g2\t1;2;3\n");
        let v = roc_curve(&a, &b, ZeroPolicy::DropBoth, &[0.0, 1.0]);
        assert!(v.iter().all(|pt| pt.rho == 0.0 && pt.p == 1.0 && pt.genes == 0));
    }
}
