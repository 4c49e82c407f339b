use std::io::Write;

use anyhow::Context;

use pars_core::{
    load_tab, open_output, pair_common, spearman, write_matrix, CountStore, Correlation,
    MatrixFormat, ZeroPolicy,
};

use crate::config::Config;

/// Correlation matrices for a set of files
///
/// rho: diagonal 1, upper triangle Spearman rho, lower triangle number of common genes
/// pval: diagonal 0, upper triangle p-value, lower triangle number of compared positions
pub struct CorMatrices {
    pub rho: Vec<Vec<f64>>,
    pub pval: Vec<Vec<f64>>,
}

pub fn correlation_matrices(stores: &[CountStore], labels: &[String], zp: ZeroPolicy) -> CorMatrices {
    let n = stores.len();
    let mut rho = vec![vec![0.0; n]; n];
    let mut pval = vec![vec![0.0; n]; n];
    for i in 0..n {
        rho[i][i] = 1.0;
        for j in i + 1..n {
            let p = pair_common(&stores[i], &stores[j], zp);
            let c = if p.genes > 0 {
                spearman(&p.x, &p.y)
            } else {
                Correlation {
                    r: 0.0,
                    p: 1.0,
                    n: 0,
                }
            };
            info!(
                "{} - {}: {} common positions in {} genes with {:.3} {}",
                labels[i],
                labels[j],
                p.positions(),
                p.genes,
                c.r,
                c.p
            );
            rho[i][j] = c.r;
            rho[j][i] = p.genes as f64;
            pval[i][j] = c.p;
            pval[j][i] = p.positions() as f64;
        }
    }
    CorMatrices { rho, pval }
}

pub fn tab2correlation(cfg: &Config) -> anyhow::Result<()> {
    info!("Loading {} tab files", cfg.inputs().len());
    let stores = cfg
        .inputs()
        .iter()
        .map(|i| load_tab(i, cfg.controls(), cfg.min_load(), cfg.min_nonzero()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let labels: Vec<String> = cfg.inputs().iter().map(|i| i.name().into_owned()).collect();

    info!("Calculating Spearman correlation");
    let cm = correlation_matrices(&stores, &labels, cfg.zero_policy());

    let mut wrt = open_output(cfg.output())?;
    write_matrix(
        &mut wrt,
        "Spearman correlation coefficient vs number of genes",
        &labels,
        &cm.rho,
        MatrixFormat::Fixed3,
    )
    .and_then(|_| writeln!(wrt, "#"))
    .and_then(|_| {
        write_matrix(
            &mut wrt,
            "Spearman correlation P-value vs number of compared positions",
            &labels,
            &cm.pval,
            MatrixFormat::Scientific,
        )
    })
    .and_then(|_| wrt.flush())
    .with_context(|| "Error writing correlation matrices")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pars_core::CountFormat;

    fn store(s: &str) -> CountStore {
        CountStore::from_reader(s.as_bytes(), CountFormat::Tab, "test").unwrap()
    }

    #[test]
    fn matrices_hold_rho_genes_and_positions() {
        let stores = vec![
            store("g1\t1;2;3\ng2\t0;5;6\n"),
            store("g1\t2;4;6\ng2\t0;10;12\ng3\t1;1\n"),
            store("g9\t1;2;3\n"),
        ];
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let cm = correlation_matrices(&stores, &labels, ZeroPolicy::Keep);
        assert_eq!(cm.rho[0][0], 1.0);
        assert!((cm.rho[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(cm.rho[1][0], 2.0);
        assert_eq!(cm.pval[1][0], 6.0);
        // no common genes
        assert_eq!(cm.rho[0][2], 0.0);
        assert_eq!(cm.pval[0][2], 1.0);
        assert_eq!(cm.rho[2][0], 0.0);

        let cm = correlation_matrices(&stores, &labels, ZeroPolicy::DropBoth);
        assert_eq!(cm.pval[1][0], 5.0);
    }
}
