use std::io::Write;

use anyhow::Context;

use pars_core::{load_tab, mean_sd, open_output, CountStore};

use crate::config::Config;

/// Length of the run of zeros at the end of `counts`
pub fn zero_tail(counts: &[f64]) -> usize {
    counts.iter().rev().take_while(|x| **x == 0.0).count()
}

/// mean, sd, min, max of the zero tail lengths of all transcripts in the store
pub fn tail_stats(store: &CountStore) -> Option<(f64, f64, usize, usize)> {
    let tails: Vec<usize> = store.iter().map(|t| zero_tail(t.counts())).collect();
    let min = *tails.iter().min()?;
    let max = *tails.iter().max()?;
    let v: Vec<f64> = tails.iter().map(|x| *x as f64).collect();
    mean_sd(&v).map(|(m, sd)| (m, sd, min, max))
}

pub fn tab2stats(cfg: &Config) -> anyhow::Result<()> {
    let mut wrt = open_output(cfg.output())?;
    writeln!(wrt, "# 0-tail for LOAD>={}", cfg.min_load())?;
    writeln!(wrt, "fname\tmean\tstdev\tmin\tmax")?;
    for input in cfg.inputs().iter() {
        let store = load_tab(input, cfg.controls(), cfg.min_load(), 0)?;
        let name = input.name();
        let res = match tail_stats(&store) {
            Some((m, sd, min, max)) => {
                info!("{}: {} transcripts", name, store.len());
                writeln!(wrt, "{}\t{:.3}\t{:.3}\t{}\t{}", name, m, sd, min, max)
            }
            None => {
                warn!("{}: no transcripts passed filters", name);
                writeln!(wrt, "{}\tNA\tNA\tNA\tNA", name)
            }
        };
        res.with_context(|| "Error writing output")?;
    }
    wrt.flush()?;
    Ok(())
}
