use std::io::Write;

use anyhow::Context;

use pars_core::{normalize_by_control, open_output, write_pars, CountFormat, CountStore};

use crate::config::Config;

/// Strategy
///
/// Read in S1 and V1 counts (and control if present)
/// If we have a control, subtract the background estimated from the control
/// from both libraries.  Then score all transcripts passing the load filter
/// in both libraries
pub fn counts2pars(cfg: &Config) -> anyhow::Result<()> {
    info!("Loading counts");
    let s1 = CountStore::from_input(cfg.s1(), CountFormat::Counts)?;
    let v1 = CountStore::from_input(cfg.v1(), CountFormat::Counts)?;
    debug!(
        "Read in {} S1 and {} V1 transcripts",
        s1.len(),
        v1.len()
    );

    let (s1, v1) = if let Some(ctrl) = cfg.control() {
        info!("Normalising by control alignments");
        let c0 = CountStore::from_input(ctrl, CountFormat::Counts)?;
        normalize_by_control(&s1, &v1, &c0)
            .with_context(|| format!("Could not normalize using control {}", ctrl))?
    } else {
        (s1, v1)
    };

    info!("Calculating PARS scores");
    let mut wrt = open_output(cfg.output())?;
    let summ = write_pars(&mut wrt, &s1, &v1, cfg.params())
        .with_context(|| "Error writing PARS scores")?;
    wrt.flush().with_context(|| "Error writing PARS scores")?;

    info!(
        "Processed {} transcripts. {} passed load filter.",
        summ.processed,
        summ.passed
    );
    Ok(())
}
