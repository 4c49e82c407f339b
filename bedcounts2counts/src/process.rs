use std::{io::Write, path::Path};

use anyhow::Context;

use pars_core::{counts::write_joined, open_output, Input};

use crate::coverage::read_coverage;

/// Read per base coverage and write one counts line per transcript, sorted by id
pub fn bedcounts2counts(input: &Input, output: Option<&Path>) -> anyhow::Result<()> {
    info!("Reading coverage from {}", input);
    let rdr = input.bufreader()?;
    let tr_hash = read_coverage(rdr, &input.name())?;

    let mut wrt = open_output(output)?;
    for (id, tc) in tr_hash.iter() {
        let counts = tc.counts();
        write!(wrt, "{}\t{}\t", id, counts.len())?;
        write_joined(&mut wrt, &counts)?;
        writeln!(wrt)?;
    }
    wrt.flush().with_context(|| "Error writing counts")?;
    info!("Wrote counts for {} transcripts", tr_hash.len());
    Ok(())
}
