mod cli;
mod coverage;
mod process;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::time::Instant;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let t0 = Instant::now();
    let (input, output) =
        cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    process::bedcounts2counts(&input, output.as_deref())?;
    info!("Time elapsed: {:.2?}", t0.elapsed());
    Ok(())
}
