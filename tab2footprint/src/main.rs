mod cli;
mod config;
mod plot;
mod process;

#[macro_use]
extern crate log;

use std::time::Instant;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let t0 = Instant::now();
    let cfg = cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    process::tab2footprint(&cfg)?;
    info!("Time elapsed: {:.2?}", t0.elapsed());
    Ok(())
}
