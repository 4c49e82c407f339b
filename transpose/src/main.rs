mod cli;
mod process;

#[macro_use]
extern crate log;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let (input, output) =
        cli::handle_cli().with_context(|| "Error processing command line arguments")?;
    process::transpose(&input, output.as_deref())
}
