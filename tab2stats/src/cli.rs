use std::path::PathBuf;

use anyhow::Context;
use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use pars_core::{init_log, log_args, read_id_list, Input};

use crate::config::Config;

/// Set up definition of command options for clap
fn cli_model() -> Command {
    log_args(
        Command::new(crate_name!())
            .about(crate_description!())
            .version(crate_version!())
            .author(crate_authors!()),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Set output file [default: <stdout>]"),
    )
    .arg(
        Arg::new("controls")
            .short('c')
            .long("controls")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Only use transcripts listed in file"),
    )
    .arg(
        Arg::new("load")
            .short('L')
            .long("load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("1.0")
            .help("Minimum number of cuts per position of transcript"),
    )
    .arg(
        Arg::new("input")
            .short('i')
            .long("input")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .num_args(1..)
            .required(true)
            .help("Input tab files"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model().get_matches();

    init_log(&m);

    let inputs = m
        .get_many::<PathBuf>("input")
        .expect("Missing input files")
        .map(|p| Input::Path(p.to_owned()))
        .collect();

    let min_load = *m.get_one::<f64>("load").expect("Missing default load");
    if !(min_load >= 0.0) {
        return Err(anyhow!("Invalid load threshold {}", min_load));
    }

    let mut cfg = Config::new(inputs, min_load);

    if let Some(p) = m.get_one::<PathBuf>("controls") {
        let controls = read_id_list(p)
            .with_context(|| format!("Could not read control names from {}", p.display()))?;
        info!("{} control names loaded", controls.len());
        cfg.set_controls(controls)
    }
    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }

    Ok(cfg)
}
