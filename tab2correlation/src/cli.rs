use std::path::PathBuf;

use anyhow::Context;
use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
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
            .help("Compare only transcripts listed in file"),
    )
    .arg(
        Arg::new("ignore_zeros")
            .short('s')
            .long("ignore-zeros")
            .action(ArgAction::SetTrue)
            .help("Ignore positions that are zero in both files"),
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
        Arg::new("min_count")
            .short('m')
            .long("min-count")
            .value_parser(value_parser!(usize))
            .value_name("INT")
            .default_value("1")
            .help("Minimum number of non-zero positions in transcript"),
    )
    .arg(
        Arg::new("input")
            .short('i')
            .long("input")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .num_args(2..)
            .required(true)
            .help("Input tab files"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model().get_matches();

    init_log(&m);

    debug!("Processing command line options");

    let inputs: Vec<_> = m
        .get_many::<PathBuf>("input")
        .expect("Missing input files")
        .map(|p| Input::Path(p.to_owned()))
        .collect();

    let mut cfg = Config::new(inputs);

    if let Some(p) = m.get_one::<PathBuf>("controls") {
        let controls = read_id_list(p)
            .with_context(|| format!("Could not read control names from {}", p.display()))?;
        info!("{} control names loaded", controls.len());
        cfg.set_controls(controls)
    }
    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }
    let load = *m.get_one::<f64>("load").expect("Missing default load");
    if !(load >= 0.0) {
        return Err(anyhow!("Invalid load threshold {}", load));
    }
    cfg.set_min_load(load);
    cfg.set_min_nonzero(
        *m.get_one::<usize>("min_count")
            .expect("Missing default min count"),
    );
    if m.get_flag("ignore_zeros") {
        cfg.set_ignore_zeros()
    }

    Ok(cfg)
}
