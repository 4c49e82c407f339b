use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use pars_core::{init_log, log_args, Input};

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
        Arg::new("profiles")
            .short('p')
            .long("profiles")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Write enrichment profiles to file"),
    )
    .arg(
        Arg::new("plot")
            .short('P')
            .long("plot")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Plot enrichment profiles (SVG)"),
    )
    .arg(
        Arg::new("gene")
            .short('g')
            .long("gene")
            .value_name("ID")
            .required(true)
            .help("Transcript to report"),
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

    let mut cfg = Config::new(inputs, m.get_one::<String>("gene").expect("Missing gene"));

    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("profiles") {
        cfg.set_profiles(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("plot") {
        cfg.set_plot(p)
    }

    Ok(cfg)
}
