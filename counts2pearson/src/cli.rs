use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    Command,
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
        Arg::new("plot_dir")
            .short('p')
            .long("plot-dir")
            .value_parser(value_parser!(PathBuf))
            .value_name("DIR")
            .help("Write a scatter plot (SVG) for each transcript to directory"),
    )
    .arg(
        Arg::new("ignore_zeros")
            .short('s')
            .long("ignore-zeros")
            .action(ArgAction::SetTrue)
            .help("Ignore positions that are zero in either file"),
    )
    .arg(
        Arg::new("min_positions")
            .short('m')
            .long("min-positions")
            .value_parser(value_parser!(usize))
            .value_name("INT")
            .default_value("5")
            .help("Minimum positions to compare when ignoring zeros"),
    )
    .arg(
        Arg::new("input1")
            .value_parser(value_parser!(PathBuf))
            .value_name("COUNTS1")
            .required(true)
            .help("First counts file"),
    )
    .arg(
        Arg::new("input2")
            .value_parser(value_parser!(PathBuf))
            .value_name("COUNTS2")
            .required(true)
            .help("Second counts file"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model().get_matches();

    init_log(&m);

    let get_input = |s: &str| Input::Path(m.get_one::<PathBuf>(s).expect("Missing input").clone());

    let mut cfg = Config::new(
        get_input("input1"),
        get_input("input2"),
        *m.get_one::<usize>("min_positions")
            .expect("Missing default min positions"),
    );

    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("plot_dir") {
        cfg.set_plot_dir(p)
    }
    if m.get_flag("ignore_zeros") {
        cfg.set_ignore_zeros()
    }

    Ok(cfg)
}
