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
        Arg::new("table")
            .short('j')
            .long("correlations")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .required(true)
            .help("Correlation table (gene and coefficient in the first two columns)"),
    )
    .arg(
        Arg::new("control")
            .short('c')
            .long("control")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Normalize with control counts"),
    )
    .arg(
        Arg::new("load")
            .short('L')
            .long("load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .num_args(1..)
            .default_value("1.0")
            .help("Load thresholds"),
    )
    .arg(
        Arg::new("s1")
            .value_parser(value_parser!(PathBuf))
            .value_name("S1_COUNTS")
            .required(true)
            .help("Counts file for S1 library"),
    )
    .arg(
        Arg::new("v1")
            .value_parser(value_parser!(PathBuf))
            .value_name("V1_COUNTS")
            .required(true)
            .help("Counts file for V1 library"),
    )
}

/// Handle command line options.  Set up Config structure
pub fn handle_cli() -> anyhow::Result<Config> {
    let m = cli_model().get_matches();

    init_log(&m);

    let get_input = |s: &str| Input::Path(m.get_one::<PathBuf>(s).expect("Missing input").clone());

    let loads: Vec<f64> = m
        .get_many::<f64>("load")
        .expect("Missing default load")
        .copied()
        .collect();
    if let Some(x) = loads.iter().find(|x| !(**x >= 0.0)) {
        return Err(anyhow!("Invalid load threshold {}", x));
    }

    let mut cfg = Config::new(get_input("s1"), get_input("v1"), get_input("table"), loads);

    if let Some(p) = m.get_one::<PathBuf>("control") {
        cfg.set_control(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }

    Ok(cfg)
}
