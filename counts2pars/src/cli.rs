use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use pars_core::{init_log, log_args, Input, ScoreParams};

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
        Arg::new("load")
            .short('L')
            .long("load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("1.0")
            .help("Minimum load (mean reads per position) in both libraries"),
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
        Arg::new("min_reads")
            .short('t')
            .long("min-reads")
            .value_parser(value_parser!(u32))
            .value_name("INT")
            .default_value("0")
            .help("Minimum combined reads at a position"),
    )
    .arg(
        Arg::new("reads_per_sample")
            .short('s')
            .long("reads-per-sample")
            .value_parser(value_parser!(u32))
            .value_name("INT")
            .default_value("0")
            .help("Minimum reads at a position in each library"),
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
    // Get matches from command line
    let m = cli_model().get_matches();

    // Setup logging
    init_log(&m);

    debug!("Processing command line options");

    let load_threshold = *m.get_one::<f64>("load").expect("Missing default load");
    if !(load_threshold >= 0.0) {
        return Err(anyhow!("Invalid load threshold {}", load_threshold));
    }
    let params = ScoreParams {
        load_threshold,
        min_reads: *m.get_one::<u32>("min_reads").expect("Missing default min reads") as f64,
        reads_per_sample: *m
            .get_one::<u32>("reads_per_sample")
            .expect("Missing default reads per sample") as f64,
    };
    debug!("Scoring parameters: {:?}", params);

    let s1 = Input::Path(m.get_one::<PathBuf>("s1").expect("Missing S1 file").clone());
    let v1 = Input::Path(m.get_one::<PathBuf>("v1").expect("Missing V1 file").clone());

    let mut cfg = Config::new(s1, v1, params);

    if let Some(p) = m.get_one::<PathBuf>("control") {
        cfg.set_control(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }

    Ok(cfg)
}
