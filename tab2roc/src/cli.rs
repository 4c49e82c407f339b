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
        Arg::new("plot")
            .short('p')
            .long("plot")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Plot rho and number of genes against load (SVG)"),
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
        Arg::new("min_load")
            .long("min-load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("0.0")
            .help("First load threshold"),
    )
    .arg(
        Arg::new("max_load")
            .long("max-load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("20.1")
            .help("Load thresholds stop below this value"),
    )
    .arg(
        Arg::new("step_load")
            .long("step-load")
            .value_parser(value_parser!(f64))
            .value_name("FLOAT")
            .default_value("0.5")
            .help("Increment between load thresholds"),
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

/// Load thresholds from `min` (inclusive) to `max` (exclusive)
pub fn load_steps(min: f64, max: f64, step: f64) -> anyhow::Result<Vec<f64>> {
    if !(step > 0.0) {
        return Err(anyhow!("Load step must be positive"));
    }
    if !(min >= 0.0) {
        return Err(anyhow!("Invalid minimum load {}", min));
    }
    // Computed from the index so that rounding errors do not accumulate
    Ok((0..)
        .map(|i| min + (i as f64) * step)
        .take_while(|x| *x < max)
        .collect())
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

    let get = |s: &str| *m.get_one::<f64>(s).expect("Missing default value");
    let loads = load_steps(get("min_load"), get("max_load"), get("step_load"))?;
    debug!("{} load thresholds", loads.len());

    let mut cfg = Config::new(inputs, loads);

    if let Some(p) = m.get_one::<PathBuf>("controls") {
        let controls = read_id_list(p)
            .with_context(|| format!("Could not read control names from {}", p.display()))?;
        info!("{} control names loaded", controls.len());
        cfg.set_controls(controls)
    }
    if let Some(p) = m.get_one::<PathBuf>("output") {
        cfg.set_output(p)
    }
    if let Some(p) = m.get_one::<PathBuf>("plot") {
        cfg.set_plot(p)
    }
    if m.get_flag("ignore_zeros") {
        cfg.set_ignore_zeros()
    }

    Ok(cfg)
}
