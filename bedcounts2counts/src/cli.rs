use std::path::PathBuf;

use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, Command,
};

use pars_core::{init_log, log_args, Input};

/// Set up definition of command options for clap
fn cli_model() -> Command {
    log_args(
        Command::new(crate_name!())
            .about(crate_description!())
            .version(crate_version!())
            .author(crate_authors!()),
    )
    .arg(
        Arg::new("input")
            .short('i')
            .long("input")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Input per base coverage file [default: <stdin>]"),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(value_parser!(PathBuf))
            .value_name("PATH")
            .help("Set output file [default: <stdout>]"),
    )
}

/// Handle command line options.  Returns input source and optional output path
pub fn handle_cli() -> anyhow::Result<(Input, Option<PathBuf>)> {
    let m = cli_model().get_matches();

    init_log(&m);

    debug!("Processing command line options");

    let input = Input::from_opt_path(m.get_one::<PathBuf>("input"));
    let output = m.get_one::<PathBuf>("output").cloned();
    Ok((input, output))
}
