#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

use std::{
    borrow::Cow,
    fmt,
    io::{BufRead, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use compress_io::compress::CompressIo;

pub mod compare;
pub mod counts;
pub mod load;
pub mod normalize;
pub mod score;
pub mod stats;

pub use compare::{
    pair_common, pair_common_loaded, pair_values, write_matrix, MatrixFormat, Paired, ZeroPolicy,
};
pub use counts::{load_tab, read_id_list, CountFormat, CountStore, Transcript};
pub use load::{load, passes, Skip};
pub use normalize::normalize_by_control;
pub use score::{write_pars, Score, ScoreParams, ScoreSummary};
pub use stats::{fdr, linear_fit, mean_sd, pearson, pt, spearman, Correlation};

/// LogLevel
///
/// Represents minimum level of messages that will be logged
///
#[derive(Debug, Clone, Copy)]
pub struct LogLevel {
    pub level: usize,
}

impl FromStr for LogLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel { level: 0 }),
            "warn" => Ok(LogLevel { level: 1 }),
            "info" => Ok(LogLevel { level: 2 }),
            "debug" => Ok(LogLevel { level: 3 }),
            "trace" => Ok(LogLevel { level: 4 }),
            "none" => Ok(LogLevel { level: 5 }),
            _ => Err("no match"),
        }
    }
}

impl LogLevel {
    pub fn is_none(&self) -> bool {
        self.level > 4
    }
    pub fn get_level(&self) -> usize {
        if self.level > 4 {
            0
        } else {
            self.level
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let level_str = ["error", "warn", "info", "debug", "trace", "none"];
        if self.level < 6 {
            write!(f, "{}", level_str[self.level])
        } else {
            write!(f, "unknown")
        }
    }
}

/// Add the logging options shared by all of the tools
pub fn log_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("timestamp")
            .short('X')
            .long("timestamp")
            .value_parser(value_parser!(stderrlog::Timestamp))
            .value_name("GRANULARITY")
            .default_value("none")
            .help("Prepend log entries with a timestamp"),
    )
    .arg(
        Arg::new("loglevel")
            .short('l')
            .long("loglevel")
            .value_name("LOGLEVEL")
            .value_parser(value_parser!(LogLevel))
            .ignore_case(true)
            .default_value("info")
            .help("Set log level"),
    )
    .arg(
        Arg::new("quiet")
            .action(ArgAction::SetTrue)
            .long("quiet")
            .conflicts_with("loglevel")
            .help("Silence all output"),
    )
}

/// Initialize logging from command line arguments
pub fn init_log(m: &ArgMatches) {
    let verbose = m
        .get_one::<LogLevel>("loglevel")
        .copied()
        .unwrap_or(LogLevel { level: 2 });
    let quiet = verbose.is_none() || m.get_flag("quiet");
    let ts = m
        .get_one::<stderrlog::Timestamp>("timestamp")
        .copied()
        .unwrap_or(stderrlog::Timestamp::Off);

    // Only fails if a logger has already been installed
    if let Err(e) = stderrlog::new()
        .quiet(quiet)
        .verbosity(verbose.get_level())
        .timestamp(ts)
        .init()
    {
        eprintln!("Could not initialize logging: {}", e)
    }
}

/// Read in next line and split on tabs after trimming white space
pub fn get_next_line<'a, R: BufRead>(
    rdr: &mut R,
    buf: &'a mut String,
) -> anyhow::Result<Option<Vec<&'a str>>> {
    buf.clear();
    if rdr.read_line(buf)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buf.trim().split('\t').collect()))
    }
}

/// Input
///
/// Source of a delimited input file.  Either a path (possibly compressed)
/// or the standard input.  Resolved to a reader once with [`Input::bufreader`].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Path(PathBuf),
    Stdin,
}

impl Input {
    pub fn from_opt_path(p: Option<&PathBuf>) -> Self {
        match p {
            Some(p) => Self::Path(p.to_owned()),
            None => Self::Stdin,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p.as_path()),
            Self::Stdin => None,
        }
    }

    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Path(p) => p.to_string_lossy(),
            Self::Stdin => Cow::Borrowed("<stdin>"),
        }
    }

    /// Label used in report headers: the file name up to the first '.'
    pub fn label(&self) -> String {
        match self {
            Self::Path(p) => path_label(p),
            Self::Stdin => "stdin".to_owned(),
        }
    }

    pub fn bufreader(&self) -> anyhow::Result<Box<dyn BufRead>> {
        trace!("Opening {} for reading", self.name());
        let rdr = CompressIo::new()
            .opt_path(self.path())
            .bufreader()
            .with_context(|| format!("Could not open {} for input", self.name()))?;
        Ok(Box::new(rdr))
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn path_label(p: &Path) -> String {
    p.file_name()
        .map(|s| s.to_string_lossy())
        .and_then(|s| s.split('.').next().map(|x| x.to_owned()))
        .unwrap_or_else(|| p.display().to_string())
}

/// Open output file, or stdout if `p` is None
pub fn open_output(p: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    let wrt = CompressIo::new()
        .opt_path(p)
        .bufwriter()
        .with_context(|| match p {
            Some(p) => format!("Could not open output file {}", p.display()),
            None => "Could not open stdout for output".to_owned(),
        })?;
    Ok(Box::new(wrt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_trimmed_line_on_tabs() {
        let mut rdr = "geneA\t3\t1;2;3  \n\nlast".as_bytes();
        let mut buf = String::new();
        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec!["geneA", "3", "1;2;3"]);
        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec![""]);
        let f = get_next_line(&mut rdr, &mut buf).unwrap().unwrap();
        assert_eq!(f, vec!["last"]);
        assert!(get_next_line(&mut rdr, &mut buf).unwrap().is_none());
    }

    #[test]
    fn label_is_base_name_before_first_dot() {
        assert_eq!(path_label(Path::new("/data/S1_rep2.counts.gz")), "S1_rep2");
        assert_eq!(Input::Stdin.label(), "stdin");
    }

    #[test]
    fn parse_log_level() {
        assert_eq!(LogLevel::from_str("WARN").unwrap().level, 1);
        assert!(LogLevel::from_str("none").unwrap().is_none());
        assert!(LogLevel::from_str("loud").is_err());
    }
}
