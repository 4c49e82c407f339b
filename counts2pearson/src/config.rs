use std::path::{Path, PathBuf};

use pars_core::{Input, ZeroPolicy};

/// Config
///
/// input1, input2 - counts files to compare
/// min_positions - minimum positions left after dropping zeros
/// plot_dir - if present, one scatter plot per transcript is written here
///
pub struct Config {
    input1: Input,
    input2: Input,
    output: Option<PathBuf>,
    plot_dir: Option<PathBuf>,
    zero_policy: ZeroPolicy,
    min_positions: usize,
}

impl Config {
    pub fn new(input1: Input, input2: Input, min_positions: usize) -> Self {
        Self {
            input1,
            input2,
            output: None,
            plot_dir: None,
            zero_policy: ZeroPolicy::Keep,
            min_positions,
        }
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
    }

    pub fn set_plot_dir(&mut self, p: &Path) {
        self.plot_dir = Some(p.to_owned())
    }

    pub fn set_ignore_zeros(&mut self) {
        self.zero_policy = ZeroPolicy::DropAny
    }

    pub fn input1(&self) -> &Input {
        &self.input1
    }

    pub fn input2(&self) -> &Input {
        &self.input2
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn plot_dir(&self) -> Option<&Path> {
        self.plot_dir.as_deref()
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }

    /// Only used when zeros are ignored
    pub fn min_positions(&self) -> usize {
        self.min_positions
    }
}
