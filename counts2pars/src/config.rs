use std::path::{Path, PathBuf};

use pars_core::{Input, ScoreParams};

/// Config
///
/// s1, v1 - input counts for the two nuclease libraries
/// control - optional control counts used to remove background
/// output - output file (stdout if None)
/// params - load and read thresholds for scoring
///
pub struct Config {
    s1: Input,
    v1: Input,
    control: Option<Input>,
    output: Option<PathBuf>,
    params: ScoreParams,
}

impl Config {
    pub fn new(s1: Input, v1: Input, params: ScoreParams) -> Self {
        Self {
            s1,
            v1,
            control: None,
            output: None,
            params,
        }
    }

    pub fn set_control(&mut self, p: &Path) {
        self.control = Some(Input::Path(p.to_owned()))
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
    }

    pub fn s1(&self) -> &Input {
        &self.s1
    }

    pub fn v1(&self) -> &Input {
        &self.v1
    }

    pub fn control(&self) -> Option<&Input> {
        self.control.as_ref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn params(&self) -> &ScoreParams {
        &self.params
    }
}
