use std::path::{Path, PathBuf};

use pars_core::Input;

/// Config
///
/// s1, v1 - counts for the two nuclease libraries
/// table - per transcript correlation coefficients
/// control - optional control counts used to remove background
/// loads - load thresholds to summarize at
///
pub struct Config {
    s1: Input,
    v1: Input,
    table: Input,
    control: Option<Input>,
    output: Option<PathBuf>,
    loads: Vec<f64>,
}

impl Config {
    pub fn new(s1: Input, v1: Input, table: Input, loads: Vec<f64>) -> Self {
        Self {
            s1,
            v1,
            table,
            control: None,
            output: None,
            loads,
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

    pub fn table(&self) -> &Input {
        &self.table
    }

    pub fn control(&self) -> Option<&Input> {
        self.control.as_ref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn loads(&self) -> &[f64] {
        &self.loads
    }
}
