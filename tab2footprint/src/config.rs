use std::path::{Path, PathBuf};

use pars_core::Input;

/// Config
///
/// gene - transcript whose profiles are compared
/// profiles - optional table of the enrichment profiles
/// plot - optional SVG file with the profiles drawn per input file
///
pub struct Config {
    inputs: Vec<Input>,
    gene: String,
    output: Option<PathBuf>,
    profiles: Option<PathBuf>,
    plot: Option<PathBuf>,
}

impl Config {
    pub fn new(inputs: Vec<Input>, gene: &str) -> Self {
        Self {
            inputs,
            gene: gene.to_owned(),
            output: None,
            profiles: None,
            plot: None,
        }
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
    }

    pub fn set_profiles(&mut self, p: &Path) {
        self.profiles = Some(p.to_owned())
    }

    pub fn set_plot(&mut self, p: &Path) {
        self.plot = Some(p.to_owned())
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn gene(&self) -> &str {
        &self.gene
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn profiles(&self) -> Option<&Path> {
        self.profiles.as_deref()
    }

    pub fn plot(&self) -> Option<&Path> {
        self.plot.as_deref()
    }
}
