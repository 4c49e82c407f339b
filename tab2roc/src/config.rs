use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use pars_core::{Input, ZeroPolicy};

/// Config
///
/// inputs - tab files to compare pairwise
/// loads - load thresholds at which each pair is compared
/// plot - optional SVG file with rho and genes against load for every pair
///
pub struct Config {
    inputs: Vec<Input>,
    loads: Vec<f64>,
    controls: Option<HashSet<String>>,
    output: Option<PathBuf>,
    plot: Option<PathBuf>,
    zero_policy: ZeroPolicy,
}

impl Config {
    pub fn new(inputs: Vec<Input>, loads: Vec<f64>) -> Self {
        Self {
            inputs,
            loads,
            controls: None,
            output: None,
            plot: None,
            zero_policy: ZeroPolicy::Keep,
        }
    }

    pub fn set_controls(&mut self, controls: HashSet<String>) {
        self.controls = Some(controls)
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
    }

    pub fn set_plot(&mut self, p: &Path) {
        self.plot = Some(p.to_owned())
    }

    pub fn set_ignore_zeros(&mut self) {
        self.zero_policy = ZeroPolicy::DropBoth
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    pub fn controls(&self) -> Option<&HashSet<String>> {
        self.controls.as_ref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn plot(&self) -> Option<&Path> {
        self.plot.as_deref()
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }
}
