use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use pars_core::{Input, ZeroPolicy};

/// Config
///
/// inputs - tab files to compare
/// controls - if present, only these transcripts are compared
/// min_load - minimum load for a transcript to be used (0 = no filter)
/// min_nonzero - minimum number of non-zero positions (0 = no filter)
/// zero_policy - whether to drop positions that are zero in both files
///
pub struct Config {
    inputs: Vec<Input>,
    controls: Option<HashSet<String>>,
    output: Option<PathBuf>,
    min_load: f64,
    min_nonzero: usize,
    zero_policy: ZeroPolicy,
}

impl Config {
    pub fn new(inputs: Vec<Input>) -> Self {
        Self {
            inputs,
            controls: None,
            output: None,
            min_load: 1.0,
            min_nonzero: 1,
            zero_policy: ZeroPolicy::Keep,
        }
    }

    pub fn set_controls(&mut self, controls: HashSet<String>) {
        self.controls = Some(controls)
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
    }

    pub fn set_min_load(&mut self, x: f64) {
        self.min_load = x
    }

    pub fn set_min_nonzero(&mut self, x: usize) {
        self.min_nonzero = x
    }

    pub fn set_ignore_zeros(&mut self) {
        self.zero_policy = ZeroPolicy::DropBoth
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn controls(&self) -> Option<&HashSet<String>> {
        self.controls.as_ref()
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn min_load(&self) -> f64 {
        self.min_load
    }

    pub fn min_nonzero(&self) -> usize {
        self.min_nonzero
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zero_policy
    }
}
