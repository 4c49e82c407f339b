use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use pars_core::Input;

/// Config
///
/// inputs - tab files to summarize
/// controls - if present, only these transcripts are used
/// min_load - minimum load for a transcript to be used
///
pub struct Config {
    inputs: Vec<Input>,
    controls: Option<HashSet<String>>,
    output: Option<PathBuf>,
    min_load: f64,
}

impl Config {
    pub fn new(inputs: Vec<Input>, min_load: f64) -> Self {
        Self {
            inputs,
            controls: None,
            output: None,
            min_load,
        }
    }

    pub fn set_controls(&mut self, controls: HashSet<String>) {
        self.controls = Some(controls)
    }

    pub fn set_output(&mut self, p: &Path) {
        self.output = Some(p.to_owned())
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
}
