use std::{fmt, io::Write};

use crate::{
    counts::{write_joined, CountStore},
    load::{check_lengths, load},
};

/// Per position PARS score.
///
/// `Undefined` is written as a bare `0`, defined scores always with two decimals,
/// so the two can be told apart in the output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Defined(f64),
    Undefined,
}

impl Score {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(x) => Some(*x),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Defined(x) => write!(f, "{:.2}", x),
            Self::Undefined => write!(f, "0"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreParams {
    /// Minimum load in both libraries
    pub load_threshold: f64,
    /// Minimum combined reads at a position
    pub min_reads: f64,
    /// Minimum reads at a position in each library
    pub reads_per_sample: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            load_threshold: 1.0,
            min_reads: 0.0,
            reads_per_sample: 0.0,
        }
    }
}

impl ScoreParams {
    /// log2(v1 / s1) rounded to 2 decimal places, if the position has enough reads
    pub fn score(&self, s1: f64, v1: f64) -> Score {
        if s1 > 0.0
            && v1 > 0.0
            && s1 >= self.reads_per_sample
            && v1 >= self.reads_per_sample
            && s1 + v1 >= self.min_reads
        {
            // Difference of logs is exactly antisymmetric on swapping s1 and v1
            let x = v1.log2() - s1.log2();
            Score::Defined((x * 100.0).round() / 100.0)
        } else {
            Score::Undefined
        }
    }

    pub fn score_seq(&self, s1: &[f64], v1: &[f64]) -> Vec<Score> {
        s1.iter()
            .zip(v1.iter())
            .map(|(s, v)| self.score(*s, *v))
            .collect()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    /// Transcripts present in both libraries
    pub processed: usize,
    /// Transcripts passing the load filter in both libraries
    pub passed: usize,
}

/// Write PARS scores for all transcripts from `s1` that are also in `v1`
/// and pass the load filter in both.
///
/// Output format: id, number of positions, scores (';' separated), s1 load, v1 load
pub fn write_pars<W: Write>(
    wrt: &mut W,
    s1: &CountStore,
    v1: &CountStore,
    par: &ScoreParams,
) -> anyhow::Result<ScoreSummary> {
    let mut summ = ScoreSummary::default();
    for s in s1.iter() {
        let id = s.id();
        let v = match v1.get(id) {
            Some(v) => v,
            None => {
                trace!("{} not found in V1", id);
                continue;
            }
        };
        summ.processed += 1;
        trace!("{} {} {}", summ.processed, summ.passed, id);
        if let Err(e) = check_lengths(&[s.counts(), v.counts()]) {
            warn!("Skipping {}: {}", id, e);
            continue;
        }
        let (s_load, v_load) = match (load(s.counts()), load(v.counts())) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        if s_load < par.load_threshold || v_load < par.load_threshold {
            continue;
        }
        summ.passed += 1;
        let scores = par.score_seq(s.counts(), v.counts());
        write!(wrt, "{}\t{}\t", id, scores.len())?;
        write_joined(wrt, &scores)?;
        // Loads always carry a decimal point (10.0, 2.5)
        writeln!(wrt, "\t{:?}\t{:?}", s_load, v_load)?;
    }
    Ok(summ)
}
