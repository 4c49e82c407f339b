use std::io::Write;

use crate::{
    counts::CountStore,
    load::{check_lengths, passes},
};

/// Which positions to drop when pairing values from two stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    Keep,
    /// Drop positions that are zero in both stores
    DropBoth,
    /// Drop positions that are zero in either store
    DropAny,
}

impl ZeroPolicy {
    fn keep(&self, a: f64, b: f64) -> bool {
        match self {
            Self::Keep => true,
            Self::DropBoth => a != 0.0 || b != 0.0,
            Self::DropAny => a != 0.0 && b != 0.0,
        }
    }
}

/// Values for matching positions of transcripts common to two stores
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Paired {
    pub genes: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Paired {
    pub fn positions(&self) -> usize {
        self.x.len()
    }
}

/// Pair up positions of one transcript, applying the zero policy
pub fn pair_values(a: &[f64], b: &[f64], zp: ZeroPolicy) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b.iter())
        .filter(|(x, y)| zp.keep(**x, **y))
        .map(|(x, y)| (*x, *y))
        .unzip()
}

/// Concatenate values from all transcripts found in both stores (in the order of `a`).
/// Transcripts with different lengths in the two stores are reported and skipped.
pub fn pair_common(a: &CountStore, b: &CountStore, zp: ZeroPolicy) -> Paired {
    pair_common_loaded(a, b, zp, 0.0)
}

/// As [`pair_common`], but only using transcripts with load >= `min_load` in both stores
pub fn pair_common_loaded(
    a: &CountStore,
    b: &CountStore,
    zp: ZeroPolicy,
    min_load: f64,
) -> Paired {
    let mut p = Paired::default();
    for ta in a.iter() {
        if let Some(tb) = b.get(ta.id()) {
            if let Err(e) = check_lengths(&[ta.counts(), tb.counts()]) {
                warn!("Skipping {}: {}", ta.id(), e);
                continue;
            }
            if min_load > 0.0 && !(passes(ta.counts(), min_load) && passes(tb.counts(), min_load)) {
                continue;
            }
            p.genes += 1;
            let (x, y) = pair_values(ta.counts(), tb.counts(), zp);
            p.x.extend(x);
            p.y.extend(y);
        }
    }
    p
}

/// Number format for [`write_matrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Fixed3,
    Scientific,
}

/// Write a square matrix preceded by a commented title and column labels
pub fn write_matrix<W: Write>(
    wrt: &mut W,
    title: &str,
    labels: &[String],
    m: &[Vec<f64>],
    fmt: MatrixFormat,
) -> std::io::Result<()> {
    writeln!(wrt, "# {}", title)?;
    writeln!(wrt, "# {}", labels.join("\t"))?;
    for row in m.iter() {
        for (j, x) in row.iter().enumerate() {
            if j > 0 {
                write!(wrt, "\t")?;
            }
            match fmt {
                MatrixFormat::Fixed3 => write!(wrt, "{:.3}", x)?,
                MatrixFormat::Scientific => write!(wrt, "{:.6e}", x)?,
            }
        }
        writeln!(wrt)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::CountFormat;

    fn store(s: &str) -> CountStore {
        CountStore::from_reader(s.as_bytes(), CountFormat::Tab, "test").unwrap()
    }

    #[test]
    fn zero_policies() {
        let a = [0.0, 1.0, 0.0, 3.0];
        let b = [0.0, 0.0, 2.0, 4.0];
        assert_eq!(pair_values(&a, &b, ZeroPolicy::Keep).0.len(), 4);
        assert_eq!(
            pair_values(&a, &b, ZeroPolicy::DropBoth),
            (vec![1.0, 0.0, 3.0], vec![0.0, 2.0, 4.0])
        );
        assert_eq!(
            pair_values(&a, &b, ZeroPolicy::DropAny),
            (vec![3.0], vec![4.0])
        );
    }

    #[test]
    fn pairs_common_transcripts_only() {
        let a = store("g1\t1;2\ng2\t3;4;5\ng3\t1\n");
        let b = store("g3\t7\ng2\t3;4\ng1\t5;6\n");
        let p = pair_common(&a, &b, ZeroPolicy::Keep);
        // g2 has different lengths
        assert_eq!(p.genes, 2);
        assert_eq!(p.x, vec![1.0, 2.0, 1.0]);
        assert_eq!(p.y, vec![5.0, 6.0, 7.0]);
        assert_eq!(p.positions(), 3);
    }

    #[test]
    fn load_threshold_applies_to_both_stores() {
        let a = store("g1\t1;2\ng2\t4;4\ng3\t9;9\n");
        let b = store("g1\t5;6\ng2\t1;1\ng3\t3;3\n");
        let p = pair_common_loaded(&a, &b, ZeroPolicy::Keep, 2.0);
        assert_eq!(p.genes, 1);
        assert_eq!(p.y, vec![3.0, 3.0]);
        assert_eq!(
            pair_common_loaded(&a, &b, ZeroPolicy::Keep, 0.0),
            pair_common(&a, &b, ZeroPolicy::Keep)
        );
    }

    #[test]
    fn matrix_layout() {
        let mut out = Vec::new();
        let labels = vec!["a".to_owned(), "b".to_owned()];
        let m = vec![vec![1.0, 0.5], vec![12.0, 1.0]];
        write_matrix(&mut out, "Title", &labels, &m, MatrixFormat::Fixed3).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# Title\n# a\tb\n1.000\t0.500\n12.000\t1.000\n"
        );
    }
}
