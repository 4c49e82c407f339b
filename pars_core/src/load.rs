use std::fmt;

/// Mean count per position; None for an empty sequence
pub fn load(counts: &[f64]) -> Option<f64> {
    if counts.is_empty() {
        None
    } else {
        Some(counts.iter().sum::<f64>() / (counts.len() as f64))
    }
}

/// True if the load of `counts` is at least `threshold`.  Empty sequences never pass.
pub fn passes(counts: &[f64], threshold: f64) -> bool {
    load(counts).map(|l| l >= threshold).unwrap_or(false)
}

/// Reasons for excluding a transcript from a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    Empty,
    LengthMismatch(Vec<usize>),
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty count sequence"),
            Self::LengthMismatch(v) => {
                write!(f, "different transcript lengths (")?;
                for (i, l) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", l)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Check that all sequences have the same, non-zero, length
pub fn check_lengths(v: &[&[f64]]) -> Result<usize, Skip> {
    let l = v.first().map(|x| x.len()).unwrap_or(0);
    if v.iter().any(|x| x.len() != l) {
        Err(Skip::LengthMismatch(v.iter().map(|x| x.len()).collect()))
    } else if l == 0 {
        Err(Skip::Empty)
    } else {
        Ok(l)
    }
}
