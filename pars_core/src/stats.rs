use std::fmt;

use special::Beta;
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker, Statistics};

/// Correlation coefficient with two sided p-value and number of observations.
/// Both `r` and `p` are NaN if the correlation is not defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub r: f64,
    pub p: f64,
    pub n: usize,
}

impl Correlation {
    fn undefined(n: usize) -> Self {
        Self {
            r: f64::NAN,
            p: f64::NAN,
            n,
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.r.is_nan()
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}\t{:.6e}\t{}", self.r, self.p, self.n)
    }
}

/// Pearson correlation of x and y.  The slices must have the same length.
pub fn pearson(x: &[f64], y: &[f64]) -> Correlation {
    assert_eq!(x.len(), y.len(), "pearson(): slices differ in length");
    let n = x.len();
    if n < 3 {
        return Correlation::undefined(n);
    }
    let mx = x.iter().mean();
    let my = y.iter().mean();
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y.iter()) {
        let (dx, dy) = (a - mx, b - my);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return Correlation::undefined(n);
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    Correlation {
        r,
        p: cor_pvalue(r, n),
        n,
    }
}

/// Spearman rank correlation of x and y (ties get their average rank)
pub fn spearman(x: &[f64], y: &[f64]) -> Correlation {
    assert_eq!(x.len(), y.len(), "spearman(): slices differ in length");
    if x.len() < 3 {
        return Correlation::undefined(x.len());
    }
    let rx = Data::new(x.to_vec()).ranks(RankTieBreaker::Average);
    let ry = Data::new(y.to_vec()).ranks(RankTieBreaker::Average);
    pearson(&rx, &ry)
}

/// Two sided p-value for correlation coefficient r from n observations
/// using t = r * sqrt((n - 2) / (1 - r^2)) with n - 2 df
fn cor_pvalue(r: f64, n: usize) -> f64 {
    let df = (n - 2) as f64;
    if r.abs() >= 1.0 {
        0.0
    } else {
        let t = r * (df / (1.0 - r * r)).sqrt();
        pt(t.abs(), df, false)
            .map(|p| (2.0 * p).min(1.0))
            .unwrap_or(f64::NAN)
    }
}

/// Least squares line y = slope * x + intercept.  None if fewer than 2 points
/// or all x values are equal.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    assert_eq!(x.len(), y.len(), "linear_fit(): slices differ in length");
    if x.len() < 2 {
        return None;
    }
    let mx = x.iter().mean();
    let my = y.iter().mean();
    let (sxy, sxx) = x
        .iter()
        .zip(y.iter())
        .fold((0.0, 0.0), |(sxy, sxx), (a, b)| {
            (sxy + (a - mx) * (b - my), sxx + (a - mx) * (a - mx))
        });
    if sxx > 0.0 {
        let slope = sxy / sxx;
        Some((slope, my - slope * mx))
    } else {
        None
    }
}

/// Mean and population standard deviation; None if `v` is empty
pub fn mean_sd(v: &[f64]) -> Option<(f64, f64)> {
    if v.is_empty() {
        None
    } else {
        Some((v.iter().mean(), v.iter().population_std_dev()))
    }
}

/// Distribution function of Student's t with df degrees of freedom
pub fn pt(t: f64, df: f64, lower_tail: bool) -> anyhow::Result<f64> {
    if df <= 0.0 {
        Err(anyhow!("pt(): Invalid df {}", df))
    } else {
        let a = df * 0.5;
        let lbeta = a.ln_beta(0.5);
        let x = df / (df + t * t);
        let z = 0.5 * x.inc_beta(a, 0.5, lbeta);
        let flip = lower_tail ^ t.is_sign_negative();
        Ok(if flip { 1.0 - z } else { z })
    }
}

/// Perform multiple test correction for a p value vector using the FDR method
/// of Benjamini & Hochberg (1995).  NaN p values are ignored and give NaN q values.
pub fn fdr(p: &[f64]) -> Vec<f64> {
    let mut v: Vec<_> = p.iter().enumerate().filter(|(_, x)| !x.is_nan()).collect();
    v.sort_unstable_by(|a, b| a.1.total_cmp(b.1));
    let n = v.len() as f64;
    let mut min_p: f64 = 1.0;
    let mut q = vec![f64::NAN; p.len()];
    for (i, (k, p)) in v.iter().enumerate().rev() {
        min_p = min_p.min((n / ((i + 1) as f64)) * *p);
        q[*k] = min_p;
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn perfect_linear_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let c = pearson(&x, &y);
        assert!(close(c.r, 1.0, 1e-12));
        assert_eq!(c.p, 0.0);
        assert_eq!(c.n, 5);
    }

    #[test]
    fn pearson_matches_reference_values() {
        // R: cor.test(c(1,2,3,4,5), c(2,1,4,3,5))
        let c = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 5.0]);
        assert!(close(c.r, 0.8, 1e-12));
        assert!(close(c.p, 0.104089, 1e-5), "p = {}", c.p);
    }

    #[test]
    fn spearman_uses_ranks() {
        // Monotone but not linear
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [1.0, 10.0, 100.0, 1000.0, 10000.0];
        assert!(close(spearman(&x, &y).r, 1.0, 1e-12));
        let yr: Vec<f64> = y.iter().rev().copied().collect();
        assert!(close(spearman(&x, &yr).r, -1.0, 1e-12));
    }

    #[test]
    fn spearman_averages_ties() {
        // ranks of y: 1.5, 1.5, 3, 4
        let c = spearman(&[1.0, 2.0, 3.0, 4.0], &[0.0, 0.0, 5.0, 6.0]);
        let expected = 0.9486833; // pearson of (1,2,3,4) and (1.5,1.5,3,4)
        assert!(close(c.r, expected, 1e-6), "r = {}", c.r);
    }

    #[test]
    fn undefined_for_constant_or_short_input() {
        assert!(!pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_defined());
        assert!(!spearman(&[1.0, 2.0], &[2.0, 1.0]).is_defined());
    }

    #[test]
    fn t_distribution_tail() {
        // pt(2.0, 10, lower.tail = FALSE) in R
        assert!(close(pt(2.0, 10.0, false).unwrap(), 0.03669402, 1e-7));
        assert!(close(pt(-2.0, 10.0, true).unwrap(), 0.03669402, 1e-7));
        assert!(pt(1.0, 0.0, true).is_err());
    }

    #[test]
    fn fdr_correction() {
        let q = fdr(&[0.01, 0.04, f64::NAN, 0.03]);
        assert!(close(q[0], 0.03, 1e-12));
        assert!(close(q[1], 0.04, 1e-12));
        assert!(q[2].is_nan());
        assert!(close(q[3], 0.04, 1e-12));
    }

    #[test]
    fn least_squares_line() {
        let (a, b) = linear_fit(&[1.0, 2.0, 3.0, 4.0], &[3.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(close(a, 2.0, 1e-12));
        assert!(close(b, 1.0, 1e-12));
        let (a, b) = linear_fit(&[0.0, 1.0, 2.0], &[1.0, 0.0, 2.0]).unwrap();
        assert!(close(a, 0.5, 1e-12));
        assert!(close(b, 0.5, 1e-12));
        assert!(linear_fit(&[2.0, 2.0], &[1.0, 3.0]).is_none());
        assert!(linear_fit(&[1.0], &[1.0]).is_none());
    }

    #[test]
    fn mean_and_population_sd() {
        let (m, sd) = mean_sd(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(close(m, 5.0, 1e-12));
        assert!(close(sd, 2.0, 1e-12));
        assert!(mean_sd(&[]).is_none());
    }
}
