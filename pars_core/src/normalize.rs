use crate::{
    counts::{CountStore, Transcript},
    load::check_lengths,
};

/// Remove background estimated from a control library.
///
/// For each position the control count, as a fraction of the control library total,
/// is scaled to the size of the sample (and variant) library and subtracted.
/// Negative results are set to zero.  Only transcripts present in all three
/// stores (with matching lengths) are returned, in the order of `sample`.
pub fn normalize_by_control(
    sample: &CountStore,
    variant: &CountStore,
    control: &CountStore,
) -> anyhow::Result<(CountStore, CountStore)> {
    let (s_tot, v_tot, c_tot) = (
        sample.total_count(),
        variant.total_count(),
        control.total_count(),
    );
    if c_tot <= 0.0 {
        return Err(anyhow!("Control library has no counts"));
    }
    debug!(
        "Normalizing by control; library totals (x 10M reads) sample: {}, variant: {}, control: {}",
        s_tot,
        v_tot,
        c_tot
    );

    let mut s_norm = Vec::with_capacity(sample.len());
    let mut v_norm = Vec::with_capacity(sample.len());

    for s in sample.iter() {
        let id = s.id();
        let (v, c) = match (variant.get(id), control.get(id)) {
            (Some(v), Some(c)) => (v, c),
            _ => {
                trace!("{} not present in all libraries", id);
                continue;
            }
        };
        if let Err(e) = check_lengths(&[s.counts(), v.counts(), c.counts()]) {
            warn!("Skipping {} for normalization: {}", id, e);
            continue;
        }
        let (sn, vn): (Vec<_>, Vec<_>) = s
            .counts()
            .iter()
            .zip(v.counts().iter())
            .zip(c.counts().iter())
            .map(|((si, vi), ci)| {
                let cf = ci / c_tot;
                (
                    (si - cf * s_tot).max(0.0),
                    (vi - cf * v_tot).max(0.0),
                )
            })
            .unzip();
        s_norm.push(Transcript::new(id, sn, s.declared_len()));
        v_norm.push(Transcript::new(id, vn, v.declared_len()));
    }
    debug!(
        "{} of {} transcripts normalized",
        s_norm.len(),
        sample.len()
    );
    Ok((
        CountStore::from_transcripts(s_norm),
        CountStore::from_transcripts(v_norm),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counts::CountFormat;

    fn store(s: &str) -> CountStore {
        CountStore::from_reader(s.as_bytes(), CountFormat::Counts, "test").unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn subtracts_scaled_control() {
        // totals: sample 40, variant 20, control 10 (all / 1e7)
        let s = store("a\t2\t10;30\n");
        let v = store("a\t2\t10;10\n");
        let c = store("a\t2\t5;5\n");
        let (sn, vn) = normalize_by_control(&s, &v, &c).unwrap();
        // fraction = 0.5 at each position
        assert_close(sn.get("a").unwrap().counts(), &[0.0, 10.0]);
        assert_close(vn.get("a").unwrap().counts(), &[0.0, 0.0]);
    }

    #[test]
    fn output_never_negative() {
        let s = store("a\t3\t0;1;100\nb\t2\t3;3\n");
        let v = store("a\t3\t50;0;2\nb\t2\t0;9\n");
        let c = store("a\t3\t9;9;9\nb\t2\t100;1\n");
        let (sn, vn) = normalize_by_control(&s, &v, &c).unwrap();
        for st in [&sn, &vn] {
            assert_eq!(st.len(), 2);
            assert!(st.iter().flat_map(|t| t.counts().iter()).all(|x| *x >= 0.0));
        }
    }

    #[test]
    fn keeps_only_common_transcripts_with_equal_lengths() {
        let s = store("a\t1\t1\nb\t1\t1\nc\t2\t1;1\nd\t1\t4\n");
        let v = store("a\t1\t1\nc\t2\t1;1\nd\t1\t4\n");
        let c = store("a\t1\t1\nb\t1\t1\nc\t1\t1\nd\t1\t0\n");
        let (sn, vn) = normalize_by_control(&s, &v, &c).unwrap();
        let ids: Vec<_> = sn.iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids, vec!["a", "d"]);
        assert_eq!(vn.len(), 2);
        // inputs are unchanged
        assert_eq!(s.len(), 4);
        assert_eq!(s.get("d").unwrap().counts(), &[4.0]);
    }

    #[test]
    fn empty_control_is_an_error() {
        let s = store("a\t1\t1\n");
        let c = store("a\t1\t0\n");
        assert!(normalize_by_control(&s, &s, &c).is_err());
    }
}
