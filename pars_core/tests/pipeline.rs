use std::io::Write;
use std::path::{Path, PathBuf};

use rstest::*;
use tempfile::{NamedTempFile, TempDir};

use pars_core::{
    normalize_by_control, open_output, write_pars, CountFormat, CountStore, Input, ScoreParams,
};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let p = dir.join(name);
    let mut f = std::fs::File::create(&p).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    p
}

#[fixture]
fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "S1.counts",
        "geneA\t3\t10;0;20\ngeneB\t4\t1;2;3;4\ngeneC\t2\t0;0\n",
    );
    write_file(
        dir.path(),
        "V1.counts",
        "geneA\t3\t5;0;40\ngeneB\t4\t4;3;2;1\ngeneD\t1\t8\n",
    );
    write_file(
        dir.path(),
        "C0.counts",
        "geneA\t3\t1;1;1\ngeneB\t4\t0;0;0;0\n",
    );
    dir
}

#[rstest]
fn round_trip_reproduces_store(data_dir: TempDir) {
    let p = data_dir.path().join("S1.counts");
    let store = CountStore::from_path(&p, CountFormat::Counts).unwrap();

    let tmp = NamedTempFile::new().unwrap();
    let tmp_path = tmp.into_temp_path();
    {
        let mut wrt = open_output(Some(&*tmp_path)).unwrap();
        store.write_counts(&mut wrt).unwrap();
        wrt.flush().unwrap();
    }
    let copy = CountStore::from_path(&tmp_path, CountFormat::Counts).unwrap();
    assert_eq!(copy.len(), store.len());
    for (a, b) in store.iter().zip(copy.iter()) {
        assert_eq!(a, b);
    }
    assert_eq!(
        std::fs::read_to_string(&tmp_path).unwrap(),
        std::fs::read_to_string(&p).unwrap()
    );
}

#[rstest]
fn round_trip_keeps_fractional_values() {
    let s = "t1\t3\t0.5;1e-3;12.25\nt2\t2\t7;0\n";
    let store = CountStore::from_reader(s.as_bytes(), CountFormat::Counts, "mem").unwrap();
    let mut out = Vec::new();
    store.write_counts(&mut out).unwrap();
    let copy = CountStore::from_reader(out.as_slice(), CountFormat::Counts, "mem").unwrap();
    assert_eq!(copy.get("t1").unwrap().counts(), &[0.5, 0.001, 12.25]);
    assert_eq!(copy.get("t2").unwrap().declared_len(), Some(2));
}

#[rstest]
fn malformed_line_does_not_stop_reading(data_dir: TempDir) {
    let p = write_file(
        data_dir.path(),
        "bad.counts",
        "geneA\t3\t1;2;3\ngeneB\t3\t1;2;3\tnotes\ngeneC\t1\t5\n",
    );
    let store = CountStore::from_input(&Input::Path(p), CountFormat::Counts).unwrap();
    let ids: Vec<_> = store.iter().map(|t| t.id().to_string()).collect();
    assert_eq!(ids, vec!["geneA", "geneC"]);
}

#[rstest]
fn missing_file_is_fatal(data_dir: TempDir) {
    let p = data_dir.path().join("missing.counts");
    assert!(CountStore::from_path(p, CountFormat::Counts).is_err());
}

#[rstest]
fn pars_scores_from_files(data_dir: TempDir) {
    let s1 = CountStore::from_path(data_dir.path().join("S1.counts"), CountFormat::Counts).unwrap();
    let v1 = CountStore::from_path(data_dir.path().join("V1.counts"), CountFormat::Counts).unwrap();
    let par = ScoreParams {
        load_threshold: 0.0,
        min_reads: 0.0,
        reads_per_sample: 0.0,
    };
    let mut out = Vec::new();
    let summ = write_pars(&mut out, &s1, &v1, &par).unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines[0], "geneA\t3\t-1.00;0;1.00\t10.0\t15.0");
    assert_eq!(lines[1], "geneB\t4\t2.00;0.58;-0.58;-2.00\t2.5\t2.5");
    assert_eq!(lines.len(), 2);
    assert_eq!(summ.processed, 2);
    assert_eq!(summ.passed, 2);
}

#[rstest]
fn normalized_scores_from_files(data_dir: TempDir) {
    let s1 = CountStore::from_path(data_dir.path().join("S1.counts"), CountFormat::Counts).unwrap();
    let v1 = CountStore::from_path(data_dir.path().join("V1.counts"), CountFormat::Counts).unwrap();
    let c0 = CountStore::from_path(data_dir.path().join("C0.counts"), CountFormat::Counts).unwrap();
    let (s1n, v1n) = normalize_by_control(&s1, &v1, &c0).unwrap();
    assert_eq!(s1n.len(), 2);
    // No control reads for geneB so it is unchanged
    assert_eq!(s1n.get("geneB").unwrap().counts(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(v1n.get("geneB").unwrap().counts(), &[4.0, 3.0, 2.0, 1.0]);
    assert!(s1n
        .iter()
        .chain(v1n.iter())
        .all(|t| t.counts().iter().all(|x| *x >= 0.0)));

    let mut out = Vec::new();
    let summ = write_pars(&mut out, &s1n, &v1n, &ScoreParams::default()).unwrap();
    assert_eq!(summ.processed, 2);
    assert!(String::from_utf8(out).unwrap().contains("geneB\t4\t2.00;0.58;-0.58;-2.00"));
}
