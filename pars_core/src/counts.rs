use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    io::{BufRead, Write},
    path::Path,
    sync::Arc,
};

use anyhow::Context;

use crate::{get_next_line, load::passes, Input};

/// Library size scaling: total counts are reported in units of 10 million reads
pub const TOTAL_COUNT_SCALE: f64 = 1.0e7;

/// Layout of the input file.
///
/// Counts - `id <TAB> declared length <TAB> c1;c2;...;cN`
/// Tab - `id <TAB> c1;c2;...;cN`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFormat {
    Counts,
    Tab,
}

impl CountFormat {
    pub fn n_fields(&self) -> usize {
        match self {
            Self::Counts => 3,
            Self::Tab => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    id: Arc<str>,
    counts: Vec<f64>,
    declared_len: Option<usize>,
}

impl Transcript {
    pub fn new(id: &str, counts: Vec<f64>, declared_len: Option<usize>) -> Self {
        Self {
            id: Arc::from(id),
            counts,
            declared_len,
        }
    }

    pub fn id(&self) -> &Arc<str> {
        &self.id
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    pub fn declared_len(&self) -> Option<usize> {
        self.declared_len
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.counts.iter().sum()
    }

    pub fn n_nonzero(&self) -> usize {
        self.counts.iter().filter(|x| **x != 0.0).count()
    }
}

/// CountStore
///
/// Per transcript count sequences read from one input file.  Transcripts are
/// kept in input order and can be looked up by id.  Stores are not modified
/// after loading; filters and normalization produce new stores.
///
#[derive(Debug, Clone, Default)]
pub struct CountStore {
    transcripts: Vec<Transcript>,
    index: HashMap<Arc<str>, usize>,
    total: f64,
}

impl CountStore {
    /// Build a store from transcripts.  A repeated id replaces the earlier entry.
    pub fn from_transcripts<I: IntoIterator<Item = Transcript>>(it: I) -> Self {
        let mut store = Self::default();
        for t in it {
            store.insert(t);
        }
        store.total = store.transcripts.iter().map(|t| t.sum()).sum();
        store
    }

    fn insert(&mut self, t: Transcript) -> bool {
        match self.index.entry(Arc::clone(&t.id)) {
            Entry::Occupied(e) => {
                self.transcripts[*e.get()] = t;
                false
            }
            Entry::Vacant(e) => {
                e.insert(self.transcripts.len());
                self.transcripts.push(t);
                true
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(p: P, fmt: CountFormat) -> anyhow::Result<Self> {
        Self::from_input(&Input::Path(p.as_ref().to_owned()), fmt)
    }

    pub fn from_input(input: &Input, fmt: CountFormat) -> anyhow::Result<Self> {
        debug!("Reading counts from {}", input);
        let rdr = input.bufreader()?;
        Self::from_reader(rdr, fmt, &input.name())
    }

    /// Parse counts from `rdr`.  `name` is only used for messages.
    ///
    /// Malformed lines are reported and skipped; read errors are fatal.
    pub fn from_reader<R: BufRead>(mut rdr: R, fmt: CountFormat, name: &str) -> anyhow::Result<Self> {
        let mut buf = String::new();
        let mut line = 0;
        let mut skipped = 0;
        let mut store = Self::default();

        while let Some(fields) = get_next_line(&mut rdr, &mut buf)
            .with_context(|| format!("Error after reading {} lines from {}", line, name))?
        {
            line += 1;
            // Skip blank lines and comments
            if fields[0].is_empty() || fields[0].starts_with('#') {
                continue;
            }
            match parse_record(&fields, fmt) {
                Ok(t) => {
                    if let Some(d) = t.declared_len {
                        if d != t.len() {
                            warn!(
                                "{}:{} Declared length {} for {} does not match number of counts {}",
                                name,
                                line,
                                d,
                                t.id,
                                t.len()
                            )
                        }
                    }
                    store.total += t.sum();
                    let id = Arc::clone(&t.id);
                    if !store.insert(t) {
                        warn!("{}:{} Duplicate transcript {}; replacing earlier entry", name, line, id);
                        store.total = store.transcripts.iter().map(|t| t.sum()).sum();
                    }
                }
                Err(e) => {
                    skipped += 1;
                    warn!("{}:{} Skipping line: {:#}", name, line, e)
                }
            }
        }

        debug!(
            "Finished reading in {} lines from {}; found {} transcripts, skipped {} lines",
            line,
            name,
            store.len(),
            skipped
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transcript> {
        self.index.get(id).map(|ix| &self.transcripts[*ix])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.transcripts.iter()
    }

    /// Sum of all counts divided by 10 million
    pub fn total_count(&self) -> f64 {
        self.total / TOTAL_COUNT_SCALE
    }

    /// Keep the transcripts for which `f` returns true
    pub fn filter<F: FnMut(&Transcript) -> bool>(self, f: F) -> Self {
        Self::from_transcripts(self.transcripts.into_iter().filter(f))
    }

    /// Keep transcripts with load >= threshold.  A threshold of 0 keeps everything.
    pub fn filter_load(self, threshold: f64) -> Self {
        if threshold > 0.0 {
            self.filter(|t| passes(t.counts(), threshold))
        } else {
            self
        }
    }

    pub fn filter_ids(self, ids: &HashSet<String>) -> Self {
        self.filter(|t| ids.contains(t.id.as_ref()))
    }

    /// Keep transcripts with at least `n` non-zero positions
    pub fn filter_min_nonzero(self, n: usize) -> Self {
        self.filter(|t| t.n_nonzero() >= n)
    }

    /// Write store in the 3 column counts format
    pub fn write_counts<W: Write>(&self, wrt: &mut W) -> anyhow::Result<()> {
        for t in self.iter() {
            write!(wrt, "{}\t{}\t", t.id, t.declared_len.unwrap_or(t.len()))?;
            write_joined(wrt, t.counts())?;
            writeln!(wrt)?;
        }
        Ok(())
    }
}

/// Write values separated by ';'
pub fn write_joined<W: Write, T: std::fmt::Display>(wrt: &mut W, v: &[T]) -> std::io::Result<()> {
    let mut it = v.iter();
    if let Some(x) = it.next() {
        write!(wrt, "{}", x)?;
        for x in it {
            write!(wrt, ";{}", x)?;
        }
    }
    Ok(())
}

fn parse_record(fields: &[&str], fmt: CountFormat) -> anyhow::Result<Transcript> {
    let n = fmt.n_fields();
    if fields.len() != n {
        return Err(anyhow!("{} fields expected, but {} found", n, fields.len()));
    }
    let declared_len = match fmt {
        CountFormat::Counts => Some(
            fields[1]
                .parse::<usize>()
                .with_context(|| format!("Error reading length for {}", fields[0]))?,
        ),
        CountFormat::Tab => None,
    };
    let counts = parse_counts(fields[n - 1])
        .with_context(|| format!("Error reading counts for {}", fields[0]))?;
    Ok(Transcript::new(fields[0], counts, declared_len))
}

/// Parse a semicolon separated list of counts, ignoring leading or trailing ';'
pub fn parse_counts(s: &str) -> anyhow::Result<Vec<f64>> {
    let s = s.trim().trim_matches(';');
    if s.is_empty() {
        return Err(anyhow!("Empty count list"));
    }
    s.split(';')
        .map(|x| {
            let z = x
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Illegal count '{}'", x))?;
            if z >= 0.0 && z.is_finite() {
                Ok(z)
            } else {
                Err(anyhow!("Illegal count '{}'", x))
            }
        })
        .collect()
}

/// Read a 2 column tab file keeping only transcripts that are in `ids` (if given),
/// have a load of at least `min_load` and at least `min_nonzero` non-zero positions.
/// Zero values for `min_load` and `min_nonzero` disable the filters.
pub fn load_tab(
    input: &Input,
    ids: Option<&HashSet<String>>,
    min_load: f64,
    min_nonzero: usize,
) -> anyhow::Result<CountStore> {
    let mut store = CountStore::from_input(input, CountFormat::Tab)?;
    let n = store.len();
    if let Some(ids) = ids {
        store = store.filter_ids(ids)
    }
    store = store.filter_load(min_load).filter_min_nonzero(min_nonzero);
    debug!(
        "{}: {} of {} transcripts passed filters",
        input,
        store.len(),
        n
    );
    Ok(store)
}

/// Read a list of transcript ids, one per line (only the first field is used)
pub fn read_id_list<P: AsRef<Path>>(fname: P) -> anyhow::Result<HashSet<String>> {
    let fname = fname.as_ref();
    debug!("Reading in id list from {}", fname.display());
    let mut rdr = Input::Path(fname.to_owned()).bufreader()?;
    let mut buf = String::new();
    let mut line = 0;
    let mut ids = HashSet::new();

    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, fname.display()))?
    {
        line += 1;
        // Skip empty lines
        if !fields[0].is_empty() {
            ids.insert(fields[0].to_owned());
        }
    }
    debug!("Finished reading in {} lines; found {} ids", line, ids.len());
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(s: &str, fmt: CountFormat) -> CountStore {
        CountStore::from_reader(s.as_bytes(), fmt, "test").unwrap()
    }

    #[test]
    fn skips_line_with_wrong_field_count() {
        let s = store(
            "geneA\t3\t1;2;3\ngeneB\t2\t1;2\textra\ngeneC\t2\t4;4\n",
            CountFormat::Counts,
        );
        assert_eq!(s.len(), 2);
        assert!(!s.contains("geneB"));
        assert_eq!(s.get("geneC").unwrap().counts(), &[4.0, 4.0]);
    }

    #[test]
    fn strips_semicolons_and_skips_comments() {
        let s = store("# header\n\ngeneA\t;1;0;2;\n", CountFormat::Tab);
        let t = s.get("geneA").unwrap();
        assert_eq!(t.counts(), &[1.0, 0.0, 2.0]);
        assert_eq!(t.declared_len(), None);
    }

    #[test]
    fn rejects_non_numeric_and_negative_counts() {
        assert!(parse_counts("1;x;2").is_err());
        assert!(parse_counts("1;-2").is_err());
        assert!(parse_counts(";;").is_err());
        assert_eq!(parse_counts("0.5;3").unwrap(), vec![0.5, 3.0]);
    }

    #[test]
    fn total_count_in_units_of_ten_million() {
        let s = store("a\t2\t5000000;5000000\nb\t1\t10000000\n", CountFormat::Counts);
        assert_eq!(s.total_count(), 2.0);
    }

    #[test]
    fn duplicate_id_replaces_earlier_record() {
        let s = store("a\t1\t5\nb\t1\t1\na\t1\t7\n", CountFormat::Counts);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get("a").unwrap().counts(), &[7.0]);
        assert_eq!(s.iter().next().unwrap().id().as_ref(), "a");
        assert_eq!(s.total_count() * TOTAL_COUNT_SCALE, 8.0);
    }

    #[test]
    fn filters_return_new_stores() {
        let s = store("a\t0;0;1\nb\t2;2;2\nc\t0;0;0\n", CountFormat::Tab);
        let s = s.filter_min_nonzero(1);
        assert_eq!(s.len(), 2);
        let s = s.filter_load(1.0);
        assert_eq!(s.len(), 1);
        assert!(s.contains("b"));
        assert_eq!(s.total_count() * TOTAL_COUNT_SCALE, 6.0);
    }
}
