use std::{collections::BTreeMap, io::BufRead, str::FromStr};

use anyhow::Context;

use pars_core::get_next_line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    Minus,
}

impl FromStr for Strand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Plus),
            "-" => Ok(Self::Minus),
            _ => Err(anyhow!("Illegal strand '{}'", s)),
        }
    }
}

/// Per base counts for one transcript, stored by interval start
#[derive(Debug)]
pub struct TranscriptCov {
    strand: Strand,
    intervals: BTreeMap<u64, Vec<u64>>,
}

impl TranscriptCov {
    fn new(strand: Strand) -> Self {
        Self {
            strand,
            intervals: BTreeMap::new(),
        }
    }

    /// Counts for the whole transcript.  Intervals are concatenated
    /// in order of start coordinate, reversed for transcripts on the minus strand.
    pub fn counts(&self) -> Vec<u64> {
        let mut v = Vec::new();
        match self.strand {
            Strand::Plus => self.intervals.values().for_each(|x| v.extend_from_slice(x)),
            Strand::Minus => self
                .intervals
                .values()
                .rev()
                .for_each(|x| v.extend_from_slice(x)),
        }
        v
    }
}

struct Record<'a> {
    transcript: &'a str,
    start: u64,
    strand: &'a str,
    count: u64,
}

/// Input fields: chrom, start, end, transcript, score, strand, position, count
fn parse_record<'a>(fields: &[&'a str]) -> anyhow::Result<Record<'a>> {
    if fields.len() != 8 {
        return Err(anyhow!("8 fields expected, but {} found", fields.len()));
    }
    let start = fields[1]
        .parse::<u64>()
        .with_context(|| format!("Error reading start '{}'", fields[1]))?;
    let end = fields[2]
        .parse::<u64>()
        .with_context(|| format!("Error reading end '{}'", fields[2]))?;
    if end < start {
        return Err(anyhow!("Interval end {} before start {}", end, start));
    }
    fields[6]
        .parse::<u64>()
        .with_context(|| format!("Error reading position '{}'", fields[6]))?;
    let count = fields[7]
        .parse::<u64>()
        .with_context(|| format!("Error reading count '{}'", fields[7]))?;
    Ok(Record {
        transcript: fields[3],
        start,
        strand: fields[5],
        count,
    })
}

/// Read per base coverage records, grouping by transcript
///
/// Malformed lines are skipped with a warning.  A missing or illegal strand,
/// or a transcript with records on both strands, is an error.
pub fn read_coverage<R: BufRead>(
    mut rdr: R,
    name: &str,
) -> anyhow::Result<BTreeMap<String, TranscriptCov>> {
    let mut buf = String::new();
    let mut line = 0;
    let mut tr_hash: BTreeMap<String, TranscriptCov> = BTreeMap::new();

    while let Some(fields) = get_next_line(&mut rdr, &mut buf)
        .with_context(|| format!("Error after reading {} lines from {}", line, name))?
    {
        line += 1;
        if fields[0].is_empty() || fields[0].starts_with('#') {
            continue;
        }
        let rec = match parse_record(&fields) {
            Ok(r) => r,
            Err(e) => {
                warn!("{}:{} Skipping line: {:#}", name, line, e);
                continue;
            }
        };
        let strand = rec
            .strand
            .parse::<Strand>()
            .with_context(|| format!("{}:{} Invalid strand for {}", name, line, rec.transcript))?;
        let tc = tr_hash
            .entry(rec.transcript.to_owned())
            .or_insert_with(|| {
                trace!("Adding transcript {}", rec.transcript);
                TranscriptCov::new(strand)
            });
        if tc.strand != strand {
            return Err(anyhow!(
                "{}:{} Inconsistent strand for transcript {}",
                name,
                line,
                rec.transcript
            ));
        }
        tc.intervals.entry(rec.start).or_default().push(rec.count);
    }
    debug!(
        "Finished reading in {} lines from {}; found {} transcripts",
        line,
        name,
        tr_hash.len()
    );
    Ok(tr_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COV: &str = "\
chrI\t100\t103\tT1\t.\t+\t1\t5
chrI\t100\t103\tT1\t.\t+\t2\t6
chrI\t100\t103\tT1\t.\t+\t3\t7
chrI\t50\t52\tT1\t.\t+\t1\t1
chrI\t50\t52\tT1\t.\t+\t2\t2
chrII\t10\t12\tT2\t.\t-\t1\t8
chrII\t10\t12\tT2\t.\t-\t2\t9
chrII\t20\t21\tT2\t.\t-\t1\t3
";

    #[test]
    fn groups_intervals_by_strand() {
        let h = read_coverage(COV.as_bytes(), "test").unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h["T1"].counts(), vec![1, 2, 5, 6, 7]);
        assert_eq!(h["T2"].strand, Strand::Minus);
        assert_eq!(h["T2"].counts(), vec![3, 8, 9]);
    }

    #[test]
    fn skips_malformed_lines() {
        let s = "chrI\t0\t2\tT1\t.\t+\t1\t4\nchrI\t0\t2\tT1\t.\t+\t2\nchrI\t0\t2\tT1\t.\t+\t2\tx\nchrI\t0\t2\tT1\t.\t+\t2\t3\n";
        let h = read_coverage(s.as_bytes(), "test").unwrap();
        assert_eq!(h["T1"].counts(), vec![4, 3]);
    }

    #[test]
    fn missing_strand_is_fatal() {
        let s = "chrI\t0\t2\tT1\t.\t.\t1\t4\n";
        assert!(read_coverage(s.as_bytes(), "test").is_err());
    }

    #[test]
    fn inconsistent_strand_is_fatal() {
        let s = "chrI\t0\t2\tT1\t.\t+\t1\t4\nchrI\t5\t6\tT1\t.\t-\t1\t4\n";
        assert!(read_coverage(s.as_bytes(), "test").is_err());
    }
}
