use std::{
    io::{BufRead, Write},
    path::Path,
};

use anyhow::Context;

use pars_core::{open_output, Input};

/// Split each line on tabs and then on semicolons.  Each line gives one column.
pub fn read_columns<R: BufRead>(rdr: R) -> anyhow::Result<Vec<Vec<String>>> {
    let mut cols = Vec::new();
    for (i, l) in rdr.lines().enumerate() {
        let l = l.with_context(|| format!("Error reading line {}", i + 1))?;
        cols.push(
            l.trim_end_matches('\r')
                .split(['\t', ';'])
                .map(|s| s.to_owned())
                .collect(),
        )
    }
    Ok(cols)
}

/// Write columns as rows, padding short columns with empty cells
pub fn write_transposed<W: Write>(wrt: &mut W, cols: &[Vec<String>]) -> std::io::Result<()> {
    let n = cols.iter().map(|c| c.len()).max().unwrap_or(0);
    for i in 0..n {
        for (j, c) in cols.iter().enumerate() {
            if j > 0 {
                write!(wrt, "\t")?
            }
            if let Some(s) = c.get(i) {
                write!(wrt, "{}", s)?
            }
        }
        writeln!(wrt)?
    }
    Ok(())
}

pub fn transpose(input: &Input, output: Option<&Path>) -> anyhow::Result<()> {
    let cols = read_columns(input.bufreader()?)
        .with_context(|| format!("Error reading from {}", input))?;
    debug!("Read {} lines", cols.len());
    let mut wrt = open_output(output)?;
    write_transposed(&mut wrt, &cols)
        .and_then(|_| wrt.flush())
        .with_context(|| "Error writing output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_become_columns() {
        let cols = read_columns("g1\t1;2;3\ng2\t4\n".as_bytes()).unwrap();
        assert_eq!(cols[0], vec!["g1", "1", "2", "3"]);
        let mut out = Vec::new();
        write_transposed(&mut out, &cols).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "g1\tg2\n1\t4\n2\t\n3\t\n"
        );
    }

    #[test]
    fn empty_input() {
        let cols = read_columns("".as_bytes()).unwrap();
        let mut out = Vec::new();
        write_transposed(&mut out, &cols).unwrap();
        assert!(out.is_empty());
    }
}
