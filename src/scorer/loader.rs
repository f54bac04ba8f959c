use crate::cipher::text::{decode_plain, plain_index, plain_symbols};
use crate::error::{AdfgvxError, AdfgvxResult};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Raw quadgram counts, keyed by four plaintext symbol indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadgramCounts {
    pub counts: HashMap<[u8; 4], u64>,
}

impl QuadgramCounts {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entries sorted by descending count, then by quadgram.
    pub fn sorted(&self) -> Vec<([u8; 4], u64)> {
        let mut entries: Vec<([u8; 4], u64)> = self.counts.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }
}

/// Counts every quadgram of a raw corpus after normalization (uppercase,
/// letters and digits only, word boundaries removed).
pub fn count_quadgrams(content: &str) -> QuadgramCounts {
    let symbols = plain_symbols(content);

    let mut counts: HashMap<[u8; 4], u64> = HashMap::new();
    for w in symbols.windows(4) {
        *counts.entry([w[0], w[1], w[2], w[3]]).or_default() += 1;
    }

    debug!(
        "Counted {} distinct quadgrams over {} symbols",
        counts.len(),
        symbols.len()
    );
    QuadgramCounts { counts }
}

/// Reads `QUAD<TAB>COUNT` lines. Lines that do not hold four plaintext
/// symbols and a non-negative integer are skipped.
pub fn load_counts<R: Read>(reader: R) -> AdfgvxResult<QuadgramCounts> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut counts: HashMap<[u8; 4], u64> = HashMap::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let rec = result?;
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }

        let quad: Vec<u8> = rec[0].trim().bytes().filter_map(plain_index).collect();
        if quad.len() != 4 || rec[0].trim().len() != 4 {
            skipped += 1;
            continue;
        }

        let count: u64 = match rec[1].trim().parse() {
            Ok(v) => v,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        *counts.entry([quad[0], quad[1], quad[2], quad[3]]).or_default() += count;
    }

    if skipped > 0 {
        debug!("Skipped {} malformed quadgram rows", skipped);
    }
    Ok(QuadgramCounts { counts })
}

pub fn load_counts_from_file<P: AsRef<Path>>(path: P) -> AdfgvxResult<QuadgramCounts> {
    let path = path.as_ref();
    info!("📚 Loading quadgrams from: {}", path.display());
    let file = File::open(path).map_err(|e| {
        AdfgvxError::Model(format!("could not open quadgram file '{}': {}", path.display(), e))
    })?;
    load_counts(file)
}

/// Writes counts in the format read by [`load_counts`], most frequent first.
pub fn write_counts<W: Write>(counts: &QuadgramCounts, writer: W) -> AdfgvxResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    for (quad, count) in counts.sorted() {
        wtr.write_record([decode_plain(&quad), count.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_count_quadgrams_normalizes_text() {
        let counts = count_quadgrams("ab cd, abcd!");
        // ABCDABCD -> ABCD x2, BCDA, CDAB, DABC
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.counts[&[0, 1, 2, 3]], 2);
    }

    #[test]
    fn test_load_counts_skips_bad_rows() {
        let data = "TION\t120\nthe\t40\nAND \t7\nIN_G\t3\nNESS\tmany\n";
        let counts = load_counts(Cursor::new(data)).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.total(), 120);
    }

    #[test]
    fn test_write_then_load_preserves_counts() {
        let counts = count_quadgrams("THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG1234");
        let mut buf = Vec::new();
        write_counts(&counts, &mut buf).unwrap();
        let back = load_counts(Cursor::new(buf)).unwrap();
        assert_eq!(back, counts);
    }
}
