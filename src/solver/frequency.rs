use crate::consts::{CIPHER_ALPHABET, CIPHER_SYMBOLS, PLAIN_SYMBOLS};
use crate::error::{invalid_input, AdfgvxResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::{Display, EnumString};

/// Occurrence count of every cipher symbol in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Histogram {
    pub counts: [u32; CIPHER_SYMBOLS],
}

/// How far apart two histograms are. Both metrics are zero for identical
/// histograms and symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum HistogramMetric {
    /// Sum of per-symbol absolute differences.
    #[default]
    Aligned,
    /// Sum of absolute differences after sorting both count vectors, i.e. the
    /// best relabelling of the alphabet.
    Sorted,
}

impl Histogram {
    pub fn of(column: &[u8]) -> AdfgvxResult<Self> {
        let mut counts = [0u32; CIPHER_SYMBOLS];
        for &s in column {
            let slot = counts
                .get_mut(s as usize)
                .ok_or_else(|| invalid_input!("symbol {} is outside the cipher alphabet", s))?;
            *slot += 1;
        }
        Ok(Self { counts })
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn mismatch(&self, other: &Histogram, metric: HistogramMetric) -> u32 {
        match metric {
            HistogramMetric::Aligned => l1(&self.counts, &other.counts),
            HistogramMetric::Sorted => {
                let mut a = self.counts;
                let mut b = other.counts;
                a.sort_unstable();
                b.sort_unstable();
                l1(&a, &b)
            }
        }
    }
}

fn l1(a: &[u32; CIPHER_SYMBOLS], b: &[u32; CIPHER_SYMBOLS]) -> u32 {
    a.iter().zip(b).map(|(x, y)| x.abs_diff(*y)).sum()
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, c) in self.counts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", CIPHER_ALPHABET[i] as char, c)?;
        }
        write!(f, "}}")
    }
}

/// Histogram of every column, in column order.
pub fn profile_columns<C: AsRef<[u8]>>(columns: &[C]) -> AdfgvxResult<Vec<Histogram>> {
    columns.iter().map(|c| Histogram::of(c.as_ref())).collect()
}

/// Number of unordered position pairs `(r, s)` holding the same value,
/// given the per-value counts.
#[inline]
pub fn coincidences(counts: &[u32]) -> u64 {
    counts
        .iter()
        .map(|&c| c as u64 * (c as u64).saturating_sub(1) / 2)
        .sum()
}

/// Index of coincidence of a plaintext-alphabet text, normalized so that
/// uniformly random text scores about 1.0.
pub fn index_of_coincidence(text: &[u8]) -> f64 {
    if text.len() < 2 {
        return 0.0;
    }
    let mut counts = [0u32; PLAIN_SYMBOLS];
    for &s in text {
        counts[s as usize] += 1;
    }
    let n = text.len() as f64;
    let pairs = coincidences(&counts) as f64 * 2.0;
    pairs * PLAIN_SYMBOLS as f64 / (n * (n - 1.0))
}
