//! Splits the cipher columns into the two Polybius coordinate groups.
//!
//! Columns that carry the same coordinate (all row labels, or all column
//! labels) are samples of the same symbol distribution, so the partition
//! minimizing the summed within-group histogram mismatch is taken as the
//! coordinate split.

use crate::consts::EXHAUSTIVE_GROUPING_LIMIT;
use crate::error::{invalid_input, AdfgvxResult};
use crate::solver::frequency::{Histogram, HistogramMetric};
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

/// Column indices of each group, ascending, referring to the concatenation
/// of the two input sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub first: Vec<usize>,
    pub second: Vec<usize>,
    /// Summed pairwise mismatch inside both groups.
    pub mismatch: u64,
}

impl Partition {
    pub fn contains_first(&self, idx: usize) -> bool {
        self.first.contains(&idx)
    }
}

/// Regroups the histograms of `a` and `b` into two groups of sizes
/// `a.len()` and `b.len()`.
///
/// Exhaustive over every partition up to [`EXHAUSTIVE_GROUPING_LIMIT`]
/// columns; ties keep the first partition in lexicographic order. Beyond the
/// limit a best-swap descent starts from the input split.
pub fn group_columns(
    a: &[Histogram],
    b: &[Histogram],
    metric: HistogramMetric,
) -> AdfgvxResult<Partition> {
    if a.is_empty() || b.is_empty() {
        return Err(invalid_input!("both histogram sets must be non-empty"));
    }
    if a.len().abs_diff(b.len()) > 1 {
        return Err(invalid_input!(
            "histogram sets differ in size by more than one ({} vs {})",
            a.len(),
            b.len()
        ));
    }

    let all: Vec<Histogram> = a.iter().chain(b).copied().collect();
    let distances = DistanceMatrix::new(&all, metric);

    let partition = if all.len() <= EXHAUSTIVE_GROUPING_LIMIT {
        exhaustive(&distances, a.len())
    } else {
        swap_descent(&distances, a.len())
    };

    debug!(
        "Grouping: first={:?} second={:?} mismatch={}",
        partition.first, partition.second, partition.mismatch
    );
    Ok(partition)
}

struct DistanceMatrix {
    n: usize,
    cells: Vec<u64>,
}

impl DistanceMatrix {
    fn new(all: &[Histogram], metric: HistogramMetric) -> Self {
        let n = all.len();
        let mut cells = vec![0u64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = all[i].mismatch(&all[j], metric) as u64;
                cells[i * n + j] = d;
                cells[j * n + i] = d;
            }
        }
        Self { n, cells }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> u64 {
        self.cells[i * self.n + j]
    }

    fn within(&self, group: &[usize]) -> u64 {
        let mut sum = 0;
        for (x, &i) in group.iter().enumerate() {
            for &j in &group[x + 1..] {
                sum += self.get(i, j);
            }
        }
        sum
    }

    fn cost(&self, first: &[usize], second: &[usize]) -> u64 {
        self.within(first) + self.within(second)
    }
}

fn complement(n: usize, first: &[usize]) -> Vec<usize> {
    (0..n).filter(|i| !first.contains(i)).collect()
}

fn exhaustive(distances: &DistanceMatrix, first_size: usize) -> Partition {
    let n = distances.n;
    let mut best: Option<Partition> = None;

    for first in (0..n).combinations(first_size) {
        let second = complement(n, &first);
        let cost = distances.cost(&first, &second);
        if best.as_ref().map_or(true, |b| cost < b.mismatch) {
            best = Some(Partition {
                first,
                second,
                mismatch: cost,
            });
        }
    }

    // combinations() yields at least one subset since 0 < first_size < n
    best.unwrap_or_else(|| Partition {
        first: (0..first_size).collect(),
        second: (first_size..n).collect(),
        mismatch: 0,
    })
}

fn swap_descent(distances: &DistanceMatrix, first_size: usize) -> Partition {
    let n = distances.n;
    let mut first: Vec<usize> = (0..first_size).collect();
    let mut second: Vec<usize> = (first_size..n).collect();
    let mut cost = distances.cost(&first, &second);

    // Cost is a non-negative integer that strictly drops on every accepted swap.
    loop {
        let mut best_move: Option<(usize, usize, u64)> = None;
        for x in 0..first.len() {
            for y in 0..second.len() {
                std::mem::swap(&mut first[x], &mut second[y]);
                let candidate = distances.cost(&first, &second);
                std::mem::swap(&mut first[x], &mut second[y]);

                let improves = best_move.map_or(candidate < cost, |(_, _, c)| candidate < c);
                if improves {
                    best_move = Some((x, y, candidate));
                }
            }
        }

        match best_move {
            Some((x, y, c)) => {
                std::mem::swap(&mut first[x], &mut second[y]);
                cost = c;
            }
            None => break,
        }
    }

    first.sort_unstable();
    second.sort_unstable();
    Partition {
        first,
        second,
        mismatch: cost,
    }
}
