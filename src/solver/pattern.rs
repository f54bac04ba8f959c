//! Pairs every first-coordinate column with its second-coordinate partner and
//! orders the pairs.
//!
//! Two columns that hold the two coordinates of the same plaintext symbols
//! repeat values *together*: wherever a plaintext symbol recurs, both of its
//! coordinates recur at the same rows. The pairing score of two columns is
//! therefore the number of row pairs on which both columns repeat, minus the
//! number expected if the columns were independent. The same statistic over
//! consecutive pairs (a bigram of paired symbols) scores the pair order.

use crate::consts::{CIPHER_SYMBOLS, EXHAUSTIVE_PATTERN_LIMIT, PLAIN_SYMBOLS};
use crate::error::{invalid_input, AdfgvxResult};
use crate::solver::frequency::coincidences;
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

/// Matched partners: position `i` of `first` and of `second` hold the two
/// coordinate columns of the `i`-th symbol of every row. Indices refer to the
/// input groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub first: Vec<usize>,
    pub second: Vec<usize>,
    pub pairing_score: f64,
    pub order_score: f64,
}

impl PatternMatch {
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Same pairs, placed so that new position `k` holds old pair `order[k]`.
    pub fn reordered(&self, order: &[usize]) -> Self {
        Self {
            first: order.iter().map(|&k| self.first[k]).collect(),
            second: order.iter().map(|&k| self.second[k]).collect(),
            pairing_score: self.pairing_score,
            order_score: self.order_score,
        }
    }
}

/// Joint repeats of `u` and `v` in excess of independence, over their common
/// prefix. `u` takes values below `radix_u`, `v` below `radix_v`.
fn excess_coincidence(u: &[u8], v: &[u8], radix_u: usize, radix_v: usize) -> f64 {
    let n = u.len().min(v.len());
    if n < 2 {
        return 0.0;
    }

    let mut joint = vec![0u32; radix_u * radix_v];
    let mut cu = vec![0u32; radix_u];
    let mut cv = vec![0u32; radix_v];
    for r in 0..n {
        let (x, y) = (u[r] as usize, v[r] as usize);
        joint[x * radix_v + y] += 1;
        cu[x] += 1;
        cv[y] += 1;
    }

    let pairs = (n * (n - 1) / 2) as f64;
    let expected = coincidences(&cu) as f64 * coincidences(&cv) as f64 / pairs;
    coincidences(&joint) as f64 - expected
}

/// How strongly two coordinate columns behave as the two halves of one symbol.
fn pairing_score(x: &[u8], y: &[u8]) -> f64 {
    excess_coincidence(x, y, CIPHER_SYMBOLS, CIPHER_SYMBOLS)
}

/// Paired symbols of every row, `row_coord * 6 + col_coord`.
fn combine(x: &[u8], y: &[u8]) -> Vec<u8> {
    x.iter()
        .zip(y)
        .map(|(&r, &c)| r * CIPHER_SYMBOLS as u8 + c)
        .collect()
}

/// Finds the partner of every column of `a` in `b` and orders the pairs.
pub fn match_pattern<C: AsRef<[u8]>>(a: &[C], b: &[C]) -> AdfgvxResult<PatternMatch> {
    if a.len() != b.len() {
        return Err(invalid_input!(
            "column groups must have equal sizes ({} vs {})",
            a.len(),
            b.len()
        ));
    }
    if a.is_empty() {
        return Err(invalid_input!("column groups are empty"));
    }
    let symbols = a.iter().chain(b).flat_map(|c| c.as_ref().iter());
    if let Some(s) = symbols.copied().find(|&s| s as usize >= CIPHER_SYMBOLS) {
        return Err(invalid_input!("symbol {} is outside the cipher alphabet", s));
    }

    let m = a.len();
    let mut scores = vec![0.0f64; m * m];
    for i in 0..m {
        for j in 0..m {
            scores[i * m + j] = pairing_score(a[i].as_ref(), b[j].as_ref());
        }
    }

    let (partner, pairing_score) = best_assignment(&scores, m);
    debug!("Pairing: {:?} (score {:.1})", partner, pairing_score);

    let letters: Vec<Vec<u8>> = (0..m)
        .map(|i| combine(a[i].as_ref(), b[partner[i]].as_ref()))
        .collect();
    let (order, order_score) = best_order(&letters);
    debug!("Pair order: {:?} (score {:.1})", order, order_score);

    Ok(PatternMatch {
        first: order.clone(),
        second: order.iter().map(|&i| partner[i]).collect(),
        pairing_score,
        order_score,
    })
}

/// Permutation `p` maximizing `sum scores[i][p[i]]`.
fn best_assignment(scores: &[f64], m: usize) -> (Vec<usize>, f64) {
    let total = |p: &[usize]| -> f64 { p.iter().enumerate().map(|(i, &j)| scores[i * m + j]).sum() };

    if m <= EXHAUSTIVE_PATTERN_LIMIT {
        let mut best: Vec<usize> = (0..m).collect();
        let mut best_score = total(&best);
        for perm in (0..m).permutations(m) {
            let s = total(&perm);
            if s > best_score {
                best_score = s;
                best = perm;
            }
        }
        return (best, best_score);
    }

    // Greedy seed, then pairwise exchange until no swap of partners helps.
    let mut taken = vec![false; m];
    let mut assignment = vec![0usize; m];
    for i in 0..m {
        let j = (0..m)
            .filter(|&j| !taken[j])
            .max_by(|&x, &y| scores[i * m + x].total_cmp(&scores[i * m + y]))
            .unwrap_or(0);
        taken[j] = true;
        assignment[i] = j;
    }

    let mut improved = true;
    while improved {
        improved = false;
        for x in 0..m {
            for y in (x + 1)..m {
                let before = scores[x * m + assignment[x]] + scores[y * m + assignment[y]];
                let after = scores[x * m + assignment[y]] + scores[y * m + assignment[x]];
                if after > before {
                    assignment.swap(x, y);
                    improved = true;
                }
            }
        }
    }
    let s = total(&assignment);
    (assignment, s)
}

/// Score of reading the paired symbols in `order`: adjacent pairs within a
/// row, plus the last pair of each row followed by the first of the next.
fn order_score(letters: &[Vec<u8>], order: &[usize]) -> f64 {
    let mut score = 0.0;
    for w in order.windows(2) {
        score += excess_coincidence(&letters[w[0]], &letters[w[1]], PLAIN_SYMBOLS, PLAIN_SYMBOLS);
    }
    if let (Some(&last), Some(&first)) = (order.last(), order.first()) {
        if order.len() > 1 {
            let next_row = letters[first].get(1..).unwrap_or(&[]);
            score += excess_coincidence(&letters[last], next_row, PLAIN_SYMBOLS, PLAIN_SYMBOLS);
        }
    }
    score
}

fn best_order(letters: &[Vec<u8>]) -> (Vec<usize>, f64) {
    let m = letters.len();
    let identity: Vec<usize> = (0..m).collect();
    if m > EXHAUSTIVE_PATTERN_LIMIT {
        let s = order_score(letters, &identity);
        return (identity, s);
    }

    let mut best_score = order_score(letters, &identity);
    let mut best = identity;
    for perm in (0..m).permutations(m) {
        let s = order_score(letters, &perm);
        if s > best_score {
            best_score = s;
            best = perm;
        }
    }
    (best, best_score)
}
