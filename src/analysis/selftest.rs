//! Self-test: encrypts slices of known plaintext with a fresh random square
//! and key, runs the attack, and checks every stage against the truth.

use super::Analyzer;
use crate::cipher::text::decode_plain;
use crate::cipher::{encrypt, Grid, PolybiusSquare, SubstitutionAlphabet};
use crate::consts::{PLAIN_SYMBOLS, SUBSTITUTION_TRIAL_LENGTH};
use crate::error::{invalid_input, AdfgvxResult};
use crate::optimizer::Optimizer;
use crate::scorer::Fitness;
use fastrand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

/// Share of plaintext positions a full trial must reproduce to count as
/// recovered.
pub const RECOVERY_ACCURACY: f64 = 0.9;

/// How far a trial runs before it is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum TestLevel {
    Grouping,
    Pattern,
    #[default]
    Full,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrialReport {
    pub seed: u64,
    pub key: Vec<usize>,
    pub grouping_correct: bool,
    pub pairing_correct: Option<bool>,
    pub order_correct: Option<bool>,
    pub accuracy: Option<f64>,
    pub plaintext: Option<String>,
}

impl TrialReport {
    pub fn recovered(&self) -> bool {
        self.accuracy.is_some_and(|a| a >= RECOVERY_ACCURACY)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelfTestSummary {
    pub level: TestLevel,
    pub key_length: usize,
    pub trials: usize,
    pub grouping_correct: usize,
    pub pairing_correct: usize,
    pub order_correct: usize,
    pub recovered: usize,
    pub mean_accuracy: Option<f64>,
    pub reports: Vec<TrialReport>,
}

impl SelfTestSummary {
    fn tally(level: TestLevel, key_length: usize, reports: Vec<TrialReport>) -> Self {
        let accuracies: Vec<f64> = reports.iter().filter_map(|r| r.accuracy).collect();
        let mean_accuracy = if accuracies.is_empty() {
            None
        } else {
            Some(accuracies.iter().sum::<f64>() / accuracies.len() as f64)
        };

        Self {
            level,
            key_length,
            trials: reports.len(),
            grouping_correct: reports.iter().filter(|r| r.grouping_correct).count(),
            pairing_correct: reports.iter().filter(|r| r.pairing_correct == Some(true)).count(),
            order_correct: reports.iter().filter(|r| r.order_correct == Some(true)).count(),
            recovered: reports.iter().filter(|r| r.recovered()).count(),
            mean_accuracy,
            reports,
        }
    }
}

/// Picks a window of `len` symbols from the corpus.
fn sample<'c>(corpus: &'c [u8], len: usize, rng: &mut Rng) -> AdfgvxResult<&'c [u8]> {
    if len == 0 || corpus.len() < len {
        return Err(invalid_input!(
            "corpus of {} symbols cannot supply a {}-symbol sample",
            corpus.len(),
            len
        ));
    }
    let start = rng.usize(0..=corpus.len() - len);
    Ok(&corpus[start..start + len])
}

/// One encrypt-then-attack trial, seeded for reproducibility.
pub fn run_trial<F: Fitness + ?Sized>(
    analyzer: &Analyzer<'_, F>,
    corpus: &[u8],
    level: TestLevel,
    seed: u64,
) -> AdfgvxResult<TrialReport> {
    let mut rng = Rng::with_seed(seed);
    let params = &analyzer.config().analysis;
    let k = params.key_length;
    let plain = sample(corpus, k * params.times_key_length, &mut rng)?;

    let square = PolybiusSquare::random(&mut rng);
    let key = Grid::random_key(&mut rng, k);
    let cipher = encrypt(plain, &square, &key)?;

    let mut report = TrialReport {
        seed,
        key: key.clone(),
        ..TrialReport::default()
    };

    // Column i of the plaintext grid lands at key[i] and carries the row
    // coordinate when i is even.
    let mut row_columns: Vec<usize> = key.iter().step_by(2).copied().collect();
    row_columns.sort_unstable();
    let true_pairs: Vec<(usize, usize)> = key.chunks(2).map(|c| (c[0], c[1])).collect();

    let grid = analyzer.grid(&cipher, k)?;
    let partition = analyzer.group(&grid)?;
    report.grouping_correct = partition.first == row_columns || partition.second == row_columns;
    if !report.grouping_correct || level == TestLevel::Grouping {
        return Ok(report);
    }

    let structure = analyzer.pattern(&grid, partition)?;
    let oriented: Vec<(usize, usize)> = structure
        .pairs
        .iter()
        .map(|&(x, y)| if row_columns.contains(&x) { (x, y) } else { (y, x) })
        .collect();
    let mut found_set = oriented.clone();
    let mut true_set = true_pairs.clone();
    found_set.sort_unstable();
    true_set.sort_unstable();

    let pairing_correct = found_set == true_set;
    report.pairing_correct = Some(pairing_correct);
    report.order_correct = Some(oriented == true_pairs);
    if !pairing_correct || level == TestLevel::Pattern {
        return Ok(report);
    }

    let decryption = analyzer.decrypt(&cipher, k, &mut rng)?;
    let truth = decode_plain(plain);
    let matching = truth
        .bytes()
        .zip(decryption.plaintext.bytes())
        .filter(|(a, b)| a == b)
        .count();
    report.accuracy = Some(matching as f64 / plain.len() as f64);
    report.plaintext = Some(decryption.plaintext);
    Ok(report)
}

/// Runs `trials` independent trials in parallel. Trial `i` uses seed
/// `seed + i`; without a seed the base is drawn from fresh entropy.
pub fn run_self_test<F: Fitness + ?Sized>(
    analyzer: &Analyzer<'_, F>,
    corpus: &[u8],
    level: TestLevel,
    trials: usize,
    seed: Option<u64>,
) -> AdfgvxResult<SelfTestSummary> {
    let base = seed.unwrap_or_else(|| Rng::new().u64(..));
    let key_length = analyzer.config().analysis.key_length;
    info!(
        "🧪 Self-test: {} trials at level '{}' (key length {}, base seed {})",
        trials, level, key_length, base
    );

    let reports = (0..trials)
        .into_par_iter()
        .map(|i| {
            let r = run_trial(analyzer, corpus, level, base.wrapping_add(i as u64));
            if let Ok(report) = &r {
                debug!(
                    "Trial {}: grouping={} pairing={:?} order={:?} accuracy={:?}",
                    i,
                    report.grouping_correct,
                    report.pairing_correct,
                    report.order_correct,
                    report.accuracy
                );
            }
            r
        })
        .collect::<AdfgvxResult<Vec<TrialReport>>>()?;

    Ok(SelfTestSummary::tally(level, key_length, reports))
}

/// Outcome of one substitution-only trial.
#[derive(Debug, Clone, Serialize)]
pub struct SubstitutionReport {
    pub seed: u64,
    /// Symbols of the ciphertext whose plaintext was recovered.
    pub correct_mappings: usize,
    pub present_symbols: usize,
    pub fitness: f64,
    /// Fitness of the true decryption, for reference.
    pub true_fitness: f64,
}

/// Encrypts a short slice with a random monoalphabetic key and runs the
/// optimizer on it directly.
pub fn substitution_trial<F: Fitness + ?Sized>(
    scorer: &F,
    optimizer: &Optimizer<'_, F>,
    corpus: &[u8],
    seed: u64,
) -> AdfgvxResult<SubstitutionReport> {
    let mut rng = Rng::with_seed(seed);
    let plain = sample(corpus, SUBSTITUTION_TRIAL_LENGTH, &mut rng)?;

    let key = SubstitutionAlphabet::random(&mut rng);
    let cipher = key.transcribe(plain);
    let truth = key.inverse();

    let result = optimizer.run(&cipher, None, &mut rng, |_: usize, _: f64, _: f64| true)?;

    let mut present = [false; PLAIN_SYMBOLS];
    for &s in &cipher {
        present[s as usize] = true;
    }

    Ok(SubstitutionReport {
        seed,
        correct_mappings: result.alphabet.agreement(&truth, &cipher),
        present_symbols: present.iter().filter(|&&p| p).count(),
        fitness: result.fitness,
        true_fitness: scorer.fitness(&cipher, &truth),
    })
}

pub fn run_substitution_test<F: Fitness + ?Sized>(
    scorer: &F,
    optimizer: &Optimizer<'_, F>,
    corpus: &[u8],
    trials: usize,
    seed: Option<u64>,
) -> AdfgvxResult<Vec<SubstitutionReport>> {
    let base = seed.unwrap_or_else(|| Rng::new().u64(..));
    info!(
        "🧪 Substitution test: {} trials with {} (base seed {})",
        trials,
        optimizer.options().strategy,
        base
    );

    (0..trials)
        .into_par_iter()
        .map(|i| substitution_trial(scorer, optimizer, corpus, base.wrapping_add(i as u64)))
        .collect()
}
