//! Chains the stages of the attack: grid, grouping, pattern matching,
//! de-fractionation and substitution search, then refines the pair order
//! against the language model.

pub mod selftest;

pub use self::selftest::{SelfTestSummary, SubstitutionReport, TestLevel, TrialReport};

use crate::cipher::text::{decode_plain, encode_cipher};
use crate::cipher::{Grid, PolybiusSquare, SubstitutionAlphabet};
use crate::config::Config;
use crate::consts::{CIPHER_SYMBOLS, REFINEMENT_CANDIDATES};
use crate::error::{invalid_input, AdfgvxResult};
use crate::optimizer::{hill_climb, OptimizationOptions, Optimizer, ProgressCallback};
use crate::scorer::Fitness;
use crate::solver::{
    de_fraction, group_columns, index_of_coincidence, match_pattern, profile_columns, Partition,
    PatternMatch,
};
use fastrand::Rng;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

/// Everything the attack recovered from one ciphertext.
#[derive(Debug, Clone, Serialize)]
pub struct Decryption {
    pub plaintext: String,
    pub alphabet: SubstitutionAlphabet,
    pub fitness: f64,
    pub key_length: usize,
    pub partition: Partition,
    pub pattern: PatternMatch,
    /// Grid columns of every coordinate pair, in reading order.
    pub pairs: Vec<(usize, usize)>,
    pub index_of_coincidence: f64,
    pub evaluations: u64,
    pub refinement_rounds: usize,
}

/// Column structure found by the transposition stages.
#[derive(Debug, Clone)]
pub struct Structure {
    pub partition: Partition,
    pub pattern: PatternMatch,
    pub pairs: Vec<(usize, usize)>,
}

pub struct Analyzer<'a, F: Fitness + ?Sized> {
    scorer: &'a F,
    config: Config,
}

impl<'a, F: Fitness + ?Sized> Analyzer<'a, F> {
    pub fn new(scorer: &'a F, config: Config) -> Self {
        Self { scorer, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn scorer(&self) -> &F {
        self.scorer
    }

    pub fn optimizer(&self) -> Optimizer<'_, F> {
        Optimizer::new(self.scorer, OptimizationOptions::from(&self.config))
    }

    /// Recovers the plaintext of ADFGVX ciphertext given as letters.
    pub fn decrypt_text(
        &self,
        ciphertext: &str,
        key_length: usize,
        rng: &mut Rng,
    ) -> AdfgvxResult<Decryption> {
        self.decrypt(&encode_cipher(ciphertext)?, key_length, rng)
    }

    /// Recovers the plaintext of ciphertext given as cipher symbol indices.
    pub fn decrypt(
        &self,
        ciphertext: &[u8],
        key_length: usize,
        rng: &mut Rng,
    ) -> AdfgvxResult<Decryption> {
        self.decrypt_with_progress(ciphertext, key_length, rng, |_: usize, _: f64, _: f64| true)
    }

    pub fn decrypt_with_progress<CB: ProgressCallback>(
        &self,
        ciphertext: &[u8],
        key_length: usize,
        rng: &mut Rng,
        callback: CB,
    ) -> AdfgvxResult<Decryption> {
        let grid = self.grid(ciphertext, key_length)?;
        let structure = self.structure(&grid)?;
        let square = PolybiusSquare::standard();
        let text = defract_pairs(&grid, &structure.pairs, &square)?;

        let ioc = index_of_coincidence(&text);
        info!(
            "🧩 De-fractioned {} symbols (IoC {:.3}), searching substitution",
            text.len(),
            ioc
        );

        let optimizer = self.optimizer();
        let searched = optimizer.run(&text, None, rng, callback)?;
        info!(
            "🔑 Substitution fitness {:.4} after {} restarts",
            searched.fitness, searched.restarts
        );

        let mut pairs = structure.pairs.clone();
        let mut alphabet = searched.alphabet;
        let mut fitness = searched.fitness;
        let mut evaluations = searched.evaluations;
        let mut text = text;
        let mut rounds = 0;

        for round in 0..self.config.analysis.refinement_rounds {
            let Some(found) = self.refine_order(&grid, &pairs, &alphabet, fitness, &square)? else {
                break;
            };
            rounds = round + 1;
            evaluations += found.evaluations;
            info!(
                "↻ Pair order {:?} raised fitness {:.4} -> {:.4}",
                found.order, fitness, found.fitness
            );
            pairs = found.order.iter().map(|&k| pairs[k]).collect();
            alphabet = found.alphabet;
            fitness = found.fitness;
            text = found.text;
        }

        let plaintext = decode_plain(&alphabet.transcribe(&text));
        Ok(Decryption {
            plaintext,
            alphabet,
            fitness,
            key_length,
            partition: structure.partition,
            pattern: structure.pattern,
            pairs,
            index_of_coincidence: ioc,
            evaluations,
            refinement_rounds: rounds,
        })
    }

    /// Validates the key length and re-grids the ciphertext.
    pub fn grid(&self, ciphertext: &[u8], key_length: usize) -> AdfgvxResult<Grid> {
        if key_length < 2 || key_length % 2 != 0 {
            return Err(invalid_input!(
                "key length must be even and at least 2, got {}",
                key_length
            ));
        }
        if ciphertext.len() < key_length {
            return Err(invalid_input!(
                "ciphertext of {} symbols is shorter than the key length {}",
                ciphertext.len(),
                key_length
            ));
        }
        if ciphertext.iter().any(|&s| s as usize >= CIPHER_SYMBOLS) {
            return Err(invalid_input!("ciphertext holds a symbol outside ADFGVX"));
        }
        Grid::from_symbols(ciphertext, key_length)
    }

    /// Grouping, then pattern matching, on the columns of `grid`.
    pub fn structure(&self, grid: &Grid) -> AdfgvxResult<Structure> {
        let partition = self.group(grid)?;
        self.pattern(grid, partition)
    }

    /// Pairs and orders the columns of an already grouped grid.
    pub fn pattern(&self, grid: &Grid, partition: Partition) -> AdfgvxResult<Structure> {
        let cols = grid.columns();
        let first: Vec<&[u8]> = partition.first.iter().map(|&i| cols[i].as_slice()).collect();
        let second: Vec<&[u8]> = partition.second.iter().map(|&i| cols[i].as_slice()).collect();

        let pattern = match_pattern(&first, &second)?;
        let pairs: Vec<(usize, usize)> = pattern
            .first
            .iter()
            .zip(&pattern.second)
            .map(|(&x, &y)| (partition.first[x], partition.second[y]))
            .collect();
        debug!("Column pairs in reading order: {:?}", pairs);

        Ok(Structure {
            partition,
            pattern,
            pairs,
        })
    }

    /// Splits the columns into coordinate groups. The initial split is the
    /// left half against the right half of the grid.
    pub fn group(&self, grid: &Grid) -> AdfgvxResult<Partition> {
        let histograms = profile_columns(grid.columns())?;
        let half = grid.key_length() / 2;
        let (a, b) = histograms.split_at(half);
        for (i, h) in histograms.iter().enumerate() {
            debug!("Column {}: {}", i, h);
        }
        group_columns(a, b, self.config.analysis.metric)
    }

    /// Re-reads the grid in other pair orders and hill-climbs the most
    /// promising ones from `alphabet`. Returns the best strict improvement.
    fn refine_order(
        &self,
        grid: &Grid,
        pairs: &[(usize, usize)],
        alphabet: &SubstitutionAlphabet,
        fitness: f64,
        square: &PolybiusSquare,
    ) -> AdfgvxResult<Option<Refinement>> {
        let orders = candidate_orders(pairs.len(), self.config.analysis.refinement_limit);

        let mut ranked: Vec<(f64, Vec<usize>, Vec<u8>)> = Vec::with_capacity(orders.len());
        for order in orders {
            let reordered: Vec<(usize, usize)> = order.iter().map(|&k| pairs[k]).collect();
            let text = defract_pairs(grid, &reordered, square)?;
            let direct = self.scorer.fitness(&text, alphabet);
            ranked.push((direct, order, text));
        }
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let budget = OptimizationOptions::from(&self.config).budget;
        let mut best: Option<Refinement> = None;
        for (_, order, text) in ranked.into_iter().take(REFINEMENT_CANDIDATES) {
            let out = hill_climb(self.scorer, &text, alphabet, budget)?;
            let bar = best.as_ref().map_or(fitness, |b| b.fitness);
            if out.fitness > bar {
                best = Some(Refinement {
                    order,
                    alphabet: out.alphabet,
                    fitness: out.fitness,
                    evaluations: out.evaluations,
                    text,
                });
            }
        }
        Ok(best)
    }
}

struct Refinement {
    order: Vec<usize>,
    alphabet: SubstitutionAlphabet,
    fitness: f64,
    evaluations: u64,
    text: Vec<u8>,
}

/// De-fractions the grid reading the given column pairs in order.
pub fn defract_pairs(
    grid: &Grid,
    pairs: &[(usize, usize)],
    square: &PolybiusSquare,
) -> AdfgvxResult<Vec<u8>> {
    let cols = grid.columns();
    let first: Vec<&[u8]> = pairs.iter().map(|&(x, _)| cols[x].as_slice()).collect();
    let second: Vec<&[u8]> = pairs.iter().map(|&(_, y)| cols[y].as_slice()).collect();
    de_fraction(&first, &second, square)
}

/// Non-identity reorderings of `m` pairs: every permutation when there are at
/// most `limit`, otherwise every single transposition and rotation.
fn candidate_orders(m: usize, limit: usize) -> Vec<Vec<usize>> {
    let identity: Vec<usize> = (0..m).collect();
    let total = (1..=m).try_fold(1usize, |acc, x| acc.checked_mul(x));

    if total.is_some_and(|t| t <= limit) {
        return (0..m)
            .permutations(m)
            .filter(|p| *p != identity)
            .collect();
    }

    let mut orders = Vec::new();
    for (i, j) in (0..m).tuple_combinations() {
        let mut o = identity.clone();
        o.swap(i, j);
        orders.push(o);
    }
    for shift in 1..m {
        let mut o = identity.clone();
        o.rotate_left(shift);
        if !orders.contains(&o) {
            orders.push(o);
        }
    }
    orders
}
