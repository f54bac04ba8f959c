//! Local search over substitution alphabets.
//!
//! Both strategies walk the same neighborhood (swap the targets of two cipher
//! symbols) and differ only in the rule deciding whether a swap is kept.

pub mod anneal;
pub mod runner;

pub use self::anneal::{anneal, AnnealSchedule};
pub use self::runner::{OptimizationOptions, OptimizationResult, Optimizer, ProgressCallback, Strategy};

use crate::cipher::SubstitutionAlphabet;
use crate::consts::PLAIN_SYMBOLS;
use crate::error::{invalid_input, AdfgvxResult};
use crate::scorer::Fitness;
use fastrand::Rng;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Limits on a single search. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchBudget {
    pub max_evaluations: Option<u64>,
    pub max_time: Option<Duration>,
}

impl SearchBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn evaluations(n: u64) -> Self {
        Self {
            max_evaluations: Some(n),
            max_time: None,
        }
    }

    pub fn with_time(mut self, limit: Duration) -> Self {
        self.max_time = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub alphabet: SubstitutionAlphabet,
    pub fitness: f64,
    pub evaluations: u64,
    /// The search stopped on its budget rather than by converging.
    pub exhausted: bool,
}

/// Decides whether a neighbor with fitness `candidate` replaces the current
/// state with fitness `current`.
pub trait AcceptanceRule {
    fn accept(&mut self, current: f64, candidate: f64) -> bool;
}

/// Keeps a swap only if it raises fitness.
pub struct StrictImprovement;

impl AcceptanceRule for StrictImprovement {
    #[inline]
    fn accept(&mut self, current: f64, candidate: f64) -> bool {
        candidate > current
    }
}

/// Keeps a swap when `exp((candidate - current) / T)` exceeds a uniform draw.
pub struct Metropolis<'a> {
    pub temperature: f64,
    rng: &'a mut Rng,
}

impl<'a> Metropolis<'a> {
    pub fn new(temperature: f64, rng: &'a mut Rng) -> Self {
        Self { temperature, rng }
    }

    /// Two distinct symbol indices drawn uniformly.
    pub fn random_pair(&mut self) -> (usize, usize) {
        let a = self.rng.usize(0..PLAIN_SYMBOLS);
        let mut b = self.rng.usize(0..PLAIN_SYMBOLS - 1);
        if b >= a {
            b += 1;
        }
        (a, b)
    }
}

impl AcceptanceRule for Metropolis<'_> {
    #[inline]
    fn accept(&mut self, current: f64, candidate: f64) -> bool {
        ((candidate - current) / self.temperature).exp() > self.rng.f64()
    }
}

pub(crate) enum Step {
    Accepted,
    Rejected,
    Exhausted,
}

/// Current alphabet, its fitness, and the best state seen so far, advanced
/// one swap at a time.
pub struct SwapNeighborhood<'a, F: Fitness + ?Sized> {
    scorer: &'a F,
    text: &'a [u8],
    current: SubstitutionAlphabet,
    fitness: f64,
    best: SubstitutionAlphabet,
    best_fitness: f64,
    evaluations: u64,
    budget: SearchBudget,
    started: Instant,
    exhausted: bool,
}

impl<'a, F: Fitness + ?Sized> SwapNeighborhood<'a, F> {
    pub fn new(
        scorer: &'a F,
        text: &'a [u8],
        initial: &SubstitutionAlphabet,
        budget: SearchBudget,
    ) -> AdfgvxResult<Self> {
        if text.is_empty() {
            return Err(invalid_input!("cannot optimize an alphabet over empty text"));
        }
        if text.iter().any(|&s| s as usize >= PLAIN_SYMBOLS) {
            return Err(invalid_input!("text holds a symbol outside the plaintext alphabet"));
        }

        let fitness = scorer.fitness(text, initial);
        Ok(Self {
            scorer,
            text,
            current: initial.clone(),
            fitness,
            best: initial.clone(),
            best_fitness: fitness,
            evaluations: 1,
            budget,
            started: Instant::now(),
            exhausted: false,
        })
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    fn out_of_budget(&mut self) -> bool {
        if let Some(max) = self.budget.max_evaluations {
            if self.evaluations >= max {
                self.exhausted = true;
            }
        }
        if let Some(limit) = self.budget.max_time {
            if self.started.elapsed() >= limit {
                self.exhausted = true;
            }
        }
        self.exhausted
    }

    /// Swaps the targets of `a` and `b`, keeps the swap if `rule` accepts it,
    /// otherwise reverts.
    pub(crate) fn try_swap<R: AcceptanceRule>(&mut self, a: usize, b: usize, rule: &mut R) -> Step {
        if self.out_of_budget() {
            return Step::Exhausted;
        }

        self.current.swap(a, b);
        let candidate = self.scorer.fitness(self.text, &self.current);
        self.evaluations += 1;

        if rule.accept(self.fitness, candidate) {
            self.fitness = candidate;
            if candidate > self.best_fitness {
                self.best_fitness = candidate;
                self.best = self.current.clone();
            }
            Step::Accepted
        } else {
            self.current.swap(a, b);
            Step::Rejected
        }
    }

    /// Best state seen during the walk.
    pub fn into_best(self) -> SearchOutcome {
        SearchOutcome {
            alphabet: self.best,
            fitness: self.best_fitness,
            evaluations: self.evaluations,
            exhausted: self.exhausted,
        }
    }
}

/// First-improvement hill climb over pair swaps: scans pairs `(i, j)`, `i < j`,
/// in order, keeps the first strictly improving swap and restarts the scan. Stops after
/// a full scan without improvement or when the budget runs out.
pub fn hill_climb<F: Fitness + ?Sized>(
    scorer: &F,
    text: &[u8],
    initial: &SubstitutionAlphabet,
    budget: SearchBudget,
) -> AdfgvxResult<SearchOutcome> {
    let mut walk = SwapNeighborhood::new(scorer, text, initial, budget)?;
    let mut rule = StrictImprovement;

    'scan: loop {
        for i in 0..PLAIN_SYMBOLS {
            for j in (i + 1)..PLAIN_SYMBOLS {
                match walk.try_swap(i, j, &mut rule) {
                    Step::Accepted => continue 'scan,
                    Step::Rejected => {}
                    Step::Exhausted => break 'scan,
                }
            }
        }
        break;
    }

    Ok(walk.into_best())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rewards every symbol that maps to itself.
    struct FixedPoints;

    impl Fitness for FixedPoints {
        fn fitness(&self, _text: &[u8], alphabet: &SubstitutionAlphabet) -> f64 {
            alphabet
                .targets()
                .iter()
                .enumerate()
                .filter(|&(i, &t)| i == t as usize)
                .count() as f64
        }
    }

    #[test]
    fn test_hill_climb_reaches_identity_on_separable_fitness() {
        let mut rng = Rng::with_seed(7);
        let start = SubstitutionAlphabet::random(&mut rng);
        let out = hill_climb(&FixedPoints, &[0, 1, 2], &start, SearchBudget::unlimited()).unwrap();
        assert_eq!(out.alphabet, SubstitutionAlphabet::identity());
        assert_eq!(out.fitness, 36.0);
        assert!(!out.exhausted);
    }

    /// Fixed points again, with symbol 35 worth far more than the rest.
    struct HeavyLast;

    impl Fitness for HeavyLast {
        fn fitness(&self, text: &[u8], alphabet: &SubstitutionAlphabet) -> f64 {
            let heavy = if alphabet.targets()[35] == 35 { 100.0 } else { 0.0 };
            FixedPoints.fitness(text, alphabet) + heavy
        }
    }

    #[test]
    fn test_hill_climb_keeps_first_improving_swap() {
        let mut start = SubstitutionAlphabet::identity();
        start.swap(0, 1);
        start.swap(34, 35);

        // One swap allowed after the initial evaluation: the scan keeps (0, 1)
        // even though (34, 35) gains far more.
        let out = hill_climb(&HeavyLast, &[0], &start, SearchBudget::evaluations(2)).unwrap();
        assert_eq!(out.alphabet.targets()[0], 0);
        assert_eq!(out.alphabet.targets()[35], 34);
        assert_eq!(out.fitness, 34.0);
        assert!(out.exhausted);

        let out = hill_climb(&HeavyLast, &[0], &start, SearchBudget::unlimited()).unwrap();
        assert_eq!(out.alphabet, SubstitutionAlphabet::identity());
    }

    #[test]
    fn test_budget_caps_evaluations() {
        let mut rng = Rng::with_seed(3);
        let start = SubstitutionAlphabet::random(&mut rng);
        let out = hill_climb(&FixedPoints, &[0], &start, SearchBudget::evaluations(10)).unwrap();
        assert_eq!(out.evaluations, 10);
        assert!(out.exhausted);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let start = SubstitutionAlphabet::identity();
        assert!(hill_climb(&FixedPoints, &[], &start, SearchBudget::unlimited()).is_err());
    }

    #[test]
    fn test_random_pair_is_distinct() {
        let mut rng = Rng::with_seed(11);
        let mut rule = Metropolis::new(1.0, &mut rng);
        for _ in 0..1000 {
            let (a, b) = rule.random_pair();
            assert_ne!(a, b);
            assert!(a < PLAIN_SYMBOLS && b < PLAIN_SYMBOLS);
        }
    }
}
