use super::{anneal, hill_climb, AnnealSchedule, SearchBudget, SearchOutcome};
use crate::cipher::SubstitutionAlphabet;
use crate::config::Config;
use crate::error::{AdfgvxError, AdfgvxResult};
use crate::scorer::Fitness;
use fastrand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
pub enum Strategy {
    /// First-improvement hill climb from each start.
    #[default]
    HillClimb,
    /// Annealing from each start, polished by a final hill climb.
    Anneal,
}

#[derive(Debug, Clone)]
pub struct OptimizationOptions {
    pub strategy: Strategy,
    pub restarts: usize,
    pub schedule: AnnealSchedule,
    /// Budget of every individual search.
    pub budget: SearchBudget,
    /// Wall-clock limit across all restarts.
    pub max_time: Option<Duration>,
    /// Seed the first restart with the frequency-order guess.
    pub frequency_start: bool,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for OptimizationOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            strategy: cfg.search.strategy,
            restarts: cfg.search.restarts,
            schedule: AnnealSchedule {
                initial_temperature: cfg.search.anneal_temperature,
                cooling: cfg.search.anneal_cooling,
                steps_per_level: cfg.search.anneal_steps,
            },
            budget: SearchBudget {
                max_evaluations: cfg.search.max_evaluations,
                max_time: None,
            },
            max_time: cfg.search.max_seconds.map(Duration::from_secs_f64),
            frequency_start: !cfg.search.no_frequency_start,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub alphabet: SubstitutionAlphabet,
    pub fitness: f64,
    pub evaluations: u64,
    pub restarts: usize,
}

/// Receives the result of every restart. Returning `false` stops the run.
pub trait ProgressCallback {
    fn on_restart(&self, restart: usize, fitness: f64, best: f64) -> bool;
}

impl<T: Fn(usize, f64, f64) -> bool> ProgressCallback for T {
    fn on_restart(&self, restart: usize, fitness: f64, best: f64) -> bool {
        self(restart, fitness, best)
    }
}

/// Runs the configured strategy from several starting alphabets and keeps the
/// fittest result.
pub struct Optimizer<'a, F: Fitness + ?Sized> {
    scorer: &'a F,
    options: OptimizationOptions,
}

impl<'a, F: Fitness + ?Sized> Optimizer<'a, F> {
    pub fn new(scorer: &'a F, options: OptimizationOptions) -> Self {
        Self { scorer, options }
    }

    pub fn options(&self) -> &OptimizationOptions {
        &self.options
    }

    /// One search with the configured strategy.
    pub fn search(
        &self,
        text: &[u8],
        start: &SubstitutionAlphabet,
        budget: SearchBudget,
        rng: &mut Rng,
    ) -> AdfgvxResult<SearchOutcome> {
        match self.options.strategy {
            Strategy::HillClimb => hill_climb(self.scorer, text, start, budget),
            Strategy::Anneal => {
                let annealed =
                    anneal(self.scorer, text, start, &self.options.schedule, budget, rng)?;
                if annealed.exhausted {
                    return Ok(annealed);
                }
                let mut polished = hill_climb(self.scorer, text, &annealed.alphabet, budget)?;
                polished.evaluations += annealed.evaluations;
                Ok(polished)
            }
        }
    }

    /// Restarts from `start` (if given), then from the frequency guess (if
    /// enabled), then from random alphabets.
    pub fn run<CB: ProgressCallback>(
        &self,
        text: &[u8],
        start: Option<&SubstitutionAlphabet>,
        rng: &mut Rng,
        callback: CB,
    ) -> AdfgvxResult<OptimizationResult> {
        let opts = &self.options;
        let started = Instant::now();
        let restarts = opts.restarts.max(1);

        let mut best: Option<SearchOutcome> = None;
        let mut evaluations = 0u64;
        let mut completed = 0;

        for restart in 0..restarts {
            let remaining = match opts.max_time {
                Some(limit) => {
                    let elapsed = started.elapsed();
                    if restart > 0 && elapsed >= limit {
                        debug!("Time limit reached after {} restarts", restart);
                        break;
                    }
                    Some(limit.saturating_sub(elapsed))
                }
                None => None,
            };
            let budget = SearchBudget {
                max_evaluations: opts.budget.max_evaluations,
                max_time: match (opts.budget.max_time, remaining) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                },
            };

            let initial = match (restart, start) {
                (0, Some(s)) => s.clone(),
                (0, None) if opts.frequency_start => SubstitutionAlphabet::frequency_guess(text),
                _ => SubstitutionAlphabet::random(rng),
            };

            let outcome = self.search(text, &initial, budget, rng)?;
            let fitness = outcome.fitness;
            evaluations += outcome.evaluations;
            completed += 1;

            let improved = best.as_ref().map_or(true, |b| fitness > b.fitness);
            debug!(
                "Restart {}/{}: fitness {:.4} ({} evals){}",
                restart + 1,
                restarts,
                fitness,
                outcome.evaluations,
                if improved { " *" } else { "" }
            );
            if improved {
                best = Some(outcome);
            }

            let best_fitness = best.as_ref().map_or(fitness, |b| b.fitness);
            if !callback.on_restart(restart, fitness, best_fitness) {
                debug!("Search aborted by callback after restart {}", restart + 1);
                break;
            }
        }

        let best = best.ok_or_else(|| AdfgvxError::Config("no restart was run".into()))?;

        Ok(OptimizationResult {
            alphabet: best.alphabet,
            fitness: best.fitness,
            evaluations,
            restarts: completed,
        })
    }
}
