use crate::consts::{
    DEFAULT_ANNEAL_COOLING, DEFAULT_ANNEAL_STEPS, DEFAULT_ANNEAL_TEMPERATURE, DEFAULT_KEY_LENGTH,
    DEFAULT_ORDER_REFINEMENT_LIMIT, DEFAULT_RESTARTS, DEFAULT_TIMES_KEY_LENGTH,
    MAX_REFINEMENT_ROUNDS,
};
use crate::error::{AdfgvxError, AdfgvxResult};
use crate::optimizer::Strategy;
use crate::solver::HistogramMetric;
use clap::Args;

#[derive(Args, Debug, Clone, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub analysis: AnalysisParams,
}

#[derive(Args, Debug, Clone)]
pub struct SearchParams {
    #[arg(long, default_value_t = Strategy::HillClimb)]
    pub strategy: Strategy,
    #[arg(long, default_value_t = DEFAULT_RESTARTS)]
    pub restarts: usize,
    #[arg(long, default_value_t = DEFAULT_ANNEAL_TEMPERATURE)]
    pub anneal_temperature: f64,
    #[arg(long, default_value_t = DEFAULT_ANNEAL_COOLING)]
    pub anneal_cooling: f64,
    #[arg(long, default_value_t = DEFAULT_ANNEAL_STEPS)]
    pub anneal_steps: usize,

    /// Fitness evaluations allowed per individual search
    #[arg(long)]
    pub max_evaluations: Option<u64>,
    /// Wall-clock limit of the substitution search, in seconds
    #[arg(long)]
    pub max_seconds: Option<f64>,

    /// Start every restart from a random alphabet
    #[arg(long, default_value_t = false)]
    pub no_frequency_start: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AnalysisParams {
    #[arg(long, default_value_t = DEFAULT_KEY_LENGTH)]
    pub key_length: usize,
    /// Self-test plaintext length as a multiple of the key length
    #[arg(long, default_value_t = DEFAULT_TIMES_KEY_LENGTH)]
    pub times_key_length: usize,
    #[arg(long, default_value_t = HistogramMetric::Aligned)]
    pub metric: HistogramMetric,
    /// Largest number of pair orderings re-scored by the language model
    #[arg(long, default_value_t = DEFAULT_ORDER_REFINEMENT_LIMIT)]
    pub refinement_limit: usize,
    #[arg(long, default_value_t = MAX_REFINEMENT_ROUNDS)]
    pub refinement_rounds: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            restarts: DEFAULT_RESTARTS,
            anneal_temperature: DEFAULT_ANNEAL_TEMPERATURE,
            anneal_cooling: DEFAULT_ANNEAL_COOLING,
            anneal_steps: DEFAULT_ANNEAL_STEPS,
            max_evaluations: None,
            max_seconds: None,
            no_frequency_start: false,
        }
    }
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            times_key_length: DEFAULT_TIMES_KEY_LENGTH,
            metric: HistogramMetric::default(),
            refinement_limit: DEFAULT_ORDER_REFINEMENT_LIMIT,
            refinement_rounds: MAX_REFINEMENT_ROUNDS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> AdfgvxResult<()> {
        if self.search.restarts == 0 {
            return Err(AdfgvxError::Config("--restarts must be at least 1".into()));
        }
        if let Some(secs) = self.search.max_seconds {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(AdfgvxError::Config(format!(
                    "--max-seconds must be positive, got {}",
                    secs
                )));
            }
        }
        if self.analysis.times_key_length == 0 {
            return Err(AdfgvxError::Config(
                "--times-key-length must be at least 1".into(),
            ));
        }
        if !(self.search.anneal_cooling > 0.0 && self.search.anneal_cooling < 1.0) {
            return Err(AdfgvxError::Config(format!(
                "--anneal-cooling must lie strictly between 0 and 1, got {}",
                self.search.anneal_cooling
            )));
        }
        Ok(())
    }
}
