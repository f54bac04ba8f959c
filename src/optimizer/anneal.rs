use super::{Metropolis, SearchBudget, SearchOutcome, Step, SwapNeighborhood};
use crate::cipher::SubstitutionAlphabet;
use crate::consts::{
    ABSOLUTE_ZERO, DEFAULT_ANNEAL_COOLING, DEFAULT_ANNEAL_STEPS, DEFAULT_ANNEAL_TEMPERATURE,
};
use crate::error::{invalid_input, AdfgvxResult};
use crate::scorer::Fitness;
use fastrand::Rng;
use serde::{Deserialize, Serialize};

/// Geometric cooling: `steps_per_level` trials at each temperature, then
/// `T *= cooling`, until `T <= ABSOLUTE_ZERO`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    pub initial_temperature: f64,
    pub cooling: f64,
    pub steps_per_level: usize,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: DEFAULT_ANNEAL_TEMPERATURE,
            cooling: DEFAULT_ANNEAL_COOLING,
            steps_per_level: DEFAULT_ANNEAL_STEPS,
        }
    }
}

impl AnnealSchedule {
    pub fn validate(&self) -> AdfgvxResult<()> {
        if !self.initial_temperature.is_finite() || self.initial_temperature < 0.0 {
            return Err(invalid_input!(
                "initial temperature must be finite and non-negative, got {}",
                self.initial_temperature
            ));
        }
        if !(self.cooling > 0.0 && self.cooling < 1.0) {
            return Err(invalid_input!(
                "cooling factor must lie strictly between 0 and 1, got {}",
                self.cooling
            ));
        }
        Ok(())
    }

    /// Temperature levels the schedule visits.
    pub fn levels(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut n = 0;
        while t > ABSOLUTE_ZERO {
            n += 1;
            t *= self.cooling;
        }
        n
    }
}

/// Simulated annealing from `initial`. Returns the best alphabet seen during
/// the walk, which is never worse than `initial`.
pub fn anneal<F: Fitness + ?Sized>(
    scorer: &F,
    text: &[u8],
    initial: &SubstitutionAlphabet,
    schedule: &AnnealSchedule,
    budget: SearchBudget,
    rng: &mut Rng,
) -> AdfgvxResult<SearchOutcome> {
    schedule.validate()?;
    let mut walk = SwapNeighborhood::new(scorer, text, initial, budget)?;
    let mut rule = Metropolis::new(schedule.initial_temperature, rng);

    'cool: while rule.temperature > ABSOLUTE_ZERO {
        for _ in 0..schedule.steps_per_level {
            let (a, b) = rule.random_pair();
            if let Step::Exhausted = walk.try_swap(a, b, &mut rule) {
                break 'cool;
            }
        }
        rule.temperature *= schedule.cooling;
    }

    Ok(walk.into_best())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_level_count() {
        // 0.01 * 0.99^n <= 1e-7  =>  n = ceil(ln(1e-5) / ln(0.99))
        assert_eq!(AnnealSchedule::default().levels(), 1146);
    }

    #[test]
    fn test_cold_start_has_no_levels() {
        let s = AnnealSchedule {
            initial_temperature: ABSOLUTE_ZERO,
            ..AnnealSchedule::default()
        };
        assert_eq!(s.levels(), 0);
    }

    #[test]
    fn test_invalid_schedules_are_rejected() {
        let base = AnnealSchedule::default();
        for bad in [
            AnnealSchedule { cooling: 1.0, ..base },
            AnnealSchedule { cooling: 0.0, ..base },
            AnnealSchedule { initial_temperature: f64::NAN, ..base },
            AnnealSchedule { initial_temperature: -1.0, ..base },
        ] {
            assert!(bad.validate().is_err());
        }
    }
}
