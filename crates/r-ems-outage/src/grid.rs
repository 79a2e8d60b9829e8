//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Discrete time grid shared by the outage generators."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use serde::Serialize;

use crate::errors::{OutageError, Result};

/// Largest step count a grid may hold.
pub const MAX_STEPS: usize = 100_000_000;

/// Ordered set of `floor(horizon / step)` discrete steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeGrid {
    horizon: f64,
    step: f64,
    steps: usize,
}

impl TimeGrid {
    pub fn new(horizon: f64, step: f64) -> Result<Self> {
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(OutageError::InvalidHorizon(horizon));
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(OutageError::InvalidStep(step));
        }
        let quotient = (horizon / step).floor();
        if quotient > MAX_STEPS as f64 {
            return Err(OutageError::GridTooLarge { horizon, step });
        }
        let steps = quotient as usize;
        Ok(Self {
            horizon,
            step,
            steps,
        })
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of steps on the grid.
    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Offset of every step from the start of the horizon.
    pub fn offsets(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |index| index as f64 * self.step)
    }
}

/// Reject probabilities outside `[0, 1]`, including NaN.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(OutageError::ProbabilityOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_grid_over_three_years() {
        let grid = TimeGrid::new(3.0, 1.0 / 12.0).unwrap();
        assert_eq!(grid.len(), 36);
    }

    #[test]
    fn trading_day_grid_over_three_years() {
        let grid = TimeGrid::new(3.0, 1.0 / 252.0).unwrap();
        assert_eq!(grid.len(), 756);
    }

    #[test]
    fn partial_step_is_truncated() {
        let grid = TimeGrid::new(2.5, 1.0).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.offsets().collect::<Vec<_>>(), vec![0.0, 1.0]);
    }

    #[test]
    fn horizon_shorter_than_step_is_empty() {
        let grid = TimeGrid::new(0.5, 1.0).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert_eq!(
            TimeGrid::new(0.0, 1.0).unwrap_err(),
            OutageError::InvalidHorizon(0.0)
        );
        assert_eq!(
            TimeGrid::new(1.0, -0.1).unwrap_err(),
            OutageError::InvalidStep(-0.1)
        );
        assert!(TimeGrid::new(f64::INFINITY, 1.0).is_err());
        assert!(TimeGrid::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn oversized_grid_is_rejected() {
        assert_eq!(
            TimeGrid::new(1e300, 1e-300).unwrap_err(),
            OutageError::GridTooLarge {
                horizon: 1e300,
                step: 1e-300
            }
        );
        assert!(TimeGrid::new(f64::MAX, f64::MIN_POSITIVE).is_err());
        assert_eq!(TimeGrid::new(MAX_STEPS as f64, 1.0).unwrap().len(), MAX_STEPS);
    }

    #[test]
    fn probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f64::NAN).is_err());
    }
}
