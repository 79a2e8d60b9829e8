//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Unit-down indicators paired with half-normal outage durations."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{OutageError, Result};
use crate::grid::{check_probability, TimeGrid};

fn default_horizon() -> f64 {
    5.0
}

fn default_step() -> f64 {
    1.0 / 12.0
}

fn default_p_down() -> f64 {
    0.3
}

fn default_length_loc() -> f64 {
    1.0
}

fn default_length_scale() -> f64 {
    10.0
}

fn default_min_length() -> u32 {
    1
}

fn default_max_length() -> u32 {
    28
}

/// Parameters of the event sample policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPolicy {
    #[serde(default = "default_horizon")]
    pub horizon: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    /// Probability that the unit is down at a given step.
    #[serde(default = "default_p_down")]
    pub p_down: f64,
    /// Location of the half-normal duration draw.
    #[serde(default = "default_length_loc")]
    pub length_loc: f64,
    #[serde(default = "default_length_scale")]
    pub length_scale: f64,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
}

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            step: default_step(),
            p_down: default_p_down(),
            length_loc: default_length_loc(),
            length_scale: default_length_scale(),
            min_length: default_min_length(),
            max_length: default_max_length(),
        }
    }
}

impl EventPolicy {
    pub fn validate(&self) -> Result<TimeGrid> {
        let grid = TimeGrid::new(self.horizon, self.step)?;
        check_probability("p_down", self.p_down)?;
        if !self.length_loc.is_finite() || !self.length_scale.is_finite() || self.length_scale < 0.0
        {
            return Err(OutageError::InvalidLengthDistribution {
                mean: self.length_loc,
                spread: self.length_scale,
            });
        }
        if self.min_length > self.max_length {
            return Err(OutageError::InvalidClipBounds {
                min: self.min_length,
                max: self.max_length,
            });
        }
        Ok(grid)
    }
}

/// Down indicators for every step plus one duration per down step, in step order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutageEventSample {
    grid: TimeGrid,
    down: Vec<u8>,
    durations: Vec<u32>,
}

impl OutageEventSample {
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn down(&self) -> &[u8] {
        &self.down
    }

    pub fn durations(&self) -> &[u32] {
        &self.durations
    }

    pub fn len(&self) -> usize {
        self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }

    /// Step index of each down step with its duration.
    pub fn events(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.down
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag == 1)
            .map(|(index, _)| index)
            .zip(self.durations.iter().copied())
    }
}

/// Draw the down indicators first, then one duration per down step.
pub fn generate_events<R: Rng + ?Sized>(
    policy: &EventPolicy,
    rng: &mut R,
) -> Result<OutageEventSample> {
    let grid = policy.validate()?;
    let down_trial = Bernoulli::new(policy.p_down).map_err(|_| {
        OutageError::ProbabilityOutOfRange {
            name: "p_down",
            value: policy.p_down,
        }
    })?;
    let spread = Normal::new(0.0, policy.length_scale).map_err(|_| {
        OutageError::InvalidLengthDistribution {
            mean: policy.length_loc,
            spread: policy.length_scale,
        }
    })?;

    let down: Vec<u8> = (0..grid.len())
        .map(|_| u8::from(down_trial.sample(rng)))
        .collect();
    let down_steps = down.iter().filter(|flag| **flag == 1).count();

    let min = f64::from(policy.min_length);
    let max = f64::from(policy.max_length);
    let durations: Vec<u32> = (0..down_steps)
        .map(|_| {
            let raw = policy.length_loc + spread.sample(rng).abs();
            raw.round_ties_even().clamp(min, max) as u32
        })
        .collect();

    debug!(
        steps = grid.len(),
        p_down = policy.p_down,
        down_steps,
        "generated outage event sample"
    );

    Ok(OutageEventSample {
        grid,
        down,
        durations,
    })
}
