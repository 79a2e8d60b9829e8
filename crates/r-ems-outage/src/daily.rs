//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Stateful daily outage generator."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{OutageError, Result};
use crate::grid::{check_probability, TimeGrid};

fn default_horizon() -> f64 {
    3.0
}

fn default_step() -> f64 {
    1.0 / 252.0
}

fn default_p_start() -> f64 {
    0.01
}

fn default_mu_length() -> f64 {
    0.0
}

fn default_sd_length() -> f64 {
    7.0
}

/// Parameters of the daily policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPolicy {
    #[serde(default = "default_horizon")]
    pub horizon: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    /// Probability that an outage starts on an idle step.
    #[serde(default = "default_p_start")]
    pub p_start: f64,
    /// Mean of the normal length draw; the magnitude of the draw is used.
    #[serde(default = "default_mu_length")]
    pub mu_length: f64,
    #[serde(default = "default_sd_length")]
    pub sd_length: f64,
}

impl Default for DailyPolicy {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            step: default_step(),
            p_start: default_p_start(),
            mu_length: default_mu_length(),
            sd_length: default_sd_length(),
        }
    }
}

impl DailyPolicy {
    pub fn validate(&self) -> Result<TimeGrid> {
        let grid = TimeGrid::new(self.horizon, self.step)?;
        check_probability("p_start", self.p_start)?;
        if !self.mu_length.is_finite() || !self.sd_length.is_finite() || self.sd_length < 0.0 {
            return Err(OutageError::InvalidLengthDistribution {
                mean: self.mu_length,
                spread: self.sd_length,
            });
        }
        Ok(grid)
    }
}

/// Generator state between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutageState {
    Idle,
    /// Additional steps the current outage persists; always positive.
    Active { remaining: f64 },
}

/// What a single step of the machine did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle step whose start trial failed.
    StayedIdle,
    /// Idle step whose start trial succeeded.
    Started,
    /// Step consumed by an outage that was already running.
    Continued,
}

impl Transition {
    pub fn flag(&self) -> u8 {
        match self {
            Transition::StayedIdle => 0,
            Transition::Started | Transition::Continued => 1,
        }
    }
}

/// Two-state machine driven by a single real-valued remaining-length counter.
#[derive(Debug, Clone)]
pub struct DailyOutageMachine {
    start: Bernoulli,
    length: Normal<f64>,
    remaining: f64,
}

impl DailyOutageMachine {
    pub fn new(policy: &DailyPolicy) -> Result<Self> {
        let start = Bernoulli::new(policy.p_start).map_err(|_| {
            OutageError::ProbabilityOutOfRange {
                name: "p_start",
                value: policy.p_start,
            }
        })?;
        let length = if policy.mu_length.is_finite() {
            Normal::new(policy.mu_length, policy.sd_length).ok()
        } else {
            None
        }
        .ok_or(OutageError::InvalidLengthDistribution {
            mean: policy.mu_length,
            spread: policy.sd_length,
        })?;
        Ok(Self {
            start,
            length,
            remaining: 0.0,
        })
    }

    pub fn state(&self) -> OutageState {
        if self.remaining > 0.0 {
            OutageState::Active {
                remaining: self.remaining,
            }
        } else {
            OutageState::Idle
        }
    }

    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Transition {
        if self.remaining > 0.0 {
            self.remaining -= 1.0;
            return Transition::Continued;
        }
        if self.start.sample(rng) {
            self.remaining = self.length.sample(rng).abs();
            Transition::Started
        } else {
            Transition::StayedIdle
        }
    }
}

/// Binary active/idle flags produced by [`generate_daily`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOutageSeries {
    grid: TimeGrid,
    flags: Vec<u8>,
}

impl DailyOutageSeries {
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

pub fn generate_daily<R: Rng + ?Sized>(
    policy: &DailyPolicy,
    rng: &mut R,
) -> Result<DailyOutageSeries> {
    let grid = policy.validate()?;
    let mut machine = DailyOutageMachine::new(policy)?;

    if grid.is_empty() {
        warn!(horizon = policy.horizon, step = policy.step, "daily grid has no steps");
    }

    let flags: Vec<u8> = (0..grid.len())
        .map(|_| machine.step(rng).flag())
        .collect();

    debug!(
        steps = grid.len(),
        p_start = policy.p_start,
        mu_length = policy.mu_length,
        sd_length = policy.sd_length,
        active = flags.iter().filter(|flag| **flag == 1).count(),
        "generated daily outage series"
    );

    Ok(DailyOutageSeries { grid, flags })
}
