//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Independent-trial monthly outage severity generator."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Each step runs a Bernoulli start trial. A started outage replaces the
//! indicator with a Binomial severity draw, so a severity of zero reads the
//! same as "no outage". Ongoing outages do not consume later steps.
use chrono::{Datelike, Months, NaiveDate};
use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use rand_distr::Binomial;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{OutageError, Result};
use crate::grid::{check_probability, TimeGrid};

fn default_horizon() -> f64 {
    3.0
}

fn default_step() -> f64 {
    1.0 / 12.0
}

fn default_p_start() -> f64 {
    0.25
}

fn default_max_length() -> u64 {
    10
}

fn default_p_length() -> f64 {
    0.3
}

/// Parameters of the monthly policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPolicy {
    #[serde(default = "default_horizon")]
    pub horizon: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    /// Probability that an outage starts at a given step.
    #[serde(default = "default_p_start")]
    pub p_start: f64,
    /// Trials of the severity draw; also the largest possible severity.
    #[serde(default = "default_max_length")]
    pub max_length: u64,
    /// Per-trial success probability of the severity draw.
    #[serde(default = "default_p_length")]
    pub p_length: f64,
}

impl Default for MonthlyPolicy {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            step: default_step(),
            p_start: default_p_start(),
            max_length: default_max_length(),
            p_length: default_p_length(),
        }
    }
}

impl MonthlyPolicy {
    pub fn validate(&self) -> Result<TimeGrid> {
        let grid = TimeGrid::new(self.horizon, self.step)?;
        check_probability("p_start", self.p_start)?;
        check_probability("p_length", self.p_length)?;
        Ok(grid)
    }
}

/// Month-indexed severity codes produced by [`generate_monthly`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyOutageSeries {
    grid: TimeGrid,
    months: Vec<NaiveDate>,
    severities: Vec<u64>,
}

impl MonthlyOutageSeries {
    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Month-start dates, oldest first.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    pub fn severities(&self) -> &[u64] {
        &self.severities
    }

    pub fn len(&self) -> usize {
        self.severities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.severities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.months.iter().copied().zip(self.severities.iter().copied())
    }
}

/// Generate a monthly severity series whose last entry is the month containing `anchor`.
pub fn generate_monthly<R: Rng + ?Sized>(
    policy: &MonthlyPolicy,
    anchor: NaiveDate,
    rng: &mut R,
) -> Result<MonthlyOutageSeries> {
    let grid = policy.validate()?;
    let start = Bernoulli::new(policy.p_start).map_err(|_| OutageError::ProbabilityOutOfRange {
        name: "p_start",
        value: policy.p_start,
    })?;
    let severity = Binomial::new(policy.max_length, policy.p_length).map_err(|_| {
        OutageError::ProbabilityOutOfRange {
            name: "p_length",
            value: policy.p_length,
        }
    })?;

    if grid.is_empty() {
        warn!(horizon = policy.horizon, step = policy.step, "monthly grid has no steps");
    }

    let months = month_index(anchor, grid.len())?;
    let mut severities = vec![0u64; grid.len()];
    for value in severities.iter_mut() {
        if start.sample(rng) {
            *value = severity.sample(rng);
        }
    }

    debug!(
        steps = grid.len(),
        p_start = policy.p_start,
        max_length = policy.max_length,
        p_length = policy.p_length,
        outages = severities.iter().filter(|value| **value > 0).count(),
        "generated monthly outage series"
    );

    Ok(MonthlyOutageSeries {
        grid,
        months,
        severities,
    })
}

/// `count` consecutive month starts ending with the month that contains `anchor`.
pub fn month_index(anchor: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
    let current = anchor
        .with_day(1)
        .ok_or_else(|| OutageError::CalendarOverflow(format!("no first day for {anchor}")))?;
    (0..count)
        .map(|position| {
            let back = u32::try_from(count - 1 - position).map_err(|_| {
                OutageError::CalendarOverflow(format!("{count} months exceeds the calendar range"))
            })?;
            current.checked_sub_months(Months::new(back)).ok_or_else(|| {
                OutageError::CalendarOverflow(format!("{back} months before {current}"))
            })
        })
        .collect()
}
