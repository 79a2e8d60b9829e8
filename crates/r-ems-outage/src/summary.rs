//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Descriptive statistics over generated outage series."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Maximal contiguous stretch of active steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRun {
    pub start: usize,
    pub length: usize,
}

/// Collect every active run of a binary series, oldest first.
pub fn active_runs(flags: &[u8]) -> Vec<ActiveRun> {
    let mut runs = Vec::new();
    let mut current: Option<ActiveRun> = None;
    for (index, flag) in flags.iter().enumerate() {
        if *flag == 0 {
            runs.extend(current.take());
        } else if let Some(run) = current.as_mut() {
            run.length += 1;
        } else {
            current = Some(ActiveRun {
                start: index,
                length: 1,
            });
        }
    }
    runs.extend(current);
    runs
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageSummary {
    pub steps: usize,
    pub active_steps: usize,
    pub outages: usize,
    /// Share of steps without an active outage; 1.0 for an empty series.
    pub availability: f64,
    /// `None` when there are no outages.
    pub mean_run_length: Option<f64>,
    pub longest_run: usize,
}

impl OutageSummary {
    pub fn from_flags(flags: &[u8]) -> Self {
        let runs = active_runs(flags);
        let active_steps = runs.iter().map(|run| run.length).sum::<usize>();
        let availability = if flags.is_empty() {
            1.0
        } else {
            1.0 - active_steps as f64 / flags.len() as f64
        };
        let lengths: Vec<f64> = runs.iter().map(|run| run.length as f64).collect();
        Self {
            steps: flags.len(),
            active_steps,
            outages: runs.len(),
            availability,
            mean_run_length: mean_of(&lengths),
            longest_run: runs.iter().map(|run| run.length).max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub steps: usize,
    /// Steps with a non-zero severity.
    pub outages: usize,
    pub mean_severity: Option<f64>,
    pub max_severity: u64,
}

impl SeveritySummary {
    pub fn from_severities(severities: &[u64]) -> Self {
        let nonzero: Vec<f64> = severities
            .iter()
            .filter(|value| **value > 0)
            .map(|value| *value as f64)
            .collect();
        Self {
            steps: severities.len(),
            outages: nonzero.len(),
            mean_severity: mean_of(&nonzero),
            max_severity: severities.iter().copied().max().unwrap_or(0),
        }
    }
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_split_on_idle_steps() {
        let runs = active_runs(&[1, 1, 0, 0, 1, 0, 1, 1, 1]);
        assert_eq!(
            runs,
            vec![
                ActiveRun { start: 0, length: 2 },
                ActiveRun { start: 4, length: 1 },
                ActiveRun { start: 6, length: 3 },
            ]
        );
    }

    #[test]
    fn summary_of_binary_series() {
        let summary = OutageSummary::from_flags(&[0, 1, 1, 0, 1, 0, 0, 0]);
        assert_eq!(summary.steps, 8);
        assert_eq!(summary.active_steps, 3);
        assert_eq!(summary.outages, 2);
        assert!((summary.availability - 0.625).abs() < 1e-12);
        assert!((summary.mean_run_length.unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(summary.longest_run, 2);
    }

    #[test]
    fn empty_series_is_fully_available() {
        let summary = OutageSummary::from_flags(&[]);
        assert_eq!(summary.outages, 0);
        assert_eq!(summary.availability, 1.0);
        assert_eq!(summary.mean_run_length, None);
    }

    #[test]
    fn severity_summary_ignores_zero_codes() {
        let summary = SeveritySummary::from_severities(&[0, 4, 0, 2, 0]);
        assert_eq!(summary.outages, 2);
        assert!((summary.mean_severity.unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(summary.max_severity, 4);
    }
}
