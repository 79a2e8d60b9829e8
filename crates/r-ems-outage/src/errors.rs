//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Error taxonomy for outage series generation."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, OutageError>;

#[derive(Debug, Error, PartialEq)]
pub enum OutageError {
    #[error("horizon must be positive and finite, got {0}")]
    InvalidHorizon(f64),
    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("probability `{name}` must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("length distribution requires finite mean and non-negative finite spread (mean {mean}, spread {spread})")]
    InvalidLengthDistribution { mean: f64, spread: f64 },
    #[error("length clip bounds are inverted: min {min} > max {max}")]
    InvalidClipBounds { min: u32, max: u32 },
    #[error("grid of horizon {horizon} and step {step} exceeds the maximum step count")]
    GridTooLarge { horizon: f64, step: f64 },
    #[error("unable to build month index: {0}")]
    CalendarOverflow(String),
}
