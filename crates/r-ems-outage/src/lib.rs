//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Outage generator module exports and shared types."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Synthetic outage series for R-EMS reliability and regression studies.
//!
//! Two generation policies are provided: an independent-trial monthly
//! severity series and a stateful daily active/idle series. Every generator
//! takes its random source explicitly, so identical seeds reproduce identical
//! output.

pub mod daily;
pub mod errors;
pub mod events;
pub mod generator;
pub mod grid;
pub mod monthly;
pub mod study;
pub mod summary;

pub use daily::{
    generate_daily, DailyOutageMachine, DailyOutageSeries, DailyPolicy, OutageState, Transition,
};
pub use errors::{OutageError, Result};
pub use events::{generate_events, EventPolicy, OutageEventSample};
pub use generator::{OutageGenerator, DEFAULT_SEED};
pub use grid::{TimeGrid, MAX_STEPS};
pub use monthly::{generate_monthly, month_index, MonthlyOutageSeries, MonthlyPolicy};
pub use study::{run_study, StudyConfig, StudyOutput, UnitConfig, UnitOutcome, UnitPolicy, UnitSeries};
pub use summary::{active_runs, ActiveRun, OutageSummary, SeveritySummary};
