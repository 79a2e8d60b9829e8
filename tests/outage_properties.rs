//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Property tests for the outage series generators."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use chrono::NaiveDate;
use proptest::prelude::*;
use r_ems_outage::{
    active_runs, generate_daily, generate_monthly, DailyOutageMachine, DailyPolicy,
    MonthlyPolicy, OutageError, Transition,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn expected_steps(horizon: f64, step: f64) -> usize {
    (horizon / step).floor() as usize
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn monthly_values_stay_within_severity_range(
        seed in any::<u64>(),
        horizon in 0.5..6.0f64,
        p_start in 0.0..=1.0f64,
        max_length in 0u64..20,
        p_length in 0.0..=1.0f64,
    ) {
        let policy = MonthlyPolicy { horizon, step: 1.0 / 12.0, p_start, max_length, p_length };
        let series = generate_monthly(&policy, anchor(), &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(series.len(), expected_steps(horizon, 1.0 / 12.0));
        prop_assert_eq!(series.months().len(), series.len());
        prop_assert!(series.severities().iter().all(|value| *value <= max_length));
    }

    #[test]
    fn monthly_index_is_consecutive_month_starts(seed in any::<u64>(), horizon in 1.0..10.0f64) {
        let policy = MonthlyPolicy { horizon, ..Default::default() };
        let series = generate_monthly(&policy, anchor(), &mut StdRng::seed_from_u64(seed)).unwrap();
        let months = series.months();
        prop_assert_eq!(months.last().copied(), NaiveDate::from_ymd_opt(2026, 10, 1));
        for pair in months.windows(2) {
            prop_assert_eq!(pair[0].checked_add_months(chrono::Months::new(1)), Some(pair[1]));
        }
    }

    #[test]
    fn daily_values_are_binary(
        seed in any::<u64>(),
        horizon in 0.1..4.0f64,
        p_start in 0.0..=1.0f64,
        mu_length in -10.0..10.0f64,
        sd_length in 0.0..10.0f64,
    ) {
        let policy = DailyPolicy { horizon, step: 1.0 / 252.0, p_start, mu_length, sd_length };
        let series = generate_daily(&policy, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(series.len(), expected_steps(horizon, 1.0 / 252.0));
        prop_assert!(series.flags().iter().all(|flag| *flag <= 1));
    }

    #[test]
    fn same_seed_reproduces_both_policies(seed in any::<u64>(), p_start in 0.0..=1.0f64) {
        let monthly = MonthlyPolicy { p_start, ..Default::default() };
        let daily = DailyPolicy { p_start, ..Default::default() };
        prop_assert_eq!(
            generate_monthly(&monthly, anchor(), &mut StdRng::seed_from_u64(seed)).unwrap(),
            generate_monthly(&monthly, anchor(), &mut StdRng::seed_from_u64(seed)).unwrap()
        );
        prop_assert_eq!(
            generate_daily(&daily, &mut StdRng::seed_from_u64(seed)).unwrap(),
            generate_daily(&daily, &mut StdRng::seed_from_u64(seed)).unwrap()
        );
    }

    #[test]
    fn continued_steps_always_follow_an_active_step(
        seed in any::<u64>(),
        p_start in 0.0..=1.0f64,
        mu_length in -5.0..5.0f64,
        sd_length in 0.0..5.0f64,
    ) {
        let policy = DailyPolicy { p_start, mu_length, sd_length, ..Default::default() };
        let mut machine = DailyOutageMachine::new(&policy).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut previous = 0u8;
        for _ in 0..500 {
            let transition = machine.step(&mut rng);
            if transition == Transition::Continued {
                prop_assert_eq!(previous, 1);
            }
            previous = transition.flag();
        }
    }

    #[test]
    fn machine_matches_generated_flags(seed in any::<u64>(), p_start in 0.0..=0.2f64) {
        let policy = DailyPolicy { p_start, ..Default::default() };
        let series = generate_daily(&policy, &mut StdRng::seed_from_u64(seed)).unwrap();
        let mut machine = DailyOutageMachine::new(&policy).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let replayed: Vec<u8> = (0..series.len()).map(|_| machine.step(&mut rng).flag()).collect();
        prop_assert_eq!(series.flags(), replayed.as_slice());
    }

    #[test]
    fn active_runs_cover_every_active_step(flags in proptest::collection::vec(0u8..=1, 0..200)) {
        let runs = active_runs(&flags);
        let covered: usize = runs.iter().map(|run| run.length).sum();
        prop_assert_eq!(covered, flags.iter().filter(|flag| **flag == 1).count());
        for run in &runs {
            prop_assert!(flags[run.start..run.start + run.length].iter().all(|flag| *flag == 1));
        }
    }
}

#[test]
fn zero_start_probability_is_all_zero() {
    let monthly = MonthlyPolicy {
        p_start: 0.0,
        ..Default::default()
    };
    let daily = DailyPolicy {
        p_start: 0.0,
        ..Default::default()
    };
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let m = generate_monthly(&monthly, anchor(), &mut rng).unwrap();
        let d = generate_daily(&daily, &mut rng).unwrap();
        assert_eq!(m.severities(), vec![0u64; 36].as_slice());
        assert_eq!(d.flags(), vec![0u8; 756].as_slice());
    }
}

#[test]
fn certain_start_keeps_every_daily_step_active() {
    for seed in 0..16 {
        let policy = DailyPolicy {
            p_start: 1.0,
            ..Default::default()
        };
        let series = generate_daily(&policy, &mut StdRng::seed_from_u64(seed)).unwrap();
        assert_eq!(series.flags(), vec![1u8; 756].as_slice());
    }
}

#[test]
fn single_step_zero_length_outage() {
    let policy = DailyPolicy {
        horizon: 1.0,
        step: 1.0,
        p_start: 1.0,
        mu_length: 0.0,
        sd_length: 0.0,
    };
    let series = generate_daily(&policy, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(series.flags(), &[1]);
}

#[test]
fn invalid_parameters_fail_fast() {
    let mut rng = StdRng::seed_from_u64(0);
    let negative_horizon = MonthlyPolicy {
        horizon: -1.0,
        ..Default::default()
    };
    assert_eq!(
        generate_monthly(&negative_horizon, anchor(), &mut rng).unwrap_err(),
        OutageError::InvalidHorizon(-1.0)
    );
    let zero_step = DailyPolicy {
        step: 0.0,
        ..Default::default()
    };
    assert_eq!(
        generate_daily(&zero_step, &mut rng).unwrap_err(),
        OutageError::InvalidStep(0.0)
    );
    let bad_probability = DailyPolicy {
        p_start: -0.1,
        ..Default::default()
    };
    assert!(matches!(
        generate_daily(&bad_probability, &mut rng),
        Err(OutageError::ProbabilityOutOfRange { name: "p_start", .. })
    ));
}
