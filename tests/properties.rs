//! Property tests for the trajectory contract.

use proptest::prelude::*;
use rkfixed::{FixedStepRk, FnSystem, IntegrationError, OdeProblem, RkMethod};

fn method() -> impl Strategy<Value = RkMethod> {
    prop::sample::select(RkMethod::ALL.to_vec())
}

/// Linear test system y' = A y + sin(t), mildly coupled
fn linear(dimension: usize) -> FnSystem<impl Fn(f64, &[f64], &mut [f64])> {
    FnSystem::new(dimension, move |t: f64, y: &[f64], dydt: &mut [f64]| {
        for j in 0..y.len() {
            let next = y[(j + 1) % y.len()];
            dydt[j] = -0.5 * y[j] + 0.25 * next + t.sin();
        }
    })
}

proptest! {
    #[test]
    fn buffers_sized_to_step_count(
        method in method(),
        dimension in 1usize..5,
        t0 in -10.0f64..10.0,
        span in 0.0f64..5.0,
        h in 0.01f64..1.0,
    ) {
        let y0: Vec<f64> = (0..dimension).map(|j| j as f64 - 1.0).collect();
        let problem = OdeProblem::new(linear(dimension), t0, t0 + span, y0.clone());
        let rk = FixedStepRk::new(method, h);
        let traj = rk.integrate(&problem).unwrap();

        let n = rk.num_steps(t0, t0 + span).unwrap();
        prop_assert_eq!(traj.len(), n);
        prop_assert_eq!(traj.states().len(), n * dimension);
        prop_assert_eq!(traj.times()[0], t0);
        prop_assert_eq!(traj.state(0).unwrap(), &y0[..]);
        prop_assert!(traj.times().windows(2).all(|w| w[0] < w[1]));
        prop_assert!(*traj.times().last().unwrap() <= t0 + span);
        prop_assert_eq!(traj.stats().fn_evals, (method.stages() * (n - 1)) as u64);
    }

    #[test]
    fn last_sample_within_one_step_of_end(
        t0 in -5.0f64..5.0,
        span in 0.0f64..20.0,
        h in 0.05f64..2.0,
    ) {
        let rk = FixedStepRk::new(RkMethod::Euler, h);
        let n = rk.num_steps(t0, t0 + span).unwrap();
        let last = t0 + (n - 1) as f64 * h;
        // Snapping may place the last grid point a rounding error past t1
        let slack = 1e-8 * (span + h);
        prop_assert!(t0 + span - last < h + slack);
        prop_assert!(last <= t0 + span + slack);
    }

    #[test]
    fn repeated_runs_are_bit_identical(
        method in method(),
        dimension in 1usize..4,
        h in 0.01f64..0.5,
    ) {
        let y0 = vec![0.5; dimension];
        let problem = OdeProblem::new(linear(dimension), 0.0, 3.0, y0);
        let rk = FixedStepRk::new(method, h);

        let a = rk.integrate(&problem).unwrap();
        let b = rk.integrate(&problem).unwrap();
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(a.times()), bits(b.times()));
        prop_assert_eq!(bits(a.states()), bits(b.states()));
    }

    #[test]
    fn non_positive_step_rejected(h in -10.0f64..=0.0) {
        let problem = OdeProblem::new(linear(2), 0.0, 1.0, [0.0, 0.0]);
        let err = FixedStepRk::new(RkMethod::ClassicRk4, h).integrate(&problem).unwrap_err();
        prop_assert_eq!(err, IntegrationError::InvalidStepSize { h });
    }

    #[test]
    fn inverted_span_rejected(t0 in -10.0f64..10.0, back in 1e-6f64..10.0) {
        let problem = OdeProblem::new(linear(1), t0, t0 - back, [0.0]);
        let err = FixedStepRk::new(RkMethod::Midpoint, 0.1).integrate(&problem).unwrap_err();
        prop_assert!(
            matches!(err, IntegrationError::InvalidTimeSpan { .. }),
            "unexpected error: {:?}",
            err
        );
    }
}
