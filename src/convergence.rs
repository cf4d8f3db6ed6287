//! Convergence studies against an analytical reference solution.
//!
//! Each step size gets its own integration, buffers and workspace; the
//! system is only shared by reference, so the runs go through rayon's pool
//! without any locking.

use rayon::prelude::*;

use crate::method::RkMethod;
use crate::solver::{FixedStepRk, Result};
use crate::system::{OdeProblem, OdeSystem};
use crate::trajectory::Trajectory;

/// Outcome of one run in a convergence study
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    /// Step size of the run
    pub step_size: f64,
    /// Largest absolute deviation from the reference over all samples and
    /// components
    pub global_error: f64,
    /// Right-hand-side evaluations spent
    pub fn_evals: u64,
}

/// Maximum absolute deviation between `trajectory` and `reference`
///
/// `reference(t, out)` writes the exact state at `t` into `out`. Components
/// without a closed form can be set to NaN and are skipped.
pub fn global_error<R>(trajectory: &Trajectory, reference: R) -> f64
where
    R: Fn(f64, &mut [f64]),
{
    let mut exact = vec![0.0; trajectory.dimension()];
    let mut worst: f64 = 0.0;
    for (t, y) in trajectory.iter() {
        reference(t, &mut exact);
        for (a, b) in y.iter().zip(&exact) {
            if b.is_nan() {
                continue;
            }
            worst = worst.max((a - b).abs());
        }
    }
    worst
}

/// Integrate `problem` once per step size, in parallel, and measure each
/// run's global error
///
/// Points come back in the order of `step_sizes`. The first failing run's
/// error is returned if any step size is invalid.
pub fn convergence_study<S, R>(
    problem: &OdeProblem<S>,
    method: RkMethod,
    step_sizes: &[f64],
    reference: R,
) -> Result<Vec<ConvergencePoint>>
where
    S: OdeSystem + Sync,
    R: Fn(f64, &mut [f64]) + Sync,
{
    step_sizes
        .par_iter()
        .map(|&h| {
            let traj = FixedStepRk::new(method, h).integrate(problem)?;
            let point = ConvergencePoint {
                step_size: h,
                global_error: global_error(&traj, &reference),
                fn_evals: traj.stats().fn_evals,
            };
            log::debug!(
                "{} h = {}: global error {:.3e} after {} evaluations",
                method,
                h,
                point.global_error,
                point.fn_evals
            );
            Ok(point)
        })
        .collect()
}

/// Observed order between consecutive points:
/// `ln(e_k / e_{k+1}) / ln(h_k / h_{k+1})`
pub fn observed_orders(points: &[ConvergencePoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| {
            (w[0].global_error / w[1].global_error).ln() / (w[0].step_size / w[1].step_size).ln()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::FnSystem;
    use approx::assert_relative_eq;

    fn decay() -> OdeProblem<FnSystem<impl Fn(f64, &[f64], &mut [f64]) + Sync>> {
        let sys = FnSystem::new(1, |_t: f64, y: &[f64], dydt: &mut [f64]| dydt[0] = -y[0]);
        OdeProblem::new(sys, 0.0, 2.0, [1.0])
    }

    fn exact_decay(t: f64, out: &mut [f64]) {
        out[0] = (-t).exp();
    }

    #[test]
    fn test_global_error_zero_for_exact_reference() {
        // Euler is exact for a constant derivative
        let sys = FnSystem::new(1, |_t: f64, _y: &[f64], dydt: &mut [f64]| dydt[0] = 0.5);
        let problem = OdeProblem::new(sys, 0.0, 4.0, [1.0]);
        let traj = FixedStepRk::new(RkMethod::Euler, 0.25).integrate(&problem).unwrap();
        let err = global_error(&traj, |t, out| out[0] = 1.0 + 0.5 * t);
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_study_preserves_input_order() {
        let steps = [0.2, 0.1, 0.05, 0.025];
        let points = convergence_study(&decay(), RkMethod::Kutta3, &steps, exact_decay).unwrap();

        assert_eq!(points.len(), steps.len());
        for (p, &h) in points.iter().zip(&steps) {
            assert_eq!(p.step_size, h);
        }
        assert_eq!(points[3].fn_evals, 3 * 80);
    }

    #[test]
    fn test_observed_orders_match_method_order() {
        let steps = [0.1, 0.05, 0.025];
        for method in RkMethod::ALL {
            let points = convergence_study(&decay(), method, &steps, exact_decay).unwrap();
            for order in observed_orders(&points) {
                assert_relative_eq!(order, method.order() as f64, epsilon = 0.3);
            }
        }
    }

    #[test]
    fn test_study_propagates_invalid_step() {
        let err = convergence_study(&decay(), RkMethod::Euler, &[0.1, -1.0], exact_decay);
        assert!(err.is_err());
    }

    #[test]
    fn test_observed_orders_formula() {
        let points = [
            ConvergencePoint {
                step_size: 0.2,
                global_error: 1.6e-3,
                fn_evals: 0,
            },
            ConvergencePoint {
                step_size: 0.1,
                global_error: 1e-4,
                fn_evals: 0,
            },
        ];
        let orders = observed_orders(&points);
        assert_eq!(orders.len(), 1);
        assert_relative_eq!(orders[0], 4.0, epsilon = 1e-12);
    }
}
