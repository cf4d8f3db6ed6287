//! # rkfixed: Fixed-Step Explicit Runge-Kutta Integrators
//!
//! A small integrator core for systems of ordinary differential equations
//! `dy/dt = f(t, y)`, stepping with a constant step size and one of the
//! classical explicit Runge-Kutta methods of order 1 through 4.
//!
//! ## Features
//!
//! - Forward Euler, explicit midpoint, Heun, Kutta-3 and classical RK4
//! - Methods selected by enum or by integer order code
//! - Runtime-sized state vectors; parameters live in the system type
//! - Owned, exactly-sized, time-major output buffers
//! - Stateless integrator: one value can drive concurrent integrations
//! - Convergence studies against analytical references, run in parallel
//!
//! ## Basic Usage
//!
//! ```rust
//! use rkfixed::{integrate, OdeProblem, OdeSystem};
//!
//! // Define your ODE system; its fields are the parameters
//! struct HarmonicOscillator { omega: f64 }
//!
//! impl OdeSystem for HarmonicOscillator {
//!     fn dimension(&self) -> usize { 2 }
//!
//!     fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
//!         dydt[0] = y[1];
//!         dydt[1] = -self.omega * self.omega * y[0];
//!     }
//! }
//!
//! let problem = OdeProblem::new(HarmonicOscillator { omega: 1.0 }, 0.0, 10.0, [1.0, 0.0]);
//!
//! // Classical RK4 with h = 0.1
//! let traj = integrate(&problem, 4, 0.1).unwrap();
//!
//! assert_eq!(traj.len(), 101);
//! assert_eq!(traj.times()[0], 0.0);
//! for (t, y) in traj.iter() {
//!     assert!((y[0] - t.cos()).abs() < 1e-4);
//! }
//! ```
//!
//! ## Step Count
//!
//! A run over `[t0, t1]` with step `h` produces `floor((t1 - t0) / h) + 1`
//! samples. The last sample lands short of `t1` when the span is not a
//! multiple of `h`. Ratios that miss a whole number only by floating-point
//! rounding noise (see [`STEP_COUNT_RTOL`]) are rounded to it, so `[0, 0.3]`
//! with `h = 0.1` yields four samples even though `0.3 / 0.1` is slightly
//! below 3. If such a snapped grid point would overshoot `t1`, the last step
//! is shortened to end exactly at `t1`.
//!
//! ## Errors
//!
//! Invalid orders, non-positive step sizes, empty systems, mismatched initial
//! states and inverted time spans are rejected with an [`IntegrationError`]
//! before the right-hand side is evaluated. Non-finite values produced by the
//! right-hand side are not errors; they propagate into the trajectory.
//!
//! ## Logging
//!
//! Integration start and completion are reported through the [`log`] facade
//! at `debug` and `trace` level. No logger is installed by this crate.
//!
//! ## References
//!
//! 1. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//!    Ordinary Differential Equations I: Nonstiff Problems".
//!    Springer.
//!
//! 2. Butcher, J.C. (2016). "Numerical Methods for Ordinary
//!    Differential Equations" (3rd ed.). Wiley.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod coefficients;
pub mod convergence;
pub mod method;
pub mod solver;
pub mod system;
pub mod trajectory;

pub use convergence::{convergence_study, global_error, observed_orders, ConvergencePoint};
pub use method::RkMethod;
pub use solver::{integrate, FixedStepRk, IntegrationError, Result, Workspace, STEP_COUNT_RTOL};
pub use system::{FnSystem, OdeProblem, OdeSystem};
pub use trajectory::{Rows, Stats, Trajectory};
