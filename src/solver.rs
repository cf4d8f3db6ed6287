//! Fixed-step explicit Runge-Kutta integrator
//!
//! Advances an [`OdeProblem`] from `t0` towards `t1` with a constant step
//! size using one of the [`RkMethod`] tableaux, recording every sample in an
//! owned [`Trajectory`].

use thiserror::Error;

use crate::coefficients::MAX_STAGES;
use crate::method::RkMethod;
use crate::system::{OdeProblem, OdeSystem};
use crate::trajectory::{Stats, Trajectory};

/// Relative tolerance for snapping `(t1 - t0) / h` to a whole number of steps
///
/// A span that is an exact multiple of `h` in real arithmetic often comes out
/// a few ulps off in floating point (`0.3 / 0.1 = 2.9999999999999996`).
/// A ratio within `STEP_COUNT_RTOL * max(1, ratio, (|t0| + |t1|) / h)` of an
/// integer is rounded to it; every other ratio is truncated. The bound only
/// covers rounding noise of the subtraction and division, so any genuine
/// fractional step is dropped as `floor` would.
pub const STEP_COUNT_RTOL: f64 = 4.0 * f64::EPSILON;

/// Result alias for integration operations
pub type Result<T> = std::result::Result<T, IntegrationError>;

/// Errors that can occur during integration
///
/// Every variant is detected before the first right-hand-side evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// The system declares zero state components
    #[error("system dimension must be positive")]
    ZeroDimension,
    /// Initial state length differs from the system dimension
    #[error("initial state has {actual} components, system dimension is {expected}")]
    DimensionMismatch {
        /// Dimension declared by the system
        expected: usize,
        /// Length of the supplied initial state
        actual: usize,
    },
    /// Order code outside 1..=4
    #[error("unsupported Runge-Kutta order {order}, expected 1 through 4")]
    InvalidOrder {
        /// The rejected order code
        order: u8,
    },
    /// Step size not positive or not finite
    #[error("step size must be positive and finite, got {h}")]
    InvalidStepSize {
        /// The rejected step size
        h: f64,
    },
    /// Time span inverted or not finite
    #[error("invalid time span [{t0}, {t1}]: bounds must be finite with t1 >= t0")]
    InvalidTimeSpan {
        /// Initial time
        t0: f64,
        /// Final time
        t1: f64,
    },
    /// Trajectory buffers could not be obtained
    #[error("cannot allocate trajectory buffers for {samples} samples of dimension {dimension}")]
    Allocation {
        /// Requested number of samples
        samples: f64,
        /// State dimension
        dimension: usize,
    },
}

/// Scratch buffers for [`FixedStepRk::step`]
///
/// Holds the stage derivatives and the intermediate stage state so that
/// repeated steps do not allocate.
#[derive(Debug, Clone)]
pub struct Workspace {
    dimension: usize,
    k: Vec<f64>,
    y_stage: Vec<f64>,
}

impl Workspace {
    /// Workspace for a system of `dimension` components
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            k: vec![0.0; MAX_STAGES * dimension],
            y_stage: vec![0.0; dimension],
        }
    }

    /// Dimension this workspace was sized for
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Fixed-step explicit Runge-Kutta integrator
///
/// The integrator is a plain value holding the method and the step size; it
/// keeps no state between calls, so one instance can drive any number of
/// concurrent integrations.
///
/// # Example
/// ```
/// use rkfixed::{FixedStepRk, OdeProblem, OdeSystem, RkMethod};
///
/// struct HarmonicOscillator { omega: f64 }
///
/// impl OdeSystem for HarmonicOscillator {
///     fn dimension(&self) -> usize { 2 }
///     fn rhs(&self, _t: f64, y: &[f64], dydt: &mut [f64]) {
///         dydt[0] = y[1];
///         dydt[1] = -self.omega * self.omega * y[0];
///     }
/// }
///
/// let problem = OdeProblem::new(HarmonicOscillator { omega: 1.0 }, 0.0, 10.0, [1.0, 0.0]);
/// let rk4 = FixedStepRk::new(RkMethod::ClassicRk4, 0.01);
///
/// let traj = rk4.integrate(&problem).unwrap();
/// assert_eq!(traj.len(), 1001);
/// let (t, y) = traj.last();
/// assert!((y[0] - t.cos()).abs() < 1e-8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedStepRk {
    method: RkMethod,
    step_size: f64,
}

impl FixedStepRk {
    /// Integrator using `method` with constant step `step_size`
    ///
    /// The step size is checked when integrating.
    pub fn new(method: RkMethod, step_size: f64) -> Self {
        Self { method, step_size }
    }

    /// Integrator for an integer order code (1 through 4)
    pub fn from_order(order: u8, step_size: f64) -> Result<Self> {
        Ok(Self::new(RkMethod::from_order(order)?, step_size))
    }

    /// Selected method
    pub fn method(&self) -> RkMethod {
        self.method
    }

    /// Constant step size
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Number of samples a run over `[t0, t1]` produces, including `t0`
    ///
    /// A count too large for `usize` is reported as
    /// [`IntegrationError::Allocation`] with `dimension: 0`.
    pub fn num_steps(&self, t0: f64, t1: f64) -> Result<usize> {
        self.validate_span(t0, t1)?;
        sample_count(t0, t1, self.step_size).ok_or(IntegrationError::Allocation {
            samples: (t1 - t0) / self.step_size + 1.0,
            dimension: 0,
        })
    }

    /// Perform a single step from `(t, y)`, writing the new state to `y_next`
    ///
    /// Evaluates the right-hand side exactly `method().stages()` times.
    ///
    /// # Panics
    /// If `y_next` or the workspace is not sized for `y.len()` components.
    pub fn step<S: OdeSystem + ?Sized>(
        &self,
        sys: &S,
        t: f64,
        y: &[f64],
        y_next: &mut [f64],
        ws: &mut Workspace,
    ) {
        self.step_by(sys, t, self.step_size, y, y_next, ws);
    }

    /// One step of length `h`; only the final step of a snapped run differs
    /// from `self.step_size`, and then by rounding noise
    #[allow(clippy::needless_range_loop)]
    fn step_by<S: OdeSystem + ?Sized>(
        &self,
        sys: &S,
        t: f64,
        h: f64,
        y: &[f64],
        y_next: &mut [f64],
        ws: &mut Workspace,
    ) {
        let tab = self.method.tableau();
        let n = y.len();
        assert_eq!(
            n, ws.dimension,
            "workspace sized for {} components, state has {}",
            ws.dimension, n
        );
        assert_eq!(
            n,
            y_next.len(),
            "output buffer has {} components, state has {}",
            y_next.len(),
            n
        );

        // Stage 0: k[0] = f(t, y)
        sys.rhs(t, y, &mut ws.k[..n]);

        // Stages 1..stages
        for i in 1..tab.stages {
            let (done, rest) = ws.k.split_at_mut(i * n);

            // y_stage = y + h * sum_{j<i} a[i][j] * k[j]
            for m in 0..n {
                let mut sum = 0.0;
                for j in 0..i {
                    let a = tab.a[i][j];
                    if a != 0.0 {
                        sum += a * done[j * n + m];
                    }
                }
                ws.y_stage[m] = y[m] + h * sum;
            }

            sys.rhs(t + tab.c[i] * h, &ws.y_stage, &mut rest[..n]);
        }

        // y_next = y + h * sum_i b[i] * k[i]
        for m in 0..n {
            let mut sum = 0.0;
            for i in 0..tab.stages {
                let b = tab.b[i];
                if b != 0.0 {
                    sum += b * ws.k[i * n + m];
                }
            }
            y_next[m] = y[m] + h * sum;
        }
    }

    /// Integrate `problem` over its whole time span
    ///
    /// # Returns
    /// * `Ok(Trajectory)` with `num_steps` samples, the first being exactly
    ///   `(t0, y0)`
    /// * `Err(IntegrationError)` if the descriptor or step size is invalid or
    ///   the output buffers cannot be allocated; the system is not evaluated
    pub fn integrate<S: OdeSystem>(&self, problem: &OdeProblem<S>) -> Result<Trajectory> {
        let dim = self.validate(problem)?;
        let OdeProblem { system, t0, t1, y0 } = problem;
        let (t0, t1, h) = (*t0, *t1, self.step_size);

        let alloc_error = || IntegrationError::Allocation {
            samples: (t1 - t0) / h + 1.0,
            dimension: dim,
        };
        let num_steps = sample_count(t0, t1, h).ok_or_else(alloc_error)?;
        let len = num_steps.checked_mul(dim).ok_or_else(alloc_error)?;

        let mut times: Vec<f64> = Vec::new();
        times.try_reserve_exact(num_steps).map_err(|_| alloc_error())?;
        let mut states: Vec<f64> = Vec::new();
        states.try_reserve_exact(len).map_err(|_| alloc_error())?;

        log::debug!(
            "integrating {}-dimensional system with {} over [{}, {}], h = {}, {} samples",
            dim,
            self.method,
            t0,
            t1,
            h,
            num_steps
        );

        times.push(t0);
        states.extend_from_slice(y0);
        states.resize(len, 0.0);

        let mut ws = Workspace::new(dim);
        for i in 1..num_steps {
            let (done, rest) = states.split_at_mut(i * dim);
            let y = &done[(i - 1) * dim..];
            let t_prev = times[i - 1];

            // Times come from the index, not a running sum. A snapped final
            // sample that would pass t1 is shortened to end exactly on it,
            // so the state always belongs to its recorded time.
            let t_next = t0 + i as f64 * h;
            let (t_next, h_i) = if t_next > t1 {
                (t1, t1 - t_prev)
            } else {
                (t_next, h)
            };
            self.step_by(system, t_prev, h_i, y, &mut rest[..dim], &mut ws);
            times.push(t_next);
        }

        let steps = (num_steps - 1) as u64;
        let stats = Stats {
            fn_evals: steps * self.method.stages() as u64,
            steps,
        };
        log::trace!(
            "{} finished: {} steps, {} rhs evaluations",
            self.method,
            steps,
            stats.fn_evals
        );

        Ok(Trajectory {
            times,
            states,
            dimension: dim,
            method: self.method,
            step_size: h,
            stats,
        })
    }

    /// Check the descriptor against the integrator settings, returning the
    /// dimension
    fn validate<S: OdeSystem>(&self, problem: &OdeProblem<S>) -> Result<usize> {
        let dim = problem.dimension();
        if dim == 0 {
            return Err(IntegrationError::ZeroDimension);
        }
        if problem.y0.len() != dim {
            return Err(IntegrationError::DimensionMismatch {
                expected: dim,
                actual: problem.y0.len(),
            });
        }
        self.validate_span(problem.t0, problem.t1)?;
        Ok(dim)
    }

    fn validate_span(&self, t0: f64, t1: f64) -> Result<()> {
        let h = self.step_size;
        if !h.is_finite() || h <= 0.0 {
            return Err(IntegrationError::InvalidStepSize { h });
        }
        if !t0.is_finite() || !t1.is_finite() || t1 < t0 {
            return Err(IntegrationError::InvalidTimeSpan { t0, t1 });
        }
        Ok(())
    }
}

/// Integrate `problem` with the method of the given order code
///
/// Convenience over [`FixedStepRk::from_order`] followed by
/// [`FixedStepRk::integrate`]: order 1 is Euler, 2 the midpoint rule, 3
/// Kutta's rule and 4 classical RK4.
pub fn integrate<S: OdeSystem>(
    problem: &OdeProblem<S>,
    order: u8,
    step_size: f64,
) -> Result<Trajectory> {
    FixedStepRk::from_order(order, step_size)?.integrate(problem)
}

/// Number of samples on `[t0, t1]` with step `h`, or `None` if it does not
/// fit in `usize`
///
/// Assumes validated inputs (`h > 0`, finite `t0 <= t1`).
fn sample_count(t0: f64, t1: f64, h: f64) -> Option<usize> {
    let ratio = (t1 - t0) / h;
    if !ratio.is_finite() {
        return None;
    }

    let scale = ratio.max((t0.abs() + t1.abs()) / h).max(1.0);
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= STEP_COUNT_RTOL * scale {
        nearest
    } else {
        ratio.floor()
    };

    // usize::MAX as f64 rounds up, so >= also rejects the boundary
    if steps >= usize::MAX as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}
