//! ODE systems and the problem descriptor handed to the integrator.

/// System of ordinary differential equations: dy/dt = f(t, y)
///
/// The implementing value carries the system's parameters. The integrator
/// only ever borrows it immutably, so a single instance can be shared by
/// concurrent integrations.
pub trait OdeSystem {
    /// Number of scalar state components
    fn dimension(&self) -> usize;

    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `t` - Current time
    /// * `y` - Current state vector, `dimension()` long
    /// * `dydt` - Output: derivative dy/dt, `dimension()` long
    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]);
}

impl<S: OdeSystem + ?Sized> OdeSystem for &S {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        (**self).rhs(t, y, dydt)
    }
}

/// Adapter turning a closure into an [`OdeSystem`]
///
/// Parameters are captured by the closure.
///
/// ```
/// use rkfixed::FnSystem;
///
/// let k = 0.5;
/// let decay = FnSystem::new(1, move |_t: f64, y: &[f64], dydt: &mut [f64]| {
///     dydt[0] = -k * y[0];
/// });
/// ```
#[derive(Clone)]
pub struct FnSystem<F> {
    dimension: usize,
    f: F,
}

impl<F> FnSystem<F>
where
    F: Fn(f64, &[f64], &mut [f64]),
{
    /// Wrap `f` as a system of `dimension` components
    pub fn new(dimension: usize, f: F) -> Self {
        Self { dimension, f }
    }
}

impl<F> OdeSystem for FnSystem<F>
where
    F: Fn(f64, &[f64], &mut [f64]),
{
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        (self.f)(t, y, dydt)
    }
}

impl<F> std::fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSystem")
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

/// An initial value problem: system, time span and initial state
///
/// Nothing is validated on construction; [`FixedStepRk::integrate`]
/// rejects inconsistent descriptors before the first right-hand-side call.
///
/// [`FixedStepRk::integrate`]: crate::FixedStepRk::integrate
#[derive(Debug, Clone)]
pub struct OdeProblem<S> {
    /// The right-hand side and its parameters
    pub system: S,
    /// Initial time
    pub t0: f64,
    /// Final time (`t1 >= t0`)
    pub t1: f64,
    /// State at `t0`
    pub y0: Vec<f64>,
}

impl<S: OdeSystem> OdeProblem<S> {
    /// Bundle a system with its time span and initial state
    pub fn new(system: S, t0: f64, t1: f64, y0: impl Into<Vec<f64>>) -> Self {
        Self {
            system,
            t0,
            t1,
            y0: y0.into(),
        }
    }

    /// Number of state components declared by the system
    pub fn dimension(&self) -> usize {
        self.system.dimension()
    }
}
