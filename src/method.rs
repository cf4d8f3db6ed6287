//! Method selection for the fixed-step family.

use std::fmt;

use crate::coefficients::{Tableau, CLASSIC_RK4, EULER, HEUN, KUTTA3, MIDPOINT};
use crate::solver::IntegrationError;

/// An explicit Runge-Kutta method of order 1 through 4
///
/// Each variant resolves to a static Butcher tableau carrying its own stage
/// count, nodes and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RkMethod {
    /// Forward Euler (order 1, 1 stage)
    Euler,
    /// Explicit midpoint rule (order 2, 2 stages)
    Midpoint,
    /// Heun's method / explicit trapezoidal rule (order 2, 2 stages)
    Heun,
    /// Kutta's third-order rule (order 3, 3 stages)
    Kutta3,
    /// Classical fourth-order Runge-Kutta (order 4, 4 stages)
    ClassicRk4,
}

impl RkMethod {
    /// All methods of the family, lowest order first
    pub const ALL: [RkMethod; 5] = [
        RkMethod::Euler,
        RkMethod::Midpoint,
        RkMethod::Heun,
        RkMethod::Kutta3,
        RkMethod::ClassicRk4,
    ];

    /// Look up the default method for an integer order code
    ///
    /// 1 → Euler, 2 → midpoint, 3 → Kutta-3, 4 → classical RK4.
    pub fn from_order(order: u8) -> Result<Self, IntegrationError> {
        match order {
            1 => Ok(RkMethod::Euler),
            2 => Ok(RkMethod::Midpoint),
            3 => Ok(RkMethod::Kutta3),
            4 => Ok(RkMethod::ClassicRk4),
            _ => Err(IntegrationError::InvalidOrder { order }),
        }
    }

    /// The Butcher tableau of this method
    pub fn tableau(self) -> &'static Tableau {
        match self {
            RkMethod::Euler => &EULER,
            RkMethod::Midpoint => &MIDPOINT,
            RkMethod::Heun => &HEUN,
            RkMethod::Kutta3 => &KUTTA3,
            RkMethod::ClassicRk4 => &CLASSIC_RK4,
        }
    }

    /// Order of accuracy
    pub fn order(self) -> u8 {
        self.tableau().order
    }

    /// Number of right-hand-side evaluations per step
    pub fn stages(self) -> usize {
        self.tableau().stages
    }

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            RkMethod::Euler => "euler",
            RkMethod::Midpoint => "midpoint",
            RkMethod::Heun => "heun",
            RkMethod::Kutta3 => "kutta3",
            RkMethod::ClassicRk4 => "rk4",
        }
    }
}

impl fmt::Display for RkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
