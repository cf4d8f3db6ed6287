//! Explicit Runge-Kutta Coefficients
//!
//! Butcher tableaux for the fixed-step family of orders 1 through 4:
//! forward Euler, the explicit midpoint rule, Heun's method, Kutta's
//! third-order rule and the classical fourth-order method.
//!
//! Every table is padded to [`MAX_STAGES`] so the step loop can index them
//! uniformly; only the first `stages` rows/entries are meaningful.
//!
//! Reference: Hairer, Nørsett & Wanner, "Solving Ordinary Differential
//! Equations I", Section II.1, Table 1.1 and 1.2.

/// Largest stage count of any method in the family
pub const MAX_STAGES: usize = 4;

/// A Butcher tableau for an explicit method with at most [`MAX_STAGES`] stages
///
/// ```text
/// c_0 |
/// c_1 | a_10
/// c_2 | a_20 a_21
/// c_3 | a_30 a_31 a_32
/// ----+-------------------
///     | b_0  b_1  b_2  b_3
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    /// Number of stages actually used
    pub stages: usize,
    /// Order of accuracy of the method
    pub order: u8,
    /// Node coefficients (c_i): stage i is evaluated at t_n + c[i]*h
    pub c: [f64; MAX_STAGES],
    /// Strictly lower-triangular Runge-Kutta matrix (a_ij, j < i)
    pub a: [[f64; MAX_STAGES]; MAX_STAGES],
    /// Weights (b_i) combining the stage derivatives
    pub b: [f64; MAX_STAGES],
}

/// Forward Euler: y_{n+1} = y_n + h * f(t_n, y_n)
pub const EULER: Tableau = Tableau {
    stages: 1,
    order: 1,
    c: [0.0, 0.0, 0.0, 0.0],
    a: [[0.0; MAX_STAGES]; MAX_STAGES],
    b: [1.0, 0.0, 0.0, 0.0],
};

/// Explicit midpoint rule, one interior evaluation at t_n + h/2
pub const MIDPOINT: Tableau = Tableau {
    stages: 2,
    order: 2,
    c: [0.0, 0.5, 0.0, 0.0],
    a: [
        [0.0, 0.0, 0.0, 0.0],
        [0.5, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ],
    b: [0.0, 1.0, 0.0, 0.0],
};

/// Heun's method (explicit trapezoidal rule)
pub const HEUN: Tableau = Tableau {
    stages: 2,
    order: 2,
    c: [0.0, 1.0, 0.0, 0.0],
    a: [
        [0.0, 0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ],
    b: [0.5, 0.5, 0.0, 0.0],
};

/// Kutta's classical third-order rule
pub const KUTTA3: Tableau = Tableau {
    stages: 3,
    order: 3,
    c: [0.0, 0.5, 1.0, 0.0],
    a: [
        [0.0, 0.0, 0.0, 0.0],
        [0.5, 0.0, 0.0, 0.0],
        [-1.0, 2.0, 0.0, 0.0],
        [0.0, 0.0, 0.0, 0.0],
    ],
    b: [1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0, 0.0],
};

/// Classical fourth-order Runge-Kutta, weights (1, 2, 2, 1)/6
pub const CLASSIC_RK4: Tableau = Tableau {
    stages: 4,
    order: 4,
    c: [0.0, 0.5, 0.5, 1.0],
    a: [
        [0.0, 0.0, 0.0, 0.0],
        [0.5, 0.0, 0.0, 0.0],
        [0.0, 0.5, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ],
    b: [1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
};
