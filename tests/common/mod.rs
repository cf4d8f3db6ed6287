//! Damped, forced harmonic oscillator shared by the integration tests.

#![allow(dead_code)]

use rkfixed::OdeSystem;

/// x'' + 2ζω_n x' + ω_n² x = (F0/m) sin(ωt), as the state [x, x']
#[derive(Debug, Clone, Copy)]
pub struct ForcedOscillator {
    pub f0: f64,
    pub m: f64,
    pub omega_n: f64,
    pub zeta: f64,
    pub omega: f64,
}

impl ForcedOscillator {
    /// The lightly damped configuration: F0 = 1, m = 1, ω_n = 1, ζ = 0.03,
    /// ω = 0.4 ω_n
    pub fn lightly_damped() -> Self {
        Self {
            f0: 1.0,
            m: 1.0,
            omega_n: 1.0,
            zeta: 0.03,
            omega: 0.4,
        }
    }

    /// Closed-form displacement for an underdamped oscillator (ζ < 1)
    /// starting from `y0 = [x0, v0]` at t = 0
    pub fn displacement(&self, t: f64, y0: &[f64]) -> f64 {
        let (x0, v0) = (y0[0], y0[1]);
        let zeta2 = self.zeta * self.zeta;
        let om2 = self.omega * self.omega;
        let omn2 = self.omega_n * self.omega_n;
        let omega_d = self.omega_n * (1.0 - zeta2).sqrt();
        let cross = 2.0 * self.omega * self.omega_n * self.zeta;
        let accel = self.f0 / self.m;

        let den = (omn2 - om2) * (omn2 - om2) + cross * cross;
        let a = self.zeta * (self.omega_n / omega_d) * x0
            + v0 / omega_d
            + ((om2 + (2.0 * zeta2 - 1.0) * omn2) / den) * (self.omega / omega_d) * accel;
        let b = x0 + (cross / den) * accel;

        let transient = (-self.zeta * self.omega_n * t).exp()
            * (a * (omega_d * t).sin() + b * (omega_d * t).cos());
        let steady = (accel / den)
            * ((omn2 - om2) * (self.omega * t).sin() - cross * (self.omega * t).cos());
        transient + steady
    }
}

impl OdeSystem for ForcedOscillator {
    fn dimension(&self) -> usize {
        2
    }

    fn rhs(&self, t: f64, y: &[f64], dydt: &mut [f64]) {
        dydt[0] = y[1];
        dydt[1] = (self.f0 / self.m) * (self.omega * t).sin()
            - 2.0 * self.zeta * self.omega_n * y[1]
            - self.omega_n * self.omega_n * y[0];
    }
}
