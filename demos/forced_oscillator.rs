//! Damped, forced harmonic oscillator integrated with classical RK4.
//!
//! Solves x'' + 2ζω_n x' + ω_n² x = (F0/m) sin(ωt) from rest over
//! [0, 110] s with h = 1 s, compares the displacement against the closed-form
//! solution, writes `t x v x_a` rows to `data/forced_oscillator.txt` and
//! hands a plot script to gnuplot when it is installed.
//!
//! Run with:
//!   cargo run --example forced_oscillator

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::process::{Command, Stdio};

use rkfixed::{integrate, OdeProblem, OdeSystem};

const DATA_FILE: &str = "data/forced_oscillator.txt";

/// Oscillator parameters; the state vector is [x, x']
struct ForcedOscillator {
    f0: f64,
    m: f64,
    omega_n: f64,
    zeta: f64,
    omega: f64,
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

impl ForcedOscillator {
    /// Closed-form displacement (underdamped) from `y0 = [x0, v0]` at t = 0
    fn displacement(&self, t: f64, y0: &[f64]) -> f64 {
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

        (-self.zeta * self.omega_n * t).exp() * (a * (omega_d * t).sin() + b * (omega_d * t).cos())
            + (accel / den)
                * ((omn2 - om2) * (self.omega * t).sin() - cross * (self.omega * t).cos())
    }
}

fn plot_script() -> String {
    format!(
        "set title 'Damped, forced oscillator (RK4, h = 1 s)'\n\
         set xlabel 'Time t [s]'\n\
         set ylabel 'x(t) [m], v(t) [m/s], x_a(t) [m]'\n\
         plot '{f}' using 1:2 with points pt 7 ps 1 lc rgb 'red' title 'x(t)', \
         '{f}' using 1:3 with points pt 7 ps 1 lc rgb 'blue' title 'v(t)', \
         '{f}' using 1:4 with lines lc rgb 'black' title 'x_a(t)'\n",
        f = DATA_FILE
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let osc = ForcedOscillator {
        f0: 1.0,
        m: 1.0,
        omega_n: 1.0,
        zeta: 0.03,
        omega: 0.4,
    };
    let y0 = [0.0, 0.0];
    let problem = OdeProblem::new(osc, 0.0, 110.0, y0);

    let traj = integrate(&problem, 4, 1.0)?;
    let osc = &problem.system;

    let max_dev = traj
        .iter()
        .map(|(t, y)| (y[0] - osc.displacement(t, &y0)).abs())
        .fold(0.0, f64::max);

    fs::create_dir_all("data")?;
    let file = BufWriter::new(File::create(DATA_FILE)?);
    traj.write_table_with(file, |t, _y, cols| cols.push(osc.displacement(t, &y0)))?;

    println!("Damped, forced oscillator ({})", traj.method());
    println!("  Samples:           {}", traj.len());
    println!("  Function evals:    {}", traj.stats().fn_evals);
    println!("  Max |x - x_a|:     {:.3e}", max_dev);
    println!("  Data written to    {}", DATA_FILE);

    match Command::new("gnuplot")
        .arg("-persistent")
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            // stdin must be closed before waiting, or gnuplot never exits;
            // the child is reaped even when the write fails
            let written = match child.stdin.take() {
                Some(mut stdin) => stdin.write_all(plot_script().as_bytes()),
                None => Ok(()),
            };
            child.wait()?;
            written?;
        }
        Err(e) => println!("  gnuplot not available ({}), skipping plot", e),
    }

    Ok(())
}
