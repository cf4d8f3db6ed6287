//! Sampled output of one integration run.

use std::io::{self, Write};
use std::iter::{Copied, Zip};
use std::slice::{ChunksExact, Iter};

use crate::method::RkMethod;

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    /// Total number of right-hand-side evaluations
    pub fn_evals: u64,
    /// Number of steps taken (one less than the number of samples)
    pub steps: u64,
}

/// Time grid and state history produced by a fixed-step integration
///
/// States are stored flat and time-major: component `j` of sample `i` is
/// `states()[i * dimension() + j]`. A trajectory always holds at least one
/// sample, the initial state at `t0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTrajectory"))]
pub struct Trajectory {
    pub(crate) times: Vec<f64>,
    pub(crate) states: Vec<f64>,
    pub(crate) dimension: usize,
    pub(crate) method: RkMethod,
    pub(crate) step_size: f64,
    pub(crate) stats: Stats,
}

/// Iterator over the `(t, state)` rows of a [`Trajectory`]
pub type Rows<'a> = Zip<Copied<Iter<'a, f64>>, ChunksExact<'a, f64>>;

/// Deserialized fields, checked before they become a [`Trajectory`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTrajectory {
    times: Vec<f64>,
    states: Vec<f64>,
    dimension: usize,
    method: RkMethod,
    step_size: f64,
    stats: Stats,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTrajectory> for Trajectory {
    type Error = String;

    fn try_from(raw: RawTrajectory) -> Result<Self, Self::Error> {
        check_shape(&raw.times, &raw.states, raw.dimension)?;
        Ok(Trajectory {
            times: raw.times,
            states: raw.states,
            dimension: raw.dimension,
            method: raw.method,
            step_size: raw.step_size,
            stats: raw.stats,
        })
    }
}

/// Invariants every accessor relies on: at least one sample, a positive
/// dimension, one full state row per time and increasing times
#[cfg(any(test, feature = "serde"))]
fn check_shape(times: &[f64], states: &[f64], dimension: usize) -> Result<(), String> {
    if dimension == 0 {
        return Err("trajectory dimension must be positive".to_string());
    }
    if times.is_empty() {
        return Err("trajectory must hold at least one sample".to_string());
    }
    if times.len().checked_mul(dimension) != Some(states.len()) {
        return Err(format!(
            "{} states do not fill {} samples of dimension {}",
            states.len(),
            times.len(),
            dimension
        ));
    }
    let increasing = |w: &[f64]| w[0].partial_cmp(&w[1]) == Some(std::cmp::Ordering::Less);
    if let Some(i) = times.windows(2).position(|w| !increasing(w)) {
        return Err(format!("sample times not increasing at index {}", i + 1));
    }
    Ok(())
}

impl Trajectory {
    /// Number of samples (`num_steps`)
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false` for a trajectory returned by the integrator
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of state components per sample
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Method that produced this trajectory
    pub fn method(&self) -> RkMethod {
        self.method
    }

    /// Fixed step size used
    pub fn step_size(&self) -> f64 {
        self.step_size
    }

    /// Evaluation counters for the run
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Sample times, strictly increasing, starting at `t0`
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Flat time-major state buffer
    pub fn states(&self) -> &[f64] {
        &self.states
    }

    /// State at sample `i`
    pub fn state(&self, i: usize) -> Option<&[f64]> {
        let start = i.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.states.get(start..end)
    }

    /// Component `j` across all samples
    ///
    /// # Panics
    /// If `j >= dimension()`.
    pub fn component(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        assert!(
            j < self.dimension,
            "component {} out of range for dimension {}",
            j,
            self.dimension
        );
        self.states
            .iter()
            .skip(j)
            .step_by(self.dimension)
            .copied()
    }

    /// Iterate over `(t, state)` rows
    pub fn iter(&self) -> Rows<'_> {
        self.times
            .iter()
            .copied()
            .zip(self.states.chunks_exact(self.dimension))
    }

    /// Final sample
    pub fn last(&self) -> (f64, &[f64]) {
        let n = self.times.len() - 1;
        let start = n * self.dimension;
        (self.times[n], &self.states[start..])
    }

    /// Give up the buffers: `(times, states)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.times, self.states)
    }

    /// Write one whitespace-separated line per sample: `t y_0 y_1 ...`
    pub fn write_table<W: Write>(&self, writer: W) -> io::Result<()> {
        self.write_table_with(writer, |_, _, _| {})
    }

    /// Like [`write_table`](Self::write_table), with extra columns per row
    ///
    /// `extra(t, state, columns)` pushes any additional values for the row,
    /// e.g. an analytical reference solution.
    pub fn write_table_with<W, F>(&self, mut writer: W, mut extra: F) -> io::Result<()>
    where
        W: Write,
        F: FnMut(f64, &[f64], &mut Vec<f64>),
    {
        let mut columns = Vec::new();
        for (t, y) in self.iter() {
            columns.clear();
            extra(t, y, &mut columns);

            write!(writer, "{:.6}", t)?;
            for v in y.iter().chain(columns.iter()) {
                write!(writer, " {:.6}", v)?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = (f64, &'a [f64]);
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
