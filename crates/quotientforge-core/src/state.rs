//! Points in a real-vector configuration space.

use std::fmt;
use std::ops::Index;

use smallvec::SmallVec;

/// Inline capacity covering the usual rigid-body and small-arm spaces.
const INLINE_DIMENSIONS: usize = 8;

/// A configuration: one coordinate per dimension of its space.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct State {
    values: SmallVec<[f64; INLINE_DIMENSIONS]>,
}

impl State {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    pub fn zeros(dimension: usize) -> Self {
        Self {
            values: SmallVec::from_elem(0.0, dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Keeps the first `dimension` coordinates.
    ///
    /// Returns `None` when the state has fewer coordinates than requested.
    pub fn project(&self, dimension: usize) -> Option<State> {
        if dimension > self.values.len() {
            return None;
        }
        Some(State::new(self.values[..dimension].iter().copied()))
    }

    /// Euclidean distance. Coordinates beyond the shorter state are ignored.
    pub fn distance(&self, other: &State) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    /// Linear interpolation; `t = 0` yields `self`, `t = 1` yields `to`.
    pub fn interpolate(&self, to: &State, t: f64) -> State {
        State::new(
            self.values
                .iter()
                .zip(to.values.iter())
                .map(|(a, b)| a + (b - a) * t),
        )
    }
}

impl From<Vec<f64>> for State {
    fn from(values: Vec<f64>) -> Self {
        State::new(values)
    }
}

impl<const N: usize> From<[f64; N]> for State {
    fn from(values: [f64; N]) -> Self {
        State::new(values)
    }
}

impl Index<usize> for State {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.3}")?;
        }
        write!(f, ")")
    }
}
