//! Space descriptions: the sampling domain of one abstraction level.
//!
//! A level's space knows its dimension, can tell valid states from invalid
//! ones, and can sample uniformly. Spaces are shared immutably between the
//! orchestrator and the level planner built on them, so they are handed
//! around as [`SpacePtr`].

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;

use rand::Rng;

use crate::error::{QuotientForgeError, Result};
use crate::state::State;

/// Motion checking step as a fraction of the space extent.
const DEFAULT_RESOLUTION_FRACTION: f64 = 0.01;

/// Shared, immutable handle to a space description.
pub type SpacePtr = Arc<dyn SpaceInformation>;

/// Sampling domain of one level.
pub trait SpaceInformation: Send + Sync + Debug {
    /// Number of coordinates of a state in this space.
    fn dimension(&self) -> usize;

    /// Returns true if the state lies inside the bounds and is collision free.
    fn is_valid(&self, state: &State) -> bool;

    /// Draws a state uniformly from the bounds (validity is not checked).
    fn sample_uniform(&self, rng: &mut dyn rand::RngCore) -> State;

    /// Uniform sample of a single coordinate.
    fn sample_coordinate(&self, axis: usize, rng: &mut dyn rand::RngCore) -> f64;

    /// Largest distance between two states of the space.
    fn maximum_extent(&self) -> f64;

    /// Step length used when checking motions for validity.
    fn resolution(&self) -> f64 {
        self.maximum_extent() * DEFAULT_RESOLUTION_FRACTION
    }

    /// Checks every interpolated state between `from` and `to`.
    fn check_motion(&self, from: &State, to: &State) -> bool {
        if !self.is_valid(to) {
            return false;
        }
        let resolution = self.resolution();
        if resolution <= 0.0 {
            return true;
        }
        let steps = (from.distance(to) / resolution).ceil() as usize;
        (1..steps).all(|i| self.is_valid(&from.interpolate(to, i as f64 / steps as f64)))
    }

    fn distance(&self, a: &State, b: &State) -> f64 {
        a.distance(b)
    }
}

/// Axis-aligned box that invalidates every state inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxObstacle {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl BoxObstacle {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Self {
        Self { lower, upper }
    }

    /// Returns true if the first coordinates of `state` fall inside the box.
    ///
    /// An obstacle may have fewer axes than the space it lives in; it then
    /// extends infinitely along the remaining axes.
    pub fn contains(&self, state: &State) -> bool {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .enumerate()
            .all(|(axis, (lo, hi))| {
                axis < state.dimension() && state[axis] >= *lo && state[axis] <= *hi
            })
    }

    pub fn dimension(&self) -> usize {
        self.lower.len()
    }
}

/// Bounded Euclidean space with box obstacles.
///
/// # Example
///
/// ```
/// use quotientforge_core::{BoxObstacle, RealVectorSpace, SpaceInformation, State};
///
/// let space = RealVectorSpace::new(vec![(0.0, 1.0), (0.0, 1.0)])
///     .unwrap()
///     .with_obstacle(BoxObstacle::new(vec![0.4, 0.0], vec![0.6, 0.8]));
///
/// assert_eq!(space.dimension(), 2);
/// assert!(space.is_valid(&State::from([0.1, 0.5])));
/// assert!(!space.is_valid(&State::from([0.5, 0.5])));
/// ```
#[derive(Debug, Clone)]
pub struct RealVectorSpace {
    bounds: Vec<(f64, f64)>,
    obstacles: Vec<BoxObstacle>,
    resolution: Option<f64>,
}

impl RealVectorSpace {
    /// Creates a space from per-axis `(low, high)` bounds.
    ///
    /// Every axis must have finite bounds with `low < high`.
    pub fn new(bounds: Vec<(f64, f64)>) -> Result<Self> {
        if bounds.is_empty() {
            return Err(QuotientForgeError::Config(
                "a space needs at least one dimension".to_string(),
            ));
        }
        let unbounded_axis = bounds
            .iter()
            .position(|(lo, hi)| !(hi - lo).is_finite());
        if let Some(axis) = unbounded_axis {
            return Err(QuotientForgeError::Config(format!(
                "axis {axis} has non-finite bounds {:?}",
                bounds[axis]
            )));
        }
        let empty_axis = bounds
            .iter()
            .position(|(lo, hi)| lo.partial_cmp(hi) != Some(Ordering::Less));
        if let Some(axis) = empty_axis {
            return Err(QuotientForgeError::Config(format!(
                "axis {axis} has empty bounds {:?}",
                bounds[axis]
            )));
        }
        Ok(Self {
            bounds,
            obstacles: Vec::new(),
            resolution: None,
        })
    }

    /// Unit hypercube `[0, 1]^dimension`.
    pub fn unit(dimension: usize) -> Result<Self> {
        Self::new(vec![(0.0, 1.0); dimension])
    }

    pub fn with_obstacle(mut self, obstacle: BoxObstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub fn obstacles(&self) -> &[BoxObstacle] {
        &self.obstacles
    }

    pub fn into_ptr(self) -> SpacePtr {
        Arc::new(self)
    }

    fn satisfies_bounds(&self, state: &State) -> bool {
        state.dimension() == self.bounds.len()
            && self
                .bounds
                .iter()
                .zip(state.values())
                .all(|((lo, hi), v)| v >= lo && v <= hi)
    }
}

impl SpaceInformation for RealVectorSpace {
    fn dimension(&self) -> usize {
        self.bounds.len()
    }

    fn is_valid(&self, state: &State) -> bool {
        self.satisfies_bounds(state) && !self.obstacles.iter().any(|o| o.contains(state))
    }

    fn sample_uniform(&self, rng: &mut dyn rand::RngCore) -> State {
        State::new((0..self.bounds.len()).map(|axis| self.sample_coordinate(axis, rng)))
    }

    fn sample_coordinate(&self, axis: usize, rng: &mut dyn rand::RngCore) -> f64 {
        let (lo, hi) = self.bounds[axis];
        rng.random_range(lo..=hi)
    }

    fn maximum_extent(&self) -> f64 {
        self.bounds
            .iter()
            .map(|(lo, hi)| (hi - lo) * (hi - lo))
            .sum::<f64>()
            .sqrt()
    }

    fn resolution(&self) -> f64 {
        self.resolution
            .unwrap_or_else(|| self.maximum_extent() * DEFAULT_RESOLUTION_FRACTION)
    }
}
