//! Nested unit-cube worlds.
//!
//! Level `k` of an `n`-level world is the unit cube of dimension `k + 1`, so
//! each level is the projection of the next onto its leading coordinates.
//! Every world comes with a full-dimensional problem running from near the
//! origin corner along the first axis.
//!
//! # Example
//!
//! ```
//! use quotientforge_test::worlds::wall_world;
//!
//! let world = wall_world(3);
//! assert_eq!(world.spaces.len(), 3);
//! assert_eq!(world.problem.dimension(), 3);
//! ```

use quotientforge_core::{BoxObstacle, ProblemDefinition, RealVectorSpace, SpacePtr, State};

/// Coordinate of the start state on every axis.
pub const START: f64 = 0.1;

/// Goal coordinate along the first axis.
pub const GOAL: f64 = 0.9;

/// Goal radius used by every fixture problem.
pub const GOAL_THRESHOLD: f64 = 0.1;

/// A space sequence with a matching full-dimensional problem.
#[derive(Debug, Clone)]
pub struct World {
    pub spaces: Vec<SpacePtr>,
    pub problem: ProblemDefinition,
}

impl World {
    /// Problem projected onto every level, coarsest first.
    pub fn level_problems(&self) -> Vec<ProblemDefinition> {
        self.spaces
            .iter()
            .map(|space| {
                self.problem
                    .project_onto(space.as_ref())
                    .expect("fixture spaces are nested")
            })
            .collect()
    }
}

/// Obstacle-free nested unit cubes.
pub fn open_world(levels: usize) -> World {
    build(levels, |_| None)
}

/// Nested unit cubes where every level from 2D up has a wall across the
/// first axis with a gap above `y = 0.7`.
pub fn wall_world(levels: usize) -> World {
    build(levels, |dimension| {
        (dimension >= 2).then(|| BoxObstacle::new(vec![0.45, 0.0], vec![0.55, 0.7]))
    })
}

/// Like [`wall_world`] but the wall has no gap from level 1 up, so only
/// level 0 is solvable.
pub fn blocked_world(levels: usize) -> World {
    build(levels, |dimension| {
        (dimension >= 2).then(|| BoxObstacle::new(vec![0.45, 0.0], vec![0.55, 1.0]))
    })
}

fn build(levels: usize, obstacle: impl Fn(usize) -> Option<BoxObstacle>) -> World {
    let spaces = (1..=levels)
        .map(|dimension| {
            let space = RealVectorSpace::unit(dimension).expect("dimension is positive");
            match obstacle(dimension) {
                Some(o) => space.with_obstacle(o).into_ptr(),
                None => space.into_ptr(),
            }
        })
        .collect();
    let dimension = levels.max(1);
    let start = State::new(std::iter::repeat(START).take(dimension));
    let goal = State::new(
        std::iter::once(GOAL).chain(std::iter::repeat(START).take(dimension - 1)),
    );
    World {
        spaces,
        problem: ProblemDefinition::new(start, goal).with_goal_threshold(GOAL_THRESHOLD),
    }
}
