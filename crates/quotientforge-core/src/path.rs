//! Geometric solution paths.

use crate::state::State;

/// Sequence of states from a level's start to its goal.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathGeometric {
    states: Vec<State>,
}

impl PathGeometric {
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    /// Sum of the Euclidean segment lengths.
    pub fn length(&self) -> f64 {
        self.states.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }

    pub fn append(&mut self, state: State) {
        self.states.push(state);
    }
}

impl FromIterator<State> for PathGeometric {
    fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
