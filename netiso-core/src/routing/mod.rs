//! Shortest path searches over a built network

pub mod dijkstra;
pub mod od_matrix;
pub mod path;

pub use dijkstra::DijkstraResult;
pub use od_matrix::{OdCosts, OdGeometry, OdRecord, od_matrix, od_matrix_within};
pub use path::{Route, shortest_path};

use crate::Cost;

/// Outcome of a lookup that may hit a vertex no path leads to
///
/// Unreachability is a regular outcome, never an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reach<T = Cost> {
    Reached(T),
    Unreached,
}

impl<T> Reach<T> {
    pub fn is_reached(&self) -> bool {
        matches!(self, Reach::Reached(_))
    }

    pub fn reached(self) -> Option<T> {
        match self {
            Reach::Reached(value) => Some(value),
            Reach::Unreached => None,
        }
    }

    pub fn as_ref(&self) -> Reach<&T> {
        match self {
            Reach::Reached(value) => Reach::Reached(value),
            Reach::Unreached => Reach::Unreached,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reach<U> {
        match self {
            Reach::Reached(value) => Reach::Reached(f(value)),
            Reach::Unreached => Reach::Unreached,
        }
    }
}

impl<T> From<Option<T>> for Reach<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reach::Unreached, Reach::Reached)
    }
}
