mod shortest_tree;
mod state;

pub use shortest_tree::{DijkstraResult, dijkstra, dijkstra_within};
