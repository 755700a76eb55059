use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::{Cost, EdgeId, VertexId, model::NetworkGraph, routing::Reach};

/// Shortest path tree of a single source search
///
/// Both vectors are indexed by vertex id. The tree holds the edge through
/// which each vertex was reached, `None` for the source and for unreached
/// vertices.
#[derive(Debug, Clone)]
pub struct DijkstraResult {
    source: VertexId,
    tree: Vec<Option<EdgeId>>,
    cost: Vec<Cost>,
}

impl DijkstraResult {
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// Incoming tree edge per vertex
    pub fn tree(&self) -> &[Option<EdgeId>] {
        &self.tree
    }

    /// Accumulated cost per vertex, `f64::INFINITY` where unreached
    pub fn costs(&self) -> &[Cost] {
        &self.cost
    }

    pub fn into_tree(self) -> Vec<Option<EdgeId>> {
        self.tree
    }

    pub fn reach(&self, vertex: VertexId) -> Reach {
        self.cost
            .get(vertex.index())
            .copied()
            .filter(|cost| cost.is_finite())
            .into()
    }

    pub fn is_reached(&self, vertex: VertexId) -> bool {
        self.reach(vertex).is_reached()
    }

    /// Reached vertices with their costs, in ascending vertex id
    pub fn reached(&self) -> impl Iterator<Item = (VertexId, Cost)> + '_ {
        self.cost
            .iter()
            .enumerate()
            .filter(|(_, cost)| cost.is_finite())
            .map(|(i, cost)| (VertexId::new(i), *cost))
    }

    /// Tree edges from the source to `target`, in travel order
    pub fn path_edges(&self, target: VertexId, graph: &NetworkGraph) -> Option<Vec<EdgeId>> {
        if !self.is_reached(target) {
            return None;
        }

        let mut edges = Vec::new();
        let mut current = target;
        while current != self.source {
            let edge = self.tree[current.index()]?;
            edges.push(edge);
            let (from, _) = graph.edge_endpoints(edge)?;
            current = from;
        }
        edges.reverse();
        Some(edges)
    }

    /// Vertices from the source to `target`, both included
    pub fn path_vertices(&self, target: VertexId, graph: &NetworkGraph) -> Option<Vec<VertexId>> {
        let edges = self.path_edges(target, graph)?;
        let mut vertices = Vec::with_capacity(edges.len() + 1);
        vertices.push(self.source);
        for edge in edges {
            let (_, to) = graph.edge_endpoints(edge)?;
            vertices.push(to);
        }
        Some(vertices)
    }
}

/// Single source shortest paths over every vertex of the graph.
///
/// The caller validates `source` and `criterion`; edges lacking a cost for the
/// criterion are not traversed.
pub fn dijkstra(graph: &NetworkGraph, source: VertexId, criterion: usize) -> DijkstraResult {
    dijkstra_within(graph, source, criterion, None)
}

/// Like [`dijkstra`] but stops once the frontier exceeds `limit`.
///
/// Vertices that were not settled before stopping are reported unreached, so
/// every reported cost is final.
pub fn dijkstra_within(
    graph: &NetworkGraph,
    source: VertexId,
    criterion: usize,
    limit: Option<Cost>,
) -> DijkstraResult {
    let n = graph.vertex_count();
    let mut cost = vec![f64::INFINITY; n];
    let mut tree: Vec<Option<EdgeId>> = vec![None; n];
    let mut settled = FixedBitSet::with_capacity(n);
    let mut heap = BinaryHeap::with_capacity(n.min(1024));

    cost[source.index()] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost: current, node }) = heap.pop() {
        if settled.contains(node.index()) {
            continue;
        }
        if limit.is_some_and(|max| current > max) {
            break;
        }
        settled.insert(node.index());

        for edge in graph.inner().edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let Some(weight) = edge.weight().cost(criterion) else {
                continue;
            };

            let next_cost = current + weight;
            if next_cost < cost[next.index()] {
                cost[next.index()] = next_cost;
                tree[next.index()] = Some(edge.id());
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }

    if limit.is_some() {
        for i in 0..n {
            if !settled.contains(i) {
                cost[i] = f64::INFINITY;
                tree[i] = None;
            }
        }
    }

    DijkstraResult { source, tree, cost }
}
