//! A* search over the grid graph
//!
//! The open list is a binary min-heap with lazy deletion: a node may be
//! pushed several times and stale entries are dropped when popped.

use navgrid::{Graph, GridCoord, NodeId};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

/// Distance estimate between two grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    Manhattan,
    Euclidean,
    /// 8-connected distance, `(√2 - 1)·min + max`
    #[default]
    Octile,
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(self, a: GridCoord, b: GridCoord) -> f32 {
        let dx = a.x.abs_diff(b.x) as f32;
        let dy = a.y.abs_diff(b.y) as f32;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Octile => (SQRT_2 - 1.0) * dx.min(dy) + dx.max(dy),
            Heuristic::Chebyshev => dx.max(dy),
        }
    }
}

/// Search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub heuristic: Heuristic,
    /// Multiplier applied to the heuristic
    pub weight: f32,
    /// Return the path to the expanded node closest to the goal when the
    /// goal itself cannot be reached
    pub closest: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Octile,
            weight: 1.0,
            closest: false,
        }
    }
}

impl SearchOptions {
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_closest(mut self, closest: bool) -> Self {
        self.closest = closest;
        self
    }
}

/// Open list entry
#[derive(Debug, Clone, Copy)]
struct HeapNode {
    node: NodeId,
    f: f32,
}

impl PartialEq for HeapNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapNode {}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f first, then lowest node id
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Finds a path from `start` to `goal`, both ends included.
///
/// Returns `None` when either node is outside the graph, when `start` is not
/// walkable, or when the goal is unreachable and `closest` is off.
pub fn astar(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    options: &SearchOptions,
) -> Option<Vec<NodeId>> {
    let count = graph.node_count();
    if start >= count || goal >= count {
        return None;
    }
    if !graph.is_walkable(start) {
        log::debug!("Search start {} is not walkable", start);
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let goal_coord = graph.node(goal).coord;
    let estimate = |id: NodeId| {
        options
            .heuristic
            .estimate(graph.node(id).coord, goal_coord)
            * options.weight
    };

    let mut cost = vec![f32::INFINITY; count];
    let mut parent: Vec<Option<NodeId>> = vec![None; count];
    let mut closed = vec![false; count];
    let mut open = BinaryHeap::new();

    cost[start] = 0.0;
    open.push(HeapNode {
        node: start,
        f: estimate(start),
    });

    let mut closest = start;
    let mut closest_h = f32::INFINITY;

    while let Some(HeapNode { node, .. }) = open.pop() {
        if closed[node] {
            continue;
        }
        closed[node] = true;

        if node == goal {
            return Some(reconstruct(&parent, goal));
        }

        if options.closest {
            let h = estimate(node);
            if h < closest_h {
                closest = node;
                closest_h = h;
            }
        }

        for edge in graph.neighbors(node) {
            if closed[edge.to] {
                continue;
            }
            let g = cost[node] + edge.cost;
            if g < cost[edge.to] {
                cost[edge.to] = g;
                parent[edge.to] = Some(node);
                open.push(HeapNode {
                    node: edge.to,
                    f: g + estimate(edge.to),
                });
            }
        }
    }

    if options.closest {
        log::debug!(
            "Goal {} unreachable from {}, falling back to closest node {}",
            goal,
            start,
            closest
        );
        Some(reconstruct(&parent, closest))
    } else {
        log::debug!("Goal {} unreachable from {}", goal, start);
        None
    }
}

fn reconstruct(parent: &[Option<NodeId>], end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(prev) = parent[current] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
