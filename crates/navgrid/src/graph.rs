//! 8-connected traversal graph over an occupancy grid
//!
//! One node per grid cell, addressed by the same linear index as the grid
//! samples. Adjacency is built once per grid in compressed form: node `i`'s
//! edges are `edges[offsets[i]..offsets[i + 1]]`.

use crate::grid::{GridCoord, OccupancyGrid};
use glam::Vec3;
use std::f32::consts::SQRT_2;

/// Graph node index; identical to the grid's linear sample index
pub type NodeId = usize;

/// When diagonal steps are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagonalMovement {
    /// Diagonals are always allowed, even between two blocked orthogonals
    #[default]
    Always,
    /// Orthogonal steps only
    Never,
    /// Diagonal allowed unless both adjacent orthogonals are blocked
    IfAtMostOneObstacle,
    /// Diagonal allowed only if both adjacent orthogonals are walkable
    OnlyWhenNoObstacles,
}

/// A graph node: one grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub coord: GridCoord,
    pub walkable: bool,
    /// World-space sample this node was built from
    pub sample: Option<Vec3>,
}

/// Directed edge to a neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeId,
    /// 1 for orthogonal steps, √2 for diagonal
    pub cost: f32,
}

/// Traversal graph over an [`OccupancyGrid`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    width: usize,
    height: usize,
    nodes: Vec<GraphNode>,
    offsets: Vec<usize>,
    edges: Vec<Edge>,
}

// Orthogonal neighbors: up, right, down, left
const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
// Diagonals: up-left, up-right, down-right, down-left
const DIAGONAL: [(isize, isize); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

impl Graph {
    /// Builds the graph for a grid. A node is walkable when its cell is
    /// occupied and it carries a sample.
    pub fn build(grid: &OccupancyGrid, diagonal: DiagonalMovement) -> Self {
        let (width, height) = (grid.width(), grid.height());

        let nodes: Vec<GraphNode> = (0..grid.len())
            .map(|index| {
                let coord = GridCoord::from_index(index, width, height);
                let sample = grid.sample(index);
                GraphNode {
                    coord,
                    walkable: grid.is_occupied(coord) && sample.is_some(),
                    sample,
                }
            })
            .collect();

        let mut graph = Self {
            width,
            height,
            nodes,
            offsets: Vec::with_capacity(grid.len() + 1),
            edges: Vec::new(),
        };
        graph.link(diagonal);

        log::debug!(
            "Built {}x{} graph: {} walkable nodes, {} edges",
            width,
            height,
            graph.walkable_count(),
            graph.edges.len()
        );

        graph
    }

    fn link(&mut self, diagonal: DiagonalMovement) {
        self.offsets.push(0);

        for id in 0..self.nodes.len() {
            let node = self.nodes[id];
            if node.walkable {
                let mut straight = [false; 4];
                for (i, &(dx, dy)) in ORTHOGONAL.iter().enumerate() {
                    if let Some(to) = self.walkable_neighbor(node.coord, dx, dy) {
                        straight[i] = true;
                        self.edges.push(Edge { to, cost: 1.0 });
                    }
                }

                // diagonal i sits between orthogonals (i + 3) % 4 and i
                for (i, &(dx, dy)) in DIAGONAL.iter().enumerate() {
                    let (a, b) = (straight[(i + 3) % 4], straight[i]);
                    let allowed = match diagonal {
                        DiagonalMovement::Always => true,
                        DiagonalMovement::Never => false,
                        DiagonalMovement::IfAtMostOneObstacle => a || b,
                        DiagonalMovement::OnlyWhenNoObstacles => a && b,
                    };
                    if !allowed {
                        continue;
                    }
                    if let Some(to) = self.walkable_neighbor(node.coord, dx, dy) {
                        self.edges.push(Edge { to, cost: SQRT_2 });
                    }
                }
            }
            self.offsets.push(self.edges.len());
        }
    }

    fn walkable_neighbor(&self, coord: GridCoord, dx: isize, dy: isize) -> Option<NodeId> {
        let x = coord.x.checked_add_signed(dx)?;
        let y = coord.y.checked_add_signed(dy)?;
        let id = self.node_id(GridCoord::new(x, y))?;
        self.nodes[id].walkable.then_some(id)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.walkable).count()
    }

    /// Node id of a cell, if it is inside the grid
    pub fn node_id(&self, coord: GridCoord) -> Option<NodeId> {
        (coord.x < self.width && coord.y < self.height).then(|| coord.to_index(self.height))
    }

    /// # Panics
    ///
    /// Panics if `id` is not below [`Graph::node_count`].
    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id]
    }

    pub fn is_walkable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.walkable)
    }

    /// Outgoing edges of a node; empty for ids outside the graph
    pub fn neighbors(&self, id: NodeId) -> &[Edge] {
        match self.offsets.get(id..).and_then(|o| o.get(..2)) {
            Some(&[start, end]) => &self.edges[start..end],
            _ => &[],
        }
    }
}
