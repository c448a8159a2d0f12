//! Ready-made networks and demand for experiments.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::flow::CustomEndpointFlowStrategy;
use crate::{Graph, Vertex};

/// The length of each arm of the single intersection network, in m.
const ARM_LENGTH: i64 = 400;

/// A single chain of `n` turns laid out as a square spiral about the origin.
///
/// Arm `i` is `i` edges long and alternates between heading west then south
/// and heading east then north.
pub fn spiral_graph(n: usize, width: i64) -> Graph {
    let mut cur = Vertex::new(0, 0);
    let mut vertices = vec![cur];
    for i in 1..n {
        let sign = if i % 2 == 0 { 1 } else { -1 };
        for _ in 0..i {
            cur = Vertex::new(cur.x + sign * width, cur.y);
            vertices.push(cur);
        }
        for _ in 0..i {
            cur = Vertex::new(cur.x, cur.y + sign * width);
            vertices.push(cur);
        }
    }

    let mut graph = Graph::default();
    graph.add_vertex(vertices[0]);
    for (u, v) in vertices.into_iter().tuple_windows() {
        graph.connect(u, v);
    }
    graph
}

/// Two parallel east-west roads joined by a single north-south road,
/// forming two T junctions.
pub fn i_graph() -> Graph {
    let edges = [
        ((-400, 0), (0, 0)),
        ((0, 0), (400, 0)),
        ((0, 0), (0, 400)),
        ((-400, 400), (0, 400)),
        ((0, 400), (400, 400)),
    ];
    let mut graph = Graph::default();
    for ((ax, ay), (bx, by)) in edges {
        graph.connect(Vertex::new(ax, ay), Vertex::new(bx, by));
    }
    graph
}

/// A four-way intersection at the origin with a dead end at the end of each arm.
pub fn single_intersection() -> Graph {
    let centre = Vertex::new(0, 0);
    let mut graph = Graph::default();
    for arm in single_intersection_arms() {
        graph.connect(arm, centre);
    }
    graph
}

/// The single intersection with equal demand from and to every arm.
pub fn single_intersection_balanced() -> (Graph, CustomEndpointFlowStrategy) {
    let intervals = single_intersection_arms()
        .into_iter()
        .map(|arm| (arm, 20.0))
        .collect::<BTreeMap<_, _>>();
    (
        single_intersection(),
        CustomEndpointFlowStrategy::new(intervals.clone(), intervals),
    )
}

fn single_intersection_arms() -> [Vertex; 4] {
    [
        Vertex::new(0, -ARM_LENGTH),
        Vertex::new(0, ARM_LENGTH),
        Vertex::new(-ARM_LENGTH, 0),
        Vertex::new(ARM_LENGTH, 0),
    ]
}

/// A grid of `rows` by `cols` four-way intersections `spacing` apart, with a
/// dead end beyond the grid at each end of every row and column.
///
/// The intersections occupy `(c * spacing, r * spacing)` for `c` in `1..=cols`
/// and `r` in `1..=rows`.
pub fn grid_graph(rows: usize, cols: usize, spacing: i64) -> Graph {
    let (rows, cols) = (rows as i64, cols as i64);
    let mut graph = Graph::default();
    for r in 1..=rows {
        for c in 0..=cols {
            graph.connect(
                Vertex::new(c * spacing, r * spacing),
                Vertex::new((c + 1) * spacing, r * spacing),
            );
        }
    }
    for c in 1..=cols {
        for r in 0..=rows {
            graph.connect(
                Vertex::new(c * spacing, r * spacing),
                Vertex::new(c * spacing, (r + 1) * spacing),
            );
        }
    }
    graph
}
