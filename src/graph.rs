//! Undirected graphs of intersection coordinates.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::math::Point2d;
use crate::{Error, Result};

/// The coordinate of an intersection or dead end.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i64,
    pub y: i64,
}

impl Vertex {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The vertex as a point in world space.
    pub fn point(&self) -> Point2d {
        Point2d::new(self.x as f64, self.y as f64)
    }
}

impl From<(i64, i64)> for Vertex {
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An undirected graph using an adjacency set representation.
///
/// Every edge is stored in both directions, and every vertex that appears
/// as a neighbour is itself a key. Self-loops are rejected and parallel
/// edges collapse into one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Graph {
    adjacency: BTreeMap<Vertex, BTreeSet<Vertex>>,
}

impl Graph {
    /// Creates a graph from a vertex list and an edge list.
    pub fn new(
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = (Vertex, Vertex)>,
    ) -> Result<Self> {
        let mut graph = Self {
            adjacency: vertices.into_iter().map(|v| (v, BTreeSet::new())).collect(),
        };
        for (u, v) in edges {
            graph.add_edge(u, v)?;
        }
        Ok(graph)
    }

    /// Adds an isolated vertex. Has no effect if the vertex already exists.
    pub fn add_vertex(&mut self, v: Vertex) {
        self.adjacency.entry(v).or_default();
    }

    /// Connects two existing vertices in both directions.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> Result<()> {
        if u == v {
            return Err(Error::SelfLoop(u));
        }
        self.check(u)?;
        self.check(v)?;
        self.connect(u, v);
        Ok(())
    }

    /// Disconnects two vertices in both directions.
    /// Returns whether the edge existed.
    pub fn remove_edge(&mut self, u: Vertex, v: Vertex) -> Result<bool> {
        self.check(u)?;
        self.check(v)?;
        let removed = self.adjacency.get_mut(&u).map_or(false, |n| n.remove(&v));
        if let Some(neighbours) = self.adjacency.get_mut(&v) {
            neighbours.remove(&u);
        }
        Ok(removed)
    }

    /// Gets the neighbours of a vertex.
    pub fn neighbours(&self, v: Vertex) -> Result<&BTreeSet<Vertex>> {
        self.adjacency.get(&v).ok_or(Error::VertexNotFound(v))
    }

    /// Gets the number of neighbours of a vertex.
    pub fn degree(&self, v: Vertex) -> Result<usize> {
        self.neighbours(v).map(BTreeSet::len)
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.adjacency.contains_key(&v)
    }

    /// Returns an iterator over all vertices.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.adjacency.keys().copied()
    }

    /// Returns an iterator over every undirected edge, each reported once.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(u, ns)| ns.iter().filter(move |v| u < *v).map(move |v| (*u, *v)))
    }

    /// Returns an iterator over every directed edge implied by the graph.
    pub fn directed_edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(u, ns)| ns.iter().map(move |v| (*u, *v)))
    }

    /// The dead ends of the network, which source and sink all demand.
    pub fn endpoints(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.adjacency
            .iter()
            .filter(|(_, ns)| ns.len() == 1)
            .map(|(v, _)| *v)
    }

    /// The vertices with more than two neighbours, in coordinate order.
    pub fn real_intersections(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.adjacency
            .iter()
            .filter(|(_, ns)| ns.len() > 2)
            .map(|(v, _)| *v)
    }

    /// The number of vertices.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Connects two distinct vertices, adding them if they are missing.
    pub(crate) fn connect(&mut self, u: Vertex, v: Vertex) {
        debug_assert_ne!(u, v);
        self.adjacency.entry(u).or_default().insert(v);
        self.adjacency.entry(v).or_default().insert(u);
    }

    fn check(&self, v: Vertex) -> Result<()> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(Error::VertexNotFound(v))
        }
    }
}

impl Index<Vertex> for Graph {
    type Output = BTreeSet<Vertex>;

    /// Panics if the vertex is not in the graph.
    fn index(&self, v: Vertex) -> &Self::Output {
        match self.adjacency.get(&v) {
            Some(neighbours) => neighbours,
            None => panic!("vertex {} not in graph", v),
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.adjacency.iter()).finish()
    }
}
