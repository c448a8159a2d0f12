use std::collections::BTreeMap;

use pathfinding::directed::dijkstra::{build_path, dijkstra_all};

use crate::{Graph, Vertex};

/// Shortest routes indexed by source endpoint, then destination endpoint.
pub type ShortestPaths = BTreeMap<Vertex, BTreeMap<Vertex, Vec<Vertex>>>;

/// Finds the shortest route, by number of edges, from every endpoint to every other endpoint.
///
/// Each route starts at its source and ends at its destination. Destinations that
/// cannot be reached from a source are omitted. Among routes of equal length the
/// one chosen is unspecified.
pub fn all_pairs_shortest_paths(graph: &Graph) -> ShortestPaths {
    let endpoints = graph.endpoints().collect::<Vec<_>>();

    endpoints
        .iter()
        .map(|source| {
            let parents = dijkstra_all(source, |u| successors(graph, *u));
            let routes = endpoints
                .iter()
                .filter(|dest| *dest != source && parents.contains_key(*dest))
                .map(|dest| (*dest, build_path(dest, &parents)))
                .collect();
            (*source, routes)
        })
        .collect()
}

fn successors(graph: &Graph, u: Vertex) -> Vec<(Vertex, usize)> {
    graph
        .neighbours(u)
        .map(|ns| ns.iter().map(|v| (*v, 1)).collect())
        .unwrap_or_default()
}
