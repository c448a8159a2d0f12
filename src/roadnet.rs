//! Compilation of a [Graph] into a simulator roadnet.

use serde::{Deserialize, Serialize};

use crate::geometry::{turn_path, DEFAULT_PATH_SEGMENTS};
use crate::road::{intersection_name, Road, NUM_LANES};
use crate::{Graph, Vertex};
use phases::{partition_phases, VIRTUAL_PHASES};

pub use phases::{
    complete_phase_times, params_per_intersection, PhaseCategory, PhaseTimes, PhaseTimings,
    PARAMS_PER_INTERSECTION,
};
pub use records::*;

mod phases;
mod records;

/// The attributes used when compiling a roadnet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoadnetConfig {
    /// The distance from the centre of a real intersection to where its lanes end, in m.
    pub intersection_width: f64,
    /// The width of each lane in m.
    pub lane_width: f64,
    /// The speed limit of each lane in m/s.
    pub lane_speed: f64,
    /// The duration of phases without a configured time.
    pub phase_time: f64,
    /// The number of segments in each turning path.
    pub path_segments: usize,
}

impl Default for RoadnetConfig {
    fn default() -> Self {
        Self {
            intersection_width: 10.0,
            lane_width: 4.0,
            lane_speed: 20.0,
            phase_time: 30.0,
            path_segments: DEFAULT_PATH_SEGMENTS,
        }
    }
}

impl RoadnetConfig {
    fn road(&self, start: Vertex, end: Vertex) -> Road {
        Road::new(start, end, self.lane_width, self.lane_speed)
    }
}

/// Compiles a graph into a roadnet using the default phase durations.
pub fn graph_to_roadnet(graph: &Graph, config: &RoadnetConfig) -> Roadnet {
    graph_to_roadnet_timed(graph, config, &PhaseTimings::new())
}

/// Compiles a graph into a roadnet, taking the phase durations of each
/// real intersection from `timings` where present.
pub fn graph_to_roadnet_timed(
    graph: &Graph,
    config: &RoadnetConfig,
    timings: &PhaseTimings,
) -> Roadnet {
    let roads = graph
        .directed_edges()
        .map(|(u, v)| config.road(u, v).record())
        .collect::<Vec<_>>();

    let intersections = graph
        .vertices()
        .map(|u| {
            if graph[u].len() <= 2 {
                virtual_intersection(graph, u, config)
            } else {
                real_intersection(graph, u, config, timings)
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Compiled roadnet with {} intersections and {} roads",
        intersections.len(),
        roads.len()
    );

    Roadnet { intersections, roads }
}

/// Builds a pass-through intersection, at which vehicles have no choice of direction.
fn virtual_intersection(graph: &Graph, u: Vertex, config: &RoadnetConfig) -> IntersectionRecord {
    let outgoing = graph[u].iter().map(|v| config.road(u, *v).name());
    let incoming = graph[u].iter().map(|v| config.road(*v, u).name());
    IntersectionRecord {
        id: intersection_name(u),
        point: u.point().into(),
        width: 0.0,
        roads: outgoing.chain(incoming).collect(),
        road_links: vec![],
        traffic_light: TrafficLightRecord {
            road_link_indices: vec![],
            lightphases: VIRTUAL_PHASES.clone(),
        },
        is_virtual: true,
    }
}

/// Builds a signalised intersection with a road link for each permitted movement.
///
/// At most one road per compass direction is kept; with more than four
/// neighbours later roads replace earlier ones in the same direction.
fn real_intersection(
    graph: &Graph,
    u: Vertex,
    config: &RoadnetConfig,
    timings: &PhaseTimings,
) -> IntersectionRecord {
    let mut incoming: [Option<Road>; 4] = [None; 4];
    let mut outgoing: [Option<Road>; 4] = [None; 4];
    for v in &graph[u] {
        let in_road = config.road(*v, u);
        let out_road = config.road(u, *v);
        incoming[in_road.direction.index()] = Some(in_road);
        outgoing[out_road.direction.index()] = Some(out_road);
    }

    let roads = incoming
        .iter()
        .chain(outgoing.iter())
        .flatten()
        .map(Road::name)
        .collect();

    // For each incoming road, try turning right, going straight and turning left
    let mut road_links = vec![];
    let mut movements = vec![];
    for in_road in incoming.iter().flatten() {
        for offset in [-1, 0, 1] {
            let out_dir = in_road.direction.turn(offset);
            let (Some(out_road), Some(turn)) =
                (outgoing[out_dir.index()], TurnType::from_offset(offset))
            else {
                continue;
            };
            road_links.push(road_link(in_road, &out_road, turn, config));
            movements.push((turn, in_road.direction));
        }
    }

    let lightphases = partition_phases(&movements, config.phase_time, timings.get(u)).to_vec();

    IntersectionRecord {
        id: intersection_name(u),
        point: u.point().into(),
        width: config.intersection_width,
        roads,
        traffic_light: TrafficLightRecord {
            road_link_indices: (0..road_links.len()).collect(),
            lightphases,
        },
        road_links,
        is_virtual: false,
    }
}

/// Builds a road link with a lane link to every lane of the outgoing road.
fn road_link(
    in_road: &Road,
    out_road: &Road,
    turn: TurnType,
    config: &RoadnetConfig,
) -> RoadLinkRecord {
    let start_lane = turn.start_lane();
    let lane_links = (0..NUM_LANES)
        .map(|end_lane| LaneLinkRecord {
            start_lane_index: start_lane,
            end_lane_index: end_lane,
            points: turn_path(
                in_road,
                start_lane,
                out_road,
                end_lane,
                config.intersection_width,
                config.path_segments,
            )
            .into_iter()
            .map(PointRecord::from)
            .collect(),
        })
        .collect();

    RoadLinkRecord {
        turn,
        start_road: in_road.name(),
        end_road: out_road.name(),
        direction: in_road.direction.index(),
        lane_links,
    }
}
