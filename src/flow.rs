//! Synthesis of vehicle flows between the endpoints of a network.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::road::Road;
use crate::{Graph, Vertex};

pub use routing::{all_pairs_shortest_paths, ShortestPaths};
pub use strategy::{
    CompositeFlowStrategy, CustomEndpointFlowStrategy, FlowStrategy, ManualFlowStrategy,
    RandomFlowStrategy, UniformFlowStrategy,
};

mod routing;
mod strategy;

/// The attributes of the vehicles generated by a flow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleAttributes {
    /// The vehicle length in m.
    pub length: f64,
    /// The vehicle width in m.
    pub width: f64,
    /// The maximum acceleration in m/s^2.
    pub max_pos_acc: f64,
    /// The maximum deceleration in m/s^2.
    pub max_neg_acc: f64,
    /// The usual acceleration in m/s^2.
    pub usual_pos_acc: f64,
    /// The usual deceleration in m/s^2.
    pub usual_neg_acc: f64,
    /// The minimum gap to the vehicle in front in m.
    pub min_gap: f64,
    /// The maximum speed in m/s.
    pub max_speed: f64,
    /// The desired time headway in s.
    pub headway_time: f64,
}

impl Default for VehicleAttributes {
    fn default() -> Self {
        Self {
            length: 5.0,
            width: 2.0,
            max_pos_acc: 2.0,
            max_neg_acc: 4.5,
            usual_pos_acc: 2.0,
            usual_neg_acc: 4.5,
            min_gap: 2.5,
            max_speed: 12.67,
            headway_time: 1.5,
        }
    }
}

/// A stream of identical vehicles spawned at a fixed interval along a route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flow {
    pub vehicle: VehicleAttributes,
    /// The names of the roads travelled, in order.
    pub route: Vec<String>,
    /// The time between vehicle spawns in s.
    pub interval: f64,
    pub start_time: i64,
    /// The time at which spawning stops, or -1 to never stop.
    pub end_time: i64,
}

impl Flow {
    /// Creates an unbounded flow along a route given as a sequence of vertices.
    pub fn new(route: &[Vertex], interval: f64) -> Self {
        Self {
            vehicle: Default::default(),
            route: route_road_names(route),
            interval,
            start_time: 0,
            end_time: -1,
        }
    }
}

/// Gets the names of the roads joining consecutive vertices of a route.
pub fn route_road_names(route: &[Vertex]) -> Vec<String> {
    route
        .iter()
        .tuple_windows()
        .map(|(u, v)| Road::new(*u, *v, 0.0, 0.0).name())
        .collect()
}

/// Generates flows along the shortest route between every ordered pair of endpoints.
pub fn graph_to_flow(graph: &Graph, strategy: &mut dyn FlowStrategy) -> Vec<Flow> {
    let paths = all_pairs_shortest_paths(graph);
    let flows = paths
        .values()
        .flat_map(|routes| routes.values())
        .flat_map(|route| strategy.gen_flows(route))
        .collect::<Vec<_>>();
    log::debug!("Generated {} flows", flows.len());
    flows
}

/// Generates flows like [graph_to_flow], giving every flow the same vehicle attributes.
pub fn graph_to_flow_with_vehicle(
    graph: &Graph,
    strategy: &mut dyn FlowStrategy,
    vehicle: &VehicleAttributes,
) -> Vec<Flow> {
    let mut flows = graph_to_flow(graph, strategy);
    for flow in &mut flows {
        flow.vehicle = *vehicle;
    }
    flows
}
