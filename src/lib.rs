//! Compiles grid-aligned road network graphs into simulator roadnets and
//! vehicle flows, and searches for traffic light timings that minimise a
//! simulated performance metric.

pub use cgmath;
pub use driver::{DriverConfig, SimulationDriver};
pub use engine::{Engine, EngineConfig, Scenario, ScratchFiles, Simulator, VehicleInfo};
pub use error::{Error, Result};
pub use flow::{graph_to_flow, graph_to_flow_with_vehicle, Flow, FlowStrategy, VehicleAttributes};
pub use graph::{Graph, Vertex};
pub use metrics::{Metric, MetricKind, Report};
pub use optimize::{Evaluation, Objective, Optimizer};
pub use road::{Direction, Road};
pub use roadnet::{graph_to_roadnet, graph_to_roadnet_timed, PhaseTimings, Roadnet, RoadnetConfig};
pub use util::Interval;

pub mod driver;
pub mod engine;
mod error;
pub mod flow;
pub mod geometry;
mod graph;
pub mod math;
pub mod metrics;
pub mod optimize;
pub mod road;
pub mod roadnet;
pub mod scenarios;
mod util;
