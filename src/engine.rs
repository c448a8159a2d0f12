//! The boundary to the external traffic simulator.

use serde::{Deserialize, Serialize};

use crate::flow::Flow;
use crate::roadnet::Roadnet;
use crate::Result;

pub use scratch::{EngineConfig, ScratchFiles};

mod scratch;

/// The state of a single vehicle reported by an engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    /// Whether the vehicle is on the road, rather than queued to enter it.
    pub running: bool,
    /// The vehicle's speed in m/s.
    pub speed: f64,
}

/// A running simulation.
pub trait Engine {
    /// Advances the simulation by one step.
    fn next_step(&mut self) -> Result<()>;

    /// Gets the identifiers of the vehicles in the simulation, optionally
    /// including those waiting to enter the network.
    fn vehicles(&self, include_waiting: bool) -> Vec<String>;

    /// Gets the state of a vehicle, if it is in the simulation.
    fn vehicle_info(&self, id: &str) -> Option<VehicleInfo>;
}

/// Everything a simulator needs to run: the network and the demand placed on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub roadnet: Roadnet,
    pub flows: Vec<Flow>,
}

/// Starts isolated simulation runs.
///
/// Each call to [launch](Self::launch) must produce an independent engine,
/// so that runs may be performed concurrently.
pub trait Simulator: Sync {
    type Engine: Engine;

    fn launch(&self, scenario: &Scenario) -> Result<Self::Engine>;
}
