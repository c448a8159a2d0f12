//! Evaluation of signal timings by simulation.

use serde::{Deserialize, Serialize};

use crate::engine::{Engine, Scenario, Simulator};
use crate::flow::{graph_to_flow, Flow, FlowStrategy};
use crate::metrics::{MetricKind, Report};
use crate::optimize::Objective;
use crate::roadnet::{
    graph_to_roadnet_timed, params_per_intersection, PhaseTimings, RoadnetConfig,
};
use crate::{Graph, Result};

/// The attributes of a [SimulationDriver].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// The number of steps each simulation runs for.
    pub steps: usize,
    /// If set, the duration of every signal cycle. The last phase of each
    /// intersection is then inferred rather than being a parameter.
    pub fixed_period: Option<f64>,
    /// The metric reported by each run.
    pub metric: MetricKind,
    pub roadnet: RoadnetConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            fixed_period: None,
            metric: MetricKind::default(),
            roadnet: RoadnetConfig::default(),
        }
    }
}

/// Runs a network under a given set of signal timings and reports a metric.
///
/// The demand is synthesised once when the driver is created, so repeated
/// evaluations of the same timings see the same flows.
pub struct SimulationDriver<S> {
    graph: Graph,
    flows: Vec<Flow>,
    simulator: S,
    config: DriverConfig,
}

impl<S: Simulator> SimulationDriver<S> {
    pub fn new(
        graph: Graph,
        strategy: &mut dyn FlowStrategy,
        simulator: S,
        config: DriverConfig,
    ) -> Self {
        let flows = graph_to_flow(&graph, strategy);
        Self {
            graph,
            flows,
            simulator,
            config,
        }
    }

    /// The number of timing parameters accepted by [evaluate](Self::evaluate).
    pub fn dimension(&self) -> usize {
        self.graph.real_intersections().count() * params_per_intersection(self.config.fixed_period)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Builds the scenario simulated for the given timing parameters.
    pub fn scenario(&self, params: &[f64]) -> Result<Scenario> {
        let timings = PhaseTimings::from_parameters(&self.graph, params, self.config.fixed_period)?;
        Ok(Scenario {
            roadnet: graph_to_roadnet_timed(&self.graph, &self.config.roadnet, &timings),
            flows: self.flows.clone(),
        })
    }

    /// Simulates the network with the given timing parameters.
    ///
    /// Parameters come in groups of four per real intersection (three with a
    /// fixed period), ordered as [Graph::real_intersections].
    pub fn evaluate(&self, params: &[f64]) -> Result<Report> {
        let scenario = self.scenario(params)?;
        let mut engine = self.simulator.launch(&scenario)?;
        let mut metric = self.config.metric.create();

        for _ in 0..self.config.steps {
            engine.next_step()?;
            metric.update(&engine);
        }

        let report = metric.report();
        log::debug!(
            "{:?} -> {} = {} (raw {})",
            params,
            metric.name(),
            report.target,
            report.raw
        );
        Ok(report)
    }
}

impl<S: Simulator> Objective for SimulationDriver<S> {
    fn dimension(&self) -> usize {
        SimulationDriver::dimension(self)
    }

    fn evaluate(&self, params: &[f64]) -> Result<Report> {
        SimulationDriver::evaluate(self, params)
    }
}
