//! Tests that evaluate signal timings against a scripted engine.

use assert_approx_eq::assert_approx_eq;
use roadnet_synth::flow::UniformFlowStrategy;
use roadnet_synth::optimize::{best, GridSearch, ProgressStopping, RandomSearch};
use roadnet_synth::scenarios::{i_graph, single_intersection};
use roadnet_synth::{
    DriverConfig, Engine, Error, Interval, MetricKind, Optimizer, Result, Scenario,
    SimulationDriver, Simulator, VehicleInfo,
};

/// An engine in which every vehicle is stationary until it leaves.
///
/// The vehicle of flow `i` is present from the first step until step
/// `cycle + i`, where `cycle` is a tenth of the total signal time at the
/// real intersections, so shorter cycles finish more journeys.
struct ScriptedEngine {
    step: usize,
    lifetimes: Vec<usize>,
    fail_at: Option<usize>,
}

impl ScriptedEngine {
    fn present(&self, i: usize) -> bool {
        self.step >= 1 && self.step <= self.lifetimes[i]
    }
}

impl Engine for ScriptedEngine {
    fn next_step(&mut self) -> Result<()> {
        self.step += 1;
        if self.fail_at == Some(self.step) {
            return Err(Error::Engine(format!("crashed at step {}", self.step)));
        }
        Ok(())
    }

    fn vehicles(&self, _include_waiting: bool) -> Vec<String> {
        (0..self.lifetimes.len())
            .filter(|i| self.present(*i))
            .map(|i| format!("flow_{}_0", i))
            .collect()
    }

    fn vehicle_info(&self, id: &str) -> Option<VehicleInfo> {
        self.vehicles(true).iter().any(|v| v == id).then_some(VehicleInfo {
            running: true,
            speed: 0.0,
        })
    }
}

#[derive(Default)]
struct ScriptedSimulator {
    fail_at: Option<usize>,
}

impl Simulator for ScriptedSimulator {
    type Engine = ScriptedEngine;

    fn launch(&self, scenario: &Scenario) -> Result<ScriptedEngine> {
        let total: f64 = scenario
            .roadnet
            .intersections
            .iter()
            .filter(|i| !i.is_virtual)
            .flat_map(|i| &i.traffic_light.lightphases)
            .map(|p| p.time)
            .sum();
        let cycle = (total / 10.0).ceil() as usize;
        Ok(ScriptedEngine {
            step: 0,
            lifetimes: (0..scenario.flows.len()).map(|i| cycle + i).collect(),
            fail_at: self.fail_at,
        })
    }
}

fn driver(config: DriverConfig) -> SimulationDriver<ScriptedSimulator> {
    driver_with(ScriptedSimulator::default(), config)
}

fn driver_with(
    simulator: ScriptedSimulator,
    config: DriverConfig,
) -> SimulationDriver<ScriptedSimulator> {
    SimulationDriver::new(
        single_intersection(),
        &mut UniformFlowStrategy::default(),
        simulator,
        config,
    )
}

fn short_run() -> DriverConfig {
    DriverConfig {
        steps: 10,
        ..Default::default()
    }
}

fn phase_times(scenario: &Scenario) -> Vec<f64> {
    let centre = scenario.roadnet.intersection("intersection_0_0").unwrap();
    centre.traffic_light.lightphases.iter().map(|p| p.time).collect()
}

#[test]
fn dimension_counts_free_phases() {
    assert_eq!(driver(DriverConfig::default()).dimension(), 4);
    let fixed = DriverConfig {
        fixed_period: Some(60.0),
        ..Default::default()
    };
    assert_eq!(driver(fixed).dimension(), 3);

    let two_junctions = SimulationDriver::new(
        i_graph(),
        &mut UniformFlowStrategy::default(),
        ScriptedSimulator::default(),
        DriverConfig::default(),
    );
    assert_eq!(two_junctions.dimension(), 8);
}

#[test]
fn wrong_parameter_count_is_rejected() {
    let driver = driver(DriverConfig::default());
    let result = driver.evaluate(&[10.0, 10.0, 10.0]);
    assert!(matches!(
        result,
        Err(Error::ParameterCount { expected: 4, got: 3 })
    ));
}

#[test]
fn parameters_set_phase_times() {
    let driver = driver(DriverConfig::default());
    let scenario = driver.scenario(&[11.0, 12.0, 13.0, 14.0]).unwrap();
    assert_eq!(phase_times(&scenario), vec![30.0, 11.0, 12.0, 13.0, 14.0]);
    assert_eq!(scenario.flows.len(), 12);
}

#[test]
fn fixed_period_infers_last_phase() {
    let driver = driver(DriverConfig {
        fixed_period: Some(60.0),
        ..Default::default()
    });
    let scenario = driver.scenario(&[10.0, 20.0, 5.0]).unwrap();
    assert_eq!(phase_times(&scenario), vec![30.0, 10.0, 20.0, 5.0, 25.0]);
}

#[test]
fn completed_journeys() {
    let driver = driver(short_run());
    // A cycle of 7 steps lets the vehicles of the first three flows finish
    let report = driver.evaluate(&[10.0; 4]).unwrap();
    assert_eq!(report.raw, 3.0);
    assert_approx_eq!(report.target, 0.75);
    assert_eq!(
        report.series,
        vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0]
    );
}

#[test]
fn wait_time() {
    let driver = driver(DriverConfig {
        metric: MetricKind::WaitTime,
        ..short_run()
    });
    let report = driver.evaluate(&[10.0; 4]).unwrap();
    // 7 + 8 + 9 + 9 * 10 waiting steps shared between 12 vehicles
    assert_approx_eq!(report.raw, 9.5);
    assert_approx_eq!(report.target, 0.95);
    assert_eq!(report.series, vec![1.0; 10]);
}

#[test]
fn engine_errors_propagate() {
    let simulator = ScriptedSimulator { fail_at: Some(3) };
    let driver = driver_with(simulator, short_run());
    assert!(matches!(driver.evaluate(&[10.0; 4]), Err(Error::Engine(_))));
}

#[test]
fn grid_search_prefers_short_cycles() {
    let driver = driver(short_run());
    let bounds = vec![Interval::new(10.0, 30.0); 4];
    let evaluations = GridSearch::new(2).minimize(&driver, &bounds).unwrap();
    assert_eq!(evaluations.len(), 16);
    let best = best(&evaluations).unwrap();
    assert_eq!(best.params, vec![10.0; 4]);
    assert_approx_eq!(best.report.target, 0.75);
}

#[test]
fn random_search_respects_bounds() {
    let driver = driver(short_run());
    let bounds = vec![Interval::new(5.0, 40.0); 4];
    let mut search = RandomSearch::new(7, ProgressStopping::new(100, 5));
    let evaluations = search.minimize(&driver, &bounds).unwrap();
    assert_eq!(evaluations.len(), 6);
    for e in &evaluations {
        assert!(e.params.iter().all(|p| (5.0..=40.0).contains(p)));
        assert!((0.0..=1.0).contains(&e.report.target));
    }
}
