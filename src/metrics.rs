//! Performance metrics accumulated over one simulation run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;

/// Vehicles slower than this, in m/s, are counted as waiting.
pub const WAITING_SPEED: f64 = 0.1;

/// The outcome of a metric.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The value to minimise.
    pub target: f64,
    /// The unnormalised value of the metric.
    pub raw: f64,
    /// The value of the metric after each step.
    pub series: Vec<f64>,
}

/// Observes a simulation once per step and summarises it at the end.
///
/// A metric is created fresh for each run. Reporting before the last step
/// summarises the steps seen so far.
pub trait Metric {
    /// Observes the current state of the engine.
    fn update(&mut self, engine: &dyn Engine);

    fn report(&self) -> Report;

    fn name(&self) -> &'static str;
}

/// Selects a metric to be instantiated for each run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    CompletedJourneys,
    WaitTime,
}

impl MetricKind {
    /// Creates a new, empty instance of the metric.
    pub fn create(self) -> Box<dyn Metric> {
        match self {
            MetricKind::CompletedJourneys => Box::new(CompletedJourneysMetric::new()),
            MetricKind::WaitTime => Box::new(WaitTimeMetric::new()),
        }
    }
}

/// Counts the vehicles that have finished their journeys.
///
/// The target is the proportion of vehicles seen which have not finished.
#[derive(Clone, Debug, Default)]
pub struct CompletedJourneysMetric {
    /// Every vehicle seen so far.
    total: BTreeSet<String>,
    /// The vehicles in the most recent step.
    current: BTreeSet<String>,
    /// The number of completed journeys after each step.
    completed: Vec<f64>,
}

impl CompletedJourneysMetric {
    pub fn new() -> Self {
        Default::default()
    }

    /// Observes the vehicles present in one step.
    pub fn observe(&mut self, vehicles: impl IntoIterator<Item = String>) {
        self.current = vehicles.into_iter().collect();
        self.total.extend(self.current.iter().cloned());
        self.completed.push(self.completed_count() as f64);
    }

    fn completed_count(&self) -> usize {
        self.total.difference(&self.current).count()
    }
}

impl Metric for CompletedJourneysMetric {
    fn update(&mut self, engine: &dyn Engine) {
        self.observe(engine.vehicles(true));
    }

    fn report(&self) -> Report {
        let completed = self.completed_count();
        let target = if self.total.is_empty() {
            1.0
        } else {
            1.0 - completed as f64 / self.total.len() as f64
        };
        Report {
            target,
            raw: completed as f64,
            series: self.completed.clone(),
        }
    }

    fn name(&self) -> &'static str {
        "completed journeys"
    }
}

/// Measures the average number of steps each vehicle spends waiting.
///
/// Vehicles queued to enter the network count as waiting. The series holds
/// the proportion of vehicles waiting in each step.
#[derive(Clone, Debug, Default)]
pub struct WaitTimeMetric {
    /// Every vehicle seen so far.
    unique: BTreeSet<String>,
    /// The number of waiting vehicles in each step.
    waiting: Vec<usize>,
    /// The number of vehicles in each step.
    present: Vec<usize>,
}

impl WaitTimeMetric {
    pub fn new() -> Self {
        Default::default()
    }

    /// Observes one step, given each vehicle and its speed.
    pub fn observe(&mut self, vehicles: impl IntoIterator<Item = (String, f64)>) {
        let (mut waiting, mut present) = (0, 0);
        for (id, speed) in vehicles {
            if speed < WAITING_SPEED {
                waiting += 1;
            }
            present += 1;
            self.unique.insert(id);
        }
        self.waiting.push(waiting);
        self.present.push(present);
    }
}

impl Metric for WaitTimeMetric {
    fn update(&mut self, engine: &dyn Engine) {
        let vehicles = engine.vehicles(true).into_iter().map(|id| {
            // Vehicles not yet on the road have no speed
            let speed = engine
                .vehicle_info(&id)
                .filter(|info| info.running)
                .map_or(0.0, |info| info.speed);
            (id, speed)
        });
        self.observe(vehicles.collect::<Vec<_>>());
    }

    fn report(&self) -> Report {
        let series = self
            .waiting
            .iter()
            .zip(&self.present)
            .map(|(&waiting, &present)| match present {
                0 => 0.0,
                n => waiting as f64 / n as f64,
            })
            .collect();
        if self.unique.is_empty() || self.waiting.is_empty() {
            return Report {
                series,
                ..Default::default()
            };
        }
        let total = self.waiting.iter().sum::<usize>() as f64;
        let raw = total / self.unique.len() as f64;
        Report {
            target: raw / self.waiting.len() as f64,
            raw,
            series,
        }
    }

    fn name(&self) -> &'static str {
        "average steps waiting"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn completed_journeys() {
        let mut metric = CompletedJourneysMetric::new();
        for step in [ids(&[]), ids(&["a", "b"]), ids(&["a"]), ids(&[])] {
            metric.observe(step);
        }
        let report = metric.report();
        assert_eq!(report.raw, 2.0);
        assert_approx_eq!(report.target, 0.0);
        assert_eq!(report.series, vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn partial_completed_journeys() {
        let mut metric = CompletedJourneysMetric::new();
        metric.observe(ids(&["a", "b"]));
        metric.observe(ids(&["a", "c"]));
        let report = metric.report();
        assert_eq!(report.raw, 1.0);
        assert_approx_eq!(report.target, 1.0 - 1.0 / 3.0);
    }

    #[test]
    fn empty_runs() {
        assert_eq!(CompletedJourneysMetric::new().report().target, 1.0);
        assert_eq!(WaitTimeMetric::new().report(), Report::default());
    }

    #[test]
    fn wait_time() {
        let mut metric = WaitTimeMetric::new();
        metric.observe(vec![("a".to_string(), 0.0), ("b".to_string(), 5.0)]);
        metric.observe(vec![("a".to_string(), 3.0), ("b".to_string(), 5.0)]);
        let report = metric.report();
        assert_approx_eq!(report.raw, 0.5);
        assert_approx_eq!(report.target, 0.25);
        assert_eq!(report.series, vec![0.5, 0.0]);
    }

    #[test]
    fn wait_time_series_handles_empty_steps() {
        let mut metric = WaitTimeMetric::new();
        metric.observe(vec![]);
        metric.observe(vec![("a".to_string(), 0.0)]);
        metric.observe(vec![("a".to_string(), 0.0), ("b".to_string(), 1.0)]);
        metric.observe(vec![]);
        assert_eq!(metric.report().series, vec![0.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn kinds_create_fresh_metrics() {
        assert_eq!(MetricKind::CompletedJourneys.create().name(), "completed journeys");
        assert_eq!(MetricKind::WaitTime.create().name(), "average steps waiting");
    }
}
