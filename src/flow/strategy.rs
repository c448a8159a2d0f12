//! Policies that decide the demand placed on each route.

use std::collections::{BTreeMap, BTreeSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

use super::Flow;
use crate::{Error, Result, Vertex};

/// The smallest interval a [RandomFlowStrategy] will produce, in s.
const MIN_RANDOM_INTERVAL: f64 = 1.0;

/// Decides which flows to generate along a route.
pub trait FlowStrategy {
    /// Generates zero or more flows along a route given as a sequence of vertices.
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow>;
}

/// Creates exactly one flow per route, all with the same interval.
#[derive(Clone, Copy, Debug)]
pub struct UniformFlowStrategy {
    interval: f64,
}

impl UniformFlowStrategy {
    pub fn new(interval: f64) -> Self {
        Self { interval }
    }
}

impl Default for UniformFlowStrategy {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl FlowStrategy for UniformFlowStrategy {
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow> {
        vec![Flow::new(route, self.interval)]
    }
}

/// Creates one flow per route with an interval sampled from a normal distribution,
/// never less than one second.
#[derive(Clone, Debug)]
pub struct RandomFlowStrategy {
    loc: f64,
    scale: f64,
    rng: StdRng,
}

impl RandomFlowStrategy {
    /// Creates a strategy seeded from the operating system.
    pub fn new(loc: f64, scale: f64) -> Result<Self> {
        Self::with_rng(loc, scale, StdRng::from_entropy())
    }

    /// Creates a strategy which produces the same intervals for the same seed.
    pub fn seeded(loc: f64, scale: f64, seed: u64) -> Result<Self> {
        Self::with_rng(loc, scale, StdRng::seed_from_u64(seed))
    }

    fn with_rng(loc: f64, scale: f64, rng: StdRng) -> Result<Self> {
        if !loc.is_finite() || !scale.is_finite() || scale < 0.0 {
            return Err(Error::InvalidDistribution(format!("N({}, {})", loc, scale)));
        }
        Ok(Self { loc, scale, rng })
    }
}

impl Default for RandomFlowStrategy {
    /// Intervals drawn from N(2, 1), seeded from the operating system.
    fn default() -> Self {
        Self {
            loc: 2.0,
            scale: 1.0,
            rng: StdRng::from_entropy(),
        }
    }
}

impl FlowStrategy for RandomFlowStrategy {
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow> {
        let z: f64 = StandardNormal.sample(&mut self.rng);
        let interval = f64::max(MIN_RANDOM_INTERVAL, self.loc + self.scale * z);
        vec![Flow::new(route, interval)]
    }
}

/// Sets each route's interval from the endpoints it joins.
///
/// The interval is the start endpoint's interval, raised to the end endpoint's
/// interval if that is larger: a destination only accepts flows at or above
/// its own interval. Destinations without an interval impose no limit.
/// Routes from a source without an interval fall back to the default, and the
/// source is recorded in [unconfigured_sources](Self::unconfigured_sources).
#[derive(Clone, Debug)]
pub struct CustomEndpointFlowStrategy {
    start_intervals: BTreeMap<Vertex, f64>,
    end_intervals: BTreeMap<Vertex, f64>,
    default: f64,
    unconfigured: BTreeSet<Vertex>,
}

impl CustomEndpointFlowStrategy {
    pub fn new(
        start_intervals: BTreeMap<Vertex, f64>,
        end_intervals: BTreeMap<Vertex, f64>,
    ) -> Self {
        Self {
            start_intervals,
            end_intervals,
            default: 2.0,
            unconfigured: BTreeSet::new(),
        }
    }

    /// Sets the interval used for routes from sources without one.
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    /// The sources for which the default interval has been used.
    pub fn unconfigured_sources(&self) -> &BTreeSet<Vertex> {
        &self.unconfigured
    }
}

impl FlowStrategy for CustomEndpointFlowStrategy {
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow> {
        let (Some(start), Some(end)) = (route.first(), route.last()) else {
            return vec![];
        };
        let interval = match self.start_intervals.get(start) {
            Some(start_interval) => match self.end_intervals.get(end) {
                Some(end_interval) => f64::max(*start_interval, *end_interval),
                None => *start_interval,
            },
            None => {
                log::warn!(
                    "Custom flow strategy does not define flow interval for source {}.",
                    start
                );
                self.unconfigured.insert(*start);
                self.default
            }
        };
        vec![Flow::new(route, interval)]
    }
}

/// Looks up the interval of each route by its start and end points.
/// Routes without an entry get no flow.
#[derive(Clone, Debug, Default)]
pub struct ManualFlowStrategy {
    intervals: BTreeMap<(Vertex, Vertex), f64>,
}

impl ManualFlowStrategy {
    pub fn new(intervals: BTreeMap<(Vertex, Vertex), f64>) -> Self {
        Self { intervals }
    }
}

impl FlowStrategy for ManualFlowStrategy {
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow> {
        let (Some(start), Some(end)) = (route.first(), route.last()) else {
            return vec![];
        };
        self.intervals
            .get(&(*start, *end))
            .map(|interval| Flow::new(route, *interval))
            .into_iter()
            .collect()
    }
}

/// Layers the demand of several strategies on every route.
#[derive(Default)]
pub struct CompositeFlowStrategy {
    strategies: Vec<Box<dyn FlowStrategy + Send>>,
}

impl CompositeFlowStrategy {
    pub fn new(strategies: Vec<Box<dyn FlowStrategy + Send>>) -> Self {
        Self { strategies }
    }

    /// Adds another strategy.
    pub fn with(mut self, strategy: impl FlowStrategy + Send + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }
}

impl FlowStrategy for CompositeFlowStrategy {
    fn gen_flows(&mut self, route: &[Vertex]) -> Vec<Flow> {
        self.strategies
            .iter_mut()
            .flat_map(|strategy| strategy.gen_flows(route))
            .collect()
    }
}
