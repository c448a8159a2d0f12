//! Black-box minimisation of a simulated objective.
//!
//! The [Optimizer] trait is the seam for external global optimisers such as
//! Bayesian optimisation. Random and grid search are provided for baselines
//! and for sweeping small parameter spaces.

use itertools::Itertools;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::metrics::Report;
use crate::roadnet::{complete_phase_times, params_per_intersection};
use crate::util::Interval;
use crate::{Error, Result};

/// A function of a bounded real vector, possibly expensive to evaluate.
pub trait Objective {
    /// The length of the parameter vector.
    fn dimension(&self) -> usize;

    fn evaluate(&self, params: &[f64]) -> Result<Report>;
}

/// Searches for the parameters minimising an objective's target.
pub trait Optimizer {
    /// Returns every evaluation performed, in order.
    fn minimize<O: Objective + Sync>(
        &mut self,
        objective: &O,
        bounds: &[Interval<f64>],
    ) -> Result<Vec<Evaluation>>;
}

/// A single evaluation of an objective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub params: Vec<f64>,
    pub report: Report,
}

/// Finds the evaluation with the lowest target.
pub fn best(evaluations: &[Evaluation]) -> Option<&Evaluation> {
    evaluations
        .iter()
        .min_by(|a, b| a.report.target.total_cmp(&b.report.target))
}

/// Expands parameters to include the phase inferred for each intersection
/// when the cycle period is fixed, giving four phase times per intersection.
pub fn expand_parameters(params: &[f64], fixed_period: Option<f64>) -> Vec<f64> {
    match fixed_period {
        None => params.to_vec(),
        Some(_) => params
            .chunks(params_per_intersection(fixed_period))
            .flat_map(|chunk| complete_phase_times(chunk, fixed_period))
            .collect(),
    }
}

/// Stops a search once it has gone too long without improving.
#[derive(Clone, Debug)]
pub struct ProgressStopping {
    /// The number of evaluations without improvement that are tolerated.
    patience: usize,
    /// The number of evaluations after the first one. The search stops once
    /// this is exceeded, so at most `max_iterations + 1` evaluations are made.
    max_iterations: usize,
    best: Option<f64>,
    count: usize,
    iteration: usize,
}

impl ProgressStopping {
    pub fn new(patience: usize, max_iterations: usize) -> Self {
        Self {
            patience,
            max_iterations,
            best: None,
            count: 0,
            iteration: 0,
        }
    }

    /// Records a new target value and returns whether the search should stop.
    pub fn should_stop(&mut self, target: f64) -> bool {
        self.iteration += 1;
        match self.best {
            Some(best) if target >= best => {
                log::info!("iteration {}: {}", self.iteration, target);
                self.count += 1;
            }
            _ => {
                log::info!("iteration {}: {} - new best!", self.iteration, target);
                self.best = Some(target);
                self.count = 0;
            }
        }

        if self.iteration > self.max_iterations {
            log::info!("exceeded max iterations, stopping");
            true
        } else if self.count > self.patience {
            log::info!("stopping due to {} iterations without progress", self.patience);
            true
        } else {
            false
        }
    }

    /// The lowest target seen so far.
    pub fn best(&self) -> Option<f64> {
        self.best
    }
}

/// Evaluates uniformly random points within the bounds.
#[derive(Clone, Debug)]
pub struct RandomSearch {
    rng: StdRng,
    stopping: ProgressStopping,
}

impl RandomSearch {
    pub fn new(seed: u64, stopping: ProgressStopping) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            stopping,
        }
    }
}

impl Optimizer for RandomSearch {
    fn minimize<O: Objective + Sync>(
        &mut self,
        objective: &O,
        bounds: &[Interval<f64>],
    ) -> Result<Vec<Evaluation>> {
        check_bounds(objective, bounds)?;
        let mut evaluations = vec![];
        loop {
            let params = bounds
                .iter()
                .map(|range| range.lerp(self.rng.gen::<f64>()))
                .collect::<Vec<_>>();
            let report = objective.evaluate(&params)?;
            let target = report.target;
            evaluations.push(Evaluation { params, report });
            if self.stopping.should_stop(target) {
                return Ok(evaluations);
            }
        }
    }
}

/// Evaluates every combination of evenly spaced values along each axis.
///
/// With the `parallel` feature, points are evaluated concurrently.
#[derive(Clone, Copy, Debug)]
pub struct GridSearch {
    steps_per_axis: usize,
}

impl GridSearch {
    pub fn new(steps_per_axis: usize) -> Self {
        Self { steps_per_axis }
    }

    /// Lists the grid points, varying the last axis fastest.
    pub fn points(&self, bounds: &[Interval<f64>]) -> Vec<Vec<f64>> {
        if bounds.is_empty() {
            return vec![vec![]];
        }
        bounds
            .iter()
            .map(|range| range.linspace(self.steps_per_axis).collect::<Vec<_>>())
            .multi_cartesian_product()
            .collect()
    }
}

impl Optimizer for GridSearch {
    fn minimize<O: Objective + Sync>(
        &mut self,
        objective: &O,
        bounds: &[Interval<f64>],
    ) -> Result<Vec<Evaluation>> {
        check_bounds(objective, bounds)?;
        let points = self.points(bounds);
        log::info!("grid search over {} points", points.len());

        let evaluate = |params: Vec<f64>| {
            objective
                .evaluate(&params)
                .map(|report| Evaluation { params, report })
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            points.into_par_iter().map(evaluate).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            points.into_iter().map(evaluate).collect()
        }
    }
}

fn check_bounds(objective: &impl Objective, bounds: &[Interval<f64>]) -> Result<()> {
    if bounds.len() == objective.dimension() {
        Ok(())
    } else {
        Err(Error::ParameterCount {
            expected: objective.dimension(),
            got: bounds.len(),
        })
    }
}
