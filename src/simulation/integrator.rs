//! Fixed-step Kepler drift for every body orbiting the central mass
//!
//! Each non-central body follows its own two-body orbit about body 0 for one
//! step `dt = params.dt`; bodies do not interact. The drift is exposed both as
//! a single call, [`advance_all`], and through the two-phase [`Integrator`]
//! interface shared with the other schemes of the outer simulation loop.

use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

use super::engine::{Engine, FailurePolicy};
use super::kepler::{KeplerError, KeplerSolver, KeplerStep};
use super::params::Parameters;
use super::states::{System, NVec3};

/// A body that could not be propagated this step
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFailure {
    pub index: usize,
    pub error: KeplerError,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepError {
    /// Step aborted, system left untouched; failures in body order
    #[error("{} bodies failed to propagate", .0.len())]
    BodiesFailed(Vec<BodyFailure>),
}

/// Bookkeeping for one completed step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub propagated: usize, // bodies moved this step
    pub max_iterations: usize, // worst root-find among them
    pub failures: Vec<BodyFailure>, // bodies kept in place under `FailurePolicy::Skip`
}

/// Flags consulted by the outer loop when choosing between schemes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorCapabilities {
    pub force_is_velocity_dependent: bool, // only first-order accuracy guaranteed with velocity-dependent forces
    pub epsilon: f64, // unused by fixed-step schemes
    pub min_dt: f64, // unused by fixed-step schemes
}

/// Two-phase interface of the outer integration loop
pub trait Integrator {
    fn capabilities(&self) -> IntegratorCapabilities;

    /// First half of the step, before external forces are applied
    fn part1(&mut self, sys: &mut System, params: &Parameters);

    /// Second half of the step; advances `sys.t`
    fn part2(&mut self, sys: &mut System, params: &Parameters) -> Result<StepReport, StepError>;

    fn step(&mut self, sys: &mut System, params: &Parameters) -> Result<StepReport, StepError> {
        self.part1(sys, params);
        self.part2(sys, params)
    }
}

/// The Kepler drift as an [`Integrator`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerIntegrator {
    pub engine: Engine,
}

impl KeplerIntegrator {
    pub const CAPABILITIES: IntegratorCapabilities = IntegratorCapabilities {
        force_is_velocity_dependent: true,
        epsilon: 0.0,
        min_dt: 0.0,
    };

    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }
}

impl Integrator for KeplerIntegrator {
    fn capabilities(&self) -> IntegratorCapabilities {
        Self::CAPABILITIES
    }

    fn part1(&mut self, sys: &mut System, params: &Parameters) {
        kepler_part1(sys, params);
    }

    fn part2(&mut self, sys: &mut System, params: &Parameters) -> Result<StepReport, StepError> {
        kepler_part2(sys, params, &self.engine)
    }
}

/// First phase of the drift. The whole Kepler step happens in the second
/// phase, so there is nothing to do here.
pub fn kepler_part1(_sys: &mut System, _params: &Parameters) {}

/// Second phase of the drift, same as [`advance_all`]
pub fn kepler_part2(sys: &mut System, params: &Parameters, engine: &Engine) -> Result<StepReport, StepError> {
    advance_all(sys, params, engine)
}

type Candidate = Result<(NVec3, NVec3, KeplerStep), KeplerError>;

/// Advance every body except the central one by `params.dt`, then `sys.t`.
///
/// New states are computed for all bodies before any is written, so the
/// failure policy decides deterministically what reaches `sys`.
pub fn advance_all(sys: &mut System, params: &Parameters, engine: &Engine) -> Result<StepReport, StepError> {
    let dt = params.dt;
    if sys.bodies.len() < 2 { // nothing orbits, only the clock moves
        sys.t += dt;
        return Ok(StepReport::default());
    }

    let mu = sys.central_mass();
    let solver = KeplerSolver::new(params, engine.root_finder, engine.velocity_update);
    let orbiting = &sys.bodies[1..];

    // Candidate state for body i + 1 at index i
    let candidates: Vec<Candidate> = if engine.parallel {
        orbiting
            .par_iter()
            .map(|b| solver.kepler_step(&b.x, &b.v, mu, dt))
            .collect()
    } else {
        orbiting
            .iter()
            .map(|b| solver.kepler_step(&b.x, &b.v, mu, dt))
            .collect()
    };

    let failures: Vec<BodyFailure> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            c.as_ref().err().map(|e| BodyFailure {
                index: i + 1,
                error: e.clone(),
            })
        })
        .collect();

    for f in &failures {
        warn!(body = f.index, t = sys.t, error = %f.error, "kepler step failed");
    }

    if !failures.is_empty() && engine.failure_policy == FailurePolicy::Abort {
        return Err(StepError::BodiesFailed(failures));
    }

    let mut report = StepReport::default();
    for (b, c) in sys.bodies[1..].iter_mut().zip(candidates) {
        if let Ok((x, v, step)) = c {
            b.x = x;
            b.v = v;
            report.propagated += 1;
            report.max_iterations = report.max_iterations.max(step.iterations);
        }
    }
    report.failures = failures;

    // advance time: t_n+1 = t_n + dt
    sys.t += dt;

    Ok(report)
}
