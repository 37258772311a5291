//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with bodies at t = 0)

use thiserror::Error;
use tracing::info;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::integrator::{Integrator, KeplerIntegrator, StepError};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3, System};

/// Scenario configuration that cannot be turned into a runnable system
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("body {index}: `{field}` needs 3 components, got {len}")]
    BadVector {
        field: &'static str,
        index: usize,
        len: usize,
    },

    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("end time must be finite, got {0}")]
    InvalidEndTime(f64),

    #[error("max_iterations must be at least 1")]
    NoIterations,

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("scenario has no bodies")]
    NoBodies,
}

/// Runtime bundle: engine settings, parameters and the current system state
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
}

fn vec3(field: &'static str, index: usize, c: &[f64]) -> Result<NVec3, ConfigError> {
    match c {
        [x, y, z] => Ok(NVec3::new(*x, *y, *z)),
        _ => Err(ConfigError::BadVector {
            field,
            index,
            len: c.len(),
        }),
    }
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self, ConfigError> {
        if cfg.bodies.is_empty() {
            return Err(ConfigError::NoBodies);
        }

        // Bodies: map `BodyConfig` -> runtime `Body` using nalgebra vectors
        let bodies = cfg
            .bodies
            .iter()
            .enumerate()
            .map(|(i, bc): (usize, &BodyConfig)| -> Result<Body, ConfigError> {
                Ok(Body {
                    x: vec3("x", i, &bc.x)?,
                    v: vec3("v", i, &bc.v)?,
                    m: bc.m,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Initial system state: bodies at t = 0
        let system = System::new(bodies);

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        if !(p_cfg.dt.is_finite() && p_cfg.dt > 0.0) {
            return Err(ConfigError::InvalidStep(p_cfg.dt));
        }
        if !p_cfg.t_end.is_finite() {
            return Err(ConfigError::InvalidEndTime(p_cfg.t_end));
        }
        if p_cfg.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if !(p_cfg.tolerance.is_finite() && p_cfg.tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(p_cfg.tolerance));
        }
        let parameters = Parameters {
            t_end: p_cfg.t_end,
            dt: p_cfg.dt,
            max_iterations: p_cfg.max_iterations,
            tolerance: p_cfg.tolerance,
            epsilon: p_cfg.epsilon,
            min_dt: p_cfg.min_dt,
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            root_finder: e_cfg.root_finder,
            velocity_update: e_cfg.velocity_update,
            failure_policy: e_cfg.failure_policy,
            parallel: e_cfg.parallel,
        };

        Ok(Self {
            engine,
            parameters,
            system,
        })
    }

    /// Step until `t_end` is reached, returning the number of steps taken
    pub fn run(&mut self) -> Result<usize, StepError> {
        let mut integrator = KeplerIntegrator::new(self.engine);
        let dt = self.parameters.dt;
        let mut steps = 0;

        info!(
            bodies = self.system.bodies.len(),
            dt,
            t_end = self.parameters.t_end,
            "running kepler drift"
        );

        // half-step slack so rounding in t does not add or drop a step
        while self.system.t + 0.5 * dt < self.parameters.t_end {
            let report = integrator.step(&mut self.system, &self.parameters)?;
            steps += 1;
            if !report.failures.is_empty() {
                info!(step = steps, failed = report.failures.len(), "bodies held in place");
            }
        }
        Ok(steps)
    }
}
