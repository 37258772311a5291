//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – root finder, velocity update, failure policy, parallel sweep
//! - [`ParametersConfig`] – step size, end time and solver tolerances
//! - [`BodyConfig`]       – initial state for each body, the first one is the central mass
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   root_finder: "newton"        # or "householder"
//!   velocity_update: "classical" # or "literal"
//!   failure_policy: "abort"      # or "skip"
//!   parallel: false
//!
//! parameters:
//!   t_end: 6.283185307179586     # total simulation time
//!   dt: 0.01                     # fixed step size
//!   max_iterations: 100          # optional, root-find iteration cap
//!   tolerance: 1.0e-15           # optional, relative step at convergence
//!
//! bodies:
//!   - x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     m: 1.0
//!   - x: [ 1.0, 0.0, 0.0 ]
//!     v: [ 0.0, 1.0, 0.0 ]
//!     m: 1.0e-3
//! ```
//!
//! Every `engine` field and the optional `parameters` fields have defaults.

use serde::Deserialize;

use crate::simulation::engine::{FailurePolicy, RootFinder, VelocityUpdate};
use crate::simulation::params::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

/// High-level engine configuration
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub root_finder: RootFinder, // iteration used for the universal anomaly
    pub velocity_update: VelocityUpdate, // position read by the velocity update
    pub failure_policy: FailurePolicy, // what happens to a step when a body fails
    pub parallel: bool, // `true` - propagate bodies on the rayon thread pool
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// Global numerical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // time end
    pub dt: f64, // time step size
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize, // root-find iteration cap
    #[serde(default = "default_tolerance")]
    pub tolerance: f64, // relative step |dX/X| at convergence
    #[serde(default)]
    pub epsilon: f64, // kept for parity with adaptive schemes, unused
    #[serde(default)]
    pub min_dt: f64, // kept for parity with adaptive schemes, unused
}

/// Configuration for a single body’s initial state
#[derive(Deserialize, Debug)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position, 3 components
    pub v: Vec<f64>, // Initial velocity, 3 components
    pub m: f64, // Mass of the body, for body 0 this is the gravitational parameter of the system
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // Solver strategy selection
    pub parameters: ParametersConfig, // Global numerical parameters
    pub bodies: Vec<BodyConfig>, // List of bodies, the central mass first
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }
}
