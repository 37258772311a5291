pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, System, NVec3};
pub use simulation::params::Parameters;
pub use simulation::engine::{Engine, RootFinder, VelocityUpdate, FailurePolicy};
pub use simulation::stumpff::{c, c_n_series, universal_g};
pub use simulation::kepler::{KeplerError, KeplerSolver, KeplerStep};
pub use simulation::integrator::{advance_all, Integrator, KeplerIntegrator, StepError, StepReport};
pub use simulation::scenario::{Scenario, ConfigError};

pub use configuration::config::{EngineConfig, ParametersConfig, BodyConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_kepler, bench_root_finders};
