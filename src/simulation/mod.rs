pub mod states;
pub mod params;
pub mod engine;
pub mod stumpff;
pub mod kepler;
pub mod integrator;
pub mod scenario;
