//! Numerical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - step size and end time,
//! - iteration cap and tolerance of the universal anomaly solve,
//! - `epsilon` and `min_dt`, carried for parity with adaptive schemes

#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // time end
    pub dt: f64, // step size
    pub max_iterations: usize, // root-find iteration cap
    pub tolerance: f64, // relative step |dX/X| at which the root-find stops
    pub epsilon: f64, // ignored by the kepler kernel
    pub min_dt: f64, // ignored by the kepler kernel
}

pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_TOLERANCE: f64 = 1e-15;

impl Parameters {
    /// Parameters with default solver settings for a fixed step `dt`
    pub fn with_step(dt: f64) -> Self {
        Self {
            t_end: dt,
            dt,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            epsilon: 0.0,
            min_dt: 0.0,
        }
    }
}
