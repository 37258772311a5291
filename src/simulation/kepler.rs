//! Analytic two-body drift of a single body about the central mass.
//!
//! The universal Kepler equation
//!
//! ```text
//! s(X) = r0 X + eta G2(X) + zeta G3(X) - dt = 0
//! ```
//!
//! is solved for the universal anomaly X starting from X = 0, and the Gauss
//! f-g coefficients at the root map the old state onto the new one. The same
//! formulas hold for elliptic (beta > 0), parabolic (beta = 0) and hyperbolic
//! (beta < 0) orbits.

use thiserror::Error;
use tracing::debug;

use crate::simulation::engine::{RootFinder, VelocityUpdate};
use crate::simulation::params::{Parameters, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::stumpff::g_functions;

/// Relative steps within this factor of the tolerance count as converged once they stop shrinking
const STAGNATION_FACTOR: f64 = 1e3;

/// Failure to propagate one body
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KeplerError {
    /// The root-find for X did not settle within the iteration cap, or left the finite range
    #[error("universal anomaly did not converge after {iterations} iterations (last step {last_step:e})")]
    ConvergenceFailure { iterations: usize, last_step: f64 },

    /// Body at the central mass (r0 = 0) or propagated onto it (r = 0)
    #[error("degenerate orbit: r0 = {r0}, r = {r}")]
    DegenerateOrbit { r0: f64, r: f64 },

    /// Stumpff index without a precomputed reduction
    #[error("stumpff index {n} out of range (max {max})")]
    IndexOutOfRange { n: usize, max: usize },
}

/// Quantities fixed by the body's state at the start of a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Invariants {
    pub r0: f64, // |x|
    pub v2: f64, // |v|^2
    pub eta: f64, // x . v
    pub beta: f64, // 2M/r0 - v^2, > 0 bound, < 0 unbound
    pub zeta: f64, // M - beta r0
}

impl Invariants {
    pub fn new(x: &NVec3, v: &NVec3, mu: f64) -> Self {
        let r0 = x.norm();
        let v2 = v.norm_squared();
        let eta = x.dot(v);
        let beta = 2.0 * mu / r0 - v2;
        let zeta = mu - beta * r0;
        Self { r0, v2, eta, beta, zeta }
    }
}

/// Outcome of one solved step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerStep {
    pub universal_anomaly: f64, // converged X
    pub iterations: usize,
    pub r: f64, // radial distance at the end of the step
    pub f: f64,
    pub g: f64,
    pub fd: f64,
    pub gd: f64,
}

/// Per-body solver for the universal Kepler equation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolver {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub root_finder: RootFinder,
    pub velocity_update: VelocityUpdate,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            root_finder: RootFinder::Newton,
            velocity_update: VelocityUpdate::Classical,
        }
    }
}

impl KeplerSolver {
    pub fn new(params: &Parameters, root_finder: RootFinder, velocity_update: VelocityUpdate) -> Self {
        Self {
            max_iterations: params.max_iterations,
            tolerance: params.tolerance,
            root_finder,
            velocity_update,
        }
    }

    /// Advance `body` by `dt` about a central mass `mu`, in place.
    ///
    /// On error the body is left exactly as it was.
    pub fn propagate(&self, body: &mut Body, mu: f64, dt: f64) -> Result<KeplerStep, KeplerError> {
        let (x, v, step) = self.kepler_step(&body.x, &body.v, mu, dt)?;
        body.x = x;
        body.v = v;
        Ok(step)
    }

    /// New position and velocity after `dt`, without touching any body
    pub fn kepler_step(
        &self,
        x0: &NVec3,
        v0: &NVec3,
        mu: f64,
        dt: f64,
    ) -> Result<(NVec3, NVec3, KeplerStep), KeplerError> {
        let inv = Invariants::new(x0, v0, mu);
        if !inv.r0.is_finite() || inv.r0 <= 0.0 {
            return Err(KeplerError::DegenerateOrbit { r0: inv.r0, r: inv.r0 });
        }

        let (big_x, iterations) = self.solve_universal_anomaly(&inv, dt)?;

        let [_, g1, g2, g3] = g_functions(inv.beta, big_x);
        let r = inv.r0 + inv.eta * g1 + inv.zeta * g2;
        if !r.is_finite() || r == 0.0 {
            return Err(KeplerError::DegenerateOrbit { r0: inv.r0, r });
        }

        let f = 1.0 - mu * g2 / inv.r0;
        let g = dt - mu * g3;
        let fd = -mu * g1 / (inv.r0 * r);
        let gd = 1.0 - mu * g2 / r;

        let x = f * x0 + g * v0;
        let v = match self.velocity_update {
            VelocityUpdate::Classical => fd * x0 + gd * v0,
            VelocityUpdate::Literal => fd * x + gd * v0,
        };

        Ok((
            x,
            v,
            KeplerStep {
                universal_anomaly: big_x,
                iterations,
                r,
                f,
                g,
                fd,
                gd,
            },
        ))
    }

    /// Root of s(X) from X = 0, with the number of iterations used.
    ///
    /// s'(X) = r(X) > 0, so every evaluated point narrows a bracket around
    /// the root. A step leaving a closed bracket is replaced by its midpoint.
    fn solve_universal_anomaly(&self, inv: &Invariants, dt: f64) -> Result<(f64, usize), KeplerError> {
        let mut big_x = 0.0;
        let mut dx = f64::NAN;
        let mut prev_dx = f64::INFINITY;
        let mut iterations = 0;
        let (mut lo, mut hi) = (f64::NEG_INFINITY, f64::INFINITY);

        for iter in 1..=self.max_iterations {
            iterations = iter;
            let [g0, g1, g2, g3] = g_functions(inv.beta, big_x);
            let s = inv.r0 * big_x + inv.eta * g2 + inv.zeta * g3 - dt;
            let sp = inv.r0 + inv.eta * g1 + inv.zeta * g2;

            if s < 0.0 {
                lo = big_x;
            } else if s > 0.0 {
                hi = big_x;
            }

            let step = match self.root_finder {
                RootFinder::Newton => -s / sp,
                RootFinder::Householder => {
                    let spp = inv.eta * g0 + inv.zeta * g1;
                    householder_step(s, sp, spp)
                }
            };
            let mut next = big_x + step;
            if lo.is_finite() && hi.is_finite() && !(lo < next && next < hi) {
                next = 0.5 * (lo + hi);
            }
            dx = next - big_x;
            big_x = next;

            if !big_x.is_finite() {
                break;
            }
            let rel = (dx / big_x).abs();
            if dx == 0.0 || rel < self.tolerance {
                debug!(iterations = iter, x = big_x, beta = inv.beta, "universal anomaly converged");
                return Ok((big_x, iter));
            }
            // Rounding keeps the last bits cycling; a step that stops shrinking is noise.
            if rel < STAGNATION_FACTOR * self.tolerance && dx.abs() >= prev_dx {
                debug!(iterations = iter, x = big_x, rel, "universal anomaly stagnated at rounding level");
                return Ok((big_x, iter));
            }
            prev_dx = dx.abs();
        }

        Err(KeplerError::ConvergenceFailure {
            iterations,
            last_step: dx,
        })
    }
}

/// Second-order Householder step, or the Newton step when the correction
/// term would zero the denominator or flip the step's direction
fn householder_step(s: f64, sp: f64, spp: f64) -> f64 {
    let newton = -s / sp;
    let denom = sp * sp - 0.5 * s * spp;
    let step = -(s * sp) / denom;
    if denom == 0.0 || !step.is_finite() || step * newton < 0.0 {
        newton
    } else {
        step
    }
}
