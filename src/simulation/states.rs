//! Core state types for the Kepler drift kernel.
//!
//! - `Body`   position, velocity and mass using `NVec3`
//! - `System` the list of bodies and the current simulation time `t`
//!
//! Body index 0 is always the central mass.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position, relative to the central body
    pub v: NVec3, // velocity, relative to the central body
    pub m: f64, // mass
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m }
    }

    /// Specific orbital energy v^2/2 - mu/r about a central mass `mu`
    pub fn specific_energy(&self, mu: f64) -> f64 {
        0.5 * self.v.norm_squared() - mu / self.x.norm()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub bodies: Vec<Body>, // index 0 is the central body
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    /// Mass of the central body, 0 for an empty system
    pub fn central_mass(&self) -> f64 {
        self.bodies.first().map_or(0.0, |b| b.m)
    }
}
