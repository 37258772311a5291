//! High-level runtime engine settings
//!
//! Selects the root finder, the velocity update variant, the failure policy
//! and serial/parallel sweeps used when running a `Scenario`

use serde::Deserialize;

/// Iteration used to solve the universal Kepler equation
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootFinder {
    #[default]
    #[serde(rename = "newton")] // X <- X - s/s'
    Newton,

    #[serde(rename = "householder")] // second-order step using s'', falls back to newton
    Householder,
}

/// Which position the velocity update `v = fd*P + gd*v0` reads
///
/// `Classical` uses the position at the start of the step, which is the Gauss
/// f-g formula and conserves orbital energy. `Literal` uses the freshly
/// updated position, kept for compatibility with results produced that way;
/// it does NOT conserve energy.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VelocityUpdate {
    #[default]
    #[serde(rename = "classical")]
    Classical,

    #[serde(rename = "literal")]
    Literal,
}

/// What the driver does when a body fails to propagate
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    #[serde(rename = "abort")] // leave the whole system untouched, report every failure
    Abort,

    #[serde(rename = "skip")] // keep failed bodies as they were, advance the rest
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Engine {
    pub root_finder: RootFinder,
    pub velocity_update: VelocityUpdate,
    pub failure_policy: FailurePolicy,
    pub parallel: bool, // false = serial sweep, true = rayon sweep
}
