//! Stumpff functions c_n(z) and the universal functions G_n built on them.
//!
//! c_n(z) = sum_j (-z)^j / (n + 2j)!
//!
//! The power series alone loses accuracy for large positive z, so arguments
//! above `REDUCTION_THRESHOLD` are quartered until they fall below it, the
//! series is evaluated there, and the quadrupling identities
//!
//! ```text
//! c4(z) = c3(z/4) (1 + c1(z/4)) / 8       c5(z) = (c5 + c4 + c3 c2)(z/4) / 16
//! c2(z) = 1/2 - z c4(z)                   c3(z) = 1/6 - z c5(z)
//! c0(z) = 1   - z c2(z)                   c1(z) = 1   - z c3(z)
//! ```
//!
//! carry the values back up one level at a time. Negative z (hyperbolic
//! orbits) always goes straight to the series.
//!
//! The 13-term series is truncated for large negative z: at z = -50 c0 is
//! already off by about 5e-8 relative (3e-5 absolute). Hyperbolic steps
//! should keep |beta X^2| small, e.g. |z| below ~10, to hold orbital energy
//! to 1e-10; longer unbound steps still converge but drift more.

use crate::simulation::kepler::KeplerError;

/// Reciprocal factorials 1/k! for k = 0..=34
pub const INV_FACTORIAL: [f64; 35] = [
    1.0,
    1.0,
    1.0 / 2.0,
    1.0 / 6.0,
    1.0 / 24.0,
    1.0 / 120.0,
    1.0 / 720.0,
    1.0 / 5040.0,
    1.0 / 40320.0,
    1.0 / 362880.0,
    1.0 / 3628800.0,
    1.0 / 39916800.0,
    1.0 / 479001600.0,
    1.0 / 6227020800.0,
    1.0 / 87178291200.0,
    1.0 / 1307674368000.0,
    1.0 / 20922789888000.0,
    1.0 / 355687428096000.0,
    1.0 / 6402373705728000.0,
    1.0 / 121645100408832000.0,
    1.0 / 2432902008176640000.0,
    1.0 / 51090942171709440000.0,
    1.0 / 1124000727777607680000.0,
    1.0 / 25852016738884976640000.0,
    1.0 / 620448401733239439360000.0,
    1.0 / 15511210043330985984000000.0,
    1.0 / 403291461126605635584000000.0,
    1.0 / 10888869450418352160768000000.0,
    1.0 / 304888344611713860501504000000.0,
    1.0 / 8841761993739701954543616000000.0,
    1.0 / 265252859812191058636308480000000.0,
    1.0 / 8222838654177922817725562880000000.0,
    1.0 / 263130836933693530167218012160000000.0,
    1.0 / 8683317618811886495518194401280000000.0,
    1.0 / 295232799039604140847618609643520000000.0,
];

/// Number of series terms, j = 0..=12
pub const SERIES_TERMS: usize = 13;

/// Largest index with a quadrupling identity
pub const MAX_STUMPFF_INDEX: usize = 5;

/// Series accumulation stops once a term is this small relative to the sum
const SERIES_CUTOFF: f64 = 1e-17;

/// Arguments at or below this go straight to the series
pub const REDUCTION_THRESHOLD: f64 = 0.5;

/// Enough quarterings to bring any finite f64 below the threshold
pub const MAX_REDUCTION_DEPTH: usize = 520;

/// Direct power series for c_n(z), up to `SERIES_TERMS` terms.
///
/// Accurate for small |z|; use [`c`] for general arguments.
pub fn c_n_series(n: usize, z: f64) -> f64 {
    debug_assert!(
        n + 2 * (SERIES_TERMS - 1) < INV_FACTORIAL.len(),
        "stumpff index {n} exceeds the factorial table"
    );

    let mut sum = 0.0;
    let mut power = 1.0; // (-z)^j
    for j in 0..SERIES_TERMS {
        let term = power * INV_FACTORIAL[n + 2 * j];
        sum += term;
        if (term / sum).abs() < SERIES_CUTOFF {
            break;
        }
        power *= -z;
    }
    sum
}

/// c_0..c_5 at `z` from their values `q` at `z / 4`
fn quadruple(z: f64, q: &[f64; 6]) -> [f64; 6] {
    let c4 = q[3] * (1.0 + q[1]) / 8.0;
    let c2 = 1.0 / 2.0 - z * c4;
    let c0 = 1.0 - z * c2;
    let c5 = (q[5] + q[4] + q[3] * q[2]) / 16.0;
    let c3 = 1.0 / 6.0 - z * c5;
    let c1 = 1.0 - z * c3;
    [c0, c1, c2, c3, c4, c5]
}

fn series_all(z: f64) -> [f64; 6] {
    std::array::from_fn(|n| c_n_series(n, z))
}

/// All of c_0..c_5 at `z`.
///
/// Returns NaN values when `z` cannot be reduced below the threshold, which
/// only happens for `+inf`.
pub fn stumpff_all(z: f64) -> [f64; 6] {
    let mut base = z;
    let mut depth = 0;
    while base > REDUCTION_THRESHOLD {
        if depth == MAX_REDUCTION_DEPTH {
            return [f64::NAN; 6];
        }
        base /= 4.0;
        depth += 1;
    }

    let mut values = series_all(base);
    // Scaling by 4 is exact, so `arg` retraces every level's argument.
    let mut arg = base;
    for _ in 0..depth {
        arg *= 4.0;
        values = quadruple(arg, &values);
    }
    values
}

/// Stumpff function c_n(z).
///
/// Indices above [`MAX_STUMPFF_INDEX`] have no quadrupling identity and are
/// always evaluated by the series.
pub fn c(n: usize, z: f64) -> f64 {
    if z > REDUCTION_THRESHOLD && n <= MAX_STUMPFF_INDEX {
        stumpff_all(z)[n]
    } else {
        c_n_series(n, z)
    }
}

/// [`c`] for an index only known at runtime
pub fn try_c(n: usize, z: f64) -> Result<f64, KeplerError> {
    if n > MAX_STUMPFF_INDEX {
        return Err(KeplerError::IndexOutOfRange {
            n,
            max: MAX_STUMPFF_INDEX,
        });
    }
    Ok(c(n, z))
}

/// c_n(z) through one quadrupling level, whatever the size of `z`
pub fn c_reduced(n: usize, z: f64) -> f64 {
    quadruple(z, &stumpff_all(z / 4.0))[n]
}

/// Universal function G_n(beta, X) = X^n c_n(beta X^2)
pub fn universal_g(n: usize, beta: f64, x: f64) -> f64 {
    x.powi(n as i32) * c(n, beta * x * x)
}

/// `[G0, G1, G2, G3]` at `x`, sharing a single reduction of beta X^2
pub fn g_functions(beta: f64, x: f64) -> [f64; 4] {
    let z = beta * x * x;
    let cs: [f64; 4] = if z > REDUCTION_THRESHOLD {
        let all = stumpff_all(z);
        [all[0], all[1], all[2], all[3]]
    } else {
        std::array::from_fn(|n| c_n_series(n, z))
    };
    std::array::from_fn(|n| x.powi(n as i32) * cs[n])
}
