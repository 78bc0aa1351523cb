//! Special functions behind a uniform `f(params..., theta) -> f64` shape.
//!
//! Total functions return `f64` directly. Functions with a restricted
//! parameter domain (elliptic parameter `m`, the folded Legendre argument)
//! return `Result` and fail fast instead of producing silently wrong values.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::SynthError;

/// Upper bound on hypergeometric series terms before giving up.
const MAX_SERIES_TERMS: usize = 10_000_000;

/// Upper bound on AGM steps; convergence is quadratic so this is never hit
/// for `m < 1` in practice.
const MAX_AGM_STEPS: usize = 32;

/// `sin(theta) / theta`, with the removable singularity at zero filled in.
pub fn sinc(theta: f64) -> f64 {
    if theta == 0.0 {
        1.0
    } else {
        theta.sin() / theta
    }
}

/// Exponentially enveloped sine burst: `sin(theta) / cosh(decay * theta)`.
pub fn sinlet(theta: f64, decay: f64) -> f64 {
    theta.sin() / (decay * theta).cosh()
}

/// Bessel function of the first kind, order `n`.
pub fn besselj(n: i32, theta: f64) -> f64 {
    libm::jn(n, theta)
}

/// Gauss hypergeometric series `2F1(a, b; c; x)` for `|x| < 1`.
pub fn hyperg_2f1(a: f64, b: f64, c: f64, x: f64) -> Result<f64, SynthError> {
    if x.is_nan() || x.abs() >= 1.0 {
        return Err(SynthError::invalid("x", x, "series requires |x| < 1"));
    }
    if c <= 0.0 && c.fract() == 0.0 {
        return Err(SynthError::invalid("c", c, "must not be a non-positive integer"));
    }

    let mut sum = 1.0;
    let mut term = 1.0;
    // Terms shrink roughly geometrically with ratio x, so the remaining
    // tail is about term * x / (1 - x).
    let tolerance = f64::EPSILON * (1.0 - x.abs());
    for n in 0..MAX_SERIES_TERMS {
        let n = n as f64;
        term *= (a + n) * (b + n) / ((c + n) * (n + 1.0)) * x;
        sum += term;
        if term.abs() <= tolerance * sum.abs() {
            return Ok(sum);
        }
    }
    Err(SynthError::invalid("x", x, "hypergeometric series did not converge"))
}

fn check_parameter(m: f64) -> Result<(), SynthError> {
    if (0.0..1.0).contains(&m) {
        Ok(())
    } else {
        Err(SynthError::invalid("m", m, "elliptic parameter must be in [0, 1)"))
    }
}

/// Complete elliptic integral of the first kind, `K(m) = (π/2)·2F1(½, ½; 1; m)`.
pub fn elliptic_k(m: f64) -> Result<f64, SynthError> {
    check_parameter(m)?;
    Ok(FRAC_PI_2 * hyperg_2f1(0.5, 0.5, 1.0, m)?)
}

/// Jacobi elliptic functions `(sn, cn, dn)` of argument `u` and parameter `m`.
///
/// Uses the arithmetic-geometric mean with descending Landen
/// transformations (Abramowitz & Stegun 16.4).
pub fn jacobi_elliptic(u: f64, m: f64) -> Result<(f64, f64, f64), SynthError> {
    check_parameter(m)?;
    if m == 0.0 {
        return Ok((u.sin(), u.cos(), 1.0));
    }

    let mut a = [0.0; MAX_AGM_STEPS + 1];
    let mut c = [0.0; MAX_AGM_STEPS + 1];
    a[0] = 1.0;
    c[0] = m.sqrt();
    let mut b = (1.0 - m).sqrt();
    let mut n = 0;
    while c[n].abs() > f64::EPSILON {
        if n == MAX_AGM_STEPS {
            return Err(SynthError::invalid("m", m, "AGM iteration did not converge"));
        }
        a[n + 1] = 0.5 * (a[n] + b);
        c[n + 1] = 0.5 * (a[n] - b);
        b = (a[n] * b).sqrt();
        n += 1;
    }

    let mut phi = f64::powi(2.0, n as i32) * a[n] * u;
    for i in (1..=n).rev() {
        phi = 0.5 * (phi + (c[i] / a[i] * phi.sin()).asin());
    }

    let sn = phi.sin();
    let cn = phi.cos();
    let dn = (1.0 - m * sn * sn).sqrt();
    Ok((sn, cn, dn))
}

/// Scale factor `2K(m)/π` that maps an angle onto the `sn` argument so the
/// result repeats every `2π`.
pub fn sn_period_scale(m: f64) -> Result<f64, SynthError> {
    Ok(2.0 * elliptic_k(m)? / PI)
}

/// Jacobi `sn` with its period renormalized to `2π` regardless of `m`.
///
/// `theta` is rescaled by `2K(m)/π` before evaluation; `cn` and `dn` are
/// discarded.
pub fn jacobi_sn_normalized(m: f64, theta: f64) -> Result<f64, SynthError> {
    let scale = sn_period_scale(m)?;
    let (sn, _, _) = jacobi_elliptic(theta * scale, m)?;
    Ok(sn)
}

/// Legendre polynomial `P_l(x)` by upward recurrence.
pub fn legendre_p(l: u32, x: f64) -> f64 {
    let mut prev = 1.0;
    if l == 0 {
        return prev;
    }
    let mut cur = x;
    for k in 1..l {
        let k = k as f64;
        let next = ((2.0 * k + 1.0) * x * cur - k * prev) / (k + 1.0);
        prev = cur;
        cur = next;
    }
    cur
}

/// Periodic reinterpretation of the degree-`n` Legendre polynomial.
///
/// The angle is mapped as `x = fmod(theta / π, 2) - 1`. For `theta >= 0`
/// this sweeps `[-1, 1)` once per `2π`. `fmod` keeps the sign of its
/// dividend, so negative angles fold below `-1` and are rejected.
pub fn legendre(n: u32, theta: f64) -> Result<f64, SynthError> {
    let x = (theta / PI) % 2.0 - 1.0;
    if !(-1.0..=1.0).contains(&x) {
        return Err(SynthError::invalid(
            "theta",
            theta,
            "folded Legendre argument must lie in [-1, 1]",
        ));
    }
    Ok(legendre_p(n, x))
}
