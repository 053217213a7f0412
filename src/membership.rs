//! Membership function shapes.
//!
//! Every shape maps any real `x` to a degree in `[0, 1]`. Results are clamped
//! so that aggregation never sees `1.0000000002` or `-0.0`-style noise.

use crate::error::ConfigError;
use crate::math::{interp, unit};

#[derive(Clone, Debug, PartialEq)]
pub enum MembershipFunction {
    /// Zero outside `[a, c]`, peaks at `b`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Zero outside `[a, d]`, flat top over `[b, c]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Linear interpolation through `(x, degree)` breakpoints. The end degrees
    /// extend past the first and last breakpoint, so shoulders need no
    /// special casing.
    Piecewise(Vec<(f64, f64)>),
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        check_ordered("triangular", &[a, b, c])?;

        Ok(Self::Triangular { a, b, c })
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self, ConfigError> {
        check_ordered("trapezoidal", &[a, b, c, d])?;

        Ok(Self::Trapezoidal { a, b, c, d })
    }

    pub fn piecewise(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, ConfigError> {
        let points: Vec<_> = points.into_iter().collect();

        if points.is_empty() {
            return Err(invalid("piecewise shape needs at least one breakpoint"));
        }

        let xs: Vec<_> = points.iter().map(|(x, _)| *x).collect();

        check_ordered("piecewise", &xs)?;

        if let Some((x, y)) = points
            .iter()
            .find(|(_, y)| !y.is_finite() || !(0. ..=1.).contains(y))
        {
            return Err(invalid(format!("piecewise degree {y} at x = {x} is outside [0, 1]")));
        }

        Ok(Self::Piecewise(points))
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Result<Self, ConfigError> {
        if !mean.is_finite() || !sigma.is_finite() || sigma <= 0. {
            return Err(invalid(format!(
                "gaussian needs a finite mean and a positive sigma, got mean = {mean}, sigma = {sigma}"
            )));
        }

        Ok(Self::Gaussian { mean, sigma })
    }

    /// Degree of membership of `x`. Never fails, for any real `x`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => triangular(x, a, b, c),
            Self::Trapezoidal { a, b, c, d } => trapezoidal(x, a, b, c, d),
            Self::Piecewise(ref points) => unit(interp(x, points)),
            Self::Gaussian { mean, sigma } => unit((-(x - mean).powi(2) / (2. * sigma * sigma)).exp()),
        }
    }

    /// The interval outside which the degree is zero, if the shape has one.
    pub fn support(&self) -> Option<(f64, f64)> {
        match *self {
            Self::Triangular { a, c, .. } => Some((a, c)),
            Self::Trapezoidal { a, d, .. } => Some((a, d)),
            Self::Piecewise(ref points) => {
                let (first, last) = (points.first()?, points.last()?);

                (first.1 == 0. && last.1 == 0.).then_some((first.0, last.0))
            },
            Self::Gaussian { .. } => None,
        }
    }
}

// The ramp branches are only reachable with a non-zero width, so a
// degenerate ramp falls through to the full-membership branch.
fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x < a || x > c {
        0.
    } else if x == b {
        1.
    } else if x < b {
        unit((x - a) / (b - a))
    } else {
        unit((c - x) / (c - b))
    }
}

fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if x < b {
        unit((x - a) / (b - a))
    } else {
        unit((d - x) / (d - c))
    }
}

fn check_ordered(kind: &str, points: &[f64]) -> Result<(), ConfigError> {
    if let Some(p) = points.iter().find(|p| !p.is_finite()) {
        return Err(invalid(format!("{kind} control point {p} is not finite")));
    }

    if points.windows(2).any(|w| w[0] > w[1]) {
        return Err(invalid(format!("{kind} control points {points:?} must be non-decreasing")));
    }

    Ok(())
}

fn invalid(reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidShape { reason: reason.into() }
}
