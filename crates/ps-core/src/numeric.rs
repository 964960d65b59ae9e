use crate::{PsError, PsResult};

/// Floating point type used throughout system
pub type Real = f64;

/// Slack applied to inclusive bound checks so a value computed exactly at a
/// limit (85.0 % trim, max rated speed) is not rejected by rounding noise.
pub const BOUND_EPS: Real = 1e-9;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PsError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PsError::NonFinite { what, value: v })
    }
}

/// `value >= min`, forgiving `BOUND_EPS` of rounding.
#[inline]
pub fn at_least(value: Real, min: Real) -> bool {
    value >= min - BOUND_EPS
}

/// `value <= max`, forgiving `BOUND_EPS` of rounding.
#[inline]
pub fn at_most(value: Real, max: Real) -> bool {
    value <= max + BOUND_EPS
}

/// Piecewise-linear lookup of `y(x)` over a strictly increasing abscissa.
///
/// `extend` is the permitted extrapolation past either end of the table,
/// expressed as a fraction of the x span. Outside that window the lookup
/// fails with [`PsError::OutOfRange`] instead of returning a clamped value.
/// An `x` equal to a tabulated abscissa returns the tabulated ordinate
/// exactly.
pub fn piecewise_linear(xs: &[Real], ys: &[Real], x: Real, extend: Real) -> PsResult<Real> {
    if xs.len() != ys.len() {
        return Err(PsError::InvalidArg {
            what: "abscissa and ordinate lengths differ",
        });
    }
    let n = xs.len();
    if n < 2 {
        return Err(PsError::TooFewPoints {
            what: "piecewise-linear lookup",
            needed: 2,
            got: n,
        });
    }
    ensure_finite(x, "lookup abscissa")?;

    let first = xs[0];
    let last = xs[n - 1];
    let span = last - first;
    if !(span > 0.0) {
        return Err(PsError::InvalidArg {
            what: "abscissa must be strictly increasing",
        });
    }

    let lo = first - span * extend.max(0.0);
    let hi = last + span * extend.max(0.0);
    if !at_least(x, lo) || !at_most(x, hi) {
        return Err(PsError::OutOfRange {
            what: "lookup abscissa",
            value: x,
            min: lo,
            max: hi,
        });
    }

    let i = xs.partition_point(|&v| v < x);
    if i < n && xs[i] == x {
        return ensure_finite(ys[i], "tabulated ordinate");
    }

    let (a, b) = match i {
        0 => (0, 1),
        i if i == n => (n - 2, n - 1),
        i => (i - 1, i),
    };
    let (x0, x1) = (xs[a], xs[b]);
    let (y0, y1) = (ys[a], ys[b]);
    if x1 <= x0 {
        return Err(PsError::InvalidArg {
            what: "abscissa must be strictly increasing",
        });
    }

    ensure_finite(y0 + (y1 - y0) * (x - x0) / (x1 - x0), "interpolated ordinate")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tabulated_points_are_returned_exactly(
            steps in prop::collection::vec(0.5_f64..50.0, 2..8),
            ys in prop::collection::vec(-100.0_f64..100.0, 8),
        ) {
            let mut xs = Vec::with_capacity(steps.len());
            let mut x = 0.0;
            for s in &steps {
                x += s;
                xs.push(x);
            }
            let ys = &ys[..xs.len()];
            for (xi, yi) in xs.iter().zip(ys) {
                prop_assert_eq!(piecewise_linear(&xs, ys, *xi, 0.0).unwrap(), *yi);
            }
        }

        #[test]
        fn interior_values_stay_between_neighbours(t in 0.0_f64..1.0) {
            let xs = [10.0, 20.0];
            let ys = [5.0, 9.0];
            let y = piecewise_linear(&xs, &ys, 10.0 + 10.0 * t, 0.0).unwrap();
            prop_assert!((5.0..=9.0).contains(&y));
        }
    }
}
