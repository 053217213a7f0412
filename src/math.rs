use num::Float;

/// Similar to numpy.interp for a single point: linear interpolation through
/// `coords`, holding the first and last `y` beyond the ends.
///
/// `coords` must be sorted by `x` and non-empty.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    // Base cases
    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for window in coords.windows(2) {
        let (x1, y1) = window[0];
        let (x2, y2) = window[1];

        if x1 <= x && x <= x2 {
            // Vertical segment: take the right hand side
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

/// Clamp floating noise back into the unit interval.
#[inline]
pub(crate) fn unit<F: Float>(value: F) -> F {
    value.max(F::zero()).min(F::one())
}

#[test]
fn test_interp() {
    let coords = [(1., 3.), (2., 2.), (3., 0.)];
    let out: Vec<f64> = [0., 1., 1.5, 2.72, 3.24]
        .into_iter()
        .map(|x| interp(x, &coords))
        .collect();

    assert_eq!(out[0], 3.);
    assert_eq!(out[1], 3.);
    assert_eq!(out[2], 2.5);
    assert!((out[3] - 0.56).abs() < 1e-12);
    assert_eq!(out[4], 0.);

    let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

    assert_eq!(interp(2.5, &coords), 4.);
    assert_eq!(interp(-1., &coords), 0.);
    assert_eq!(interp(7.5, &coords), 2.);
}

#[test]
fn test_interp_step() {
    let coords = [(0., 0.), (1., 0.), (1., 1.), (2., 1.)];

    assert_eq!(interp(0.5, &coords), 0.);
    assert_eq!(interp(1., &coords), 0.);
    assert_eq!(interp(1.5, &coords), 1.);
}

#[test]
fn test_unit() {
    assert_eq!(unit(1.0000000001f64), 1.);
    assert_eq!(unit(-1e-17f64), 0.);
    assert_eq!(unit(0.25f64), 0.25);
}
