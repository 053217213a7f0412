use num::Float;

/// `n` evenly spaced values over `[min, max]`, endpoints included.
pub struct Linspace<F> {
    start: F,
    end: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    pub fn new(min: F, max: F, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps: F = num::cast(n - 1).unwrap_or_else(F::one);
            (max - min) / num_steps
        } else {
            F::zero()
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            return None;
        }

        let i = self.index;
        self.index += 1;

        // Pin the last sample so accumulated rounding never overshoots the range
        if self.len > 1 && i == self.len - 1 {
            return Some(self.end);
        }

        let i: F = num::cast(i).unwrap_or_else(F::zero);

        Some(self.start + self.step * i)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace_endpoints() {
    let values: Vec<f64> = Linspace::new(0., 1., 11).collect();

    assert_eq!(values.len(), 11);
    assert_eq!(values[0], 0.);
    assert_eq!(values[10], 1.);
    assert!((values[3] - 0.3).abs() < 1e-12);
}

#[test]
fn test_linspace_single() {
    let values: Vec<f64> = Linspace::new(2., 5., 1).collect();

    assert_eq!(values, vec![2.]);
}
