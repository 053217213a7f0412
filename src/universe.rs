use crate::error::ConfigError;
use crate::linspace::Linspace;

// Absorbs the rounding in (hi - lo) / step, e.g. 15. / 0.1 == 150.00000000000003
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on the number of samples of a single universe.
pub const MAX_SAMPLES: usize = 1 << 20;

/// A sampled real interval `[lo, hi]`.
///
/// Output curves are aggregated and defuzzified over these samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    lo: f64,
    hi: f64,
    step: f64,
    samples: Vec<f64>,
}

impl Universe {
    /// Samples `ceil((hi - lo) / step) + 1` evenly spaced points, both
    /// endpoints included.
    ///
    /// `step` sets the resolution: when it does not divide `hi - lo`, the
    /// points are spread evenly at [`Universe::spacing`], which is slightly
    /// below `step`.
    pub fn new(lo: f64, hi: f64, step: f64) -> Result<Self, ConfigError> {
        let err = |reason| ConfigError::InvalidUniverse { lo, hi, step, reason };

        if !lo.is_finite() || !hi.is_finite() || !step.is_finite() {
            return Err(err("bounds and step must be finite"));
        }
        if lo >= hi {
            return Err(err("lower bound must be below upper bound"));
        }
        if step <= 0. {
            return Err(err("step must be positive"));
        }

        let intervals = ((hi - lo) / step - STEP_TOLERANCE).ceil().max(1.);
        let count = num::cast::<f64, usize>(intervals)
            .and_then(|n| n.checked_add(1))
            .filter(|n| *n <= MAX_SAMPLES)
            .ok_or_else(|| err("too many samples"))?;

        Ok(Self {
            lo,
            hi,
            step,
            samples: Linspace::new(lo, hi, count).collect(),
        })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Resolution the universe was declared with.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Distance between consecutive samples, at most [`Universe::step`].
    pub fn spacing(&self) -> f64 {
        (self.hi - self.lo) / (self.samples.len() - 1) as f64
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn contains(&self, x: f64) -> bool {
        (self.lo..=self.hi).contains(&x)
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.lo, self.hi)
    }
}

#[test]
fn test_universe_sample_count() {
    let risk = Universe::new(0., 100., 1.).unwrap();

    assert_eq!(risk.len(), 101);
    assert_eq!(risk.samples()[0], 0.);
    assert_eq!(risk.samples()[100], 100.);

    let size = Universe::new(0., 15., 0.1).unwrap();

    assert_eq!(size.len(), 151);
    assert_eq!(size.samples()[150], 15.);

    // Step that does not divide the range evenly
    let md = Universe::new(2., 15., 3.).unwrap();

    assert_eq!(md.len(), 6);
    assert_eq!(md.samples()[5], 15.);
}

#[test]
fn test_universe_invalid() {
    assert!(matches!(
        Universe::new(1., 1., 0.1),
        Err(ConfigError::InvalidUniverse { .. })
    ));
    assert!(Universe::new(2., 1., 0.1).is_err());
    assert!(Universe::new(0., 1., 0.).is_err());
    assert!(Universe::new(0., 1., -1.).is_err());
    assert!(Universe::new(0., f64::INFINITY, 1.).is_err());
}

#[test]
fn test_universe_contains() {
    let u = Universe::new(2., 15., 0.1).unwrap();

    assert!(u.contains(2.));
    assert!(u.contains(15.));
    assert!(!u.contains(1.99));
    assert_eq!(u.clamp(20.), 15.);
}

#[test]
fn test_universe_spacing() {
    let md = Universe::new(2., 15., 3.).unwrap();

    assert_eq!(md.step(), 3.);
    assert!((md.spacing() - 2.6).abs() < 1e-12);
    assert!((md.samples()[1] - 4.6).abs() < 1e-12);

    let risk = Universe::new(0., 100., 1.).unwrap();

    assert_eq!(risk.spacing(), risk.step());
}

#[test]
fn test_universe_too_many_samples() {
    let err = |reason| ConfigError::InvalidUniverse {
        lo: 0.,
        hi: 1e30,
        step: 1e-10,
        reason,
    };

    // The interval count does not even fit in a usize
    assert_eq!(Universe::new(0., 1e30, 1e-10), Err(err("too many samples")));
    assert!(matches!(
        Universe::new(0., 1e10, 1.),
        Err(ConfigError::InvalidUniverse {
            reason: "too many samples",
            ..
        })
    ));
    assert_eq!(Universe::new(0., (MAX_SAMPLES - 1) as f64, 1.).unwrap().len(), MAX_SAMPLES);
}
