use num::Float;

/// And operator method for combining the propositions of a rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AndOp {
    /// Mamdani: `min(u, v)`
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }
}

/// Or operator method for combining the propositions of a rule premise,
/// also used to aggregate the implied output sets of several rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrOp {
    /// Mamdani: `max(u, v)`
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }
}

/// Implication operator: shapes a consequence's membership by the rule's
/// firing strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImplicationOp {
    /// Clip the consequence at the firing strength
    #[default]
    Min,
    /// Scale the consequence by the firing strength
    Prod,
}

impl ImplicationOp {
    pub fn call<F: Float>(self, strength: F, membership: F) -> F {
        match self {
            Self::Min => F::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefuzzificationOp {
    /// Center of gravity of the piecewise-linear curve through the samples
    #[default]
    Centroid,
    /// Bisector of area
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
    /// `sum(x * mu) / sum(mu)` over the samples
    WeightedAverage,
}

impl DefuzzificationOp {
    /// Collapses `membership`, sampled at `universe`, to a crisp value.
    ///
    /// Returns `None` when the curve carries no mass, or when `universe`
    /// and `membership` differ in length.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> Option<F> {
        if universe.len() != membership.len() {
            return None;
        }

        match self {
            Self::Centroid => centroid(universe, membership),
            Self::Bisector => bisector(universe, membership),
            Self::MeanOfMaximum => {
                let (len, sum) = maxima(universe, membership)?.fold((0usize, F::zero()), |(n, acc), u| (n + 1, acc + u));

                Some(sum / num::cast::<usize, F>(len)?)
            },
            Self::SmallestOfMaximum => maxima(universe, membership)?.reduce(F::min),
            Self::LargestOfMaximum => maxima(universe, membership)?.reduce(F::max),
            Self::WeightedAverage => weighted_average(universe, membership),
        }
    }
}

fn centroid<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let two = F::one() + F::one();
    let three = two + F::one();
    let mut den = F::zero();
    let mut num = F::zero();

    for (u, m) in universe.windows(2).zip(membership.windows(2)) {
        let base = u[1] - u[0];
        let area_rect = F::min(m[0], m[1]) * base;
        let center_rect = u[0] + base / two;
        let area_tri = base * F::abs(m[1] - m[0]) / two;
        // The triangle leans towards its taller side
        let center_tri = if m[1] > m[0] {
            u[0] + two / three * base
        } else {
            u[0] + base / three
        };

        den = den + area_rect + area_tri;
        num = num + area_rect * center_rect + area_tri * center_tri;
    }

    if den > F::zero() {
        return Some(num / den);
    }

    // Isolated spikes enclose no area but still carry weight
    weighted_average(universe, membership)
}

fn bisector<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let two = F::one() + F::one();
    let areas: Vec<F> = universe
        .windows(2)
        .zip(membership.windows(2))
        .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
        .collect();
    let total = areas.iter().fold(F::zero(), |acc, a| acc + *a);

    if total <= F::zero() {
        return weighted_average(universe, membership);
    }

    let target = total / two;
    let mut cumulative = F::zero();

    for (i, area) in areas.iter().copied().enumerate() {
        if area > F::zero() && cumulative + area >= target {
            let fraction = (target - cumulative) / area;

            return Some(universe[i] + fraction * (universe[i + 1] - universe[i]));
        }

        cumulative = cumulative + area;
    }

    universe.last().copied()
}

fn weighted_average<F: Float>(universe: &[F], membership: &[F]) -> Option<F> {
    let (num, den) = universe
        .iter()
        .zip(membership)
        .fold((F::zero(), F::zero()), |(num, den), (u, m)| (num + *u * *m, den + *m));

    (den > F::zero()).then(|| num / den)
}

fn maxima<'a, F: Float>(universe: &'a [F], membership: &'a [F]) -> Option<impl Iterator<Item = F> + 'a> {
    let maximum = membership.iter().copied().fold(F::zero(), F::max);

    if maximum <= F::zero() {
        return None;
    }

    let tolerance = F::epsilon() * (F::one() + F::one()).powi(8);

    Some(
        universe
            .iter()
            .zip(membership)
            .filter_map(move |(u, m)| ((maximum - *m).abs() <= tolerance).then_some(*u)),
    )
}
