//! Mamdani fuzzy inference.
//!
//! Input and output variables are declared over a sampled [`Universe`] and
//! split into labelled fuzzy sets. Rules join `variable is label`
//! propositions with fuzzy AND (min) and OR (max), and each rule concludes
//! one output label. An evaluation clips each concluded label at its rule's
//! firing strength and aggregates the clipped sets by pointwise maximum. The
//! result is collapsed to a crisp value by the centroid.
//!
//! ```
//! use fuzzy_risk::{FuzzySystem, MamdaniInference, MembershipFunction, Rules, Terms, Universe, Variables};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut vars = Variables::new();
//! let hmb = vars.add_input(
//!     "hmb",
//!     Universe::new(0., 1., 1.)?,
//!     Terms::new()
//!         .with("no", MembershipFunction::triangular(0., 0., 0.5)?)
//!         .with("yes", MembershipFunction::triangular(0.5, 1., 1.)?),
//! )?;
//! let risk = vars.add_output(
//!     "anemia_risk",
//!     Universe::new(0., 100., 1.)?,
//!     Terms::new().with("very_low", MembershipFunction::triangular(0., 0., 20.)?),
//! )?;
//!
//! let mut rules = Rules::new();
//! rules.add(&vars, hmb.is("no"), risk.is("very_low"))?;
//!
//! let system = FuzzySystem::new(vars, rules, MamdaniInference::default())?;
//! let mut sim = system.simulation();
//!
//! sim.set_input("hmb", 0.)?;
//! sim.compute()?;
//!
//! let crisp = sim.output("anemia_risk").unwrap();
//! assert!((crisp - 20. / 3.).abs() < 1e-9);
//! # Ok(())
//! # }
//! ```

mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod simulation;
mod system;
mod terms;
mod universe;
mod variable;


pub use dsl::Expr;
pub use error::{ConfigError, FuzzyError, OutOfDomain};
pub use inference::{InferenceState, MamdaniInference};
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use membership::MembershipFunction;
pub use ops::{AndOp, DefuzzificationOp, ImplicationOp, OrOp};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use simulation::Simulation;
pub use system::FuzzySystem;
pub use terms::Terms;
pub use universe::{Universe, MAX_SAMPLES};
pub use variable::{LinguisticVariable, Variable, VariableKey, VariableKind, Variables};
