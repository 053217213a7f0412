use rayon::prelude::*;

use crate::error::FuzzyError;
use crate::inference::{InferenceState, MamdaniInference};
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::simulation::Simulation;
use crate::variable::{Variable, Variables};

/// A complete, immutable fuzzy system: variables, rules and the inference
/// method.
///
/// Safe to share across threads; every evaluation keeps its mutable state
/// in its own [`InferenceState`] or [`Simulation`].
#[derive(Clone, Debug)]
pub struct FuzzySystem {
    vars: Variables,
    rules: Rules,
    inference: MamdaniInference,
}

impl FuzzySystem {
    pub fn new(vars: Variables, rules: Rules, inference: MamdaniInference) -> Result<Self, FuzzyError> {
        rules.validate(&vars)?;

        tracing::debug!(
            inputs = vars.inputs().count(),
            outputs = vars.outputs().count(),
            rules = rules.len(),
            "built fuzzy system"
        );

        Ok(Self { vars, rules, inference })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn inference(&self) -> &MamdaniInference {
        &self.inference
    }

    pub fn lookup(&self, name: &str) -> Option<Variable> {
        self.vars.lookup(name)
    }

    /// Fresh evaluation context with no readings set.
    pub fn simulation(&self) -> Simulation<'_> {
        Simulation::new(self)
    }

    /// Evaluates `inputs` into `state`, keeping the firing strengths and
    /// aggregated sets around for inspection.
    pub fn evaluate_into(&self, inputs: &Inputs, state: &mut InferenceState) -> Result<(), FuzzyError> {
        self.inference.eval_validated(&self.vars, &self.rules, inputs, state)
    }

    pub fn evaluate(&self, inputs: &Inputs) -> Result<Outputs, FuzzyError> {
        let mut state = InferenceState::new();

        self.evaluate_into(inputs, &mut state)?;

        Ok(state.take_outputs())
    }

    /// Evaluates every reading set in parallel. Results keep the order of
    /// `batch`; a failure in one evaluation does not affect the others.
    pub fn evaluate_batch(&self, batch: &[Inputs]) -> Vec<Result<Outputs, FuzzyError>> {
        batch
            .par_iter()
            .map_init(InferenceState::new, |state, inputs| -> Result<Outputs, FuzzyError> {
                self.evaluate_into(inputs, state)?;

                Ok(state.take_outputs())
            })
            .collect()
    }
}
