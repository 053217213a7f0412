use crate::error::{ConfigError, FuzzyError, OutOfDomain};
use crate::inference::InferenceState;
use crate::inputs::Inputs;
use crate::system::FuzzySystem;
use crate::variable::VariableKind;

/// Name-addressed evaluation context over a shared [`FuzzySystem`].
///
/// Holds the current readings and the results of the last [`compute`]. One
/// simulation can be reused for any number of evaluations, but must not be
/// shared between threads that compute concurrently.
///
/// [`compute`]: Simulation::compute
#[derive(Debug)]
pub struct Simulation<'s> {
    system: &'s FuzzySystem,
    inputs: Inputs,
    state: InferenceState,
    computed: bool,
}

impl<'s> Simulation<'s> {
    pub(crate) fn new(system: &'s FuzzySystem) -> Self {
        Self {
            system,
            inputs: Inputs::new(),
            state: InferenceState::new(),
            computed: false,
        }
    }

    /// Sets the reading of input variable `name`, replacing any previous one.
    pub fn set_input(&mut self, name: &str, value: f64) -> Result<(), FuzzyError> {
        let var = self.system.lookup(name).ok_or_else(|| ConfigError::UnknownVariable { name: name.to_owned() })?;
        let kind = self.system.variables().get(var).map(|v| v.kind());

        if kind != Some(VariableKind::Input) {
            return Err(ConfigError::NotAnInput { name: name.to_owned() }.into());
        }

        if !value.is_finite() {
            return Err(FuzzyError::NonFiniteReading {
                variable: name.to_owned(),
                value,
            });
        }

        self.inputs.add(var, value);

        Ok(())
    }

    /// Runs the inference against the readings set so far.
    ///
    /// Fails with [`FuzzyError::MissingInput`] if any input has no reading.
    /// Results of a previous `compute` are discarded either way.
    pub fn compute(&mut self) -> Result<(), FuzzyError> {
        self.computed = false;
        self.system.evaluate_into(&self.inputs, &mut self.state)?;
        self.computed = true;

        Ok(())
    }

    /// Crisp value of output `name` from the last successful [`compute`].
    ///
    /// [`compute`]: Simulation::compute
    pub fn output(&self, name: &str) -> Option<f64> {
        if !self.computed {
            return None;
        }

        self.state.outputs().get(self.system.lookup(name)?)
    }

    /// Readings from the last `compute` that fell outside their universe.
    pub fn out_of_domain(&self) -> &[OutOfDomain] {
        self.state.out_of_domain()
    }

    /// Firing strengths and aggregated sets of the last `compute`.
    pub fn state(&self) -> &InferenceState {
        &self.state
    }

    /// Forgets every reading and result.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.state.clear();
        self.computed = false;
    }
}
