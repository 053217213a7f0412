use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// Crisp readings for the input variables of one evaluation.
#[derive(Clone, Debug, Default)]
pub struct Inputs(pub(crate) HashMap<VariableKey, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    // Setting a variable twice keeps the latest reading
    pub fn add(&mut self, var: Variable, val: f64) {
        self.0.insert(var.0, val);
    }

    /// Chaining form of [`Inputs::add`].
    pub fn with(mut self, var: Variable, val: f64) -> Self {
        self.add(var, val);
        self
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        self.0.get(&var.0).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
