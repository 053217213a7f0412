use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// Crisp value of every output variable after an evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    defuzzificated: HashMap<VariableKey, f64>,
}

impl Outputs {
    pub(crate) fn insert(&mut self, key: VariableKey, value: f64) {
        self.defuzzificated.insert(key, value);
    }

    pub(crate) fn clear(&mut self) {
        self.defuzzificated.clear();
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        self.defuzzificated.get(&var.0).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.defuzzificated.iter().map(|(k, v)| (Variable(*k), *v))
    }

    pub fn len(&self) -> usize {
        self.defuzzificated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defuzzificated.is_empty()
    }
}
